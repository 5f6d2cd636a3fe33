// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! System tests
//!
//! A small configuration keeps frames short: four CPU instructions per
//! line and ten lines per frame.

mod boot;
mod lifecycle;

use super::*;
use crate::core::loader::{HEADER_SIZE, ROM_MAGIC};

pub(super) const LINES: u32 = 10;

pub(super) fn small_config() -> EmulatorConfig {
    let mut config = EmulatorConfig::default();
    config.cpu.instructions_per_line = 4;
    config.rsp.instruction_budget = 64;
    config.video.lines_per_frame = LINES;
    config.video.default_width = 32;
    config.video.default_height = 24;
    config
}

pub(super) fn system() -> System {
    System::new(small_config())
}

/// Big-endian ROM image: header, `boot` words at 0x40, `game` words at 0x1000
pub(super) fn rom(entry_point: u32, boot: &[u32], game: &[u32]) -> Vec<u8> {
    let mut data = vec![0u8; 0x2000];
    data[0..4].copy_from_slice(&ROM_MAGIC.to_be_bytes());
    data[8..12].copy_from_slice(&entry_point.to_be_bytes());
    data[0x20..0x24].copy_from_slice(b"TEST");
    data[0x3B..0x3F].copy_from_slice(b"NTSE");
    for (i, word) in boot.iter().enumerate() {
        let at = HEADER_SIZE + i * 4;
        data[at..at + 4].copy_from_slice(&word.to_be_bytes());
    }
    for (i, word) in game.iter().enumerate() {
        let at = 0x1000 + i * 4;
        data[at..at + 4].copy_from_slice(&word.to_be_bytes());
    }
    data
}

pub(super) fn booted(config: EmulatorConfig, boot: &[u32], game: &[u32]) -> System {
    let mut system = System::new(config);
    let cartridge = Cartridge::from_bytes(rom(0x8000_0400, boot, game)).unwrap();
    system.insert_cartridge(cartridge);
    system.boot().unwrap();
    system
}

/// Place a CPU program in RDRAM at 0x80000000 and jump to it
pub(super) fn run_program(system: &mut System, program: &[u32]) {
    for (i, word) in program.iter().enumerate() {
        system.bus_mut().write32(0x8000_0000 + i as u32 * 4, *word);
    }
    system.cpu_mut().set_pc(0xFFFF_FFFF_8000_0000);
}
