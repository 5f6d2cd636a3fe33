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

//! Test fixtures: cartridge images and configurations

#![allow(dead_code)]

use n64rx::core::config::EmulatorConfig;
use n64rx::core::loader::Cartridge;
use n64rx::core::system::System;

/// Entry point used by every fixture ROM
pub const ENTRY_POINT: u32 = 0x8000_0400;

/// ROM offset copied to [`ENTRY_POINT`] by an HLE boot
pub const GAME_OFFSET: usize = 0x1000;

/// Builds big-endian (.z64) cartridge images
pub struct RomBuilder {
    data: Vec<u8>,
}

impl RomBuilder {
    pub fn new(title: &str, game_code: &str) -> Self {
        let mut data = vec![0u8; 0x4000];
        data[0..4].copy_from_slice(&0x8037_1240u32.to_be_bytes());
        data[4..8].copy_from_slice(&0x0000_000Fu32.to_be_bytes());
        data[8..12].copy_from_slice(&ENTRY_POINT.to_be_bytes());

        let title = format!("{:<20}", title);
        data[0x20..0x34].copy_from_slice(&title.as_bytes()[..20]);
        data[0x3B..0x3F].copy_from_slice(&game_code.as_bytes()[..4]);
        Self { data }
    }

    /// Game code placed so it lands at [`ENTRY_POINT`]
    pub fn game(self, code: &[u32]) -> Self {
        self.words(GAME_OFFSET, code)
    }

    pub fn words(mut self, offset: usize, words: &[u32]) -> Self {
        for (i, word) in words.iter().enumerate() {
            let at = offset + i * 4;
            self.data[at..at + 4].copy_from_slice(&word.to_be_bytes());
        }
        self
    }

    pub fn dwords(mut self, offset: usize, words: &[u64]) -> Self {
        for (i, word) in words.iter().enumerate() {
            let at = offset + i * 8;
            self.data[at..at + 8].copy_from_slice(&word.to_be_bytes());
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    /// Byte-swapped (.v64) layout
    pub fn build_v64(self) -> Vec<u8> {
        let mut data = self.data;
        for pair in data.chunks_exact_mut(2) {
            pair.swap(0, 1);
        }
        data
    }
}

/// Small frames, HLE boot
pub fn fast_config() -> EmulatorConfig {
    let mut config = EmulatorConfig::default();
    config.cpu.instructions_per_line = 64;
    config.video.lines_per_frame = 20;
    config.boot.hle = true;
    config
}

/// System with `rom` inserted and booted
pub fn boot(config: EmulatorConfig, rom: Vec<u8>) -> System {
    let mut system = System::new(config);
    let cartridge = Cartridge::from_bytes(rom).expect("fixture ROM is valid");
    system.insert_cartridge(cartridge);
    system.boot().expect("boot succeeds with a cartridge");
    system
}
