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

//! Cartridge boot, with and without HLE

use super::*;
use crate::core::error::EmulatorError;

#[test]
fn test_boot_without_cartridge_fails() {
    let mut system = system();
    assert!(matches!(system.boot(), Err(EmulatorError::NoRomLoaded)));
}

#[test]
fn test_boot_copies_first_4k_into_dmem() {
    let system = booted(small_config(), &[0x3C08_A430, 0x2508_0008], &[]);
    let dmem = system.bus().dmem();

    assert_eq!(&dmem[0..4], &ROM_MAGIC.to_be_bytes());
    assert_eq!(&dmem[0x40..0x44], &0x3C08_A430u32.to_be_bytes());
    assert_eq!(&dmem[0x44..0x48], &0x2508_0008u32.to_be_bytes());
    // Nothing past 4KB reaches RDRAM without HLE
    assert!(system.bus().rdram()[0x400..0x500].iter().all(|&b| b == 0));
}

#[test]
fn test_boot_sets_cic_registers_and_ipl3_entry() {
    let system = booted(small_config(), &[], &[]);
    let cpu = system.cpu();

    assert_eq!(cpu.pc(), 0xFFFF_FFFF_A400_0040);
    assert_eq!(cpu.reg(11), 0xFFFF_FFFF_A400_0040);
    assert_eq!(cpu.reg(20), 1);
    assert_eq!(cpu.reg(22), 0x3F);
    assert_eq!(cpu.reg(29), 0xFFFF_FFFF_A400_1FF0);
    assert_eq!(system.state(), RunState::Idle);
}

#[test]
fn test_hle_boot_copies_game_and_jumps_to_entry() {
    let mut config = small_config();
    config.boot.hle = true;
    let system = booted(config, &[], &[0x2401_0007, 0x0000_0000]);
    let bus = system.bus();

    assert_eq!(system.cpu().pc(), 0xFFFF_FFFF_8000_0400);
    assert_eq!(&bus.rdram()[0x400..0x404], &0x2401_0007u32.to_be_bytes());

    let word = |address: usize| {
        u32::from_be_bytes(bus.rdram()[address..address + 4].try_into().unwrap())
    };
    assert_eq!(word(0x300), 1);
    assert_eq!(word(0x308), 0xB000_0000);
    assert_eq!(word(0x310), 2);
    assert_eq!(word(0x318), 8 * 1024 * 1024);
}

#[test]
fn test_hle_game_runs() {
    let mut config = small_config();
    config.boot.hle = true;
    // ADDIU r1, r0, 7 ; SW r1, 0x100(r0) ; J 0x80000400 ; NOP
    let game = [0x2401_0007, 0xAC01_0100, 0x0800_0100, 0x0000_0000];
    let mut system = booted(config, &[], &game);

    system.step_n(2);
    assert_eq!(system.cpu().reg(1), 7);
    assert_eq!(system.bus_mut().read32(0x8000_0100), 7);
}

#[test]
fn test_boot_resets_previous_run() {
    let mut system = booted(small_config(), &[], &[]);
    system.step_n(5);
    system.boot().unwrap();

    assert_eq!(system.ticks(), 0);
    assert_eq!(system.state(), RunState::Idle);
    assert!(system.bus().cartridge().is_some());
}
