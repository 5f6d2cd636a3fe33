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

mod common;

use common::fixtures::{boot, fast_config, RomBuilder, ENTRY_POINT, GAME_OFFSET};
use common::mips::{addiu, j, li, sw, NOP};
use n64rx::core::error::EmulatorError;
use n64rx::core::interrupt::interrupts;
use n64rx::core::loader::{Cartridge, RomFormat};
use n64rx::core::rdp::Color;
use n64rx::core::system::{RunState, System};
use std::cell::Cell;
use std::rc::Rc;

/// RDRAM address the display list is copied to by the HLE boot
const DISPLAY_LIST: u32 = 0x500;

/// Display list: clear a 320-wide 32-bit image at 0x100000 to red, then a
/// green box, then SYNC_FULL
fn display_list() -> Vec<u64> {
    vec![
        0x3F << 56 | 3 << 51 | 319 << 32 | 0x10_0000,
        0x37 << 56 | 0xFF00_00FF,
        0x36 << 56 | (320 * 4) << 44 | (240 * 4) << 32,
        0x37 << 56 | 0x00FF_00FF,
        0x36 << 56 | (60 * 4) << 44 | (50 * 4) << 32 | (40 * 4) << 12 | (30 * 4),
        0x29 << 56,
    ]
}

/// CPU program that points the DP at the display list and spins
fn dp_kick_program(words: usize) -> Vec<u32> {
    let end = DISPLAY_LIST + 8 * words as u32;
    let mut code = Vec::new();
    code.extend(li(8, 0xA410_0000));
    code.extend(li(9, DISPLAY_LIST));
    code.extend(li(10, end));
    code.push(sw(9, 0, 8));
    code.push(sw(10, 4, 8));
    let spin = ENTRY_POINT + 4 * code.len() as u32;
    code.push(j(spin));
    code.push(NOP);
    code
}

#[test]
fn test_cpu_drives_display_processor() {
    let list = display_list();
    let rom = RomBuilder::new("RDP KICK", "NRKE")
        .game(&dp_kick_program(list.len()))
        .dwords(GAME_OFFSET + (DISPLAY_LIST - 0x400) as usize, &list)
        .build();

    let mut system = boot(fast_config(), rom);
    system.run_frame();

    assert!(system.bus().mi.is_pending(interrupts::DP));
    let rdp = system.rdp();
    assert_eq!(rdp.pixel(0, 0), Color::new(0xFF, 0, 0, 0xFF));
    assert_eq!(rdp.pixel(319, 239), Color::new(0xFF, 0, 0, 0xFF));
    assert_eq!(rdp.pixel(40, 30), Color::new(0, 0xFF, 0, 0xFF));
    assert_eq!(rdp.pixel(59, 49), Color::new(0, 0xFF, 0, 0xFF));
    assert_eq!(rdp.pixel(60, 49), Color::new(0xFF, 0, 0, 0xFF));

    let frame = system.current_frame();
    assert_eq!((frame.width, frame.height), (320, 240));
    let at = (30 * 320 + 40) * 4;
    assert_eq!(&frame.pixels[at..at + 4], &[0, 0xFF, 0, 0xFF]);
}

#[test]
fn test_presenter_sees_rendered_frames() {
    let list = display_list();
    let rom = RomBuilder::new("RDP KICK", "NRKE")
        .game(&dp_kick_program(list.len()))
        .dwords(GAME_OFFSET + (DISPLAY_LIST - 0x400) as usize, &list)
        .build();

    let green_frames = Rc::new(Cell::new(0));
    let counter = Rc::clone(&green_frames);

    let mut system = boot(fast_config(), rom);
    system.set_presenter(Box::new(move |frame: &n64rx::core::system::Frame| {
        let at = (30 * frame.width as usize + 40) * 4;
        if frame.pixels[at..at + 4] == [0, 0xFF, 0, 0xFF] {
            counter.set(counter.get() + 1);
        }
    }));

    for _ in 0..3 {
        system.run_frame();
    }
    assert_eq!(system.frames(), 3);
    assert_eq!(green_frames.get(), 3);
}

#[test]
fn test_counter_program_runs_across_frames() {
    // r1 += 1 ; store to 0x100 ; loop
    let code = [addiu(1, 1, 1), sw(1, 0x100, 0), j(ENTRY_POINT), NOP];
    let rom = RomBuilder::new("COUNTER", "NCTE").game(&code).build();

    let mut system = boot(fast_config(), rom);
    system.run_frame();
    system.run_frame();

    // 64 instructions per line, four per iteration, 40 lines
    let iterations = 64 / 4 * 40;
    assert_eq!(system.cpu().reg(1), iterations);
    assert_eq!(system.bus_mut().read32(0x8000_0100), iterations as u32);
    assert_eq!(system.ticks(), 40);
    assert_eq!(system.state(), RunState::Running);
}

#[test]
fn test_rom_file_formats_load_identically() {
    let dir = tempfile::tempdir().unwrap();
    let builder = || RomBuilder::new("FORMATS", "NFME").game(&[0x2401_0001]);

    let z64 = dir.path().join("game.z64");
    let v64 = dir.path().join("game.v64");
    std::fs::write(&z64, builder().build()).unwrap();
    std::fs::write(&v64, builder().build_v64()).unwrap();

    let a = Cartridge::load(&z64).unwrap();
    let b = Cartridge::load(&v64).unwrap();
    assert_eq!(a.header.format, RomFormat::BigEndian);
    assert_eq!(b.header.format, RomFormat::ByteSwapped);
    assert_eq!(a.data(), b.data());
    assert_eq!(b.header.title, "FORMATS");
    assert_eq!(b.header.entry_point, ENTRY_POINT);

    let mut system = System::default();
    system.load_rom(&v64).unwrap();
    system.boot().unwrap();
    assert_eq!(system.bus().cartridge().map(|c| c.header.game_code.as_str()), Some("NFME"));
}

#[test]
fn test_missing_and_invalid_roms() {
    let dir = tempfile::tempdir().unwrap();
    let mut system = System::default();

    let missing = system.load_rom(dir.path().join("nothing.z64"));
    assert!(matches!(missing, Err(EmulatorError::RomNotFound(_))));

    let junk = dir.path().join("junk.z64");
    std::fs::write(&junk, vec![0x55u8; 0x100]).unwrap();
    assert!(matches!(system.load_rom(&junk), Err(EmulatorError::InvalidRomImage(_))));
    assert!(system.bus().cartridge().is_none());
}

#[test]
fn test_header_serializes_to_json() {
    let rom = RomBuilder::new("JSON", "NJSE").build();
    let cartridge = Cartridge::from_bytes(rom).unwrap();

    let json = serde_json::to_value(&cartridge.header).unwrap();
    assert_eq!(json["title"], "JSON");
    assert_eq!(json["game_code"], "NJSE");
    assert_eq!(json["entry_point"], ENTRY_POINT);
}

#[test]
fn test_save_state_file_resumes_rendering_program() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quick.state");

    let code = [addiu(1, 1, 1), sw(1, 0x100, 0), j(ENTRY_POINT), NOP];
    let rom = RomBuilder::new("COUNTER", "NCTE").game(&code).build();

    let mut system = boot(fast_config(), rom.clone());
    system.run_frame();
    system.save_state_to_file(&path).unwrap();
    system.run_frame();
    let expected = system.cpu().reg(1);

    let mut restored = boot(fast_config(), rom);
    restored.load_state_from_file(&path).unwrap();
    assert_eq!(restored.frames(), 1);
    restored.run_frame();
    assert_eq!(restored.cpu().reg(1), expected);
}
