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

use super::*;
use crate::core::config::EmulatorConfig;
use crate::core::controller::Buttons;
use crate::core::loader::{Cartridge, ROM_MAGIC};
use tempfile::tempdir;

/// ADDIU r1, r1, 1 ; SW r1, 0x100(r0) ; J 0x80000000 ; NOP
const COUNTER_LOOP: [u32; 4] = [0x2421_0001, 0xAC01_0100, 0x0800_0000, 0x0000_0000];

fn config() -> EmulatorConfig {
    let mut config = EmulatorConfig::default();
    config.cpu.instructions_per_line = 100;
    config.rsp.instruction_budget = 64;
    config.video.lines_per_frame = 10;
    config.video.default_width = 32;
    config.video.default_height = 24;
    config.dma.delay_ticks = 2;
    config
}

fn cartridge() -> Cartridge {
    let mut data = vec![0u8; 0x1000];
    data[0..4].copy_from_slice(&ROM_MAGIC.to_be_bytes());
    data[0x20..0x29].copy_from_slice(b"SNAPSHOTS");
    data[0x3B..0x3F].copy_from_slice(b"NSSE");
    Cartridge::from_bytes(data).unwrap()
}

/// System running the counter loop from RDRAM with a DMA and RDP work in flight
fn running_system() -> System {
    let mut system = System::new(config());
    system.insert_cartridge(cartridge());
    system.reset();

    for (i, word) in COUNTER_LOOP.iter().enumerate() {
        system.bus_mut().write32(0x8000_0000 + i as u32 * 4, *word);
    }
    system.cpu_mut().set_pc(0xFFFF_FFFF_8000_0000);

    // Enable every MI source so the CPU sees interrupts as they arrive
    system.bus_mut().write32(0xA430_000C, 0xAAA);

    let mut input = ControllerInput::new();
    input.press(Buttons::Z);
    system.set_controller(1, input);
    system
}

/// Everything but the capture time
fn assert_same_machine(a: &SaveState, b: &SaveState) {
    assert_eq!(a.cpu, b.cpu);
    assert_eq!(a.memory, b.memory);
    assert_eq!(a.registers, b.registers);
    assert_eq!(a.rsp, b.rsp);
    assert_eq!(a.rdp, b.rdp);
    assert_eq!(a.scheduler, b.scheduler);
    assert_eq!(a.metadata.frame_count, b.metadata.frame_count);
}

#[test]
fn test_capture_records_metadata() {
    let mut system = running_system();
    system.step_n(25);

    let state = system.save_state();
    assert_eq!(state.version, SAVE_STATE_VERSION);
    assert_eq!(state.metadata.game_title, "SNAPSHOTS");
    assert_eq!(state.metadata.game_code, "NSSE");
    assert_eq!(state.metadata.frame_count, 2);
    assert_eq!(state.scheduler.ticks, 25);
    assert_eq!(state.memory.rdram.len(), Bus::RDRAM_SIZE);
}

#[test]
fn test_bytes_round_trip() {
    let mut system = running_system();
    system.step_n(7);

    let state = system.save_state();
    let decoded = SaveState::from_bytes(&state.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, state);
}

#[test]
fn test_other_version_is_rejected() {
    let mut state = System::new(config()).save_state();
    state.version = SAVE_STATE_VERSION + 1;
    let bytes = state.to_bytes().unwrap();

    match SaveState::from_bytes(&bytes) {
        Err(EmulatorError::IncompatibleSaveState { expected, got }) => {
            assert_eq!(expected, SAVE_STATE_VERSION);
            assert_eq!(got, SAVE_STATE_VERSION + 1);
        }
        other => panic!("expected a version error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_garbage_is_rejected() {
    assert!(matches!(SaveState::from_bytes(&[]), Err(EmulatorError::SaveState(_))));
    assert!(matches!(
        SaveState::from_bytes(&[1, 0xFF, 0xFF, 0xFF]),
        Err(EmulatorError::SaveState(_))
    ));
}

#[test]
fn test_wrong_memory_size_leaves_system_untouched() {
    let mut system = running_system();
    system.step_n(4);
    let before = system.save_state();

    let mut state = before.clone();
    state.memory.rdram.truncate(1024);
    state.scheduler.ticks = 999;

    assert!(matches!(system.load_state(state), Err(EmulatorError::SaveState(_))));
    assert_eq!(system.ticks(), 4);
    assert_same_machine(&system.save_state(), &before);
}

/// Rewrite one RDP field through its serde form
fn with_rdp_field(state: &mut SaveState, field: &str, value: serde_json::Value) {
    let mut rdp = serde_json::to_value(&state.rdp).unwrap();
    rdp[field] = value;
    state.rdp = serde_json::from_value(rdp).unwrap();
}

#[test]
fn test_rdp_resolution_must_match_buffers() {
    let mut system = running_system();
    system.step_n(4);
    let before = system.save_state();

    let mut state = before.clone();
    with_rdp_field(&mut state, "width", 640.into());
    let state = SaveState::from_bytes(&state.to_bytes().unwrap()).unwrap();

    assert!(matches!(system.load_state(state), Err(EmulatorError::SaveState(_))));
    assert_same_machine(&system.save_state(), &before);

    // Still drawable after the rejected restore
    let fill = [0x37 << 56 | 0xFF00_00FF, 0x36 << 56 | (32 * 4) << 44 | (24 * 4) << 32];
    system.bus_mut().load_rdram(
        0x3000,
        &fill.iter().flat_map(|w: &u64| w.to_be_bytes()).collect::<Vec<_>>(),
    );
    system.bus_mut().write32(0xA410_0000, 0x3000);
    system.bus_mut().write32(0xA410_0004, 0x3010);
    system.step();
    assert_eq!(system.rdp().fill_color(), 0xFF00_00FF);
}

#[test]
fn test_short_tmem_is_rejected() {
    let mut system = running_system();
    let mut state = system.save_state();
    with_rdp_field(&mut state, "tmem", serde_json::json!([0, 0, 0, 0]));

    assert!(matches!(system.load_state(state), Err(EmulatorError::SaveState(_))));
}

#[test]
fn test_short_depth_buffer_is_rejected() {
    let mut system = running_system();
    let mut state = system.save_state();
    with_rdp_field(&mut state, "depth", serde_json::json!([]));

    assert!(matches!(system.load_state(state), Err(EmulatorError::SaveState(_))));
}

#[test]
fn test_pif_ram_size_is_checked() {
    let mut system = running_system();
    let mut state = system.save_state();
    state.memory.pif_ram.truncate(8);

    assert!(matches!(system.load_state(state), Err(EmulatorError::SaveState(_))));
}

#[test]
fn test_restore_then_run_matches_direct_run() {
    let mut system = running_system();
    system.step_n(13);
    let snapshot = system.save_state();

    system.step_n(21);
    let direct = system.save_state();
    assert_ne!(direct.cpu, snapshot.cpu);

    system.step_n(40);
    system.load_state(snapshot.clone()).unwrap();
    assert_eq!(system.ticks(), 13);
    assert_same_machine(&system.save_state(), &snapshot);

    system.step_n(21);
    assert_same_machine(&system.save_state(), &direct);
}

#[test]
fn test_restore_onto_fresh_system() {
    let mut source = running_system();
    source.step_n(12);
    // PI DMA still queued when the state is taken
    source.bus_mut().write32(0xA460_0000, 0x0010_0000);
    source.bus_mut().write32(0xA460_0004, 0x1000_0000);
    source.bus_mut().write32(0xA460_000C, 3);
    let bytes = source.save_state().to_bytes().unwrap();

    let mut target = System::new(config());
    target.insert_cartridge(cartridge());
    target.load_state(SaveState::from_bytes(&bytes).unwrap()).unwrap();

    source.step_n(5);
    target.step_n(5);
    assert_same_machine(&target.save_state(), &source.save_state());
    assert_eq!(&target.bus().rdram()[0x10_0000..0x10_0004], &ROM_MAGIC.to_be_bytes());
    assert_eq!(target.controller(1).buttons, Buttons::Z);
}

#[test]
fn test_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("slot1.state");

    let mut system = running_system();
    system.step_n(9);
    system.save_state_to_file(&path).unwrap();
    let saved = system.save_state();

    system.step_n(9);
    system.load_state_from_file(&path).unwrap();
    assert_same_machine(&system.save_state(), &saved);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let mut system = System::new(config());
    let result = system.load_state_from_file(dir.path().join("missing.state"));
    assert!(matches!(result, Err(EmulatorError::Io(_))));
}
