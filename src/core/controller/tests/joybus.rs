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

//! Joybus command processing tests

use super::super::pif::*;
use super::super::*;

/// Build a command list: status for port 0, read buttons for port 1
fn write_read_buttons(pif: &mut Pif, port: usize) {
    let ram = pif.ram_mut();
    ram.fill(0);
    let mut i = 0;
    for _ in 0..port {
        ram[i] = 0x00;
        i += 1;
    }
    ram[i] = 0x01; // tx
    ram[i + 1] = 0x04; // rx
    ram[i + 2] = 0x01; // read buttons
    ram[i + 3..i + 7].fill(0xFF);
    ram[i + 7] = 0xFE;
}

#[test]
fn test_status_command() {
    let mut pif = Pif::new();
    {
        let ram = pif.ram_mut();
        ram[0] = 0x01; // tx
        ram[1] = 0x03; // rx
        ram[2] = 0x00; // status
        ram[3..6].fill(0xFF);
        ram[6] = 0xFE;
    }

    pif.process_commands();

    assert_eq!(&pif.ram()[3..6], &[0x05, 0x00, 0x02]);
    assert_eq!(pif.ram()[1] & 0x80, 0);
}

#[test]
fn test_read_buttons_returns_latched_input() {
    let mut pif = Pif::new();
    let mut inputs = [ControllerInput::default(); PORTS];
    inputs[0].press(Buttons::A | Buttons::B);
    inputs[0].set_stick(5, -5);
    pif.latch_inputs(&inputs);

    write_read_buttons(&mut pif, 0);
    pif.process_commands();

    assert_eq!(&pif.ram()[3..7], &[0xC0, 0x00, 0x05, 0xFB]);
}

#[test]
fn test_unconnected_port_reports_no_device() {
    let mut pif = Pif::new();
    write_read_buttons(&mut pif, 1);
    pif.process_commands();

    // rx byte for port 1 sits after one skip byte
    assert_ne!(pif.ram()[2] & 0x80, 0);
    assert_eq!(&pif.ram()[4..8], &[0xFF; 4]);
}

#[test]
fn test_connected_second_port() {
    let mut pif = Pif::new();
    pif.set_connected(1, true);
    let mut inputs = [ControllerInput::default(); PORTS];
    inputs[1].press(Buttons::START);
    pif.latch_inputs(&inputs);

    write_read_buttons(&mut pif, 1);
    pif.process_commands();

    assert_eq!(pif.ram()[2] & 0x80, 0);
    assert_eq!(&pif.ram()[4..8], &[0x10, 0x00, 0x00, 0x00]);
}

#[test]
fn test_input_not_visible_before_latch() {
    let mut pif = Pif::new();
    write_read_buttons(&mut pif, 0);
    pif.process_commands();
    assert_eq!(&pif.ram()[3..7], &[0, 0, 0, 0]);
}

#[test]
fn test_control_byte_untouched() {
    let mut pif = Pif::new();
    pif.ram_mut().fill(0xFF);
    pif.ram_mut()[63] = 0x01;
    pif.process_commands();
    assert_eq!(pif.ram()[63], 0x01);
}

#[test]
fn test_rom_reads() {
    let mut pif = Pif::new();
    assert_eq!(pif.read_rom8(0), 0);

    pif.load_rom(&[0x3C, 0x09, 0xA4, 0x00]);
    assert!(pif.has_rom());
    assert_eq!(pif.read_rom8(2), 0xA4);
    assert_eq!(pif.read_rom8(0x7BF), 0);
}
