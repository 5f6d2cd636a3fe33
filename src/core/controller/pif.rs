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

//! PIF RAM and joybus command processing
//!
//! PIF RAM is a 64-byte block at 0x1FC007C0. Games write a command list
//! into it over SI DMA and read the answers back with the reverse DMA. The
//! list is processed just before PIF RAM is copied out to RDRAM.
//!
//! ```text
//! per channel:
//!   0x00        skip to next channel
//!   0xFD        channel reset, skip
//!   0xFE        end of list
//!   0xFF        padding
//!   tx rx data  command of `tx` bytes, `rx` answer bytes follow
//! ```
//!
//! Byte 63 is the PIF control byte and is never parsed as a command.

use super::{ControllerInput, PORTS};

/// PIF RAM size in bytes
pub const PIF_RAM_SIZE: usize = 64;

/// PIF boot ROM size in bytes
pub const PIF_ROM_SIZE: usize = 0x7C0;

/// Set in the rx length byte when no device answers
const NO_DEVICE: u8 = 0x80;

/// Standard controller identifier, no pak inserted
const CONTROLLER_STATUS: [u8; 3] = [0x05, 0x00, 0x02];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pif {
    ram: [u8; PIF_RAM_SIZE],

    /// Optional boot ROM image; reads return zero when absent
    rom: Vec<u8>,

    /// Inputs latched at the last frame boundary, in wire layout
    latched: [u32; PORTS],

    connected: [bool; PORTS],
}

impl Pif {
    pub fn new() -> Self {
        Self {
            ram: [0; PIF_RAM_SIZE],
            rom: Vec::new(),
            latched: [0; PORTS],
            connected: [true, false, false, false],
        }
    }

    /// Install a PIF boot ROM image (truncated or zero-padded to 0x7C0 bytes)
    pub fn load_rom(&mut self, data: &[u8]) {
        let mut rom = vec![0u8; PIF_ROM_SIZE];
        let len = data.len().min(PIF_ROM_SIZE);
        rom[..len].copy_from_slice(&data[..len]);
        self.rom = rom;
    }

    pub fn has_rom(&self) -> bool {
        !self.rom.is_empty()
    }

    pub fn read_rom8(&self, offset: u32) -> u8 {
        self.rom.get(offset as usize).copied().unwrap_or(0)
    }

    pub fn read_ram8(&self, offset: u32) -> u8 {
        self.ram[offset as usize % PIF_RAM_SIZE]
    }

    pub fn write_ram8(&mut self, offset: u32, value: u8) {
        self.ram[offset as usize % PIF_RAM_SIZE] = value;
    }

    pub fn ram(&self) -> &[u8; PIF_RAM_SIZE] {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut [u8; PIF_RAM_SIZE] {
        &mut self.ram
    }

    /// Plug or unplug a controller
    pub fn set_connected(&mut self, port: usize, connected: bool) {
        if let Some(slot) = self.connected.get_mut(port) {
            *slot = connected;
        }
    }

    pub fn is_connected(&self, port: usize) -> bool {
        self.connected.get(port).copied().unwrap_or(false)
    }

    /// Latch the front end's inputs; called once per frame
    pub fn latch_inputs(&mut self, inputs: &[ControllerInput; PORTS]) {
        for (slot, input) in self.latched.iter_mut().zip(inputs) {
            *slot = input.to_u32();
        }
    }

    pub fn latched(&self, port: usize) -> ControllerInput {
        ControllerInput::from_u32(self.latched[port])
    }

    /// Latched inputs in wire layout plus connection flags, for snapshots
    pub fn port_state(&self) -> ([u32; PORTS], [bool; PORTS]) {
        (self.latched, self.connected)
    }

    /// Restore RAM and port state from a snapshot; the boot ROM is kept
    pub fn restore(&mut self, ram: &[u8], latched: [u32; PORTS], connected: [bool; PORTS]) {
        let len = ram.len().min(PIF_RAM_SIZE);
        self.ram = [0; PIF_RAM_SIZE];
        self.ram[..len].copy_from_slice(&ram[..len]);
        self.latched = latched;
        self.connected = connected;
    }

    /// Run the joybus command list in PIF RAM, writing answers in place
    pub fn process_commands(&mut self) {
        let mut channel = 0usize;
        let mut i = 0usize;
        let end = PIF_RAM_SIZE - 1;

        while i < end {
            let tx = self.ram[i];
            match tx {
                0x00 => {
                    channel += 1;
                    i += 1;
                    continue;
                }
                0xFD | 0xFF => {
                    i += 1;
                    continue;
                }
                0xFE => break,
                _ => {}
            }

            let tx_len = (tx & 0x3F) as usize;
            let rx_index = i + 1;
            if rx_index >= end {
                break;
            }
            let rx_len = (self.ram[rx_index] & 0x3F) as usize;
            let cmd_start = rx_index + 1;
            let rx_start = cmd_start + tx_len;
            if rx_start + rx_len > end {
                log::warn!("PIF: joybus command at {} overruns PIF RAM", i);
                break;
            }

            let command = if tx_len > 0 { self.ram[cmd_start] } else { 0xFF };
            match self.answer(channel, command) {
                Some(answer) => {
                    let n = answer.len().min(rx_len);
                    self.ram[rx_start..rx_start + n].copy_from_slice(&answer[..n]);
                }
                None => self.ram[rx_index] |= NO_DEVICE,
            }

            log::trace!("PIF: channel {} command 0x{:02X}", channel, command);
            channel += 1;
            i = rx_start + rx_len;
        }
    }

    /// Answer bytes for a joybus command, or None for "no device"
    fn answer(&self, channel: usize, command: u8) -> Option<Vec<u8>> {
        if channel >= PORTS || !self.connected[channel] {
            return None;
        }
        match command {
            0x00 | 0xFF => Some(CONTROLLER_STATUS.to_vec()),
            0x01 => Some(self.latched(channel).to_bytes().to_vec()),
            _ => {
                log::debug!("PIF: unsupported joybus command 0x{:02X}", command);
                None
            }
        }
    }
}

impl Default for Pif {
    fn default() -> Self {
        Self::new()
    }
}
