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

//! LWC2 / SWC2 vector loads and stores
//!
//! ```text
//! | 110x10 | base (5) | vt (5) | kind (5) | element (4) | offset (7) |
//! ```
//!
//! The signed 7-bit offset is scaled by the access size of the form.
//! Element numbers are byte indices into the 128-bit register.

use super::VectorUnit;
use crate::core::cpu::Instruction;
use crate::core::memory::Bus;

/// Decoded LWC2/SWC2 fields
struct Transfer {
    kind: u32,
    vt: usize,
    element: usize,
    offset: u32,
}

impl Transfer {
    fn decode(instr: Instruction) -> Self {
        // Sign-extend the 7-bit offset
        let offset = (((instr.0 & 0x7F) << 25) as i32 >> 25) as u32;
        Self {
            kind: (instr.0 >> 11) & 0x1F,
            vt: instr.rt(),
            element: ((instr.0 >> 7) & 0xF) as usize,
            offset,
        }
    }

    /// Access size in bytes for the offset scale
    fn scale(&self) -> u32 {
        match self.kind {
            0x00 => 1,
            0x01 => 2,
            0x02 => 4,
            0x03 | 0x06 | 0x07 => 8,
            _ => 16,
        }
    }

    /// DMEM byte address, reduced to 12 bits
    fn address(&self, base: u32) -> u32 {
        base.wrapping_add(self.offset.wrapping_mul(self.scale())) & 0xFFF
    }
}

impl VectorUnit {
    pub(super) fn execute_lwc2(&mut self, instr: Instruction, base: u32, bus: &mut Bus) {
        let t = Transfer::decode(instr);
        let address = t.address(base);

        match t.kind {
            // LBV / LSV / LLV / LDV
            0x00..=0x03 => {
                for i in 0..t.scale() as usize {
                    let index = t.element + i;
                    if index < 16 {
                        let byte = Self::dmem_read8(bus, address + i as u32);
                        self.set_vreg_byte(t.vt, index, byte);
                    }
                }
            }
            // LQV: up to the next 16-byte boundary
            0x04 => {
                let end = (address & !15) + 16;
                for (i, a) in (address..end).enumerate() {
                    let index = t.element + i;
                    if index < 16 {
                        self.set_vreg_byte(t.vt, index, Self::dmem_read8(bus, a));
                    }
                }
            }
            // LRV: from the previous 16-byte boundary up to the address
            0x05 => {
                let count = (address & 15) as usize;
                let start = address & !15;
                for i in 0..count {
                    let index = 16 - count + t.element + i;
                    if index < 16 {
                        let byte = Self::dmem_read8(bus, start + i as u32);
                        self.set_vreg_byte(t.vt, index, byte);
                    }
                }
            }
            // LPV / LUV: packed bytes into the upper bits of each lane
            0x06 | 0x07 => {
                let shift = if t.kind == 0x06 { 8 } else { 7 };
                let misalignment = (address & 7) as usize;
                let aligned = address & !7;
                let mut lanes = [0i16; 8];
                for (lane, value) in lanes.iter_mut().enumerate() {
                    let offset = (misalignment.wrapping_sub(t.element).wrapping_add(lane)) & 15;
                    let byte = Self::dmem_read8(bus, aligned + offset as u32) as u16;
                    *value = (byte << shift) as i16;
                }
                self.set_vreg(t.vt, lanes);
            }
            kind => log::warn!("RSP: unsupported LWC2 form 0x{:02X}", kind),
        }
    }

    pub(super) fn execute_swc2(&mut self, instr: Instruction, base: u32, bus: &mut Bus) {
        let t = Transfer::decode(instr);
        let address = t.address(base);

        match t.kind {
            // SBV / SSV / SLV / SDV
            0x00..=0x03 => {
                for i in 0..t.scale() as usize {
                    let byte = self.vreg_byte(t.vt, t.element + i);
                    Self::dmem_write8(bus, address + i as u32, byte);
                }
            }
            // SQV
            0x04 => {
                let end = (address & !15) + 16;
                for (i, a) in (address..end).enumerate() {
                    let byte = self.vreg_byte(t.vt, t.element + i);
                    Self::dmem_write8(bus, a, byte);
                }
            }
            // SRV
            0x05 => {
                let count = (address & 15) as usize;
                let start = address & !15;
                for i in 0..count {
                    let byte = self.vreg_byte(t.vt, t.element + 16 - count + i);
                    Self::dmem_write8(bus, start + i as u32, byte);
                }
            }
            // SPV / SUV
            0x06 | 0x07 => {
                let lanes = self.vreg(t.vt);
                for i in 0..8usize {
                    let index = (t.element + i) & 15;
                    let lane = lanes[index & 7] as u16;
                    let packed = (index < 8) == (t.kind == 0x06);
                    let byte = if packed { (lane >> 8) as u8 } else { (lane >> 7) as u8 };
                    Self::dmem_write8(bus, address + i as u32, byte);
                }
            }
            kind => log::warn!("RSP: unsupported SWC2 form 0x{:02X}", kind),
        }
    }
}
