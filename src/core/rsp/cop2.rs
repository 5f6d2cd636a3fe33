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

//! COP2: vector register moves and vector computation
//!
//! ```text
//! Moves:   | 010010 | rs (5) | rt (5) | vs (5) | e (4) | 0000000 |
//! Compute: | 010010 |1| e (4)| vt (5) | vs (5) | vd (5) | funct (6) |
//! ```

use super::divide::{self, DivideOp, DivideOutput};
use super::vector::{self, broadcast};
use super::VectorUnit;
use crate::core::cpu::Instruction;

impl VectorUnit {
    pub(super) fn execute_cop2(&mut self, instr: Instruction) {
        if instr.rs() & 0x10 != 0 {
            self.execute_vector(instr.0);
            return;
        }

        let rt = instr.rt();
        let vs = instr.rd();
        let element = ((instr.0 >> 7) & 0xF) as usize;

        match instr.rs() {
            // MFC2
            0x00 => {
                let high = self.vreg_byte(vs, element) as u16;
                let low = self.vreg_byte(vs, element + 1) as u16;
                let value = ((high << 8) | low) as i16 as i32 as u32;
                self.set_reg(rt, value);
                log::trace!("MFC2: r{} = v{}[{}] (0x{:04X})", rt, vs, element, value as u16);
            }
            // CFC2
            0x02 => {
                let value = match vs & 3 {
                    0 => self.flags.vco as i16 as i32 as u32,
                    1 => self.flags.vcc as i16 as i32 as u32,
                    _ => self.flags.vce as u32,
                };
                self.set_reg(rt, value);
                log::trace!("CFC2: r{} = vc{} (0x{:04X})", rt, vs & 3, value as u16);
            }
            // MTC2
            0x04 => {
                let value = self.reg(rt) as u16;
                self.set_vreg_byte(vs, element, (value >> 8) as u8);
                if element < 15 {
                    self.set_vreg_byte(vs, element + 1, value as u8);
                }
                log::trace!("MTC2: v{}[{}] = 0x{:04X}", vs, element, value);
            }
            // CTC2
            0x06 => {
                let value = self.reg(rt);
                match vs & 3 {
                    0 => self.flags.vco = value as u16,
                    1 => self.flags.vcc = value as u16,
                    _ => self.flags.vce = value as u8,
                }
                log::trace!("CTC2: vc{} = 0x{:04X}", vs & 3, value as u16);
            }
            rs => log::warn!("RSP: unknown COP2 move 0x{:02X}", rs),
        }
    }

    /// Decode and run one vector computational instruction
    fn execute_vector(&mut self, word: u32) {
        let funct = word & 0x3F;
        let e = (word >> 21) & 0xF;
        let vt = ((word >> 16) & 0x1F) as usize;
        let vs = ((word >> 11) & 0x1F) as usize;
        let vd = ((word >> 6) & 0x1F) as usize;

        log::trace!(
            "RSP vector op 0x{:02X}: vd={} vs={} vt={} e={}",
            funct,
            vd,
            vs,
            vt,
            e
        );

        if let Some(op) = vector::lane_op(funct) {
            let source = self.vregs[vs];
            let selected = broadcast(self.vregs[vt], e);
            let result = op(source, selected, self.acc, self.flags);
            self.vregs[vd] = result.vd;
            self.acc = result.acc;
            self.flags = result.flags;
            return;
        }

        match funct {
            // VRNDP / VRNDN: the vs field only selects the addend shift
            0x02 | 0x0A => {
                let selected = broadcast(self.vregs[vt], e);
                let shift_high = vs & 1 != 0;
                let result = if funct == 0x02 {
                    vector::vrndp(selected, self.acc, self.flags, shift_high)
                } else {
                    vector::vrndn(selected, self.acc, self.flags, shift_high)
                };
                self.vregs[vd] = result.vd;
                self.acc = result.acc;
            }
            // VSAR
            0x1D => {
                let result = vector::vsar(self.acc, self.flags, e);
                self.vregs[vd] = result.vd;
            }
            0x30..=0x36 => {
                // Single-element forms: vs holds the destination element
                let de = vs & 7;
                let op: DivideOp = match funct {
                    0x30 => divide::vrcp,
                    0x31 => divide::vrcpl,
                    0x32 => divide::vrcph,
                    0x33 => divide::vmov,
                    0x34 => divide::vrsq,
                    0x35 => divide::vrsql,
                    _ => divide::vrsqh,
                };
                let DivideOutput { vd: lanes, acc, state } =
                    op(self.vregs[vd], de, self.vregs[vt], e, self.acc, self.divide);
                self.vregs[vd] = lanes;
                self.acc = acc;
                self.divide = state;
            }
            // VNOP
            0x37 | 0x3F => {}
            _ => log::warn!("RSP: unknown vector function 0x{:02X}", funct),
        }
    }
}
