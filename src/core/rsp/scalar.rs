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

//! RSP scalar instruction set
//!
//! MIPS I without multiply, divide, traps or exceptions. ADD and ADDU (and
//! SUB/SUBU, ADDI/ADDIU) are identical because overflow never traps.
//! Unknown encodings are logged and skipped.

use super::{Flow, VectorUnit};
use crate::core::cpu::Instruction;
use crate::core::memory::Bus;

impl VectorUnit {
    pub(super) fn execute(&mut self, word: u32, current_pc: u32, bus: &mut Bus) -> Flow {
        let instr = Instruction(word);
        let rs = self.reg(instr.rs());
        let rt = self.reg(instr.rt());
        let simm = instr.simm() as u32;
        let link = (current_pc + 8) & 0xFFC;

        match instr.op() {
            0x00 => return self.execute_special(instr, link),
            0x01 => self.execute_regimm(instr, rs, link),
            // J
            0x02 => self.branch_to((instr.target() as u32) << 2),
            // JAL
            0x03 => {
                self.set_reg(31, link);
                self.branch_to((instr.target() as u32) << 2);
            }
            // BEQ
            0x04 => self.branch_if(rs == rt, simm),
            // BNE
            0x05 => self.branch_if(rs != rt, simm),
            // BLEZ
            0x06 => self.branch_if((rs as i32) <= 0, simm),
            // BGTZ
            0x07 => self.branch_if((rs as i32) > 0, simm),
            // ADDI / ADDIU
            0x08 | 0x09 => self.set_reg(instr.rt(), rs.wrapping_add(simm)),
            // SLTI
            0x0A => self.set_reg(instr.rt(), ((rs as i32) < (simm as i32)) as u32),
            // SLTIU
            0x0B => self.set_reg(instr.rt(), (rs < simm) as u32),
            // ANDI
            0x0C => self.set_reg(instr.rt(), rs & instr.imm() as u32),
            // ORI
            0x0D => self.set_reg(instr.rt(), rs | instr.imm() as u32),
            // XORI
            0x0E => self.set_reg(instr.rt(), rs ^ instr.imm() as u32),
            // LUI
            0x0F => self.set_reg(instr.rt(), (instr.imm() as u32) << 16),
            0x10 => self.execute_cop0(instr, bus),
            0x12 => self.execute_cop2(instr),
            // LB
            0x20 => {
                let value = Self::dmem_read(bus, rs.wrapping_add(simm), 1) as u8 as i8 as i32;
                self.set_reg(instr.rt(), value as u32);
            }
            // LH
            0x21 => {
                let value = Self::dmem_read(bus, rs.wrapping_add(simm), 2) as u16 as i16 as i32;
                self.set_reg(instr.rt(), value as u32);
            }
            // LW / LWU
            0x23 | 0x27 => {
                let value = Self::dmem_read(bus, rs.wrapping_add(simm), 4);
                self.set_reg(instr.rt(), value);
            }
            // LBU
            0x24 => self.set_reg(instr.rt(), Self::dmem_read(bus, rs.wrapping_add(simm), 1)),
            // LHU
            0x25 => self.set_reg(instr.rt(), Self::dmem_read(bus, rs.wrapping_add(simm), 2)),
            // SB
            0x28 => Self::dmem_write(bus, rs.wrapping_add(simm), 1, rt),
            // SH
            0x29 => Self::dmem_write(bus, rs.wrapping_add(simm), 2, rt),
            // SW
            0x2B => Self::dmem_write(bus, rs.wrapping_add(simm), 4, rt),
            0x32 => self.execute_lwc2(instr, rs, bus),
            0x3A => self.execute_swc2(instr, rs, bus),
            op => log::warn!(
                "RSP: unknown opcode 0x{:02X} (0x{:08X}) at 0x{:03X}",
                op,
                word,
                current_pc
            ),
        }
        Flow::Continue
    }

    fn execute_special(&mut self, instr: Instruction, link: u32) -> Flow {
        let rs = self.reg(instr.rs());
        let rt = self.reg(instr.rt());
        let rd = instr.rd();

        match instr.funct() {
            // SLL
            0x00 => self.set_reg(rd, rt << instr.sa()),
            // SRL
            0x02 => self.set_reg(rd, rt >> instr.sa()),
            // SRA
            0x03 => self.set_reg(rd, ((rt as i32) >> instr.sa()) as u32),
            // SLLV
            0x04 => self.set_reg(rd, rt << (rs & 0x1F)),
            // SRLV
            0x06 => self.set_reg(rd, rt >> (rs & 0x1F)),
            // SRAV
            0x07 => self.set_reg(rd, ((rt as i32) >> (rs & 0x1F)) as u32),
            // JR
            0x08 => self.branch_to(rs),
            // JALR
            0x09 => {
                self.set_reg(rd, link);
                self.branch_to(rs);
            }
            // BREAK
            0x0D => return Flow::Break,
            // ADD / ADDU
            0x20 | 0x21 => self.set_reg(rd, rs.wrapping_add(rt)),
            // SUB / SUBU
            0x22 | 0x23 => self.set_reg(rd, rs.wrapping_sub(rt)),
            // AND
            0x24 => self.set_reg(rd, rs & rt),
            // OR
            0x25 => self.set_reg(rd, rs | rt),
            // XOR
            0x26 => self.set_reg(rd, rs ^ rt),
            // NOR
            0x27 => self.set_reg(rd, !(rs | rt)),
            // SLT
            0x2A => self.set_reg(rd, ((rs as i32) < (rt as i32)) as u32),
            // SLTU
            0x2B => self.set_reg(rd, (rs < rt) as u32),
            funct => log::warn!("RSP: unknown SPECIAL function 0x{:02X}", funct),
        }
        Flow::Continue
    }

    fn execute_regimm(&mut self, instr: Instruction, rs: u32, link: u32) {
        let negative = (rs as i32) < 0;
        let simm = instr.simm() as u32;
        match instr.rt() {
            // BLTZ
            0x00 => self.branch_if(negative, simm),
            // BGEZ
            0x01 => self.branch_if(!negative, simm),
            // BLTZAL
            0x10 => {
                self.set_reg(31, link);
                self.branch_if(negative, simm);
            }
            // BGEZAL
            0x11 => {
                self.set_reg(31, link);
                self.branch_if(!negative, simm);
            }
            rt => log::warn!("RSP: unknown REGIMM 0x{:02X}", rt),
        }
    }

    /// Conditional branch relative to the delay slot
    ///
    /// The delay slot always executes, taken or not.
    fn branch_if(&mut self, condition: bool, simm: u32) {
        if condition {
            let target = self.pc.wrapping_add(simm << 2);
            self.branch_to(target);
        } else {
            self.delay_slot_next = true;
        }
    }

    /// MFC0 / MTC0: registers 0-7 map to SP, 8-15 to DP
    fn execute_cop0(&mut self, instr: Instruction, bus: &mut Bus) {
        let index = (instr.rd() & 0xF) as u32;
        let address = if index < 8 {
            Bus::SP_REGS_START + index * 4
        } else {
            Bus::DP_REGS_START + (index - 8) * 4
        };

        match instr.rs() {
            0x00 => {
                let value = bus.read32(address);
                log::trace!("RSP MFC0: r{} = c{} (0x{:08X})", instr.rt(), index, value);
                self.set_reg(instr.rt(), value);
            }
            0x04 => {
                let value = self.reg(instr.rt());
                log::trace!("RSP MTC0: c{} = 0x{:08X}", index, value);
                bus.write32(address, value);
            }
            rs => log::warn!("RSP: unknown COP0 format 0x{:02X}", rs),
        }
    }
}
