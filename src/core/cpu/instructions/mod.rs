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

//! CPU instruction implementations
//!
//! This module contains all VR4300 instruction implementations, organized
//! by instruction type.

use super::decode::Instruction;
use super::{ExceptionCause, CPU};
use crate::core::memory::Bus;

// Instruction modules organized by type
mod arithmetic;
mod branch;
mod cop0;
mod cop1;
mod exception;
mod jump;
mod load;
mod logical;
mod multiply;
mod shift;
mod store;

impl CPU {
    /// Decode and execute the current instruction
    ///
    /// Dispatches on the primary opcode (upper 6 bits). Undecodable opcodes
    /// raise ReservedInstruction.
    pub(super) fn execute_instruction(&mut self, bus: &mut Bus) {
        let instr = Instruction(self.current_instruction);

        match instr.op() {
            0x00 => self.execute_special(instr),
            0x01 => self.execute_regimm(instr),
            0x02 => self.op_j(instr),             // J
            0x03 => self.op_jal(instr),           // JAL
            0x04 => self.op_beq(instr),           // BEQ
            0x05 => self.op_bne(instr),           // BNE
            0x06 => self.op_blez(instr),          // BLEZ
            0x07 => self.op_bgtz(instr),          // BGTZ
            0x08 => self.op_addi(instr),          // ADDI
            0x09 => self.op_addiu(instr),         // ADDIU
            0x0A => self.op_slti(instr),          // SLTI
            0x0B => self.op_sltiu(instr),         // SLTIU
            0x0C => self.op_andi(instr),          // ANDI
            0x0D => self.op_ori(instr),           // ORI
            0x0E => self.op_xori(instr),          // XORI
            0x0F => self.op_lui(instr),           // LUI
            0x10 => self.execute_cop0(instr),     // COP0
            0x11 => self.execute_cop1(instr),     // COP1
            0x12 | 0x13 => self.op_cop_unimplemented(instr), // COP2 / COP3
            0x14 => self.op_beql(instr),          // BEQL
            0x15 => self.op_bnel(instr),          // BNEL
            0x16 => self.op_blezl(instr),         // BLEZL
            0x17 => self.op_bgtzl(instr),         // BGTZL
            0x18 => self.op_daddi(instr),         // DADDI
            0x19 => self.op_daddiu(instr),        // DADDIU
            0x1A => self.op_ldl(instr, bus),      // LDL
            0x1B => self.op_ldr(instr, bus),      // LDR
            0x20 => self.op_lb(instr, bus),       // LB
            0x21 => self.op_lh(instr, bus),       // LH
            0x22 => self.op_lwl(instr, bus),      // LWL
            0x23 => self.op_lw(instr, bus),       // LW
            0x24 => self.op_lbu(instr, bus),      // LBU
            0x25 => self.op_lhu(instr, bus),      // LHU
            0x26 => self.op_lwr(instr, bus),      // LWR
            0x27 => self.op_lwu(instr, bus),      // LWU
            0x28 => self.op_sb(instr, bus),       // SB
            0x29 => self.op_sh(instr, bus),       // SH
            0x2A => self.op_swl(instr, bus),      // SWL
            0x2B => self.op_sw(instr, bus),       // SW
            0x2C => self.op_sdl(instr, bus),      // SDL
            0x2D => self.op_sdr(instr, bus),      // SDR
            0x2E => self.op_swr(instr, bus),      // SWR
            0x2F => self.op_cache(instr),         // CACHE
            0x30 => self.op_ll(instr, bus),       // LL
            0x31 => self.op_lwc1(instr, bus),     // LWC1
            0x34 => self.op_lld(instr, bus),      // LLD
            0x35 => self.op_ldc1(instr, bus),     // LDC1
            0x37 => self.op_ld(instr, bus),       // LD
            0x38 => self.op_sc(instr, bus),       // SC
            0x39 => self.op_swc1(instr, bus),     // SWC1
            0x3C => self.op_scd(instr, bus),      // SCD
            0x3D => self.op_sdc1(instr, bus),     // SDC1
            0x3F => self.op_sd(instr, bus),       // SD
            _ => self.reserved_instruction(),
        }
    }

    /// Handle SPECIAL instructions (opcode 0x00)
    ///
    /// SPECIAL instructions use the lower 6 bits (funct field) to determine
    /// the specific operation.
    fn execute_special(&mut self, instr: Instruction) {
        match instr.funct() {
            0x00 => self.op_sll(instr),    // SLL
            0x02 => self.op_srl(instr),    // SRL
            0x03 => self.op_sra(instr),    // SRA
            0x04 => self.op_sllv(instr),   // SLLV
            0x06 => self.op_srlv(instr),   // SRLV
            0x07 => self.op_srav(instr),   // SRAV
            0x08 => self.op_jr(instr),     // JR
            0x09 => self.op_jalr(instr),   // JALR
            0x0C => self.op_syscall(),     // SYSCALL
            0x0D => self.op_break(),       // BREAK
            0x0F => {}                     // SYNC
            0x10 => self.op_mfhi(instr),   // MFHI
            0x11 => self.op_mthi(instr),   // MTHI
            0x12 => self.op_mflo(instr),   // MFLO
            0x13 => self.op_mtlo(instr),   // MTLO
            0x14 => self.op_dsllv(instr),  // DSLLV
            0x16 => self.op_dsrlv(instr),  // DSRLV
            0x17 => self.op_dsrav(instr),  // DSRAV
            0x18 => self.op_mult(instr),   // MULT
            0x19 => self.op_multu(instr),  // MULTU
            0x1A => self.op_div(instr),    // DIV
            0x1B => self.op_divu(instr),   // DIVU
            0x1C => self.op_dmult(instr),  // DMULT
            0x1D => self.op_dmultu(instr), // DMULTU
            0x1E => self.op_ddiv(instr),   // DDIV
            0x1F => self.op_ddivu(instr),  // DDIVU
            0x20 => self.op_add(instr),    // ADD
            0x21 => self.op_addu(instr),   // ADDU
            0x22 => self.op_sub(instr),    // SUB
            0x23 => self.op_subu(instr),   // SUBU
            0x24 => self.op_and(instr),    // AND
            0x25 => self.op_or(instr),     // OR
            0x26 => self.op_xor(instr),    // XOR
            0x27 => self.op_nor(instr),    // NOR
            0x2A => self.op_slt(instr),    // SLT
            0x2B => self.op_sltu(instr),   // SLTU
            0x2C => self.op_dadd(instr),   // DADD
            0x2D => self.op_daddu(instr),  // DADDU
            0x2E => self.op_dsub(instr),   // DSUB
            0x2F => self.op_dsubu(instr),  // DSUBU
            0x30 => self.op_tge(instr),    // TGE
            0x31 => self.op_tgeu(instr),   // TGEU
            0x32 => self.op_tlt(instr),    // TLT
            0x33 => self.op_tltu(instr),   // TLTU
            0x34 => self.op_teq(instr),    // TEQ
            0x36 => self.op_tne(instr),    // TNE
            0x38 => self.op_dsll(instr),   // DSLL
            0x3A => self.op_dsrl(instr),   // DSRL
            0x3B => self.op_dsra(instr),   // DSRA
            0x3C => self.op_dsll32(instr), // DSLL32
            0x3E => self.op_dsrl32(instr), // DSRL32
            0x3F => self.op_dsra32(instr), // DSRA32
            _ => self.reserved_instruction(),
        }
    }

    /// Handle REGIMM instructions (opcode 0x01)
    ///
    /// The rt field selects the branch or trap-immediate variant.
    fn execute_regimm(&mut self, instr: Instruction) {
        match instr.rt() {
            0x00 => self.op_bltz(instr),    // BLTZ
            0x01 => self.op_bgez(instr),    // BGEZ
            0x02 => self.op_bltzl(instr),   // BLTZL
            0x03 => self.op_bgezl(instr),   // BGEZL
            0x08 => self.op_tgei(instr),    // TGEI
            0x09 => self.op_tgeiu(instr),   // TGEIU
            0x0A => self.op_tlti(instr),    // TLTI
            0x0B => self.op_tltiu(instr),   // TLTIU
            0x0C => self.op_teqi(instr),    // TEQI
            0x0E => self.op_tnei(instr),    // TNEI
            0x10 => self.op_bltzal(instr),  // BLTZAL
            0x11 => self.op_bgezal(instr),  // BGEZAL
            0x12 => self.op_bltzall(instr), // BLTZALL
            0x13 => self.op_bgezall(instr), // BGEZALL
            _ => self.reserved_instruction(),
        }
    }

    /// Handle COP0 instructions (opcode 0x10)
    fn execute_cop0(&mut self, instr: Instruction) {
        match instr.rs() {
            0x00 => self.op_mfc0(instr),  // MFC0
            0x01 => self.op_dmfc0(instr), // DMFC0
            0x04 => self.op_mtc0(instr),  // MTC0
            0x05 => self.op_dmtc0(instr), // DMTC0
            0x10..=0x1F => match instr.funct() {
                0x01 | 0x02 | 0x06 | 0x08 => self.op_tlb(instr), // TLBR / TLBWI / TLBWR / TLBP
                0x18 => self.op_eret(),                          // ERET
                funct => {
                    log::warn!(
                        "Unimplemented COP0 function: 0x{:02X} at PC=0x{:016X}",
                        funct,
                        self.current_pc
                    );
                    self.reserved_instruction();
                }
            },
            _ => self.reserved_instruction(),
        }
    }

    /// Handle COP1 instructions (opcode 0x11)
    ///
    /// Every COP1 instruction first checks Status.CU1.
    fn execute_cop1(&mut self, instr: Instruction) {
        if !self.cop0.fpu_usable() {
            self.coprocessor_unusable(1);
            return;
        }

        match instr.fmt() {
            0x00 => self.op_mfc1(instr),  // MFC1
            0x01 => self.op_dmfc1(instr), // DMFC1
            0x02 => self.op_cfc1(instr),  // CFC1
            0x04 => self.op_mtc1(instr),  // MTC1
            0x05 => self.op_dmtc1(instr), // DMTC1
            0x06 => self.op_ctc1(instr),  // CTC1
            0x08 => self.op_bc1(instr),   // BC1F / BC1T / BC1FL / BC1TL
            0x10 | 0x11 | 0x14 | 0x15 => self.execute_fpu_arithmetic(instr),
            _ => self.reserved_instruction(),
        }
    }

    /// COP2/COP3: usable-bit check, then ignored
    fn op_cop_unimplemented(&mut self, instr: Instruction) {
        let cop = instr.op() & 3;
        if !self.cop0.coprocessor_usable(cop) {
            self.coprocessor_unusable(cop);
            return;
        }
        log::debug!(
            "COP{} instruction 0x{:08X} ignored at PC=0x{:016X}",
            cop,
            instr.0,
            self.current_pc
        );
    }

    pub(super) fn reserved_instruction(&mut self) {
        log::warn!(
            "Reserved instruction 0x{:08X} at PC=0x{:016X}",
            self.current_instruction,
            self.current_pc
        );
        self.exception(ExceptionCause::ReservedInstruction);
    }
}
