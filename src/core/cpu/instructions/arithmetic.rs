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

use super::super::decode::Instruction;
use super::super::{ExceptionCause, CPU};

impl CPU {
    // === Arithmetic Instructions ===

    /// ADD: Add (with overflow exception)
    ///
    /// Adds the low 32 bits of two registers with signed overflow detection.
    /// On overflow the destination is left unchanged.
    ///
    /// Format: add rd, rs, rt
    /// Operation: rd = sign_extend(rs + rt)
    pub(in crate::core::cpu) fn op_add(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as i32;
        let b = self.reg(instr.rt()) as i32;

        match a.checked_add(b) {
            Some(result) => self.set_reg32(instr.rd(), result as u32),
            None => self.exception(ExceptionCause::Overflow),
        }
    }

    /// ADDU: Add Unsigned (no overflow exception)
    ///
    /// Format: addu rd, rs, rt
    /// Operation: rd = sign_extend(rs + rt)
    pub(in crate::core::cpu) fn op_addu(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rs()) as u32).wrapping_add(self.reg(instr.rt()) as u32);
        self.set_reg32(instr.rd(), result);
    }

    /// ADDI: Add Immediate (with overflow exception)
    ///
    /// Format: addi rt, rs, imm
    /// Operation: rt = sign_extend(rs + sign_extend(imm))
    pub(in crate::core::cpu) fn op_addi(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as i32;
        let imm = instr.simm() as i32;

        match a.checked_add(imm) {
            Some(result) => self.set_reg32(instr.rt(), result as u32),
            None => self.exception(ExceptionCause::Overflow),
        }
    }

    /// ADDIU: Add Immediate Unsigned (no overflow exception)
    ///
    /// Despite the name "unsigned", the immediate is sign-extended.
    ///
    /// Format: addiu rt, rs, imm
    /// Operation: rt = sign_extend(rs + sign_extend(imm))
    pub(in crate::core::cpu) fn op_addiu(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rs()) as u32).wrapping_add(instr.simm() as u32);
        self.set_reg32(instr.rt(), result);
    }

    /// SUB: Subtract (with overflow exception)
    ///
    /// Format: sub rd, rs, rt
    /// Operation: rd = sign_extend(rs - rt)
    pub(in crate::core::cpu) fn op_sub(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as i32;
        let b = self.reg(instr.rt()) as i32;

        match a.checked_sub(b) {
            Some(result) => self.set_reg32(instr.rd(), result as u32),
            None => self.exception(ExceptionCause::Overflow),
        }
    }

    /// SUBU: Subtract Unsigned (no overflow exception)
    ///
    /// Format: subu rd, rs, rt
    /// Operation: rd = sign_extend(rs - rt)
    pub(in crate::core::cpu) fn op_subu(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rs()) as u32).wrapping_sub(self.reg(instr.rt()) as u32);
        self.set_reg32(instr.rd(), result);
    }

    // === Doubleword Arithmetic ===

    /// DADD: Doubleword Add (with overflow exception)
    ///
    /// Format: dadd rd, rs, rt
    /// Operation: rd = rs + rt
    pub(in crate::core::cpu) fn op_dadd(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as i64;
        let b = self.reg(instr.rt()) as i64;

        match a.checked_add(b) {
            Some(result) => self.set_reg(instr.rd(), result as u64),
            None => self.exception(ExceptionCause::Overflow),
        }
    }

    /// DADDU: Doubleword Add Unsigned
    pub(in crate::core::cpu) fn op_daddu(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()).wrapping_add(self.reg(instr.rt()));
        self.set_reg(instr.rd(), result);
    }

    /// DADDI: Doubleword Add Immediate (with overflow exception)
    pub(in crate::core::cpu) fn op_daddi(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as i64;

        match a.checked_add(instr.simm() as i64) {
            Some(result) => self.set_reg(instr.rt(), result as u64),
            None => self.exception(ExceptionCause::Overflow),
        }
    }

    /// DADDIU: Doubleword Add Immediate Unsigned
    pub(in crate::core::cpu) fn op_daddiu(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()).wrapping_add(instr.simm());
        self.set_reg(instr.rt(), result);
    }

    /// DSUB: Doubleword Subtract (with overflow exception)
    pub(in crate::core::cpu) fn op_dsub(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as i64;
        let b = self.reg(instr.rt()) as i64;

        match a.checked_sub(b) {
            Some(result) => self.set_reg(instr.rd(), result as u64),
            None => self.exception(ExceptionCause::Overflow),
        }
    }

    /// DSUBU: Doubleword Subtract Unsigned
    pub(in crate::core::cpu) fn op_dsubu(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()).wrapping_sub(self.reg(instr.rt()));
        self.set_reg(instr.rd(), result);
    }

    // === Comparison ===

    /// SLT: Set on Less Than (signed)
    ///
    /// Format: slt rd, rs, rt
    /// Operation: rd = (rs < rt) ? 1 : 0
    pub(in crate::core::cpu) fn op_slt(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rs()) as i64) < (self.reg(instr.rt()) as i64);
        self.set_reg(instr.rd(), result as u64);
    }

    /// SLTU: Set on Less Than Unsigned
    pub(in crate::core::cpu) fn op_sltu(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()) < self.reg(instr.rt());
        self.set_reg(instr.rd(), result as u64);
    }

    /// SLTI: Set on Less Than Immediate (signed)
    ///
    /// Format: slti rt, rs, imm
    /// Operation: rt = (rs < sign_extend(imm)) ? 1 : 0
    pub(in crate::core::cpu) fn op_slti(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rs()) as i64) < (instr.simm() as i64);
        self.set_reg(instr.rt(), result as u64);
    }

    /// SLTIU: Set on Less Than Immediate Unsigned
    ///
    /// The immediate is sign-extended, then compared as unsigned.
    pub(in crate::core::cpu) fn op_sltiu(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()) < instr.simm();
        self.set_reg(instr.rt(), result as u64);
    }
}
