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

//! Shift instructions
//!
//! The 32-bit forms operate on the low word and sign-extend the result; the
//! doubleword forms use the full register. Variable shifts take the amount
//! from the low 5 (word) or 6 (doubleword) bits of rs.

use super::super::decode::Instruction;
use super::super::CPU;

impl CPU {
    // === Word Shifts ===

    /// SLL: Shift Left Logical
    ///
    /// `sll r0, r0, 0` is the canonical NOP.
    pub(in crate::core::cpu) fn op_sll(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rt()) as u32) << instr.sa();
        self.set_reg32(instr.rd(), result);
    }

    /// SRL: Shift Right Logical
    pub(in crate::core::cpu) fn op_srl(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rt()) as u32) >> instr.sa();
        self.set_reg32(instr.rd(), result);
    }

    /// SRA: Shift Right Arithmetic
    ///
    /// Shifts the full 64-bit value so that bits above 31 feed the result,
    /// as the VR4300 does.
    pub(in crate::core::cpu) fn op_sra(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rt()) as i64) >> instr.sa();
        self.set_reg32(instr.rd(), result as u32);
    }

    /// SLLV: Shift Left Logical Variable
    pub(in crate::core::cpu) fn op_sllv(&mut self, instr: Instruction) {
        let shift = (self.reg(instr.rs()) & 0x1F) as u32;
        let result = (self.reg(instr.rt()) as u32) << shift;
        self.set_reg32(instr.rd(), result);
    }

    /// SRLV: Shift Right Logical Variable
    pub(in crate::core::cpu) fn op_srlv(&mut self, instr: Instruction) {
        let shift = (self.reg(instr.rs()) & 0x1F) as u32;
        let result = (self.reg(instr.rt()) as u32) >> shift;
        self.set_reg32(instr.rd(), result);
    }

    /// SRAV: Shift Right Arithmetic Variable
    pub(in crate::core::cpu) fn op_srav(&mut self, instr: Instruction) {
        let shift = (self.reg(instr.rs()) & 0x1F) as u32;
        let result = (self.reg(instr.rt()) as i64) >> shift;
        self.set_reg32(instr.rd(), result as u32);
    }

    // === Doubleword Shifts ===

    pub(in crate::core::cpu) fn op_dsll(&mut self, instr: Instruction) {
        let result = self.reg(instr.rt()) << instr.sa();
        self.set_reg(instr.rd(), result);
    }

    pub(in crate::core::cpu) fn op_dsrl(&mut self, instr: Instruction) {
        let result = self.reg(instr.rt()) >> instr.sa();
        self.set_reg(instr.rd(), result);
    }

    pub(in crate::core::cpu) fn op_dsra(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rt()) as i64) >> instr.sa();
        self.set_reg(instr.rd(), result as u64);
    }

    /// DSLL32: shift left by sa + 32
    pub(in crate::core::cpu) fn op_dsll32(&mut self, instr: Instruction) {
        let result = self.reg(instr.rt()) << (instr.sa() + 32);
        self.set_reg(instr.rd(), result);
    }

    /// DSRL32: shift right logical by sa + 32
    pub(in crate::core::cpu) fn op_dsrl32(&mut self, instr: Instruction) {
        let result = self.reg(instr.rt()) >> (instr.sa() + 32);
        self.set_reg(instr.rd(), result);
    }

    /// DSRA32: shift right arithmetic by sa + 32
    pub(in crate::core::cpu) fn op_dsra32(&mut self, instr: Instruction) {
        let result = (self.reg(instr.rt()) as i64) >> (instr.sa() + 32);
        self.set_reg(instr.rd(), result as u64);
    }

    pub(in crate::core::cpu) fn op_dsllv(&mut self, instr: Instruction) {
        let shift = (self.reg(instr.rs()) & 0x3F) as u32;
        self.set_reg(instr.rd(), self.reg(instr.rt()) << shift);
    }

    pub(in crate::core::cpu) fn op_dsrlv(&mut self, instr: Instruction) {
        let shift = (self.reg(instr.rs()) & 0x3F) as u32;
        self.set_reg(instr.rd(), self.reg(instr.rt()) >> shift);
    }

    pub(in crate::core::cpu) fn op_dsrav(&mut self, instr: Instruction) {
        let shift = (self.reg(instr.rs()) & 0x3F) as u32;
        let result = (self.reg(instr.rt()) as i64) >> shift;
        self.set_reg(instr.rd(), result as u64);
    }
}
