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
use super::super::CPU;

impl CPU {
    // === Branch Helpers ===

    /// Resolve a conditional branch
    ///
    /// The delay slot always executes. A taken branch points `next_pc` at
    /// `delay_slot + (sign_extend(imm) << 2)`; `pc` already holds the delay
    /// slot address at this point.
    pub(in crate::core::cpu) fn branch(&mut self, condition: bool, instr: Instruction) {
        self.delay_slot_next = true;
        if condition {
            self.next_pc = self.pc.wrapping_add(instr.branch_offset());
            self.branch_taken = true;
        }
    }

    /// Resolve a branch-likely
    ///
    /// When not taken the delay slot is nullified: it is skipped without
    /// executing.
    pub(in crate::core::cpu) fn branch_likely(&mut self, condition: bool, instr: Instruction) {
        if condition {
            self.branch(true, instr);
        } else {
            self.pc = self.next_pc;
            self.next_pc = self.next_pc.wrapping_add(4);
        }
    }

    /// Return address for linking branches and jumps
    #[inline(always)]
    pub(in crate::core::cpu) fn link_address(&self) -> u64 {
        self.current_pc.wrapping_add(8)
    }

    // === Branch Instructions ===

    /// BEQ: Branch on Equal
    ///
    /// Format: beq rs, rt, offset
    /// Operation: if (rs == rt) PC = delay_slot + (sign_extend(offset) << 2)
    pub(in crate::core::cpu) fn op_beq(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) == self.reg(instr.rt());
        self.branch(condition, instr);
    }

    /// BNE: Branch on Not Equal
    pub(in crate::core::cpu) fn op_bne(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) != self.reg(instr.rt());
        self.branch(condition, instr);
    }

    /// BLEZ: Branch on Less Than or Equal to Zero
    pub(in crate::core::cpu) fn op_blez(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) <= 0;
        self.branch(condition, instr);
    }

    /// BGTZ: Branch on Greater Than Zero
    pub(in crate::core::cpu) fn op_bgtz(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) > 0;
        self.branch(condition, instr);
    }

    // === Branch Likely ===

    pub(in crate::core::cpu) fn op_beql(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) == self.reg(instr.rt());
        self.branch_likely(condition, instr);
    }

    pub(in crate::core::cpu) fn op_bnel(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) != self.reg(instr.rt());
        self.branch_likely(condition, instr);
    }

    pub(in crate::core::cpu) fn op_blezl(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) <= 0;
        self.branch_likely(condition, instr);
    }

    pub(in crate::core::cpu) fn op_bgtzl(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) > 0;
        self.branch_likely(condition, instr);
    }

    // === REGIMM Branches ===

    /// BLTZ: Branch on Less Than Zero
    pub(in crate::core::cpu) fn op_bltz(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) < 0;
        self.branch(condition, instr);
    }

    /// BGEZ: Branch on Greater Than or Equal to Zero
    pub(in crate::core::cpu) fn op_bgez(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) >= 0;
        self.branch(condition, instr);
    }

    pub(in crate::core::cpu) fn op_bltzl(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) < 0;
        self.branch_likely(condition, instr);
    }

    pub(in crate::core::cpu) fn op_bgezl(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) >= 0;
        self.branch_likely(condition, instr);
    }

    /// BLTZAL: Branch on Less Than Zero And Link
    ///
    /// r31 receives the return address whether or not the branch is taken.
    pub(in crate::core::cpu) fn op_bltzal(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) < 0;
        self.set_reg(31, self.link_address());
        self.branch(condition, instr);
    }

    /// BGEZAL: Branch on Greater Than or Equal to Zero And Link
    pub(in crate::core::cpu) fn op_bgezal(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) >= 0;
        self.set_reg(31, self.link_address());
        self.branch(condition, instr);
    }

    pub(in crate::core::cpu) fn op_bltzall(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) < 0;
        self.set_reg(31, self.link_address());
        self.branch_likely(condition, instr);
    }

    pub(in crate::core::cpu) fn op_bgezall(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) >= 0;
        self.set_reg(31, self.link_address());
        self.branch_likely(condition, instr);
    }
}
