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
    // === Jump Instructions ===

    /// Schedule an unconditional transfer after the delay slot
    fn jump_to(&mut self, target: u64) {
        self.next_pc = target;
        self.branch_taken = true;
        self.delay_slot_next = true;
    }

    /// J: Jump
    ///
    /// The target keeps the upper bits of the delay slot address and
    /// replaces the low 28 bits with `target << 2`.
    ///
    /// Format: j target
    /// Operation: PC = (delay_slot & 0xFFFF_FFFF_F000_0000) | (target << 2)
    pub(in crate::core::cpu) fn op_j(&mut self, instr: Instruction) {
        let target = (self.pc & 0xFFFF_FFFF_F000_0000) | (instr.target() << 2);
        self.jump_to(target);
    }

    /// JAL: Jump And Link
    ///
    /// Format: jal target
    /// Operation: r31 = PC + 8; PC = (delay_slot & 0xFFFF_FFFF_F000_0000) | (target << 2)
    pub(in crate::core::cpu) fn op_jal(&mut self, instr: Instruction) {
        self.set_reg(31, self.link_address());
        self.op_j(instr);
    }

    /// JR: Jump Register
    ///
    /// Format: jr rs
    /// Operation: PC = rs
    pub(in crate::core::cpu) fn op_jr(&mut self, instr: Instruction) {
        let target = self.reg(instr.rs());
        self.jump_to(target);
    }

    /// JALR: Jump And Link Register
    ///
    /// The target is read before rd is written, so `jalr r31, r31` works.
    ///
    /// Format: jalr rd, rs
    /// Operation: rd = PC + 8; PC = rs
    pub(in crate::core::cpu) fn op_jalr(&mut self, instr: Instruction) {
        let target = self.reg(instr.rs());
        self.set_reg(instr.rd(), self.link_address());
        self.jump_to(target);
    }
}
