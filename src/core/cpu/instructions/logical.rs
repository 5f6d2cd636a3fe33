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
    // === Logical Instructions ===

    /// LUI: Load Upper Immediate
    ///
    /// Format: lui rt, imm
    /// Operation: rt = sign_extend(imm << 16)
    pub(in crate::core::cpu) fn op_lui(&mut self, instr: Instruction) {
        self.set_reg32(instr.rt(), (instr.imm() as u32) << 16);
    }

    /// AND: Bitwise AND
    pub(in crate::core::cpu) fn op_and(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()) & self.reg(instr.rt());
        self.set_reg(instr.rd(), result);
    }

    /// ANDI: AND Immediate (zero-extended)
    pub(in crate::core::cpu) fn op_andi(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()) & instr.imm();
        self.set_reg(instr.rt(), result);
    }

    /// OR: Bitwise OR
    pub(in crate::core::cpu) fn op_or(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()) | self.reg(instr.rt());
        self.set_reg(instr.rd(), result);
    }

    /// ORI: OR Immediate (zero-extended)
    pub(in crate::core::cpu) fn op_ori(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()) | instr.imm();
        self.set_reg(instr.rt(), result);
    }

    /// XOR: Bitwise XOR
    pub(in crate::core::cpu) fn op_xor(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()) ^ self.reg(instr.rt());
        self.set_reg(instr.rd(), result);
    }

    /// XORI: XOR Immediate (zero-extended)
    pub(in crate::core::cpu) fn op_xori(&mut self, instr: Instruction) {
        let result = self.reg(instr.rs()) ^ instr.imm();
        self.set_reg(instr.rt(), result);
    }

    /// NOR: Bitwise NOR
    ///
    /// Format: nor rd, rs, rt
    /// Operation: rd = !(rs | rt)
    pub(in crate::core::cpu) fn op_nor(&mut self, instr: Instruction) {
        let result = !(self.reg(instr.rs()) | self.reg(instr.rt()));
        self.set_reg(instr.rd(), result);
    }
}
