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

//! Exception-triggering instructions

use super::super::decode::Instruction;
use super::super::{ExceptionCause, CPU};

impl CPU {
    /// SYSCALL: System Call
    ///
    /// Always triggers ExceptionCause::Syscall
    pub(in crate::core::cpu) fn op_syscall(&mut self) {
        self.exception(ExceptionCause::Syscall);
    }

    /// BREAK: Breakpoint
    ///
    /// Always triggers ExceptionCause::Breakpoint
    pub(in crate::core::cpu) fn op_break(&mut self) {
        self.exception(ExceptionCause::Breakpoint);
    }

    /// CACHE: cache maintenance, a no-op without modeled caches
    pub(in crate::core::cpu) fn op_cache(&mut self, _instr: Instruction) {}

    fn trap_if(&mut self, condition: bool) {
        if condition {
            self.exception(ExceptionCause::Trap);
        }
    }

    // === Register Traps ===

    /// TGE: Trap if Greater or Equal
    pub(in crate::core::cpu) fn op_tge(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) >= (self.reg(instr.rt()) as i64);
        self.trap_if(condition);
    }

    pub(in crate::core::cpu) fn op_tgeu(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) >= self.reg(instr.rt());
        self.trap_if(condition);
    }

    /// TLT: Trap if Less Than
    pub(in crate::core::cpu) fn op_tlt(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) < (self.reg(instr.rt()) as i64);
        self.trap_if(condition);
    }

    pub(in crate::core::cpu) fn op_tltu(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) < self.reg(instr.rt());
        self.trap_if(condition);
    }

    /// TEQ: Trap if Equal
    pub(in crate::core::cpu) fn op_teq(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) == self.reg(instr.rt());
        self.trap_if(condition);
    }

    /// TNE: Trap if Not Equal
    pub(in crate::core::cpu) fn op_tne(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) != self.reg(instr.rt());
        self.trap_if(condition);
    }

    // === Immediate Traps ===

    pub(in crate::core::cpu) fn op_tgei(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) >= (instr.simm() as i64);
        self.trap_if(condition);
    }

    pub(in crate::core::cpu) fn op_tgeiu(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) >= instr.simm();
        self.trap_if(condition);
    }

    pub(in crate::core::cpu) fn op_tlti(&mut self, instr: Instruction) {
        let condition = (self.reg(instr.rs()) as i64) < (instr.simm() as i64);
        self.trap_if(condition);
    }

    pub(in crate::core::cpu) fn op_tltiu(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) < instr.simm();
        self.trap_if(condition);
    }

    pub(in crate::core::cpu) fn op_teqi(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) == instr.simm();
        self.trap_if(condition);
    }

    pub(in crate::core::cpu) fn op_tnei(&mut self, instr: Instruction) {
        let condition = self.reg(instr.rs()) != instr.simm();
        self.trap_if(condition);
    }
}
