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

//! COP0 (System Control) instructions

use super::super::cop0::{status, Cop0};
use super::super::decode::{sext32, Instruction};
use super::super::{ExceptionCause, CPU};

impl CPU {
    /// MFC0: Move From Coprocessor 0
    ///
    /// Format: mfc0 rt, rd
    /// Operation: rt = sign_extend(cop0[rd] & 0xFFFFFFFF)
    pub(in crate::core::cpu) fn op_mfc0(&mut self, instr: Instruction) {
        let value = self.cop0.read(instr.rd());
        self.set_reg(instr.rt(), sext32(value));
    }

    /// DMFC0: Doubleword Move From Coprocessor 0
    pub(in crate::core::cpu) fn op_dmfc0(&mut self, instr: Instruction) {
        let value = self.cop0.read(instr.rd());
        self.set_reg(instr.rt(), value);
    }

    /// MTC0: Move To Coprocessor 0
    ///
    /// Format: mtc0 rt, rd
    /// Operation: cop0[rd] = sign_extend(rt & 0xFFFFFFFF)
    pub(in crate::core::cpu) fn op_mtc0(&mut self, instr: Instruction) {
        let value = sext32(self.reg(instr.rt()));
        log::trace!("MTC0 r{} = 0x{:08X}", instr.rd(), value as u32);
        self.cop0.write(instr.rd(), value);
    }

    /// DMTC0: Doubleword Move To Coprocessor 0
    pub(in crate::core::cpu) fn op_dmtc0(&mut self, instr: Instruction) {
        let value = self.reg(instr.rt());
        self.cop0.write(instr.rd(), value);
    }

    /// TLBR / TLBWI / TLBWR / TLBP
    ///
    /// No TLB is modeled; every segment is direct-mapped.
    pub(in crate::core::cpu) fn op_tlb(&mut self, instr: Instruction) {
        log::debug!(
            "TLB instruction 0x{:08X} ignored at PC=0x{:016X}",
            instr.0,
            self.current_pc
        );
    }

    /// ERET: Return From Exception
    ///
    /// Resumes at ErrorEPC when Status.ERL is set, otherwise at EPC, and
    /// clears ERL or EXL. The LL bit and the latched Cause.IP2 are cleared.
    /// ERET has no delay slot.
    pub(in crate::core::cpu) fn op_eret(&mut self) {
        if self.in_delay_slot {
            self.exception(ExceptionCause::ReservedInstruction);
            return;
        }

        let sr = self.cop0.status();
        let target = if sr & status::ERL != 0 {
            self.cop0.regs[Cop0::STATUS] = sr & !status::ERL;
            self.cop0.regs[Cop0::ERROREPC]
        } else {
            self.cop0.regs[Cop0::STATUS] = sr & !status::EXL;
            self.cop0.regs[Cop0::EPC]
        };

        self.llbit = false;
        self.cop0.set_ip2(false);

        log::trace!("ERET to 0x{:016X}", target);

        self.pc = target;
        self.next_pc = target.wrapping_add(4);
    }
}
