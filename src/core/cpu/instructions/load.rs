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

//! Load instructions
//!
//! Every load checks natural alignment before touching memory and raises
//! AddressErrorLoad with BadVAddr set on a misaligned address. The
//! unaligned-access pairs (LWL/LWR, LDL/LDR) merge the addressed bytes into
//! the existing register contents instead.

use super::super::cop0::Cop0;
use super::super::decode::Instruction;
use super::super::{ExceptionCause, CPU};
use crate::core::memory::Bus;

impl CPU {
    /// Effective address: rs + sign_extend(offset)
    #[inline(always)]
    pub(in crate::core::cpu) fn effective_address(&self, instr: Instruction) -> u64 {
        self.reg(instr.rs()).wrapping_add(instr.simm())
    }

    /// Effective address checked against a `size`-byte alignment
    ///
    /// Raises `cause` and returns None when misaligned.
    pub(in crate::core::cpu) fn aligned_address(
        &mut self,
        instr: Instruction,
        size: u64,
        cause: ExceptionCause,
    ) -> Option<u32> {
        let vaddr = self.effective_address(instr);
        if vaddr & (size - 1) != 0 {
            self.address_error(cause, vaddr);
            None
        } else {
            Some(vaddr as u32)
        }
    }

    fn load_address(&mut self, instr: Instruction, size: u64) -> Option<u32> {
        self.aligned_address(instr, size, ExceptionCause::AddressErrorLoad)
    }

    // === Load Instructions ===

    /// LB: Load Byte (sign-extended)
    ///
    /// Format: lb rt, offset(rs)
    /// Operation: rt = sign_extend(memory[rs + offset])
    pub(in crate::core::cpu) fn op_lb(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let value = bus.read8(addr) as i8 as i64 as u64;
        self.set_reg(instr.rt(), value);
    }

    /// LBU: Load Byte Unsigned
    pub(in crate::core::cpu) fn op_lbu(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let value = bus.read8(addr) as u64;
        self.set_reg(instr.rt(), value);
    }

    /// LH: Load Halfword (sign-extended)
    pub(in crate::core::cpu) fn op_lh(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.load_address(instr, 2) {
            let value = bus.read16(addr) as i16 as i64 as u64;
            self.set_reg(instr.rt(), value);
        }
    }

    /// LHU: Load Halfword Unsigned
    pub(in crate::core::cpu) fn op_lhu(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.load_address(instr, 2) {
            let value = bus.read16(addr) as u64;
            self.set_reg(instr.rt(), value);
        }
    }

    /// LW: Load Word (sign-extended)
    ///
    /// Format: lw rt, offset(rs)
    /// Operation: rt = sign_extend(memory[rs + offset])
    pub(in crate::core::cpu) fn op_lw(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.load_address(instr, 4) {
            let value = bus.read32(addr);
            self.set_reg32(instr.rt(), value);
        }
    }

    /// LWU: Load Word Unsigned
    pub(in crate::core::cpu) fn op_lwu(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.load_address(instr, 4) {
            let value = bus.read32(addr) as u64;
            self.set_reg(instr.rt(), value);
        }
    }

    /// LD: Load Doubleword
    pub(in crate::core::cpu) fn op_ld(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.load_address(instr, 8) {
            let value = bus.read64(addr);
            self.set_reg(instr.rt(), value);
        }
    }

    // === Unaligned Loads ===

    /// LWL: Load Word Left
    ///
    /// Loads the bytes from the effective address up to the end of its
    /// aligned word into the most significant end of rt.
    ///
    /// ```text
    /// k = addr & 3, s = 8k
    /// rt = sign_extend((rt & !(0xFFFFFFFF << s)) | (word << s))
    /// ```
    pub(in crate::core::cpu) fn op_lwl(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let word = bus.read32(addr & !3);
        let shift = 8 * (addr & 3);

        let old = self.reg(instr.rt()) as u32;
        let result = (old & !(u32::MAX << shift)) | (word << shift);
        self.set_reg32(instr.rt(), result);
    }

    /// LWR: Load Word Right
    ///
    /// ```text
    /// k = addr & 3, s = 8(3 - k)
    /// rt = sign_extend((rt & !(0xFFFFFFFF >> s)) | (word >> s))
    /// ```
    pub(in crate::core::cpu) fn op_lwr(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let word = bus.read32(addr & !3);
        let shift = 8 * (3 - (addr & 3));

        let old = self.reg(instr.rt()) as u32;
        let result = (old & !(u32::MAX >> shift)) | (word >> shift);
        self.set_reg32(instr.rt(), result);
    }

    /// LDL: Load Doubleword Left
    pub(in crate::core::cpu) fn op_ldl(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let dword = bus.read64(addr & !7);
        let shift = 8 * (addr & 7);

        let old = self.reg(instr.rt());
        let result = (old & !(u64::MAX << shift)) | (dword << shift);
        self.set_reg(instr.rt(), result);
    }

    /// LDR: Load Doubleword Right
    pub(in crate::core::cpu) fn op_ldr(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let dword = bus.read64(addr & !7);
        let shift = 8 * (7 - (addr & 7));

        let old = self.reg(instr.rt());
        let result = (old & !(u64::MAX >> shift)) | (dword >> shift);
        self.set_reg(instr.rt(), result);
    }

    // === Linked Loads ===

    /// LL: Load Linked
    ///
    /// Loads a word and sets the LL bit; LLAddr receives the physical
    /// address shifted right by four.
    pub(in crate::core::cpu) fn op_ll(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.load_address(instr, 4) {
            let value = bus.read32(addr);
            self.set_reg32(instr.rt(), value);
            self.link(addr);
        }
    }

    /// LLD: Load Linked Doubleword
    pub(in crate::core::cpu) fn op_lld(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.load_address(instr, 8) {
            let value = bus.read64(addr);
            self.set_reg(instr.rt(), value);
            self.link(addr);
        }
    }

    fn link(&mut self, addr: u32) {
        self.llbit = true;
        self.cop0.regs[Cop0::LLADDR] = (Bus::translate_address(addr) >> 4) as u64;
    }

    // === FPU Loads ===

    /// LWC1: Load Word to FPU
    pub(in crate::core::cpu) fn op_lwc1(&mut self, instr: Instruction, bus: &mut Bus) {
        if !self.cop0.fpu_usable() {
            self.coprocessor_unusable(1);
            return;
        }
        if let Some(addr) = self.load_address(instr, 4) {
            let value = bus.read32(addr);
            let fr = self.cop0.fr_mode();
            self.cop1.write_word(instr.ft(), value, fr);
        }
    }

    /// LDC1: Load Doubleword to FPU
    pub(in crate::core::cpu) fn op_ldc1(&mut self, instr: Instruction, bus: &mut Bus) {
        if !self.cop0.fpu_usable() {
            self.coprocessor_unusable(1);
            return;
        }
        if let Some(addr) = self.load_address(instr, 8) {
            let value = bus.read64(addr);
            let fr = self.cop0.fr_mode();
            self.cop1.write_dword(instr.ft(), value, fr);
        }
    }
}
