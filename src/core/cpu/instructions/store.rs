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
use crate::core::memory::Bus;

impl CPU {
    fn store_address(&mut self, instr: Instruction, size: u64) -> Option<u32> {
        self.aligned_address(instr, size, ExceptionCause::AddressErrorStore)
    }

    // === Store Instructions ===

    /// SB: Store Byte
    ///
    /// Format: sb rt, offset(rs)
    /// Operation: memory[rs + offset] = rt & 0xFF
    pub(in crate::core::cpu) fn op_sb(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        bus.write8(addr, self.reg(instr.rt()) as u8);
    }

    /// SH: Store Halfword
    pub(in crate::core::cpu) fn op_sh(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.store_address(instr, 2) {
            bus.write16(addr, self.reg(instr.rt()) as u16);
        }
    }

    /// SW: Store Word
    ///
    /// Format: sw rt, offset(rs)
    /// Operation: memory[rs + offset] = rt & 0xFFFFFFFF
    pub(in crate::core::cpu) fn op_sw(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.store_address(instr, 4) {
            bus.write32(addr, self.reg(instr.rt()) as u32);
        }
    }

    /// SD: Store Doubleword
    pub(in crate::core::cpu) fn op_sd(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.store_address(instr, 8) {
            bus.write64(addr, self.reg(instr.rt()));
        }
    }

    // === Unaligned Stores ===

    /// SWL: Store Word Left
    ///
    /// Stores the most significant bytes of rt from the effective address up
    /// to the end of its aligned word.
    ///
    /// ```text
    /// k = addr & 3, s = 8k
    /// word = (word & !(0xFFFFFFFF >> s)) | (rt >> s)
    /// ```
    pub(in crate::core::cpu) fn op_swl(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let aligned = addr & !3;
        let shift = 8 * (addr & 3);

        let word = bus.read32(aligned);
        let value = self.reg(instr.rt()) as u32;
        bus.write32(aligned, (word & !(u32::MAX >> shift)) | (value >> shift));
    }

    /// SWR: Store Word Right
    ///
    /// ```text
    /// k = addr & 3, s = 8(3 - k)
    /// word = (word & !(0xFFFFFFFF << s)) | (rt << s)
    /// ```
    pub(in crate::core::cpu) fn op_swr(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let aligned = addr & !3;
        let shift = 8 * (3 - (addr & 3));

        let word = bus.read32(aligned);
        let value = self.reg(instr.rt()) as u32;
        bus.write32(aligned, (word & !(u32::MAX << shift)) | (value << shift));
    }

    /// SDL: Store Doubleword Left
    pub(in crate::core::cpu) fn op_sdl(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let aligned = addr & !7;
        let shift = 8 * (addr & 7);

        let dword = bus.read64(aligned);
        let value = self.reg(instr.rt());
        bus.write64(aligned, (dword & !(u64::MAX >> shift)) | (value >> shift));
    }

    /// SDR: Store Doubleword Right
    pub(in crate::core::cpu) fn op_sdr(&mut self, instr: Instruction, bus: &mut Bus) {
        let addr = self.effective_address(instr) as u32;
        let aligned = addr & !7;
        let shift = 8 * (7 - (addr & 7));

        let dword = bus.read64(aligned);
        let value = self.reg(instr.rt());
        bus.write64(aligned, (dword & !(u64::MAX << shift)) | (value << shift));
    }

    // === Conditional Stores ===

    /// SC: Store Conditional
    ///
    /// Stores only while the LL bit is set; rt receives 1 on success and 0
    /// on failure.
    pub(in crate::core::cpu) fn op_sc(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.store_address(instr, 4) {
            let success = self.llbit;
            if success {
                bus.write32(addr, self.reg(instr.rt()) as u32);
            }
            self.set_reg(instr.rt(), success as u64);
        }
    }

    /// SCD: Store Conditional Doubleword
    pub(in crate::core::cpu) fn op_scd(&mut self, instr: Instruction, bus: &mut Bus) {
        if let Some(addr) = self.store_address(instr, 8) {
            let success = self.llbit;
            if success {
                bus.write64(addr, self.reg(instr.rt()));
            }
            self.set_reg(instr.rt(), success as u64);
        }
    }

    // === FPU Stores ===

    /// SWC1: Store Word from FPU
    pub(in crate::core::cpu) fn op_swc1(&mut self, instr: Instruction, bus: &mut Bus) {
        if !self.cop0.fpu_usable() {
            self.coprocessor_unusable(1);
            return;
        }
        if let Some(addr) = self.store_address(instr, 4) {
            let fr = self.cop0.fr_mode();
            bus.write32(addr, self.cop1.read_word(instr.ft(), fr));
        }
    }

    /// SDC1: Store Doubleword from FPU
    pub(in crate::core::cpu) fn op_sdc1(&mut self, instr: Instruction, bus: &mut Bus) {
        if !self.cop0.fpu_usable() {
            self.coprocessor_unusable(1);
            return;
        }
        if let Some(addr) = self.store_address(instr, 8) {
            let fr = self.cop0.fr_mode();
            bus.write64(addr, self.cop1.read_dword(instr.ft(), fr));
        }
    }
}
