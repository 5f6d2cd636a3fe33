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

//! Multiply and divide instructions
//!
//! Results go to HI/LO only. The 32-bit forms sign-extend each half into
//! its 64-bit register. Division by zero does not trap; the quotient and
//! remainder take the values the VR4300 produces:
//!
//! | Case              | LO                    | HI  |
//! |-------------------|-----------------------|-----|
//! | signed, rt = 0    | rs < 0 ? 1 : -1       | rs  |
//! | unsigned, rt = 0  | all ones              | rs  |
//! | MIN / -1          | MIN                   | 0   |

use super::super::decode::{sext32, Instruction};
use super::super::CPU;

impl CPU {
    // === Word Multiply/Divide ===

    /// MULT: Multiply (signed)
    ///
    /// Format: mult rs, rt
    /// Operation: (HI, LO) = rs * rt
    pub(in crate::core::cpu) fn op_mult(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as i32 as i64;
        let b = self.reg(instr.rt()) as i32 as i64;
        let result = (a * b) as u64;

        self.lo = sext32(result);
        self.hi = sext32(result >> 32);
    }

    /// MULTU: Multiply Unsigned
    pub(in crate::core::cpu) fn op_multu(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as u32 as u64;
        let b = self.reg(instr.rt()) as u32 as u64;
        let result = a * b;

        self.lo = sext32(result);
        self.hi = sext32(result >> 32);
    }

    /// DIV: Divide (signed)
    ///
    /// Format: div rs, rt
    /// Operation: LO = rs / rt, HI = rs % rt
    pub(in crate::core::cpu) fn op_div(&mut self, instr: Instruction) {
        let n = self.reg(instr.rs()) as i32;
        let d = self.reg(instr.rt()) as i32;

        let (quotient, remainder) = if d == 0 {
            (if n < 0 { 1 } else { -1 }, n)
        } else if n == i32::MIN && d == -1 {
            (i32::MIN, 0)
        } else {
            (n / d, n % d)
        };

        self.lo = quotient as i64 as u64;
        self.hi = remainder as i64 as u64;
    }

    /// DIVU: Divide Unsigned
    pub(in crate::core::cpu) fn op_divu(&mut self, instr: Instruction) {
        let n = self.reg(instr.rs()) as u32;
        let d = self.reg(instr.rt()) as u32;

        let (quotient, remainder) = if d == 0 {
            (u32::MAX, n)
        } else {
            (n / d, n % d)
        };

        self.lo = sext32(quotient as u64);
        self.hi = sext32(remainder as u64);
    }

    // === Doubleword Multiply/Divide ===

    /// DMULT: Doubleword Multiply (signed, 128-bit product)
    pub(in crate::core::cpu) fn op_dmult(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as i64 as i128;
        let b = self.reg(instr.rt()) as i64 as i128;
        let result = (a * b) as u128;

        self.lo = result as u64;
        self.hi = (result >> 64) as u64;
    }

    /// DMULTU: Doubleword Multiply Unsigned
    pub(in crate::core::cpu) fn op_dmultu(&mut self, instr: Instruction) {
        let a = self.reg(instr.rs()) as u128;
        let b = self.reg(instr.rt()) as u128;
        let result = a * b;

        self.lo = result as u64;
        self.hi = (result >> 64) as u64;
    }

    pub(in crate::core::cpu) fn op_ddiv(&mut self, instr: Instruction) {
        let n = self.reg(instr.rs()) as i64;
        let d = self.reg(instr.rt()) as i64;

        let (quotient, remainder) = if d == 0 {
            (if n < 0 { 1 } else { -1 }, n)
        } else if n == i64::MIN && d == -1 {
            (i64::MIN, 0)
        } else {
            (n / d, n % d)
        };

        self.lo = quotient as u64;
        self.hi = remainder as u64;
    }

    pub(in crate::core::cpu) fn op_ddivu(&mut self, instr: Instruction) {
        let n = self.reg(instr.rs());
        let d = self.reg(instr.rt());

        let (quotient, remainder) = if d == 0 { (u64::MAX, n) } else { (n / d, n % d) };

        self.lo = quotient;
        self.hi = remainder;
    }

    // === HI/LO Moves ===

    /// MFHI: Move From HI
    pub(in crate::core::cpu) fn op_mfhi(&mut self, instr: Instruction) {
        self.set_reg(instr.rd(), self.hi);
    }

    /// MFLO: Move From LO
    pub(in crate::core::cpu) fn op_mflo(&mut self, instr: Instruction) {
        self.set_reg(instr.rd(), self.lo);
    }

    /// MTHI: Move To HI
    pub(in crate::core::cpu) fn op_mthi(&mut self, instr: Instruction) {
        self.hi = self.reg(instr.rs());
    }

    /// MTLO: Move To LO
    pub(in crate::core::cpu) fn op_mtlo(&mut self, instr: Instruction) {
        self.lo = self.reg(instr.rs());
    }
}
