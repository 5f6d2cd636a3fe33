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

//! Instruction field extraction
//!
//! ```text
//! R-type: | op (6) | rs (5) | rt (5) | rd (5) | sa (5) | funct (6) |
//! I-type: | op (6) | rs (5) | rt (5) |       immediate (16)        |
//! J-type: | op (6) |               target (26)                    |
//! FPU:    | op (6) | fmt(5) | ft (5) | fs (5) | fd (5) | funct (6) |
//! ```

/// A fetched instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction(pub u32);

impl Instruction {
    /// Primary opcode (bits 26-31)
    #[inline(always)]
    pub fn op(self) -> u32 {
        self.0 >> 26
    }

    #[inline(always)]
    pub fn rs(self) -> usize {
        ((self.0 >> 21) & 0x1F) as usize
    }

    #[inline(always)]
    pub fn rt(self) -> usize {
        ((self.0 >> 16) & 0x1F) as usize
    }

    #[inline(always)]
    pub fn rd(self) -> usize {
        ((self.0 >> 11) & 0x1F) as usize
    }

    /// Shift amount
    #[inline(always)]
    pub fn sa(self) -> u32 {
        (self.0 >> 6) & 0x1F
    }

    #[inline(always)]
    pub fn funct(self) -> u32 {
        self.0 & 0x3F
    }

    /// Zero-extended immediate
    #[inline(always)]
    pub fn imm(self) -> u64 {
        (self.0 & 0xFFFF) as u64
    }

    /// Sign-extended immediate
    #[inline(always)]
    pub fn simm(self) -> u64 {
        (self.0 as u16 as i16) as i64 as u64
    }

    /// Branch displacement: sign-extended immediate shifted left by two
    #[inline(always)]
    pub fn branch_offset(self) -> u64 {
        self.simm() << 2
    }

    /// 26-bit jump target
    #[inline(always)]
    pub fn target(self) -> u64 {
        (self.0 & 0x03FF_FFFF) as u64
    }

    /// FPU format field (same bits as rs)
    #[inline(always)]
    pub fn fmt(self) -> u32 {
        (self.0 >> 21) & 0x1F
    }

    #[inline(always)]
    pub fn ft(self) -> usize {
        self.rt()
    }

    #[inline(always)]
    pub fn fs(self) -> usize {
        self.rd()
    }

    #[inline(always)]
    pub fn fd(self) -> usize {
        ((self.0 >> 6) & 0x1F) as usize
    }
}

/// Sign-extend the low 32 bits of a value to 64 bits
#[inline(always)]
pub(crate) fn sext32(value: u64) -> u64 {
    value as u32 as i32 as i64 as u64
}
