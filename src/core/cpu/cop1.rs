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

//! Coprocessor 1 (floating point unit) register file
//!
//! With Status.FR set the FPU has 32 independent 64-bit registers. With FR
//! clear only the even registers hold doubles, and a single-precision access
//! to an odd register reaches the upper half of its even partner.
//!
//! # FCR31 layout
//!
//! ```text
//! bits 0-1   rounding mode (nearest, zero, +inf, -inf)
//! bits 2-6   flags   I U O Z V
//! bits 7-11  enables I U O Z V
//! bits 12-17 cause   I U O Z V E
//! bit  23    condition
//! bit  24    flush denormals to zero
//! ```

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// FCR31 bits
pub mod fcr31 {
    pub const ROUNDING_MASK: u32 = 0x3;
    pub const ENABLE_SHIFT: u32 = 5;
    pub const CAUSE_INEXACT: u32 = 1 << 12;
    pub const CAUSE_DIVIDE_BY_ZERO: u32 = 1 << 15;
    pub const CAUSE_INVALID: u32 = 1 << 16;
    pub const CAUSE_UNIMPLEMENTED: u32 = 1 << 17;
    pub const CAUSE_MASK: u32 = 0x3F << 12;
    pub const CONDITION: u32 = 1 << 23;
    /// Bits software can write
    pub const WRITE_MASK: u32 = 0x0183_FFFF;
}

/// FCR0 implementation/revision
const FCR0_VALUE: u32 = 0x0A00;

/// Rounding modes selectable through FCR31
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingMode {
    Nearest,
    Zero,
    PlusInfinity,
    MinusInfinity,
}

impl RoundingMode {
    pub fn from_bits(bits: u32) -> Self {
        match bits & fcr31::ROUNDING_MASK {
            0 => RoundingMode::Nearest,
            1 => RoundingMode::Zero,
            2 => RoundingMode::PlusInfinity,
            _ => RoundingMode::MinusInfinity,
        }
    }

    /// Round to an integral value
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingMode::Nearest => value.round_ties_even(),
            RoundingMode::Zero => value.trunc(),
            RoundingMode::PlusInfinity => value.ceil(),
            RoundingMode::MinusInfinity => value.floor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub(crate) struct Cop1 {
    pub(crate) fpr: [u64; 32],
    pub(crate) fcr31: u32,
}

impl Cop1 {
    pub(crate) fn new() -> Self {
        Self {
            fpr: [0u64; 32],
            fcr31: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    pub(crate) fn rounding_mode(&self) -> RoundingMode {
        RoundingMode::from_bits(self.fcr31)
    }

    pub(crate) fn condition(&self) -> bool {
        self.fcr31 & fcr31::CONDITION != 0
    }

    pub(crate) fn set_condition(&mut self, value: bool) {
        if value {
            self.fcr31 |= fcr31::CONDITION;
        } else {
            self.fcr31 &= !fcr31::CONDITION;
        }
    }

    /// CFC1
    pub(crate) fn read_control(&self, index: usize) -> u32 {
        match index {
            0 => FCR0_VALUE,
            31 => self.fcr31,
            _ => 0,
        }
    }

    /// CTC1; only FCR31 is writable
    pub(crate) fn write_control(&mut self, index: usize, value: u32) {
        if index == 31 {
            self.fcr31 = value & fcr31::WRITE_MASK;
        }
    }

    /// 32-bit view of register `index`
    pub(crate) fn read_word(&self, index: usize, fr: bool) -> u32 {
        if fr {
            self.fpr[index] as u32
        } else if index & 1 == 0 {
            self.fpr[index] as u32
        } else {
            (self.fpr[index & !1] >> 32) as u32
        }
    }

    pub(crate) fn write_word(&mut self, index: usize, value: u32, fr: bool) {
        if fr || index & 1 == 0 {
            let reg = &mut self.fpr[index];
            *reg = (*reg & 0xFFFF_FFFF_0000_0000) | value as u64;
        } else {
            let reg = &mut self.fpr[index & !1];
            *reg = (*reg & 0xFFFF_FFFF) | ((value as u64) << 32);
        }
    }

    /// 64-bit view of register `index`
    pub(crate) fn read_dword(&self, index: usize, fr: bool) -> u64 {
        if fr {
            self.fpr[index]
        } else {
            self.fpr[index & !1]
        }
    }

    pub(crate) fn write_dword(&mut self, index: usize, value: u64, fr: bool) {
        if fr {
            self.fpr[index] = value;
        } else {
            self.fpr[index & !1] = value;
        }
    }

    pub(crate) fn read_single(&self, index: usize, fr: bool) -> f32 {
        f32::from_bits(self.read_word(index, fr))
    }

    pub(crate) fn write_single(&mut self, index: usize, value: f32, fr: bool) {
        self.write_word(index, value.to_bits(), fr);
    }

    pub(crate) fn read_double(&self, index: usize, fr: bool) -> f64 {
        f64::from_bits(self.read_dword(index, fr))
    }

    pub(crate) fn write_double(&mut self, index: usize, value: f64, fr: bool) {
        self.write_dword(index, value.to_bits(), fr);
    }

    pub(crate) fn clear_cause(&mut self) {
        self.fcr31 &= !fcr31::CAUSE_MASK;
    }

    /// Record exception causes
    ///
    /// Sets the cause bits and, for causes whose enable bit is clear, the
    /// sticky flag bits. Returns true when a FloatingPoint exception must be
    /// taken: unimplemented operation always traps, other causes only when
    /// enabled.
    pub(crate) fn signal(&mut self, causes: u32) -> bool {
        self.fcr31 |= causes;
        let enables = (self.fcr31 << fcr31::ENABLE_SHIFT) & (0x1F << 12);
        let trapped = causes & (enables | fcr31::CAUSE_UNIMPLEMENTED);
        if trapped == 0 {
            self.fcr31 |= (causes >> 10) & 0x7C;
        }
        trapped != 0
    }
}
