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

//! COP1 (FPU) instructions
//!
//! Arithmetic uses the host's round-to-nearest; conversions to integer
//! honour the FCR31 rounding mode. Each arithmetic instruction clears the
//! FCR31 cause field before it runs.

use super::super::cop1::{fcr31, RoundingMode};
use super::super::decode::{sext32, Instruction};
use super::super::{ExceptionCause, CPU};

/// fmt field values
const FMT_S: u32 = 16;
const FMT_D: u32 = 17;
const FMT_W: u32 = 20;

impl CPU {
    // === Moves ===

    /// MFC1: Move Word From FPU
    pub(in crate::core::cpu) fn op_mfc1(&mut self, instr: Instruction) {
        let fr = self.cop0.fr_mode();
        let value = self.cop1.read_word(instr.fs(), fr);
        self.set_reg32(instr.rt(), value);
    }

    /// DMFC1: Move Doubleword From FPU
    pub(in crate::core::cpu) fn op_dmfc1(&mut self, instr: Instruction) {
        let fr = self.cop0.fr_mode();
        let value = self.cop1.read_dword(instr.fs(), fr);
        self.set_reg(instr.rt(), value);
    }

    /// CFC1: Move Control Word From FPU (FCR0 / FCR31)
    pub(in crate::core::cpu) fn op_cfc1(&mut self, instr: Instruction) {
        let value = self.cop1.read_control(instr.fs());
        self.set_reg(instr.rt(), sext32(value as u64));
    }

    /// MTC1: Move Word To FPU
    pub(in crate::core::cpu) fn op_mtc1(&mut self, instr: Instruction) {
        let fr = self.cop0.fr_mode();
        let value = self.reg(instr.rt()) as u32;
        self.cop1.write_word(instr.fs(), value, fr);
    }

    /// DMTC1: Move Doubleword To FPU
    pub(in crate::core::cpu) fn op_dmtc1(&mut self, instr: Instruction) {
        let fr = self.cop0.fr_mode();
        let value = self.reg(instr.rt());
        self.cop1.write_dword(instr.fs(), value, fr);
    }

    /// CTC1: Move Control Word To FPU
    ///
    /// Writing a cause bit whose enable is set raises FloatingPoint at once.
    pub(in crate::core::cpu) fn op_ctc1(&mut self, instr: Instruction) {
        self.cop1.write_control(instr.fs(), self.reg(instr.rt()) as u32);

        let fcr = self.cop1.fcr31;
        let enabled = (fcr << fcr31::ENABLE_SHIFT) | fcr31::CAUSE_UNIMPLEMENTED;
        if fcr & fcr31::CAUSE_MASK & enabled != 0 {
            self.exception(ExceptionCause::FloatingPoint);
        }
    }

    // === Branches ===

    /// BC1F / BC1T / BC1FL / BC1TL
    ///
    /// rt bit 0 selects branch-on-true, bit 1 selects the likely form.
    pub(in crate::core::cpu) fn op_bc1(&mut self, instr: Instruction) {
        let on_true = instr.rt() & 1 != 0;
        let likely = instr.rt() & 2 != 0;
        let condition = self.cop1.condition() == on_true;

        if likely {
            self.branch_likely(condition, instr);
        } else {
            self.branch(condition, instr);
        }
    }

    // === Arithmetic ===

    /// Dispatch S/D/W/L format operations on the funct field
    pub(in crate::core::cpu) fn execute_fpu_arithmetic(&mut self, instr: Instruction) {
        self.cop1.clear_cause();

        let fmt = instr.fmt();
        let float_fmt = fmt == FMT_S || fmt == FMT_D;

        match instr.funct() {
            0x00..=0x07 if float_fmt => self.fpu_arithmetic(instr), // ADD..NEG
            0x08..=0x0F if float_fmt => {
                // ROUND / TRUNC / CEIL / FLOOR; low two bits pick the mode, .L below 0x0C
                let mode = RoundingMode::from_bits(instr.funct());
                self.fpu_to_integer(instr, mode, instr.funct() < 0x0C)
            }
            0x20 if fmt != FMT_S => self.op_cvt_s(instr), // CVT.S
            0x21 if fmt != FMT_D => self.op_cvt_d(instr), // CVT.D
            0x24 if float_fmt => {
                let mode = self.cop1.rounding_mode();
                self.fpu_to_integer(instr, mode, false) // CVT.W
            }
            0x25 if float_fmt => {
                let mode = self.cop1.rounding_mode();
                self.fpu_to_integer(instr, mode, true) // CVT.L
            }
            0x30..=0x3F if float_fmt => self.fpu_compare(instr), // C.cond
            funct => {
                log::warn!(
                    "Unimplemented FPU operation fmt={} funct=0x{:02X} at PC=0x{:016X}",
                    fmt,
                    funct,
                    self.current_pc
                );
                self.fpu_signal(fcr31::CAUSE_UNIMPLEMENTED);
            }
        }
    }

    /// Record FPU causes; returns true if a FloatingPoint exception was taken
    fn fpu_signal(&mut self, causes: u32) -> bool {
        if self.cop1.signal(causes) {
            self.exception(ExceptionCause::FloatingPoint);
            true
        } else {
            false
        }
    }

    /// Read fs as f64 in the instruction's format
    fn fpu_source(&self, instr: Instruction, index: usize) -> f64 {
        let fr = self.cop0.fr_mode();
        match instr.fmt() {
            FMT_S => self.cop1.read_single(index, fr) as f64,
            FMT_D => self.cop1.read_double(index, fr),
            FMT_W => self.cop1.read_word(index, fr) as i32 as f64,
            // FMT_L
            _ => self.cop1.read_dword(index, fr) as i64 as f64,
        }
    }

    /// ADD, SUB, MUL, DIV, SQRT, ABS, MOV, NEG in S or D format
    fn fpu_arithmetic(&mut self, instr: Instruction) {
        let fr = self.cop0.fr_mode();
        let funct = instr.funct();
        let a = self.fpu_source(instr, instr.fs());
        let b = self.fpu_source(instr, instr.ft());

        let divide_by_zero = funct == 0x03 && b == 0.0 && !a.is_nan() && a != 0.0;
        if divide_by_zero && self.fpu_signal(fcr31::CAUSE_DIVIDE_BY_ZERO) {
            return;
        }

        let single = instr.fmt() == FMT_S;
        let result = if single {
            let (a, b) = (a as f32, b as f32);
            let value = match funct {
                0x00 => a + b,
                0x01 => a - b,
                0x02 => a * b,
                0x03 => a / b,
                0x04 => a.sqrt(),
                0x05 => a.abs(),
                0x06 => a,
                _ => -a,
            };
            value as f64
        } else {
            match funct {
                0x00 => a + b,
                0x01 => a - b,
                0x02 => a * b,
                0x03 => a / b,
                0x04 => a.sqrt(),
                0x05 => a.abs(),
                0x06 => a,
                _ => -a,
            }
        };

        // NaN produced from ordered operands: 0/0, inf-inf, sqrt(-x)
        let arithmetic = funct <= 0x04;
        let ordered = !a.is_nan() && (funct == 0x04 || !b.is_nan());
        let invalid = arithmetic && result.is_nan() && ordered;
        if invalid && self.fpu_signal(fcr31::CAUSE_INVALID) {
            return;
        }

        if single {
            self.cop1.write_single(instr.fd(), result as f32, fr);
        } else {
            self.cop1.write_double(instr.fd(), result, fr);
        }
    }

    /// Convert S/D to a 32- or 64-bit integer with an explicit rounding mode
    ///
    /// NaN, infinity and out-of-range values raise the unimplemented
    /// operation cause, which always traps.
    fn fpu_to_integer(&mut self, instr: Instruction, mode: RoundingMode, long: bool) {
        let value = self.fpu_source(instr, instr.fs());
        let rounded = mode.apply(value);

        let limit = if long { 9.223_372_036_854_775_808e18 } else { 2_147_483_648.0 };
        if !rounded.is_finite() || rounded < -limit || rounded >= limit {
            self.fpu_signal(fcr31::CAUSE_UNIMPLEMENTED);
            return;
        }

        if rounded != value && self.fpu_signal(fcr31::CAUSE_INEXACT) {
            return;
        }

        let fr = self.cop0.fr_mode();
        if long {
            self.cop1.write_dword(instr.fd(), rounded as i64 as u64, fr);
        } else {
            self.cop1.write_word(instr.fd(), rounded as i32 as u32, fr);
        }
    }

    /// CVT.S from D, W or L
    fn op_cvt_s(&mut self, instr: Instruction) {
        let value = self.fpu_source(instr, instr.fs());
        let fr = self.cop0.fr_mode();
        self.cop1.write_single(instr.fd(), value as f32, fr);
    }

    /// CVT.D from S, W or L
    fn op_cvt_d(&mut self, instr: Instruction) {
        let value = self.fpu_source(instr, instr.fs());
        let fr = self.cop0.fr_mode();
        self.cop1.write_double(instr.fd(), value, fr);
    }

    /// C.cond.fmt: set the FCR31 condition bit
    ///
    /// The low four funct bits are the predicate: bit 0 true when
    /// unordered, bit 1 when equal, bit 2 when less, bit 3 signals Invalid
    /// on unordered operands.
    fn fpu_compare(&mut self, instr: Instruction) {
        let predicate = instr.funct() & 0x0F;
        let a = self.fpu_source(instr, instr.fs());
        let b = self.fpu_source(instr, instr.ft());
        let unordered = a.is_nan() || b.is_nan();

        if unordered && predicate & 0x08 != 0 && self.fpu_signal(fcr31::CAUSE_INVALID) {
            return;
        }

        let result = (predicate & 0x01 != 0 && unordered)
            || (predicate & 0x02 != 0 && !unordered && a == b)
            || (predicate & 0x04 != 0 && !unordered && a < b);
        self.cop1.set_condition(result);
    }
}
