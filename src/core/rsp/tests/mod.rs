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

//! RSP tests
//!
//! Lane operations are tested as plain functions; everything else runs
//! small microcode programs out of IMEM.

mod scalar;

use super::*;
use crate::core::peripherals::SpStatus;

pub(super) const BREAK: u32 = 0x0000_000D;
pub(super) const NOP: u32 = 0;

pub(super) fn special(funct: u32, rs: u32, rt: u32, rd: u32, sa: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | (sa << 6) | funct
}

pub(super) fn itype(op: u32, rs: u32, rt: u32, imm: u16) -> u32 {
    (op << 26) | (rs << 21) | (rt << 16) | imm as u32
}

pub(super) fn ori(rt: u32, imm: u16) -> u32 {
    itype(0x0D, 0, rt, imm)
}

pub(super) fn mtc0(rt: u32, rd: u32) -> u32 {
    (0x10 << 26) | (0x04 << 21) | (rt << 16) | (rd << 11)
}

pub(super) fn mfc0(rt: u32, rd: u32) -> u32 {
    (0x10 << 26) | (rt << 16) | (rd << 11)
}

/// COP2 move (MFC2 = 0, CFC2 = 2, MTC2 = 4, CTC2 = 6)
pub(super) fn cop2_move(rs: u32, rt: u32, vs: u32, element: u32) -> u32 {
    (0x12 << 26) | (rs << 21) | (rt << 16) | (vs << 11) | (element << 7)
}

/// Vector computational instruction
pub(super) fn vop(funct: u32, vd: u32, vs: u32, vt: u32, e: u32) -> u32 {
    (0x12 << 26) | (1 << 25) | (e << 21) | (vt << 16) | (vs << 11) | (vd << 6) | funct
}

pub(super) fn lwc2(kind: u32, base: u32, vt: u32, element: u32, offset: i32) -> u32 {
    (0x32 << 26)
        | (base << 21)
        | (vt << 16)
        | (kind << 11)
        | (element << 7)
        | (offset as u32 & 0x7F)
}

pub(super) fn swc2(kind: u32, base: u32, vt: u32, element: u32, offset: i32) -> u32 {
    (0x3A << 26)
        | (base << 21)
        | (vt << 16)
        | (kind << 11)
        | (element << 7)
        | (offset as u32 & 0x7F)
}

/// Bus with the program in IMEM and the RSP running
pub(super) fn setup(program: &[u32]) -> (VectorUnit, Bus) {
    let mut bus = Bus::new();
    for (i, word) in program.iter().enumerate() {
        bus.imem_mut()[i * 4..i * 4 + 4].copy_from_slice(&word.to_be_bytes());
    }
    bus.sp.set_status(SpStatus::empty());
    (VectorUnit::new(DEFAULT_INSTRUCTION_BUDGET), bus)
}

pub(super) fn lanes(values: [i32; 8]) -> vector::Lanes {
    values.map(|v| v as i16)
}
