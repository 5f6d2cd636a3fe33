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

//! Reciprocal and inverse square root (VRCP / VRSQ family)
//!
//! Both operate on a single element. A 32-bit input is assembled by writing
//! the upper half with VRCPH/VRSQH and then issuing VRCPL/VRSQL with the
//! lower half; the 32-bit result is read back the same way, low half from
//! the L form and high half from the next H form.
//!
//! The mantissa lookups use the 512-entry tables of the hardware ROM,
//! generated at compile time.

use super::vector::{broadcast, Accumulator, Lanes};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

const fn reciprocal_table() -> [u16; 512] {
    let mut table = [0u16; 512];
    let mut index = 0;
    while index < 512 {
        let a = (index + 512) as u64;
        let b = (1u64 << 34) / a;
        let value = (b + 1) >> 8;
        // The first entry saturates at 0xFFFF
        table[index] = if value > 0x1FFFF { 0xFFFF } else { value as u16 };
        index += 1;
    }
    table
}

const fn inverse_sqrt_table() -> [u16; 512] {
    let mut table = [0u16; 512];
    let mut index = 0;
    while index < 512 {
        let a = ((index + 512) >> (index % 2)) as u64;
        // Smallest b >= 2^17 with a * (b + 1)^2 >= 2^44
        let mut low = 1u64 << 17;
        let mut high = 1u64 << 18;
        while low < high {
            let mid = (low + high) / 2;
            if a * (mid + 1) * (mid + 1) >= 1u64 << 44 {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        table[index] = (low >> 1) as u16;
        index += 1;
    }
    table
}

static RECIPROCALS: [u16; 512] = reciprocal_table();
static INVERSE_SQRTS: [u16; 512] = inverse_sqrt_table();

/// Divider latch shared by the whole family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DivideState {
    /// Upper input half written by the last H form
    pub div_in: i16,
    /// Upper result half of the last L or plain form
    pub div_out: i16,
    /// Set by an H form; makes the next L form use a 32-bit input
    pub double_precision: bool,
}

/// Signature shared by the single-element operations
pub type DivideOp = fn(Lanes, usize, Lanes, u32, Accumulator, DivideState) -> DivideOutput;

/// Result of one divide-family instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivideOutput {
    pub vd: Lanes,
    pub acc: Accumulator,
    pub state: DivideState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Reciprocal,
    InverseSqrt,
}

/// Fixed-point reciprocal of a signed 32-bit input
///
/// Zero gives 0x7FFF_FFFF and -32768 gives 0xFFFF_0000.
pub fn reciprocal(input: i32) -> i32 {
    evaluate(Function::Reciprocal, input)
}

/// Fixed-point inverse square root of a signed 32-bit input
pub fn inverse_sqrt(input: i32) -> i32 {
    evaluate(Function::InverseSqrt, input)
}

fn evaluate(function: Function, input: i32) -> i32 {
    let mask = input >> 31;
    let mut data = input ^ mask;
    if input > i16::MIN as i32 {
        data = data.wrapping_sub(mask);
    }

    if data == 0 {
        return 0x7FFF_FFFF;
    }
    if input == i16::MIN as i32 {
        return 0xFFFF_0000u32 as i32;
    }

    let data = data as u32;
    let shift = data.leading_zeros();
    let index = (((data as u64) << shift) & 0x7FC0_0000) >> 22;
    let (mantissa, scale) = match function {
        Function::Reciprocal => (RECIPROCALS[index as usize], 31 - shift),
        Function::InverseSqrt => {
            let index = (index as u32 & 0x1FE) | (shift & 1);
            (INVERSE_SQRTS[index as usize], (31 - shift) >> 1)
        }
    };
    let result = ((0x10000 | mantissa as u32) << 14) >> scale;
    (result as i32) ^ mask
}

/// Common shape: accumulator low slice receives broadcast `vt`, one lane of
/// `vd` receives the computed element
fn single_lane(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    mut acc: Accumulator,
    compute: impl FnOnce(i16) -> (i16, DivideState),
) -> DivideOutput {
    let source = vt[(e & 7) as usize];
    acc.set_low_all(&broadcast(vt, e));
    let (element, state) = compute(source);
    let mut vd = vd;
    vd[de & 7] = element;
    DivideOutput { vd, acc, state }
}

#[allow(clippy::too_many_arguments)]
fn low_form(
    function: Function,
    long: bool,
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    single_lane(vd, de, vt, e, acc, |source| {
        let input = if long && state.double_precision {
            ((state.div_in as i32) << 16) | source as u16 as i32
        } else {
            source as i32
        };
        let result = evaluate(function, input);
        let state = DivideState {
            div_in: state.div_in,
            div_out: (result >> 16) as i16,
            double_precision: false,
        };
        (result as i16, state)
    })
}

fn high_form(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    single_lane(vd, de, vt, e, acc, |source| {
        let state = DivideState {
            div_in: source,
            div_out: state.div_out,
            double_precision: true,
        };
        (state.div_out, state)
    })
}

pub fn vrcp(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    low_form(Function::Reciprocal, false, vd, de, vt, e, acc, state)
}

pub fn vrcpl(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    low_form(Function::Reciprocal, true, vd, de, vt, e, acc, state)
}

pub fn vrsq(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    low_form(Function::InverseSqrt, false, vd, de, vt, e, acc, state)
}

pub fn vrsql(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    low_form(Function::InverseSqrt, true, vd, de, vt, e, acc, state)
}

/// VRCPH and VRSQH behave identically
pub fn vrcph(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    high_form(vd, de, vt, e, acc, state)
}

pub fn vrsqh(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    high_form(vd, de, vt, e, acc, state)
}

/// Copy one broadcast element into lane `de`
pub fn vmov(
    vd: Lanes,
    de: usize,
    vt: Lanes,
    e: u32,
    acc: Accumulator,
    state: DivideState,
) -> DivideOutput {
    let selected = broadcast(vt, e);
    single_lane(vd, de, vt, e, acc, |_| (selected[de & 7], state))
}
