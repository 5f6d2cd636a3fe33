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

//! Vector lane operations
//!
//! Every operation is a pure function: it takes the two source registers
//! (the second already broadcast by the element selector), the accumulator
//! and the flag registers, and returns the new destination, accumulator and
//! flags. [`VectorUnit`](super::VectorUnit) only moves values in and out.
//!
//! ## Accumulator
//!
//! Each lane holds a 48-bit signed value, split into three 16-bit slices:
//!
//! ```text
//! 47        32 31        16 15         0
//! +-----------+------------+-----------+
//! |   high    |    mid     |    low    |
//! +-----------+------------+-----------+
//! ```
//!
//! ## Flags
//!
//! - VCO: bits 0-7 carry, bits 8-15 not-equal
//! - VCC: bits 0-7 compare, bits 8-15 clip
//! - VCE: 8 bits, compare extension for VCL

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// One vector register
pub type Lanes = [i16; 8];

/// Signature shared by the two-operand lane operations
pub type LaneOp = fn(Lanes, Lanes, Accumulator, VectorFlags) -> LaneResult;

const ACC_BITS: u32 = 48;

/// Sign-extend the low 48 bits
#[inline]
fn wrap48(value: i64) -> i64 {
    (value << (64 - ACC_BITS)) >> (64 - ACC_BITS)
}

/// Per-lane 48-bit accumulator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Accumulator(pub [i64; 8]);

impl Accumulator {
    /// Bits 32-47 of a lane
    #[inline]
    pub fn high(&self, lane: usize) -> i16 {
        (self.0[lane] >> 32) as i16
    }

    /// Bits 16-31 of a lane
    #[inline]
    pub fn mid(&self, lane: usize) -> i16 {
        (self.0[lane] >> 16) as i16
    }

    /// Bits 0-15 of a lane
    #[inline]
    pub fn low(&self, lane: usize) -> i16 {
        self.0[lane] as i16
    }

    /// Replace a whole lane, wrapping to 48 bits
    #[inline]
    pub fn set(&mut self, lane: usize, value: i64) {
        self.0[lane] = wrap48(value);
    }

    /// Add to a lane, wrapping to 48 bits
    #[inline]
    pub fn add(&mut self, lane: usize, value: i64) {
        self.0[lane] = wrap48(self.0[lane].wrapping_add(value));
    }

    /// Replace only the low slice of a lane
    #[inline]
    pub fn set_low(&mut self, lane: usize, value: i16) {
        self.0[lane] = (self.0[lane] & !0xFFFF) | (value as u16 as i64);
    }

    /// Replace the low slice of every lane
    pub fn set_low_all(&mut self, values: &Lanes) {
        for (lane, &value) in values.iter().enumerate() {
            self.set_low(lane, value);
        }
    }

    /// Bits 16-47 of a lane as a signed 32-bit value
    #[inline]
    fn high_mid(&self, lane: usize) -> i32 {
        (self.0[lane] >> 16) as i32
    }
}

/// VCO, VCC and VCE
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct VectorFlags {
    pub vco: u16,
    pub vcc: u16,
    pub vce: u8,
}

impl VectorFlags {
    #[inline]
    pub fn carry(&self, lane: usize) -> bool {
        self.vco & (1 << lane) != 0
    }

    #[inline]
    pub fn not_equal(&self, lane: usize) -> bool {
        self.vco & (1 << (lane + 8)) != 0
    }

    #[inline]
    pub fn compare(&self, lane: usize) -> bool {
        self.vcc & (1 << lane) != 0
    }

    #[inline]
    pub fn clip(&self, lane: usize) -> bool {
        self.vcc & (1 << (lane + 8)) != 0
    }

    #[inline]
    pub fn extension(&self, lane: usize) -> bool {
        self.vce & (1 << lane) != 0
    }
}

/// Output of one lane operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneResult {
    pub vd: Lanes,
    pub acc: Accumulator,
    pub flags: VectorFlags,
}

/// Apply the element selector to `vt`
///
/// | e     | lanes read                       |
/// |-------|----------------------------------|
/// | 0-1   | 0 1 2 3 4 5 6 7                  |
/// | 2-3   | pairs: lane `(i & !1) | (e & 1)` |
/// | 4-7   | quads: lane `(i & !3) | (e & 3)` |
/// | 8-15  | every lane reads `e & 7`         |
pub fn broadcast(vt: Lanes, e: u32) -> Lanes {
    let e = (e & 0xF) as usize;
    std::array::from_fn(|i| {
        let source = match e {
            0 | 1 => i,
            2 | 3 => (i & !1) | (e & 1),
            4..=7 => (i & !3) | (e & 3),
            _ => e & 7,
        };
        vt[source]
    })
}

// === Clamps ===

/// Clamp accumulator bits 16-47 to a signed 16-bit value
#[inline]
fn clamp_signed(acc: &Accumulator, lane: usize) -> i16 {
    acc.high_mid(lane).clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Unsigned clamp used by VMULU / VMACU
#[inline]
fn clamp_unsigned(acc: &Accumulator, lane: usize) -> i16 {
    let high = acc.high(lane);
    let mid = acc.mid(lane);
    if high < 0 {
        0
    } else if (high ^ mid) < 0 {
        -1
    } else {
        mid
    }
}

/// Low-slice clamp used by VMADL / VMADN
#[inline]
fn clamp_low(acc: &Accumulator, lane: usize) -> i16 {
    let value = acc.high_mid(lane);
    if value < i16::MIN as i32 {
        0
    } else if value > i16::MAX as i32 {
        -1
    } else {
        acc.low(lane)
    }
}

// === Multiply ===

/// Shared body for the multiply family
///
/// `product` gives the value added to (or replacing) each lane; `clamp`
/// extracts the destination from the updated accumulator.
#[inline]
fn multiply(
    vs: Lanes,
    vt: Lanes,
    mut acc: Accumulator,
    flags: VectorFlags,
    accumulate: bool,
    product: impl Fn(i16, i16) -> i64,
    clamp: fn(&Accumulator, usize) -> i16,
) -> LaneResult {
    let mut vd = [0i16; 8];
    for lane in 0..8 {
        let value = product(vs[lane], vt[lane]);
        if accumulate {
            acc.add(lane, value);
        } else {
            acc.set(lane, value);
        }
        vd[lane] = clamp(&acc, lane);
    }
    LaneResult { vd, acc, flags }
}

/// Signed fractional multiply with rounding
pub fn vmulf(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, false, |s, t| s as i64 * t as i64 * 2 + 0x8000, clamp_signed)
}

/// Unsigned fractional multiply with rounding
pub fn vmulu(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, false, |s, t| s as i64 * t as i64 * 2 + 0x8000, clamp_unsigned)
}

/// Low x low, unsigned, keeping the upper half of the product
pub fn vmudl(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(
        vs,
        vt,
        acc,
        flags,
        false,
        |s, t| ((s as u16 as i64) * (t as u16 as i64)) >> 16,
        clamp_low,
    )
}

/// Signed x unsigned middle product
pub fn vmudm(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, false, |s, t| s as i64 * (t as u16 as i64), clamp_signed)
}

/// Unsigned x signed low product
pub fn vmudn(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, false, |s, t| (s as u16 as i64) * t as i64, clamp_low)
}

/// Signed x signed high product
pub fn vmudh(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, false, |s, t| (s as i64 * t as i64) << 16, clamp_signed)
}

pub fn vmacf(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, true, |s, t| s as i64 * t as i64 * 2, clamp_signed)
}

pub fn vmacu(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, true, |s, t| s as i64 * t as i64 * 2, clamp_unsigned)
}

pub fn vmadl(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(
        vs,
        vt,
        acc,
        flags,
        true,
        |s, t| ((s as u16 as i64) * (t as u16 as i64)) >> 16,
        clamp_low,
    )
}

pub fn vmadm(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, true, |s, t| s as i64 * (t as u16 as i64), clamp_signed)
}

pub fn vmadn(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, true, |s, t| (s as u16 as i64) * t as i64, clamp_low)
}

pub fn vmadh(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    multiply(vs, vt, acc, flags, true, |s, t| (s as i64 * t as i64) << 16, clamp_signed)
}

/// Signed 32-bit value clamped to i16
#[inline]
fn saturate32(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// MPEG-style quantized multiply
///
/// Negative products are biased by 31 before truncation; the destination
/// keeps the upper twelve bits of the halved product.
pub fn vmulq(vs: Lanes, vt: Lanes, mut acc: Accumulator, flags: VectorFlags) -> LaneResult {
    let mut vd = [0i16; 8];
    for lane in 0..8 {
        let mut product = vs[lane] as i32 * vt[lane] as i32;
        if product < 0 {
            product += 31;
        }
        acc.set(lane, (product as i64) << 16);
        vd[lane] = saturate32(product >> 1) & !15;
    }
    LaneResult { vd, acc, flags }
}

/// Accumulating form of [`vmulq`]: nudges the accumulator toward zero by 32
pub fn vmacq(_vs: Lanes, _vt: Lanes, mut acc: Accumulator, flags: VectorFlags) -> LaneResult {
    let mut vd = [0i16; 8];
    for lane in 0..8 {
        let mut product = acc.high_mid(lane);
        if product & (1 << 5) == 0 {
            if product < 0 {
                product = product.wrapping_add(32);
            } else if product >= 32 {
                product -= 32;
            }
        }
        acc.set(lane, ((product as i64) << 16) | (acc.low(lane) as u16 as i64));
        vd[lane] = saturate32(product >> 1) & !15;
    }
    LaneResult { vd, acc, flags }
}

/// Shared body for VRNDP / VRNDN
///
/// `vt` is added when the accumulator sign matches `positive`; `shift_high`
/// comes from the low bit of the vs register number and moves the addend up
/// 16 bits.
fn round(
    vt: Lanes,
    mut acc: Accumulator,
    flags: VectorFlags,
    shift_high: bool,
    positive: bool,
) -> LaneResult {
    let mut vd = [0i16; 8];
    for lane in 0..8 {
        let mut addend = vt[lane] as i64;
        if shift_high {
            addend <<= 16;
        }
        let current = acc.0[lane];
        if (positive && current >= 0) || (!positive && current < 0) {
            acc.add(lane, addend);
        }
        vd[lane] = clamp_signed(&acc, lane);
    }
    LaneResult { vd, acc, flags }
}

pub fn vrndp(vt: Lanes, acc: Accumulator, flags: VectorFlags, shift_high: bool) -> LaneResult {
    round(vt, acc, flags, shift_high, true)
}

pub fn vrndn(vt: Lanes, acc: Accumulator, flags: VectorFlags, shift_high: bool) -> LaneResult {
    round(vt, acc, flags, shift_high, false)
}

// === Add / subtract ===

/// Shared body for the saturating adds
///
/// The accumulator receives the full-precision result, VCC marks the lanes
/// that saturated and VCO is consumed.
fn saturating(
    vs: Lanes,
    vt: Lanes,
    mut acc: Accumulator,
    mut flags: VectorFlags,
    op: impl Fn(i32, i32, i32) -> i32,
) -> LaneResult {
    let mut vd = [0i16; 8];
    let mut saturated = 0u16;
    for lane in 0..8 {
        let carry = flags.carry(lane) as i32;
        let result = op(vs[lane] as i32, vt[lane] as i32, carry);
        acc.set(lane, result as i64);
        vd[lane] = saturate32(result);
        if vd[lane] as i32 != result {
            saturated |= 1 << lane;
        }
    }
    flags.vco = 0;
    flags.vcc = saturated;
    LaneResult { vd, acc, flags }
}

/// `vs + vt + carry`, saturated
pub fn vadd(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    saturating(vs, vt, acc, flags, |s, t, carry| s + t + carry)
}

/// `vs - vt - borrow`, saturated
pub fn vsub(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    saturating(vs, vt, acc, flags, |s, t, carry| s - t - carry)
}

/// `vt` with the sign of `vs` applied (zero when `vs` is zero)
pub fn vabs(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    saturating(vs, vt, acc, flags, |s, t, _| match s.signum() {
        -1 => -t,
        0 => 0,
        _ => t,
    })
}

/// Unsigned add recording carry-out in VCO
pub fn vaddc(vs: Lanes, vt: Lanes, mut acc: Accumulator, mut flags: VectorFlags) -> LaneResult {
    let mut vd = [0i16; 8];
    let mut vco = 0u16;
    for lane in 0..8 {
        let result = vs[lane] as u16 as u32 + vt[lane] as u16 as u32;
        vd[lane] = result as i16;
        if result > 0xFFFF {
            vco |= 1 << lane;
        }
    }
    acc.set_low_all(&vd);
    flags.vco = vco;
    LaneResult { vd, acc, flags }
}

/// Unsigned subtract recording borrow and not-equal in VCO
pub fn vsubc(vs: Lanes, vt: Lanes, mut acc: Accumulator, mut flags: VectorFlags) -> LaneResult {
    let mut vd = [0i16; 8];
    let mut vco = 0u16;
    for lane in 0..8 {
        let result = vs[lane] as u16 as i32 - vt[lane] as u16 as i32;
        vd[lane] = result as i16;
        if result < 0 {
            vco |= 1 << lane;
        }
        if result != 0 {
            vco |= 1 << (lane + 8);
        }
    }
    acc.set_low_all(&vd);
    flags.vco = vco;
    LaneResult { vd, acc, flags }
}

/// Read one accumulator slice: e = 8 high, 9 mid, 10 low, anything else zero
pub fn vsar(acc: Accumulator, flags: VectorFlags, e: u32) -> LaneResult {
    let vd = std::array::from_fn(|lane| match e {
        8 => acc.high(lane),
        9 => acc.mid(lane),
        10 => acc.low(lane),
        _ => 0,
    });
    LaneResult { vd, acc, flags }
}

// === Select ===

/// Shared body for VLT / VEQ / VNE / VGE
///
/// Lanes where `cond` holds take `vs`, the rest take `vt`. VCC compare bits
/// receive the condition; clip bits and VCO are cleared.
fn select(
    vs: Lanes,
    vt: Lanes,
    mut acc: Accumulator,
    flags: VectorFlags,
    cond: impl Fn(usize) -> bool,
) -> LaneResult {
    let mut vd = [0i16; 8];
    let mut vcc = 0u16;
    for lane in 0..8 {
        let taken = cond(lane);
        if taken {
            vcc |= 1 << lane;
        }
        vd[lane] = if taken { vs[lane] } else { vt[lane] };
    }
    acc.set_low_all(&vd);
    let flags = VectorFlags { vco: 0, vcc, vce: flags.vce };
    LaneResult { vd, acc, flags }
}

pub fn vlt(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    select(vs, vt, acc, flags, |lane| {
        vs[lane] < vt[lane] || (vs[lane] == vt[lane] && flags.not_equal(lane) && flags.carry(lane))
    })
}

pub fn veq(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    select(vs, vt, acc, flags, |lane| vs[lane] == vt[lane] && !flags.not_equal(lane))
}

pub fn vne(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    select(vs, vt, acc, flags, |lane| vs[lane] != vt[lane] || flags.not_equal(lane))
}

pub fn vge(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    select(vs, vt, acc, flags, |lane| {
        vs[lane] > vt[lane]
            || (vs[lane] == vt[lane] && !(flags.not_equal(lane) && flags.carry(lane)))
    })
}

/// Merge on the VCC compare bits
pub fn vmrg(vs: Lanes, vt: Lanes, mut acc: Accumulator, mut flags: VectorFlags) -> LaneResult {
    let vd = std::array::from_fn(|lane| if flags.compare(lane) { vs[lane] } else { vt[lane] });
    acc.set_low_all(&vd);
    flags.vco = 0;
    LaneResult { vd, acc, flags }
}

// === Clip ===

/// Clip test, high half
///
/// Seeds VCO, VCC and VCE for a following [`vcl`].
pub fn vch(vs: Lanes, vt: Lanes, mut acc: Accumulator, _flags: VectorFlags) -> LaneResult {
    let mut vd = [0i16; 8];
    let mut flags = VectorFlags::default();
    for lane in 0..8 {
        let s = vs[lane] as i32;
        let t = vt[lane] as i32;
        let carry = (s ^ t) < 0;
        let result = if carry { s + t } else { s - t };
        let (le, ge, value) = if carry {
            (result <= 0, t < 0, if result <= 0 { -t } else { s })
        } else {
            (t < 0, result >= 0, if result >= 0 { t } else { s })
        };
        if carry && result == -1 {
            flags.vce |= 1 << lane;
        }
        let not_equal = result != 0 && s != !t;

        flags.vcc |= ((le as u16) << lane) | ((ge as u16) << (lane + 8));
        flags.vco |= ((carry as u16) << lane) | ((not_equal as u16) << (lane + 8));
        vd[lane] = value as i16;
    }
    acc.set_low_all(&vd);
    LaneResult { vd, acc, flags }
}

/// Clip test, low half, consuming the flags left by [`vch`]
pub fn vcl(vs: Lanes, vt: Lanes, mut acc: Accumulator, flags: VectorFlags) -> LaneResult {
    let mut vd = [0i16; 8];
    let mut vcc = flags.vcc;
    for lane in 0..8 {
        let s = vs[lane] as u16 as u32;
        let t = vt[lane] as u16 as u32;
        vd[lane] = if flags.carry(lane) {
            let le = if flags.not_equal(lane) {
                flags.compare(lane)
            } else {
                let sum = s + t;
                let overflow = sum > 0xFFFF;
                let zero = sum & 0xFFFF == 0;
                if flags.extension(lane) {
                    zero || !overflow
                } else {
                    zero && !overflow
                }
            };
            vcc = (vcc & !(1 << lane)) | ((le as u16) << lane);
            if le {
                vt[lane].wrapping_neg()
            } else {
                vs[lane]
            }
        } else {
            let ge = if flags.not_equal(lane) {
                flags.clip(lane)
            } else {
                s >= t
            };
            vcc = (vcc & !(1 << (lane + 8))) | ((ge as u16) << (lane + 8));
            if ge {
                vt[lane]
            } else {
                vs[lane]
            }
        };
    }
    acc.set_low_all(&vd);
    let flags = VectorFlags { vco: 0, vcc, vce: 0 };
    LaneResult { vd, acc, flags }
}

/// One's-complement clip test
pub fn vcr(vs: Lanes, vt: Lanes, mut acc: Accumulator, _flags: VectorFlags) -> LaneResult {
    let mut vd = [0i16; 8];
    let mut vcc = 0u16;
    for lane in 0..8 {
        let s = vs[lane] as i32;
        let t = vt[lane] as i32;
        let (le, ge, value) = if (s ^ t) < 0 {
            let le = s + t + 1 <= 0;
            (le, t < 0, if le { !t } else { s })
        } else {
            let ge = s - t >= 0;
            (t < 0, ge, if ge { t } else { s })
        };
        vcc |= ((le as u16) << lane) | ((ge as u16) << (lane + 8));
        vd[lane] = value as i16;
    }
    acc.set_low_all(&vd);
    let flags = VectorFlags { vco: 0, vcc, vce: 0 };
    LaneResult { vd, acc, flags }
}

// === Logical ===

fn logical(
    vs: Lanes,
    vt: Lanes,
    mut acc: Accumulator,
    flags: VectorFlags,
    op: fn(i16, i16) -> i16,
) -> LaneResult {
    let vd = std::array::from_fn(|lane| op(vs[lane], vt[lane]));
    acc.set_low_all(&vd);
    LaneResult { vd, acc, flags }
}

pub fn vand(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    logical(vs, vt, acc, flags, |s, t| s & t)
}

pub fn vnand(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    logical(vs, vt, acc, flags, |s, t| !(s & t))
}

pub fn vor(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    logical(vs, vt, acc, flags, |s, t| s | t)
}

pub fn vnor(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    logical(vs, vt, acc, flags, |s, t| !(s | t))
}

pub fn vxor(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    logical(vs, vt, acc, flags, |s, t| s ^ t)
}

pub fn vnxor(vs: Lanes, vt: Lanes, acc: Accumulator, flags: VectorFlags) -> LaneResult {
    logical(vs, vt, acc, flags, |s, t| !(s ^ t))
}

/// Two-operand lane operation for a COP2 function code
///
/// VRNDP/VRNDN, VSAR, the divide group and VNOP take different operands and
/// are dispatched by the caller.
pub fn lane_op(funct: u32) -> Option<LaneOp> {
    let op: LaneOp = match funct {
        0x00 => vmulf,
        0x01 => vmulu,
        0x03 => vmulq,
        0x04 => vmudl,
        0x05 => vmudm,
        0x06 => vmudn,
        0x07 => vmudh,
        0x08 => vmacf,
        0x09 => vmacu,
        0x0B => vmacq,
        0x0C => vmadl,
        0x0D => vmadm,
        0x0E => vmadn,
        0x0F => vmadh,
        0x10 => vadd,
        0x11 => vsub,
        0x13 => vabs,
        0x14 => vaddc,
        0x15 => vsubc,
        0x20 => vlt,
        0x21 => veq,
        0x22 => vne,
        0x23 => vge,
        0x24 => vcl,
        0x25 => vch,
        0x26 => vcr,
        0x27 => vmrg,
        0x28 => vand,
        0x29 => vnand,
        0x2A => vor,
        0x2B => vnor,
        0x2C => vxor,
        0x2D => vnxor,
        _ => return None,
    };
    Some(op)
}
