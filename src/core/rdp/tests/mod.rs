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

//! RDP tests
//!
//! Commands are assembled with the helpers below and run through
//! `submit` + `flush`.

mod fill;

use super::*;

pub(super) const RED: Color = Color::new(0xFF, 0, 0, 0xFF);
pub(super) const GREEN: Color = Color::new(0, 0xFF, 0, 0xFF);

/// Image size field values
pub(super) const SIZE_8: u64 = 1;
pub(super) const SIZE_16: u64 = 2;
pub(super) const SIZE_32: u64 = 3;

fn image(op: u64, format: u64, size: u64, width: u32, address: u32) -> u64 {
    op << 56 | format << 53 | size << 51 | ((width - 1) as u64) << 32 | address as u64
}

pub(super) fn set_color_image(size: u64, width: u32, address: u32) -> u64 {
    image(0x3F, 0, size, width, address)
}

pub(super) fn set_texture_image(format: u64, size: u64, width: u32, address: u32) -> u64 {
    image(0x3D, format, size, width, address)
}

pub(super) fn set_z_image(address: u32) -> u64 {
    0x3E << 56 | address as u64
}

pub(super) fn set_fill_color(color: u32) -> u64 {
    0x37 << 56 | color as u64
}

pub(super) fn set_prim_color(color: Color) -> u64 {
    0x3A << 56 | color.to_rgba32() as u64
}

pub(super) fn set_other_modes(modes: u64) -> u64 {
    0x2F << 56 | modes
}

pub(super) fn sync_full() -> u64 {
    0x29 << 56
}

/// Four 12-bit 10.2 coordinates from pixel bounds, in XL/YL/XH/YH order
fn rect_fields(x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
    ((x1 * 4) as u64) << 44 | ((y1 * 4) as u64) << 32 | ((x0 * 4) as u64) << 12 | (y0 * 4) as u64
}

/// FILL_RECTANGLE over pixels `[x0, x1) x [y0, y1)`
pub(super) fn fill_rect(x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
    0x36 << 56 | rect_fields(x0, y0, x1, y1)
}

pub(super) fn set_scissor(x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
    0x2D << 56
        | ((x0 * 4) as u64) << 44
        | ((y0 * 4) as u64) << 32
        | ((x1 * 4) as u64) << 12
        | (y1 * 4) as u64
}

/// SET_TILE with `line` in 64-bit words
pub(super) fn set_tile(format: u64, size: u64, line: u64, tmem: u64, tile: u64) -> u64 {
    0x35 << 56 | format << 53 | size << 51 | line << 41 | tmem << 32 | tile << 24
}

/// LOAD_TILE for texels `[s0, s1] x [t0, t1]`
///
/// SL/TL sit in the high fields, the reverse of a rectangle.
pub(super) fn load_tile(tile: u64, s0: u32, t0: u32, s1: u32, t1: u32) -> u64 {
    0x34 << 56 | rect_fields(s1, t1, s0, t0) | tile << 24
}

pub(super) fn load_block(tile: u64, sl: u64, tl: u64, sh: u64) -> u64 {
    0x33 << 56 | sl << 44 | tl << 32 | tile << 24 | sh << 12
}

/// TEXTURE_RECTANGLE with S/T in texels and steps of 1.0
pub(super) fn texture_rect(tile: u64, x0: u32, y0: u32, x1: u32, y1: u32, flip: bool) -> [u64; 2] {
    let op: u64 = if flip { 0x25 } else { 0x24 };
    [op << 56 | rect_fields(x0, y0, x1, y1) | tile << 24, 0x0400 << 16 | 0x0400]
}

/// 32x32 processor with a 32-bit color image at 0x1000
pub(super) fn processor() -> DisplayProcessor {
    let mut rdp = DisplayProcessor::new(32, 32);
    rdp.submit(&[set_color_image(SIZE_32, 32, 0x1000)]);
    rdp.flush(&[]);
    rdp
}

pub(super) fn run(rdp: &mut DisplayProcessor, words: &[u64]) -> FlushSummary {
    rdp.submit(words);
    rdp.flush(&[])
}
