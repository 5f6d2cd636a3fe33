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

//! FILL_RECTANGLE and TEXTURE_RECTANGLE

use super::super::commands::bits;
use super::super::{Color, DisplayProcessor, PixelSize, DEPTH_FAR};

/// First pixel whose position is at or after a 10.2 coordinate
#[inline]
fn first_pixel(coord: u32) -> i32 {
    coord.div_ceil(4) as i32
}

impl DisplayProcessor {
    /// Covered pixel range of a 10.2 rectangle, clipped
    fn rectangle_bounds(&self, xh: u32, yh: u32, xl: u32, yl: u32) -> (i32, i32, i32, i32) {
        let (cx0, cy0, cx1, cy1) = self.clip_bounds();
        (
            first_pixel(xh).max(cx0),
            first_pixel(yh).max(cy0),
            first_pixel(xl).min(cx1),
            first_pixel(yl).min(cy1),
        )
    }

    /// FILL_RECTANGLE over `[XH, XL) x [YH, YL)`
    ///
    /// A 16-bit color image takes the two 5551 halves of the fill color on
    /// alternating columns. When the color image aliases the depth buffer
    /// the rectangle writes far depth instead of color.
    ///
    /// Returns the number of color pixels written.
    pub(in crate::core::rdp) fn fill_rectangle(&mut self, word: u64) -> u64 {
        let (x0, y0, x1, y1) = self.rectangle_bounds(
            bits(word, 12, 12) as u32,
            bits(word, 0, 12) as u32,
            bits(word, 44, 12) as u32,
            bits(word, 32, 12) as u32,
        );

        if self.drawing_to_depth() {
            for y in y0..y1 {
                for x in x0..x1 {
                    if let Some(i) = self.index(x, y) {
                        self.depth[i] = DEPTH_FAR;
                    }
                }
            }
            return 0;
        }

        let packed = matches!(self.color_image, Some(image) if image.size != PixelSize::Bits32);
        let colors = if packed {
            [
                Color::from_rgba16((self.fill_color >> 16) as u16),
                Color::from_rgba16(self.fill_color as u16),
            ]
        } else {
            let color = Color::from_rgba32(self.fill_color);
            [color, color]
        };

        let mut written = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(i) = self.index(x, y) {
                    self.frame[i] = colors[(x & 1) as usize].to_rgba32();
                    written += 1;
                }
            }
        }
        written
    }

    /// TEXTURE_RECTANGLE(_FLIP)
    ///
    /// S and T are s10.5 at the rectangle's first pixel; DsDx and DtDy are
    /// s5.10 steps per pixel. The flipped form steps S down the rows and T
    /// across the columns.
    pub(in crate::core::rdp) fn texture_rectangle(&mut self, command: &[u64], flip: bool) -> u64 {
        let [first, second] = [command[0], command[1]];
        let tile = bits(first, 24, 3) as usize;
        let (x0, y0, x1, y1) = self.rectangle_bounds(
            bits(first, 12, 12) as u32,
            bits(first, 0, 12) as u32,
            bits(first, 44, 12) as u32,
            bits(first, 32, 12) as u32,
        );
        let origin_x = first_pixel(bits(first, 12, 12) as u32);
        let origin_y = first_pixel(bits(first, 0, 12) as u32);

        let s = (bits(second, 48, 16) as u16 as i16 as i32) << 5;
        let t = (bits(second, 32, 16) as u16 as i16 as i32) << 5;
        let dsdx = bits(second, 16, 16) as u16 as i16 as i32;
        let dtdy = bits(second, 0, 16) as u16 as i16 as i32;

        let mut written = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                let Some(i) = self.index(x, y) else {
                    continue;
                };
                let (dx, dy) = (x - origin_x, y - origin_y);
                let (u, v) = if flip { (dy, dx) } else { (dx, dy) };
                let texel = self.sample(tile, (s + dsdx * u) >> 10, (t + dtdy * v) >> 10);
                if self.plot(i, texel) {
                    written += 1;
                }
            }
        }
        written
    }
}
