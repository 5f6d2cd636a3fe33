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

//! Triangle rasterization
//!
//! A triangle command describes three edges walked from the top vertex:
//!
//! ```text
//!         YH  *            H: major edge, YH..YL
//!            / \           M: first minor edge, YH..YM
//!        YM *   \          L: second minor edge, YM..YL
//!            \   \
//!             \   \
//!         YL   `---*
//! ```
//!
//! Y coordinates are s11.2; edge X positions and slopes are s15.16. A pixel
//! row `y` is covered when `YH <= 4y < YL`, and a column `x` when it lies in
//! `[ceil(left), ceil(right))`.
//!
//! Attribute blocks give each value at the top of the major edge together
//! with its gradients. The value at a pixel is
//! `base + DaDe * dy + DaDx * (x - x_major(y))`, where DaDe is the change
//! along the major edge per scanline.

use super::super::commands::{bits, opcode_of};
use super::super::{Color, DisplayProcessor};

/// Sign-extend an s11.2 field
#[inline]
fn y_coord(word: u64, shift: u32) -> i64 {
    ((bits(word, shift, 14) as i64) << 50) >> 50
}

/// Edge setup from the first four command words
#[derive(Debug, Clone, Copy)]
struct Edges {
    left_major: bool,
    tile: usize,
    yh: i64,
    ym: i64,
    yl: i64,
    xh: i64,
    dxhdy: i64,
    xm: i64,
    dxmdy: i64,
    xl: i64,
    dxldy: i64,
}

impl Edges {
    fn decode(words: &[u64]) -> Self {
        let high = |word: u64| (word >> 32) as u32 as i32 as i64;
        let low = |word: u64| word as u32 as i32 as i64;
        Self {
            left_major: bits(words[0], 55, 1) != 0,
            tile: bits(words[0], 48, 3) as usize,
            yl: y_coord(words[0], 32),
            ym: y_coord(words[0], 16),
            yh: y_coord(words[0], 0),
            xl: high(words[1]),
            dxldy: low(words[1]),
            xh: high(words[2]),
            dxhdy: low(words[2]),
            xm: high(words[3]),
            dxmdy: low(words[3]),
        }
    }

    /// Major edge X (s15.16) at quarter-line `y4`
    fn major(&self, y4: i64) -> i64 {
        self.xh.saturating_add(self.dxhdy.saturating_mul(y4 - self.yh) >> 2)
    }

    /// Minor edge X (s15.16) at quarter-line `y4`
    fn minor(&self, y4: i64) -> i64 {
        if y4 < self.ym {
            self.xm.saturating_add(self.dxmdy.saturating_mul(y4 - self.yh) >> 2)
        } else {
            self.xl.saturating_add(self.dxldy.saturating_mul(y4 - self.ym) >> 2)
        }
    }
}

/// One interpolated attribute (s15.16)
#[derive(Debug, Clone, Copy, Default)]
struct Plane {
    base: i64,
    dadx: i64,
    dade: i64,
}

impl Plane {
    /// Value at quarter-line `y4` and pixel `x`, given the major edge X there
    ///
    /// Saturates on overflow.
    #[inline]
    fn at(&self, edges: &Edges, y4: i64, x: i64, major: i64) -> i64 {
        let along_edge = self
            .base
            .saturating_add(self.dade.saturating_mul(y4 - edges.yh) >> 2);
        let across = self.dadx.saturating_mul((x << 16).saturating_sub(major)) >> 16;
        along_edge.saturating_add(across)
    }
}

/// Decode the four attributes of an 8-word shade or texture block
///
/// Integer and fraction halves are split across words:
///
/// | Word | Contents          |
/// |------|-------------------|
/// | 0    | base, integer     |
/// | 1    | DaDx, integer     |
/// | 2    | base, fraction    |
/// | 3    | DaDx, fraction    |
/// | 4    | DaDe, integer     |
/// | 5    | DaDy, integer     |
/// | 6    | DaDe, fraction    |
/// | 7    | DaDy, fraction    |
fn attribute_block(block: &[u64]) -> [Plane; 4] {
    let value = |int_word: u64, frac_word: u64, channel: u32| {
        let shift = 48 - 16 * channel;
        let int = bits(int_word, shift, 16) as u32;
        let frac = bits(frac_word, shift, 16) as u32;
        ((int << 16) | frac) as i32 as i64
    };
    let mut planes = [Plane::default(); 4];
    for (channel, plane) in planes.iter_mut().enumerate() {
        let channel = channel as u32;
        *plane = Plane {
            base: value(block[0], block[2], channel),
            dadx: value(block[1], block[3], channel),
            dade: value(block[4], block[6], channel),
        };
    }
    planes
}

/// Decode the 2-word depth block
fn depth_block(block: &[u64]) -> Plane {
    Plane {
        base: (block[0] >> 32) as u32 as i32 as i64,
        dadx: block[0] as u32 as i32 as i64,
        dade: (block[1] >> 32) as u32 as i32 as i64,
    }
}

/// 8-bit channel from an s15.16 plane value
#[inline]
fn channel(value: i64) -> u8 {
    (value >> 16).clamp(0, 255) as u8
}

impl DisplayProcessor {
    /// Rasterize a triangle command (opcodes 0x08-0x0F)
    ///
    /// Returns the number of pixels written.
    pub(in crate::core::rdp) fn draw_triangle(&mut self, command: &[u64]) -> u64 {
        let op = opcode_of(command[0]);
        let edges = Edges::decode(command);

        let mut offset = 4;
        let shade = if op & 4 != 0 {
            offset += 8;
            Some(attribute_block(&command[offset - 8..offset]))
        } else {
            None
        };
        let texture = if op & 2 != 0 {
            offset += 8;
            Some(attribute_block(&command[offset - 8..offset]))
        } else {
            None
        };
        let depth = if op & 1 != 0 {
            Some(depth_block(&command[offset..offset + 2]))
        } else {
            None
        };

        let (cx0, cy0, cx1, cy1) = self.clip_bounds();
        let y_start = (edges.yh + 3).div_euclid(4).max(cy0 as i64);
        let y_end = (edges.yl + 3).div_euclid(4).min(cy1 as i64);

        let mut written = 0;
        for y in y_start..y_end {
            let y4 = y * 4;
            let major = edges.major(y4);
            let minor = edges.minor(y4);
            let (left, right) = if edges.left_major {
                (major, minor)
            } else {
                (minor, major)
            };

            let x_start = (left.saturating_add(0xFFFF) >> 16).max(cx0 as i64);
            let x_end = (right.saturating_add(0xFFFF) >> 16).min(cx1 as i64);

            for x in x_start..x_end {
                let Some(index) = self.index(x as i32, y as i32) else {
                    continue;
                };

                let z = depth.map(|plane| {
                    plane.at(&edges, y4, x, major).clamp(0, u32::MAX as i64) as u32
                });
                if let Some(z) = z {
                    if z >= self.depth[index] {
                        continue;
                    }
                }

                let shade_color = shade.map(|planes| {
                    let [r, g, b, a] = planes.map(|plane| channel(plane.at(&edges, y4, x, major)));
                    Color::new(r, g, b, a)
                });
                let texel = texture.map(|planes| {
                    let s = planes[0].at(&edges, y4, x, major) >> 21;
                    let t = planes[1].at(&edges, y4, x, major) >> 21;
                    self.sample(edges.tile, s as i32, t as i32)
                });

                let color = match (texel, shade_color) {
                    (Some(texel), Some(shade)) => texel.modulate(shade),
                    (Some(texel), None) => texel,
                    (None, Some(shade)) => shade,
                    (None, None) => self.prim_color,
                };

                if self.plot(index, color) {
                    if let Some(z) = z {
                        self.depth[index] = z;
                    }
                    written += 1;
                }
            }
        }
        written
    }
}
