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

//! Triangle command encoder
//!
//! Produces the edge and coefficient words the rasterizer consumes from
//! three screen-space vertices. Used by tests and benchmarks, and by hosts
//! that want to drive the RDP without an RSP microcode.

use super::super::Color;

/// A screen-space vertex
///
/// `s` and `t` are in texels; `z` is in depth units (s15.16 after
/// encoding, so at most 32767).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: Color,
    pub s: f64,
    pub t: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_depth(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    pub fn with_texture(mut self, s: f64, t: f64) -> Self {
        self.s = s;
        self.t = t;
        self
    }
}

/// Encodes a triangle command
///
/// # Examples
///
/// ```
/// use n64rx::core::rdp::{Color, DisplayProcessor, TriangleBuilder, Vertex};
///
/// let red = Color::new(0xFF, 0, 0, 0xFF);
/// let words = TriangleBuilder::new(
///     Vertex::new(0.0, 0.0).with_color(red),
///     Vertex::new(8.0, 0.0).with_color(red),
///     Vertex::new(0.0, 8.0).with_color(red),
/// )
/// .shaded()
/// .build();
/// assert_eq!(words.len(), 12);
///
/// let mut rdp = DisplayProcessor::new(16, 16);
/// rdp.submit(&words);
/// assert_eq!(rdp.flush(&[]).pixels, 36);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TriangleBuilder {
    vertices: [Vertex; 3],
    shade: bool,
    texture: bool,
    depth: bool,
    tile: u8,
}

/// Gradients of one attribute over the triangle
#[derive(Debug, Clone, Copy, Default)]
struct Gradient {
    base: f64,
    dadx: f64,
    dady: f64,
    dade: f64,
}

/// s15.16 encoding
#[inline]
fn fixed(value: f64) -> i32 {
    (value * 65536.0).round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

/// s11.2 encoding, masked to the 14-bit field
#[inline]
fn quarter(value: f64) -> u64 {
    ((value * 4.0).round() as i32 as u64) & 0x3FFF
}

#[inline]
fn pair(high: i32, low: i32) -> u64 {
    ((high as u32 as u64) << 32) | (low as u32 as u64)
}

/// Pack four 16-bit fields, first in the high bits
#[inline]
fn pack(fields: [u16; 4]) -> u64 {
    fields
        .iter()
        .fold(0u64, |word, &field| (word << 16) | field as u64)
}

/// Encode four s15.16 gradients as an 8-word attribute block
fn attribute_block(gradients: [Gradient; 4]) -> [u64; 8] {
    let encode = |select: fn(&Gradient) -> f64| gradients.map(|g| fixed(select(&g)));
    let int = |values: [i32; 4]| pack(values.map(|v| (v >> 16) as u16));
    let frac = |values: [i32; 4]| pack(values.map(|v| v as u16));

    let base = encode(|g| g.base);
    let dadx = encode(|g| g.dadx);
    let dade = encode(|g| g.dade);
    let dady = encode(|g| g.dady);
    [
        int(base),
        int(dadx),
        frac(base),
        frac(dadx),
        int(dade),
        int(dady),
        frac(dade),
        frac(dady),
    ]
}

/// Slope dx/dy of an edge, zero for a horizontal edge
fn slope(from: &Vertex, to: &Vertex) -> f64 {
    let dy = to.y - from.y;
    if dy.abs() < f64::EPSILON {
        0.0
    } else {
        (to.x - from.x) / dy
    }
}

impl TriangleBuilder {
    /// Start a flat (primitive color) triangle
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self {
            vertices: [a, b, c],
            shade: false,
            texture: false,
            depth: false,
            tile: 0,
        }
    }

    /// Interpolate vertex colors
    pub fn shaded(mut self) -> Self {
        self.shade = true;
        self
    }

    /// Sample `tile` at the interpolated S/T
    pub fn textured(mut self, tile: u8) -> Self {
        self.texture = true;
        self.tile = tile & 7;
        self
    }

    /// Depth test and write the interpolated Z
    pub fn with_depth(mut self) -> Self {
        self.depth = true;
        self
    }

    /// Command words: 4 edge words then the enabled coefficient blocks
    pub fn build(&self) -> Vec<u64> {
        let mut v = self.vertices;
        v.sort_by(|a, b| a.y.total_cmp(&b.y));
        let [top, mid, bottom] = v;

        let dxhdy = slope(&top, &bottom);
        let dxmdy = slope(&top, &mid);
        let dxldy = slope(&mid, &bottom);

        // Major edge is on the left when the middle vertex lies right of it
        let major_at_mid = top.x + dxhdy * (mid.y - top.y);
        let left_major = mid.x > major_at_mid;

        let op = 0x08 | (self.shade as u64) << 2 | (self.texture as u64) << 1 | self.depth as u64;
        let mut words = vec![
            op << 56
                | (left_major as u64) << 55
                | (self.tile as u64) << 48
                | quarter(bottom.y) << 32
                | quarter(mid.y) << 16
                | quarter(top.y),
            pair(fixed(mid.x), fixed(dxldy)),
            pair(fixed(top.x), fixed(dxhdy)),
            pair(fixed(top.x), fixed(dxmdy)),
        ];

        let gradient = |value: fn(&Vertex) -> f64| Self::gradient(&v, dxhdy, value);
        if self.shade {
            words.extend(attribute_block([
                gradient(|v| v.color.r as f64),
                gradient(|v| v.color.g as f64),
                gradient(|v| v.color.b as f64),
                gradient(|v| v.color.a as f64),
            ]));
        }
        if self.texture {
            words.extend(attribute_block([
                gradient(|v| v.s * 32.0),
                gradient(|v| v.t * 32.0),
                Gradient::default(),
                Gradient::default(),
            ]));
        }
        if self.depth {
            let z = gradient(|v| v.z);
            words.push(pair(fixed(z.base), fixed(z.dadx)));
            words.push(pair(fixed(z.dade), fixed(z.dady)));
        }
        words
    }

    /// Plane through the three (sorted) vertices, based at the top vertex
    fn gradient(v: &[Vertex; 3], dxhdy: f64, value: fn(&Vertex) -> f64) -> Gradient {
        let [a0, a1, a2] = [value(&v[0]), value(&v[1]), value(&v[2])];
        let (x1, y1) = (v[1].x - v[0].x, v[1].y - v[0].y);
        let (x2, y2) = (v[2].x - v[0].x, v[2].y - v[0].y);

        let det = x1 * y2 - x2 * y1;
        if det.abs() < f64::EPSILON {
            return Gradient {
                base: a0,
                ..Default::default()
            };
        }

        let dadx = ((a1 - a0) * y2 - (a2 - a0) * y1) / det;
        let dady = ((a2 - a0) * x1 - (a1 - a0) * x2) / det;
        Gradient {
            base: a0,
            dadx,
            dady,
            dade: dady + dadx * dxhdy,
        }
    }
}
