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

//! RDP type definitions
//!
//! Colors, image descriptors, tile descriptors and other mode state shared
//! by the command handlers and the rasterizer.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// An RGBA8888 color
///
/// # Examples
///
/// ```
/// use n64rx::core::rdp::Color;
///
/// let color = Color::from_rgba32(0xFF80_4020);
/// assert_eq!((color.r, color.g, color.b, color.a), (0xFF, 0x80, 0x40, 0x20));
///
/// // 5551: full red, opaque
/// let red = Color::from_rgba16(0xF801);
/// assert_eq!(red, Color::new(0xFF, 0, 0, 0xFF));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Decode 0xRRGGBBAA
    pub fn from_rgba32(value: u32) -> Self {
        Self {
            r: (value >> 24) as u8,
            g: (value >> 16) as u8,
            b: (value >> 8) as u8,
            a: value as u8,
        }
    }

    /// Decode a 5551 pixel, expanding each 5-bit channel to 8 bits
    pub fn from_rgba16(value: u16) -> Self {
        let expand = |c: u16| ((c << 3) | (c >> 2)) as u8;
        Self {
            r: expand((value >> 11) & 0x1F),
            g: expand((value >> 6) & 0x1F),
            b: expand((value >> 1) & 0x1F),
            a: if value & 1 != 0 { 0xFF } else { 0 },
        }
    }

    /// Intensity + alpha
    pub fn from_ia(intensity: u8, alpha: u8) -> Self {
        Self::new(intensity, intensity, intensity, alpha)
    }

    pub fn to_rgba32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Channel-wise product (texel x shade)
    pub fn modulate(self, other: Color) -> Self {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        Self {
            r: mul(self.r, other.r),
            g: mul(self.g, other.g),
            b: mul(self.b, other.b),
            a: mul(self.a, other.a),
        }
    }
}

/// Texel size field of image and tile descriptors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum PixelSize {
    Bits4,
    Bits8,
    #[default]
    Bits16,
    Bits32,
}

impl PixelSize {
    pub fn from_bits(bits: u64) -> Self {
        match bits & 3 {
            0 => PixelSize::Bits4,
            1 => PixelSize::Bits8,
            2 => PixelSize::Bits16,
            _ => PixelSize::Bits32,
        }
    }

    /// Bytes per texel, 4-bit texels rounding up to one byte
    pub fn bytes(self) -> usize {
        match self {
            PixelSize::Bits4 | PixelSize::Bits8 => 1,
            PixelSize::Bits16 => 2,
            PixelSize::Bits32 => 4,
        }
    }
}

/// Texel format field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum PixelFormat {
    #[default]
    Rgba,
    Yuv,
    ColorIndex,
    IntensityAlpha,
    Intensity,
}

impl PixelFormat {
    pub fn from_bits(bits: u64) -> Self {
        match bits & 7 {
            1 => PixelFormat::Yuv,
            2 => PixelFormat::ColorIndex,
            3 => PixelFormat::IntensityAlpha,
            4 => PixelFormat::Intensity,
            _ => PixelFormat::Rgba,
        }
    }
}

/// SET_COLOR_IMAGE / SET_TEXTURE_IMAGE state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ImageDescriptor {
    pub format: PixelFormat,
    pub size: PixelSize,
    /// Width in pixels
    pub width: u32,
    /// RDRAM address
    pub address: u32,
}

/// One of the eight tile descriptors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Tile {
    pub format: PixelFormat,
    pub size: PixelSize,
    /// Row stride in 64-bit TMEM words
    pub line: u32,
    /// TMEM address in 64-bit words
    pub tmem: u32,
    pub palette: u32,
    /// Wrap masks (log2 of the wrap period, 0 = none)
    pub mask_s: u32,
    pub mask_t: u32,
    /// Tile bounds in 10.2 fixed point
    pub sl: u32,
    pub tl: u32,
    pub sh: u32,
    pub th: u32,
}

impl Tile {
    /// Width in texels
    pub fn width(&self) -> u32 {
        ((self.sh >> 2).saturating_sub(self.sl >> 2)) + 1
    }

    /// Height in texels
    pub fn height(&self) -> u32 {
        ((self.th >> 2).saturating_sub(self.tl >> 2)) + 1
    }
}

/// Scissor box, half-open, in 10.2 fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Scissor {
    pub xh: u32,
    pub yh: u32,
    pub xl: u32,
    pub yl: u32,
}

impl Scissor {
    /// Scissor covering a whole `width x height` image
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            xh: 0,
            yh: 0,
            xl: width << 2,
            yl: height << 2,
        }
    }

    /// Pixel bounds `(x0, y0, x1, y1)`, exclusive on the right and bottom
    pub fn pixel_bounds(&self) -> (i32, i32, i32, i32) {
        (
            (self.xh >> 2) as i32,
            (self.yh >> 2) as i32,
            (self.xl.div_ceil(4)) as i32,
            (self.yl.div_ceil(4)) as i32,
        )
    }
}

/// SET_OTHER_MODES bits the rasterizer consults
pub mod other_modes {
    /// Discard pixels whose alpha is zero
    pub const ALPHA_COMPARE: u64 = 1 << 0;
    /// Cycle type (bits 52-53): 0 one-cycle, 1 two-cycle, 2 copy, 3 fill
    pub const CYCLE_TYPE_SHIFT: u64 = 52;
}

/// What one [`flush`](super::DisplayProcessor::flush) did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Commands executed
    pub commands: usize,
    /// Pixels written to the color buffer
    pub pixels: u64,
    /// A SYNC_FULL was seen; the caller posts the DP interrupt
    pub sync_full: bool,
    /// The depth buffer was reset before rasterizing
    pub depth_cleared: bool,
    /// Words dropped because the last command was truncated
    pub discarded_words: usize,
}
