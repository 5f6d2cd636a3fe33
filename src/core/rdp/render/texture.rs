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

//! Tile descriptors, TMEM loads and texel sampling
//!
//! TMEM is a flat 4KB byte array addressed in 64-bit words by the tile
//! descriptors. Texels are stored in their native big-endian layout;
//! 32-bit texels are kept linear rather than split across the two TMEM
//! halves. Sampling is point sampled.

use super::super::commands::bits;
use super::super::{Color, DisplayProcessor, PixelFormat, PixelSize, TMEM_SIZE};

impl DisplayProcessor {
    /// SET_TILE
    pub(in crate::core::rdp) fn set_tile(&mut self, word: u64) {
        let index = bits(word, 24, 3) as usize;
        let tile = &mut self.tiles[index];
        tile.format = PixelFormat::from_bits(bits(word, 53, 3));
        tile.size = PixelSize::from_bits(bits(word, 51, 2));
        tile.line = bits(word, 41, 9) as u32;
        tile.tmem = bits(word, 32, 9) as u32;
        tile.palette = bits(word, 20, 4) as u32;
        tile.mask_t = bits(word, 14, 4) as u32;
        tile.mask_s = bits(word, 4, 4) as u32;
        log::trace!("RDP tile {}: {:?}", index, tile);
    }

    /// SET_TILE_SIZE
    pub(in crate::core::rdp) fn set_tile_size(&mut self, word: u64) {
        let tile = &mut self.tiles[bits(word, 24, 3) as usize];
        tile.sl = bits(word, 44, 12) as u32;
        tile.tl = bits(word, 32, 12) as u32;
        tile.sh = bits(word, 12, 12) as u32;
        tile.th = bits(word, 0, 12) as u32;
    }

    /// LOAD_BLOCK: copy `SH - SL + 1` texels from the texture image
    ///
    /// SL, TL and SH are whole texels here. The DxT field is not used;
    /// the block is written to TMEM as one linear run.
    pub(in crate::core::rdp) fn load_block(&mut self, word: u64, rdram: &[u8]) {
        let tile = self.tiles[bits(word, 24, 3) as usize];
        let sl = bits(word, 44, 12) as u32;
        let tl = bits(word, 32, 12) as u32;
        let sh = bits(word, 12, 12) as u32;

        let image = self.texture_image;
        let bytes = image.size.bytes() as u32;
        let texels = sh.saturating_sub(sl) + 1;
        let source = image.address + (tl * image.width + sl) * bytes;
        let dest = tile.tmem * 8;

        self.copy_to_tmem(rdram, source, dest, texels * bytes);
        log::trace!(
            "RDP LOAD_BLOCK: {} texels from 0x{:06X} to TMEM 0x{:03X}",
            texels,
            source,
            dest
        );
    }

    /// LOAD_TILE: copy a rectangle of the texture image row by row
    ///
    /// Also sets the tile's size, as the hardware does.
    pub(in crate::core::rdp) fn load_tile(&mut self, word: u64, rdram: &[u8]) {
        self.set_tile_size(word);
        let tile = self.tiles[bits(word, 24, 3) as usize];

        let image = self.texture_image;
        let bytes = image.size.bytes() as u32;
        let row_bytes = tile.width() * bytes;
        let stride = Self::tmem_stride(tile.line, row_bytes);
        let (s0, t0) = (tile.sl >> 2, tile.tl >> 2);

        for row in 0..tile.height() {
            let source = image.address + ((t0 + row) * image.width + s0) * bytes;
            let dest = tile.tmem * 8 + row * stride;
            self.copy_to_tmem(rdram, source, dest, row_bytes);
        }
        log::trace!(
            "RDP LOAD_TILE: {}x{} texels to TMEM 0x{:03X}",
            tile.width(),
            tile.height(),
            tile.tmem * 8
        );
    }

    /// TMEM row stride in bytes; a zero `line` packs rows to 8-byte words
    fn tmem_stride(line: u32, row_bytes: u32) -> u32 {
        if line > 0 {
            line * 8
        } else {
            row_bytes.div_ceil(8) * 8
        }
    }

    /// Copy bytes into TMEM, wrapping at 4KB; RDRAM reads past the end give 0
    fn copy_to_tmem(&mut self, rdram: &[u8], source: u32, dest: u32, length: u32) {
        for i in 0..length {
            let byte = rdram
                .get((source + i) as usize)
                .copied()
                .unwrap_or_default();
            self.tmem[(dest + i) as usize % TMEM_SIZE] = byte;
        }
    }

    #[inline]
    fn tmem_byte(&self, address: u32) -> u8 {
        self.tmem[address as usize % TMEM_SIZE]
    }

    /// Sample one texel from a tile at integer texel coordinates
    ///
    /// Coordinates are taken relative to the tile's SL/TL and wrapped by the
    /// tile mask, or by the tile size when the mask is zero. Formats without
    /// a decoder here read as transparent black.
    pub(in crate::core::rdp) fn sample(&self, tile_index: usize, s: i32, t: i32) -> Color {
        let tile = self.tiles[tile_index & 7];
        let s = wrap(s - (tile.sl >> 2) as i32, tile.mask_s, tile.width());
        let t = wrap(t - (tile.tl >> 2) as i32, tile.mask_t, tile.height());

        let bytes = tile.size.bytes() as u32;
        let stride = Self::tmem_stride(tile.line, tile.width() * bytes);
        let address = tile.tmem * 8 + t * stride + s * bytes;

        match (tile.format, tile.size) {
            (PixelFormat::Rgba, PixelSize::Bits16) => {
                let value =
                    u16::from_be_bytes([self.tmem_byte(address), self.tmem_byte(address + 1)]);
                Color::from_rgba16(value)
            }
            (PixelFormat::Rgba, PixelSize::Bits32) => Color::new(
                self.tmem_byte(address),
                self.tmem_byte(address + 1),
                self.tmem_byte(address + 2),
                self.tmem_byte(address + 3),
            ),
            (PixelFormat::IntensityAlpha, PixelSize::Bits16) => {
                Color::from_ia(self.tmem_byte(address), self.tmem_byte(address + 1))
            }
            (PixelFormat::IntensityAlpha, PixelSize::Bits8) => {
                let value = self.tmem_byte(address);
                Color::from_ia((value >> 4) * 0x11, (value & 0x0F) * 0x11)
            }
            (PixelFormat::Intensity, PixelSize::Bits8) => {
                let value = self.tmem_byte(address);
                Color::from_ia(value, value)
            }
            _ => Color::default(),
        }
    }
}

/// Wrap a texel coordinate into `[0, period)`
fn wrap(coord: i32, mask: u32, size: u32) -> u32 {
    if mask > 0 {
        (coord as u32) & ((1 << mask) - 1)
    } else {
        coord.rem_euclid(size.max(1) as i32) as u32
    }
}
