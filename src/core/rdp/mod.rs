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

//! Reality Display Processor (RDP)
//!
//! The RDP consumes a stream of 64-bit command words and rasterizes
//! rectangles and triangles into a frame buffer it owns, with an optional
//! depth buffer alongside.
//!
//! # Command Stream
//!
//! Bits 56-61 of the first word select the command. Most commands are one
//! word; triangles and texture rectangles span several and are consumed as
//! a unit. [`DisplayProcessor::submit`] only queues words;
//! [`DisplayProcessor::flush`] decodes and executes every complete command
//! and drops a truncated tail.
//!
//! # Buffers
//!
//! - Frame buffer: `width x height` pixels, RGBA8888 (`0xRRGGBBAA`)
//! - Depth buffer: `width x height` `u32` values, far = `u32::MAX`
//!
//! Both are replaced, never resized in place, when the resolution changes.
//!
//! # Fixed Point
//!
//! | Quantity           | Format |
//! |--------------------|--------|
//! | rectangle / Y edge | 10.2   |
//! | edge X and slopes  | s15.16 |
//! | shade / Z / S / T  | s15.16 |
//! | texture S / T      | s10.5 in the integer part |

mod commands;
mod render;
#[cfg(test)]
mod tests;
mod types;

pub use render::{TriangleBuilder, Vertex};
pub use types::*;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// TMEM size in bytes
pub const TMEM_SIZE: usize = 4096;

/// Far depth value
pub const DEPTH_FAR: u32 = u32::MAX;

/// RDP state: command queue, mode registers, TMEM and output buffers
///
/// # Examples
///
/// ```
/// use n64rx::core::rdp::{Color, DisplayProcessor};
///
/// let mut rdp = DisplayProcessor::new(32, 32);
///
/// // SET_FILL_COLOR (opaque red, 32-bit) then FILL_RECTANGLE (2,2)-(4,4)
/// rdp.submit(&[0x3F18_0000_0000_0000 | (31 << 32), 0x3700_0000_FF00_00FF]);
/// rdp.submit(&[0x3600_0000_0000_0000 | (16 << 44) | (16 << 32) | (8 << 12) | 8]);
///
/// let summary = rdp.flush(&[]);
/// assert_eq!(summary.pixels, 4);
/// assert_eq!(rdp.pixel(2, 2), Color::new(0xFF, 0, 0, 0xFF));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DisplayProcessor {
    width: u32,
    height: u32,

    /// RGBA8888 frame buffer, row-major
    frame: Vec<u32>,

    /// Depth buffer, row-major
    depth: Vec<u32>,

    /// Words submitted since the last flush
    stream: Vec<u64>,

    /// SET_COLOR_IMAGE, once issued
    color_image: Option<ImageDescriptor>,

    /// SET_Z_IMAGE address, once issued
    z_image: Option<u32>,

    texture_image: ImageDescriptor,
    tiles: [Tile; 8],
    tmem: Vec<u8>,
    scissor: Scissor,
    other_modes: u64,
    combine: u64,

    /// Raw fill color (two 5551 pixels or one RGBA8888 pixel)
    fill_color: u32,
    fog_color: Color,
    blend_color: Color,
    prim_color: Color,
    env_color: Color,
}

impl DisplayProcessor {
    /// Create a display processor with cleared buffers
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = (width * height) as usize;
        Self {
            width,
            height,
            frame: vec![0; pixels],
            depth: vec![DEPTH_FAR; pixels],
            stream: Vec::new(),
            color_image: None,
            z_image: None,
            texture_image: ImageDescriptor::default(),
            tiles: [Tile::default(); 8],
            tmem: vec![0; TMEM_SIZE],
            scissor: Scissor::full(width, height),
            other_modes: 0,
            combine: 0,
            fill_color: 0,
            fog_color: Color::default(),
            blend_color: Color::default(),
            prim_color: Color::default(),
            env_color: Color::default(),
        }
    }

    /// Return to power-on state at the current resolution
    pub fn reset(&mut self) {
        *self = Self::new(self.width, self.height);
    }

    /// Replace both buffers with fresh ones of the new size
    ///
    /// Mode state and TMEM survive; the scissor is reset to the full image.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        log::info!(
            "RDP resolution {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        let pixels = (width * height) as usize;
        self.width = width;
        self.height = height;
        self.frame = vec![0; pixels];
        self.depth = vec![DEPTH_FAR; pixels];
        self.scissor = Scissor::full(width, height);
    }

    /// Check that the buffers match the resolution and TMEM is full size
    ///
    /// Returns a description of the first mismatch.
    pub fn check_buffers(&self) -> std::result::Result<(), String> {
        let pixels = (self.width as usize).checked_mul(self.height as usize);
        if pixels != Some(self.frame.len()) || pixels != Some(self.depth.len()) {
            return Err(format!(
                "RDP buffers hold {} color and {} depth pixels for {}x{}",
                self.frame.len(),
                self.depth.len(),
                self.width,
                self.height
            ));
        }
        if self.tmem.len() != TMEM_SIZE {
            return Err(format!(
                "TMEM is {} bytes, expected {}",
                self.tmem.len(),
                TMEM_SIZE
            ));
        }
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Queue command words for the next flush
    pub fn submit(&mut self, words: &[u64]) {
        self.stream.extend_from_slice(words);
    }

    /// Number of words waiting for a flush
    pub fn pending_words(&self) -> usize {
        self.stream.len()
    }

    /// Execute every complete queued command
    ///
    /// `rdram` is the texture source for LOAD_BLOCK / LOAD_TILE. The queue is
    /// empty afterwards, including any truncated trailing command.
    pub fn flush(&mut self, rdram: &[u8]) -> FlushSummary {
        let words = std::mem::take(&mut self.stream);
        let mut summary = FlushSummary::default();

        let (commands, discarded) = commands::split(&words);
        if discarded > 0 {
            log::warn!("RDP: discarding {} words of a truncated command", discarded);
        }
        summary.discarded_words = discarded;

        if self.stream_clears_depth(&commands) {
            self.depth.fill(DEPTH_FAR);
            summary.depth_cleared = true;
        }

        for command in commands {
            self.execute(command, rdram, &mut summary);
            summary.commands += 1;
        }

        if summary.commands > 0 {
            log::debug!(
                "RDP flush: {} commands, {} pixels{}",
                summary.commands,
                summary.pixels,
                if summary.sync_full { ", SYNC_FULL" } else { "" }
            );
        }
        summary
    }

    /// Frame buffer as `0xRRGGBBAA` values
    pub fn frame(&self) -> &[u32] {
        &self.frame
    }

    /// Frame buffer as packed RGBA bytes
    pub fn frame_bytes(&self) -> Vec<u8> {
        self.frame.iter().flat_map(|pixel| pixel.to_be_bytes()).collect()
    }

    pub fn depth(&self) -> &[u32] {
        &self.depth
    }

    /// Read one pixel (transparent black outside the buffer)
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.index(x as i32, y as i32)
            .map(|i| Color::from_rgba32(self.frame[i]))
            .unwrap_or_default()
    }

    /// Read one depth value (far outside the buffer)
    pub fn depth_at(&self, x: u32, y: u32) -> u32 {
        self.index(x as i32, y as i32)
            .map(|i| self.depth[i])
            .unwrap_or(DEPTH_FAR)
    }

    pub fn tmem(&self) -> &[u8] {
        &self.tmem
    }

    pub fn tile(&self, index: usize) -> Tile {
        self.tiles[index & 7]
    }

    pub fn scissor(&self) -> Scissor {
        self.scissor
    }

    pub fn other_modes(&self) -> u64 {
        self.other_modes
    }

    pub fn combine(&self) -> u64 {
        self.combine
    }

    pub fn fill_color(&self) -> u32 {
        self.fill_color
    }

    pub fn prim_color(&self) -> Color {
        self.prim_color
    }

    pub fn env_color(&self) -> Color {
        self.env_color
    }

    pub fn fog_color(&self) -> Color {
        self.fog_color
    }

    pub fn blend_color(&self) -> Color {
        self.blend_color
    }

    pub fn color_image(&self) -> Option<ImageDescriptor> {
        self.color_image
    }

    pub fn z_image(&self) -> Option<u32> {
        self.z_image
    }

    /// Buffer index of a pixel, if it lies inside the buffer
    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as u32 * self.width + x as u32) as usize)
    }

    /// Pixel bounds of the scissor intersected with the buffer
    fn clip_bounds(&self) -> (i32, i32, i32, i32) {
        let (x0, y0, x1, y1) = self.scissor.pixel_bounds();
        (
            x0.max(0),
            y0.max(0),
            x1.min(self.width as i32),
            y1.min(self.height as i32),
        )
    }

    /// True when the color image currently aliases the depth buffer
    fn drawing_to_depth(&self) -> bool {
        matches!(
            (self.color_image, self.z_image),
            (Some(color), Some(z)) if color.address == z
        )
    }

    /// Write a shaded pixel, applying alpha compare
    ///
    /// Returns true if the pixel was written.
    #[inline]
    fn plot(&mut self, index: usize, color: Color) -> bool {
        if self.other_modes & other_modes::ALPHA_COMPARE != 0 && color.a == 0 {
            return false;
        }
        self.frame[index] = color.to_rgba32();
        true
    }
}

impl Default for DisplayProcessor {
    fn default() -> Self {
        Self::new(320, 240)
    }
}
