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

//! Command decode and dispatch
//!
//! State-setting commands are handled here; drawing commands forward to
//! the rasterizer in `render`.

use super::{
    other_modes, Color, DisplayProcessor, FlushSummary, ImageDescriptor, PixelFormat, PixelSize,
    Scissor,
};

/// Command opcodes (bits 56-61 of the first word)
pub(super) mod opcode {
    pub const NOP: u8 = 0x00;
    pub const TRIANGLE_FIRST: u8 = 0x08;
    pub const TRIANGLE_LAST: u8 = 0x0F;
    pub const TEXTURE_RECTANGLE: u8 = 0x24;
    pub const TEXTURE_RECTANGLE_FLIP: u8 = 0x25;
    pub const SYNC_LOAD: u8 = 0x26;
    pub const SYNC_PIPE: u8 = 0x27;
    pub const SYNC_TILE: u8 = 0x28;
    pub const SYNC_FULL: u8 = 0x29;
    pub const SET_KEY_GB: u8 = 0x2A;
    pub const SET_KEY_R: u8 = 0x2B;
    pub const SET_CONVERT: u8 = 0x2C;
    pub const SET_SCISSOR: u8 = 0x2D;
    pub const SET_PRIM_DEPTH: u8 = 0x2E;
    pub const SET_OTHER_MODES: u8 = 0x2F;
    pub const LOAD_TLUT: u8 = 0x30;
    pub const SET_TILE_SIZE: u8 = 0x32;
    pub const LOAD_BLOCK: u8 = 0x33;
    pub const LOAD_TILE: u8 = 0x34;
    pub const SET_TILE: u8 = 0x35;
    pub const FILL_RECTANGLE: u8 = 0x36;
    pub const SET_FILL_COLOR: u8 = 0x37;
    pub const SET_FOG_COLOR: u8 = 0x38;
    pub const SET_BLEND_COLOR: u8 = 0x39;
    pub const SET_PRIM_COLOR: u8 = 0x3A;
    pub const SET_ENV_COLOR: u8 = 0x3B;
    pub const SET_COMBINE: u8 = 0x3C;
    pub const SET_TEXTURE_IMAGE: u8 = 0x3D;
    pub const SET_Z_IMAGE: u8 = 0x3E;
    pub const SET_COLOR_IMAGE: u8 = 0x3F;
}

/// Extract `width` bits starting at `shift`
#[inline(always)]
pub(super) fn bits(word: u64, shift: u32, width: u32) -> u64 {
    (word >> shift) & ((1u64 << width) - 1)
}

#[inline(always)]
pub(super) fn opcode_of(word: u64) -> u8 {
    bits(word, 56, 6) as u8
}

/// Words occupied by a command, given its first word
///
/// Triangle opcodes carry their optional coefficient blocks in the low
/// three bits: shade (4), texture (2), depth (1).
pub(super) fn command_length(word: u64) -> usize {
    match opcode_of(word) {
        op @ opcode::TRIANGLE_FIRST..=opcode::TRIANGLE_LAST => {
            let mut length = 4;
            if op & 4 != 0 {
                length += 8;
            }
            if op & 2 != 0 {
                length += 8;
            }
            if op & 1 != 0 {
                length += 2;
            }
            length
        }
        opcode::TEXTURE_RECTANGLE | opcode::TEXTURE_RECTANGLE_FLIP => 2,
        _ => 1,
    }
}

/// Split a word stream into complete commands
///
/// Returns the commands and the number of trailing words that did not
/// form a complete command.
pub(super) fn split(words: &[u64]) -> (Vec<&[u64]>, usize) {
    let mut commands = Vec::new();
    let mut index = 0;
    while index < words.len() {
        let length = command_length(words[index]);
        if index + length > words.len() {
            return (commands, words.len() - index);
        }
        commands.push(&words[index..index + length]);
        index += length;
    }
    (commands, 0)
}

fn image_descriptor(word: u64) -> ImageDescriptor {
    ImageDescriptor {
        format: PixelFormat::from_bits(bits(word, 53, 3)),
        size: PixelSize::from_bits(bits(word, 51, 2)),
        width: bits(word, 32, 10) as u32 + 1,
        address: bits(word, 0, 26) as u32,
    }
}

impl DisplayProcessor {
    /// Look ahead for a fill that targets the depth buffer
    ///
    /// Image registers are tracked through the stream from their current
    /// values, so a clear is found even when the images are set in the same
    /// batch.
    pub(super) fn stream_clears_depth(&self, commands: &[&[u64]]) -> bool {
        let mut color = self.color_image.map(|image| image.address);
        let mut depth = self.z_image;
        for command in commands {
            let word = command[0];
            match opcode_of(word) {
                opcode::SET_COLOR_IMAGE => color = Some(image_descriptor(word).address),
                opcode::SET_Z_IMAGE => depth = Some(bits(word, 0, 26) as u32),
                opcode::FILL_RECTANGLE => {
                    if color.is_some() && color == depth {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// Execute one complete command
    pub(super) fn execute(&mut self, command: &[u64], rdram: &[u8], summary: &mut FlushSummary) {
        let word = command[0];
        let op = opcode_of(word);
        match op {
            opcode::TRIANGLE_FIRST..=opcode::TRIANGLE_LAST => {
                summary.pixels += self.draw_triangle(command);
            }
            opcode::TEXTURE_RECTANGLE => {
                summary.pixels += self.texture_rectangle(command, false);
            }
            opcode::TEXTURE_RECTANGLE_FLIP => {
                summary.pixels += self.texture_rectangle(command, true);
            }
            opcode::FILL_RECTANGLE => {
                summary.pixels += self.fill_rectangle(word);
            }

            opcode::SYNC_FULL => {
                log::trace!("RDP SYNC_FULL");
                summary.sync_full = true;
            }
            opcode::NOP
            | opcode::SYNC_LOAD
            | opcode::SYNC_PIPE
            | opcode::SYNC_TILE
            | opcode::SET_KEY_GB
            | opcode::SET_KEY_R
            | opcode::SET_CONVERT
            | opcode::SET_PRIM_DEPTH => {}

            opcode::SET_SCISSOR => {
                self.scissor = Scissor {
                    xh: bits(word, 44, 12) as u32,
                    yh: bits(word, 32, 12) as u32,
                    xl: bits(word, 12, 12) as u32,
                    yl: bits(word, 0, 12) as u32,
                };
                log::trace!("RDP scissor {:?}", self.scissor);
            }
            opcode::SET_OTHER_MODES => {
                self.other_modes = bits(word, 0, 56);
                log::trace!(
                    "RDP other modes 0x{:014X} (cycle type {})",
                    self.other_modes,
                    bits(self.other_modes, other_modes::CYCLE_TYPE_SHIFT as u32, 2)
                );
            }
            opcode::SET_COMBINE => self.combine = bits(word, 0, 56),

            opcode::SET_FILL_COLOR => self.fill_color = word as u32,
            opcode::SET_FOG_COLOR => self.fog_color = Color::from_rgba32(word as u32),
            opcode::SET_BLEND_COLOR => self.blend_color = Color::from_rgba32(word as u32),
            opcode::SET_PRIM_COLOR => self.prim_color = Color::from_rgba32(word as u32),
            opcode::SET_ENV_COLOR => self.env_color = Color::from_rgba32(word as u32),

            opcode::SET_COLOR_IMAGE => self.set_color_image(image_descriptor(word)),
            opcode::SET_Z_IMAGE => self.z_image = Some(bits(word, 0, 26) as u32),
            opcode::SET_TEXTURE_IMAGE => self.texture_image = image_descriptor(word),

            opcode::SET_TILE => self.set_tile(word),
            opcode::SET_TILE_SIZE => self.set_tile_size(word),
            opcode::LOAD_BLOCK => self.load_block(word, rdram),
            opcode::LOAD_TILE => self.load_tile(word, rdram),
            opcode::LOAD_TLUT => log::trace!("RDP LOAD_TLUT ignored"),

            _ => log::warn!("RDP: unknown command 0x{:02X} (word 0x{:016X})", op, word),
        }
    }

    /// SET_COLOR_IMAGE
    ///
    /// A new width replaces the buffers at a 4:3 aspect.
    fn set_color_image(&mut self, image: ImageDescriptor) {
        if image.width != self.width && image.width > 0 {
            self.resize(image.width, image.width * 3 / 4);
        }
        log::trace!(
            "RDP color image {:?} {:?} width {} @ 0x{:06X}",
            image.format,
            image.size,
            image.width,
            image.address
        );
        self.color_image = Some(image);
    }
}
