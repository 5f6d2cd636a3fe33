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

//! Cartridge image loading
//!
//! Dumps exist in three byte orders. All of them are normalized to the
//! console's native big-endian layout before anything else looks at them.
//!
//! | Extension | First word   | Layout                          |
//! |-----------|--------------|---------------------------------|
//! | .z64      | 80 37 12 40  | big-endian (native)             |
//! | .v64      | 37 80 40 12  | bytes of each halfword swapped  |
//! | .n64      | 40 12 37 80  | each 32-bit word reversed       |
//!
//! # Header (first 0x40 bytes, big-endian)
//!
//! ```text
//! 0x00  PI BSD domain 1 config (0x80371240)
//! 0x04  clock rate override
//! 0x08  entry point (virtual)
//! 0x0C  release / libultra version
//! 0x10  CRC1
//! 0x14  CRC2
//! 0x20  title, 20 bytes, space padded
//! 0x3B  game code, 4 bytes
//! 0x3F  version
//! ```
//!
//! # Example
//!
//! ```
//! use n64rx::core::loader::{Cartridge, RomFormat};
//!
//! let mut image = vec![0u8; 0x1000];
//! image[..4].copy_from_slice(&[0x80, 0x37, 0x12, 0x40]);
//! image[8..12].copy_from_slice(&0x8000_0400u32.to_be_bytes());
//!
//! let cart = Cartridge::from_bytes(image).unwrap();
//! assert_eq!(cart.header.format, RomFormat::BigEndian);
//! assert_eq!(cart.header.entry_point, 0x8000_0400);
//! ```

use super::error::{EmulatorError, Result, RomError};
use serde::Serialize;
use std::path::Path;

/// Size of the cartridge header
pub const HEADER_SIZE: usize = 0x40;

/// Native big-endian validation word
pub const ROM_MAGIC: u32 = 0x8037_1240;

/// Byte order of a cartridge dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RomFormat {
    /// .z64
    BigEndian,
    /// .v64
    ByteSwapped,
    /// .n64
    LittleEndian,
}

impl RomFormat {
    /// Identify the byte order from the first four bytes
    pub fn detect(magic: [u8; 4]) -> std::result::Result<Self, RomError> {
        match magic {
            [0x80, 0x37, 0x12, 0x40] => Ok(RomFormat::BigEndian),
            [0x37, 0x80, 0x40, 0x12] => Ok(RomFormat::ByteSwapped),
            [0x40, 0x12, 0x37, 0x80] => Ok(RomFormat::LittleEndian),
            [a, b, c, d] => Err(RomError::UnknownFormat(a, b, c, d)),
        }
    }

    /// Rewrite `data` in place to big-endian
    ///
    /// A trailing partial word is left as is.
    pub fn normalize(self, data: &mut [u8]) {
        match self {
            RomFormat::BigEndian => {}
            RomFormat::ByteSwapped => {
                for pair in data.chunks_exact_mut(2) {
                    pair.swap(0, 1);
                }
            }
            RomFormat::LittleEndian => {
                for word in data.chunks_exact_mut(4) {
                    word.reverse();
                }
            }
        }
    }
}

/// Parsed cartridge header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RomHeader {
    pub format: RomFormat,
    pub pi_config: u32,
    pub clock_rate: u32,
    pub entry_point: u32,
    pub release: u32,
    pub crc1: u32,
    pub crc2: u32,
    pub title: String,
    pub game_code: String,
    pub version: u8,
}

impl RomHeader {
    /// Parse the header of an already normalized image
    pub fn parse(data: &[u8], format: RomFormat) -> std::result::Result<Self, RomError> {
        if data.len() < HEADER_SIZE {
            return Err(RomError::TooSmall {
                needed: HEADER_SIZE,
                got: data.len(),
            });
        }

        let word = |offset: usize| {
            u32::from_be_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ])
        };

        Ok(Self {
            format,
            pi_config: word(0x00),
            clock_rate: word(0x04),
            entry_point: word(0x08),
            release: word(0x0C),
            crc1: word(0x10),
            crc2: word(0x14),
            title: ascii_field(&data[0x20..0x34]),
            game_code: ascii_field(&data[0x3B..0x3F]),
            version: data[0x3F],
        })
    }
}

/// Printable ASCII with trailing padding removed
fn ascii_field(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { ' ' })
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// A loaded, normalized cartridge image
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub header: RomHeader,
    data: Vec<u8>,
}

impl Cartridge {
    /// Validate and normalize a raw dump
    pub fn from_bytes(mut data: Vec<u8>) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(RomError::TooSmall {
                needed: HEADER_SIZE,
                got: data.len(),
            }
            .into());
        }

        let format = RomFormat::detect([data[0], data[1], data[2], data[3]])?;
        format.normalize(&mut data);
        let header = RomHeader::parse(&data, format)?;

        log::info!(
            "ROM: \"{}\" [{}] v{} ({:?}, {} KB, entry 0x{:08X})",
            header.title,
            header.game_code,
            header.version,
            header.format,
            data.len() / 1024,
            header.entry_point
        );

        Ok(Self { header, data })
    }

    /// Read and validate a dump from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EmulatorError::RomNotFound(path.display().to_string()));
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Normalized image bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Byte at cartridge offset; reads past the end return zero
    #[inline]
    pub fn read8(&self, offset: u32) -> u8 {
        self.data.get(offset as usize).copied().unwrap_or(0)
    }
}
