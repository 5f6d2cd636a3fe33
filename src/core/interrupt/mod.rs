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

//! MIPS Interface (MI) interrupt controller
//!
//! The MI collects interrupt requests from the six RCP units and drives a
//! single line into the CPU (COP0 Cause IP2).
//!
//! ## Registers (physical 0x04300000)
//!
//! | Offset | Name       | Access | Notes                                 |
//! |--------|------------|--------|---------------------------------------|
//! | 0x00   | MI_MODE    | R/W    | init length/mode, bit 11 clears DP    |
//! | 0x04   | MI_VERSION | R      | 0x02020102 on retail units            |
//! | 0x08   | MI_INTR    | R      | pending sources                       |
//! | 0x0C   | MI_MASK    | R/W    | writes use clear/set bit pairs        |
//!
//! ## Interrupt Sources (Bit Positions)
//!
//! ```text
//! Bit  | Source | Raised by
//! -----|--------|------------------------------------------
//! 0    | SP     | RSP break / SP_STATUS set-interrupt
//! 1    | SI     | serial DMA completion
//! 2    | AI     | audio DMA completion
//! 3    | VI     | vertical interrupt (frame boundary)
//! 4    | PI     | cartridge DMA completion
//! 5    | DP     | RDP SYNC_FULL
//! ```

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Interrupt source bit flags
///
/// These constants match the bit positions of MI_INTR and MI_MASK.
pub mod interrupts {
    /// Signal processor (bit 0)
    pub const SP: u8 = 1 << 0;

    /// Serial interface (bit 1)
    pub const SI: u8 = 1 << 1;

    /// Audio interface (bit 2)
    pub const AI: u8 = 1 << 2;

    /// Video interface (bit 3)
    pub const VI: u8 = 1 << 3;

    /// Peripheral interface (bit 4)
    pub const PI: u8 = 1 << 4;

    /// Display processor (bit 5)
    pub const DP: u8 = 1 << 5;

    /// All six sources
    pub const ALL: u8 = 0x3F;
}

/// MI_VERSION value reported by retail hardware
const MI_VERSION: u32 = 0x0202_0102;

/// N64 interrupt controller
///
/// Pending bits OR-accumulate until explicitly acknowledged by the owning
/// peripheral's register write.
///
/// # Example
///
/// ```
/// use n64rx::core::interrupt::{InterruptController, interrupts};
///
/// let mut ic = InterruptController::new();
///
/// ic.raise(interrupts::VI);
/// assert!(!ic.pending_and_enabled());
///
/// // Set the VI mask bit (bit 7 of the set/clear pair layout)
/// ic.write_mask(1 << 7);
/// assert!(ic.pending_and_enabled());
///
/// ic.acknowledge(interrupts::VI);
/// assert!(!ic.pending_and_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct InterruptController {
    /// MI_INTR - pending sources
    pending: u8,

    /// MI_MASK - enabled sources
    mask: u8,

    /// MI_MODE - init length (bits 0-6) plus init/ebus/rdram-reg mode bits
    mode: u32,
}

impl InterruptController {
    /// Create a new interrupt controller
    ///
    /// All sources start cleared and masked.
    pub fn new() -> Self {
        Self {
            pending: 0,
            mask: 0,
            mode: 0,
        }
    }

    /// Post one or more interrupt sources
    ///
    /// # Arguments
    ///
    /// * `source` - Source bit(s) from [`interrupts`]
    pub fn raise(&mut self, source: u8) {
        self.pending |= source & interrupts::ALL;
        log::trace!(
            "MI raise: 0x{:02X}, pending=0x{:02X}",
            source,
            self.pending
        );
    }

    /// Clear one or more pending sources
    pub fn acknowledge(&mut self, source: u8) {
        self.pending &= !source;
        log::trace!("MI acknowledge: 0x{:02X}, pending=0x{:02X}", source, self.pending);
    }

    /// True if any pending source is also enabled in MI_MASK
    #[inline]
    pub fn pending_and_enabled(&self) -> bool {
        (self.pending & self.mask) != 0
    }

    /// True if the given source is pending (regardless of mask)
    #[inline]
    pub fn is_pending(&self, source: u8) -> bool {
        (self.pending & source) != 0
    }

    /// Raw MI_INTR value
    pub fn pending(&self) -> u8 {
        self.pending
    }

    /// Raw MI_MASK value
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Write MI_MASK
    ///
    /// Each source owns two bits: bit `2n` clears the mask for source `n`,
    /// bit `2n + 1` sets it. Writing both bits of a pair leaves it unchanged.
    pub fn write_mask(&mut self, value: u32) {
        for source in 0..6 {
            match (value >> (source * 2)) & 0b11 {
                0b01 => self.mask &= !(1 << source),
                0b10 => self.mask |= 1 << source,
                _ => {}
            }
        }
        log::debug!("MI mask set: 0x{:02X}", self.mask);
    }

    /// Write MI_MODE
    ///
    /// Bits 0-6 set the init length; bits 7-13 are clear/set pairs for the
    /// init, ebus-test and rdram-register modes, and bit 11 acknowledges DP.
    pub fn write_mode(&mut self, value: u32) {
        self.mode = (self.mode & !0x7F) | (value & 0x7F);

        if value & (1 << 7) != 0 {
            self.mode &= !(1 << 7);
        }
        if value & (1 << 8) != 0 {
            self.mode |= 1 << 7;
        }
        if value & (1 << 9) != 0 {
            self.mode &= !(1 << 8);
        }
        if value & (1 << 10) != 0 {
            self.mode |= 1 << 8;
        }
        if value & (1 << 11) != 0 {
            self.acknowledge(interrupts::DP);
        }
        if value & (1 << 12) != 0 {
            self.mode &= !(1 << 9);
        }
        if value & (1 << 13) != 0 {
            self.mode |= 1 << 9;
        }
    }

    /// Read an MI register by offset
    pub fn read_register(&self, offset: u32) -> u32 {
        match offset & 0x0F {
            0x00 => self.mode,
            0x04 => MI_VERSION,
            0x08 => self.pending as u32,
            0x0C => self.mask as u32,
            _ => 0,
        }
    }

    /// Write an MI register by offset
    ///
    /// MI_VERSION and MI_INTR are read-only.
    pub fn write_register(&mut self, offset: u32, value: u32) {
        match offset & 0x0F {
            0x00 => self.write_mode(value),
            0x0C => self.write_mask(value),
            _ => log::trace!("MI write to read-only offset 0x{:02X} ignored", offset),
        }
    }
}

impl Default for InterruptController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
