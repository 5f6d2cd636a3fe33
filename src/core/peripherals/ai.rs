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

//! Audio interface (AI) registers
//!
//! Writing AI_LEN starts a transfer of interleaved big-endian stereo i16
//! samples from RDRAM to the DAC queue.

use crate::core::interrupt::{interrupts, InterruptController};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// NTSC video clock used to derive the DAC rate
pub const AI_NTSC_CLOCK: u32 = 48_681_812;

/// DMA decoded from an AI_LEN write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiDma {
    pub dram_addr: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct AiRegisters {
    dram_addr: u32,
    length: u32,
    control: u32,
    dacrate: u32,
    bitrate: u32,
}

impl AiRegisters {
    pub fn new() -> Self {
        Self {
            dram_addr: 0,
            length: 0,
            control: 0,
            dacrate: 0,
            bitrate: 0,
        }
    }

    /// Output sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        AI_NTSC_CLOCK / (self.dacrate + 1)
    }

    pub fn read_register(&self, offset: u32, dma_busy: bool) -> u32 {
        let remaining = if dma_busy { self.length } else { 0 };
        match offset & 0x1F {
            0x0C => {
                let mut status = 0x0110_0000;
                if dma_busy {
                    status |= (1 << 30) | (1 << 31);
                }
                status
            }
            // Every other register is write-only and reads mirror AI_LEN
            _ => remaining,
        }
    }

    /// Write an AI register
    ///
    /// Returns the DMA to queue for a non-empty AI_LEN write. Any AI_STATUS
    /// write acknowledges AI.
    pub fn write_register(
        &mut self,
        offset: u32,
        value: u32,
        mi: &mut InterruptController,
    ) -> Option<AiDma> {
        match offset & 0x1F {
            0x00 => self.dram_addr = value & 0x00FF_FFF8,
            0x04 => {
                self.length = value & 0x3FFF8;
                if self.length > 0 {
                    return Some(AiDma {
                        dram_addr: self.dram_addr,
                        length: self.length,
                    });
                }
            }
            0x08 => self.control = value & 1,
            0x0C => mi.acknowledge(interrupts::AI),
            0x10 => self.dacrate = value & 0x3FFF,
            0x14 => self.bitrate = value & 0xF,
            _ => log::trace!("AI write to unknown offset 0x{:02X} ignored", offset),
        }
        None
    }
}

impl Default for AiRegisters {
    fn default() -> Self {
        Self::new()
    }
}
