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

//! Peripheral interface (PI) registers
//!
//! The PI moves data between RDRAM and the cartridge bus. PI_WR_LEN copies
//! cartridge -> RDRAM (the common ROM load path); PI_RD_LEN copies the other
//! way and is dropped by the read-only cartridge.

use crate::core::interrupt::{interrupts, InterruptController};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// DMA decoded from a PI length register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiDma {
    /// True for PI_WR_LEN (cartridge -> RDRAM)
    pub to_rdram: bool,
    pub dram_addr: u32,
    pub cart_addr: u32,
    pub length: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct PiRegisters {
    dram_addr: u32,
    cart_addr: u32,
    rd_len: u32,
    wr_len: u32,
    /// BSD_DOM1/DOM2 latency, pulse width, page size, release
    domains: [u32; 8],
}

impl PiRegisters {
    pub fn new() -> Self {
        Self {
            dram_addr: 0,
            cart_addr: 0,
            rd_len: 0x7F,
            wr_len: 0x7F,
            domains: [0; 8],
        }
    }

    /// Read a PI register
    ///
    /// PI_STATUS reports DMA busy (bit 0) from the queue and the pending PI
    /// interrupt (bit 3) from MI.
    pub fn read_register(&self, offset: u32, dma_busy: bool, mi: &InterruptController) -> u32 {
        match offset & 0x3F {
            0x00 => self.dram_addr,
            0x04 => self.cart_addr,
            0x08 => self.rd_len,
            0x0C => self.wr_len,
            0x10 => {
                let mut status = 0;
                if dma_busy {
                    status |= 1;
                }
                if mi.is_pending(interrupts::PI) {
                    status |= 1 << 3;
                }
                status
            }
            off @ 0x14..=0x30 => self.domains[((off - 0x14) / 4) as usize],
            _ => 0,
        }
    }

    /// Write a PI register
    ///
    /// PI_STATUS bit 1 acknowledges PI; bit 0 resets the controller.
    pub fn write_register(
        &mut self,
        offset: u32,
        value: u32,
        mi: &mut InterruptController,
    ) -> Option<PiDma> {
        match offset & 0x3F {
            0x00 => self.dram_addr = value & 0x00FF_FFFE,
            0x04 => self.cart_addr = value & 0xFFFF_FFFE,
            0x08 => {
                self.rd_len = value & 0x00FF_FFFF;
                return Some(self.decode_dma(self.rd_len, false));
            }
            0x0C => {
                self.wr_len = value & 0x00FF_FFFF;
                return Some(self.decode_dma(self.wr_len, true));
            }
            0x10 => {
                if value & 0b10 != 0 {
                    mi.acknowledge(interrupts::PI);
                }
            }
            off @ 0x14..=0x30 => self.domains[((off - 0x14) / 4) as usize] = value & 0xFF,
            _ => log::trace!("PI write to unknown offset 0x{:02X} ignored", offset),
        }
        None
    }

    fn decode_dma(&self, len: u32, to_rdram: bool) -> PiDma {
        PiDma {
            to_rdram,
            dram_addr: self.dram_addr,
            cart_addr: self.cart_addr,
            length: len + 1,
        }
    }

    /// Set PI_DRAM_ADDR and PI_CART_ADDR to where a finished transfer ended
    pub fn finish_dma(&mut self, length: u32) {
        self.dram_addr = (self.dram_addr + length) & 0x00FF_FFFE;
        self.cart_addr = self.cart_addr.wrapping_add(length) & 0xFFFF_FFFE;
    }

    /// Cartridge domain 1 timing as programmed by the boot code
    pub fn set_domain1(&mut self, latency: u32, pulse_width: u32, page_size: u32, release: u32) {
        self.domains[0] = latency;
        self.domains[1] = pulse_width;
        self.domains[2] = page_size;
        self.domains[3] = release;
    }
}

impl Default for PiRegisters {
    fn default() -> Self {
        Self::new()
    }
}
