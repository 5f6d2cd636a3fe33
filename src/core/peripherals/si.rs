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

//! Serial interface (SI) registers
//!
//! The SI moves the 64-byte PIF RAM block to or from RDRAM. Writing either
//! PIF address register starts the transfer; the address written is ignored
//! because PIF RAM is the only target.

use crate::core::interrupt::{interrupts, InterruptController};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Size of every SI transfer
pub const SI_BLOCK_SIZE: u32 = 64;

/// DMA decoded from an SI PIF address write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiDma {
    /// True for SI_PIF_ADDR_RD64B (PIF RAM -> RDRAM)
    pub to_rdram: bool,
    pub dram_addr: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SiRegisters {
    dram_addr: u32,
}

impl SiRegisters {
    pub fn new() -> Self {
        Self { dram_addr: 0 }
    }

    pub fn read_register(&self, offset: u32, dma_busy: bool, mi: &InterruptController) -> u32 {
        match offset & 0x1F {
            0x00 => self.dram_addr,
            0x18 => {
                let mut status = 0;
                if dma_busy {
                    status |= 1;
                }
                if mi.is_pending(interrupts::SI) {
                    status |= 1 << 12;
                }
                status
            }
            _ => 0,
        }
    }

    pub fn write_register(
        &mut self,
        offset: u32,
        value: u32,
        mi: &mut InterruptController,
    ) -> Option<SiDma> {
        match offset & 0x1F {
            0x00 => self.dram_addr = value & 0x00FF_FFF8,
            0x04 => {
                return Some(SiDma {
                    to_rdram: true,
                    dram_addr: self.dram_addr,
                })
            }
            0x10 => {
                return Some(SiDma {
                    to_rdram: false,
                    dram_addr: self.dram_addr,
                })
            }
            0x18 => mi.acknowledge(interrupts::SI),
            _ => log::trace!("SI write to unknown offset 0x{:02X} ignored", offset),
        }
        None
    }
}

impl Default for SiRegisters {
    fn default() -> Self {
        Self::new()
    }
}
