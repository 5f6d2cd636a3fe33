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

//! Signal processor (RSP) interface registers
//!
//! ```text
//! 0x04040000  SP_MEM_ADDR   DMEM/IMEM address (bit 12 selects IMEM)
//! 0x04040004  SP_DRAM_ADDR  RDRAM address
//! 0x04040008  SP_RD_LEN     RDRAM -> SP memory, starts DMA
//! 0x0404000C  SP_WR_LEN     SP memory -> RDRAM, starts DMA
//! 0x04040010  SP_STATUS
//! 0x04040014  SP_DMA_FULL
//! 0x04040018  SP_DMA_BUSY
//! 0x0404001C  SP_SEMAPHORE
//! 0x04080000  SP_PC
//! ```

use crate::core::interrupt::{interrupts, InterruptController};
use bincode::{Decode, Encode};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// SP_STATUS read layout
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SpStatus: u32 {
        const HALT = 1 << 0;
        const BROKE = 1 << 1;
        const DMA_BUSY = 1 << 2;
        const DMA_FULL = 1 << 3;
        const IO_FULL = 1 << 4;
        const SSTEP = 1 << 5;
        const INTR_ON_BREAK = 1 << 6;
        const SIG0 = 1 << 7;
        const SIG1 = 1 << 8;
        const SIG2 = 1 << 9;
        const SIG3 = 1 << 10;
        const SIG4 = 1 << 11;
        const SIG5 = 1 << 12;
        const SIG6 = 1 << 13;
        const SIG7 = 1 << 14;
    }
}

/// DMA transfer decoded from an SP length register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpDma {
    /// True for SP_WR_LEN (SP memory -> RDRAM)
    pub to_rdram: bool,
    /// SP memory offset including the IMEM bit
    pub mem_addr: u32,
    pub dram_addr: u32,
    /// Bytes per row, rounded up to 8
    pub length: u32,
    pub rows: u32,
    pub skip: u32,
}

/// SP register group
///
/// The status register is stored as raw bits so snapshots stay plain data;
/// [`SpRegisters::status`] exposes it as [`SpStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SpRegisters {
    mem_addr: u32,
    dram_addr: u32,
    rd_len: u32,
    wr_len: u32,
    status: u32,
    semaphore: u32,
    pc: u32,
}

impl SpRegisters {
    /// Power-on state: the RSP is halted
    pub fn new() -> Self {
        Self {
            mem_addr: 0,
            dram_addr: 0,
            rd_len: 0,
            wr_len: 0,
            status: SpStatus::HALT.bits(),
            semaphore: 0,
            pc: 0,
        }
    }

    pub fn status(&self) -> SpStatus {
        SpStatus::from_bits_truncate(self.status)
    }

    pub fn set_status(&mut self, status: SpStatus) {
        self.status = status.bits();
    }

    pub fn halted(&self) -> bool {
        self.status().contains(SpStatus::HALT)
    }

    /// SP_PC (12 bits, word aligned)
    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc & 0xFFC;
    }

    /// Read a register at `offset` from 0x04040000
    ///
    /// `dma_busy` is the queue-derived busy state. Reading SP_SEMAPHORE
    /// returns the current value and then sets it.
    pub fn read_register(&mut self, offset: u32, dma_busy: bool) -> u32 {
        let value = self.peek_register(offset, dma_busy);
        if offset & 0x1F == 0x1C {
            self.semaphore = 1;
        }
        value
    }

    /// Read a register without the SP_SEMAPHORE side effect
    pub fn peek_register(&self, offset: u32, dma_busy: bool) -> u32 {
        match offset & 0x1F {
            0x00 => self.mem_addr,
            0x04 => self.dram_addr,
            0x08 => self.rd_len,
            0x0C => self.wr_len,
            0x10 => {
                let mut status = self.status();
                status.set(SpStatus::DMA_BUSY, dma_busy);
                status.bits()
            }
            0x14 => 0,
            0x18 => dma_busy as u32,
            0x1C => self.semaphore,
            _ => 0,
        }
    }

    /// Write a register at `offset` from 0x04040000
    ///
    /// Returns the DMA to queue when a length register was written.
    pub fn write_register(
        &mut self,
        offset: u32,
        value: u32,
        mi: &mut InterruptController,
    ) -> Option<SpDma> {
        match offset & 0x1F {
            0x00 => self.mem_addr = value & 0x1FF8,
            0x04 => self.dram_addr = value & 0x00FF_FFF8,
            0x08 => {
                self.rd_len = value;
                return Some(self.decode_dma(value, false));
            }
            0x0C => {
                self.wr_len = value;
                return Some(self.decode_dma(value, true));
            }
            0x10 => self.write_status(value, mi),
            0x1C => self.semaphore = 0,
            _ => log::trace!("SP write to read-only offset 0x{:02X} ignored", offset),
        }
        None
    }

    fn decode_dma(&self, value: u32, to_rdram: bool) -> SpDma {
        SpDma {
            to_rdram,
            mem_addr: self.mem_addr,
            dram_addr: self.dram_addr,
            length: ((value & 0xFFF) | 7) + 1,
            rows: ((value >> 12) & 0xFF) + 1,
            skip: (value >> 20) & 0xFF8,
        }
    }

    /// SP_STATUS write: clear/set bit pairs
    fn write_status(&mut self, value: u32, mi: &mut InterruptController) {
        let mut status = self.status();
        let bit = |n: u32| value & (1 << n) != 0;

        if bit(0) {
            status.remove(SpStatus::HALT);
        }
        if bit(1) {
            status.insert(SpStatus::HALT);
        }
        if bit(2) {
            status.remove(SpStatus::BROKE);
        }
        if bit(3) {
            mi.acknowledge(interrupts::SP);
        }
        if bit(4) {
            mi.raise(interrupts::SP);
        }
        if bit(5) {
            status.remove(SpStatus::SSTEP);
        }
        if bit(6) {
            status.insert(SpStatus::SSTEP);
        }
        if bit(7) {
            status.remove(SpStatus::INTR_ON_BREAK);
        }
        if bit(8) {
            status.insert(SpStatus::INTR_ON_BREAK);
        }
        for signal in 0..8 {
            let flag = SpStatus::from_bits_retain(SpStatus::SIG0.bits() << signal);
            if bit(9 + signal * 2) {
                status.remove(flag);
            }
            if bit(10 + signal * 2) {
                status.insert(flag);
            }
        }

        log::trace!("SP_STATUS = 0x{:04X}", status.bits());
        self.status = status.bits();
    }
}

impl Default for SpRegisters {
    fn default() -> Self {
        Self::new()
    }
}
