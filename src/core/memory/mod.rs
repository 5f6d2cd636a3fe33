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

//! Memory bus
//!
//! The Bus owns every piece of physical memory, all RCP register groups, the
//! MI interrupt controller and the DMA queue. Components never hold on to it:
//! the CPU and RSP receive it as a `&mut Bus` for the duration of a step.
//!
//! # Memory Map
//!
//! | Physical Address Range  | Region          | Access |
//! |-------------------------|-----------------|--------|
//! | 0x00000000-0x007FFFFF   | RDRAM (8MB)     | R/W    |
//! | 0x04000000-0x04000FFF   | SP DMEM         | R/W    |
//! | 0x04001000-0x04001FFF   | SP IMEM         | R/W    |
//! | 0x04040000-0x0407FFFF   | SP registers    | R/W    |
//! | 0x04080000              | SP_PC           | R/W    |
//! | 0x04100000-0x041FFFFF   | DP registers    | R/W    |
//! | 0x04300000-0x043FFFFF   | MI registers    | R/W    |
//! | 0x04400000-0x044FFFFF   | VI registers    | R/W    |
//! | 0x04500000-0x045FFFFF   | AI registers    | R/W    |
//! | 0x04600000-0x046FFFFF   | PI registers    | R/W    |
//! | 0x04700000-0x047FFFFF   | RI registers    | R/W    |
//! | 0x04800000-0x048FFFFF   | SI registers    | R/W    |
//! | 0x10000000-0x1FBFFFFF   | Cartridge ROM   | R only |
//! | 0x1FC00000-0x1FC007BF   | PIF ROM         | R only |
//! | 0x1FC007C0-0x1FC007FF   | PIF RAM         | R/W    |
//!
//! Reads from anything else return zero and writes are dropped.
//!
//! # Example
//!
//! ```
//! use n64rx::core::memory::Bus;
//!
//! let mut bus = Bus::new();
//!
//! // Write through KSEG0, read back through KSEG1
//! bus.write32(0x8000_0000, 0x1234_5678);
//! assert_eq!(bus.read32(0xA000_0000), 0x1234_5678);
//! assert_eq!(bus.read8(0x0000_0001), 0x34);
//! ```

mod region;

pub use region::MemoryRegion;

use crate::core::controller::Pif;
use crate::core::dma::{DmaEndpoint, DmaOwner, DmaQueue, DmaRequest};
use crate::core::interrupt::InterruptController;
use crate::core::loader::Cartridge;
use crate::core::peripherals::{
    AiRegisters, DpRegisters, PiRegisters, RiRegisters, SiRegisters, SpRegisters, ViRegisters,
};
use crate::core::peripherals::si::SI_BLOCK_SIZE;
use crate::core::rdp::DisplayProcessor;

#[cfg(test)]
mod tests;

/// Memory bus owning physical memory, device registers and DMA state
pub struct Bus {
    /// Main RDRAM (8MB)
    rdram: Vec<u8>,

    /// RSP data memory (4KB)
    dmem: Vec<u8>,

    /// RSP instruction memory (4KB)
    imem: Vec<u8>,

    /// Inserted cartridge, if any
    cartridge: Option<Cartridge>,

    /// PIF boot ROM, PIF RAM and controller ports
    pub pif: Pif,

    /// MIPS interface / interrupt controller
    pub mi: InterruptController,

    pub sp: SpRegisters,
    pub dp: DpRegisters,
    pub vi: ViRegisters,
    pub ai: AiRegisters,
    pub pi: PiRegisters,
    pub si: SiRegisters,
    pub ri: RiRegisters,

    /// Queued DMA transfers
    dma: DmaQueue,

    /// Scheduler tick, used to stamp DMA deadlines
    tick: u64,

    /// Samples delivered by completed AI DMAs (interleaved L/R)
    audio_samples: Vec<i16>,
}

impl Bus {
    /// RDRAM size (8MB, expansion pak installed)
    pub const RDRAM_SIZE: usize = 8 * 1024 * 1024;

    /// DMEM / IMEM size
    pub const SP_MEM_SIZE: usize = 0x1000;

    /// Physical base of DMEM
    pub const DMEM_START: u32 = 0x0400_0000;

    /// Physical base of IMEM
    pub const IMEM_START: u32 = 0x0400_1000;

    /// Physical base of the SP register group
    pub const SP_REGS_START: u32 = 0x0404_0000;

    /// Physical base of the DP register group
    pub const DP_REGS_START: u32 = 0x0410_0000;

    /// Physical base of the cartridge domain
    pub const CART_START: u32 = 0x1000_0000;

    /// Physical base of PIF RAM
    pub const PIF_RAM_START: u32 = 0x1FC0_07C0;

    /// Create a new Bus with zeroed memory and power-on register state
    pub fn new() -> Self {
        Self {
            rdram: vec![0u8; Self::RDRAM_SIZE],
            dmem: vec![0u8; Self::SP_MEM_SIZE],
            imem: vec![0u8; Self::SP_MEM_SIZE],
            cartridge: None,
            pif: Pif::new(),
            mi: InterruptController::new(),
            sp: SpRegisters::new(),
            dp: DpRegisters::new(),
            vi: ViRegisters::new(),
            ai: AiRegisters::new(),
            pi: PiRegisters::new(),
            si: SiRegisters::new(),
            ri: RiRegisters::new(),
            dma: DmaQueue::new(0),
            tick: 0,
            audio_samples: Vec::new(),
        }
    }

    /// Reset volatile state
    ///
    /// Memory and registers are cleared; the cartridge and PIF ROM stay.
    pub fn reset(&mut self) {
        self.rdram.fill(0);
        self.dmem.fill(0);
        self.imem.fill(0);
        self.pif.ram_mut().fill(0);
        self.mi = InterruptController::new();
        self.sp = SpRegisters::new();
        self.dp = DpRegisters::new();
        self.vi = ViRegisters::new();
        self.ai = AiRegisters::new();
        self.pi = PiRegisters::new();
        self.si = SiRegisters::new();
        self.ri = RiRegisters::new();
        self.dma.clear();
        self.tick = 0;
        self.audio_samples.clear();
    }

    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    // === Direct memory access for components ===

    pub fn rdram(&self) -> &[u8] {
        &self.rdram
    }

    pub fn rdram_mut(&mut self) -> &mut [u8] {
        &mut self.rdram
    }

    pub fn dmem(&self) -> &[u8] {
        &self.dmem
    }

    pub fn dmem_mut(&mut self) -> &mut [u8] {
        &mut self.dmem
    }

    pub fn imem(&self) -> &[u8] {
        &self.imem
    }

    pub fn imem_mut(&mut self) -> &mut [u8] {
        &mut self.imem
    }

    /// Fetch an RSP instruction word from IMEM
    #[inline]
    pub fn imem_read32(&self, offset: u32) -> u32 {
        let o = (offset & 0xFFC) as usize;
        u32::from_be_bytes([self.imem[o], self.imem[o + 1], self.imem[o + 2], self.imem[o + 3]])
    }

    /// Copy bytes into RDRAM at a physical address, clipped to RDRAM
    pub fn load_rdram(&mut self, paddr: u32, data: &[u8]) {
        let start = (paddr as usize).min(Self::RDRAM_SIZE);
        let len = data.len().min(Self::RDRAM_SIZE - start);
        self.rdram[start..start + len].copy_from_slice(&data[..len]);
    }

    // === CPU-visible accessors ===

    /// Read a byte from a virtual address
    pub fn read8(&mut self, vaddr: u32) -> u8 {
        let paddr = Self::translate_address(vaddr);
        let region = Self::identify_region(paddr);
        if region.is_memory() {
            self.read_memory8(region, paddr)
        } else {
            let word = self.read_register(region, paddr & !3);
            (word >> (24 - (paddr & 3) * 8)) as u8
        }
    }

    /// Read a big-endian halfword from a virtual address
    pub fn read16(&mut self, vaddr: u32) -> u16 {
        let paddr = Self::translate_address(vaddr);
        let region = Self::identify_region(paddr);
        if region.is_memory() {
            u16::from_be_bytes([
                self.read_memory8(region, paddr),
                self.read_memory8(region, paddr.wrapping_add(1)),
            ])
        } else {
            let word = self.read_register(region, paddr & !3);
            (word >> (16 - (paddr & 2) * 8)) as u16
        }
    }

    /// Read a big-endian word from a virtual address
    pub fn read32(&mut self, vaddr: u32) -> u32 {
        let paddr = Self::translate_address(vaddr);
        let region = Self::identify_region(paddr);
        if region.is_memory() {
            u32::from_be_bytes([
                self.read_memory8(region, paddr),
                self.read_memory8(region, paddr.wrapping_add(1)),
                self.read_memory8(region, paddr.wrapping_add(2)),
                self.read_memory8(region, paddr.wrapping_add(3)),
            ])
        } else {
            self.read_register(region, paddr & !3)
        }
    }

    /// Read a big-endian doubleword from a virtual address
    pub fn read64(&mut self, vaddr: u32) -> u64 {
        let hi = self.read32(vaddr) as u64;
        let lo = self.read32(vaddr.wrapping_add(4)) as u64;
        (hi << 32) | lo
    }

    /// Write a byte to a virtual address
    pub fn write8(&mut self, vaddr: u32, value: u8) {
        let paddr = Self::translate_address(vaddr);
        let region = Self::identify_region(paddr);
        if region.is_memory() {
            self.write_memory8(region, paddr, value);
        } else {
            let shift = 24 - (paddr & 3) * 8;
            self.merge_register_write(region, paddr, 0xFF << shift, (value as u32) << shift);
        }
    }

    /// Write a big-endian halfword to a virtual address
    pub fn write16(&mut self, vaddr: u32, value: u16) {
        let paddr = Self::translate_address(vaddr);
        let region = Self::identify_region(paddr);
        if region.is_memory() {
            let [hi, lo] = value.to_be_bytes();
            self.write_memory8(region, paddr, hi);
            self.write_memory8(region, paddr.wrapping_add(1), lo);
        } else {
            let shift = 16 - (paddr & 2) * 8;
            self.merge_register_write(region, paddr, 0xFFFF << shift, (value as u32) << shift);
        }
    }

    /// Write a big-endian word to a virtual address
    pub fn write32(&mut self, vaddr: u32, value: u32) {
        let paddr = Self::translate_address(vaddr);
        let region = Self::identify_region(paddr);
        if region.is_memory() {
            for (i, byte) in value.to_be_bytes().into_iter().enumerate() {
                self.write_memory8(region, paddr.wrapping_add(i as u32), byte);
            }
        } else {
            self.write_register(region, paddr & !3, value);
        }
    }

    /// Write a big-endian doubleword to a virtual address
    pub fn write64(&mut self, vaddr: u32, value: u64) {
        self.write32(vaddr, (value >> 32) as u32);
        self.write32(vaddr.wrapping_add(4), value as u32);
    }

    // === Memory regions ===

    fn read_memory8(&self, region: MemoryRegion, paddr: u32) -> u8 {
        match region {
            MemoryRegion::Rdram => self.rdram.get(paddr as usize).copied().unwrap_or(0),
            MemoryRegion::SpMemory => {
                let offset = (paddr & 0xFFF) as usize;
                if paddr & 0x1000 != 0 {
                    self.imem[offset]
                } else {
                    self.dmem[offset]
                }
            }
            MemoryRegion::Cartridge => self
                .cartridge
                .as_ref()
                .map(|cart| cart.read8(paddr - Self::CART_START))
                .unwrap_or(0),
            MemoryRegion::PifRom => self.pif.read_rom8(paddr - MemoryRegion::PifRom.base()),
            MemoryRegion::PifRam => self.pif.read_ram8(paddr - Self::PIF_RAM_START),
            _ => 0,
        }
    }

    fn write_memory8(&mut self, region: MemoryRegion, paddr: u32, value: u8) {
        match region {
            MemoryRegion::Rdram => {
                if let Some(byte) = self.rdram.get_mut(paddr as usize) {
                    *byte = value;
                }
            }
            MemoryRegion::SpMemory => {
                let offset = (paddr & 0xFFF) as usize;
                if paddr & 0x1000 != 0 {
                    self.imem[offset] = value;
                } else {
                    self.dmem[offset] = value;
                }
            }
            MemoryRegion::PifRam => self.pif.write_ram8(paddr - Self::PIF_RAM_START, value),
            _ => log::trace!("Write to read-only {:?} at 0x{:08X} ignored", region, paddr),
        }
    }

    // === Register groups ===

    fn read_register(&mut self, region: MemoryRegion, paddr: u32) -> u32 {
        let offset = paddr - region.base();
        let value = match region {
            MemoryRegion::SpRegisters => {
                let busy = self.dma.is_busy(DmaOwner::Sp);
                self.sp.read_register(offset, busy)
            }
            MemoryRegion::SpPc => {
                if offset == 0 {
                    self.sp.pc()
                } else {
                    0
                }
            }
            MemoryRegion::DpRegisters => self.dp.read_register(offset),
            MemoryRegion::Mi => self.mi.read_register(offset),
            MemoryRegion::Vi => self.vi.read_register(offset),
            MemoryRegion::Ai => self.ai.read_register(offset, self.dma.is_busy(DmaOwner::Ai)),
            MemoryRegion::Pi => {
                self.pi
                    .read_register(offset, self.dma.is_busy(DmaOwner::Pi), &self.mi)
            }
            MemoryRegion::Ri => self.ri.read_register(offset),
            MemoryRegion::Si => {
                self.si
                    .read_register(offset, self.dma.is_busy(DmaOwner::Si), &self.mi)
            }
            _ => {
                log::trace!("Unmapped read at 0x{:08X}", paddr);
                0
            }
        };
        log::trace!("{:?} read 0x{:08X} = 0x{:08X}", region, paddr, value);
        value
    }

    /// Current register value without read side effects
    fn peek_register(&self, region: MemoryRegion, paddr: u32) -> u32 {
        let offset = paddr - region.base();
        match region {
            MemoryRegion::SpRegisters => {
                self.sp.peek_register(offset, self.dma.is_busy(DmaOwner::Sp))
            }
            MemoryRegion::SpPc if offset == 0 => self.sp.pc(),
            MemoryRegion::DpRegisters => self.dp.read_register(offset),
            MemoryRegion::Mi => self.mi.read_register(offset),
            MemoryRegion::Vi => self.vi.read_register(offset),
            MemoryRegion::Pi => self.pi.read_register(offset, false, &self.mi),
            MemoryRegion::Ri => self.ri.read_register(offset),
            _ => 0,
        }
    }

    /// Merge a sub-word write into the containing register and write it
    fn merge_register_write(&mut self, region: MemoryRegion, paddr: u32, mask: u32, bits: u32) {
        let aligned = paddr & !3;
        let current = self.peek_register(region, aligned);
        self.write_register(region, aligned, (current & !mask) | (bits & mask));
    }

    fn write_register(&mut self, region: MemoryRegion, paddr: u32, value: u32) {
        let offset = paddr - region.base();
        log::trace!("{:?} write 0x{:08X} = 0x{:08X}", region, paddr, value);

        match region {
            MemoryRegion::SpRegisters => {
                if let Some(dma) = self.sp.write_register(offset, value, &mut self.mi) {
                    let (source, destination) = if dma.to_rdram {
                        (DmaEndpoint::SpMemory(dma.mem_addr), DmaEndpoint::Rdram(dma.dram_addr))
                    } else {
                        (DmaEndpoint::Rdram(dma.dram_addr), DmaEndpoint::SpMemory(dma.mem_addr))
                    };
                    let request = DmaRequest::new(DmaOwner::Sp, source, destination, dma.length)
                        .with_rows(dma.rows, dma.skip);
                    self.dma.push(request, self.tick);
                }
            }
            MemoryRegion::SpPc => {
                if offset == 0 {
                    self.sp.set_pc(value);
                }
            }
            MemoryRegion::DpRegisters => self.dp.write_register(offset, value),
            MemoryRegion::Mi => self.mi.write_register(offset, value),
            MemoryRegion::Vi => self.vi.write_register(offset, value, &mut self.mi),
            MemoryRegion::Ai => {
                if let Some(dma) = self.ai.write_register(offset, value, &mut self.mi) {
                    let request = DmaRequest::new(
                        DmaOwner::Ai,
                        DmaEndpoint::Rdram(dma.dram_addr),
                        DmaEndpoint::AudioOut,
                        dma.length,
                    );
                    self.dma.push(request, self.tick);
                }
            }
            MemoryRegion::Pi => {
                if let Some(dma) = self.pi.write_register(offset, value, &mut self.mi) {
                    let cart =
                        DmaEndpoint::Cartridge(dma.cart_addr.wrapping_sub(Self::CART_START));
                    let dram = DmaEndpoint::Rdram(dma.dram_addr);
                    let (source, destination) =
                        if dma.to_rdram { (cart, dram) } else { (dram, cart) };
                    let request = DmaRequest::new(DmaOwner::Pi, source, destination, dma.length);
                    self.dma.push(request, self.tick);
                }
            }
            MemoryRegion::Ri => self.ri.write_register(offset, value),
            MemoryRegion::Si => {
                if let Some(dma) = self.si.write_register(offset, value, &mut self.mi) {
                    let dram = DmaEndpoint::Rdram(dma.dram_addr);
                    let (source, destination) = if dma.to_rdram {
                        (DmaEndpoint::PifRam, dram)
                    } else {
                        (dram, DmaEndpoint::PifRam)
                    };
                    self.dma.push(
                        DmaRequest::new(DmaOwner::Si, source, destination, SI_BLOCK_SIZE),
                        self.tick,
                    );
                }
            }
            _ => log::trace!("Unmapped write at 0x{:08X} ignored", paddr),
        }
    }

    // === DMA ===

    /// Current scheduler tick
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance the scheduler tick by one line
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    pub fn set_dma_delay(&mut self, delay: u64) {
        self.dma.set_delay(delay);
    }

    pub fn dma_queue(&self) -> &DmaQueue {
        &self.dma
    }

    pub fn restore_dma_queue(&mut self, queue: DmaQueue) {
        self.dma = queue;
    }

    /// True while a DMA owned by `owner` is queued
    pub fn dma_busy(&self, owner: DmaOwner) -> bool {
        self.dma.is_busy(owner)
    }

    /// Perform every DMA whose deadline has been reached
    ///
    /// Each transfer copies all of its bytes before the owner's interrupt is
    /// posted. Returns the number of completed transfers.
    pub fn complete_due_dma(&mut self) -> usize {
        let due = self.dma.take_due(self.tick);
        for request in &due {
            self.perform_dma(request);

            if request.owner == DmaOwner::Pi {
                self.pi.finish_dma(request.length);
            }
            if let Some(source) = request.owner.interrupt() {
                self.mi.raise(source);
            }
            log::debug!(
                "DMA complete: {:?} {} bytes at tick {}",
                request.owner,
                request.total_bytes(),
                self.tick
            );
        }
        due.len()
    }

    fn perform_dma(&mut self, request: &DmaRequest) {
        if request.source == DmaEndpoint::PifRam {
            self.pif.process_commands();
        }

        let mut audio = Vec::new();
        for row in 0..request.rows {
            for index in 0..request.length {
                let byte = self.dma_read(request, request.source, row, index);
                match request.destination {
                    DmaEndpoint::AudioOut => audio.push(byte),
                    destination => self.dma_write(request, destination, row, index, byte),
                }
            }
        }

        self.audio_samples.extend(
            audio
                .chunks_exact(2)
                .map(|pair| i16::from_be_bytes([pair[0], pair[1]])),
        );
    }

    /// Byte offset of (`row`, `index`) relative to an endpoint's base
    ///
    /// RDRAM rows are separated by `skip`; SP memory rows are contiguous.
    fn dma_offset(request: &DmaRequest, endpoint: DmaEndpoint, row: u32, index: u32) -> u32 {
        match endpoint {
            DmaEndpoint::Rdram(_) => row * (request.length + request.skip) + index,
            _ => row * request.length + index,
        }
    }

    fn dma_read(&self, request: &DmaRequest, endpoint: DmaEndpoint, row: u32, index: u32) -> u8 {
        let offset = Self::dma_offset(request, endpoint, row, index);
        match endpoint {
            DmaEndpoint::Rdram(base) => self
                .rdram
                .get(((base + offset) & 0x00FF_FFFF) as usize)
                .copied()
                .unwrap_or(0),
            DmaEndpoint::Cartridge(base) => self
                .cartridge
                .as_ref()
                .map(|cart| cart.read8(base.wrapping_add(offset)))
                .unwrap_or(0),
            DmaEndpoint::PifRam => self.pif.read_ram8(offset),
            DmaEndpoint::SpMemory(base) => {
                let address = (base & 0xFFF) + offset;
                let bank = if base & 0x1000 != 0 { &self.imem } else { &self.dmem };
                bank[(address & 0xFFF) as usize]
            }
            DmaEndpoint::AudioOut => 0,
        }
    }

    fn dma_write(
        &mut self,
        request: &DmaRequest,
        endpoint: DmaEndpoint,
        row: u32,
        index: u32,
        value: u8,
    ) {
        let offset = Self::dma_offset(request, endpoint, row, index);
        match endpoint {
            DmaEndpoint::Rdram(base) => {
                if let Some(byte) = self.rdram.get_mut(((base + offset) & 0x00FF_FFFF) as usize) {
                    *byte = value;
                }
            }
            DmaEndpoint::PifRam => self.pif.write_ram8(offset, value),
            DmaEndpoint::SpMemory(base) => {
                let address = ((base & 0xFFF) + offset) & 0xFFF;
                let bank = if base & 0x1000 != 0 { &mut self.imem } else { &mut self.dmem };
                bank[address as usize] = value;
            }
            DmaEndpoint::Cartridge(_) | DmaEndpoint::AudioOut => {}
        }
    }

    // === Audio and display hand-off ===

    /// Take every audio sample delivered since the last call
    pub fn drain_audio_samples(&mut self) -> Vec<i16> {
        std::mem::take(&mut self.audio_samples)
    }

    /// Fetch the pending DP command range and feed it to the display processor
    ///
    /// Words come from RDRAM, or from DMEM when DPC_STATUS.XBUS is set.
    /// Returns the number of words submitted.
    pub fn feed_display_processor(&mut self, rdp: &mut DisplayProcessor) -> usize {
        let Some(range) = self.dp.take_pending() else {
            return 0;
        };

        let mut words = Vec::with_capacity(((range.end - range.start) / 8) as usize);
        let mut address = range.start;
        while address + 8 <= range.end {
            let mut bytes = [0u8; 8];
            for (i, byte) in bytes.iter_mut().enumerate() {
                let a = address + i as u32;
                *byte = if range.xbus {
                    self.dmem[(a & 0xFFF) as usize]
                } else {
                    self.rdram.get(a as usize).copied().unwrap_or(0)
                };
            }
            words.push(u64::from_be_bytes(bytes));
            address += 8;
        }

        log::debug!(
            "DP: {} command words from {} 0x{:06X}",
            words.len(),
            if range.xbus { "DMEM" } else { "RDRAM" },
            range.start
        );
        self.dp.add_clock(words.len() as u32);
        rdp.submit(&words);
        words.len()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
