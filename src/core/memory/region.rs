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

//! Memory region identification and address translation
//!
//! Physical addresses are decoded against an ordered table; the first
//! matching range wins and everything else is [`MemoryRegion::Unmapped`].

use super::Bus;

/// Memory region identification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// Main RDRAM (8MB)
    Rdram,
    /// RSP data or instruction memory (bit 12 selects IMEM)
    SpMemory,
    /// SP register group
    SpRegisters,
    /// SP_PC / SP_IBIST
    SpPc,
    /// DP command registers
    DpRegisters,
    /// MIPS interface
    Mi,
    /// Video interface
    Vi,
    /// Audio interface
    Ai,
    /// Peripheral interface
    Pi,
    /// RDRAM interface
    Ri,
    /// Serial interface
    Si,
    /// Cartridge domain 1 ROM
    Cartridge,
    /// PIF boot ROM
    PifRom,
    /// PIF RAM (64 bytes)
    PifRam,
    /// Unmapped region
    Unmapped,
}

/// Ordered physical decode table: (start, end inclusive, region)
const REGION_TABLE: &[(u32, u32, MemoryRegion)] = &[
    (0x0000_0000, 0x007F_FFFF, MemoryRegion::Rdram),
    (0x0400_0000, 0x0403_FFFF, MemoryRegion::SpMemory),
    (0x0404_0000, 0x0407_FFFF, MemoryRegion::SpRegisters),
    (0x0408_0000, 0x040F_FFFF, MemoryRegion::SpPc),
    (0x0410_0000, 0x041F_FFFF, MemoryRegion::DpRegisters),
    (0x0430_0000, 0x043F_FFFF, MemoryRegion::Mi),
    (0x0440_0000, 0x044F_FFFF, MemoryRegion::Vi),
    (0x0450_0000, 0x045F_FFFF, MemoryRegion::Ai),
    (0x0460_0000, 0x046F_FFFF, MemoryRegion::Pi),
    (0x0470_0000, 0x047F_FFFF, MemoryRegion::Ri),
    (0x0480_0000, 0x048F_FFFF, MemoryRegion::Si),
    (0x1000_0000, 0x1FBF_FFFF, MemoryRegion::Cartridge),
    (0x1FC0_0000, 0x1FC0_07BF, MemoryRegion::PifRom),
    (0x1FC0_07C0, 0x1FC0_07FF, MemoryRegion::PifRam),
];

impl MemoryRegion {
    /// True for regions backed by byte-addressable storage
    pub fn is_memory(self) -> bool {
        matches!(
            self,
            MemoryRegion::Rdram
                | MemoryRegion::SpMemory
                | MemoryRegion::Cartridge
                | MemoryRegion::PifRom
                | MemoryRegion::PifRam
        )
    }

    /// Start of the region in physical address space
    pub fn base(self) -> u32 {
        match self {
            MemoryRegion::Rdram | MemoryRegion::Unmapped => 0,
            MemoryRegion::SpMemory => 0x0400_0000,
            MemoryRegion::SpRegisters => 0x0404_0000,
            MemoryRegion::SpPc => 0x0408_0000,
            MemoryRegion::DpRegisters => 0x0410_0000,
            MemoryRegion::Mi => 0x0430_0000,
            MemoryRegion::Vi => 0x0440_0000,
            MemoryRegion::Ai => 0x0450_0000,
            MemoryRegion::Pi => 0x0460_0000,
            MemoryRegion::Ri => 0x0470_0000,
            MemoryRegion::Si => 0x0480_0000,
            MemoryRegion::Cartridge => 0x1000_0000,
            MemoryRegion::PifRom => 0x1FC0_0000,
            MemoryRegion::PifRam => 0x1FC0_07C0,
        }
    }
}

impl Bus {
    /// Translate a virtual address to a physical address
    ///
    /// KSEG0 (0x80000000) and KSEG1 (0xA0000000) both mirror physical memory,
    /// and with no TLB the other segments are folded the same way: the upper
    /// three bits are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::memory::Bus;
    ///
    /// assert_eq!(Bus::translate_address(0x8000_0400), 0x0000_0400);
    /// assert_eq!(Bus::translate_address(0xA430_0008), 0x0430_0008);
    /// ```
    #[inline(always)]
    pub fn translate_address(vaddr: u32) -> u32 {
        vaddr & 0x1FFF_FFFF
    }

    /// Identify which region a physical address belongs to
    pub fn identify_region(paddr: u32) -> MemoryRegion {
        REGION_TABLE
            .iter()
            .find(|(start, end, _)| (*start..=*end).contains(&paddr))
            .map(|(_, _, region)| *region)
            .unwrap_or(MemoryRegion::Unmapped)
    }
}
