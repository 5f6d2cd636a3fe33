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

//! Coprocessor 0 (System Control)
//!
//! COP0 holds exception state, the interrupt mask and the Count/Compare
//! timer. With no TLB emulated, the TLB registers are plain storage.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Status register bits
pub mod status {
    /// Global interrupt enable
    pub const IE: u64 = 1 << 0;
    /// Exception level
    pub const EXL: u64 = 1 << 1;
    /// Error level
    pub const ERL: u64 = 1 << 2;
    /// Interrupt mask (IM0-IM7)
    pub const IM_MASK: u64 = 0xFF00;
    /// Bootstrap exception vectors
    pub const BEV: u64 = 1 << 22;
    /// FPU register mode: 32 independent 64-bit registers when set
    pub const FR: u64 = 1 << 26;
    /// COP0 usable
    pub const CU0: u64 = 1 << 28;
    /// COP1 usable
    pub const CU1: u64 = 1 << 29;
}

/// Cause register bits
pub mod cause {
    /// Exception code field (bits 2-6)
    pub const EXC_CODE_MASK: u64 = 0x7C;
    /// Software interrupts IP0/IP1, the only writable bits
    pub const IP_SOFTWARE: u64 = 0x0300;
    /// RCP interrupt line (MI)
    pub const IP2: u64 = 1 << 10;
    /// Timer interrupt (Count == Compare)
    pub const IP7: u64 = 1 << 15;
    /// Coprocessor error field (bits 28-29)
    pub const CE_MASK: u64 = 0x3000_0000;
    /// Exception taken in a branch delay slot
    pub const BD: u64 = 1 << 31;
}

/// Coprocessor 0 register file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub(crate) struct Cop0 {
    pub(crate) regs: [u64; 32],

    /// Count advances on every second retired instruction
    half_cycle: bool,
}

impl Cop0 {
    pub const RANDOM: usize = 1;
    pub const WIRED: usize = 6;
    /// Bad Virtual Address
    pub const BADVADDR: usize = 8;
    pub const COUNT: usize = 9;
    pub const COMPARE: usize = 11;
    /// Status Register
    pub const STATUS: usize = 12;
    /// Cause Register
    pub const CAUSE: usize = 13;
    /// Exception PC
    pub const EPC: usize = 14;
    /// Processor ID
    pub const PRID: usize = 15;
    pub const CONFIG: usize = 16;
    pub const LLADDR: usize = 17;
    pub const ERROREPC: usize = 30;

    /// VR4300 revision 2.2
    const PRID_VALUE: u64 = 0x0B22;

    /// Big-endian, 32-bit bus, cached kseg0
    const CONFIG_VALUE: u64 = 0x7006_E463;

    pub(crate) fn new() -> Self {
        let mut cop0 = Self {
            regs: [0u64; 32],
            half_cycle: false,
        };
        cop0.reset();
        cop0
    }

    pub(crate) fn reset(&mut self) {
        self.regs = [0u64; 32];
        self.regs[Self::RANDOM] = 31;
        self.regs[Self::STATUS] = status::ERL | status::BEV;
        self.regs[Self::PRID] = Self::PRID_VALUE;
        self.regs[Self::CONFIG] = Self::CONFIG_VALUE;
        self.half_cycle = false;
    }

    #[inline(always)]
    pub(crate) fn status(&self) -> u64 {
        self.regs[Self::STATUS]
    }

    #[inline(always)]
    pub(crate) fn cause(&self) -> u64 {
        self.regs[Self::CAUSE]
    }

    /// Read a register as seen by MFC0/DMFC0
    pub(crate) fn read(&self, index: usize) -> u64 {
        match index {
            Self::RANDOM => self.regs[Self::RANDOM].max(self.regs[Self::WIRED]),
            _ => self.regs[index & 0x1F],
        }
    }

    /// Write a register as MTC0/DMTC0 would
    pub(crate) fn write(&mut self, index: usize, value: u64) {
        match index {
            Self::RANDOM | Self::PRID | 7 | 21..=25 | 31 => {}
            Self::COUNT => self.regs[Self::COUNT] = value & 0xFFFF_FFFF,
            Self::COMPARE => {
                self.regs[Self::COMPARE] = value & 0xFFFF_FFFF;
                self.regs[Self::CAUSE] &= !cause::IP7;
            }
            Self::CAUSE => {
                let cause = self.regs[Self::CAUSE];
                self.regs[Self::CAUSE] =
                    (cause & !cause::IP_SOFTWARE) | (value & cause::IP_SOFTWARE);
            }
            Self::STATUS => self.regs[Self::STATUS] = value & 0xFFFF_FFFF,
            Self::WIRED => {
                self.regs[Self::WIRED] = value & 0x3F;
                self.regs[Self::RANDOM] = 31;
            }
            Self::CONFIG => {
                let config = self.regs[Self::CONFIG];
                self.regs[Self::CONFIG] = (config & !0x0F00_800F) | (value & 0x0F00_800F);
            }
            _ => self.regs[index & 0x1F] = value,
        }
    }

    /// Advance Count by one retired instruction
    ///
    /// Count moves every second call; IP7 is raised when it reaches Compare.
    pub(crate) fn tick(&mut self) {
        self.half_cycle = !self.half_cycle;
        if self.half_cycle {
            return;
        }
        let count = (self.regs[Self::COUNT] + 1) & 0xFFFF_FFFF;
        self.regs[Self::COUNT] = count;
        if count == self.regs[Self::COMPARE] {
            self.regs[Self::CAUSE] |= cause::IP7;
        }
    }

    /// Latch the RCP interrupt line into Cause.IP2
    pub(crate) fn set_ip2(&mut self, asserted: bool) {
        if asserted {
            self.regs[Self::CAUSE] |= cause::IP2;
        } else {
            self.regs[Self::CAUSE] &= !cause::IP2;
        }
    }

    /// True when an enabled interrupt is pending and exceptions are allowed
    pub(crate) fn interrupt_ready(&self) -> bool {
        let status = self.status();
        let enabled = status & status::IE != 0 && status & (status::EXL | status::ERL) == 0;
        enabled && (self.cause() & status & status::IM_MASK) != 0
    }

    pub(crate) fn fpu_usable(&self) -> bool {
        self.status() & status::CU1 != 0
    }

    pub(crate) fn coprocessor_usable(&self, cop: u32) -> bool {
        cop == 0 || self.status() & (1 << (28 + cop)) != 0
    }

    pub(crate) fn fr_mode(&self) -> bool {
        self.status() & status::FR != 0
    }
}

/// Exception cause codes for the VR4300
///
/// These correspond to the exception codes stored in Cause.ExcCode when a
/// CPU exception occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ExceptionCause {
    /// Interrupt (external or internal)
    Interrupt = 0,
    /// Address error on load or instruction fetch
    AddressErrorLoad = 4,
    /// Address error on store
    AddressErrorStore = 5,
    /// Syscall instruction executed
    Syscall = 8,
    /// Breakpoint instruction executed
    Breakpoint = 9,
    /// Reserved or illegal instruction
    ReservedInstruction = 10,
    /// Coprocessor unusable
    CoprocessorUnusable = 11,
    /// Arithmetic overflow
    Overflow = 12,
    /// Trap instruction condition met
    Trap = 13,
    /// FPU exception
    FloatingPoint = 15,
}
