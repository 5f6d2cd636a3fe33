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

//! Display processor command interface (DPC) registers
//!
//! Writing DPC_END hands the range DPC_CURRENT..DPC_END to the RDP. The range
//! is read from RDRAM, or from DMEM when the XBUS bit of DPC_STATUS is set.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// DPC_STATUS: command words come from DMEM
pub const DPC_STATUS_XBUS: u32 = 1 << 0;
/// DPC_STATUS: command processing frozen
pub const DPC_STATUS_FREEZE: u32 = 1 << 1;
/// DPC_STATUS: flush requested
pub const DPC_STATUS_FLUSH: u32 = 1 << 2;
/// DPC_STATUS: START written and not yet consumed
pub const DPC_STATUS_START_VALID: u32 = 1 << 10;

/// Command range waiting to be fetched by the system clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DpCommandRange {
    pub start: u32,
    pub end: u32,
    /// True when the words live in DMEM
    pub xbus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DpRegisters {
    start: u32,
    end: u32,
    current: u32,
    status: u32,
    clock: u32,
    pending: Option<DpCommandRange>,
}

impl DpRegisters {
    pub fn new() -> Self {
        Self {
            start: 0,
            end: 0,
            current: 0,
            status: 0,
            clock: 0,
            pending: None,
        }
    }

    pub fn read_register(&self, offset: u32) -> u32 {
        match offset & 0x1F {
            0x00 => self.start,
            0x04 => self.end,
            0x08 => self.current,
            0x0C => self.status,
            0x10 => self.clock,
            _ => 0,
        }
    }

    pub fn write_register(&mut self, offset: u32, value: u32) {
        match offset & 0x1F {
            0x00 => {
                self.start = value & 0x00FF_FFF8;
                self.current = self.start;
                self.status |= DPC_STATUS_START_VALID;
            }
            0x04 => {
                self.end = value & 0x00FF_FFF8;
                self.status &= !DPC_STATUS_START_VALID;
                if self.end > self.current {
                    self.pending = Some(DpCommandRange {
                        start: self.current,
                        end: self.end,
                        xbus: self.status & DPC_STATUS_XBUS != 0,
                    });
                    log::debug!(
                        "DP command range 0x{:06X}..0x{:06X} queued",
                        self.current,
                        self.end
                    );
                }
            }
            0x0C => self.write_status(value),
            _ => log::trace!("DPC write to read-only offset 0x{:02X} ignored", offset),
        }
    }

    fn write_status(&mut self, value: u32) {
        let pairs = [
            (0, 1, DPC_STATUS_XBUS),
            (2, 3, DPC_STATUS_FREEZE),
            (4, 5, DPC_STATUS_FLUSH),
        ];
        for (clear, set, flag) in pairs {
            if value & (1 << clear) != 0 {
                self.status &= !flag;
            }
            if value & (1 << set) != 0 {
                self.status |= flag;
            }
        }
        if value & (1 << 9) != 0 {
            self.clock = 0;
        }
    }

    /// Take the pending command range and advance DPC_CURRENT past it
    pub fn take_pending(&mut self) -> Option<DpCommandRange> {
        let range = self.pending.take()?;
        self.current = range.end;
        Some(range)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Count processed command words in DPC_CLOCK
    pub fn add_clock(&mut self, words: u32) {
        self.clock = self.clock.wrapping_add(words) & 0x00FF_FFFF;
    }
}

impl Default for DpRegisters {
    fn default() -> Self {
        Self::new()
    }
}
