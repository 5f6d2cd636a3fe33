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

//! Video interface (VI) registers
//!
//! Scanout itself is not modelled; the system clock drives VI_CURRENT one
//! line per tick and reads VI_WIDTH / VI_V_SYNC to size the frame.

use crate::core::interrupt::{interrupts, InterruptController};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ViRegisters {
    control: u32,
    origin: u32,
    width: u32,
    v_intr: u32,
    current: u32,
    burst: u32,
    v_sync: u32,
    h_sync: u32,
    leap: u32,
    h_start: u32,
    v_start: u32,
    v_burst: u32,
    x_scale: u32,
    y_scale: u32,
}

impl ViRegisters {
    pub fn new() -> Self {
        Self {
            control: 0,
            origin: 0,
            width: 0,
            v_intr: 0x3FF,
            current: 0,
            burst: 0,
            v_sync: 0,
            h_sync: 0,
            leap: 0,
            h_start: 0,
            v_start: 0,
            v_burst: 0,
            x_scale: 0,
            y_scale: 0,
        }
    }

    /// Frame buffer origin in RDRAM
    pub fn origin(&self) -> u32 {
        self.origin
    }

    /// Frame buffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Lines per frame as programmed by software (0 when unset)
    pub fn v_sync(&self) -> u32 {
        self.v_sync
    }

    pub fn current_line(&self) -> u32 {
        self.current
    }

    /// Advance the line counter, wrapping at `lines_per_frame`
    ///
    /// Returns true when the counter wrapped (frame boundary).
    pub fn advance_line(&mut self, lines_per_frame: u32) -> bool {
        let next = self.current + 1;
        if next >= lines_per_frame.max(1) {
            self.current = 0;
            true
        } else {
            self.current = next;
            false
        }
    }

    pub fn read_register(&self, offset: u32) -> u32 {
        match offset & 0x3F {
            0x00 => self.control,
            0x04 => self.origin,
            0x08 => self.width,
            0x0C => self.v_intr,
            0x10 => self.current,
            0x14 => self.burst,
            0x18 => self.v_sync,
            0x1C => self.h_sync,
            0x20 => self.leap,
            0x24 => self.h_start,
            0x28 => self.v_start,
            0x2C => self.v_burst,
            0x30 => self.x_scale,
            0x34 => self.y_scale,
            _ => 0,
        }
    }

    /// Write a VI register; any write to VI_CURRENT acknowledges VI
    pub fn write_register(&mut self, offset: u32, value: u32, mi: &mut InterruptController) {
        match offset & 0x3F {
            0x00 => self.control = value & 0x1FFFF,
            0x04 => self.origin = value & 0x00FF_FFFF,
            0x08 => self.width = value & 0xFFF,
            0x0C => self.v_intr = value & 0x3FF,
            0x10 => mi.acknowledge(interrupts::VI),
            0x14 => self.burst = value,
            0x18 => self.v_sync = value & 0x3FF,
            0x1C => self.h_sync = value,
            0x20 => self.leap = value,
            0x24 => self.h_start = value,
            0x28 => self.v_start = value,
            0x2C => self.v_burst = value,
            0x30 => self.x_scale = value,
            0x34 => self.y_scale = value,
            _ => log::trace!("VI write to unknown offset 0x{:02X} ignored", offset),
        }
    }
}

impl Default for ViRegisters {
    fn default() -> Self {
        Self::new()
    }
}
