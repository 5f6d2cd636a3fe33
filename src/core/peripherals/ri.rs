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

//! RDRAM interface (RI) registers
//!
//! Plain storage. The boot code programs these to configure RDRAM timing,
//! which has no observable effect here beyond reading back what was written.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct RiRegisters {
    /// MODE, CONFIG, CURRENT_LOAD, SELECT, REFRESH, LATENCY, RERROR, WERROR
    regs: [u32; 8],
}

impl RiRegisters {
    const SELECT: usize = 3;

    pub fn new() -> Self {
        Self { regs: [0; 8] }
    }

    /// State left behind by IPL3 after RDRAM initialization
    pub fn initialized() -> Self {
        let mut ri = Self::new();
        ri.regs[0] = 0x0E;
        ri.regs[1] = 0x40;
        ri.regs[Self::SELECT] = 0x14;
        ri.regs[4] = 0x0006_3634;
        ri
    }

    pub fn read_register(&self, offset: u32) -> u32 {
        self.regs[((offset & 0x1F) >> 2) as usize]
    }

    pub fn write_register(&mut self, offset: u32, value: u32) {
        match (offset & 0x1F) >> 2 {
            // CURRENT_LOAD and WERROR are strobes
            2 | 7 => {}
            index => self.regs[index as usize] = value,
        }
    }
}

impl Default for RiRegisters {
    fn default() -> Self {
        Self::new()
    }
}
