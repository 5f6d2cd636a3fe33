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

//! Cold boot
//!
//! The PIF ROM's work is done directly: the first 4KB of the cartridge
//! (header + IPL3) is copied into DMEM and the CPU is handed the register
//! set a CIC-6102 boot leaves behind, starting at the IPL3 entry in DMEM.
//!
//! With HLE boot the IPL3 is skipped too: the first megabyte of game code
//! is copied to the entry point, the OS boot parameters are written to low
//! RDRAM and the CPU starts at the entry point.

use super::System;
use crate::core::error::{EmulatorError, Result};
use crate::core::memory::Bus;

/// IPL3 entry point inside DMEM
pub const IPL3_ENTRY: u32 = 0xA400_0040;

/// Bytes of cartridge copied into DMEM
const BOOT_CODE_SIZE: usize = 0x1000;

/// Game code copied by an HLE boot
const HLE_COPY_SIZE: usize = 0x10_0000;

/// CIC-6102 seed left in s6
const CIC_6102_SEED: u64 = 0x3F;

/// OS boot parameters in low RDRAM
mod os {
    pub const TV_TYPE: u32 = 0x300;
    pub const ROM_TYPE: u32 = 0x304;
    pub const ROM_BASE: u32 = 0x308;
    pub const RESET_TYPE: u32 = 0x30C;
    pub const CIC_ID: u32 = 0x310;
    pub const VERSION: u32 = 0x314;
    pub const MEM_SIZE: u32 = 0x318;
}

const COP0_STATUS: usize = 12;

/// Sign-extend a KSEG address to 64 bits
fn kseg(address: u32) -> u64 {
    address as i32 as i64 as u64
}

impl System {
    /// Boot the inserted cartridge
    ///
    /// Resets every component first. Fails with
    /// [`EmulatorError::NoRomLoaded`] when no cartridge is inserted.
    pub fn boot(&mut self) -> Result<()> {
        self.reset();

        let (boot_code, game_code, entry_point) = {
            let cart = self.bus.cartridge().ok_or(EmulatorError::NoRomLoaded)?;
            let data = cart.data();
            let boot_len = data.len().min(BOOT_CODE_SIZE);
            let game = if data.len() > BOOT_CODE_SIZE {
                let end = data.len().min(BOOT_CODE_SIZE + HLE_COPY_SIZE);
                data[BOOT_CODE_SIZE..end].to_vec()
            } else {
                Vec::new()
            };
            (data[..boot_len].to_vec(), game, cart.header.entry_point)
        };

        self.bus.dmem_mut()[..boot_code.len()].copy_from_slice(&boot_code);
        self.set_boot_registers();

        if self.config.boot.hle {
            let destination = Bus::translate_address(entry_point);
            self.bus.load_rdram(destination, &game_code);
            self.write_os_parameters();
            self.cpu.set_pc(kseg(entry_point));
            log::info!(
                "HLE boot: 0x{:X} bytes to 0x{:08X}, entry 0x{:08X}",
                game_code.len(),
                destination,
                entry_point
            );
        } else {
            self.cpu.set_pc(kseg(IPL3_ENTRY));
            log::info!("Boot: IPL3 at 0x{:08X}", IPL3_ENTRY);
        }
        Ok(())
    }

    /// Registers as left by the PIF for a CIC-6102 cartridge
    fn set_boot_registers(&mut self) {
        let cpu = &mut self.cpu;
        cpu.set_reg(11, kseg(IPL3_ENTRY)); // t3
        cpu.set_reg(20, 1); // s4: NTSC
        cpu.set_reg(22, CIC_6102_SEED); // s6
        cpu.set_reg(29, kseg(0xA400_1FF0)); // sp: top of IMEM
        cpu.set_cop0_reg(COP0_STATUS, 0x3400_0000); // CU0 | CU1
    }

    fn write_os_parameters(&mut self) {
        let parameters = [
            (os::TV_TYPE, 1),
            (os::ROM_TYPE, 0),
            (os::ROM_BASE, 0xB000_0000),
            (os::RESET_TYPE, 0),
            (os::CIC_ID, 2),
            (os::VERSION, 0),
            (os::MEM_SIZE, Bus::RDRAM_SIZE as u32),
        ];
        for (address, value) in parameters {
            self.bus.load_rdram(address, &u32::to_be_bytes(value));
        }
    }
}
