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

//! Save states
//!
//! A save state is a bincode snapshot of everything that changes while the
//! machine runs:
//!
//! - CPU registers, pipeline state, COP0 and COP1
//! - RDRAM, DMEM, IMEM and PIF RAM
//! - every RCP register group, the MI and the DMA queue
//! - the RSP register files, accumulator, flags and divide state
//! - the RDP mode state, TMEM, pending words and both buffers
//! - scheduler counters and latched controller input
//!
//! The cartridge and PIF boot ROM are not included; a state restores onto
//! a system with the same ROM inserted. Restoring a state and running N
//! ticks gives the same machine state as running those N ticks directly.
//!
//! # Version Compatibility
//!
//! The version is encoded first and checked before the rest is decoded, so
//! a state from another format version fails with
//! [`EmulatorError::IncompatibleSaveState`] rather than a decode error.
//!
//! # Example
//!
//! ```
//! use n64rx::core::system::System;
//!
//! let mut system = System::default();
//! system.step_n(3);
//!
//! let bytes = system.save_state().to_bytes().unwrap();
//! system.step_n(5);
//!
//! let state = n64rx::core::save_state::SaveState::from_bytes(&bytes).unwrap();
//! system.load_state(state).unwrap();
//! assert_eq!(system.ticks(), 3);
//! ```

use crate::core::controller::pif::PIF_RAM_SIZE;
use crate::core::controller::{ControllerInput, PORTS};
use crate::core::cpu::CPU;
use crate::core::dma::DmaQueue;
use crate::core::error::{EmulatorError, Result};
use crate::core::interrupt::InterruptController;
use crate::core::memory::Bus;
use crate::core::peripherals::{
    AiRegisters, DpRegisters, PiRegisters, RiRegisters, SiRegisters, SpRegisters, ViRegisters,
};
use crate::core::rdp::DisplayProcessor;
use crate::core::rsp::VectorUnit;
use crate::core::system::{RunState, System};
use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Save state format version
///
/// Bump whenever the encoded layout changes.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete machine snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Format version, always encoded first
    pub version: u32,
    pub metadata: SaveStateMetadata,
    pub cpu: CPU,
    pub memory: MemoryState,
    pub registers: RegisterState,
    pub rsp: VectorUnit,
    pub rdp: DisplayProcessor,
    pub scheduler: SchedulerState,
}

/// When and what the state was taken from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// Cartridge title, empty without a cartridge
    pub game_title: String,

    /// Four-character game code
    pub game_code: String,

    pub frame_count: u64,
}

/// Memories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct MemoryState {
    pub rdram: Vec<u8>,
    pub dmem: Vec<u8>,
    pub imem: Vec<u8>,
    pub pif_ram: Vec<u8>,
}

/// RCP register groups, interrupt controller and DMA queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct RegisterState {
    pub mi: InterruptController,
    pub sp: SpRegisters,
    pub dp: DpRegisters,
    pub vi: ViRegisters,
    pub ai: AiRegisters,
    pub pi: PiRegisters,
    pub si: SiRegisters,
    pub ri: RiRegisters,
    pub dma: DmaQueue,
}

/// Scheduler counters and controller ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SchedulerState {
    pub run_state: RunState,
    pub ticks: u64,
    pub frames: u64,
    /// Bus tick used for DMA deadlines
    pub bus_tick: u64,
    /// Front-end input in wire layout
    pub controllers: [u32; PORTS],
    /// Input latched into the PIF
    pub latched: [u32; PORTS],
    pub connected: [bool; PORTS],
}

impl SaveState {
    /// Snapshot a system
    pub fn capture(system: &System) -> Self {
        let bus = &system.bus;
        let (latched, connected) = bus.pif.port_state();
        let (game_title, game_code) = bus
            .cartridge()
            .map(|cart| (cart.header.title.clone(), cart.header.game_code.clone()))
            .unwrap_or_default();

        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                game_title,
                game_code,
                frame_count: system.frames,
            },
            cpu: system.cpu.clone(),
            memory: MemoryState {
                rdram: bus.rdram().to_vec(),
                dmem: bus.dmem().to_vec(),
                imem: bus.imem().to_vec(),
                pif_ram: bus.pif.ram().to_vec(),
            },
            registers: RegisterState {
                mi: bus.mi.clone(),
                sp: bus.sp.clone(),
                dp: bus.dp.clone(),
                vi: bus.vi.clone(),
                ai: bus.ai.clone(),
                pi: bus.pi.clone(),
                si: bus.si.clone(),
                ri: bus.ri.clone(),
                dma: bus.dma_queue().clone(),
            },
            rsp: system.rsp.clone(),
            rdp: system.rdp.clone(),
            scheduler: SchedulerState {
                run_state: system.state,
                ticks: system.ticks,
                frames: system.frames,
                bus_tick: bus.tick(),
                controllers: system.controllers.map(|input| input.to_u32()),
                latched,
                connected,
            },
        }
    }

    /// Write this state into a system
    ///
    /// Memory sizes and RDP buffer sizes are checked before anything is
    /// touched, so a rejected state leaves the system unchanged.
    pub fn restore(self, system: &mut System) -> Result<()> {
        self.check_sizes()?;

        let bus = &mut system.bus;
        bus.rdram_mut().copy_from_slice(&self.memory.rdram);
        bus.dmem_mut().copy_from_slice(&self.memory.dmem);
        bus.imem_mut().copy_from_slice(&self.memory.imem);
        bus.pif.restore(
            &self.memory.pif_ram,
            self.scheduler.latched,
            self.scheduler.connected,
        );

        let registers = self.registers;
        bus.mi = registers.mi;
        bus.sp = registers.sp;
        bus.dp = registers.dp;
        bus.vi = registers.vi;
        bus.ai = registers.ai;
        bus.pi = registers.pi;
        bus.si = registers.si;
        bus.ri = registers.ri;
        bus.restore_dma_queue(registers.dma);
        bus.set_tick(self.scheduler.bus_tick);
        bus.drain_audio_samples();

        system.cpu = self.cpu;
        system.rsp = self.rsp;
        system.rdp = self.rdp;
        system.state = self.scheduler.run_state;
        system.ticks = self.scheduler.ticks;
        system.frames = self.scheduler.frames;
        system.controllers = self.scheduler.controllers.map(ControllerInput::from_u32);

        log::info!(
            "Save state restored: \"{}\" at frame {} ({})",
            self.metadata.game_title,
            self.metadata.frame_count,
            self.metadata.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
        Ok(())
    }

    fn check_sizes(&self) -> Result<()> {
        let expected = [
            ("RDRAM", self.memory.rdram.len(), Bus::RDRAM_SIZE),
            ("DMEM", self.memory.dmem.len(), Bus::SP_MEM_SIZE),
            ("IMEM", self.memory.imem.len(), Bus::SP_MEM_SIZE),
            ("PIF RAM", self.memory.pif_ram.len(), PIF_RAM_SIZE),
        ];
        for (name, got, size) in expected {
            if got != size {
                return Err(EmulatorError::SaveState(format!(
                    "{} is {} bytes, expected {}",
                    name, got, size
                )));
            }
        }
        self.rdp.check_buffers().map_err(EmulatorError::SaveState)
    }

    /// Encode with bincode
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::encode_to_vec(self, config::standard())
            .map_err(|e| EmulatorError::SaveState(e.to_string()))
    }

    /// Decode, checking the version first
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (version, _): (u32, usize) = bincode::decode_from_slice(bytes, config::standard())
            .map_err(|e| EmulatorError::SaveState(e.to_string()))?;
        if version != SAVE_STATE_VERSION {
            return Err(EmulatorError::IncompatibleSaveState {
                expected: SAVE_STATE_VERSION,
                got: version,
            });
        }

        let (state, _): (SaveState, usize) = bincode::decode_from_slice(bytes, config::standard())
            .map_err(|e| EmulatorError::SaveState(e.to_string()))?;
        Ok(state)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_bytes()?)?;
        log::info!("Save state written to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests;
