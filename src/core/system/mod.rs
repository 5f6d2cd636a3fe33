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

//! System integration and scheduling
//!
//! [`System`] owns the CPU, the memory bus (with every RCP register group
//! and the DMA queue), the RSP and the RDP, and drives them in a fixed
//! order, one video line per [`System::step`]:
//!
//! 1. complete due DMA
//! 2. CPU slice (`cpu.instructions_per_line` instructions)
//! 3. complete due DMA
//! 4. RSP task slice from SP_PC, unless halted
//! 5. complete due DMA
//! 6. fetch the pending DP command range, submit and flush it; SYNC_FULL
//!    posts the DP interrupt
//! 7. advance VI_CURRENT; at the frame boundary raise VI, latch controller
//!    input into the PIF and present the frame
//!
//! The order is fixed, so a run is fully deterministic for a given ROM,
//! configuration and input sequence.

mod boot;
mod frame;

#[cfg(test)]
mod tests;

pub use boot::IPL3_ENTRY;
pub use frame::{Frame, FramePresenter};

use super::config::EmulatorConfig;
use super::controller::{ControllerInput, PORTS};
use super::cpu::CPU;
use super::error::Result;
use super::interrupt::interrupts;
use super::loader::Cartridge;
use super::memory::Bus;
use super::rdp::DisplayProcessor;
use super::rsp::VectorUnit;
use super::save_state::SaveState;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum RunState {
    /// Created or reset; nothing has run yet
    #[default]
    Idle,
    /// At least one tick has run
    Running,
    /// Stopped; further steps do nothing
    Stopped,
}

/// Nintendo 64 system
///
/// # Example
///
/// ```
/// use n64rx::core::system::{RunState, System};
///
/// let mut system = System::default();
/// assert_eq!(system.state(), RunState::Idle);
///
/// system.step();
/// assert_eq!(system.state(), RunState::Running);
/// assert_eq!(system.ticks(), 1);
///
/// system.stop();
/// system.step();
/// assert_eq!(system.ticks(), 1);
/// ```
pub struct System {
    pub(in crate::core) cpu: CPU,
    pub(in crate::core) bus: Bus,
    pub(in crate::core) rsp: VectorUnit,
    pub(in crate::core) rdp: DisplayProcessor,
    config: EmulatorConfig,
    pub(in crate::core) state: RunState,

    /// Front-end input, latched into the PIF once per frame
    pub(in crate::core) controllers: [ControllerInput; PORTS],

    presenter: Option<Box<dyn FramePresenter>>,

    /// Lines executed since reset
    pub(in crate::core) ticks: u64,

    /// Frames presented since reset
    pub(in crate::core) frames: u64,
}

impl System {
    /// Create a powered-on system with no cartridge
    pub fn new(config: EmulatorConfig) -> Self {
        let mut bus = Bus::new();
        bus.set_dma_delay(config.dma.delay_ticks);

        Self {
            cpu: CPU::new(),
            bus,
            rsp: VectorUnit::new(config.rsp.instruction_budget),
            rdp: DisplayProcessor::new(config.video.default_width, config.video.default_height),
            config,
            state: RunState::Idle,
            controllers: [ControllerInput::default(); PORTS],
            presenter: None,
            ticks: 0,
            frames: 0,
        }
    }

    /// Load, validate and insert a ROM file
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let cartridge = Cartridge::load(path)?;
        self.insert_cartridge(cartridge);
        Ok(())
    }

    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        self.bus.insert_cartridge(cartridge);
    }

    pub fn set_presenter(&mut self, presenter: Box<dyn FramePresenter>) {
        self.presenter = Some(presenter);
    }

    /// Return every component to power-on state
    ///
    /// The cartridge, presenter and controller connections are kept.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
        self.bus.set_dma_delay(self.config.dma.delay_ticks);
        self.rsp.reset();
        self.rdp = DisplayProcessor::new(
            self.config.video.default_width,
            self.config.video.default_height,
        );
        self.state = RunState::Idle;
        self.ticks = 0;
        self.frames = 0;
        log::info!("System reset");
    }

    /// Run one video line
    ///
    /// The first call moves Idle to Running; after [`stop`](Self::stop)
    /// this does nothing.
    pub fn step(&mut self) {
        match self.state {
            RunState::Stopped => return,
            RunState::Idle => {
                log::info!("System running");
                self.state = RunState::Running;
            }
            RunState::Running => {}
        }

        self.bus.complete_due_dma();

        for _ in 0..self.config.cpu.instructions_per_line {
            self.cpu.step(&mut self.bus);
        }
        self.bus.complete_due_dma();

        if !self.bus.sp.halted() {
            let pc = self.bus.sp.pc();
            let outcome = self.rsp.run_task(&mut self.bus, pc);
            log::trace!("RSP slice: {:?}", outcome);
        }
        self.bus.complete_due_dma();

        self.run_display_processor();
        self.advance_line();

        self.bus.advance_tick();
        self.ticks += 1;
    }

    /// Run `lines` ticks, or fewer if stopped
    pub fn step_n(&mut self, lines: u64) {
        for _ in 0..lines {
            if self.state == RunState::Stopped {
                break;
            }
            self.step();
        }
    }

    /// Run until the next frame is presented or the system stops
    pub fn run_frame(&mut self) {
        let target = self.frames + 1;
        while self.frames < target && self.state != RunState::Stopped {
            self.step();
        }
    }

    /// Stop at the current tick boundary
    pub fn stop(&mut self) {
        if self.state != RunState::Stopped {
            log::info!("System stopped after {} lines ({} frames)", self.ticks, self.frames);
        }
        self.state = RunState::Stopped;
    }

    fn run_display_processor(&mut self) {
        self.bus.feed_display_processor(&mut self.rdp);
        if self.rdp.pending_words() == 0 {
            return;
        }

        let summary = self.rdp.flush(self.bus.rdram());
        if summary.sync_full {
            self.bus.mi.raise(interrupts::DP);
        }
    }

    /// Lines per frame: VI_V_SYNC when programmed, else the configured default
    pub fn lines_per_frame(&self) -> u32 {
        match self.bus.vi.v_sync() {
            0 => self.config.video.lines_per_frame,
            lines => lines,
        }
    }

    fn advance_line(&mut self) {
        let lines = self.lines_per_frame();
        if !self.bus.vi.advance_line(lines) {
            return;
        }

        self.bus.mi.raise(interrupts::VI);
        self.bus.pif.latch_inputs(&self.controllers);

        let width = self.bus.vi.width();
        if width > 0 && width != self.rdp.width() {
            self.rdp.resize(width, width * 3 / 4);
        }

        if let Some(presenter) = self.presenter.as_mut() {
            presenter.present(&Frame::capture(&self.rdp, self.frames));
        }
        self.frames += 1;
        log::trace!("Frame {} presented at line {}", self.frames, self.ticks);
    }

    // === Input / output ===

    /// Set the front end's input for a port; it reaches the PIF at the next
    /// frame boundary
    pub fn set_controller(&mut self, port: usize, input: ControllerInput) {
        if let Some(slot) = self.controllers.get_mut(port) {
            *slot = input;
        }
    }

    pub fn controller(&self, port: usize) -> ControllerInput {
        self.controllers.get(port).copied().unwrap_or_default()
    }

    pub fn set_controller_connected(&mut self, port: usize, connected: bool) {
        self.bus.pif.set_connected(port, connected);
    }

    /// Take the audio samples produced since the last call (interleaved L/R)
    pub fn drain_audio_samples(&mut self) -> Vec<i16> {
        self.bus.drain_audio_samples()
    }

    /// Current AI output rate in Hz
    pub fn audio_sample_rate(&self) -> u32 {
        self.bus.ai.sample_rate()
    }

    /// Snapshot of the current frame buffer
    pub fn current_frame(&self) -> Frame {
        Frame::capture(&self.rdp, self.frames)
    }

    // === Save states ===

    pub fn save_state(&self) -> SaveState {
        SaveState::capture(self)
    }

    pub fn load_state(&mut self, state: SaveState) -> Result<()> {
        state.restore(self)
    }

    pub fn save_state_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save_state().save_to_file(path)
    }

    pub fn load_state_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let state = SaveState::load_from_file(path)?;
        self.load_state(state)
    }

    // === Accessors ===

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn rsp(&self) -> &VectorUnit {
        &self.rsp
    }

    pub fn rdp(&self) -> &DisplayProcessor {
        &self.rdp
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new(EmulatorConfig::default())
    }
}
