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

//! Core emulation components
//!
//! This module contains all hardware emulation components:
//! - CPU (NEC VR4300) with COP0 and COP1
//! - Memory bus, RCP register groups and DMA
//! - MI interrupt controller
//! - RSP scalar and vector unit
//! - RDP command processor and rasterizer
//! - Cartridge loading, PIF and controllers
//! - System integration and save states

pub mod config;
pub mod controller;
pub mod cpu;
pub mod dma;
pub mod error;
pub mod interrupt;
pub mod loader;
pub mod memory;
pub mod peripherals;
pub mod rdp;
pub mod rsp;
pub mod save_state;
pub mod system;

// Re-export commonly used types
pub use config::EmulatorConfig;
pub use controller::{Buttons, ControllerInput};
pub use cpu::CPU;
pub use error::{EmulatorError, Result};
pub use interrupt::InterruptController;
pub use loader::Cartridge;
pub use memory::Bus;
pub use rdp::DisplayProcessor;
pub use rsp::VectorUnit;
pub use save_state::SaveState;
pub use system::System;
