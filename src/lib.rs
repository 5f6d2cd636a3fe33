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

//! Nintendo 64 emulator core library
//!
//! This library provides the core emulation components for a Nintendo 64
//! emulator: the VR4300 CPU, the memory bus with its RCP register groups,
//! the RSP vector unit, the RDP rasterizer and the scheduler tying them
//! together.
//!
//! # Example
//!
//! ```
//! use n64rx::core::config::EmulatorConfig;
//! use n64rx::core::system::System;
//!
//! let mut system = System::new(EmulatorConfig::default());
//!
//! // Run one video line
//! system.step();
//! assert_eq!(system.ticks(), 1);
//! ```

pub mod core;
