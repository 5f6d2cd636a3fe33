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

/// Emulator error types
///
/// Machine exceptions (overflow, address error, reserved instruction, ...)
/// never show up here: they are handled inside the CPU by vectoring to the
/// exception handler. Only load-time and snapshot failures reach the caller.
use thiserror::Error;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("ROM file not found: {0}")]
    RomNotFound(String),

    #[error("Invalid ROM image: {0}")]
    InvalidRomImage(#[from] RomError),

    #[error("No ROM loaded")]
    NoRomLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save state error: {0}")]
    SaveState(String),

    #[error("Incompatible save state version: expected {expected}, got {got}")]
    IncompatibleSaveState { expected: u32, got: u32 },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Cartridge image validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RomError {
    #[error("ROM too small: need at least {needed} bytes for the header, got {got}")]
    TooSmall { needed: usize, got: usize },

    #[error("Unknown ROM format (magic bytes: {0:02X} {1:02X} {2:02X} {3:02X})")]
    UnknownFormat(u8, u8, u8, u8),
}
