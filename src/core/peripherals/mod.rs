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

//! Memory-mapped RCP register groups
//!
//! Each peripheral is a plain struct with fixed fields. Register reads and
//! writes are dispatched by offset with an exhaustive `match`, and writes
//! that start a transfer hand a trigger back to the [`Bus`](crate::core::memory::Bus),
//! which turns it into a [`DmaRequest`](crate::core::dma::DmaRequest).
//!
//! | Group | Physical base | Module |
//! |-------|---------------|--------|
//! | SP    | 0x04040000    | [`sp`] |
//! | DP    | 0x04100000    | [`dp`] |
//! | VI    | 0x04400000    | [`vi`] |
//! | AI    | 0x04500000    | [`ai`] |
//! | PI    | 0x04600000    | [`pi`] |
//! | RI    | 0x04700000    | [`ri`] |
//! | SI    | 0x04800000    | [`si`] |
//!
//! The MI group lives in [`InterruptController`](crate::core::interrupt::InterruptController).

pub mod ai;
pub mod dp;
pub mod pi;
pub mod ri;
pub mod si;
pub mod sp;
pub mod vi;

pub use ai::{AiDma, AiRegisters};
pub use dp::DpRegisters;
pub use pi::{PiDma, PiRegisters};
pub use ri::RiRegisters;
pub use si::{SiDma, SiRegisters};
pub use sp::{SpDma, SpRegisters, SpStatus};
pub use vi::ViRegisters;

#[cfg(test)]
mod tests;
