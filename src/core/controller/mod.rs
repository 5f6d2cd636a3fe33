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

//! Controller input and PIF (peripheral interface) joybus
//!
//! The front end hands the core one [`ControllerInput`] per port. The
//! system clock latches the current inputs into the [`Pif`] once per frame,
//! and games read them back by issuing joybus commands through PIF RAM.
//!
//! # Wire layout
//!
//! ```text
//! 31            16 15      8 7       0
//! +---------------+---------+---------+
//! |    buttons    | stick X | stick Y |
//! +---------------+---------+---------+
//! ```

pub mod pif;

pub use pif::Pif;

use bitflags::bitflags;

#[cfg(test)]
mod tests;

/// Number of controller ports
pub const PORTS: usize = 4;

bitflags! {
    /// Button bits as reported by the joybus read command
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u16 {
        const A = 0x8000;
        const B = 0x4000;
        const Z = 0x2000;
        const START = 0x1000;
        const D_UP = 0x0800;
        const D_DOWN = 0x0400;
        const D_LEFT = 0x0200;
        const D_RIGHT = 0x0100;
        const L = 0x0020;
        const R = 0x0010;
        const C_UP = 0x0008;
        const C_DOWN = 0x0004;
        const C_LEFT = 0x0002;
        const C_RIGHT = 0x0001;
    }
}

/// Snapshot of one controller
///
/// # Example
///
/// ```
/// use n64rx::core::controller::{Buttons, ControllerInput};
///
/// let mut input = ControllerInput::default();
/// input.press(Buttons::A | Buttons::START);
/// input.set_stick(-128, 127);
///
/// assert_eq!(input.to_u32(), 0x9000_807F);
/// assert_eq!(ControllerInput::from_u32(0x9000_807F), input);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerInput {
    pub buttons: Buttons,
    pub stick_x: i8,
    pub stick_y: i8,
}

impl ControllerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, buttons: Buttons) {
        self.buttons.insert(buttons);
    }

    pub fn release(&mut self, buttons: Buttons) {
        self.buttons.remove(buttons);
    }

    pub fn set_button_state(&mut self, buttons: Buttons, pressed: bool) {
        self.buttons.set(buttons, pressed);
    }

    pub fn is_pressed(&self, buttons: Buttons) -> bool {
        self.buttons.contains(buttons)
    }

    pub fn set_stick(&mut self, x: i8, y: i8) {
        self.stick_x = x;
        self.stick_y = y;
    }

    /// Pack into the 32-bit wire layout
    pub fn to_u32(&self) -> u32 {
        ((self.buttons.bits() as u32) << 16)
            | ((self.stick_x as u8 as u32) << 8)
            | (self.stick_y as u8 as u32)
    }

    /// Unpack from the 32-bit wire layout
    ///
    /// Unassigned button bits are dropped.
    pub fn from_u32(value: u32) -> Self {
        Self {
            buttons: Buttons::from_bits_truncate((value >> 16) as u16),
            stick_x: (value >> 8) as u8 as i8,
            stick_y: value as u8 as i8,
        }
    }

    /// The four bytes returned by the joybus read-buttons command
    pub fn to_bytes(&self) -> [u8; 4] {
        self.to_u32().to_be_bytes()
    }
}
