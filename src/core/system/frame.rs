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

//! Frame hand-off to the front end

use crate::core::rdp::DisplayProcessor;

/// One presented frame: packed RGBA8888, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes
    pub pixels: Vec<u8>,
    /// Frames presented before this one
    pub number: u64,
}

impl Frame {
    pub(super) fn capture(rdp: &DisplayProcessor, number: u64) -> Self {
        Self {
            width: rdp.width(),
            height: rdp.height(),
            pixels: rdp.frame_bytes(),
            number,
        }
    }

    /// RGBA of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        match self.pixels.get(i..i + 4) {
            Some(p) => [p[0], p[1], p[2], p[3]],
            None => [0; 4],
        }
    }
}

/// Receives one frame per vertical interrupt
///
/// Any `FnMut(&Frame)` closure is a presenter:
///
/// ```
/// use n64rx::core::system::{Frame, FramePresenter};
///
/// let mut count = 0;
/// let mut presenter = |_: &Frame| count += 1;
/// presenter.present(&Frame { width: 1, height: 1, pixels: vec![0; 4], number: 0 });
/// assert_eq!(count, 1);
/// ```
pub trait FramePresenter {
    fn present(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> FramePresenter for F {
    fn present(&mut self, frame: &Frame) {
        self(frame)
    }
}
