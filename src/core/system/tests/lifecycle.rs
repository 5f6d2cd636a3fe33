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

//! Run state transitions and frame pacing

use super::*;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_first_step_starts_running() {
    let mut system = system();
    assert_eq!(system.state(), RunState::Idle);
    assert!(!system.is_running());

    system.step();
    assert_eq!(system.state(), RunState::Running);
    assert!(system.is_running());
    assert_eq!(system.ticks(), 1);
    assert_eq!(system.bus().tick(), 1);
}

#[test]
fn test_stop_is_final_until_reset() {
    let mut system = system();
    system.step_n(3);
    system.stop();
    assert_eq!(system.state(), RunState::Stopped);

    let pc = system.cpu().pc();
    system.step();
    system.step_n(5);
    system.run_frame();
    assert_eq!(system.ticks(), 3);
    assert_eq!(system.cpu().pc(), pc);

    system.reset();
    assert_eq!(system.state(), RunState::Idle);
    assert_eq!(system.ticks(), 0);
}

#[test]
fn test_run_frame_runs_one_frame_of_lines() {
    let mut system = system();
    system.run_frame();
    assert_eq!(system.frames(), 1);
    assert_eq!(system.ticks(), LINES as u64);

    system.run_frame();
    assert_eq!(system.frames(), 2);
    assert_eq!(system.ticks(), 2 * LINES as u64);
}

#[test]
fn test_programmed_v_sync_sets_frame_length() {
    let mut system = system();
    system.bus_mut().write32(0xA440_0018, 4);
    assert_eq!(system.lines_per_frame(), 4);

    system.run_frame();
    assert_eq!(system.ticks(), 4);
}

#[test]
fn test_presenter_receives_each_frame() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);

    let mut system = system();
    system.set_presenter(Box::new(move |frame: &Frame| sink.borrow_mut().push(frame.clone())));
    system.step_n(3 * LINES as u64);

    let frames = frames.borrow();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[2].number, 2);
    assert_eq!((frames[0].width, frames[0].height), (32, 24));
    assert_eq!(frames[0].pixels.len(), 32 * 24 * 4);
}

#[test]
fn test_vi_width_resizes_frame() {
    let mut system = system();
    system.bus_mut().write32(0xA440_0008, 64);
    system.run_frame();

    let frame = system.current_frame();
    assert_eq!((frame.width, frame.height), (64, 48));
}
