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

//! Interrupt acknowledgment tests

use super::super::*;

#[test]
fn test_acknowledge_single_source() {
    let mut ic = InterruptController::new();
    ic.raise(interrupts::VI | interrupts::AI);
    ic.write_mask(0xAAA);

    ic.acknowledge(interrupts::VI);
    assert_eq!(ic.pending(), interrupts::AI);
    assert!(ic.pending_and_enabled());

    ic.acknowledge(interrupts::AI);
    assert!(!ic.pending_and_enabled());
}

#[test]
fn test_acknowledge_does_not_touch_mask() {
    let mut ic = InterruptController::new();
    ic.write_mask(1 << 11); // set DP
    ic.raise(interrupts::DP);
    ic.acknowledge(interrupts::DP);
    assert_eq!(ic.mask(), interrupts::DP);
}

#[test]
fn test_mode_bit_11_clears_dp() {
    let mut ic = InterruptController::new();
    ic.raise(interrupts::DP | interrupts::SP);
    ic.write_register(0x00, 1 << 11);
    assert_eq!(ic.pending(), interrupts::SP);
}

#[test]
fn test_pending_stays_until_acknowledged() {
    let mut ic = InterruptController::new();
    ic.raise(interrupts::PI);
    ic.raise(interrupts::PI);
    ic.acknowledge(interrupts::PI);
    assert!(!ic.is_pending(interrupts::PI));
}
