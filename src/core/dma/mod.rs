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

//! DMA request queue
//!
//! N64 DMA engines are owned by the peripheral that starts them. Writing a
//! length register (or one of the SI PIF address registers) turns into a
//! [`DmaRequest`] that waits in the [`DmaQueue`] until its deadline tick.
//! The [`Bus`](crate::core::memory::Bus) performs the copy atomically when the
//! system clock completes due requests between component turns.
//!
//! # Engines
//!
//! | Owner | Trigger register          | Direction                     |
//! |-------|---------------------------|-------------------------------|
//! | SP    | SP_RD_LEN / SP_WR_LEN      | RDRAM <-> DMEM/IMEM           |
//! | SI    | SI_PIF_ADDR_RD64B / WR64B  | PIF RAM <-> RDRAM (64 bytes)  |
//! | AI    | AI_LEN                     | RDRAM -> DAC sample queue     |
//! | PI    | PI_RD_LEN / PI_WR_LEN      | RDRAM <-> cartridge           |
//!
//! A peripheral's busy bit is derived from the queue: it reads as set
//! exactly while one of its requests is still queued.

use crate::core::interrupt::interrupts;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[cfg(test)]
mod tests;

/// Peripheral that started a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum DmaOwner {
    /// Signal processor DMA engine
    Sp,
    /// Serial interface (PIF)
    Si,
    /// Audio interface
    Ai,
    /// Peripheral (cartridge) interface
    Pi,
}

impl DmaOwner {
    /// MI interrupt bit posted when a transfer completes
    ///
    /// SP DMA has no completion interrupt.
    pub fn interrupt(self) -> Option<u8> {
        match self {
            DmaOwner::Sp => None,
            DmaOwner::Si => Some(interrupts::SI),
            DmaOwner::Ai => Some(interrupts::AI),
            DmaOwner::Pi => Some(interrupts::PI),
        }
    }
}

/// One side of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum DmaEndpoint {
    /// RDRAM byte address
    Rdram(u32),
    /// Cartridge ROM offset (PI bus address minus 0x10000000)
    Cartridge(u32),
    /// The 64-byte PIF RAM
    PifRam,
    /// SP memory offset; bit 12 selects IMEM over DMEM
    SpMemory(u32),
    /// Audio DAC sample queue
    AudioOut,
}

/// A queued transfer
///
/// `rows` and `skip` are only meaningful for SP DMA: `rows` blocks of
/// `length` bytes are copied, and the RDRAM address advances by
/// `length + skip` between rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DmaRequest {
    pub owner: DmaOwner,
    pub source: DmaEndpoint,
    pub destination: DmaEndpoint,
    pub length: u32,
    pub rows: u32,
    pub skip: u32,
    /// Tick at which the transfer completes
    pub deadline: u64,
}

impl DmaRequest {
    /// Build a single-row request
    pub fn new(
        owner: DmaOwner,
        source: DmaEndpoint,
        destination: DmaEndpoint,
        length: u32,
    ) -> Self {
        Self {
            owner,
            source,
            destination,
            length,
            rows: 1,
            skip: 0,
            deadline: 0,
        }
    }

    /// Builder for SP row/skip transfers
    pub fn with_rows(mut self, rows: u32, skip: u32) -> Self {
        self.rows = rows.max(1);
        self.skip = skip;
        self
    }

    /// Total bytes moved
    pub fn total_bytes(&self) -> u32 {
        self.length.saturating_mul(self.rows)
    }
}

/// Pending DMA transfers, ordered by submission
///
/// # Example
///
/// ```
/// use n64rx::core::dma::{DmaEndpoint, DmaOwner, DmaQueue, DmaRequest};
///
/// let mut queue = DmaQueue::new(2);
/// queue.push(
///     DmaRequest::new(DmaOwner::Pi, DmaEndpoint::Cartridge(0), DmaEndpoint::Rdram(0), 16),
///     10,
/// );
///
/// assert!(queue.is_busy(DmaOwner::Pi));
/// assert!(queue.take_due(11).is_empty());
/// assert_eq!(queue.take_due(12).len(), 1);
/// assert!(!queue.is_busy(DmaOwner::Pi));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DmaQueue {
    requests: VecDeque<DmaRequest>,

    /// Ticks between submission and completion
    delay: u64,
}

impl DmaQueue {
    /// Create an empty queue with the given completion delay in ticks
    pub fn new(delay: u64) -> Self {
        Self {
            requests: VecDeque::new(),
            delay,
        }
    }

    /// Configured completion delay
    pub fn delay(&self) -> u64 {
        self.delay
    }

    /// Change the completion delay for future requests
    pub fn set_delay(&mut self, delay: u64) {
        self.delay = delay;
    }

    /// Queue a request submitted at tick `now`
    pub fn push(&mut self, mut request: DmaRequest, now: u64) {
        request.deadline = now + self.delay;
        log::debug!(
            "DMA queued: {:?} {:?} -> {:?}, {} bytes x {} rows, due at tick {}",
            request.owner,
            request.source,
            request.destination,
            request.length,
            request.rows,
            request.deadline
        );
        self.requests.push_back(request);
    }

    /// True while a request from `owner` is queued
    pub fn is_busy(&self, owner: DmaOwner) -> bool {
        self.requests.iter().any(|r| r.owner == owner)
    }

    /// Remove and return every request whose deadline is at or before `now`
    ///
    /// Requests are returned in submission order.
    pub fn take_due(&mut self, now: u64) -> Vec<DmaRequest> {
        let mut due = Vec::new();
        let mut waiting = VecDeque::with_capacity(self.requests.len());

        for request in self.requests.drain(..) {
            if request.deadline <= now {
                due.push(request);
            } else {
                waiting.push_back(request);
            }
        }

        self.requests = waiting;
        due
    }

    /// Number of queued requests
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// True if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Drop every queued request
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// Iterate over queued requests in submission order
    pub fn iter(&self) -> impl Iterator<Item = &DmaRequest> {
        self.requests.iter()
    }
}

impl Default for DmaQueue {
    fn default() -> Self {
        Self::new(0)
    }
}
