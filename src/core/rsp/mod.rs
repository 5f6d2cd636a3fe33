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

//! Reality Signal Processor (RSP)
//!
//! The RSP is a cut-down MIPS core with a 128-bit vector unit bolted on as
//! COP2. It runs microcode out of IMEM and works on DMEM; the only way it
//! talks to the rest of the machine is through its COP0 window onto the SP
//! and DP register groups.
//!
//! ## Components
//!
//! - Scalar core: 32 x u32 registers, MIPS I subset without multiply,
//!   divide or exceptions. The PC is 12 bits wide.
//! - Vector registers: 32 x 8 lanes of i16
//! - Accumulator: 48 bits per lane (see [`vector`])
//! - Flags: VCO, VCC, VCE
//! - Divider: DIV_IN, DIV_OUT and the double-precision latch (see [`divide`])
//!
//! ## Scheduling
//!
//! [`VectorUnit::run_task`] executes one slice. The slice ends on BREAK, on
//! a write that halts the RSP, or once the instruction budget is spent. The
//! budget is never checked between a branch and its delay slot, so SP_PC
//! always names a resumable instruction.

mod cop2;
pub mod divide;
mod scalar;
mod transfer;
pub mod vector;

#[cfg(test)]
mod tests;

use crate::core::interrupt::interrupts;
use crate::core::memory::Bus;
use crate::core::peripherals::SpStatus;
use bincode::{Decode, Encode};
use divide::DivideState;
use serde::{Deserialize, Serialize};
use vector::{Accumulator, Lanes, VectorFlags};

/// Default per-slice instruction budget
pub const DEFAULT_INSTRUCTION_BUDGET: u32 = 2048;

/// Why a task slice returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// BREAK executed: SP_STATUS has HALT and BROKE set
    Break,
    /// The RSP halted itself through SP_STATUS
    Halted,
    /// Budget spent; execution resumes at SP_PC
    BudgetExhausted,
}

/// Result of [`VectorUnit::run_task`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOutcome {
    pub reason: StopReason,
    pub instructions: u32,
}

/// Control flow after one scalar instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Break,
}

/// RSP scalar core and vector unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct VectorUnit {
    /// Scalar registers (r0 hardwired to zero)
    regs: [u32; 32],

    /// Vector registers
    vregs: [Lanes; 32],

    acc: Accumulator,
    flags: VectorFlags,
    divide: DivideState,

    /// Address of the next instruction (IMEM offset)
    pc: u32,

    /// Address after `pc`; holds the branch target while a delay slot runs
    next_pc: u32,

    /// Next instruction is a delay slot
    delay_slot_next: bool,

    instruction_budget: u32,
}

impl VectorUnit {
    /// Create a vector unit with zeroed registers
    pub fn new(instruction_budget: u32) -> Self {
        Self {
            regs: [0; 32],
            vregs: [[0; 8]; 32],
            acc: Accumulator::default(),
            flags: VectorFlags::default(),
            divide: DivideState::default(),
            pc: 0,
            next_pc: 4,
            delay_slot_next: false,
            instruction_budget: instruction_budget.max(1),
        }
    }

    /// Clear all register state, keeping the budget
    pub fn reset(&mut self) {
        *self = Self::new(self.instruction_budget);
    }

    pub fn instruction_budget(&self) -> u32 {
        self.instruction_budget
    }

    pub fn set_instruction_budget(&mut self, budget: u32) {
        self.instruction_budget = budget.max(1);
    }

    /// Read a scalar register
    #[inline(always)]
    pub fn reg(&self, index: usize) -> u32 {
        self.regs[index & 0x1F]
    }

    /// Write a scalar register (writes to r0 are discarded)
    #[inline(always)]
    pub fn set_reg(&mut self, index: usize, value: u32) {
        if index != 0 {
            self.regs[index & 0x1F] = value;
        }
    }

    pub fn vreg(&self, index: usize) -> Lanes {
        self.vregs[index & 0x1F]
    }

    pub fn set_vreg(&mut self, index: usize, lanes: Lanes) {
        self.vregs[index & 0x1F] = lanes;
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.acc
    }

    pub fn flags(&self) -> VectorFlags {
        self.flags
    }

    pub fn divide_state(&self) -> DivideState {
        self.divide
    }

    /// Execute one task slice starting at `imem_offset`
    ///
    /// Returns immediately with zero instructions if SP_STATUS.HALT is set.
    /// On BREAK, HALT and BROKE are set and the SP interrupt is raised when
    /// SP_STATUS.INTR_ON_BREAK is set. SP_PC is written back on every exit.
    pub fn run_task(&mut self, bus: &mut Bus, imem_offset: u32) -> TaskOutcome {
        if bus.sp.halted() {
            return TaskOutcome {
                reason: StopReason::Halted,
                instructions: 0,
            };
        }

        self.pc = imem_offset & 0xFFC;
        self.next_pc = (self.pc + 4) & 0xFFC;
        self.delay_slot_next = false;

        let mut executed = 0u32;
        let reason = loop {
            if executed >= self.instruction_budget && !self.delay_slot_next {
                break StopReason::BudgetExhausted;
            }

            let flow = self.step(bus);
            executed += 1;

            if flow == Flow::Break {
                let mut status = bus.sp.status();
                status.insert(SpStatus::HALT | SpStatus::BROKE);
                bus.sp.set_status(status);
                if status.contains(SpStatus::INTR_ON_BREAK) {
                    bus.mi.raise(interrupts::SP);
                }
                break StopReason::Break;
            }

            if bus.sp.halted() && !self.delay_slot_next {
                break StopReason::Halted;
            }
        };

        bus.sp.set_pc(self.pc);
        log::trace!(
            "RSP slice: {} instructions, {:?}, SP_PC=0x{:03X}",
            executed,
            reason,
            self.pc
        );

        TaskOutcome {
            reason,
            instructions: executed,
        }
    }

    /// Fetch and execute one instruction
    fn step(&mut self, bus: &mut Bus) -> Flow {
        let instruction = bus.imem_read32(self.pc);
        self.delay_slot_next = false;
        let current_pc = self.pc;
        self.pc = self.next_pc;
        self.next_pc = (self.next_pc + 4) & 0xFFC;
        self.execute(instruction, current_pc, bus)
    }

    /// Schedule a transfer after the delay slot
    fn branch_to(&mut self, target: u32) {
        self.next_pc = target & 0xFFC;
        self.delay_slot_next = true;
    }

    // === DMEM access (byte-wise, big-endian, wrapping at 4KB) ===

    fn dmem_read8(bus: &Bus, address: u32) -> u8 {
        bus.dmem()[(address & 0xFFF) as usize]
    }

    fn dmem_write8(bus: &mut Bus, address: u32, value: u8) {
        bus.dmem_mut()[(address & 0xFFF) as usize] = value;
    }

    fn dmem_read(bus: &Bus, address: u32, size: u32) -> u32 {
        (0..size).fold(0, |value, i| {
            (value << 8) | Self::dmem_read8(bus, address.wrapping_add(i)) as u32
        })
    }

    fn dmem_write(bus: &mut Bus, address: u32, size: u32, value: u32) {
        for i in 0..size {
            let shift = (size - 1 - i) * 8;
            Self::dmem_write8(bus, address.wrapping_add(i), (value >> shift) as u8);
        }
    }

    // === Vector register byte view ===

    /// Byte `index` of a vector register, big-endian across the 128 bits
    fn vreg_byte(&self, reg: usize, index: usize) -> u8 {
        let lane = self.vregs[reg & 0x1F][(index & 15) >> 1] as u16;
        if index & 1 == 0 {
            (lane >> 8) as u8
        } else {
            lane as u8
        }
    }

    fn set_vreg_byte(&mut self, reg: usize, index: usize, value: u8) {
        let lane = &mut self.vregs[reg & 0x1F][(index & 15) >> 1];
        let bits = *lane as u16;
        let bits = if index & 1 == 0 {
            (bits & 0x00FF) | ((value as u16) << 8)
        } else {
            (bits & 0xFF00) | value as u16
        };
        *lane = bits as i16;
    }
}

impl Default for VectorUnit {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUCTION_BUDGET)
    }
}
