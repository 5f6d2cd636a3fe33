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

//! VR4300 CPU interpreter
//!
//! MIPS III with 64-bit general purpose registers, COP0 system control and a
//! COP1 floating point unit. Every architectural exception is handled inside
//! the CPU by vectoring to the exception handler, so [`CPU::step`] is
//! infallible.
//!
//! ## Delay slots
//!
//! `pc` is the address of the next instruction to execute and `next_pc` the
//! one after it. A branch executes while `pc` already points at its delay
//! slot, so a taken branch only rewrites `next_pc`; the target reaches `pc`
//! after the delay-slot instruction retires.

use crate::core::memory::Bus;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

// Module declarations
mod cop0;
mod cop1;
mod decode;
mod instructions;
#[cfg(test)]
mod tests;

// Re-exports
use cop0::{cause, status, Cop0};
pub use cop0::ExceptionCause;
use cop1::Cop1;
pub use cop1::RoundingMode;
use decode::sext32;
pub use decode::Instruction;

/// Reset vector (PIF ROM)
const RESET_VECTOR: u64 = 0xFFFF_FFFF_BFC0_0000;

/// General exception vector with Status.BEV clear
const EXCEPTION_VECTOR: u64 = 0xFFFF_FFFF_8000_0180;

/// General exception vector with Status.BEV set
const BOOTSTRAP_EXCEPTION_VECTOR: u64 = 0xFFFF_FFFF_BFC0_0380;

/// CPU (NEC VR4300) emulation implementation
///
/// # Specifications
/// - Architecture: MIPS III (64-bit)
/// - Clock frequency: 93.75 MHz
/// - Registers: 32 GPRs, HI/LO, 32 FPRs, FCR0/FCR31, COP0
///
/// # Example
/// ```
/// use n64rx::core::cpu::CPU;
///
/// let mut cpu = CPU::new();
/// cpu.reset();
/// assert_eq!(cpu.reg(0), 0); // r0 is always 0
/// assert_eq!(cpu.pc(), 0xFFFF_FFFF_BFC0_0000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CPU {
    /// General purpose registers (r0-r31)
    ///
    /// r0 is never written, so it always reads 0
    regs: [u64; 32],

    /// Address of the next instruction to execute
    pc: u64,

    /// Address of the instruction after `pc` (branch target once a branch is taken)
    next_pc: u64,

    /// Address of the instruction currently executing
    current_pc: u64,

    /// HI register (multiply high half / division remainder)
    hi: u64,

    /// LO register (multiply low half / division quotient)
    lo: u64,

    /// Coprocessor 0 (System Control)
    cop0: Cop0,

    /// Coprocessor 1 (FPU)
    cop1: Cop1,

    /// Set by a taken branch during the current instruction
    branch_taken: bool,

    /// The current instruction sits in a branch delay slot
    in_delay_slot: bool,

    /// The next instruction is a delay slot
    delay_slot_next: bool,

    /// LL/SC link bit
    llbit: bool,

    /// Current instruction word
    current_instruction: u32,
}

impl CPU {
    /// Create a new CPU in its power-on state
    ///
    /// - All general purpose registers: 0
    /// - PC: 0xBFC00000 (PIF ROM), sign-extended
    /// - Status: ERL | BEV
    pub fn new() -> Self {
        Self {
            regs: [0u64; 32],
            pc: RESET_VECTOR,
            next_pc: RESET_VECTOR.wrapping_add(4),
            current_pc: RESET_VECTOR,
            hi: 0,
            lo: 0,
            cop0: Cop0::new(),
            cop1: Cop1::new(),
            branch_taken: false,
            in_delay_slot: false,
            delay_slot_next: false,
            llbit: false,
            current_instruction: 0,
        }
    }

    /// Reset CPU to its power-on state
    pub fn reset(&mut self) {
        self.regs = [0u64; 32];
        self.pc = RESET_VECTOR;
        self.next_pc = RESET_VECTOR.wrapping_add(4);
        self.current_pc = RESET_VECTOR;
        self.hi = 0;
        self.lo = 0;
        self.cop0.reset();
        self.cop1.reset();
        self.branch_taken = false;
        self.in_delay_slot = false;
        self.delay_slot_next = false;
        self.llbit = false;
        self.current_instruction = 0;
    }

    /// Read a general purpose register
    ///
    /// # Example
    /// ```
    /// use n64rx::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_reg(1, 0x1234_5678_9ABC_DEF0);
    /// assert_eq!(cpu.reg(1), 0x1234_5678_9ABC_DEF0);
    ///
    /// // Writes to r0 are ignored
    /// cpu.set_reg(0, 0xDEAD_BEEF);
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    #[inline(always)]
    pub fn reg(&self, index: usize) -> u64 {
        self.regs[index & 0x1F]
    }

    /// Write a general purpose register; writes to r0 are discarded
    #[inline(always)]
    pub fn set_reg(&mut self, index: usize, value: u64) {
        if index != 0 {
            self.regs[index & 0x1F] = value;
        }
    }

    /// Write the sign-extended low 32 bits of `value`
    #[inline(always)]
    pub(crate) fn set_reg32(&mut self, index: usize, value: u32) {
        self.set_reg(index, value as i32 as i64 as u64);
    }

    pub fn pc(&self) -> u64 {
        self.pc
    }

    pub fn next_pc(&self) -> u64 {
        self.next_pc
    }

    /// Jump directly to `pc`, discarding any pending branch
    ///
    /// 32-bit addresses are sign-extended the way the CPU forms them.
    pub fn set_pc(&mut self, pc: u64) {
        let pc = sext32(pc);
        self.pc = pc;
        self.next_pc = pc.wrapping_add(4);
        self.current_pc = pc;
        self.branch_taken = false;
        self.in_delay_slot = false;
        self.delay_slot_next = false;
    }

    pub fn hi(&self) -> u64 {
        self.hi
    }

    pub fn lo(&self) -> u64 {
        self.lo
    }

    /// True while the executing instruction is a branch delay slot
    pub fn in_delay_slot(&self) -> bool {
        self.in_delay_slot
    }

    /// True if the last executed instruction was a taken branch
    pub fn branch_taken(&self) -> bool {
        self.branch_taken
    }

    pub fn current_instruction(&self) -> u32 {
        self.current_instruction
    }

    /// Read a COP0 register
    pub fn cop0_reg(&self, index: usize) -> u64 {
        self.cop0.read(index)
    }

    /// Write a COP0 register with MTC0 semantics
    pub fn set_cop0_reg(&mut self, index: usize, value: u64) {
        self.cop0.write(index, value);
    }

    /// Raw 64-bit FPU register contents
    pub fn fpr(&self, index: usize) -> u64 {
        self.cop1.fpr[index & 0x1F]
    }

    pub fn set_fpr(&mut self, index: usize, value: u64) {
        self.cop1.fpr[index & 0x1F] = value;
    }

    /// FPU control/status register (FCR31)
    pub fn fcr31(&self) -> u32 {
        self.cop1.fcr31
    }

    pub fn llbit(&self) -> bool {
        self.llbit
    }

    /// Execute one instruction
    ///
    /// 1. Instruction fetch (misaligned PC raises AddressErrorLoad)
    /// 2. PC update (delay slot handling)
    /// 3. Instruction execution
    /// 4. Count/Compare tick and interrupt poll
    ///
    /// # Returns
    ///
    /// Number of cycles consumed (always 1)
    ///
    /// # Example
    ///
    /// ```
    /// use n64rx::core::cpu::CPU;
    /// use n64rx::core::memory::Bus;
    ///
    /// let mut cpu = CPU::new();
    /// let mut bus = Bus::new();
    ///
    /// // ADDIU r1, r0, 5 at the start of RDRAM
    /// bus.write32(0x8000_0000, 0x2401_0005);
    /// cpu.set_pc(0x8000_0000);
    ///
    /// assert_eq!(cpu.step(&mut bus), 1);
    /// assert_eq!(cpu.reg(1), 5);
    /// ```
    pub fn step(&mut self, bus: &mut Bus) -> u32 {
        self.current_pc = self.pc;
        self.in_delay_slot = self.delay_slot_next;
        self.delay_slot_next = false;
        self.branch_taken = false;

        if self.pc & 3 != 0 {
            self.address_error(ExceptionCause::AddressErrorLoad, self.pc);
        } else {
            self.current_instruction = bus.read32(self.pc as u32);

            self.pc = self.next_pc;
            self.next_pc = self.next_pc.wrapping_add(4);

            self.execute_instruction(bus);
        }

        self.cop0.tick();
        self.poll_interrupts(bus);

        1
    }

    /// Latch the MI line into Cause.IP2 and take a pending interrupt
    ///
    /// Interrupts are never taken between a branch and its delay slot or
    /// between the delay slot and the branch target.
    fn poll_interrupts(&mut self, bus: &Bus) {
        self.cop0.set_ip2(bus.mi.pending_and_enabled());

        if self.delay_slot_next || self.in_delay_slot {
            return;
        }

        if self.cop0.interrupt_ready() {
            log::trace!(
                "Interrupt taken: cause=0x{:08X}, EPC=0x{:016X}",
                self.cop0.cause(),
                self.pc
            );
            self.enter_exception(ExceptionCause::Interrupt, self.pc, false, 0);
        }
    }

    /// Raise an exception for the instruction currently executing
    ///
    /// EPC receives the faulting instruction address, or the branch address
    /// with Cause.BD set when the instruction sits in a delay slot.
    pub fn exception(&mut self, cause: ExceptionCause) {
        self.exception_with_ce(cause, 0);
    }

    fn exception_with_ce(&mut self, cause: ExceptionCause, ce: u64) {
        let (epc, bd) = if self.in_delay_slot {
            (self.current_pc.wrapping_sub(4), true)
        } else {
            (self.current_pc, false)
        };

        log::warn!(
            "EXCEPTION: cause={:?}, EPC=0x{:016X}, in_delay={}, instruction=0x{:08X}",
            cause,
            epc,
            bd,
            self.current_instruction
        );

        self.enter_exception(cause, epc, bd, ce);
    }

    /// Address error with BadVAddr
    pub(crate) fn address_error(&mut self, cause: ExceptionCause, vaddr: u64) {
        self.cop0.regs[Cop0::BADVADDR] = vaddr;
        self.exception(cause);
    }

    /// CoprocessorUnusable with Cause.CE naming the coprocessor
    pub(crate) fn coprocessor_unusable(&mut self, cop: u32) {
        self.exception_with_ce(ExceptionCause::CoprocessorUnusable, cop as u64);
    }

    fn enter_exception(&mut self, exception: ExceptionCause, epc: u64, bd: bool, ce: u64) {
        let sr = self.cop0.status();
        let mut cause_reg = self.cop0.cause();

        if sr & status::EXL == 0 {
            self.cop0.regs[Cop0::EPC] = epc;
            if bd {
                cause_reg |= cause::BD;
            } else {
                cause_reg &= !cause::BD;
            }
        }

        cause_reg &= !(cause::EXC_CODE_MASK | cause::CE_MASK);
        cause_reg |= ((exception as u64) << 2) & cause::EXC_CODE_MASK;
        cause_reg |= (ce << 28) & cause::CE_MASK;
        self.cop0.regs[Cop0::CAUSE] = cause_reg;
        self.cop0.regs[Cop0::STATUS] = sr | status::EXL;

        let handler = if sr & status::BEV != 0 {
            BOOTSTRAP_EXCEPTION_VECTOR
        } else {
            EXCEPTION_VECTOR
        };

        self.pc = handler;
        self.next_pc = handler.wrapping_add(4);
        self.branch_taken = false;
        self.delay_slot_next = false;
    }

    /// Log the register file at debug level
    pub fn dump_registers(&self) {
        log::debug!(
            "PC: 0x{:016X}  Next PC: 0x{:016X}  HI: 0x{:016X}  LO: 0x{:016X}",
            self.pc,
            self.next_pc,
            self.hi,
            self.lo
        );
        for (index, values) in self.regs.chunks(4).enumerate() {
            log::debug!(
                "r{:02}: {:016X} {:016X} {:016X} {:016X}",
                index * 4,
                values[0],
                values[1],
                values[2],
                values[3]
            );
        }
        log::debug!(
            "Status: 0x{:08X}  Cause: 0x{:08X}  EPC: 0x{:016X}",
            self.cop0.status(),
            self.cop0.cause(),
            self.cop0.regs[Cop0::EPC]
        );
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}
