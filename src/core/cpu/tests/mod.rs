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

//! CPU test modules
//!
//! Tests are organized into the following categories:
//! - `basic`: CPU initialization, reset, register access, PC handling
//! - `arithmetic`: ALU, shift, multiply and divide results
//! - `branches`: delay slots, branch-likely nullification, jumps and links
//! - `exceptions`: exception entry, ERET, traps and interrupt polling
//! - `cop0`: COP0 moves and the Count/Compare timer
//! - `cop1`: FPU moves, arithmetic, conversions and compares
//! - `load_store`: aligned and unaligned memory access, LL/SC
//! - `decode`: Instruction field extraction
//!
//! Programs are assembled with the encoders below and placed at the start of
//! RDRAM, reached through KSEG0.

use super::*;

mod load_store;

/// KSEG0 address of the first program word
const BASE: u32 = 0x8000_0000;

/// Sign-extended KSEG0 program address
fn pc_at(offset: u32) -> u64 {
    (BASE + offset) as i32 as i64 as u64
}

/// Encode an R-type SPECIAL instruction
fn special(funct: u32, rs: u32, rt: u32, rd: u32, sa: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | (sa << 6) | funct
}

/// Encode an I-type instruction
fn itype(op: u32, rs: u32, rt: u32, imm: u16) -> u32 {
    (op << 26) | (rs << 21) | (rt << 16) | imm as u32
}

/// Encode a COP0/COP1 move or control instruction
fn cop(op: u32, sub: u32, rt: u32, rd: u32, funct: u32) -> u32 {
    (op << 26) | (sub << 21) | (rt << 16) | (rd << 11) | funct
}

/// ADDIU rt, rs, imm
fn addiu(rt: u32, rs: u32, imm: u16) -> u32 {
    itype(0x09, rs, rt, imm)
}

const NOP: u32 = 0;

/// Place `program` at BASE and point a fresh CPU at it
///
/// Status is cleared so exceptions vector to 0x80000180.
fn setup(program: &[u32]) -> (CPU, Bus) {
    let mut bus = Bus::new();
    for (index, word) in program.iter().enumerate() {
        bus.write32(BASE + (index as u32) * 4, *word);
    }

    let mut cpu = CPU::new();
    cpu.set_cop0_reg(Cop0::STATUS, 0);
    cpu.set_pc(BASE as u64);
    (cpu, bus)
}

fn run(cpu: &mut CPU, bus: &mut Bus, steps: usize) {
    for _ in 0..steps {
        cpu.step(bus);
    }
}

/// Cause.ExcCode of the last exception
fn exc_code(cpu: &CPU) -> u64 {
    (cpu.cop0_reg(Cop0::CAUSE) & cause::EXC_CODE_MASK) >> 2
}
