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

//! Scalar core and task slice tests

use super::*;
use crate::core::dma::DmaOwner;

#[test]
fn test_break_halts_and_saves_pc() {
    let (mut rsp, mut bus) = setup(&[ori(1, 5), BREAK]);

    let outcome = rsp.run_task(&mut bus, 0);

    assert_eq!(outcome.reason, StopReason::Break);
    assert_eq!(outcome.instructions, 2);
    assert_eq!(rsp.reg(1), 5);
    assert!(bus.sp.status().contains(SpStatus::HALT | SpStatus::BROKE));
    assert!(!bus.mi.is_pending(interrupts::SP));
    assert_eq!(bus.sp.pc(), 8);
}

#[test]
fn test_break_raises_sp_when_requested() {
    let (mut rsp, mut bus) = setup(&[BREAK]);
    bus.sp.set_status(SpStatus::INTR_ON_BREAK);

    rsp.run_task(&mut bus, 0);

    assert!(bus.mi.is_pending(interrupts::SP));
}

#[test]
fn test_halted_rsp_does_not_run() {
    let (mut rsp, mut bus) = setup(&[ori(1, 5), BREAK]);
    bus.sp.set_status(SpStatus::HALT);

    let outcome = rsp.run_task(&mut bus, 0);

    assert_eq!(outcome.reason, StopReason::Halted);
    assert_eq!(outcome.instructions, 0);
    assert_eq!(rsp.reg(1), 0);
}

#[test]
fn test_budget_never_splits_delay_slot() {
    // beq r0, r0, -1 ; nop
    let (_, mut bus) = setup(&[itype(0x04, 0, 0, 0xFFFF), NOP]);
    let mut rsp = VectorUnit::new(5);

    let outcome = rsp.run_task(&mut bus, 0);
    assert_eq!(outcome.reason, StopReason::BudgetExhausted);
    assert_eq!(outcome.instructions, 6);
    assert_eq!(bus.sp.pc(), 0);

    // Resumes from SP_PC
    let pc = bus.sp.pc();
    let outcome = rsp.run_task(&mut bus, pc);
    assert_eq!(outcome.instructions, 6);
    assert!(!bus.sp.halted());
}

#[test]
fn test_jal_links_and_runs_delay_slot() {
    let (mut rsp, mut bus) = setup(&[
        (0x03 << 26) | (0x10 >> 2), // jal 0x10
        ori(2, 7),                  // delay slot
        ori(3, 9),                  // skipped
        BREAK,
        BREAK, // 0x10
    ]);

    let outcome = rsp.run_task(&mut bus, 0);

    assert_eq!(outcome.instructions, 3);
    assert_eq!(rsp.reg(31), 8);
    assert_eq!(rsp.reg(2), 7);
    assert_eq!(rsp.reg(3), 0);
    assert_eq!(bus.sp.pc(), 0x14);
}

#[test]
fn test_not_taken_branch_runs_delay_slot() {
    let (mut rsp, mut bus) = setup(&[
        ori(1, 1),
        itype(0x05, 1, 1, 2), // bne r1, r1 (not taken)
        ori(2, 2),
        ori(3, 3),
        BREAK,
    ]);

    rsp.run_task(&mut bus, 0);

    assert_eq!(rsp.reg(2), 2);
    assert_eq!(rsp.reg(3), 3);
}

#[test]
fn test_scalar_arithmetic() {
    let (mut rsp, mut bus) = setup(&[
        ori(1, 5),
        itype(0x09, 0, 2, 0xFFFF),    // addiu r2, r0, -1
        special(0x23, 1, 2, 3, 0),    // subu r3, r1, r2
        special(0x2A, 2, 1, 4, 0),    // slt r4, r2, r1
        special(0x2B, 2, 1, 5, 0),    // sltu r5, r2, r1
        special(0x03, 0, 2, 6, 4),    // sra r6, r2, 4
        special(0x02, 0, 2, 7, 28),   // srl r7, r2, 28
        special(0x00, 0, 1, 0, 4),    // sll r0 (discarded)
        BREAK,
    ]);

    rsp.run_task(&mut bus, 0);

    assert_eq!(rsp.reg(2), 0xFFFF_FFFF);
    assert_eq!(rsp.reg(3), 6);
    assert_eq!(rsp.reg(4), 1);
    assert_eq!(rsp.reg(5), 0);
    assert_eq!(rsp.reg(6), 0xFFFF_FFFF);
    assert_eq!(rsp.reg(7), 0xF);
    assert_eq!(rsp.reg(0), 0);
}

#[test]
fn test_dmem_access_wraps_at_4k() {
    let (mut rsp, mut bus) = setup(&[
        ori(1, 0xFFE),
        itype(0x0F, 0, 2, 0x1234),  // lui r2, 0x1234
        itype(0x0D, 2, 2, 0x5678),  // ori r2, r2, 0x5678
        itype(0x2B, 1, 2, 0),       // sw r2, 0(r1)
        itype(0x23, 1, 3, 0),       // lw r3, 0(r1)
        itype(0x21, 1, 4, 0),       // lh r4, 0(r1)
        ori(5, 0x80),
        itype(0x28, 0, 5, 0x10),    // sb r5, 0x10(r0)
        itype(0x20, 0, 6, 0x10),    // lb r6
        itype(0x24, 0, 7, 0x10),    // lbu r7
        BREAK,
    ]);

    rsp.run_task(&mut bus, 0);

    assert_eq!(&bus.dmem()[0xFFE..], &[0x12, 0x34]);
    assert_eq!(&bus.dmem()[..2], &[0x56, 0x78]);
    assert_eq!(rsp.reg(3), 0x1234_5678);
    assert_eq!(rsp.reg(4), 0x1234);
    assert_eq!(rsp.reg(6), 0xFFFF_FF80);
    assert_eq!(rsp.reg(7), 0x80);
}

#[test]
fn test_mtc0_queues_dp_command_range() {
    let (mut rsp, mut bus) = setup(&[
        ori(1, 0x100),
        mtc0(1, 8), // DPC_START
        ori(2, 0x140),
        mtc0(2, 9), // DPC_END
        BREAK,
    ]);

    rsp.run_task(&mut bus, 0);

    assert!(bus.dp.has_pending());
}

#[test]
fn test_mtc0_starts_sp_dma() {
    let (mut rsp, mut bus) = setup(&[
        ori(1, 0x100),
        mtc0(1, 0), // SP_MEM_ADDR
        ori(2, 0x2000),
        mtc0(2, 1), // SP_DRAM_ADDR
        ori(3, 0x7F),
        mtc0(3, 2), // SP_RD_LEN
        mfc0(4, 6), // SP_DMA_BUSY
        BREAK,
    ]);

    rsp.run_task(&mut bus, 0);

    assert!(bus.dma_busy(DmaOwner::Sp));
    assert_eq!(rsp.reg(4), 1);
}

#[test]
fn test_mtc0_halt_stops_slice() {
    let (mut rsp, mut bus) = setup(&[
        ori(1, 0x2),
        mtc0(1, 4), // SP_STATUS: set halt
        ori(2, 1),
        BREAK,
    ]);

    let outcome = rsp.run_task(&mut bus, 0);

    assert_eq!(outcome.reason, StopReason::Halted);
    assert_eq!(outcome.instructions, 2);
    assert_eq!(rsp.reg(2), 0);
    assert!(!bus.sp.status().contains(SpStatus::BROKE));
}

#[test]
fn test_mfc0_semaphore() {
    let (mut rsp, mut bus) = setup(&[mfc0(1, 7), mfc0(2, 7), BREAK]);

    rsp.run_task(&mut bus, 0);

    assert_eq!(rsp.reg(1), 0);
    assert_eq!(rsp.reg(2), 1);
}

#[test]
fn test_unknown_opcode_is_skipped() {
    let (mut rsp, mut bus) = setup(&[0x7000_0000, ori(1, 3), BREAK]);

    let outcome = rsp.run_task(&mut bus, 0);

    assert_eq!(outcome.reason, StopReason::Break);
    assert_eq!(rsp.reg(1), 3);
}

#[test]
fn test_vector_add_through_microcode() {
    let (mut rsp, mut bus) = setup(&[
        lwc2(0x04, 0, 1, 0, 0),   // lqv v1, 0x00
        lwc2(0x04, 0, 2, 0, 1),   // lqv v2, 0x10
        vop(0x10, 3, 1, 2, 0),    // vadd v3, v1, v2
        swc2(0x04, 0, 3, 0, 2),   // sqv v3, 0x20
        BREAK,
    ]);
    for lane in 0..8 {
        let offset = lane * 2;
        bus.dmem_mut()[offset..offset + 2].copy_from_slice(&32000i16.to_be_bytes());
        let second: i16 = if lane == 0 { 32000 } else { lane as i16 };
        bus.dmem_mut()[0x10 + offset..0x12 + offset].copy_from_slice(&second.to_be_bytes());
    }

    rsp.run_task(&mut bus, 0);

    assert_eq!(&bus.dmem()[0x20..0x22], &[0x7F, 0xFF]);
    // 32000 + 1
    assert_eq!(&bus.dmem()[0x22..0x24], &32001i16.to_be_bytes());
    assert_eq!(rsp.flags().vcc, 0x01);
    assert_eq!(rsp.accumulator().0[0], 64000);
}

#[test]
fn test_vector_broadcast_operand() {
    // vand v3, v1, v2[5]
    let (mut rsp, mut bus) = setup(&[vop(0x28, 3, 1, 2, 8 + 5), BREAK]);
    rsp.set_vreg(1, [0x00FF; 8]);
    rsp.set_vreg(2, lanes([0, 0, 0, 0, 0, 0x0F0F, 0, 0]));

    rsp.run_task(&mut bus, 0);

    assert_eq!(rsp.vreg(3), [0x000F; 8]);
}
