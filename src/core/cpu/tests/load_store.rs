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

use super::super::*;
use super::*;

/// Program whose data area starts at BASE + 0x100 (r1 points at it)
fn setup_data(program: &[u32], data: &[u8]) -> (CPU, Bus) {
    let (mut cpu, mut bus) = setup(program);
    for (offset, byte) in data.iter().enumerate() {
        bus.write8(BASE + 0x100 + offset as u32, *byte);
    }
    cpu.set_reg(1, pc_at(0x100));
    (cpu, bus)
}

/// Bytes 0x00, 0x11, .., 0xFF
fn ramp() -> Vec<u8> {
    (0..16).map(|i| (i * 0x11) as u8).collect()
}

#[test]
fn test_byte_loads_extend() {
    let (mut cpu, mut bus) = setup_data(
        &[itype(0x20, 1, 2, 0), itype(0x24, 1, 3, 0)],
        &[0x80],
    );

    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.reg(2), 0xFFFF_FFFF_FFFF_FF80);
    assert_eq!(cpu.reg(3), 0x80);
}

#[test]
fn test_halfword_and_word_loads() {
    let (mut cpu, mut bus) = setup_data(
        &[
            itype(0x21, 1, 2, 0), // LH
            itype(0x25, 1, 3, 0), // LHU
            itype(0x23, 1, 4, 0), // LW
            itype(0x27, 1, 5, 0), // LWU
        ],
        &[0x89, 0xAB, 0xCD, 0xEF],
    );

    run(&mut cpu, &mut bus, 4);

    assert_eq!(cpu.reg(2), 0xFFFF_FFFF_FFFF_89AB);
    assert_eq!(cpu.reg(3), 0x89AB);
    assert_eq!(cpu.reg(4), 0xFFFF_FFFF_89AB_CDEF);
    assert_eq!(cpu.reg(5), 0x89AB_CDEF);
}

#[test]
fn test_ld_and_sd() {
    let (mut cpu, mut bus) = setup_data(
        &[itype(0x37, 1, 2, 0), itype(0x3F, 1, 2, 8)],
        &ramp(),
    );

    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.reg(2), 0x0011_2233_4455_6677);
    assert_eq!(bus.read64(BASE + 0x108), 0x0011_2233_4455_6677);
}

#[test]
fn test_negative_offset() {
    let (mut cpu, mut bus) = setup_data(&[itype(0x23, 1, 2, 0xFFFC)], &[]);
    bus.write32(BASE + 0xFC, 0xCAFE_F00D);

    cpu.step(&mut bus);

    assert_eq!(cpu.reg(2) as u32, 0xCAFE_F00D);
}

#[test]
fn test_stores() {
    let (mut cpu, mut bus) = setup_data(
        &[
            itype(0x28, 1, 2, 0), // SB
            itype(0x29, 1, 2, 2), // SH
            itype(0x2B, 1, 2, 4), // SW
        ],
        &[],
    );
    cpu.set_reg(2, 0x1122_3344_5566_7788);

    run(&mut cpu, &mut bus, 3);

    assert_eq!(bus.read8(BASE + 0x100), 0x88);
    assert_eq!(bus.read16(BASE + 0x102), 0x7788);
    assert_eq!(bus.read32(BASE + 0x104), 0x5566_7788);
}

#[test]
fn test_kseg1_mirrors_kseg0() {
    let (mut cpu, mut bus) = setup(&[itype(0x2B, 1, 2, 0)]);
    cpu.set_reg(1, 0xFFFF_FFFF_A000_0200);
    cpu.set_reg(2, 0xDEAD_BEEF);

    cpu.step(&mut bus);

    assert_eq!(bus.read32(0x8000_0200), 0xDEAD_BEEF);
}

#[test]
fn test_misaligned_load_raises_address_error() {
    let (mut cpu, mut bus) = setup_data(&[itype(0x23, 1, 2, 2)], &[]);
    cpu.set_reg(2, 0x55);

    cpu.step(&mut bus);

    assert_eq!(exc_code(&cpu), ExceptionCause::AddressErrorLoad as u64);
    assert_eq!(cpu.cop0_reg(Cop0::BADVADDR), pc_at(0x102));
    assert_eq!(cpu.reg(2), 0x55);
}

#[test]
fn test_misaligned_store_leaves_memory() {
    let (mut cpu, mut bus) = setup_data(&[itype(0x3F, 1, 2, 4)], &[]);
    cpu.set_reg(2, u64::MAX);

    cpu.step(&mut bus);

    assert_eq!(exc_code(&cpu), ExceptionCause::AddressErrorStore as u64);
    assert_eq!(bus.read64(BASE + 0x100), 0);
    assert_eq!(bus.read64(BASE + 0x108), 0);
}

#[test]
fn test_lwl_lwr_unaligned_word() {
    let (mut cpu, mut bus) = setup_data(
        &[itype(0x22, 1, 2, 1), itype(0x26, 1, 2, 4)],
        &ramp(),
    );

    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.reg(2), 0x1122_3344);
}

#[test]
fn test_lwl_keeps_low_bytes() {
    let (mut cpu, mut bus) = setup_data(&[itype(0x22, 1, 2, 2)], &ramp());
    cpu.set_reg(2, 0xAABB_CCDD);

    cpu.step(&mut bus);

    assert_eq!(cpu.reg(2), 0x2233_CCDD);
}

#[test]
fn test_swl_swr_unaligned_word() {
    let (mut cpu, mut bus) = setup_data(
        &[itype(0x2A, 1, 2, 1), itype(0x2E, 1, 2, 4)],
        &ramp(),
    );
    cpu.set_reg(2, 0xAABB_CCDD);

    run(&mut cpu, &mut bus, 2);

    assert_eq!(bus.read32(BASE + 0x100), 0x00AA_BBCC);
    assert_eq!(bus.read32(BASE + 0x104), 0xDD55_6677);
}

#[test]
fn test_ldl_ldr_unaligned_doubleword() {
    let (mut cpu, mut bus) = setup_data(
        &[itype(0x1A, 1, 2, 1), itype(0x1B, 1, 2, 8)],
        &ramp(),
    );

    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.reg(2), 0x1122_3344_5566_7788);
}

#[test]
fn test_sdl_sdr_unaligned_doubleword() {
    let (mut cpu, mut bus) = setup_data(
        &[itype(0x2C, 1, 2, 1), itype(0x2D, 1, 2, 8)],
        &[0; 16],
    );
    cpu.set_reg(2, 0x0102_0304_0506_0708);

    run(&mut cpu, &mut bus, 2);

    assert_eq!(bus.read64(BASE + 0x100), 0x0001_0203_0405_0607);
    assert_eq!(bus.read64(BASE + 0x108), 0x0800_0000_0000_0000);
}

#[test]
fn test_ll_sc_success() {
    let (mut cpu, mut bus) = setup_data(
        &[itype(0x30, 1, 2, 0), itype(0x38, 1, 3, 0)],
        &[0, 0, 0, 7],
    );
    cpu.set_reg(3, 99);

    run(&mut cpu, &mut bus, 2);

    assert_eq!(cpu.reg(2), 7);
    assert_eq!(cpu.reg(3), 1);
    assert_eq!(bus.read32(BASE + 0x100), 99);
    assert_eq!(cpu.cop0_reg(Cop0::LLADDR), 0x100 >> 4);
}

#[test]
fn test_sc_fails_without_link() {
    let (mut cpu, mut bus) = setup_data(&[itype(0x38, 1, 3, 0)], &[0, 0, 0, 7]);
    cpu.set_reg(3, 99);

    cpu.step(&mut bus);

    assert_eq!(cpu.reg(3), 0);
    assert_eq!(bus.read32(BASE + 0x100), 7);
}
