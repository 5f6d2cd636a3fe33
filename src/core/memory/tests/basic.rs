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

#[test]
fn test_rdram_big_endian() {
    let mut bus = Bus::new();
    bus.write32(0x8000_0100, 0xDEAD_BEEF);

    assert_eq!(bus.read8(0x8000_0100), 0xDE);
    assert_eq!(bus.read8(0x8000_0103), 0xEF);
    assert_eq!(bus.read16(0x8000_0102), 0xBEEF);
    assert_eq!(bus.read32(0x0000_0100), 0xDEAD_BEEF);
}

#[test]
fn test_segments_mirror() {
    let mut bus = Bus::new();
    bus.write32(0xA000_1000, 0x1122_3344);

    assert_eq!(bus.read32(0x8000_1000), 0x1122_3344);
    assert_eq!(bus.read32(0x0000_1000), 0x1122_3344);
}

#[test]
fn test_doubleword_access() {
    let mut bus = Bus::new();
    bus.write64(0x8000_0200, 0x0123_4567_89AB_CDEF);

    assert_eq!(bus.read32(0x8000_0200), 0x0123_4567);
    assert_eq!(bus.read32(0x8000_0204), 0x89AB_CDEF);
    assert_eq!(bus.read64(0x8000_0200), 0x0123_4567_89AB_CDEF);
}

#[test]
fn test_sub_word_writes() {
    let mut bus = Bus::new();
    bus.write8(0x8000_0000, 0xAA);
    bus.write16(0x8000_0002, 0xBBCC);
    assert_eq!(bus.read32(0x8000_0000), 0xAA00_BBCC);
}

#[test]
fn test_unmapped_reads_zero_and_writes_ignored() {
    let mut bus = Bus::new();
    bus.write32(0x8090_0000, 0xFFFF_FFFF);
    assert_eq!(bus.read32(0x8090_0000), 0);
    assert_eq!(bus.read32(0xA420_0000), 0);
    assert_eq!(bus.read8(0xBFF0_0000), 0);
}

#[test]
fn test_dmem_and_imem() {
    let mut bus = Bus::new();
    bus.write32(0xA400_0010, 0x0102_0304);
    bus.write32(0xA400_1010, 0x0506_0708);

    assert_eq!(bus.dmem()[0x10..0x14], [1, 2, 3, 4]);
    assert_eq!(bus.imem()[0x10..0x14], [5, 6, 7, 8]);
    assert_eq!(bus.imem_read32(0x10), 0x0506_0708);
}

#[test]
fn test_cartridge_read_only() {
    let mut bus = Bus::new();
    let mut image = vec![0u8; 0x100];
    image[..4].copy_from_slice(&[0x80, 0x37, 0x12, 0x40]);
    image[0x40..0x44].copy_from_slice(&[0xCA, 0xFE, 0xBA, 0xBE]);
    bus.insert_cartridge(Cartridge::from_bytes(image).unwrap());

    assert_eq!(bus.read32(0xB000_0000), 0x8037_1240);
    assert_eq!(bus.read32(0xB000_0040), 0xCAFE_BABE);

    bus.write32(0xB000_0040, 0);
    assert_eq!(bus.read32(0xB000_0040), 0xCAFE_BABE);

    // past the end of the image
    assert_eq!(bus.read32(0xB010_0000), 0);
}

#[test]
fn test_no_cartridge_reads_zero() {
    let mut bus = Bus::new();
    assert_eq!(bus.read32(0xB000_0000), 0);
}

#[test]
fn test_pif_ram_window() {
    let mut bus = Bus::new();
    bus.write32(0xBFC0_07FC, 0x0000_0001);
    assert_eq!(bus.pif.ram()[63], 1);
    assert_eq!(bus.read8(0xBFC0_07FF), 1);

    // PIF ROM is read-only
    bus.write32(0xBFC0_0000, 0x1234_5678);
    assert_eq!(bus.read32(0xBFC0_0000), 0);
}

#[test]
fn test_reset_clears_memory() {
    let mut bus = Bus::new();
    bus.write32(0x8000_0000, 0x1234_5678);
    bus.write32(0xA400_0000, 0x1234_5678);
    bus.reset();
    assert_eq!(bus.read32(0x8000_0000), 0);
    assert_eq!(bus.read32(0xA400_0000), 0);
}
