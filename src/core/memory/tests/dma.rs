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
use crate::core::dma::DmaOwner;
use crate::core::interrupt::interrupts;
use crate::core::rdp::DisplayProcessor;

const PI_DRAM_ADDR: u32 = 0xA460_0000;
const PI_CART_ADDR: u32 = 0xA460_0004;
const PI_WR_LEN: u32 = 0xA460_000C;
const PI_STATUS: u32 = 0xA460_0010;

fn bus_with_cart() -> Bus {
    let mut image = vec![0u8; 0x2000];
    image[..4].copy_from_slice(&[0x80, 0x37, 0x12, 0x40]);
    for (i, byte) in image[0x1000..0x1100].iter_mut().enumerate() {
        *byte = i as u8;
    }
    let mut bus = Bus::new();
    bus.insert_cartridge(Cartridge::from_bytes(image).unwrap());
    bus
}

#[test]
fn test_pi_dma_busy_until_complete() {
    let mut bus = bus_with_cart();
    bus.write32(PI_DRAM_ADDR, 0x0000_4000);
    bus.write32(PI_CART_ADDR, 0x1000_1000);
    bus.write32(PI_WR_LEN, 0xFF);

    assert_eq!(bus.read32(PI_STATUS) & 1, 1);
    assert_eq!(bus.read8(0x8000_4001), 0);

    assert_eq!(bus.complete_due_dma(), 1);

    assert_eq!(bus.read32(PI_STATUS) & 1, 0);
    assert_eq!(bus.read8(0x8000_4001), 1);
    assert_eq!(bus.read8(0x8000_40FF), 0xFF);
    assert!(bus.mi.is_pending(interrupts::PI));
}

#[test]
fn test_pi_dma_interrupt_posted_once() {
    let mut bus = bus_with_cart();
    bus.write32(PI_CART_ADDR, 0x1000_1000);
    bus.write32(PI_WR_LEN, 7);
    bus.complete_due_dma();
    bus.write32(PI_STATUS, 0b10);

    assert_eq!(bus.complete_due_dma(), 0);
    assert!(!bus.mi.is_pending(interrupts::PI));
}

#[test]
fn test_dma_waits_for_deadline() {
    let mut bus = bus_with_cart();
    bus.set_dma_delay(2);
    bus.write32(PI_CART_ADDR, 0x1000_1000);
    bus.write32(PI_WR_LEN, 7);

    assert_eq!(bus.complete_due_dma(), 0);
    bus.advance_tick();
    assert_eq!(bus.complete_due_dma(), 0);
    assert!(bus.dma_busy(DmaOwner::Pi));
    bus.advance_tick();
    assert_eq!(bus.complete_due_dma(), 1);
    assert!(!bus.dma_busy(DmaOwner::Pi));
}

#[test]
fn test_pi_addresses_advance() {
    let mut bus = bus_with_cart();
    bus.write32(PI_DRAM_ADDR, 0x100);
    bus.write32(PI_CART_ADDR, 0x1000_1000);
    bus.write32(PI_WR_LEN, 0x3F);
    bus.complete_due_dma();

    assert_eq!(bus.read32(PI_DRAM_ADDR), 0x140);
    assert_eq!(bus.read32(PI_CART_ADDR), 0x1000_1040);
}

#[test]
fn test_sp_dma_rows_and_skip() {
    let mut bus = Bus::new();
    for i in 0..64u32 {
        bus.write8(0x8000_1000 + i, i as u8);
    }

    bus.write32(0xA404_0000, 0x0000); // DMEM 0
    bus.write32(0xA404_0004, 0x1000);
    // 2 rows of 8 bytes, skip 8
    bus.write32(0xA404_0008, (8 << 20) | (1 << 12) | 7);
    assert_eq!(bus.read32(0xA404_0018), 1);
    bus.complete_due_dma();

    assert_eq!(bus.dmem()[0..8], [0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(bus.dmem()[8..16], [16, 17, 18, 19, 20, 21, 22, 23]);
    assert!(!bus.mi.is_pending(interrupts::SP));
}

#[test]
fn test_sp_dma_to_rdram_from_imem() {
    let mut bus = Bus::new();
    bus.write32(0xA400_1000, 0xAABB_CCDD);

    bus.write32(0xA404_0000, 0x1000);
    bus.write32(0xA404_0004, 0x2000);
    bus.write32(0xA404_000C, 7);
    bus.complete_due_dma();

    assert_eq!(bus.read32(0x8000_2000), 0xAABB_CCDD);
}

#[test]
fn test_si_dma_runs_joybus_before_copy() {
    let mut bus = Bus::new();
    {
        let ram = bus.pif.ram_mut();
        ram[0] = 0x01;
        ram[1] = 0x03;
        ram[2] = 0x00;
        ram[6] = 0xFE;
    }

    bus.write32(0xA480_0000, 0x3000);
    bus.write32(0xA480_0004, 0x1FC0_07C0);
    assert_eq!(bus.read32(0xA480_0018) & 1, 1);
    bus.complete_due_dma();

    assert_eq!(bus.read8(0x8000_3003), 0x05);
    assert!(bus.mi.is_pending(interrupts::SI));
}

#[test]
fn test_si_dma_rdram_to_pif() {
    let mut bus = Bus::new();
    bus.write32(0x8000_3000, 0xFF01_0401);

    bus.write32(0xA480_0000, 0x3000);
    bus.write32(0xA480_0010, 0x1FC0_07C0);
    bus.complete_due_dma();

    assert_eq!(bus.pif.ram()[..4], [0xFF, 0x01, 0x04, 0x01]);
}

#[test]
fn test_ai_dma_produces_samples() {
    let mut bus = Bus::new();
    bus.write32(0x8000_5000, 0x0001_FFFF);
    bus.write32(0x8000_5004, 0x7FFF_8000);

    bus.write32(0xA450_0000, 0x5000);
    bus.write32(0xA450_0004, 8);
    assert_ne!(bus.read32(0xA450_000C) & (1 << 30), 0);
    bus.complete_due_dma();

    assert_eq!(bus.drain_audio_samples(), vec![1, -1, 32767, -32768]);
    assert!(bus.drain_audio_samples().is_empty());
    assert!(bus.mi.is_pending(interrupts::AI));
}

#[test]
fn test_feed_display_processor_from_rdram() {
    let mut bus = Bus::new();
    let mut rdp = DisplayProcessor::new(320, 240);

    // SYNC_FULL
    bus.write64(0x8000_6000, 0x2900_0000_0000_0000);
    bus.write32(0xA410_0000, 0x6000);
    bus.write32(0xA410_0004, 0x6008);

    assert_eq!(bus.feed_display_processor(&mut rdp), 1);
    assert_eq!(bus.feed_display_processor(&mut rdp), 0);
    assert_eq!(bus.read32(0xA410_0008), 0x6008);
}
