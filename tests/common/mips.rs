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

//! Hand assembler for the few VR4300 instructions the tests need

#![allow(dead_code)]

pub fn lui(rt: u32, imm: u16) -> u32 {
    0x3C00_0000 | rt << 16 | imm as u32
}

pub fn ori(rt: u32, rs: u32, imm: u16) -> u32 {
    0x3400_0000 | rs << 21 | rt << 16 | imm as u32
}

pub fn addiu(rt: u32, rs: u32, imm: i16) -> u32 {
    0x2400_0000 | rs << 21 | rt << 16 | imm as u16 as u32
}

pub fn sw(rt: u32, offset: i16, base: u32) -> u32 {
    0xAC00_0000 | base << 21 | rt << 16 | offset as u16 as u32
}

pub fn j(target: u32) -> u32 {
    0x0800_0000 | ((target >> 2) & 0x03FF_FFFF)
}

pub const NOP: u32 = 0;

/// `rt = value` as LUI + ORI
pub fn li(rt: u32, value: u32) -> [u32; 2] {
    [lui(rt, (value >> 16) as u16), ori(rt, rt, value as u16)]
}
