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

//! Rasterization
//!
//! - `rectangle`: FILL_RECTANGLE and TEXTURE_RECTANGLE
//! - `triangle`: edge walking with shade, texture and depth coefficients
//! - `texture`: tile descriptors, TMEM loads and texel sampling
//! - `builder`: encodes triangle commands from screen-space vertices

mod builder;
mod rectangle;
mod texture;
mod triangle;

pub use builder::{TriangleBuilder, Vertex};
