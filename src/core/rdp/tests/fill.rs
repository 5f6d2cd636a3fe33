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

//! FILL_RECTANGLE, scissor and depth clears

use super::*;

#[test]
fn test_fill_rectangle_covers_half_open_box() {
    let mut rdp = processor();
    let summary = run(&mut rdp, &[set_fill_color(RED.to_rgba32()), fill_rect(10, 10, 20, 20)]);

    assert_eq!(summary.pixels, 100);
    assert_eq!(rdp.pixel(10, 10), RED);
    assert_eq!(rdp.pixel(19, 19), RED);
    assert_eq!(rdp.pixel(20, 19), Color::default());
    assert_eq!(rdp.pixel(9, 10), Color::default());
}

#[test]
fn test_fill_16bit_alternates_halves() {
    let mut rdp = DisplayProcessor::new(32, 32);
    let summary = run(
        &mut rdp,
        &[
            set_color_image(SIZE_16, 32, 0x1000),
            set_fill_color(0xF801_07C1),
            fill_rect(0, 0, 4, 1),
        ],
    );

    assert_eq!(summary.pixels, 4);
    assert_eq!(rdp.pixel(0, 0), RED);
    assert_eq!(rdp.pixel(1, 0), GREEN);
    assert_eq!(rdp.pixel(2, 0), RED);
    assert_eq!(rdp.pixel(3, 0), GREEN);
}

#[test]
fn test_fill_is_clipped_to_buffer() {
    let mut rdp = processor();
    let summary = run(&mut rdp, &[set_fill_color(RED.to_rgba32()), fill_rect(30, 30, 40, 40)]);
    assert_eq!(summary.pixels, 4);
}

#[test]
fn test_scissor_clips_fill() {
    let mut rdp = processor();
    let summary = run(
        &mut rdp,
        &[
            set_scissor(4, 4, 8, 6),
            set_fill_color(RED.to_rgba32()),
            fill_rect(0, 0, 32, 32),
        ],
    );

    assert_eq!(summary.pixels, 8);
    assert_eq!(rdp.pixel(4, 4), RED);
    assert_eq!(rdp.pixel(7, 5), RED);
    assert_eq!(rdp.pixel(8, 5), Color::default());
    assert_eq!(rdp.pixel(4, 6), Color::default());
}

#[test]
fn test_fill_to_depth_image_clears_depth() {
    let mut rdp = processor();
    let near = TriangleBuilder::new(
        Vertex::new(0.0, 0.0).with_depth(10.0),
        Vertex::new(16.0, 0.0).with_depth(10.0),
        Vertex::new(0.0, 16.0).with_depth(10.0),
    )
    .with_depth()
    .build();
    run(&mut rdp, &[set_prim_color(RED), set_z_image(0x8000)]);
    run(&mut rdp, &near);
    assert_eq!(rdp.depth_at(1, 1), 10 << 16);

    // Point the color image at the depth buffer, fill, then point it back
    let summary = run(
        &mut rdp,
        &[
            set_color_image(SIZE_16, 32, 0x8000),
            set_fill_color(0xFFFC_FFFC),
            fill_rect(0, 0, 32, 32),
            set_color_image(SIZE_32, 32, 0x1000),
        ],
    );

    assert!(summary.depth_cleared);
    assert_eq!(summary.pixels, 0);
    assert!(rdp.depth().iter().all(|&z| z == DEPTH_FAR));
    assert_eq!(rdp.pixel(1, 1), RED);
}

#[test]
fn test_plain_fill_leaves_depth_alone() {
    let mut rdp = processor();
    let summary = run(
        &mut rdp,
        &[set_z_image(0x8000), set_fill_color(RED.to_rgba32()), fill_rect(0, 0, 4, 4)],
    );
    assert!(!summary.depth_cleared);
    assert_eq!(summary.pixels, 16);
}
