// src/overlay.rs - frame annotation: skeleton, pinch guides, volume bar
use image::{Rgba, RgbaImage};

use crate::control::VolumeDisplay;
use crate::engine::FrameOutput;
use crate::landmarks::{LandmarkSet, HAND_CONNECTIONS};

pub const SKELETON_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const PINCH_COLOR: Rgba<u8> = Rgba([255, 0, 255, 255]);
pub const BAR_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const MUTED_COLOR: Rgba<u8> = Rgba([128, 128, 128, 255]);

// Volume bar geometry, in overlay pixels.
const BAR_LEFT: i32 = 50;
const BAR_RIGHT: i32 = 85;
const BAR_TOP: i32 = 150;
const BAR_BOTTOM: i32 = 400;
const BAR_BORDER: i32 = 3;

/// Draw this frame's annotations onto an RGBA frame buffer.
///
/// Off-frame coordinates are clipped pixel by pixel, so a hand partially
/// outside the frame (a raised palm, a wide pinch) renders what fits.
pub fn annotate(img: &mut RgbaImage, hand: Option<&LandmarkSet>, output: &FrameOutput) {
    if let Some(hand) = hand {
        draw_skeleton(img, hand);
    }
    if let Some(pinch) = &output.pinch {
        let thumb = (pinch.thumb.x as i32, pinch.thumb.y as i32);
        let index = (pinch.index.x as i32, pinch.index.y as i32);
        let mid = pinch.midpoint();
        draw_line_thick(img, thumb, index, PINCH_COLOR);
        fill_circle(img, thumb, 10, PINCH_COLOR);
        fill_circle(img, index, 10, PINCH_COLOR);
        fill_circle(img, (mid.x as i32, mid.y as i32), 6, PINCH_COLOR);
    }
    draw_volume_bar(img, output.volume);
}

fn draw_skeleton(img: &mut RgbaImage, hand: &LandmarkSet) {
    for (a, b) in HAND_CONNECTIONS {
        let pa = hand.point(a);
        let pb = hand.point(b);
        draw_line(
            img,
            (pa.x as i32, pa.y as i32),
            (pb.x as i32, pb.y as i32),
            SKELETON_COLOR,
        );
    }
    for landmark in hand.iter() {
        let p = landmark.position;
        fill_circle(img, (p.x as i32, p.y as i32), 3, SKELETON_COLOR);
    }
}

fn draw_volume_bar(img: &mut RgbaImage, display: VolumeDisplay) {
    for i in 0..BAR_BORDER {
        rect_outline(
            img,
            BAR_LEFT - i,
            BAR_TOP - i,
            BAR_RIGHT + i,
            BAR_BOTTOM + i,
            BAR_COLOR,
        );
    }
    match display {
        VolumeDisplay::Level { bar_y, .. } => {
            let top = bar_y.clamp(BAR_TOP, BAR_BOTTOM);
            rect_filled(img, BAR_LEFT, top, BAR_RIGHT, BAR_BOTTOM, BAR_COLOR);
        }
        VolumeDisplay::Unavailable => {
            // Dimmed diagonal strike instead of a level: unavailable is
            // visually distinct from an empty bar.
            draw_line_thick(
                img,
                (BAR_LEFT, BAR_BOTTOM),
                (BAR_RIGHT, BAR_TOP),
                MUTED_COLOR,
            );
        }
    }
}

fn put_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham segment.
fn draw_line(img: &mut RgbaImage, from: (i32, i32), to: (i32, i32), color: Rgba<u8>) {
    let (mut x, mut y) = from;
    let (x1, y1) = to;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn draw_line_thick(img: &mut RgbaImage, from: (i32, i32), to: (i32, i32), color: Rgba<u8>) {
    for off in -1..=1 {
        draw_line(img, (from.0 + off, from.1), (to.0 + off, to.1), color);
        draw_line(img, (from.0, from.1 + off), (to.0, to.1 + off), color);
    }
}

fn fill_circle(img: &mut RgbaImage, center: (i32, i32), radius: i32, color: Rgba<u8>) {
    let (cx, cy) = center;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn rect_outline(img: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    for x in x0..=x1 {
        put_pixel(img, x, y0, color);
        put_pixel(img, x, y1, color);
    }
    for y in y0..=y1 {
        put_pixel(img, x0, y, color);
        put_pixel(img, x1, y, color);
    }
}

fn rect_filled(img: &mut RgbaImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            put_pixel(img, x, y, color);
        }
    }
}
