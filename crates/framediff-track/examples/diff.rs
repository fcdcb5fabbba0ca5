//! Exact Frame Diffing Example
//!
//! This example demonstrates the compare-then-flush cycle: a broad
//! full-screen hint is narrowed down to the exact rectangles that changed
//! between two frames.
//!
//! # Running
//!
//! ```bash
//! cargo run --example diff
//! ```

use framediff_pixels::{BorrowedFrame, PixelFormat, Rect};
use framediff_track::{ComparingTracker, Region};

fn paint(data: &mut [u8], width: u32, rect: Rect, pixel: u32) {
    let bytes = pixel.to_le_bytes();
    for y in rect.top..rect.bottom {
        for x in rect.left..rect.right {
            let at = ((y as u32 * width + x as u32) * 4) as usize;
            data[at..at + 4].copy_from_slice(&bytes);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("framediff-track Diff Example");
    println!("============================");

    const WIDTH: u32 = 640;
    const HEIGHT: u32 = 480;
    let format = PixelFormat::xrgb8888();
    let full_screen = Region::from_rect(Rect::from_size(0, 0, WIDTH, HEIGHT));

    let mut data = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
    let mut tracker = ComparingTracker::new();

    // Pass 1: no prior snapshot, so the whole screen comes back changed.
    tracker.add_changed(&full_screen);
    tracker.compare(&BorrowedFrame::new(&data, WIDTH, HEIGHT, WIDTH, format)?);
    let info = tracker.flush_update(&full_screen, 0);
    println!("\nInitial pass: {} changed pixels", info.changed.area());

    // Paint two small shapes and hint the full screen again.
    paint(&mut data, WIDTH, Rect::new(100, 100, 110, 110), 0x00FF_FFFF);
    paint(&mut data, WIDTH, Rect::new(300, 200, 364, 232), 0x0000_FF00);

    tracker.add_changed(&full_screen);
    tracker.compare(&BorrowedFrame::new(&data, WIDTH, HEIGHT, WIDTH, format)?);
    let info = tracker.flush_update(&full_screen, 0);

    println!("Second pass: {} changed pixels in {} rects:", info.changed.area(), info.changed.num_rects());
    for rect in info.changed.rects() {
        println!(
            "  ({}, {}) {}x{}",
            rect.left,
            rect.top,
            rect.width(),
            rect.height()
        );
    }

    // An unchanged frame diffs to nothing.
    tracker.add_changed(&full_screen);
    tracker.compare(&BorrowedFrame::new(&data, WIDTH, HEIGHT, WIDTH, format)?);
    let info = tracker.flush_update(&full_screen, 0);
    println!("Third pass: {} changed pixels", info.changed.area());

    Ok(())
}
