//! Synthetic Scan Loop Example
//!
//! This example runs the async scan driver against an in-memory frame
//! source and prints what the sink receives, including the initial
//! full-screen update and the stats the driver publishes.
//!
//! # Running
//!
//! ```bash
//! cargo run --example synthetic
//! ```

use std::time::Duration;

use framediff_pixels::{FrameView, PixelFormat};
use framediff_scan::{MemoryFrameSource, ScanConfig, ScanDriver, UpdateSink};
use framediff_track::UpdateInfo;

/// Prints each delivered update.
struct Printer;

impl UpdateSink for Printer {
    fn handle_update(&mut self, info: &UpdateInfo, _frame: &dyn FrameView) {
        println!(
            "update: {} pixels in {} rects",
            info.changed.area(),
            info.changed.num_rects()
        );
    }

    fn handle_mode_change(&mut self, width: u32, height: u32, _format: &PixelFormat) {
        println!("mode change: {width}x{height}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("framediff-scan Synthetic Example");
    println!("================================");

    let source = MemoryFrameSource::new(640, 480, PixelFormat::xrgb8888());

    let config = ScanConfig::builder()
        .initial_band_height(32)
        .tick_interval(Duration::from_millis(5))
        .recapture_interval(Duration::from_millis(250))
        .build();

    let driver = ScanDriver::new(config, source, Printer)?;
    let stats = driver.stats_handle();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let task = tokio::spawn(driver.run(shutdown_rx));

    // Let the driver scan for a while, peeking at the live stats.
    tokio::time::sleep(Duration::from_millis(250)).await;
    println!("mid-run: {} ticks so far", stats.lock().ticks);

    tokio::time::sleep(Duration::from_millis(250)).await;
    let _ = shutdown_tx.send(true);
    let final_stats = task.await?;

    println!("\nFinal stats:");
    println!("  ticks:        {}", final_stats.ticks);
    println!("  passes:       {}", final_stats.passes);
    println!("  updates sent: {}", final_stats.updates_sent);
    println!("  band height:  {}", final_stats.band_height);
    println!("  rate:         {:.1} bands/s", final_stats.bands_per_second);
    Ok(())
}
