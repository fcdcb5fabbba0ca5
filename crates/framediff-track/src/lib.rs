//! # framediff-track
//!
//! Region algebra and snapshot-comparing update tracking for the
//! [framediff](https://github.com/framediff/framediff) workspace.
//!
//! This crate turns a stream of imprecise "something changed around here"
//! notifications into the minimal set of rectangles a remote-framebuffer
//! consumer actually needs to repaint:
//!
//! - [`Region`]: exact set algebra over non-overlapping rectangles
//! - [`UpdateTracker`]: accumulates changed regions and copy hints from
//!   arbitrary producers, keeping the two sets disjoint (changed wins)
//! - [`ComparingTracker`]: wraps an [`UpdateTracker`] and shrinks broad
//!   hints to the exact differing pixels by diffing live frame data against
//!   a retained snapshot
//!
//! # Architecture
//!
//! ```text
//!  producers                 accumulator               diff engine
//!  ─────────                 ───────────               ───────────
//!  band scanner  ──┐
//!  input hints   ──┼──▶  UpdateTracker          ComparingTracker
//!  client reqs   ──┘     changed / copied  ──▶  compare(live) ──▶ exact diff
//!                                               flush_update() ─▶ UpdateInfo
//! ```
//!
//! The intended cycle is hint, [`compare`](ComparingTracker::compare), then
//! [`flush_update`](ComparingTracker::flush_update); flushing without
//! comparing is still correct, just a superset.

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod comparing;
pub mod region;
pub mod tracker;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

pub use comparing::{CompareStats, ComparingTracker};
pub use region::Region;
pub use tracker::{TrackerStats, UpdateInfo, UpdateTracker};
