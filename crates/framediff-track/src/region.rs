//! Region Set Algebra
//!
//! A [`Region`] is an arbitrary 2-D point set stored as non-overlapping
//! rectangles. It is the currency of the update pipeline: changed areas,
//! copy destinations, clip areas, and exact diff results are all regions.
//!
//! # Representation
//!
//! Rectangles are kept in canonical banded form: horizontal bands sorted by
//! top edge, each band holding x-sorted, merged, non-adjacent intervals, with
//! vertically adjacent bands coalesced when their interval sets match. Two
//! regions covering the same point set therefore always hold the identical
//! rectangle list, so derived `PartialEq` is point-set equality and
//! [`Region::rects`] ordering is deterministic.
//!
//! # Usage
//!
//! ```rust
//! use framediff_pixels::Rect;
//! use framediff_track::Region;
//!
//! let a = Region::from_rect(Rect::new(0, 0, 100, 100));
//! let b = Region::from_rect(Rect::new(50, 50, 150, 150));
//!
//! let union = a.union(&b);
//! assert_eq!(union.area(), 10_000 + 10_000 - 2_500); // overlap counted once
//! assert_eq!(union.intersect(&a), a);
//! assert!(a.subtract(&a).is_empty());
//! ```

use framediff_pixels::{Point, Rect};

/// Which points survive a band overlay of two regions
#[derive(Clone, Copy, PartialEq, Eq)]
enum Overlay {
    Union,
    Intersect,
    Subtract,
}

impl Overlay {
    const fn keep(self, in_a: bool, in_b: bool) -> bool {
        match self {
            Self::Union => in_a || in_b,
            Self::Intersect => in_a && in_b,
            Self::Subtract => in_a && !in_b,
        }
    }
}

/// A set of non-overlapping rectangles in canonical banded form
///
/// Value type: cheap to clone relative to pixel data, always safe to pass
/// by value between the tracker and flush paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    /// The empty region
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// A region covering a single rectangle
    ///
    /// A degenerate (zero-area) rectangle is not an error; it simply
    /// contributes no points.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        if rect.is_empty() {
            Self::new()
        } else {
            Self { rects: vec![rect] }
        }
    }

    /// Build a region from per-row pixel intervals
    ///
    /// `rows` must be in ascending `y` order, each paired with x-sorted,
    /// non-overlapping, non-adjacent `[x0, x1)` intervals. This is the bulk
    /// constructor the comparator uses for exact scanline diffs; adjacent
    /// rows with identical intervals coalesce into taller rectangles.
    #[must_use]
    pub fn from_row_intervals<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (i32, Vec<(i32, i32)>)>,
    {
        let mut rects: Vec<Rect> = Vec::new();
        let mut band_start = 0usize;
        let mut band_intervals: Vec<(i32, i32)> = Vec::new();
        let mut band_bottom = i32::MIN;

        for (y, intervals) in rows {
            if intervals.is_empty() {
                band_intervals.clear();
                band_bottom = i32::MIN;
                continue;
            }
            if band_bottom == y && band_intervals == intervals {
                for rect in &mut rects[band_start..] {
                    rect.bottom = y + 1;
                }
            } else {
                band_start = rects.len();
                for &(x0, x1) in &intervals {
                    debug_assert!(x0 < x1, "malformed interval [{x0},{x1})");
                    rects.push(Rect::new(x0, y, x1, y + 1));
                }
                band_intervals = intervals;
            }
            band_bottom = y + 1;
        }
        Self { rects }
    }

    /// True if the region covers no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The member rectangles, band-ordered (top edge, then left edge)
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Number of member rectangles
    #[must_use]
    pub fn num_rects(&self) -> usize {
        self.rects.len()
    }

    /// Total covered area in pixels
    #[must_use]
    pub fn area(&self) -> u64 {
        self.rects.iter().map(Rect::area).sum()
    }

    /// The smallest rectangle enclosing the region (empty if the region is)
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        self.rects
            .iter()
            .fold(Rect::empty(), |acc, r| acc.union_bounding(r))
    }

    /// True if the point lies inside the region
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        self.rects.iter().any(|r| r.contains(p))
    }

    /// Set union
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            rects: overlay(&self.rects, &other.rects, Overlay::Union),
        }
    }

    /// Set intersection
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            rects: overlay(&self.rects, &other.rects, Overlay::Intersect),
        }
    }

    /// Set difference: `self` minus `other`
    #[must_use]
    pub fn subtract(&self, other: &Self) -> Self {
        Self {
            rects: overlay(&self.rects, &other.rects, Overlay::Subtract),
        }
    }

    /// The region shifted by `delta`
    #[must_use]
    pub fn translate(&self, delta: Point) -> Self {
        Self {
            rects: self.rects.iter().map(|r| r.translate(delta)).collect(),
        }
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

/// Band-sweep boolean combination of two rectangle lists
///
/// Splits the y axis at every edge of either operand, combines the merged
/// x-interval sets of each band, and coalesces vertically adjacent bands
/// with identical intervals. The output is canonical whenever the member
/// rectangles of each operand are non-overlapping, which both operands
/// guarantee by construction.
fn overlay(a: &[Rect], b: &[Rect], op: Overlay) -> Vec<Rect> {
    let mut ys: Vec<i32> = Vec::with_capacity((a.len() + b.len()) * 2);
    for r in a.iter().chain(b) {
        if !r.is_empty() {
            ys.push(r.top);
            ys.push(r.bottom);
        }
    }
    ys.sort_unstable();
    ys.dedup();

    let mut out: Vec<Rect> = Vec::new();
    let mut band_start = 0usize;
    let mut band_intervals: Vec<(i32, i32)> = Vec::new();
    let mut band_bottom = i32::MIN;

    for pair in ys.windows(2) {
        let (y0, y1) = (pair[0], pair[1]);
        let in_a = band_intervals_of(a, y0, y1);
        let in_b = band_intervals_of(b, y0, y1);
        let combined = combine_intervals(&in_a, &in_b, op);

        if combined.is_empty() {
            band_intervals.clear();
            band_bottom = i32::MIN;
            continue;
        }
        if band_bottom == y0 && band_intervals == combined {
            for rect in &mut out[band_start..] {
                rect.bottom = y1;
            }
        } else {
            band_start = out.len();
            for &(x0, x1) in &combined {
                out.push(Rect::new(x0, y0, x1, y1));
            }
            band_intervals = combined;
        }
        band_bottom = y1;
    }
    out
}

/// Merged x-intervals of the rectangles spanning the band `[y0, y1)`
fn band_intervals_of(rects: &[Rect], y0: i32, y1: i32) -> Vec<(i32, i32)> {
    let mut intervals: Vec<(i32, i32)> = rects
        .iter()
        .filter(|r| !r.is_empty() && r.top <= y0 && r.bottom >= y1)
        .map(|r| (r.left, r.right))
        .collect();
    intervals.sort_unstable();

    let mut merged: Vec<(i32, i32)> = Vec::with_capacity(intervals.len());
    for (x0, x1) in intervals {
        match merged.last_mut() {
            Some(last) if x0 <= last.1 => last.1 = last.1.max(x1),
            _ => merged.push((x0, x1)),
        }
    }
    merged
}

/// Boolean combination of two merged interval lists
fn combine_intervals(a: &[(i32, i32)], b: &[(i32, i32)], op: Overlay) -> Vec<(i32, i32)> {
    let mut xs: Vec<i32> = a
        .iter()
        .chain(b)
        .flat_map(|&(x0, x1)| [x0, x1])
        .collect();
    xs.sort_unstable();
    xs.dedup();

    let inside = |iv: &[(i32, i32)], x: i32| iv.iter().any(|&(x0, x1)| x0 <= x && x < x1);

    let mut out: Vec<(i32, i32)> = Vec::new();
    for pair in xs.windows(2) {
        let (x0, x1) = (pair[0], pair[1]);
        if op.keep(inside(a, x0), inside(b, x0)) {
            match out.last_mut() {
                Some(last) if last.1 == x0 => last.1 = x1,
                _ => out.push((x0, x1)),
            }
        }
    }
    out
}
