//! Scan Configuration
//!
//! Provides configuration options for the adaptive band scanner with a
//! builder pattern for ergonomic construction.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use framediff_scan::ScanConfig;
//!
//! // Using builder pattern
//! let config = ScanConfig::builder()
//!     .initial_band_height(64)
//!     .recapture_interval(Duration::from_millis(250))
//!     .build();
//!
//! // Using struct literal with defaults
//! let config = ScanConfig {
//!     max_update_area: 1 << 20,
//!     ..Default::default()
//! };
//! ```

use std::time::Duration;

/// Configuration for the adaptive band scanner
///
/// Use [`ScanConfig::builder()`] for ergonomic construction or struct
/// literal syntax with [`Default::default()`].
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Starting band height in rows (default: 32)
    ///
    /// The controller adjusts this between passes; the initial value only
    /// determines how fast the first passes converge.
    pub initial_band_height: u32,

    /// Lower clamp for the band height in rows (default: 4)
    pub min_band_height: u32,

    /// Bands-per-second rate below which the band height shrinks (default: 20.0)
    ///
    /// A smaller band means less work per tick, raising the achievable tick
    /// rate on slow captures.
    pub low_rate_threshold: f64,

    /// Bands-per-second rate above which the band height grows (default: 30.0)
    ///
    /// Together with the low threshold this forms a hysteresis dead zone;
    /// oscillation inside the zone is accepted by design of the controller.
    pub high_rate_threshold: f64,

    /// Wall-clock interval after which pixel data is re-captured mid-pass
    /// (default: 500 ms)
    ///
    /// Keeps fast pointer motion visible even while a long pass is running.
    pub recapture_interval: Duration,

    /// Combined changed+copied area above which copy hints are folded into
    /// changed (default: 0 = unlimited)
    pub max_update_area: u64,

    /// Cadence of the bundled async driver (default: 10 ms)
    ///
    /// Only used by [`ScanDriver`](crate::ScanDriver); callers driving
    /// [`ScanScheduler::tick`](crate::ScanScheduler::tick) themselves choose
    /// their own cadence.
    pub tick_interval: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            initial_band_height: 32,
            min_band_height: 4,
            low_rate_threshold: 20.0,
            high_rate_threshold: 30.0,
            recapture_interval: Duration::from_millis(500),
            max_update_area: 0,
            tick_interval: Duration::from_millis(10),
        }
    }
}

impl ScanConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Validate configuration and return any issues
    ///
    /// Returns `Ok(())` if configuration is valid, or a list of issues.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        if self.min_band_height == 0 {
            issues.push("min_band_height must be at least 1".to_string());
        }

        if self.initial_band_height < self.min_band_height {
            issues.push("initial_band_height must be >= min_band_height".to_string());
        }

        if self.low_rate_threshold <= 0.0 {
            issues.push("low_rate_threshold must be positive".to_string());
        }

        if self.high_rate_threshold <= self.low_rate_threshold {
            issues.push("high_rate_threshold must exceed low_rate_threshold".to_string());
        }

        if self.recapture_interval.is_zero() {
            issues.push("recapture_interval must be non-zero".to_string());
        }

        if self.tick_interval.is_zero() {
            issues.push("tick_interval must be non-zero".to_string());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Builder for [`ScanConfig`]
///
/// Provides a fluent interface for constructing configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    initial_band_height: Option<u32>,
    min_band_height: Option<u32>,
    low_rate_threshold: Option<f64>,
    high_rate_threshold: Option<f64>,
    recapture_interval: Option<Duration>,
    max_update_area: Option<u64>,
    tick_interval: Option<Duration>,
}

impl ScanConfigBuilder {
    /// Set the starting band height in rows
    #[must_use]
    pub fn initial_band_height(mut self, rows: u32) -> Self {
        self.initial_band_height = Some(rows);
        self
    }

    /// Set the lower band height clamp
    #[must_use]
    pub fn min_band_height(mut self, rows: u32) -> Self {
        self.min_band_height = Some(rows);
        self
    }

    /// Set the rate below which the band height shrinks
    #[must_use]
    pub fn low_rate_threshold(mut self, bands_per_second: f64) -> Self {
        self.low_rate_threshold = Some(bands_per_second);
        self
    }

    /// Set the rate above which the band height grows
    #[must_use]
    pub fn high_rate_threshold(mut self, bands_per_second: f64) -> Self {
        self.high_rate_threshold = Some(bands_per_second);
        self
    }

    /// Set the mid-pass recapture interval
    #[must_use]
    pub fn recapture_interval(mut self, interval: Duration) -> Self {
        self.recapture_interval = Some(interval);
        self
    }

    /// Set the area above which copy hints are folded into changed
    #[must_use]
    pub fn max_update_area(mut self, pixels: u64) -> Self {
        self.max_update_area = Some(pixels);
        self
    }

    /// Set the bundled driver's tick cadence
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = Some(interval);
        self
    }

    /// Build the configuration
    ///
    /// Returns a [`ScanConfig`] with builder values overriding defaults.
    #[must_use]
    pub fn build(self) -> ScanConfig {
        let defaults = ScanConfig::default();

        ScanConfig {
            initial_band_height: self
                .initial_band_height
                .unwrap_or(defaults.initial_band_height),
            min_band_height: self.min_band_height.unwrap_or(defaults.min_band_height),
            low_rate_threshold: self
                .low_rate_threshold
                .unwrap_or(defaults.low_rate_threshold),
            high_rate_threshold: self
                .high_rate_threshold
                .unwrap_or(defaults.high_rate_threshold),
            recapture_interval: self
                .recapture_interval
                .unwrap_or(defaults.recapture_interval),
            max_update_area: self.max_update_area.unwrap_or(defaults.max_update_area),
            tick_interval: self.tick_interval.unwrap_or(defaults.tick_interval),
        }
    }
}
