//! Feed rate unit conversion
//!
//! Print profiles express speeds in mm/s while the motion protocol
//! expects the `F` word in mm/min.

use serde::{Deserialize, Serialize};

/// Feed rate units selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedRateUnits {
    /// Millimeters per minute
    MmPerMin,
    /// Millimeters per second
    #[default]
    MmPerSec,
}

/// Convert a speed in the given units to the mm/min used by the `F` word
pub fn to_mm_per_min(value: f64, units: FeedRateUnits) -> f64 {
    match units {
        FeedRateUnits::MmPerMin => value,
        FeedRateUnits::MmPerSec => value * 60.0,
    }
}

/// Convert a speed in the given units to mm/s
pub fn to_mm_per_sec(value: f64, units: FeedRateUnits) -> f64 {
    match units {
        FeedRateUnits::MmPerMin => value / 60.0,
        FeedRateUnits::MmPerSec => value,
    }
}
