//! Machine and material defaults.
//!
//! All lengths are millimeters, speeds are millimeters per second.

/// Filament feed-stock diameter (mm)
pub const DEFAULT_FILAMENT_DIAMETER: f64 = 1.75;

/// Filament pulled back before a travel move (mm)
pub const DEFAULT_RETRACT_LENGTH: f64 = 0.5;

/// Non-printing travel speed (mm/s)
pub const DEFAULT_TRAVEL_SPEED: f64 = 200.0;

/// Linear motion command used for every generated move
pub const LINEAR_MOVE: &str = "G1";

/// Tolerance for position comparisons (mm)
pub const POSITION_EPSILON: f64 = 1e-9;
