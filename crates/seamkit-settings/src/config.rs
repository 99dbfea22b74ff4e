//! Print profile configuration
//!
//! A profile is split into sections that mirror how the print is described:
//! the printer's material and motion limits, the ring geometry, the layer
//! stack, and where the program is written. Every section has defaults, so
//! a profile file only needs to name the values it changes.

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use seamkit_core::constants::{
    DEFAULT_FILAMENT_DIAMETER, DEFAULT_RETRACT_LENGTH, DEFAULT_TRAVEL_SPEED,
};
use seamkit_core::units::{self, FeedRateUnits};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "seamkit";
const PROFILE_FILE: &str = "profile.toml";

/// Printer and material settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterSettings {
    /// Filament diameter in mm
    pub filament_diameter: f64,
    /// Travel speed between rings
    pub travel_speed: f64,
    /// Filament pulled back before each travel, in mm
    pub retract_length: f64,
    /// Commands emitted before the first layer
    pub start_gcode: Vec<String>,
    /// Commands emitted once the first layer is done
    pub after_first_layer_gcode: Vec<String>,
    /// Commands emitted after the last layer
    pub end_gcode: Vec<String>,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            filament_diameter: DEFAULT_FILAMENT_DIAMETER,
            travel_speed: DEFAULT_TRAVEL_SPEED,
            retract_length: DEFAULT_RETRACT_LENGTH,
            start_gcode: vec![
                "START_PRINT BED_TEMP=80 EXTRUDER_TEMP=240".to_string(),
                "M83".to_string(),
                "M106 S40".to_string(),
            ],
            after_first_layer_gcode: vec!["M106 S128".to_string()],
            end_gcode: vec!["END_PRINT".to_string()],
        }
    }
}

/// Ring geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    pub center_x: f64,
    pub center_y: f64,
    /// Radius of the innermost ring in mm
    pub base_radius: f64,
    pub ring_count: usize,
    /// Vertices per ring polygon
    pub vertex_count: usize,
    /// Seam angle in degrees
    pub angle_offset: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            center_x: 90.0,
            center_y: 90.0,
            base_radius: 20.0,
            ring_count: 4,
            vertex_count: 200,
            angle_offset: -90.0,
        }
    }
}

/// Layer stack settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSettings {
    pub layer_height: f64,
    /// Bead width and ring spacing in mm
    pub line_width: f64,
    pub figure_height: f64,
    pub seam_length_internal: f64,
    pub seam_length_external: f64,
    pub speed_first_layer: f64,
    pub speed_internal: f64,
    pub speed_external: f64,
    /// Units for every speed in the profile, travel speed included
    pub speed_units: FeedRateUnits,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            layer_height: 0.3,
            line_width: 0.8,
            figure_height: 10.0,
            seam_length_internal: 60.0,
            seam_length_external: 60.0,
            speed_first_layer: 20.0,
            speed_internal: 50.0,
            speed_external: 50.0,
            speed_units: FeedRateUnits::MmPerSec,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Destination of the generated program
    pub path: PathBuf,
    /// Fixed number of decimals per word; shortest form when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("output.gcode"),
            precision: None,
        }
    }
}

/// Complete print profile
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    pub printer: PrinterSettings,
    pub geometry: GeometrySettings,
    pub layers: LayerSettings,
    pub output: OutputSettings,
}

impl PrintConfig {
    /// Create a profile with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a profile from a `.json` or `.toml` file and validate it
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded print profile from {}", path.display());
        Ok(config)
    }

    /// Save the profile as `.json` or `.toml`, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        info!("Saved print profile to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let printer = &self.printer;
        positive("printer.filament_diameter", printer.filament_diameter)?;
        positive("printer.travel_speed", printer.travel_speed)?;
        if !printer.retract_length.is_finite() || printer.retract_length < 0.0 {
            return Err(SettingsError::invalid(
                "printer.retract_length",
                "must be >= 0",
            ));
        }

        let geometry = &self.geometry;
        finite("geometry.center_x", geometry.center_x)?;
        finite("geometry.center_y", geometry.center_y)?;
        finite("geometry.angle_offset", geometry.angle_offset)?;
        positive("geometry.base_radius", geometry.base_radius)?;
        if geometry.ring_count == 0 {
            return Err(SettingsError::invalid("geometry.ring_count", "must be > 0"));
        }
        if geometry.vertex_count < 3 {
            return Err(SettingsError::invalid(
                "geometry.vertex_count",
                "must be at least 3",
            ));
        }

        let layers = &self.layers;
        positive("layers.layer_height", layers.layer_height)?;
        positive("layers.line_width", layers.line_width)?;
        positive("layers.figure_height", layers.figure_height)?;
        finite("layers.seam_length_internal", layers.seam_length_internal)?;
        finite("layers.seam_length_external", layers.seam_length_external)?;
        positive("layers.speed_first_layer", layers.speed_first_layer)?;
        positive("layers.speed_internal", layers.speed_internal)?;
        positive("layers.speed_external", layers.speed_external)?;

        if self.output.path.as_os_str().is_empty() {
            return Err(SettingsError::invalid("output.path", "must not be empty"));
        }

        Ok(())
    }

    /// Convert a profile speed to mm/s
    pub fn speed_mm_per_sec(&self, value: f64) -> f64 {
        units::to_mm_per_sec(value, self.layers.speed_units)
    }
}

/// Default location of the user's print profile
///
/// Falls back to the home directory on platforms without a config directory.
pub fn default_config_path() -> ConfigResult<PathBuf> {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| {
            ConfigError::UnsupportedPlatform(
                "no configuration or home directory available".to_string(),
            )
        })?;
    Ok(base.join(APP_DIR).join(PROFILE_FILE))
}

enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn finite(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be a finite number"))
    }
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, "must be > 0"))
    }
}
