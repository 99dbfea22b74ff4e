//! SeamKit Settings Crate
//!
//! Handles print profile configuration: defaults, validation, and JSON/TOML
//! persistence.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, GeometrySettings, LayerSettings, OutputSettings, PrintConfig,
    PrinterSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
