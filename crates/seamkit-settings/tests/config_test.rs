use seamkit_core::FeedRateUnits;
use seamkit_settings::{ConfigError, PrintConfig, SettingsError};
use std::path::PathBuf;
use tempfile::TempDir;

fn custom_config() -> PrintConfig {
    let mut config = PrintConfig::default();
    config.geometry.ring_count = 6;
    config.geometry.center_x = 110.0;
    config.layers.seam_length_external = 25.0;
    config.layers.speed_units = FeedRateUnits::MmPerMin;
    config.layers.speed_internal = 2400.0;
    config.output.path = PathBuf::from("vase.gcode");
    config.output.precision = Some(3);
    config
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.json");

    let config = custom_config();
    config.save_to_file(&path).unwrap();
    let loaded = PrintConfig::load_from_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("profile.toml");

    let config = custom_config();
    config.save_to_file(&path).unwrap();
    assert!(path.exists());

    let loaded = PrintConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[geometry]\nring_count = 0\n").unwrap();

    let err = PrintConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::InvalidSetting { ref key, .. } if key == "geometry.ring_count"
    ));
}

#[test]
fn test_load_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("broken.json");
    std::fs::write(&json, "{ \"layers\": ").unwrap();
    assert!(matches!(
        PrintConfig::load_from_file(&json),
        Err(SettingsError::JsonError(_))
    ));

    let toml = dir.path().join("broken.toml");
    std::fs::write(&toml, "[layers\nlayer_height = ").unwrap();
    assert!(matches!(
        PrintConfig::load_from_file(&toml),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = PrintConfig::load_from_file(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}

#[test]
fn test_save_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.json");

    let mut config = PrintConfig::default();
    config.printer.filament_diameter = -1.75;
    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_unknown_extension_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.ini");
    std::fs::write(&path, "ring_count=4").unwrap();

    let err = PrintConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
}
