//! # SeamKit
//!
//! Concentric-ring toolpath generator for FDM printers. Each layer blends
//! its seam into the previous one: the nozzle ramps up over a short prefix
//! of the ring, prints the rest flat, then revisits the prefix while the
//! bead thins out to nothing, so no single point carries the layer change.
//!
//! ## Architecture
//!
//! 1. **seamkit-core** - Error taxonomy, machine defaults, feed-rate units
//! 2. **seamkit-toolpath** - Geometry, flow, layer building, G-code output
//! 3. **seamkit-settings** - Print profiles in JSON or TOML
//! 4. **seamkit** - CLI binary that ties profiles to the generator

pub use seamkit_core::{Error, FeedRateUnits, Result, ToolpathError};
pub use seamkit_settings::{
    default_config_path, GeometrySettings, LayerSettings, OutputSettings, PrintConfig,
    PrinterSettings, SettingsError,
};
pub use seamkit_toolpath::{
    ConcentricPrintGenerator, GcodeFormatter, GcodeProgram, LayerBuilder, LayerRequest,
    PrintParameters,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Honors `RUST_LOG`; without it the floor is INFO. `verbose` adds DEBUG on
/// top of whatever the environment asks for. Output goes to stderr so a
/// program written to stdout stays clean.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = log_filter(verbose, directives.as_deref());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Build the log filter from `RUST_LOG`-style directives.
///
/// INFO applies only when no directives are given.
fn log_filter(verbose: bool, directives: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default());

    if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

/// Translate a print profile into generator parameters, normalizing speeds
/// to mm/s.
pub fn print_parameters(config: &PrintConfig) -> PrintParameters {
    let printer = &config.printer;
    let geometry = &config.geometry;
    let layers = &config.layers;

    PrintParameters {
        center_x: geometry.center_x,
        center_y: geometry.center_y,
        base_radius: geometry.base_radius,
        ring_count: geometry.ring_count,
        vertex_count: geometry.vertex_count,
        angle_offset: geometry.angle_offset,
        line_width: layers.line_width,
        layer_height: layers.layer_height,
        figure_height: layers.figure_height,
        seam_length_internal: layers.seam_length_internal,
        seam_length_external: layers.seam_length_external,
        speed_first_layer: config.speed_mm_per_sec(layers.speed_first_layer),
        speed_internal: config.speed_mm_per_sec(layers.speed_internal),
        speed_external: config.speed_mm_per_sec(layers.speed_external),
        travel_speed: config.speed_mm_per_sec(printer.travel_speed),
        filament_diameter: printer.filament_diameter,
        retract_length: printer.retract_length,
        start_gcode: printer.start_gcode.clone(),
        after_first_layer_gcode: printer.after_first_layer_gcode.clone(),
        end_gcode: printer.end_gcode.clone(),
    }
}

/// Formatter honoring the profile's output precision
pub fn formatter(config: &PrintConfig) -> GcodeFormatter {
    match config.output.precision {
        Some(digits) => GcodeFormatter::with_precision(digits),
        None => GcodeFormatter::new(),
    }
}

/// Generate the program described by a profile
pub fn generate(config: &PrintConfig) -> Result<GcodeProgram> {
    ConcentricPrintGenerator::new(print_parameters(config)).generate()
}
