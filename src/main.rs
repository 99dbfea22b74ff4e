use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use seamkit::{default_config_path, init_logging, PrintConfig, BUILD_DATE, VERSION};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Concentric-ring toolpath generator with gradual seam blending
#[derive(Parser, Debug)]
#[command(name = "seamkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the print and write it as G-code
    Generate {
        /// Print profile (.json or .toml); the user profile is used if present
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Output G-code file, or '-' for stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Number of concentric rings
        #[arg(long)]
        ring_count: Option<usize>,

        /// Layer height in mm
        #[arg(long)]
        layer_height: Option<f64>,

        /// Figure height in mm
        #[arg(long)]
        figure_height: Option<f64>,

        /// Seam blend length in mm for every ring
        #[arg(long)]
        seam_length: Option<f64>,
    },

    /// Write the default print profile
    InitConfig {
        /// Destination (.json or .toml); defaults to the user profile path
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    debug!("SeamKit {} (built {})", VERSION, BUILD_DATE);

    match cli.command {
        Commands::Generate {
            config,
            output,
            ring_count,
            layer_height,
            figure_height,
            seam_length,
        } => {
            let mut profile = load_profile(config.as_deref())?;

            if let Some(count) = ring_count {
                profile.geometry.ring_count = count;
            }
            if let Some(height) = layer_height {
                profile.layers.layer_height = height;
            }
            if let Some(height) = figure_height {
                profile.layers.figure_height = height;
            }
            if let Some(length) = seam_length {
                profile.layers.seam_length_internal = length;
                profile.layers.seam_length_external = length;
            }
            if let Some(path) = output {
                profile.output.path = path;
            }
            profile.validate().context("Invalid print settings")?;

            run_generate(&profile)
        }
        Commands::InitConfig { file, force } => {
            let path = match file {
                Some(path) => path,
                None => default_config_path().context("Cannot locate the user profile")?,
            };
            if path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            PrintConfig::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write profile {}", path.display()))?;
            info!("Wrote default profile to {}", path.display());
            Ok(())
        }
    }
}

fn load_profile(explicit: Option<&Path>) -> Result<PrintConfig> {
    if let Some(path) = explicit {
        return PrintConfig::load_from_file(path)
            .with_context(|| format!("Failed to load profile {}", path.display()));
    }

    match default_config_path() {
        Ok(path) if path.exists() => {
            info!("Using profile {}", path.display());
            PrintConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load profile {}", path.display()))
        }
        _ => Ok(PrintConfig::default()),
    }
}

fn run_generate(profile: &PrintConfig) -> Result<()> {
    let program = seamkit::generate(profile).context("Toolpath generation failed")?;
    let formatter = seamkit::formatter(profile);
    let path = &profile.output.path;

    if path.as_os_str() == "-" {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        program
            .write_to(&mut handle, &formatter)
            .context("Failed to write G-code to stdout")?;
        handle.flush()?;
    } else {
        program
            .save_to_file(path, &formatter)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    info!(
        "Generated {} lines, {:.1} mm of filament",
        program.len(),
        program.total_extrusion()
    );
    Ok(())
}
