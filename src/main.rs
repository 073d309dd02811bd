// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand, ValueEnum};
use shutter::backends::camera::CameraFacing;
use shutter::constants::{TimerSetting, app_info};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "shutter")]
#[command(about = "Countdown-timer camera")]
#[command(version = app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/shutter/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Camera selection on the command line
#[derive(Clone, Copy, ValueEnum)]
enum Facing {
    Back,
    Front,
}

impl From<Facing> for CameraFacing {
    fn from(facing: Facing) -> Self {
        match facing {
            Facing::Back => CameraFacing::Back,
            Facing::Front => CameraFacing::Front,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive capture screen in the terminal (default)
    Terminal,

    /// List the self-timer presets
    Timers,

    /// Take a photo
    Photo {
        /// Self-timer in seconds (0, 3, 5 or 10)
        #[arg(short, long, default_value = "0", value_parser = parse_timer)]
        timer: TimerSetting,

        /// Camera to use
        #[arg(short, long, value_enum)]
        facing: Option<Facing>,

        /// Fire the flash
        #[arg(long)]
        flash: bool,

        /// Zoom level between 0.0 and 1.0
        #[arg(short, long)]
        zoom: Option<f32>,

        /// Still image used as the camera scene instead of the test pattern
        #[arg(long)]
        scene: Option<PathBuf>,

        /// Keep the capture in the cache instead of adding it to the library
        #[arg(long)]
        no_save: bool,
    },

    /// Record a video
    Video {
        /// Recording duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,

        /// Camera to use
        #[arg(short, long, value_enum)]
        facing: Option<Facing>,

        /// Keep the recording in the cache instead of adding it to the library
        #[arg(long)]
        no_save: bool,
    },
}

fn parse_timer(value: &str) -> Result<TimerSetting, String> {
    let seconds: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    TimerSetting::from_seconds(seconds).ok_or_else(|| {
        let presets: Vec<String> = TimerSetting::ALL
            .iter()
            .map(|t| t.seconds().to_string())
            .collect();
        format!("timer must be one of {}", presets.join(", "))
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=shutter=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(version = app_info::version(), "Starting shutter");
    let config = match &cli.config {
        Some(path) => shutter::Config::load_from(path)?,
        None => shutter::Config::load()?,
    };

    match cli.command {
        Some(Commands::Terminal) | None => shutter::terminal::run(config),
        Some(Commands::Timers) => {
            cli::list_timers(&config);
            Ok(())
        }
        Some(Commands::Photo {
            timer,
            facing,
            flash,
            zoom,
            scene,
            no_save,
        }) => cli::take_photo(
            config,
            cli::PhotoOptions {
                timer,
                facing: facing.map(Into::into),
                flash,
                zoom,
                scene,
                save: !no_save,
            },
        ),
        Some(Commands::Video {
            duration,
            facing,
            no_save,
        }) => cli::record_video(config, duration, facing.map(Into::into), !no_save),
    }
}
