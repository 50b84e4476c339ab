//! iPoint CLI: replay landmark recordings through the tracking pipeline.
//!
//! Usage:
//!   ipoint replay <FRAMES>     Run a recorded landmark stream
//!   ipoint map [OPTIONS]       Evaluate the transfer function once
//!   ipoint config <ACTION>     Show, create, or edit the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ipoint_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "ipoint",
    about = "Hands-free pointer control from facial landmarks",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a landmark recording (JSONL) through the tracking pipeline
    Replay {
        /// Path to the frames file
        frames: PathBuf,

        /// Screen width in pixels (defaults to the configured screen)
        #[arg(long)]
        width: Option<u32>,

        /// Screen height in pixels (defaults to the configured screen)
        #[arg(long)]
        height: Option<u32>,

        /// Write pointer output to this JSONL file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Track the right eye only
        #[arg(long)]
        one_eye: bool,

        /// Override the blink threshold [0.05, 0.8]
        #[arg(long)]
        blink_threshold: Option<f32>,

        /// Pace frames by their timestamps and drop frames the worker
        /// cannot keep up with
        #[arg(long)]
        realtime: bool,

        /// Frames buffered between reader and worker
        #[arg(long, default_value = "4")]
        queue: usize,
    },

    /// Map one gaze sample to screen coordinates with the configured gains
    Map {
        /// Normalized gaze x [0, 1]
        #[arg(long)]
        x: f32,

        /// Normalized gaze y [0, 1]
        #[arg(long)]
        y: f32,

        /// Depth proxy [0, 1], 0 = closest
        #[arg(long, default_value = "0.0")]
        depth: f32,

        /// Screen width in pixels (defaults to the configured screen)
        #[arg(long)]
        width: Option<u32>,

        /// Screen height in pixels (defaults to the configured screen)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,

    /// Change one tracking setting and save
    Set {
        /// Setting name, e.g. blink_threshold
        key: String,

        /// New value
        value: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    ipoint_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            frames,
            width,
            height,
            output,
            one_eye,
            blink_threshold,
            realtime,
            queue,
        } => {
            commands::replay::run(
                &config,
                commands::replay::ReplayOptions {
                    frames,
                    width,
                    height,
                    output,
                    one_eye,
                    blink_threshold,
                    realtime,
                    queue,
                },
            )
            .await
        }
        Commands::Map {
            x,
            y,
            depth,
            width,
            height,
        } => commands::map::run(&config, x, y, depth, width, height),
        Commands::Config { action } => commands::config::run(config, action),
    }
}
