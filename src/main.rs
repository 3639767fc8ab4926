//! gitdeck - Multi-panel terminal workspace for a git repository
//!
//! Run with `gitdeck` or `gitdeck --help` for usage.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gitdeck::{APP_NAME, Config, VERSION, tui::App};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "A multi-panel terminal UI for driving a git repository")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run as if started in this directory
    #[arg(short = 'C', value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive TUI (default)
    Tui,

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Use info level for our crate, warn for dependencies
        EnvFilter::new("info")
            .add_directive("gix=warn".parse()?)
            .add_directive("tokio=warn".parse()?)
    };

    if let Some(path) = log_file {
        // Log to file when running TUI (so logs don't interfere with display)
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false).with_ansi(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let debug = cli.debug || config.debug;

    match cli.command {
        None | Some(Commands::Tui) => {
            let log_file = config.log_file_path();
            setup_logging(debug, Some(&log_file))?;

            info!("Starting gitdeck TUI v{}", VERSION);

            let dir = match cli.directory {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };

            let mut app = App::new(config, &dir);
            app.run().await?;
        }

        Some(Commands::Config { init }) => {
            setup_logging(debug, None)?;

            if init {
                let path = match cli.config.as_deref() {
                    Some(path) => {
                        config.save_to(path)?;
                        path.to_path_buf()
                    }
                    None => config.save()?,
                };
                println!("Configuration initialized at {:?}", path);
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
                let path = match cli.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                println!("\nConfig file: {:?}", path);
                println!("Log file: {:?}", config.log_file_path());
            }
        }
    }

    Ok(())
}
