mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use snapshelf_core::{config, PhotoStore, StoreConfig};
use tracing_subscriber::EnvFilter;

/// SnapShelf — capture photos into a local gallery
#[derive(Parser)]
#[command(name = "snapshelf", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage root directory (overrides the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Image directory name under the storage root
    #[arg(long, global = true)]
    dir: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored photos
    Ls {
        /// Print name/path/data records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Capture an image file into the gallery as JPEG
    Capture {
        /// Image to capture (any format the decoder understands)
        image: PathBuf,

        /// JPEG quality (0-100)
        #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(0..=100))]
        quality: u8,

        /// Resolve the capture through its web reference instead of the native path
        #[arg(long)]
        web: bool,
    },
    /// Store an already-encoded JPEG file verbatim
    Save {
        /// Path to the JPEG file
        file: PathBuf,
    },
    /// Print a stored photo as a data URI
    Show {
        /// Photo filename, e.g. 1718444400123.jpeg
        name: String,
    },
    /// Delete a stored photo
    Rm {
        /// Photo filename, e.g. 1718444400123.jpeg
        name: String,
    },
    /// Show the effective configuration
    Config,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let config = config::load_config_or_default(cli.config.as_deref())?
        .with_overrides(cli.root.clone(), cli.dir.clone())?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    tracing::debug!(root = %config.storage_root, dir = %config.image_dir, "effective config");
    let mut store = PhotoStore::open(&config)?;

    match cli.command {
        Commands::Ls { json } => commands::ls::run(&mut store, json)?,
        Commands::Capture {
            image,
            quality,
            web,
        } => commands::capture::run(&mut store, image, quality, web)?,
        Commands::Save { file } => commands::capture::save(&mut store, &file)?,
        Commands::Show { name } => commands::show::run(&mut store, &name)?,
        Commands::Rm { name } => commands::rm::run(&mut store, &name)?,
        Commands::Config => commands::config::run(&config, cli.config.as_deref())?,
    }

    Ok(())
}
