mod app;
mod config;
mod error;
mod seed;
mod store;

use std::fs::File;
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use simplelog::ConfigBuilder;
use simplelog::WriteLogger;

use crate::config::FileConfig;
use crate::config::Overrides;
use crate::config::Settings;
use crate::error::DemoError;
use crate::error::LoggingError;

#[derive(Parser)]
#[command(name = "comments-demo", about = "A nested comment thread in the terminal")]
struct Args {
    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file with the initial comments (defaults to built-in sample data)
    #[arg(long)]
    seed: Option<PathBuf>,
    /// Show moderation controls
    #[arg(long)]
    admin: bool,
    /// Gate posting on sign-in: `true` or `false`. Omit to leave posting open.
    #[arg(long)]
    logged_in: Option<bool>,
    /// Deepest level that still offers a reply
    #[arg(long)]
    max_depth: Option<usize>,
    /// Accent color as `#rrggbb`
    #[arg(long)]
    accent: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(settings: &Settings) -> Result<(), LoggingError> {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let file = File::create(&settings.log_file).map_err(|source| LoggingError::Open {
        path: settings.log_file.clone(),
        source,
    })?;
    WriteLogger::init(settings.log_level, log_config, file)?;
    Ok(())
}

fn main() -> Result<(), DemoError> {
    let args = Args::parse();
    let file = match &args.config {
        Some(path) => config::load_config(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(
        file,
        Overrides {
            max_depth: args.max_depth,
            admin: args.admin,
            accent: args.accent,
            logged_in: args.logged_in,
            log_level: args.log_level,
            log_file: args.log_file,
        },
    )?;
    if let Err(e) = init_logging(&settings) {
        eprintln!("logging disabled: {e}");
    }
    log::info!("comments demo starting: {settings:?}");

    let forest = match &args.seed {
        Some(path) => seed::load_seed(path)?,
        None => seed::sample_forest(Utc::now()),
    };
    app::run(settings, forest)
}
