//! # Inkpad - A Rich-Text Editor
//!
//! A desktop rich-text editor whose document is kept under a configurable
//! ceiling of top-level nodes.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the editor
//! cargo run
//!
//! # Allow up to 20 top-level nodes
//! cargo run -- --ceiling 20
//!
//! # Keep snapshots somewhere else
//! cargo run -- --store-dir ./notes
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpad_core::Config;
use inkpad_ui::{Flags, run};

/// Inkpad - A rich-text editor built in Rust
#[derive(Parser, Debug)]
#[command(name = "inkpad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding saved documents
    #[arg(long, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Maximum number of top-level nodes
    #[arg(short, long, value_name = "N")]
    ceiling: Option<usize>,

    /// Config file to use instead of the default one
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Loads the config file and applies command line overrides.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load(),
        };

        if let Some(dir) = &self.store_dir {
            config.storage.dir = Some(dir.clone());
        }
        if let Some(ceiling) = self.ceiling {
            config.gate.ceiling = ceiling;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Inkpad v{}", env!("CARGO_PKG_VERSION"));

    let config = args.config()?;
    tracing::debug!("Node ceiling is {}", config.gate.ceiling);

    // Run the application
    run(Flags { config }).map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["inkpad"]);
        assert!(args.store_dir.is_none());
        assert!(args.ceiling.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gate]\nceiling = 3\n\n[storage]\nkey = \"notes\"\n").unwrap();

        let args = Args::parse_from([
            "inkpad",
            "--config",
            path.to_str().unwrap(),
            "--ceiling",
            "12",
            "--store-dir",
            "/tmp/inkpad-notes",
            "-vv",
        ]);
        let config = args.config().unwrap();
        assert_eq!(config.gate.ceiling, 12);
        assert_eq!(config.storage.key, "notes");
        assert_eq!(config.storage.dir, Some(PathBuf::from("/tmp/inkpad-notes")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["inkpad", "--config", "/nonexistent/inkpad.toml"]);
        assert!(args.config().is_err());
    }
}
