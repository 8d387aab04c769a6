//! Binary entry point: resolve configuration, start logging, open the
//! highlight store, load the corpus, and drive the Ratatui event loop until
//! the user exits.
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use psalms_reader::config::{Cli, Config, StoreLocation};
use psalms_reader::{logging, run_app, App, Corpus, HighlightStore, SqliteStore};

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    let _log_guard = logging::init(&config.log_dir);
    logging::panic_hook();

    let kv = match &config.store {
        StoreLocation::File(path) => {
            info!(path = %path.display(), "opening highlight store");
            SqliteStore::open(path)?
        }
        StoreLocation::Memory => {
            info!("using ephemeral highlight store");
            SqliteStore::open_in_memory()?
        }
    };

    let corpus = match &config.corpus {
        Some(path) => Corpus::from_path(path)
            .with_context(|| format!("failed to load corpus from {}", path.display()))?,
        None => Corpus::bundled().context("bundled corpus is invalid")?,
    };

    let mut app = App::new(HighlightStore::new(kv), corpus);
    run_app(&mut app)
}
