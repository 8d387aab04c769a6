//! Command-line options and the on-disk locations derived from them.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::{BaseDirs, ProjectDirs};

/// Fallback folder beneath the home directory when the platform has no
/// standard data location.
const DATA_DIR_NAME: &str = ".psalms-reader";
/// SQLite file holding the key-value table.
const DB_FILE_NAME: &str = "highlights.sqlite";
const LOG_DIR_NAME: &str = "logs";

#[derive(Parser, Debug, Default)]
#[command(name = "psalms-reader", version, about = "Read the Psalms and highlight verses")]
pub struct Cli {
    /// Highlight database (default: platform data directory).
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Corpus JSON to read instead of the bundled KJV excerpt (Psalms 1, 23,
    /// 24, 90, 100, 117, 121, 133 and 150). Point this at a full Psalter.
    #[arg(long, value_name = "PATH")]
    pub corpus: Option<PathBuf>,

    /// Directory for rolling log files.
    #[arg(long, value_name = "PATH")]
    pub log_dir: Option<PathBuf>,

    /// Keep highlights in memory only; nothing is written to disk.
    #[arg(long)]
    pub ephemeral: bool,
}

/// Where highlights live for this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreLocation,
    pub corpus: Option<PathBuf>,
    pub log_dir: PathBuf,
}

impl Config {
    /// Resolve CLI flags against the platform data directory.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        Ok(Self::resolve(cli, &data_dir()?))
    }

    /// Pure resolution step; explicit flags always win over `data_dir`.
    pub fn resolve(cli: Cli, data_dir: &Path) -> Self {
        let store = if cli.ephemeral {
            StoreLocation::Memory
        } else {
            StoreLocation::File(cli.database.unwrap_or_else(|| data_dir.join(DB_FILE_NAME)))
        };

        Self {
            store,
            corpus: cli.corpus,
            log_dir: cli.log_dir.unwrap_or_else(|| data_dir.join(LOG_DIR_NAME)),
        }
    }
}

/// Platform data directory, or `~/.psalms-reader` when there is none.
fn data_dir() -> Result<PathBuf> {
    if let Some(dirs) = ProjectDirs::from("org", "psalms", "psalms-reader") {
        return Ok(dirs.data_local_dir().to_path_buf());
    }
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
