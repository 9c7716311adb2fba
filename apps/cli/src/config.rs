//! Runtime configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, a `.env`
//! file, the process environment and command-line flags.

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

const DATA_DIR_NAME: &str = "recall";
const DATABASE_FILE: &str = "collection.db";
const MEDIA_DIR: &str = "media";

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Directory holding the collection database and media folder
    #[arg(long, global = true, env = "RECALL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Timeout for each remote image download, in seconds
    #[arg(long, global = true, env = "RECALL_FETCH_TIMEOUT_SECS", default_value_t = 5)]
    pub fetch_timeout_secs: u64,

    /// User agent sent with image downloads
    #[arg(long, global = true, env = "RECALL_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Never download remote images; keep their URLs instead
    #[arg(long, global = true, env = "RECALL_OFFLINE")]
    pub offline: bool,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub offline: bool,
}

impl Config {
    pub fn from_args(args: ConfigArgs) -> Self {
        Self {
            data_dir: args.data_dir.unwrap_or_else(default_data_dir),
            fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
            user_agent: args.user_agent.unwrap_or_else(default_user_agent),
            offline: args.offline,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn media_dir(&self) -> PathBuf {
        self.data_dir.join(MEDIA_DIR)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

fn default_user_agent() -> String {
    format!("recall/{} (+reqwest)", env!("CARGO_PKG_VERSION"))
}
