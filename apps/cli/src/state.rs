//! Application state.

use crate::config::Config;
use crate::db::SqliteCollection;
use crate::fetch::HttpImageFetcher;
use crate::media::FsMediaStore;
use anyhow::Context;
use recall_core::Author;
use std::fs;

/// The authoring flow wired to this application's host adapters.
pub type CliAuthor = Author<SqliteCollection, FsMediaStore, HttpImageFetcher>;

/// Everything a command needs.
pub struct AppState {
    pub config: Config,
    pub author: CliAuthor,
}

impl AppState {
    pub fn new(
        config: Config,
        collection: SqliteCollection,
        media: FsMediaStore,
        fetcher: HttpImageFetcher,
    ) -> Self {
        Self {
            config,
            author: Author::new(collection, media, fetcher),
        }
    }

    /// Open the collection and media folder under the configured data
    /// directory, creating them on first use.
    pub fn open(config: Config) -> anyhow::Result<Self> {
        fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;

        let db_path = config.database_path();
        let collection = SqliteCollection::open(&db_path)
            .with_context(|| format!("failed to open collection {}", db_path.display()))?;
        let media = FsMediaStore::open(config.media_dir())
            .with_context(|| format!("failed to open media folder {}", config.media_dir().display()))?;
        let fetcher = if config.offline {
            HttpImageFetcher::offline()
        } else {
            HttpImageFetcher::new(config.fetch_timeout, config.user_agent.clone())?
        };

        tracing::debug!(
            data_dir = %config.data_dir.display(),
            offline = config.offline,
            "opened collection"
        );
        Ok(Self::new(config, collection, media, fetcher))
    }

    pub fn collection(&self) -> &SqliteCollection {
        self.author.collection()
    }
}
