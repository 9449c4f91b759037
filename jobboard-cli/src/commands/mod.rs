pub mod applications;
pub mod completion;
pub mod config;
pub mod jobs;
pub mod session;

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use frontend::{AppContext, JobBoardClient};
use serde::Serialize;
use shared::config::ClientConfig;
use tracing::debug;

use crate::logging;
use crate::storage::{FileStorage, session_path};

/// Loaded configuration plus a context whose session lives on disk.
#[derive(Debug)]
pub struct Session {
    pub config: ClientConfig,
    pub context: AppContext<JobBoardClient>,
    pub path: PathBuf,
}

impl Session {
    /// Loads configuration, installs logging and restores the stored session.
    ///
    /// # Errors
    /// Returns an error if the configuration or session file is invalid.
    pub fn open(config_path: Option<PathBuf>, api_url: Option<String>) -> Result<Self> {
        let config =
            ClientConfig::load_config(config_path, api_url).context("failed to load configuration")?;
        logging::init(&config.log_level);

        let path = session_path();
        let storage = FileStorage::open(&path)?;
        let context = AppContext::connect(&config, Rc::new(storage))
            .context("failed to create API client")?;
        debug!(api = %config.api_base_url, session = %path.display(), "session opened");

        Ok(Self {
            config,
            context,
            path,
        })
    }

    pub fn is_signed_in(&self) -> bool {
        self.context
            .store()
            .select(|state| state.auth.is_authenticated())
    }

    /// # Errors
    /// Returns an error when no session is stored.
    pub fn require_login(&self) -> Result<()> {
        if !self.is_signed_in() {
            bail!("not signed in; run `jobboard login` first");
        }
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}

/// Shortens `text` to `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
