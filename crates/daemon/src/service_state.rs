use std::path::PathBuf;

use common::{Share, TreeError};

use crate::service_config::Config;

/// Main service state - everything the HTTP handlers share.
#[derive(Clone)]
pub struct State {
    share: Share,
    token: Option<String>,
    max_upload_bytes: usize,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Check the served root before handing it to the share, so a bad
        //    CLI argument reads as a setup error rather than a jail error.
        match tokio::fs::metadata(&config.root).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(StateSetupError::BadRoot(config.root.clone())),
        }

        // 2. Build the share around the jailed root
        let share = Share::new(&config.root, config.allow_delete).await?;
        tracing::info!(
            root = %share.root().display(),
            allow_delete = config.allow_delete,
            "serving directory"
        );
        if config.token.is_some() {
            tracing::info!("access token required on /api/v0");
        }

        Ok(Self {
            share,
            token: config.token.clone(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    pub fn share(&self) -> &Share {
        &self.share
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Served directory does not exist or is not a directory: {}", .0.display())]
    BadRoot(PathBuf),
    #[error("Share setup error: {0}")]
    Share(#[from] TreeError),
}
