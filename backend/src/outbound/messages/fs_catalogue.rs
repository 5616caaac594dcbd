//! Filesystem message catalogue.
//!
//! Bundles live at `{dir}/{locale}.json` and are read on every call, so
//! edits to a bundle show up on the next request without a restart.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::error;

use crate::domain::ports::{MessageCatalogue, MessageCatalogueError};
use crate::domain::{Locale, MessageBundle};

/// Reads `{locale}.json` bundles from one directory.
#[derive(Debug, Clone)]
pub struct FsMessageCatalogue {
    dir: PathBuf,
}

impl FsMessageCatalogue {
    /// Catalogue over `dir`; the directory is not checked until a load.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the bundles are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn bundle_path(&self, locale: &Locale) -> PathBuf {
        self.dir.join(format!("{locale}.json"))
    }
}

#[async_trait]
impl MessageCatalogue for FsMessageCatalogue {
    async fn load(&self, locale: &Locale) -> Result<MessageBundle, MessageCatalogueError> {
        let path = self.bundle_path(locale);
        let code: &str = locale.as_ref();
        let raw = tokio::fs::read_to_string(&path).await.map_err(|err| {
            error!(path = %path.display(), error = %err, "message bundle read failed");
            match err.kind() {
                ErrorKind::NotFound => MessageCatalogueError::missing(code),
                _ => MessageCatalogueError::unreadable(code, err.to_string()),
            }
        })?;
        let document: Value = serde_json::from_str(&raw)
            .map_err(|err| MessageCatalogueError::malformed(code, err.to_string()))?;
        MessageBundle::from_json(document)
            .map_err(|err| MessageCatalogueError::malformed(code, err.to_string()))
    }
}
