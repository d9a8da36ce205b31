//! Resource loading.
//!
//! The [`Fetcher`] is the single seam between the renderers and the content
//! root. Callers always receive an `Option`: an absent value means "resource
//! not found, render a fallback", never a fatal error. The underlying cause
//! is logged and dropped.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::FetchError;

/// Loads JSON content descriptors relative to a content root.
#[derive(Debug, Clone)]
pub struct Fetcher {
    root: Utf8PathBuf,
}

impl Fetcher {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads and decodes a JSON resource.
    ///
    /// Any failure — missing file, I/O error, malformed body, shape
    /// mismatch — yields `None` after a diagnostic. There is no retry; a
    /// failed fetch is final for the render pass that issued it.
    pub fn json<T>(&self, path: impl AsRef<Utf8Path>) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let path = path.as_ref();
        match self.try_json(path) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Failed to fetch {path}: {err}");
                None
            }
        }
    }

    fn try_json<T>(&self, path: &Utf8Path) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let text = fs::read_to_string(self.root.join(path))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Whether a path string points at externally hosted media rather than a
/// file relative to the current content base.
pub fn is_external_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
