#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod error;
mod output;

pub mod content;
pub mod fetch;
pub mod gallery;
pub mod html;
pub mod journey;
pub mod markup;

use std::time::Instant;

use camino::Utf8PathBuf;
use console::style;

pub use crate::error::{FetchError, VitrineError};
pub use crate::fetch::Fetcher;
pub use crate::html::Element;
pub use crate::output::{Output, page_shell};

/// The site to be rendered: a content root holding the JSON descriptors and
/// a dist directory receiving the finished pages.
///
/// The individual settings can be set by calling [`Site::config`].
///
/// ```rust,no_run
/// use vitrine::Site;
///
/// let site = Site::config()
///     .content_root("portfolio")
///     .dist("dist")
///     .finish();
/// site.build().unwrap();
/// ```
#[derive(Debug)]
pub struct Site {
    root: Utf8PathBuf,
    dist: Utf8PathBuf,
}

impl Site {
    pub fn config() -> Config {
        Config::new()
    }

    /// Renders the gallery and journey pages and writes them to dist.
    ///
    /// Content-level failures never abort a build: a missing or malformed
    /// descriptor downgrades to a fallback fragment on the affected page.
    /// Only output directory I/O can fail here.
    pub fn build(&self) -> Result<(), VitrineError> {
        eprintln!(
            "Running {} in {} mode.",
            style("Vitrine").red(),
            style("build").blue()
        );

        let s = Instant::now();
        let fetcher = Fetcher::new(self.root.clone());

        let pages = [
            Output::html(
                "index",
                page_shell("Gallery", &gallery::render(&fetcher, gallery::SECTION_HOME)),
            ),
            Output::html("journey", page_shell("Journey", &journey::render(&fetcher))),
        ];

        output::clear_dist(&self.dist)?;
        output::save_pages(&pages, &self.dist)?;

        eprintln!("Rendered {} pages {}", pages.len(), output::as_overhead(s));

        Ok(())
    }
}

/// A builder struct for creating a [`Site`] with specified settings.
#[derive(Debug)]
pub struct Config {
    root: Utf8PathBuf,
    dist: Utf8PathBuf,
}

impl Config {
    fn new() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            dist: Utf8PathBuf::from("dist"),
        }
    }

    /// Sets the directory containing the `media/` content tree.
    pub fn content_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the output directory for rendered pages.
    pub fn dist(mut self, dist: impl Into<Utf8PathBuf>) -> Self {
        self.dist = dist.into();
        self
    }

    pub fn finish(self) -> Site {
        Site {
            root: self.root,
            dist: self.dist,
        }
    }
}

/// Initializes a `tracing` subscriber honoring `RUST_LOG`.
#[cfg(feature = "logging")]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}
