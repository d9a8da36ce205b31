use thiserror::Error;

/// Errors surfaced by [`crate::Site::build`].
///
/// Content-level failures never show up here: a descriptor that cannot be
/// loaded or decoded is recovered inside the renderers and replaced by a
/// fallback fragment. Only filesystem problems around the output directory
/// are fatal to a build.
#[derive(Debug, Error)]
pub enum VitrineError {
    #[error("Error while clearing the dist directory:\n{0}")]
    Clear(std::io::Error),

    #[error("Error while writing the rendered pages:\n{0}")]
    Write(std::io::Error),
}

/// A single resource fetch failure, recovered locally by the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Couldn't read the resource.\n{0}")]
    Io(#[from] std::io::Error),

    #[error("Couldn't decode the resource.\n{0}")]
    Decode(#[from] serde_json::Error),
}
