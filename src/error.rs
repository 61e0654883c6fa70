use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures a mixing session can surface.
///
/// Input problems are fatal when the session opens; output problems are
/// reported when it closes and leave already-written data intact. There is
/// nothing transient here, so nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// An input sample file could not be opened or read.
    #[error("couldn't open input file {path}: {source}")]
    ResourceUnavailable { path: PathBuf, source: io::Error },

    /// The sink or stats stream could not be created, written, or flushed.
    #[error("output write failed: {0}")]
    Sink(#[from] io::Error),
}
