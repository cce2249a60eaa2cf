//! Fatal error type for `faxc-load`.
//!
//! Most diagnostics produced while loading a source file are non-fatal and
//! accumulate as [`crate::source::ErrorEntry`] records so that loading can
//! continue and report as much as possible in one pass. The two conditions
//! below instead abort the load immediately and surface as a `Result::Err`.

use thiserror::Error;

/// Fatal errors that abort [`crate::source::Source::load`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// A physical line exceeded the maximum line length.
    #[error("line {line} exceeds the maximum line length of {max} bytes")]
    LineTooLong { line: i32, max: usize },

    /// The input path could not be opened or read from.
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
