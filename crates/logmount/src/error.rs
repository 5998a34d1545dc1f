// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

/// Errors surfaced by the log tree adapter.
///
/// The NotFound family (`PathNotFound`, `ItemNotFound`, `InvalidPath`) is an
/// expected outcome of browsing and is never logged as an error. Everything
/// else is a real failure of the request that produced it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The root location could not be resolved at startup
    #[error("Cannot set root to {location}: {reason}")]
    Init { location: String, reason: String },

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Repository path that would leave the root once unescaped
    #[error("Invalid repository path: {0}")]
    InvalidPath(String),

    /// Operation the read-only tree does not support
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("File system error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure of a content handle operation (size, stream, positional read)
    #[error("Content error at {}: {source}", path.display())]
    Content {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn init<S: Into<String>, R: ToString>(location: S, reason: R) -> Self {
        Error::Init {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn path_not_found<S: Into<String>>(path: S) -> Self {
        Error::PathNotFound(path.into())
    }

    pub fn item_not_found<S: Into<String>>(identifier: S) -> Self {
        Error::ItemNotFound(identifier.into())
    }

    pub fn invalid_path<S: Into<String>>(path: S) -> Self {
        Error::InvalidPath(path.into())
    }

    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn content<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Error::Content {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True for the expected "nothing there" outcomes.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PathNotFound(_) | Error::ItemNotFound(_) | Error::InvalidPath(_)
        )
    }

    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}
