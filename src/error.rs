//! Crate-wide error type.
//!
//! The simulation itself never fails on well-formed values; errors only
//! come from precondition checks at construction time and from loading
//! level packs off disk.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("level pack {0} contains no levels")]
    EmptyPack(PathBuf),
}

pub type SimResult<T> = Result<T, SimError>;
