use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Placeholder path reported for reader/writer transfers.
pub const STREAM_PATH: &str = "<stream>";

/// Failure to move the whole buffer to or from storage.
#[derive(Debug, Error)]
pub enum BufferError {
    /// The source could not be opened or read in full.
    #[error("error while loading XML from {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The sink could not be opened or written in full.
    #[error("error while saving XML to {}", path.display())]
    WriteDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BufferError {
    /// The storage location the failed transfer targeted.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path, .. } | Self::WriteDenied { path, .. } => path,
        }
    }
}
