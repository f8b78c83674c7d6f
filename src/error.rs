use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that reject a whole visualisation request.
///
/// Problems with a single user or a single follower never surface here: a failed fetch is
/// recorded against the user and a bad timestamp skips one edge.
#[derive(Debug, Error)]
pub enum Error {
    /// The cutoff couldn't be read as a point in time.
    #[error("invalid timestamp format: `{input}`")]
    InvalidCutoff { input: String },
    /// No user could be placed in the graph.
    #[error("graph has no nodes or edges")]
    EmptyGraph,
    #[error("failed to read snapshot {}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
