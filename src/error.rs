use std::io;
use std::path::PathBuf;

use goreflect_syntax::ParseFailure;
use thiserror::Error;

/// Failure that aborts an analysis run before any model is returned.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("walking {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {failure}", path.display())]
    Parse {
        path: PathBuf,
        /// One-based line of the first diagnostic.
        line: u32,
        #[source]
        failure: ParseFailure,
    },

    #[error("{}: missing package clause", path.display())]
    MissingPackageClause { path: PathBuf },

    #[error("invalid file manifest: {0}")]
    Manifest(#[from] toml::de::Error),
}
