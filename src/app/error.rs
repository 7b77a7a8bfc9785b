use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = FlattenError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("Failed to list directory under '{root}': {source}")]
    Listing {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid .gitignore at '{path}': {source}")]
    Gitignore {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move finished document into '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}
