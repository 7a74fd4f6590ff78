use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GomiError {
    #[error("too few arguments")]
    NoPaths,
    #[error("{}: no such file or directory", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to resolve absolute path of {}: {source}", .path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: path has no file name", .path.display())]
    NoFileName { path: PathBuf },
    #[error("failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: cannot be recorded in the inventory: {source}", .path.display())]
    Unrecordable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: relocation worker panicked", .path.display())]
    WorkerPanicked { path: PathBuf },
    #[error("inventory {} unavailable: {source}", .path.display())]
    InventoryIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("inventory {} is corrupt: {source}", .path.display())]
    InventoryDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode inventory {}: {source}", .path.display())]
    InventoryEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no deleted files found")]
    EmptyInventory,
    #[error("selection cancelled")]
    SelectionCancelled,
    #[error("invalid selection {index}: only {len} entries")]
    InvalidSelection { index: usize, len: usize },
    #[error("failed to read selection: {source}")]
    Prompt {
        #[source]
        source: io::Error,
    },
    #[error("{}", render_batch(.0))]
    Batch(Vec<GomiError>),
}

fn render_batch(failures: &[GomiError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, GomiError>;
