//! Error types shared by the review session, discovery and configuration

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApproveError {
    /// Discovery found nothing to review; no session is created
    #[error("No valid image files found in {}", .0.display())]
    NoImagesFound(PathBuf),

    /// A classify (or the undo of one) could not relocate the file
    #[error("Could not move {item}: {reason}")]
    MoveFailed { item: String, reason: String },

    #[error("Could not rename {from} to {to}: {reason}")]
    RenameFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error("A file named {0} already exists")]
    NameCollision(String),

    #[error("New name must not be empty")]
    EmptyName,

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("No images pending")]
    NothingPending,

    /// The renamed item is no longer pending, so the rename cannot be reverted
    #[error("Cannot undo rename: {0} is no longer pending")]
    StaleRenameUndo(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, ApproveError>;
