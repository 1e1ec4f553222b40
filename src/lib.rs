//! ApproveIT - sort a folder of images into `approved/` and `disapproved/`
//!
//! The review session in [`domain`] owns the pending queue, the cursor and a
//! bounded undo history, and moves files on disk as the user decides. The
//! [`tui`] module renders session snapshots and turns key presses into intents.

pub mod async_preview;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod file_opener;
pub mod logging;
pub mod preview;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    discover_images, open_session, Counts, DiscoveryOptions, FolderLayout, Intent, IntentOutcome,
    Label, NavDirection, ReviewSession, Snapshot, SortBy, UndoEntry,
};
pub use error::{ApproveError, Result};
pub use file_opener::open_file;
