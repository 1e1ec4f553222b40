// Domain types for a review session: labels, folder layout and the state snapshots
// the presentation layer renders from.

pub mod discovery;
pub mod queue;
pub mod session;
pub mod undo;

pub use discovery::{discover_images, open_session, Discovery, DiscoveryOptions, SortBy};
pub use queue::PendingQueue;
pub use session::{Intent, IntentOutcome, ReviewSession};
pub use undo::{UndoEntry, UndoLog, DEFAULT_HISTORY_DEPTH};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the subfolder approved images are moved into
pub const APPROVED_DIR: &str = "approved";
/// Name of the subfolder disapproved images are moved into
pub const DISAPPROVED_DIR: &str = "disapproved";

/// The verdict given to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Approved,
    Disapproved,
}

impl Label {
    /// Name of the destination subfolder for this label
    pub fn folder_name(self) -> &'static str {
        match self {
            Label::Approved => APPROVED_DIR,
            Label::Disapproved => DISAPPROVED_DIR,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

/// The three folders a session works with. Fixed once a folder is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderLayout {
    pub original: PathBuf,
    pub approved: PathBuf,
    pub disapproved: PathBuf,
}

impl FolderLayout {
    /// Derives the layout for a root folder: `<root>/approved` and `<root>/disapproved`
    pub fn for_root(root: &Path) -> Self {
        Self {
            original: root.to_path_buf(),
            approved: root.join(APPROVED_DIR),
            disapproved: root.join(DISAPPROVED_DIR),
        }
    }

    pub fn destination_for(&self, label: Label) -> &Path {
        match label {
            Label::Approved => &self.approved,
            Label::Disapproved => &self.disapproved,
        }
    }

    /// Creates both destination folders if they are missing
    pub fn ensure_destinations(&self) -> io::Result<()> {
        fs::create_dir_all(&self.approved)?;
        fs::create_dir_all(&self.disapproved)?;
        Ok(())
    }
}

/// Progress counters.
///
/// `processed` is the undo history length, so once the history starts evicting
/// entries both `processed` and `total` describe a sliding window rather than
/// the whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub processed: usize,
    pub remaining: usize,
    pub total: usize,
}

impl Counts {
    pub fn new(processed: usize, remaining: usize) -> Self {
        Self {
            processed,
            remaining,
            total: processed + remaining,
        }
    }

    /// Fraction of the window already processed, in `0.0..=1.0`
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Everything the presentation layer needs to render one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub current: Option<String>,
    pub cursor: Option<usize>,
    pub counts: Counts,
    pub queue_empty: bool,
    pub at_first: bool,
    pub at_last: bool,
    pub undo_available: bool,
}
