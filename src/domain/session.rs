use super::{
    Counts, FolderLayout, Label, NavDirection, PendingQueue, Snapshot, UndoEntry, UndoLog,
};
use crate::error::{ApproveError, Result};
use std::fs;
use std::path::{is_separator, Path};
use tracing::{debug, info, warn};

/// A user intent coming from the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Classify(Label),
    Navigate(NavDirection),
    Rename(String),
    Undo,
}

/// Result payload for an intent: the state after the attempt plus any error.
/// On error the snapshot equals the state before the attempt.
#[derive(Debug)]
pub struct IntentOutcome {
    pub snapshot: Snapshot,
    pub error: Option<ApproveError>,
}

impl IntentOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Owns the pending queue, the cursor and the undo history for one folder,
/// and keeps them consistent with the files on disk.
#[derive(Debug)]
pub struct ReviewSession {
    layout: FolderLayout,
    queue: PendingQueue,
    history: UndoLog,
}

impl ReviewSession {
    /// Starts a session over `items`, which must all live directly in `layout.original`
    pub fn new(items: Vec<String>, layout: FolderLayout, history_depth: usize) -> Result<Self> {
        if items.is_empty() {
            return Err(ApproveError::NoImagesFound(layout.original));
        }

        let queue = PendingQueue::new(items);
        info!(
            folder = %layout.original.display(),
            items = queue.len(),
            history_depth,
            "review session started"
        );

        Ok(Self {
            layout,
            queue,
            history: UndoLog::new(history_depth),
        })
    }

    pub fn layout(&self) -> &FolderLayout {
        &self.layout
    }

    pub fn pending(&self) -> &[String] {
        self.queue.items()
    }

    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    pub fn current(&self) -> Option<&str> {
        self.queue.current()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.queue.cursor()
    }

    pub fn queue_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn at_first(&self) -> bool {
        self.queue.at_first()
    }

    pub fn at_last(&self) -> bool {
        self.queue.at_last()
    }

    pub fn undo_available(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn counts(&self) -> Counts {
        Counts::new(self.history.len(), self.queue.len())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current: self.current().map(str::to_string),
            cursor: self.cursor(),
            counts: self.counts(),
            queue_empty: self.queue_empty(),
            at_first: self.at_first(),
            at_last: self.at_last(),
            undo_available: self.undo_available(),
        }
    }

    /// Moves the cursor; boundary moves leave it where it is
    pub fn navigate(&mut self, direction: NavDirection) -> Snapshot {
        if self.queue.step(direction) {
            debug!(cursor = ?self.queue.cursor(), ?direction, "navigated");
        }
        self.snapshot()
    }

    /// Moves the current item into the folder for `label`.
    ///
    /// The undo entry is recorded only after the move succeeded, so a failed
    /// move leaves queue, cursor and history untouched.
    pub fn classify(&mut self, label: Label) -> Result<Snapshot> {
        let item = self
            .queue
            .current()
            .ok_or(ApproveError::NothingPending)?
            .to_string();
        let from = self.layout.original.clone();
        let to = self.layout.destination_for(label).to_path_buf();

        if let Err(e) = move_item(&item, &from, &to) {
            warn!(%item, %label, error = %e, "classify failed");
            return Err(e);
        }

        self.queue.remove_current();
        info!(%item, %label, remaining = self.queue.len(), "classified");
        self.record(UndoEntry::Classify {
            item,
            from,
            to,
            label,
        });

        Ok(self.snapshot())
    }

    /// Renames the current item in place, keeping its extension.
    ///
    /// Renaming to the current name is a no-op: nothing touches the disk and
    /// nothing is recorded.
    pub fn rename(&mut self, new_base_name: &str) -> Result<Snapshot> {
        let old = self
            .queue
            .current()
            .ok_or(ApproveError::NothingPending)?
            .to_string();

        let base = new_base_name.trim();
        validate_base_name(base)?;

        let candidate = format!("{}{}", base, extension_of(&old));
        if candidate == old {
            return Ok(self.snapshot());
        }

        if let Err(e) = rename_item(&self.layout.original, &old, &candidate) {
            warn!(%old, new = %candidate, error = %e, "rename failed");
            return Err(e);
        }

        self.queue.rename_current(candidate.clone());
        info!(%old, new = %candidate, "renamed");
        self.record(UndoEntry::Rename {
            old,
            new: candidate,
        });

        Ok(self.snapshot())
    }

    /// Reverts the most recent recorded action.
    ///
    /// Returns `Ok(None)` when there is nothing to undo. The entry is consumed
    /// even when reverting it fails; queue and cursor only change on success.
    ///
    /// A rename is undone whenever its new name is still pending. Only the
    /// name is checked, so after an earlier undo failed and was discarded, a
    /// different file that later took that name would be renamed back.
    pub fn undo(&mut self) -> Result<Option<UndoEntry>> {
        let Some(entry) = self.history.pop() else {
            return Ok(None);
        };

        let result = match &entry {
            UndoEntry::Classify { item, from, to, .. } => {
                move_item(item, to, from).map(|()| {
                    self.queue.push_back_and_select(item.clone());
                })
            }
            UndoEntry::Rename { old, new } => {
                if !self.queue.contains(new) {
                    Err(ApproveError::StaleRenameUndo(new.clone()))
                } else {
                    rename_item(&self.layout.original, new, old).map(|()| {
                        self.queue.replace(new, old.clone());
                    })
                }
            }
        };

        match result {
            Ok(()) => {
                info!(?entry, "undone");
                Ok(Some(entry))
            }
            Err(e) => {
                warn!(?entry, error = %e, "undo failed, entry discarded");
                Err(e)
            }
        }
    }

    /// Runs an intent and reports the resulting state alongside any error
    pub fn apply(&mut self, intent: Intent) -> IntentOutcome {
        let error = match intent {
            Intent::Classify(label) => self.classify(label).err(),
            Intent::Navigate(direction) => {
                self.navigate(direction);
                None
            }
            Intent::Rename(name) => self.rename(&name).err(),
            Intent::Undo => self.undo().err(),
        };

        IntentOutcome {
            snapshot: self.snapshot(),
            error,
        }
    }

    fn record(&mut self, entry: UndoEntry) {
        if let Some(evicted) = self.history.push(entry) {
            debug!(?evicted, "undo history full, oldest entry dropped");
        }
    }
}

/// `true` if anything (including a dangling symlink) occupies `path`
fn path_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Moves `item` from one folder into another without overwriting
fn move_item(item: &str, from_dir: &Path, to_dir: &Path) -> Result<()> {
    let source = from_dir.join(item);
    let target = to_dir.join(item);
    let failed = |reason: String| ApproveError::MoveFailed {
        item: item.to_string(),
        reason,
    };

    if !path_taken(&source) {
        return Err(failed(format!("{} not found", source.display())));
    }
    if path_taken(&target) {
        return Err(failed(format!("{} already exists", target.display())));
    }

    fs::rename(&source, &target).map_err(|e| failed(e.to_string()))
}

/// Renames `from` to `to` inside `dir` without overwriting
fn rename_item(dir: &Path, from: &str, to: &str) -> Result<()> {
    let target = dir.join(to);
    if path_taken(&target) {
        return Err(ApproveError::NameCollision(to.to_string()));
    }

    fs::rename(dir.join(from), &target).map_err(|e| ApproveError::RenameFailed {
        from: from.to_string(),
        to: to.to_string(),
        reason: e.to_string(),
    })
}

fn validate_base_name(base: &str) -> Result<()> {
    if base.is_empty() {
        return Err(ApproveError::EmptyName);
    }
    if base == "." || base == ".." || base.contains('\0') || base.chars().any(is_separator) {
        return Err(ApproveError::InvalidName(base.to_string()));
    }
    Ok(())
}

/// The extension of a file name including its dot, or "" when there is none.
/// A leading dot (hidden file) does not start an extension.
fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) if index > 0 => &name[index..],
        _ => "",
    }
}
