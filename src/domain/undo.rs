use super::Label;
use std::collections::VecDeque;
use std::path::PathBuf;

/// History depth used when nothing else is configured
pub const DEFAULT_HISTORY_DEPTH: usize = 10;

/// One reversible action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    /// `item` was moved from `from` into `to`
    Classify {
        item: String,
        from: PathBuf,
        to: PathBuf,
        label: Label,
    },
    /// An item in the original folder was renamed from `old` to `new`
    Rename { old: String, new: String },
}

/// Fixed-capacity LIFO history.
///
/// Pushing onto a full log evicts the oldest entry, which is then gone for good.
#[derive(Debug, Clone)]
pub struct UndoLog {
    entries: VecDeque<UndoEntry>,
    capacity: usize,
}

impl UndoLog {
    /// Creates an empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, returning the evicted oldest entry if the log was full
    pub fn push(&mut self, entry: UndoEntry) -> Option<UndoEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Removes and returns the most recent entry
    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    pub fn last(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries oldest first
    pub fn iter(&self) -> impl Iterator<Item = &UndoEntry> {
        self.entries.iter()
    }
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}
