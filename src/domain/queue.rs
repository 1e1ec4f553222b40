use super::NavDirection;
use std::collections::HashSet;

/// Ordered list of pending item names with a cursor.
///
/// The cursor is `None` exactly when the queue is empty, and otherwise always
/// points at a valid index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingQueue {
    items: Vec<String>,
    cursor: Option<usize>,
}

impl PendingQueue {
    /// Builds a queue positioned on the first item. Repeated names keep their
    /// first occurrence only.
    pub fn new(mut items: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        items.retain(|item| seen.insert(item.clone()));
        let cursor = if items.is_empty() { None } else { Some(0) };
        Self { items, cursor }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current(&self) -> Option<&str> {
        self.cursor.map(|i| self.items[i].as_str())
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    /// True on the first item, and on an empty queue
    pub fn at_first(&self) -> bool {
        self.cursor.map_or(true, |i| i == 0)
    }

    /// True on the last item, and on an empty queue
    pub fn at_last(&self) -> bool {
        self.cursor.map_or(true, |i| i + 1 >= self.items.len())
    }

    /// Moves the cursor one step. Returns false when already at the boundary.
    pub fn step(&mut self, direction: NavDirection) -> bool {
        let Some(index) = self.cursor else {
            return false;
        };
        let next = match direction {
            NavDirection::Previous if index > 0 => index - 1,
            NavDirection::Next if index + 1 < self.items.len() => index + 1,
            _ => return false,
        };
        self.cursor = Some(next);
        true
    }

    /// Removes the item under the cursor, clamping the cursor afterwards
    pub fn remove_current(&mut self) -> Option<String> {
        let index = self.cursor?;
        let item = self.items.remove(index);
        self.cursor = if self.items.is_empty() {
            None
        } else {
            Some(index.min(self.items.len() - 1))
        };
        Some(item)
    }

    /// Appends an item and makes it current
    pub fn push_back_and_select(&mut self, item: String) {
        self.items.push(item);
        self.cursor = Some(self.items.len() - 1);
    }

    /// Replaces the item under the cursor, keeping its position
    pub fn rename_current(&mut self, new: String) -> bool {
        match self.cursor {
            Some(index) => {
                self.items[index] = new;
                true
            }
            None => false,
        }
    }

    /// Replaces `old` with `new` wherever it sits. Returns false if `old` is absent.
    pub fn replace(&mut self, old: &str, new: String) -> bool {
        match self.items.iter().position(|i| i == old) {
            Some(index) => {
                self.items[index] = new;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(names: &[&str]) -> PendingQueue {
        PendingQueue::new(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn test_queue_new_positions_on_first() {
        let q = queue(&["a.jpg", "b.png"]);
        assert_eq!(q.cursor(), Some(0));
        assert_eq!(q.current(), Some("a.jpg"));
        assert!(q.at_first());
        assert!(!q.at_last());
    }

    #[test]
    fn test_queue_new_empty() {
        let q = queue(&[]);
        assert_eq!(q.cursor(), None);
        assert_eq!(q.current(), None);
        assert!(q.at_first());
        assert!(q.at_last());
    }

    #[test]
    fn test_queue_new_drops_duplicates() {
        let q = queue(&["a.jpg", "b.png", "a.jpg"]);
        assert_eq!(q.items(), &["a.jpg".to_string(), "b.png".to_string()]);
    }

    #[test]
    fn test_queue_step_clamps_at_boundaries() {
        let mut q = queue(&["a", "b", "c"]);

        assert!(!q.step(NavDirection::Previous));
        assert_eq!(q.cursor(), Some(0));

        assert!(q.step(NavDirection::Next));
        assert!(q.step(NavDirection::Next));
        assert!(q.at_last());

        assert!(!q.step(NavDirection::Next));
        assert_eq!(q.cursor(), Some(2));
    }

    #[test]
    fn test_queue_step_on_empty() {
        let mut q = queue(&[]);
        assert!(!q.step(NavDirection::Next));
        assert_eq!(q.cursor(), None);
    }

    #[test]
    fn test_queue_remove_current_keeps_index() {
        let mut q = queue(&["a", "b", "c"]);
        assert_eq!(q.remove_current(), Some("a".to_string()));
        assert_eq!(q.cursor(), Some(0));
        assert_eq!(q.current(), Some("b"));
    }

    #[test]
    fn test_queue_remove_last_clamps_cursor() {
        let mut q = queue(&["a", "b", "c"]);
        q.step(NavDirection::Next);
        q.step(NavDirection::Next);

        assert_eq!(q.remove_current(), Some("c".to_string()));
        assert_eq!(q.cursor(), Some(1));
        assert_eq!(q.current(), Some("b"));
    }

    #[test]
    fn test_queue_remove_only_item_empties() {
        let mut q = queue(&["a"]);
        assert_eq!(q.remove_current(), Some("a".to_string()));
        assert_eq!(q.cursor(), None);
        assert_eq!(q.remove_current(), None);
    }

    #[test]
    fn test_queue_push_back_and_select() {
        let mut q = queue(&[]);
        q.push_back_and_select("b".to_string());
        assert_eq!(q.cursor(), Some(0));

        q.push_back_and_select("c".to_string());
        assert_eq!(q.cursor(), Some(1));
        assert_eq!(q.current(), Some("c"));
    }

    #[test]
    fn test_queue_replace_keeps_position() {
        let mut q = queue(&["a", "b", "c"]);
        assert!(q.replace("b", "z".to_string()));
        assert_eq!(q.items()[1], "z");
        assert_eq!(q.cursor(), Some(0));

        assert!(!q.replace("missing", "y".to_string()));
    }

    #[test]
    fn test_queue_rename_current() {
        let mut q = queue(&["a", "b"]);
        q.step(NavDirection::Next);
        assert!(q.rename_current("landscape".to_string()));
        assert_eq!(q.current(), Some("landscape"));
        assert!(q.contains("landscape"));
        assert!(!q.contains("b"));
    }
}
