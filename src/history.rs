//! Submitted-input history with shell-style recall.
//!
//! The log is append-only for the lifetime of the console. Navigation is a
//! cursor counted backwards from the newest entry; `None` means the live
//! input buffer is authoritative. Whatever the user was typing when they
//! started walking back is kept aside and handed back when they walk past
//! the newest entry again.

#[derive(Debug, Default, Clone)]
pub struct HistoryNavigator {
    entries: Vec<String>,
    cursor: Option<usize>,
    pending: String,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line. Empty lines and repeats of the newest entry
    /// are not stored. Navigation always ends.
    pub fn submit(&mut self, text: &str) {
        if !text.is_empty() && self.entries.last().map(String::as_str) != Some(text) {
            self.entries.push(text.to_string());
        }
        self.reset();
    }

    /// Step one entry further into the past. `current` is what the input
    /// field shows right now; it is returned unchanged at the oldest entry.
    pub fn recall_older(&mut self, current: &str) -> String {
        if self.entries.is_empty() {
            return current.to_string();
        }
        let next = match self.cursor {
            None => {
                self.pending = current.to_string();
                0
            }
            Some(cursor) if cursor + 1 < self.entries.len() => cursor + 1,
            Some(_) => return current.to_string(),
        };
        self.cursor = Some(next);
        self.entry_at(next)
    }

    /// Step one entry towards the present. Walking past the newest entry
    /// hands back the input that was pending when navigation began.
    pub fn recall_newer(&mut self, current: &str) -> String {
        match self.cursor {
            None => current.to_string(),
            Some(0) => {
                self.cursor = None;
                self.pending.clone()
            }
            Some(cursor) => {
                self.cursor = Some(cursor - 1);
                self.entry_at(cursor - 1)
            }
        }
    }

    /// Stop navigating and forget the pending input. The log is kept.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.pending.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn pending_input(&self) -> &str {
        &self.pending
    }

    fn entry_at(&self, cursor: usize) -> String {
        self.entries
            .len()
            .checked_sub(cursor + 1)
            .and_then(|idx| self.entries.get(idx))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(entries: &[&str]) -> HistoryNavigator {
        let mut history = HistoryNavigator::new();
        for entry in entries {
            history.submit(entry);
        }
        history
    }

    #[test]
    fn consecutive_duplicates_are_collapsed() {
        let history = with(&["a", "a"]);
        assert_eq!(history.entries(), &["a".to_string()]);
    }

    #[test]
    fn non_consecutive_duplicates_are_kept() {
        let history = with(&["time", "hello", "time"]);
        assert_eq!(history.entries(), &["time", "hello", "time"]);
    }

    #[test]
    fn empty_input_is_never_recorded() {
        let history = with(&["", "x", ""]);
        assert_eq!(history.entries(), &["x".to_string()]);
    }

    #[test]
    fn older_walks_back_and_stops_at_the_oldest() {
        let mut history = with(&["one", "two", "three"]);
        assert_eq!(history.recall_older("draft"), "three");
        assert_eq!(history.recall_older("three"), "two");
        assert_eq!(history.recall_older("two"), "one");
        assert_eq!(history.recall_older("one"), "one");
        assert_eq!(history.cursor(), Some(2));
    }

    #[test]
    fn newer_restores_pending_input() {
        let mut history = with(&["one", "two"]);
        let shown = history.recall_older("draft");
        let shown = history.recall_older(&shown);
        assert_eq!(shown, "one");
        let shown = history.recall_newer(&shown);
        assert_eq!(shown, "two");
        assert_eq!(history.recall_newer(&shown), "draft");
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn newer_without_navigation_is_a_no_op() {
        let mut history = with(&["one"]);
        assert_eq!(history.recall_newer("typing"), "typing");
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn older_on_empty_log_keeps_the_input() {
        let mut history = HistoryNavigator::new();
        assert_eq!(history.recall_older("abc"), "abc");
        assert_eq!(history.cursor(), None);
    }

    #[test]
    fn submit_ends_navigation() {
        let mut history = with(&["one", "two"]);
        history.recall_older("draft");
        history.submit("three");
        assert_eq!(history.cursor(), None);
        assert_eq!(history.pending_input(), "");
        assert_eq!(history.recall_older(""), "three");
    }

    #[test]
    fn reset_keeps_the_log() {
        let mut history = with(&["one", "two"]);
        history.recall_older("draft");
        history.reset();
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), None);
        assert_eq!(history.pending_input(), "");
    }

    #[test]
    fn random_walks_keep_cursor_in_bounds_and_round_trip() {
        // Small deterministic LCG so the walk is reproducible.
        let mut seed: u32 = 0x2545_f491;
        let mut next = move || {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            seed >> 16
        };
        for _ in 0..50 {
            let mut history = HistoryNavigator::new();
            for _ in 0..(next() % 8) {
                let word = ["a", "b", "c"][(next() % 3) as usize];
                history.submit(word);
            }
            for pair in history.entries().windows(2) {
                assert_ne!(pair[0], pair[1]);
            }
            let mut shown = "pending".to_string();
            let steps = (next() % 10) as usize;
            for _ in 0..steps {
                shown = history.recall_older(&shown);
                if let Some(cursor) = history.cursor() {
                    assert!(cursor < history.len());
                }
            }
            for _ in 0..steps {
                shown = history.recall_newer(&shown);
            }
            assert_eq!(shown, "pending");
            assert_eq!(history.cursor(), None);
        }
    }
}
