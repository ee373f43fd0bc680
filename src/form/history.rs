//! Bounded, newest-first history of created codes

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{Color, FormState};

/// How many entries the history keeps
pub const HISTORY_CAPACITY: usize = 5;

/// Labels longer than this are cut and suffixed with "..."
const LABEL_CHARS: usize = 10;

/// Display key for a history entry. Monotonic within one `History`,
/// so rapid creates never collide the way timestamps would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

/// Snapshot of the form at the moment "create" was pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub text: String,
    pub fg_color: Color,
    pub bg_color: Color,
    pub size: u32,
    pub created_at: u64, // ms since epoch, display only
}

impl HistoryEntry {
    /// Short caption shown under the thumbnail
    pub fn label(&self) -> String {
        if self.text.chars().count() > LABEL_CHARS {
            let head: String = self.text.chars().take(LABEL_CHARS).collect();
            format!("{}...", head)
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    next_id: u64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the form as a new entry. Blank text is silently ignored.
    /// Returns the id of the new entry when one was added.
    pub fn create(&mut self, form: &FormState) -> Option<EntryId> {
        if !form.has_content() {
            return None;
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;

        self.entries.push_front(HistoryEntry {
            id,
            text: form.text.clone(),
            fg_color: form.fg_color,
            bg_color: form.bg_color,
            size: form.size,
            created_at: now_millis(),
        });
        self.entries.truncate(HISTORY_CAPACITY);

        Some(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(text: &str) -> FormState {
        FormState {
            text: text.to_string(),
            ..FormState::default()
        }
    }

    fn texts(history: &History) -> Vec<&str> {
        history.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let mut history = History::new();
        history.create(&form("kept"));

        for blank in ["", " ", "\t", " \n  \t"] {
            assert_eq!(history.create(&form(blank)), None);
        }
        assert_eq!(texts(&history), vec!["kept"]);
    }

    #[test]
    fn test_create_snapshots_form() {
        let mut history = History::new();
        let current = FormState {
            text: "https://example.com".to_string(),
            fg_color: Color::from_hex("#112233").unwrap(),
            bg_color: Color::from_hex("#ffffff").unwrap(),
            size: 250,
        };

        history.create(&current);

        assert_eq!(history.len(), 1);
        let entry = history.get(0).unwrap();
        assert_eq!(entry.text, current.text);
        assert_eq!(entry.bg_color, current.bg_color);
        assert_eq!(entry.fg_color.to_hex(), "#112233");
        assert_eq!(entry.size, 250);
    }

    #[test]
    fn test_capacity_keeps_newest_five() {
        let mut history = History::new();
        for t in ["T1", "T2", "T3", "T4", "T5", "T6"] {
            history.create(&form(t));
        }
        assert_eq!(texts(&history), vec!["T6", "T5", "T4", "T3", "T2"]);

        for i in 0..20 {
            history.create(&form(&format!("n{i}")));
            assert!(history.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(texts(&history), vec!["n19", "n18", "n17", "n16", "n15"]);
    }

    #[test]
    fn test_ids_are_unique_under_rapid_creates() {
        let mut history = History::new();
        let ids: Vec<EntryId> = (0..5).filter_map(|_| history.create(&form("same"))).collect();

        let mut sorted = ids.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(history.get(0).map(|e| e.id), ids.last().copied());
    }

    #[test]
    fn test_label_truncates_long_text() {
        let mut history = History::new();
        history.create(&form("short"));
        history.create(&form("https://example.com"));
        history.create(&form("ééééééééééé"));

        assert_eq!(history.get(2).unwrap().label(), "short");
        assert_eq!(history.get(1).unwrap().label(), "https://ex...");
        assert_eq!(history.get(0).unwrap().label(), "éééééééééé...");
    }

    #[test]
    fn test_entries_are_frozen() {
        let mut history = History::new();
        let mut live = form("frozen");
        history.create(&live);

        live.set_text("changed");
        live.set_size(400);
        live.set_fg_color(Color::rgb(9, 9, 9));

        let entry = history.get(0).unwrap();
        assert_eq!(entry.text, "frozen");
        assert_eq!(entry.size, 200);
        assert_eq!(entry.fg_color, Color::BLACK);
    }
}
