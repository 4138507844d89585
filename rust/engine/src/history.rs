use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::HISTORY_CAPACITY;
use crate::dice::DiceRoll;
use crate::ledger::Side;
use crate::round::SessionId;

/// A settled round that produced a player side.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session_id: SessionId,
    pub side: Side,
    pub sum: u8,
    pub dice: DiceRoll,
}

/// Bounded record of settled rounds, newest first. Once full, recording a
/// new entry evicts the oldest.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// The `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    pub fn all(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
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

    pub fn stats(&self) -> HistoryStats {
        let tai = self.entries.iter().filter(|e| e.side == Side::Tai).count();
        HistoryStats {
            tai,
            xiu: self.entries.len() - tai,
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// Side counts over the recorded history.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub tai: usize,
    pub xiu: usize,
}

impl HistoryStats {
    pub fn tai_percent(&self) -> f64 {
        self.tai as f64 * 100.0 / self.denominator()
    }

    pub fn xiu_percent(&self) -> f64 {
        self.xiu as f64 * 100.0 / self.denominator()
    }

    fn denominator(&self) -> f64 {
        (self.tai + self.xiu).max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize, side: Side) -> HistoryEntry {
        HistoryEntry {
            session_id: SessionId::from(format!("s{}", n)),
            side,
            sum: if side == Side::Tai { 12 } else { 6 },
            dice: DiceRoll::new(if side == Side::Tai { [3, 4, 5] } else { [1, 2, 3] }).unwrap(),
        }
    }

    #[test]
    fn newest_first() {
        let mut h = History::new();
        h.record(entry(1, Side::Tai));
        h.record(entry(2, Side::Xiu));
        assert_eq!(h.latest().unwrap().session_id.as_str(), "s2");
        let recent = h.recent(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].session_id.as_str(), "s2");
        assert_eq!(h.all().len(), 2);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut h = History::new();
        for n in 1..=HISTORY_CAPACITY + 1 {
            h.record(entry(n, Side::Tai));
        }
        assert_eq!(h.len(), HISTORY_CAPACITY);
        assert_eq!(h.latest().unwrap().session_id.as_str(), "s201");
        assert!(h.iter().all(|e| e.session_id.as_str() != "s1"));
        assert_eq!(h.all().last().unwrap().session_id.as_str(), "s2");
    }

    #[test]
    fn recent_beyond_len_returns_everything() {
        let mut h = History::with_capacity(5);
        h.record(entry(1, Side::Tai));
        assert_eq!(h.recent(12).len(), 1);
    }

    #[test]
    fn stats_percentages() {
        let mut h = History::new();
        assert_eq!(h.stats().tai_percent(), 0.0);
        h.record(entry(1, Side::Tai));
        h.record(entry(2, Side::Tai));
        h.record(entry(3, Side::Xiu));
        h.record(entry(4, Side::Tai));
        let s = h.stats();
        assert_eq!((s.tai, s.xiu), (3, 1));
        assert_eq!(s.tai_percent(), 75.0);
        assert_eq!(s.xiu_percent(), 25.0);
    }
}
