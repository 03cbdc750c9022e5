use std::collections::{HashSet, VecDeque};

use crate::types::message::ChatMessage;

/// Bounded, deduplicated history of the most recent chat messages.
///
/// Insertion order is arrival order. Inserting an id that is already present
/// is a no-op (not a move-to-end); once the capacity is exceeded the oldest
/// entry is evicted. Membership checks go through a parallel id set so
/// inserts stay O(1) rather than scanning the queue.
pub struct MessageHistory {
    capacity: usize,
    ids: HashSet<String>,
    entries: VecDeque<ChatMessage>,
}

impl MessageHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ids: HashSet::new(),
            entries: VecDeque::new(),
        }
    }

    /// Inserts a message, dropping duplicates and evicting FIFO past capacity.
    pub fn insert(&mut self, message: ChatMessage) {
        if self.ids.contains(&message.id) {
            return;
        }

        self.ids.insert(message.id.clone());
        self.entries.push_back(message);

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                self.ids.remove(&evicted.id);
            }
        }
    }

    /// Returns the retained messages, oldest first.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::with_capacity(crate::types::constants::HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            author: "tester".to_string(),
            author_id: "1".to_string(),
            avatar: None,
            content: format!("message {}", id),
            timestamp: None,
        }
    }

    #[test]
    fn test_insert_preserves_arrival_order() {
        let mut history = MessageHistory::with_capacity(10);
        history.insert(msg("a"));
        history.insert(msg("b"));
        history.insert(msg("c"));

        let ids: Vec<String> = history.snapshot().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_insert_is_a_noop() {
        let mut history = MessageHistory::with_capacity(10);
        history.insert(msg("a"));
        history.insert(msg("b"));
        let before = history.snapshot();

        history.insert(msg("a"));
        assert_eq!(history.snapshot(), before);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_duplicate_does_not_move_to_end() {
        let mut history = MessageHistory::with_capacity(10);
        history.insert(msg("a"));
        history.insert(msg("b"));
        history.insert(msg("a"));

        let ids: Vec<String> = history.snapshot().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_fifo_eviction_past_capacity() {
        let mut history = MessageHistory::with_capacity(100);
        for i in 0..150 {
            history.insert(msg(&i.to_string()));
        }

        assert_eq!(history.len(), 100);
        let ids: Vec<String> = history.snapshot().into_iter().map(|m| m.id).collect();
        let expected: Vec<String> = (50..150).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_evicted_id_can_be_reinserted() {
        let mut history = MessageHistory::with_capacity(2);
        history.insert(msg("a"));
        history.insert(msg("b"));
        history.insert(msg("c")); // evicts "a"
        history.insert(msg("a"));

        let ids: Vec<String> = history.snapshot().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["c", "a"]);
    }
}
