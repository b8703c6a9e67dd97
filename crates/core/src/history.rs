//! Bounded conversation history.
//!
//! The history keeps the oracle's context from growing unbounded: at most
//! `max_messages` non-instruction turns are retained, evicted oldest-first
//! after each append batch. Standing-instruction turns are never evicted.

use crate::turn::Turn;
use tracing::debug;

/// An ordered sequence of turns with a retention cap.
///
/// Owned exclusively by one session; there is no shared mutation.
#[derive(Debug, Clone)]
pub struct History {
    turns: Vec<Turn>,

    /// Maximum retained non-instruction turns. Zero retains only
    /// instruction turns.
    max_messages: usize,
}

impl History {
    /// Create an empty history with the given retention cap.
    pub fn new(max_messages: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_messages,
        }
    }

    /// Append turns in order, then run one eviction pass.
    ///
    /// Appending an empty batch is a no-op. Eviction drops the oldest
    /// non-instruction turns until the non-instruction count is back at the
    /// cap; the relative order of survivors is preserved.
    pub fn append(&mut self, turns: impl IntoIterator<Item = Turn>) {
        let before = self.turns.len();
        self.turns.extend(turns);
        if self.turns.len() == before {
            return;
        }
        self.evict();
    }

    fn evict(&mut self) {
        let non_instruction = self.turns.iter().filter(|t| !t.is_instruction()).count();
        let excess = non_instruction.saturating_sub(self.max_messages);
        if excess == 0 {
            return;
        }

        let mut dropped = 0;
        self.turns.retain(|t| {
            if t.is_instruction() || dropped >= excess {
                true
            } else {
                dropped += 1;
                false
            }
        });
        debug!(evicted = dropped, retained = self.turns.len(), "Trimmed history");
    }

    /// A defensive copy of the full sequence: instruction turns first (in
    /// original relative order), then the retained non-instruction turns
    /// (in original relative order).
    pub fn snapshot(&self) -> Vec<Turn> {
        let instructions = self.turns.iter().filter(|t| t.is_instruction());
        let rest = self.turns.iter().filter(|t| !t.is_instruction());
        instructions.chain(rest).cloned().collect()
    }

    /// The last `n` turns in chronological order, with no special
    /// instruction handling. `n` larger than the history returns everything.
    pub fn tail(&self, n: usize) -> Vec<Turn> {
        let start = self.turns.len().saturating_sub(n);
        self.turns[start..].to_vec()
    }

    /// Drop everything, including any standing instruction.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Count of all currently retained turns.
    pub fn size(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::Role;

    fn user(n: usize) -> Turn {
        Turn::user(format!("message {n}"))
    }

    #[test]
    fn append_empty_is_noop() {
        let mut history = History::new(3);
        history.append(vec![]);
        assert_eq!(history.size(), 0);
        assert!(history.is_empty());
    }

    #[test]
    fn cap_invariant_holds_after_every_append() {
        let mut history = History::new(3);
        history.append(vec![Turn::instruction("stay on task")]);
        for n in 0..10 {
            history.append(vec![user(n)]);
            let non_instruction = history
                .snapshot()
                .iter()
                .filter(|t| !t.is_instruction())
                .count();
            assert!(non_instruction <= 3);
        }
    }

    #[test]
    fn instruction_survives_trimming() {
        // M=3, one instruction, then 5 turns one by one.
        let mut history = History::new(3);
        history.append(vec![Turn::instruction("you are a browser agent")]);
        for n in 1..=5 {
            history.append(vec![user(n)]);
        }

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[0].role, Role::Instruction);
        assert_eq!(snapshot[1].content, "message 3");
        assert_eq!(snapshot[2].content, "message 4");
        assert_eq!(snapshot[3].content, "message 5");
    }

    #[test]
    fn eviction_preserves_relative_order() {
        let mut history = History::new(4);
        history.append((0..8).map(user).collect::<Vec<_>>());

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 4);
        for pair in snapshot.windows(2) {
            assert!(pair[0].content < pair[1].content);
        }
        assert_eq!(snapshot[0].content, "message 4");
    }

    #[test]
    fn batch_append_triggers_single_eviction_pass() {
        let mut history = History::new(2);
        history.append(vec![user(1)]);
        // One batch of three lands atomically, then eviction brings it to 2.
        history.append(vec![user(2), user(3), user(4)]);
        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].content, "message 3");
        assert_eq!(snapshot[1].content, "message 4");
    }

    #[test]
    fn zero_cap_retains_only_instructions() {
        let mut history = History::new(0);
        history.append(vec![Turn::instruction("keep me")]);
        history.append(vec![user(1), user(2)]);
        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].is_instruction());
    }

    #[test]
    fn multiple_instructions_are_all_retained() {
        let mut history = History::new(1);
        history.append(vec![Turn::instruction("first"), Turn::instruction("second")]);
        history.append(vec![user(1), user(2)]);
        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].content, "first");
        assert_eq!(snapshot[1].content, "second");
        assert_eq!(snapshot[2].content, "message 2");
    }

    #[test]
    fn tail_returns_chronological_suffix() {
        let mut history = History::new(10);
        history.append(vec![Turn::instruction("inst"), user(1), user(2), user(3)]);

        let tail = history.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].content, "message 2");
        assert_eq!(tail[1].content, "message 3");

        // Oversized n returns the whole sequence, instruction included.
        let all = history.tail(100);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].role, Role::Instruction);
    }

    #[test]
    fn clear_drops_instruction_too() {
        let mut history = History::new(5);
        history.append(vec![Turn::instruction("inst"), user(1)]);
        history.clear();
        assert!(history.is_empty());
        assert!(history.snapshot().is_empty());
    }

    #[test]
    fn snapshot_is_a_defensive_copy() {
        let mut history = History::new(5);
        history.append(vec![user(1)]);
        let snapshot = history.snapshot();
        history.append(vec![user(2)]);
        assert_eq!(snapshot.len(), 1);
    }
}
