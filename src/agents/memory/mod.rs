//! Conversation memory for routed queries
//!
//! - `ConversationMemory`: the append-only turn log of one session
//! - `SessionStore`: session key -> memory, one writer per session
//! - `strategy`: how many turns a session retains

mod in_memory;
mod strategy;

pub use in_memory::{SessionStore, SharedMemory};
pub use strategy::apply_strategy;

use std::collections::VecDeque;

use crate::agents::config::MemoryStrategy;
use crate::agents::domain::{NewTurn, Turn};

/// Ordered turn log for a single session.
///
/// Turns are only ever appended; the retention strategy may drop the oldest
/// ones, but surviving turns never change order and `seq` is never reused.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<Turn>,
    next_seq: u64,
    strategy: MemoryStrategy,
}

impl ConversationMemory {
    pub fn new(strategy: MemoryStrategy) -> Self {
        Self {
            turns: VecDeque::new(),
            next_seq: 0,
            strategy,
        }
    }

    /// Append a turn at the end of the log and return its sequence number
    pub fn append(&mut self, turn: NewTurn) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.turns.push_back(Turn::stamp(seq, turn));

        let evicted = apply_strategy(&mut self.turns, &self.strategy);
        if evicted > 0 {
            tracing::debug!(evicted, retained = self.turns.len(), "Evicted old turns");
        }
        seq
    }

    /// Snapshot of the retained turns in append order
    pub fn history(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Turns appended at or after `seq`
    pub fn since(&self, seq: u64) -> Vec<Turn> {
        self.turns.iter().filter(|t| t.seq >= seq).cloned().collect()
    }

    /// Empty the log. Idempotent; sequence numbers keep counting.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Sequence number the next appended turn will get
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(MemoryStrategy::default())
    }
}
