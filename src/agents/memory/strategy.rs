//! Retention strategies for conversation memory

use std::collections::VecDeque;

use crate::agents::config::MemoryStrategy;
use crate::agents::domain::Turn;

/// Drop turns that fall outside the strategy. Returns how many were evicted.
///
/// Surviving turns keep their relative order.
pub fn apply_strategy(turns: &mut VecDeque<Turn>, strategy: &MemoryStrategy) -> usize {
    match strategy {
        MemoryStrategy::Full => 0,
        MemoryStrategy::SlidingWindow { size } => apply_sliding_window(turns, *size),
        MemoryStrategy::FirstLast { first, last } => apply_first_last(turns, *first, *last),
    }
}

fn apply_sliding_window(turns: &mut VecDeque<Turn>, window_size: usize) -> usize {
    let excess = turns.len().saturating_sub(window_size);
    turns.drain(..excess);
    excess
}

fn apply_first_last(turns: &mut VecDeque<Turn>, first_count: usize, last_count: usize) -> usize {
    let total = first_count.saturating_add(last_count);
    if turns.len() <= total {
        return 0;
    }

    // Remove the middle block between the kept head and the kept tail
    let excess = turns.len() - total;
    turns.drain(first_count..first_count + excess);
    excess
}
