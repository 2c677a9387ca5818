//! Bounded-history random selection
//!
//! A `SelectionBag` never hands out an item that is still in its recent
//! history. When every item is excluded the history is cleared first, so a
//! draw always succeeds on a non-empty bag.

use std::collections::VecDeque;

use rand::Rng;

#[derive(Debug, Clone)]
pub struct SelectionBag<T> {
    items: Vec<T>,
    /// Indices of recently drawn items, oldest first
    recent: VecDeque<usize>,
    history: usize,
}

impl<T> SelectionBag<T> {
    pub fn new(items: Vec<T>, history: usize) -> Self {
        Self {
            items,
            recent: VecDeque::with_capacity(history + 1),
            history,
        }
    }

    /// Draw one item. `None` only when the bag holds no items at all.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<&T> {
        let idx = self.draw_index(rng)?;
        self.items.get(idx)
    }

    /// Draw one item's index
    pub fn draw_index(&mut self, rng: &mut impl Rng) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }

        let mut candidates: Vec<usize> = (0..self.items.len())
            .filter(|idx| !self.recent.contains(idx))
            .collect();
        if candidates.is_empty() {
            self.recent.clear();
            candidates = (0..self.items.len()).collect();
        }

        let idx = candidates[rng.random_range(0..candidates.len())];
        if self.history > 0 {
            self.recent.push_back(idx);
            if self.recent.len() > self.history {
                self.recent.pop_front();
            }
        }
        Some(idx)
    }

    /// Forget the draw history
    pub fn clear_history(&mut self) {
        self.recent.clear();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
