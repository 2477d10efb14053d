//! Endless draw sources
//!
//! `Deck` deals a shuffled copy of a finite set and reshuffles a fresh copy
//! whenever it runs out. `Cycle` repeats a fixed list in order.

use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffled, endlessly refilled sequence over a finite set
#[derive(Debug, Clone)]
pub struct Deck<T> {
    items: Vec<T>,
    order: Vec<usize>,
    cursor: usize,
    /// Number of times the deck has been (re)shuffled
    shuffles: u32,
}

impl<T: Clone> Deck<T> {
    /// Create a deck; nothing is shuffled until the first draw
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            order: Vec::new(),
            cursor: 0,
            shuffles: 0,
        }
    }

    /// Draw the next item, reshuffling when the current pass is used up.
    /// Returns `None` only for an empty deck.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        if self.cursor >= self.order.len() {
            self.reshuffle(rng);
        }
        let index = self.order[self.cursor];
        self.cursor += 1;
        self.items.get(index).cloned()
    }

    fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order = (0..self.items.len()).collect();
        self.order.shuffle(rng);
        self.cursor = 0;
        self.shuffles += 1;
        if self.shuffles > 1 {
            log::debug!("Deck of {} exhausted, reshuffled", self.items.len());
        }
    }

    /// Items in the underlying set
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items left before the next reshuffle
    pub fn remaining(&self) -> usize {
        self.order.len().saturating_sub(self.cursor)
    }

    pub fn shuffles(&self) -> u32 {
        self.shuffles
    }
}

/// Fixed list repeated in order
#[derive(Debug, Clone)]
pub struct Cycle<T> {
    items: Vec<T>,
    cursor: usize,
}

impl<T: Clone> Cycle<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, cursor: 0 }
    }

    /// Next item, wrapping around. `None` only when the list is empty.
    pub fn next_item(&mut self) -> Option<T> {
        let item = self.items.get(self.cursor)?.clone();
        self.cursor = (self.cursor + 1) % self.items.len();
        Some(item)
    }
}
