//! Per-page stroke collection.

use crate::stroke::Stroke;
use serde::{Deserialize, Serialize};

/// Ordered strokes for a single page.
///
/// Insertion order is both z-order (back to front) and undo order. Strokes are
/// stored by value, so a snapshot or a clone never shares data with the store
/// it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
}

impl StrokeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing strokes.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Add a stroke on top.
    pub fn append(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Remove and return the stroke at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Stroke> {
        (index < self.strokes.len()).then(|| self.strokes.remove(index))
    }

    /// Insert a stroke at `index`, clamped to the end of the store.
    pub fn insert_at(&mut self, index: usize, stroke: Stroke) {
        let index = index.min(self.strokes.len());
        self.strokes.insert(index, stroke);
    }

    /// Deep copy of all strokes.
    pub fn snapshot(&self) -> Vec<Stroke> {
        self.strokes.clone()
    }

    /// Replace the contents with a copy of `strokes`.
    pub fn restore(&mut self, strokes: &[Stroke]) {
        self.strokes = strokes.to_vec();
    }

    pub fn get(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Strokes in z-order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Stroke> + ExactSizeIterator {
        self.strokes.iter()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
