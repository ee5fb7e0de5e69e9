//! Undo/redo as a log of reversible edit operations.

use crate::store::StrokeStore;
use crate::stroke::Stroke;
use serde::{Deserialize, Serialize};

/// A reversible change to a [`StrokeStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditOp {
    /// A stroke appended on top of the store.
    AddStroke(Stroke),
    /// The stroke that was at `index` when it was removed.
    RemoveStroke { index: usize, stroke: Stroke },
    /// Operations applied in order and undone in reverse order.
    Batch(Vec<EditOp>),
}

impl EditOp {
    fn apply(&self, store: &mut StrokeStore) {
        match self {
            EditOp::AddStroke(stroke) => store.append(stroke.clone()),
            EditOp::RemoveStroke { index, .. } => {
                store.remove_at(*index);
            }
            EditOp::Batch(ops) => ops.iter().for_each(|op| op.apply(store)),
        }
    }

    fn revert(&self, store: &mut StrokeStore) {
        match self {
            EditOp::AddStroke(_) => {
                // Additions always land on top, so the top is what gets taken back.
                store.remove_at(store.len().saturating_sub(1));
            }
            EditOp::RemoveStroke { index, stroke } => store.insert_at(*index, stroke.clone()),
            EditOp::Batch(ops) => ops.iter().rev().for_each(|op| op.revert(store)),
        }
    }
}

/// Linear undo/redo history for one store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    undo_stack: Vec<EditOp>,
    redo_stack: Vec<EditOp>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `op` to `store` and make it undoable. Clears the redo stack.
    pub fn record(&mut self, store: &mut StrokeStore, op: EditOp) {
        op.apply(store);
        self.undo_stack.push(op);
        self.redo_stack.clear();
    }

    /// Undo the most recent operation.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, store: &mut StrokeStore) -> bool {
        let Some(op) = self.undo_stack.pop() else {
            return false;
        };
        op.revert(store);
        self.redo_stack.push(op);
        true
    }

    /// Redo the last undone operation.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, store: &mut StrokeStore) -> bool {
        let Some(op) = self.redo_stack.pop() else {
            return false;
        };
        op.apply(store);
        self.undo_stack.push(op);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Operations on the undo stack, oldest first.
    pub fn undo_ops(&self) -> &[EditOp] {
        &self.undo_stack
    }
}

/// A page's strokes together with their history.
///
/// The two always travel as a unit: a history is meaningless against any
/// store other than the one it was recorded on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayer {
    pub(crate) store: StrokeStore,
    pub(crate) history: History,
}

impl PageLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing strokes with an empty history.
    pub fn with_store(store: StrokeStore) -> Self {
        Self {
            store,
            history: History::new(),
        }
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn record(&mut self, op: EditOp) {
        self.history.record(&mut self.store, op);
    }

    /// Commit a new stroke on top.
    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.record(EditOp::AddStroke(stroke));
    }

    /// Remove the stroke at `index` as an undoable edit.
    pub fn remove_stroke(&mut self, index: usize) -> Option<Stroke> {
        let stroke = self.store.get(index)?.clone();
        self.record(EditOp::RemoveStroke {
            index,
            stroke: stroke.clone(),
        });
        Some(stroke)
    }

    /// Remove every stroke as a single undoable batch.
    /// Returns false when there was nothing to clear.
    pub fn clear_all(&mut self) -> bool {
        if self.store.is_empty() {
            return false;
        }
        let ops = self
            .store
            .iter()
            .enumerate()
            .rev()
            .map(|(index, stroke)| EditOp::RemoveStroke {
                index,
                stroke: stroke.clone(),
            })
            .collect();
        self.record(EditOp::Batch(ops));
        true
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.store)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::InkColor;
    use kurbo::Point;

    fn stroke(i: usize) -> Stroke {
        let x = i as f64;
        Stroke::new(
            vec![Point::new(x, 0.0), Point::new(x, 10.0)],
            InkColor::BLACK,
            1.0 + x,
        )
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut layer = PageLayer::new();
        for i in 0..5 {
            layer.add_stroke(stroke(i));
        }
        let original = layer.store().snapshot();

        for _ in 0..5 {
            assert!(layer.undo());
        }
        assert!(layer.store().is_empty());
        assert!(!layer.can_undo());

        for _ in 0..5 {
            assert!(layer.redo());
        }
        assert_eq!(layer.store().snapshot(), original);
        assert!(!layer.can_redo());
    }

    #[test]
    fn test_record_after_undo_clears_redo() {
        let mut layer = PageLayer::new();
        layer.add_stroke(stroke(0));
        layer.add_stroke(stroke(1));

        assert!(layer.undo());
        assert!(layer.can_redo());

        layer.add_stroke(stroke(2));
        assert!(!layer.can_redo());
        assert!(!layer.redo());
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut layer = PageLayer::new();
        assert!(!layer.can_undo());
        assert!(!layer.undo());
        assert!(!layer.can_redo());
        assert!(!layer.redo());
    }

    #[test]
    fn test_undo_remove_restores_index() {
        let mut layer = PageLayer::new();
        for i in 0..3 {
            layer.add_stroke(stroke(i));
        }
        let original = layer.store().snapshot();

        let removed = layer.remove_stroke(1).unwrap();
        assert_eq!(removed, original[1]);
        assert_eq!(layer.store().len(), 2);

        assert!(layer.undo());
        assert_eq!(layer.store().snapshot(), original);

        assert!(layer.redo());
        assert_eq!(layer.store().strokes(), &[original[0].clone(), original[2].clone()]);
    }

    #[test]
    fn test_remove_out_of_range_records_nothing() {
        let mut layer = PageLayer::new();
        assert!(layer.remove_stroke(0).is_none());
        assert!(!layer.can_undo());
    }

    #[test]
    fn test_clear_all_is_undoable() {
        let mut layer = PageLayer::new();
        for i in 0..4 {
            layer.add_stroke(stroke(i));
        }
        let original = layer.store().snapshot();

        assert!(layer.clear_all());
        assert!(layer.store().is_empty());

        assert!(layer.undo());
        assert_eq!(layer.store().snapshot(), original);

        assert!(layer.redo());
        assert!(layer.store().is_empty());
    }

    #[test]
    fn test_clear_empty_page_is_noop() {
        let mut layer = PageLayer::new();
        assert!(!layer.clear_all());
        assert!(!layer.can_undo());
    }

    #[test]
    fn test_replaying_undo_stack_reproduces_store() {
        let mut layer = PageLayer::new();
        for i in 0..4 {
            layer.add_stroke(stroke(i));
        }
        layer.remove_stroke(2);
        layer.remove_stroke(0);
        layer.add_stroke(stroke(9));
        layer.undo();

        let mut replay = StrokeStore::new();
        for op in layer.history().undo_ops() {
            op.apply(&mut replay);
        }
        assert_eq!(&replay, layer.store());
    }
}
