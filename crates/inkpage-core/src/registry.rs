//! Per-page annotation snapshots.

use crate::history::PageLayer;
use crate::store::StrokeStore;
use std::collections::HashMap;

/// Page index → annotations of every page not currently on screen.
///
/// Entries are copies: saving and loading never share stroke data with the
/// live editing surface, so leaving a page and coming back is exact.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: HashMap<usize, PageLayer>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `layer` for `page`, replacing any earlier entry.
    pub fn save_current(&mut self, page: usize, layer: &PageLayer) {
        log::debug!("Saving {} stroke(s) for page {}", layer.store().len(), page);
        self.pages.insert(page, layer.clone());
    }

    /// A copy of the annotations for `page`, or an empty layer on first visit.
    pub fn load(&self, page: usize) -> PageLayer {
        self.pages.get(&page).cloned().unwrap_or_default()
    }

    /// Read access to a page's strokes without copying.
    pub fn store_for(&self, page: usize) -> Option<&StrokeStore> {
        self.pages.get(&page).map(PageLayer::store)
    }

    /// Pages that have an entry, ascending.
    pub fn pages(&self) -> Vec<usize> {
        let mut pages: Vec<usize> = self.pages.keys().copied().collect();
        pages.sort_unstable();
        pages
    }

    /// Total strokes across all pages.
    pub fn stroke_count(&self) -> usize {
        self.pages.values().map(|layer| layer.store().len()).sum()
    }

    /// Drop every entry (a new document was loaded).
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{InkColor, Stroke};
    use kurbo::Point;

    fn layer_with(n: usize) -> PageLayer {
        let mut layer = PageLayer::new();
        for i in 0..n {
            let x = i as f64;
            layer.add_stroke(Stroke::new(
                vec![Point::new(x, x), Point::new(x + 1.0, x + 1.0)],
                InkColor::BLUE,
                2.0,
            ));
        }
        layer
    }

    #[test]
    fn test_load_unvisited_page_is_empty() {
        let registry = PageRegistry::new();
        let layer = registry.load(3);
        assert!(layer.store().is_empty());
        assert!(!layer.can_undo());
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut registry = PageRegistry::new();
        let layer = layer_with(3);

        registry.save_current(0, &layer);
        assert_eq!(registry.load(0), layer);
    }

    #[test]
    fn test_loaded_copy_is_isolated() {
        let mut registry = PageRegistry::new();
        registry.save_current(0, &layer_with(2));

        let mut loaded = registry.load(0);
        loaded.clear_all();
        loaded.add_stroke(Stroke::new(vec![Point::ZERO], InkColor::RED, 1.0));

        assert_eq!(registry.store_for(0).map(StrokeStore::len), Some(2));
    }

    #[test]
    fn test_saved_copy_is_isolated_from_source() {
        let mut registry = PageRegistry::new();
        let mut layer = layer_with(1);
        registry.save_current(0, &layer);

        layer.clear_all();
        assert_eq!(registry.load(0).store().len(), 1);
    }

    #[test]
    fn test_history_travels_with_page() {
        let mut registry = PageRegistry::new();
        registry.save_current(1, &layer_with(2));

        let mut loaded = registry.load(1);
        assert!(loaded.can_undo());
        assert!(loaded.undo());
        assert_eq!(loaded.store().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut registry = PageRegistry::new();
        registry.save_current(0, &layer_with(1));
        registry.save_current(4, &layer_with(2));
        assert_eq!(registry.pages(), vec![0, 4]);
        assert_eq!(registry.stroke_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }
}
