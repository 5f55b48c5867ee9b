use std::collections::VecDeque;
use std::sync::Arc;

use image::RgbaImage;

// ============================================================================
// CANVAS SNAPSHOT
// ============================================================================

/// Full copy of the canvas state an undo step restores.
///
/// The stroke buffer is an owned copy. The background is shared through `Arc`:
/// the canvas never mutates a background in place (fills install a new one),
/// so a shared handle is as independent as a deep copy.
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasSnapshot {
    pub strokes: RgbaImage,
    pub background: Option<Arc<RgbaImage>>,
}

// ============================================================================
// HISTORY MANAGER - bounded undo/redo stacks of full snapshots
// ============================================================================

/// Bounded undo/redo history. Pushing past the cap evicts the oldest entry.
pub struct HistoryManager {
    undo_stack: VecDeque<CanvasSnapshot>,
    redo_stack: Vec<CanvasSnapshot>,
    max_history_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(30)
    }
}

impl HistoryManager {
    pub fn new(max_history_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history_size.min(64)),
            redo_stack: Vec::new(),
            max_history_size: max_history_size.max(1),
        }
    }

    /// Record the state before an edit. Clears the redo stack.
    pub fn push(&mut self, snapshot: CanvasSnapshot) {
        self.redo_stack.clear();
        self.undo_stack.push_back(snapshot);
        self.prune();
    }

    /// Pop the most recent snapshot, parking `current` on the redo stack.
    pub fn undo(&mut self, current: CanvasSnapshot) -> Option<CanvasSnapshot> {
        let snapshot = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(snapshot)
    }

    /// Re-apply the most recently undone state, parking `current` on the undo stack.
    pub fn redo(&mut self, current: CanvasSnapshot) -> Option<CanvasSnapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        self.prune();
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn prune(&mut self) {
        while self.undo_stack.len() > self.max_history_size {
            if self.undo_stack.pop_front().is_some() {
                log::debug!("history full ({}), evicted oldest snapshot", self.max_history_size);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn snap(tag: u8) -> CanvasSnapshot {
        CanvasSnapshot {
            strokes: RgbaImage::from_pixel(2, 2, Rgba([tag, 0, 0, 255])),
            background: None,
        }
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut history = HistoryManager::new(30);
        for tag in 0..31u8 {
            history.push(snap(tag));
        }
        assert_eq!(history.undo_count(), 30);

        let mut restored = Vec::new();
        while let Some(s) = history.undo(snap(255)) {
            restored.push(s.strokes.get_pixel(0, 0)[0]);
        }
        assert_eq!(restored.len(), 30);
        // Snapshot 0 was evicted first; the last reachable one is snapshot 1
        assert_eq!(restored.first(), Some(&30));
        assert_eq!(restored.last(), Some(&1));
    }

    #[test]
    fn redo_is_cleared_by_new_push() {
        let mut history = HistoryManager::new(5);
        history.push(snap(1));
        let back = history.undo(snap(2)).unwrap();
        assert_eq!(back, snap(1));
        assert!(history.can_redo());

        history.push(snap(3));
        assert!(!history.can_redo());
        assert_eq!(history.undo_count(), 1);
    }

    #[test]
    fn redo_round_trip() {
        let mut history = HistoryManager::new(5);
        history.push(snap(1));
        let restored = history.undo(snap(2)).unwrap();
        let again = history.redo(restored).unwrap();
        assert_eq!(again, snap(2));
        assert_eq!(history.undo_count(), 1);
        assert!(history.undo(snap(9)).is_some());
        assert!(history.undo(snap(9)).is_none());
    }
}
