// History - snapshot-based undo/redo over song states

use crate::timeline::Song;
use std::collections::VecDeque;

/// Default maximum number of snapshots to keep in history
const DEFAULT_MAX_HISTORY: usize = 100;

/// Manages undo/redo over immutable song snapshots
///
/// Two stacks of snapshots (most recent at the back). A checkpoint stores
/// the pre-mutation song; any new checkpoint discards the redo entries.
/// Snapshots are never mutated in place.
///
/// # Memory Management
/// The undo stack is capped; when the limit is reached the oldest
/// snapshot is evicted.
#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Song>,
    redo_stack: VecDeque<Song>,
    max_history: usize,
}

impl History {
    /// Create a history with the default snapshot limit
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// Create a history with a custom snapshot limit
    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    /// Record the pre-mutation song
    ///
    /// Clears the redo stack (we are on a new timeline now) and evicts the
    /// oldest entry when over the cap.
    pub fn checkpoint(&mut self, song: &Song) {
        self.undo_stack.push_back(song.clone());
        self.redo_stack.clear();

        if self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }
    }

    /// Undo: return the previous snapshot, storing `current` for redo
    ///
    /// Returns `None` (no-op) when there is nothing to undo.
    pub fn undo(&mut self, current: &Song) -> Option<Song> {
        let snapshot = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(current.clone());
        Some(snapshot)
    }

    /// Redo: return the next snapshot, storing `current` for undo
    ///
    /// Returns `None` (no-op) when there is nothing to redo.
    pub fn redo(&mut self, current: &Song) -> Option<Song> {
        let snapshot = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(current.clone());
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

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::AddOutcome;

    fn song_with_note() -> Song {
        match Song::new("Test").add_note(1, 0.0, 1.0, 100).unwrap() {
            AddOutcome::Added { song, .. } => song,
            AddOutcome::Duplicate => unreachable!(),
        }
    }

    #[test]
    fn test_undo_restores_checkpointed_snapshot() {
        let mut history = History::new();
        let before = Song::new("Test");

        history.checkpoint(&before);
        let after = song_with_note();

        let restored = history.undo(&after).unwrap();
        assert_eq!(restored.note_count(), before.note_count());
        assert!(history.can_redo());
    }

    #[test]
    fn test_redo_after_undo() {
        let mut history = History::new();
        let before = Song::new("Test");
        let after = song_with_note();

        history.checkpoint(&before);
        let restored = history.undo(&after).unwrap();
        let redone = history.redo(&restored).unwrap();

        assert_eq!(redone.note_count(), 1);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut history = History::new();
        assert!(history.undo(&Song::new("Test")).is_none());
        assert!(history.redo(&Song::new("Test")).is_none());
    }

    #[test]
    fn test_checkpoint_clears_redo() {
        let mut history = History::new();
        let song = Song::new("Test");

        history.checkpoint(&song);
        history.undo(&song).unwrap();
        assert!(history.can_redo());

        history.checkpoint(&song);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_limit_evicts_oldest() {
        let mut history = History::with_capacity(3);
        let song = Song::new("Test");

        for _ in 0..5 {
            history.checkpoint(&song);
        }

        assert_eq!(history.undo_count(), 3);
    }
}
