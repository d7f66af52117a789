// Edit session - per-open-song tool state, selection, and drag tracking

use crate::timeline::{NoteId, Song};
use std::collections::HashSet;

/// The active editing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Pencil,
    Eraser,
}

/// Length of the note the pencil places, restricted to a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PencilDuration {
    Whole,
    Half,
    #[default]
    Quarter,
    Eighth,
    Sixteenth,
}

impl PencilDuration {
    /// Length in beats
    pub fn beats(&self) -> f64 {
        match self {
            PencilDuration::Whole => 4.0,
            PencilDuration::Half => 2.0,
            PencilDuration::Quarter => 1.0,
            PencilDuration::Eighth => 0.5,
            PencilDuration::Sixteenth => 0.25,
        }
    }
}

/// A drag gesture in progress
///
/// Move and Resize keep the pre-drag song so every pointer-move applies
/// its delta against the drag-start positions, never incrementally
/// against the previous frame.
#[derive(Debug, Clone)]
pub enum DragState {
    Move {
        origin_song: Song,
        origin_beat: f64,
        origin_key: u8,
        pressed_note: NoteId,
        /// Set once the pointer actually moves; a press-and-release
        /// without movement is a plain click
        moved: bool,
    },
    Resize {
        origin_song: Song,
        note_id: NoteId,
        note_start_beat: f64,
    },
    BoxSelect {
        origin_beat: f64,
        origin_key: u8,
        current_beat: f64,
        current_key: u8,
        /// True when a modifier held at drag start unions the result
        /// with the existing selection
        additive: bool,
    },
}

/// Ephemeral editing state for one open song
#[derive(Debug, Default)]
pub struct EditSession {
    tool: Tool,
    pub pencil_duration: PencilDuration,
    selection: HashSet<NoteId>,
    /// Anchor for shift-click range extension
    last_selected: Option<NoteId>,
    pub drag: Option<DragState>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools; cancels any drag and, when leaving Select, clears
    /// the selection
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        self.drag = None;
        if self.tool == Tool::Select {
            self.clear_selection();
        }
        self.tool = tool;
    }

    pub fn selection(&self) -> &HashSet<NoteId> {
        &self.selection
    }

    pub fn is_selected(&self, note_id: NoteId) -> bool {
        self.selection.contains(&note_id)
    }

    pub fn last_selected(&self) -> Option<NoteId> {
        self.last_selected
    }

    /// Replace the selection with a single note
    pub fn select_only(&mut self, note_id: NoteId) {
        self.selection.clear();
        self.selection.insert(note_id);
        self.last_selected = Some(note_id);
    }

    /// Toggle a note in or out of the selection
    pub fn toggle(&mut self, note_id: NoteId) {
        if self.selection.remove(&note_id) {
            if self.last_selected == Some(note_id) {
                self.last_selected = None;
            }
        } else {
            self.selection.insert(note_id);
            self.last_selected = Some(note_id);
        }
    }

    /// Union a set of notes into the selection
    pub fn extend(&mut self, note_ids: impl IntoIterator<Item = NoteId>) {
        self.selection.extend(note_ids);
    }

    pub fn set_last_selected(&mut self, note_id: NoteId) {
        self.last_selected = Some(note_id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.last_selected = None;
    }

    /// Drop selected ids that no longer exist in the song
    ///
    /// Keeps the invariant selection ⊆ song's note ids after removals
    /// and undo/redo.
    pub fn prune_selection(&mut self, song: &Song) {
        self.selection.retain(|id| song.contains_note(*id));
        if let Some(last) = self.last_selected {
            if !song.contains_note(last) {
                self.last_selected = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::AddOutcome;

    #[test]
    fn test_defaults() {
        let session = EditSession::new();
        assert_eq!(session.tool(), Tool::Select);
        assert_eq!(session.pencil_duration, PencilDuration::Quarter);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_pencil_duration_set() {
        assert_eq!(PencilDuration::Whole.beats(), 4.0);
        assert_eq!(PencilDuration::Half.beats(), 2.0);
        assert_eq!(PencilDuration::Quarter.beats(), 1.0);
        assert_eq!(PencilDuration::Eighth.beats(), 0.5);
        assert_eq!(PencilDuration::Sixteenth.beats(), 0.25);
    }

    #[test]
    fn test_leaving_select_clears_selection() {
        let mut session = EditSession::new();
        session.select_only(1);
        session.toggle(2);
        assert_eq!(session.selection().len(), 2);

        session.set_tool(Tool::Pencil);
        assert!(session.selection().is_empty());
        assert!(session.last_selected().is_none());

        // Switching between non-select tools does not touch selection
        session.set_tool(Tool::Eraser);
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut session = EditSession::new();
        session.toggle(7);
        assert!(session.is_selected(7));
        assert_eq!(session.last_selected(), Some(7));

        session.toggle(7);
        assert!(!session.is_selected(7));
        assert_eq!(session.last_selected(), None);
    }

    #[test]
    fn test_prune_selection() {
        let song = Song::new("Test");
        let (song, id) = match song.add_note(1, 0.0, 1.0, 100).unwrap() {
            AddOutcome::Added { song, note_id } => (song, note_id),
            AddOutcome::Duplicate => unreachable!(),
        };

        let mut session = EditSession::new();
        session.select_only(id);
        session.toggle(9999);
        session.prune_selection(&song);

        assert_eq!(session.selection().len(), 1);
        assert!(session.is_selected(id));
        // 9999 was the last click and it is gone now
        assert_eq!(session.last_selected(), None);
    }
}
