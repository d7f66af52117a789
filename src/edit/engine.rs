// Edit engine - translates grid pointer/keyboard events into timeline
// mutations, with every edit checkpointed for undo

use crate::edit::history::History;
use crate::edit::session::{DragState, EditSession, PencilDuration, Tool};
use crate::notify::{Notification, NotificationCategory, NotificationHub};
use crate::timeline::note::quantize_beat;
use crate::timeline::{AddOutcome, Note, NoteId, Song};
use crate::tone::{TONE_SECONDS_MAX, TONE_SECONDS_MIN, ToneOutput};

/// Velocity used for pencil-placed notes
pub const DEFAULT_VELOCITY: u8 = 100;

/// Modifier keys held during a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Ctrl on most platforms, Cmd on macOS
    pub command: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.command || self.shift
    }
}

/// Keyboard commands the grid understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Delete,
    Undo,
    Redo,
    Escape,
}

/// A pointer or keyboard event on the grid, in grid coordinates
/// (beat position on the horizontal axis, key row on the vertical)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    PointerDown {
        beat: f64,
        key: u8,
        modifiers: Modifiers,
    },
    PointerMove {
        beat: f64,
        key: u8,
    },
    PointerUp {
        beat: f64,
        key: u8,
    },
    Key(EditKey),
}

/// Change events for the render layer
///
/// The engine never holds anything drawable; a view subscribes to these
/// and redraws from the current song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    NoteAdded(NoteId),
    NoteRemoved(NoteId),
    NotesMoved(Vec<NoteId>),
    NoteResized(NoteId),
    SelectionChanged,
    /// The whole song was swapped (undo/redo)
    SongReplaced,
}

/// The edit engine: one open song, its session state, and its history
pub struct EditEngine {
    song: Song,
    session: EditSession,
    history: History,
}

impl EditEngine {
    pub fn new(song: Song) -> Self {
        Self {
            song,
            session: EditSession::new(),
            history: History::new(),
        }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Switch tools, cancelling any drag in progress first
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel_drag();
        self.session.set_tool(tool);
    }

    pub fn set_pencil_duration(&mut self, duration: PencilDuration) {
        self.session.pencil_duration = duration;
    }

    /// Single entry point for grid input
    pub fn handle_grid_event(
        &mut self,
        event: GridEvent,
        tone: &mut dyn ToneOutput,
        notify: &mut NotificationHub,
    ) -> Vec<EditEvent> {
        match event {
            GridEvent::PointerDown {
                beat,
                key,
                modifiers,
            } => self.pointer_down(beat, key, modifiers, tone, notify),
            GridEvent::PointerMove { beat, key } => self.pointer_move(beat, key, notify),
            GridEvent::PointerUp { beat, key } => self.pointer_up(beat, key, notify),
            GridEvent::Key(key) => self.key_command(key),
        }
    }

    fn pointer_down(
        &mut self,
        beat: f64,
        key: u8,
        modifiers: Modifiers,
        tone: &mut dyn ToneOutput,
        notify: &mut NotificationHub,
    ) -> Vec<EditEvent> {
        match self.session.tool() {
            Tool::Pencil => self.pencil_down(beat, key, tone, notify),
            Tool::Eraser => self.eraser_down(beat, key),
            Tool::Select => self.select_down(beat, key, modifiers),
        }
    }

    fn pencil_down(
        &mut self,
        beat: f64,
        key: u8,
        tone: &mut dyn ToneOutput,
        notify: &mut NotificationHub,
    ) -> Vec<EditEvent> {
        if let Some(existing) = self.song.note_at(beat, key) {
            // Occupied cell: preview only, no structural change
            let existing = *existing;
            self.preview(&existing, tone, notify);
            return Vec::new();
        }

        let duration = self.session.pencil_duration.beats();
        match self.song.add_note(key, beat, duration, DEFAULT_VELOCITY) {
            Ok(AddOutcome::Added { song, note_id }) => {
                self.history.checkpoint(&self.song);
                self.song = song;
                if let Some(note) = self.song.get_note(note_id) {
                    let note = *note;
                    self.preview(&note, tone, notify);
                }
                vec![EditEvent::NoteAdded(note_id)]
            }
            // Double-placement guard tripped: nothing to do
            Ok(AddOutcome::Duplicate) => Vec::new(),
            Err(e) => {
                notify.push(Notification::warning(
                    NotificationCategory::Edit,
                    e.to_string(),
                ));
                Vec::new()
            }
        }
    }

    fn eraser_down(&mut self, beat: f64, key: u8) -> Vec<EditEvent> {
        let Some(note) = self.song.note_at(beat, key) else {
            return Vec::new();
        };
        let note_id = note.id;

        // Already-gone is not a failure from the user's perspective
        if let Ok(song) = self.song.remove_note(note_id) {
            self.history.checkpoint(&self.song);
            self.song = song;
            self.session.prune_selection(&self.song);
            vec![EditEvent::NoteRemoved(note_id)]
        } else {
            Vec::new()
        }
    }

    fn select_down(&mut self, beat: f64, key: u8, modifiers: Modifiers) -> Vec<EditEvent> {
        let Some(hit) = self.song.hit_test(beat, key) else {
            // Empty cell: begin a box selection
            let mut events = Vec::new();
            if !modifiers.any() && !self.session.selection().is_empty() {
                self.session.clear_selection();
                events.push(EditEvent::SelectionChanged);
            }
            self.session.drag = Some(DragState::BoxSelect {
                origin_beat: beat,
                origin_key: key,
                current_beat: beat,
                current_key: key,
                additive: modifiers.any(),
            });
            return events;
        };

        if hit.on_resize_handle && !modifiers.any() {
            if let Some(note) = self.song.get_note(hit.note_id) {
                self.session.drag = Some(DragState::Resize {
                    origin_song: self.song.clone(),
                    note_id: hit.note_id,
                    note_start_beat: note.start_beat,
                });
            }
            return Vec::new();
        }

        if modifiers.command {
            self.session.toggle(hit.note_id);
            return vec![EditEvent::SelectionChanged];
        }

        if modifiers.shift {
            if let Some(anchor) = self.session.last_selected() {
                self.extend_range(anchor, hit.note_id);
                return vec![EditEvent::SelectionChanged];
            }
            // No anchor yet: behave like a plain click
        }

        let mut events = Vec::new();
        if !self.session.is_selected(hit.note_id) {
            self.session.select_only(hit.note_id);
            events.push(EditEvent::SelectionChanged);
        }
        self.session.drag = Some(DragState::Move {
            origin_song: self.song.clone(),
            origin_beat: beat,
            origin_key: key,
            pressed_note: hit.note_id,
            moved: false,
        });
        events
    }

    /// Shift-click: select the contiguous canonical-order range between
    /// the anchor and the clicked note, unioned with the selection
    fn extend_range(&mut self, anchor: NoteId, clicked: NoteId) {
        let sorted: Vec<Note> = self.song.sorted_notes();
        let pos = |id: NoteId| sorted.iter().position(|n| n.id == id);
        let (Some(a), Some(b)) = (pos(anchor), pos(clicked)) else {
            self.session.select_only(clicked);
            return;
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.session
            .extend(sorted[lo..=hi].iter().map(|n| n.id));
        self.session.set_last_selected(clicked);
    }

    fn pointer_move(
        &mut self,
        beat: f64,
        key: u8,
        notify: &mut NotificationHub,
    ) -> Vec<EditEvent> {
        let Some(drag) = self.session.drag.take() else {
            return Vec::new();
        };

        match drag {
            DragState::Move {
                origin_song,
                origin_beat,
                origin_key,
                pressed_note,
                ..
            } => {
                let delta_beats = beat - origin_beat;
                let delta_key = key as i32 - origin_key as i32;
                let ids: Vec<NoteId> = self.session.selection().iter().copied().collect();

                // Delta is always applied against the drag-start snapshot
                // so per-frame rounding never compounds.
                let events = match origin_song.move_notes(&ids, delta_beats, delta_key) {
                    Ok(song) => {
                        self.song = song;
                        vec![EditEvent::NotesMoved(ids)]
                    }
                    Err(e) => {
                        notify.push(Notification::warning(
                            NotificationCategory::Edit,
                            e.to_string(),
                        ));
                        Vec::new()
                    }
                };
                self.session.drag = Some(DragState::Move {
                    origin_song,
                    origin_beat,
                    origin_key,
                    pressed_note,
                    moved: true,
                });
                events
            }
            DragState::Resize {
                origin_song,
                note_id,
                note_start_beat,
            } => {
                // Continuous width during the drag; snapping happens on release
                let width = beat - note_start_beat;
                let events = match origin_song.resize_note(note_id, width) {
                    Ok(song) => {
                        self.song = song;
                        vec![EditEvent::NoteResized(note_id)]
                    }
                    Err(e) => {
                        notify.push(Notification::warning(
                            NotificationCategory::Edit,
                            e.to_string(),
                        ));
                        Vec::new()
                    }
                };
                self.session.drag = Some(DragState::Resize {
                    origin_song,
                    note_id,
                    note_start_beat,
                });
                events
            }
            DragState::BoxSelect {
                origin_beat,
                origin_key,
                additive,
                ..
            } => {
                self.session.drag = Some(DragState::BoxSelect {
                    origin_beat,
                    origin_key,
                    current_beat: beat,
                    current_key: key,
                    additive,
                });
                Vec::new()
            }
        }
    }

    fn pointer_up(&mut self, beat: f64, key: u8, notify: &mut NotificationHub) -> Vec<EditEvent> {
        let Some(drag) = self.session.drag.take() else {
            return Vec::new();
        };

        match drag {
            DragState::Move {
                origin_song,
                origin_beat,
                origin_key,
                pressed_note,
                moved,
            } => {
                if !moved {
                    // Press-and-release without movement: plain click,
                    // replace the selection with the pressed note
                    self.session.select_only(pressed_note);
                    return vec![EditEvent::SelectionChanged];
                }

                let delta_beats = quantize_beat(beat - origin_beat);
                let delta_key = key as i32 - origin_key as i32;
                let ids: Vec<NoteId> = self.session.selection().iter().copied().collect();

                match origin_song.move_notes(&ids, delta_beats, delta_key) {
                    Ok(song) => {
                        self.history.checkpoint(&origin_song);
                        self.song = song;
                        vec![EditEvent::NotesMoved(ids)]
                    }
                    Err(e) => {
                        self.song = origin_song;
                        notify.push(Notification::warning(
                            NotificationCategory::Edit,
                            e.to_string(),
                        ));
                        Vec::new()
                    }
                }
            }
            DragState::Resize {
                origin_song,
                note_id,
                note_start_beat,
            } => {
                let width = quantize_beat(beat - note_start_beat);
                match origin_song.resize_note(note_id, width) {
                    Ok(song) => {
                        self.history.checkpoint(&origin_song);
                        self.song = song;
                        vec![EditEvent::NoteResized(note_id)]
                    }
                    Err(e) => {
                        self.song = origin_song;
                        notify.push(Notification::warning(
                            NotificationCategory::Edit,
                            e.to_string(),
                        ));
                        Vec::new()
                    }
                }
            }
            DragState::BoxSelect {
                origin_beat,
                origin_key,
                ..
            } => {
                let beat_min = origin_beat.min(beat);
                let beat_max = origin_beat.max(beat);
                let key_min = origin_key.min(key);
                let key_max = origin_key.max(key);

                let hit = self.song.notes_in_rect(beat_min, beat_max, key_min, key_max);
                self.session.extend(hit);
                vec![EditEvent::SelectionChanged]
            }
        }
    }

    fn key_command(&mut self, key: EditKey) -> Vec<EditEvent> {
        match key {
            EditKey::Delete => self.delete_selection(),
            EditKey::Undo => {
                let Some(previous) = self.history.undo(&self.song) else {
                    return Vec::new();
                };
                self.song = previous;
                self.session.prune_selection(&self.song);
                vec![EditEvent::SongReplaced]
            }
            EditKey::Redo => {
                let Some(next) = self.history.redo(&self.song) else {
                    return Vec::new();
                };
                self.song = next;
                self.session.prune_selection(&self.song);
                vec![EditEvent::SongReplaced]
            }
            EditKey::Escape => {
                if self.session.drag.is_some() {
                    self.cancel_drag();
                    Vec::new()
                } else if !self.session.selection().is_empty() {
                    self.session.clear_selection();
                    vec![EditEvent::SelectionChanged]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Remove every selected note as one undoable step
    fn delete_selection(&mut self) -> Vec<EditEvent> {
        let ids: Vec<NoteId> = self.session.selection().iter().copied().collect();
        if ids.is_empty() {
            return Vec::new();
        }

        self.history.checkpoint(&self.song);
        let mut song = self.song.clone();
        let mut events = Vec::new();
        for id in ids {
            if let Ok(next) = song.remove_note(id) {
                song = next;
                events.push(EditEvent::NoteRemoved(id));
            }
        }
        self.song = song;
        self.session.prune_selection(&self.song);
        events.push(EditEvent::SelectionChanged);
        events
    }

    /// Abandon a drag in progress, restoring the pre-drag song
    fn cancel_drag(&mut self) {
        match self.session.drag.take() {
            Some(DragState::Move { origin_song, .. })
            | Some(DragState::Resize { origin_song, .. }) => {
                self.song = origin_song;
            }
            _ => {}
        }
    }

    fn preview(&self, note: &Note, tone: &mut dyn ToneOutput, notify: &mut NotificationHub) {
        let seconds = self
            .song
            .tempo
            .beats_to_seconds(note.duration_beats)
            .clamp(TONE_SECONDS_MIN, TONE_SECONDS_MAX);
        if let Err(e) = tone.play_tone(note.key, seconds, note.velocity) {
            notify.push(Notification::warning(
                NotificationCategory::Edit,
                e.to_string(),
            ));
        }
    }
}
