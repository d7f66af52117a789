// Song - the beat-indexed note grid and its pure mutation operations
// Every operation returns a new snapshot; undo keeps the prior ones

use crate::error::{TimelineError, TimelineResult};
use crate::timeline::note::{
    self, DUPLICATE_WINDOW_BEATS, KEY_MAX, KEY_MIN, MIN_DURATION_BEATS, Note, NoteId,
    generate_note_id,
};
use crate::timeline::tempo::Tempo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for songs
pub type SongId = Uuid;

/// Song duration grows in blocks of this many beats
const DURATION_BLOCK_BEATS: f64 = 4.0;

/// Fraction of a note's width that acts as its trailing-edge resize handle
const RESIZE_HANDLE_FRACTION: f64 = 0.3;

/// Widest the resize handle ever gets, in beats
const RESIZE_HANDLE_MAX_BEATS: f64 = 0.25;

/// Result of `Song::add_note`
///
/// A near-duplicate placement is a no-op signal, not an error: the caller
/// keeps its song and nothing needs reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added { song: Song, note_id: NoteId },
    Duplicate,
}

/// Result of hit-testing a grid position against a song
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridHit {
    pub note_id: NoteId,
    /// True when the position falls on the note's trailing-edge resize handle
    pub on_resize_handle: bool,
}

/// A song: notes on a beat grid plus tempo and bookkeeping
///
/// Storage order of `notes` is unspecified; `sorted_notes` gives the
/// canonical playback/spawn order. Invariant (repaired by every mutation
/// before it returns): `duration_beats >= max(note.end_beat())`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    pub tempo: Tempo,
    pub duration_beats: f64,
    notes: Vec<Note>,
    pub last_modified: DateTime<Utc>,
}

impl Song {
    /// Create a new empty song at the default tempo
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tempo: Tempo::default(),
            duration_beats: 0.0,
            notes: Vec::new(),
            last_modified: Utc::now(),
        }
    }

    /// Create a song from existing parts (used by record import)
    pub fn from_parts(
        name: impl Into<String>,
        tempo: Tempo,
        duration_beats: f64,
        notes: Vec<Note>,
    ) -> Self {
        let mut song = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tempo,
            duration_beats,
            notes,
            last_modified: Utc::now(),
        };
        song.extend_duration();
        song
    }

    /// All notes, in storage order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Number of notes
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Check if the song has no notes
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Get a note by ID
    pub fn get_note(&self, note_id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    /// Check whether a note ID exists in this song
    pub fn contains_note(&self, note_id: NoteId) -> bool {
        self.get_note(note_id).is_some()
    }

    /// Notes in canonical order: ascending start, ties by ascending key
    pub fn sorted_notes(&self) -> Vec<Note> {
        let mut sorted = self.notes.clone();
        sorted.sort_by(|a, b| {
            a.start_beat
                .total_cmp(&b.start_beat)
                .then(a.key.cmp(&b.key))
        });
        sorted
    }

    /// Add a note at a grid position
    ///
    /// The start is quantized to the snap grid. A note on the same key
    /// starting within `DUPLICATE_WINDOW_BEATS` of the quantized start is
    /// treated as the same placement gesture and the call returns
    /// `AddOutcome::Duplicate` without changing anything.
    pub fn add_note(
        &self,
        key: u8,
        start_beat: f64,
        duration_beats: f64,
        velocity: u8,
    ) -> TimelineResult<AddOutcome> {
        let start = note::quantize_beat(start_beat.max(0.0));
        let new_note = Note::new(generate_note_id(), key, start, duration_beats, velocity)?;

        let duplicate = self.notes.iter().any(|n| {
            n.key == key && (n.start_beat - start).abs() < DUPLICATE_WINDOW_BEATS
        });
        if duplicate {
            return Ok(AddOutcome::Duplicate);
        }

        let mut song = self.clone();
        song.notes.push(new_note);
        song.extend_duration();
        song.touch();

        Ok(AddOutcome::Added {
            song,
            note_id: new_note.id,
        })
    }

    /// Remove a note by ID
    ///
    /// The song's duration never shrinks.
    pub fn remove_note(&self, note_id: NoteId) -> TimelineResult<Song> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == note_id)
            .ok_or(TimelineError::NoteNotFound(note_id))?;

        let mut song = self.clone();
        song.notes.remove(index);
        song.touch();
        Ok(song)
    }

    /// Move a group of notes by the same delta, rigidly
    ///
    /// The clamp is computed once from the group's extremes and applied
    /// uniformly, so relative offsets inside the selection never change
    /// even at the grid boundaries.
    pub fn move_notes(
        &self,
        note_ids: &[NoteId],
        delta_beats: f64,
        delta_key: i32,
    ) -> TimelineResult<Song> {
        if note_ids.is_empty() {
            return Ok(self.clone());
        }

        let mut selected: Vec<&Note> = Vec::with_capacity(note_ids.len());
        for id in note_ids {
            selected.push(
                self.get_note(*id)
                    .ok_or(TimelineError::NoteNotFound(*id))?,
            );
        }

        // Clamp the whole group together.
        let min_start = selected
            .iter()
            .map(|n| n.start_beat)
            .fold(f64::INFINITY, f64::min);
        let min_key = selected.iter().map(|n| n.key).min().unwrap_or(KEY_MIN);
        let max_key = selected.iter().map(|n| n.key).max().unwrap_or(KEY_MAX);

        let delta_beats = delta_beats.max(-min_start);
        let delta_key = delta_key
            .max(KEY_MIN as i32 - min_key as i32)
            .min(KEY_MAX as i32 - max_key as i32);

        let mut song = self.clone();
        for n in song.notes.iter_mut() {
            if note_ids.contains(&n.id) {
                n.start_beat += delta_beats;
                n.key = (n.key as i32 + delta_key) as u8;
            }
        }
        song.extend_duration();
        song.touch();
        Ok(song)
    }

    /// Resize a note to a new duration, clamped to the minimum length
    pub fn resize_note(&self, note_id: NoteId, new_duration: f64) -> TimelineResult<Song> {
        if !self.contains_note(note_id) {
            return Err(TimelineError::NoteNotFound(note_id));
        }

        let mut song = self.clone();
        for n in song.notes.iter_mut() {
            if n.id == note_id {
                n.duration_beats = new_duration.max(MIN_DURATION_BEATS);
            }
        }
        song.extend_duration();
        song.touch();
        Ok(song)
    }

    /// Find the note occupying a grid cell, if any
    pub fn note_at(&self, beat: f64, key: u8) -> Option<&Note> {
        self.notes
            .iter()
            .find(|n| n.key == key && n.contains_beat(beat))
    }

    /// Hit-test a grid position, distinguishing the resize handle
    pub fn hit_test(&self, beat: f64, key: u8) -> Option<GridHit> {
        self.note_at(beat, key).map(|n| {
            let handle_width =
                (n.duration_beats * RESIZE_HANDLE_FRACTION).min(RESIZE_HANDLE_MAX_BEATS);
            GridHit {
                note_id: n.id,
                on_resize_handle: beat >= n.end_beat() - handle_width,
            }
        })
    }

    /// IDs of all notes whose bounding box overlaps an axis-aligned
    /// beat-range x key-range rectangle
    pub fn notes_in_rect(
        &self,
        beat_min: f64,
        beat_max: f64,
        key_min: u8,
        key_max: u8,
    ) -> Vec<NoteId> {
        self.notes
            .iter()
            .filter(|n| {
                n.start_beat < beat_max
                    && n.end_beat() > beat_min
                    && n.key >= key_min
                    && n.key <= key_max
            })
            .map(|n| n.id)
            .collect()
    }

    /// Repair the duration invariant: grow to the next block boundary
    /// past the furthest note end
    fn extend_duration(&mut self) {
        let max_end = self
            .notes
            .iter()
            .map(|n| n.end_beat())
            .fold(0.0_f64, f64::max);
        if max_end > self.duration_beats {
            self.duration_beats = (max_end / DURATION_BLOCK_BEATS).ceil() * DURATION_BLOCK_BEATS;
        }
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}
