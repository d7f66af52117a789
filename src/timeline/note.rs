// Note representation for the timeline
// A note is a beat-positioned event with key, duration, and velocity

use crate::error::{TimelineError, TimelineResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for notes (unique within a process, not just a song)
pub type NoteId = u64;

/// Lowest playable key index
pub const KEY_MIN: u8 = 1;

/// Highest playable key index (15 piano keys)
pub const KEY_MAX: u8 = 15;

/// Minimum note length enforced after any resize, in beats
pub const MIN_DURATION_BEATS: f64 = 0.1;

/// Quantization step for edit operations, in beats
pub const SNAP_GRID_BEATS: f64 = 0.25;

/// Two notes on the same key closer than this are considered the same
/// placement gesture and the second one is rejected
pub const DUPLICATE_WINDOW_BEATS: f64 = 0.1;

/// Global note ID generator (atomic for thread-safety)
static NEXT_NOTE_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique note ID
pub fn generate_note_id() -> NoteId {
    NEXT_NOTE_ID.fetch_add(1, Ordering::Relaxed)
}

/// A musical note on the beat grid
///
/// Notes are immutable value records: every change goes through a `Song`
/// operation that returns a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for this note
    pub id: NoteId,

    /// Piano key index (1-15)
    pub key: u8,

    /// Start position in beats (>= 0)
    pub start_beat: f64,

    /// Length in beats (> 0)
    pub duration_beats: f64,

    /// Loudness (1-127)
    pub velocity: u8,
}

impl Note {
    /// Creates a new note, validating every field
    pub fn new(
        id: NoteId,
        key: u8,
        start_beat: f64,
        duration_beats: f64,
        velocity: u8,
    ) -> TimelineResult<Self> {
        if !(KEY_MIN..=KEY_MAX).contains(&key) {
            return Err(TimelineError::KeyOutOfRange(key as i64));
        }
        if !(1..=127).contains(&velocity) {
            return Err(TimelineError::VelocityOutOfRange(velocity as i64));
        }
        if !(duration_beats > 0.0) {
            return Err(TimelineError::NonPositiveDuration(duration_beats));
        }
        if !(start_beat >= 0.0) {
            return Err(TimelineError::NegativeStart(start_beat));
        }

        Ok(Self {
            id,
            key,
            start_beat,
            duration_beats,
            velocity,
        })
    }

    /// End position of this note, in beats
    pub fn end_beat(&self) -> f64 {
        self.start_beat + self.duration_beats
    }

    /// Check whether a beat position falls inside this note
    pub fn contains_beat(&self, beat: f64) -> bool {
        beat >= self.start_beat && beat < self.end_beat()
    }
}

/// Round a beat position to the nearest snap-grid line
pub fn quantize_beat(beat: f64) -> f64 {
    (beat / SNAP_GRID_BEATS).round() * SNAP_GRID_BEATS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let note = Note::new(1, 8, 2.0, 1.0, 100).unwrap();

        assert_eq!(note.id, 1);
        assert_eq!(note.key, 8);
        assert_eq!(note.start_beat, 2.0);
        assert_eq!(note.duration_beats, 1.0);
        assert_eq!(note.velocity, 100);
    }

    #[test]
    fn test_note_end_and_containment() {
        let note = Note::new(1, 1, 2.0, 1.5, 100).unwrap();

        assert_eq!(note.end_beat(), 3.5);
        assert!(note.contains_beat(2.0));
        assert!(note.contains_beat(3.0));
        assert!(!note.contains_beat(3.5));
        assert!(!note.contains_beat(1.9));
    }

    #[test]
    fn test_invalid_key() {
        assert_eq!(
            Note::new(1, 0, 0.0, 1.0, 100),
            Err(TimelineError::KeyOutOfRange(0))
        );
        assert_eq!(
            Note::new(1, 16, 0.0, 1.0, 100),
            Err(TimelineError::KeyOutOfRange(16))
        );
    }

    #[test]
    fn test_invalid_velocity() {
        assert_eq!(
            Note::new(1, 1, 0.0, 1.0, 0),
            Err(TimelineError::VelocityOutOfRange(0))
        );
        assert_eq!(
            Note::new(1, 1, 0.0, 1.0, 128),
            Err(TimelineError::VelocityOutOfRange(128))
        );
    }

    #[test]
    fn test_invalid_duration_and_start() {
        assert_eq!(
            Note::new(1, 1, 0.0, 0.0, 100),
            Err(TimelineError::NonPositiveDuration(0.0))
        );
        assert_eq!(
            Note::new(1, 1, -1.0, 1.0, 100),
            Err(TimelineError::NegativeStart(-1.0))
        );
    }

    #[test]
    fn test_quantize_beat() {
        assert_eq!(quantize_beat(0.0), 0.0);
        assert_eq!(quantize_beat(0.12), 0.0);
        assert_eq!(quantize_beat(0.13), 0.25);
        assert_eq!(quantize_beat(2.6), 2.5);
        assert_eq!(quantize_beat(3.9), 4.0);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_note_id();
        let b = generate_note_id();
        assert_ne!(a, b);
    }
}
