// Playback scheduler - fires each note exactly once per play session,
// in sync with wall-clock time, with pause/resume continuity

use crate::notify::{Notification, NotificationCategory, NotificationHub};
use crate::timeline::{NoteId, Song};
use crate::tone::{TONE_SECONDS_MAX, TONE_SECONDS_MIN, ToneOutput};
use std::collections::HashSet;

/// Dispatch window width, in beats
///
/// Wide enough that a note never falls between two ticks at sane tick
/// rates. Notes that still slip past (a stalled host) are caught up on
/// the next tick rather than dropped.
pub const DISPATCH_TOLERANCE_BEATS: f64 = 0.15;

/// How far past the last beat playback runs before finishing, in beats
pub const TAIL_BEATS: f64 = 0.5;

/// Events emitted by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    NoteDispatched(NoteId),
    /// Natural end of the song (not emitted on explicit stop)
    Finished,
}

/// Ephemeral state of one play session
///
/// `elapsed_beats` is always recomputed from wall-clock time while
/// running, never from tick counts, so variable tick rates cannot drift.
/// While paused it stays frozen at its last value.
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    reference_start_ms: f64,
    elapsed_beats: f64,
    played: HashSet<NoteId>,
    running: bool,
}

/// Plays a song snapshot against an external tick source
pub struct PlaybackScheduler {
    song: Song,
    state: PlaybackState,
}

impl PlaybackScheduler {
    /// Create a scheduler over a snapshot of the song
    pub fn new(song: Song) -> Self {
        Self {
            song,
            state: PlaybackState::default(),
        }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn elapsed_beats(&self) -> f64 {
        self.state.elapsed_beats
    }

    /// Number of notes dispatched so far in this session
    pub fn played_count(&self) -> usize {
        self.state.played.len()
    }

    /// Start a fresh play session from beat zero
    pub fn start(&mut self, now_ms: u64) {
        self.state.elapsed_beats = 0.0;
        self.state.played.clear();
        self.rearm(now_ms);
    }

    /// Freeze the clock at its current position
    ///
    /// Dispatched-note bookkeeping is kept so resuming never re-triggers.
    pub fn pause(&mut self, now_ms: u64) {
        if self.state.running {
            self.state.elapsed_beats = self.beats_at(now_ms);
            self.state.running = false;
        }
    }

    /// Continue from the frozen position with no jump
    pub fn resume(&mut self, now_ms: u64) {
        if !self.state.running {
            self.rearm(now_ms);
        }
    }

    /// Explicit stop: same reset as a natural finish
    pub fn stop(&mut self) {
        self.reset();
    }

    /// Advance the session to `now_ms`, dispatching due notes
    pub fn on_tick(
        &mut self,
        now_ms: u64,
        tone: &mut dyn ToneOutput,
        notify: &mut NotificationHub,
    ) -> Vec<PlaybackEvent> {
        if !self.state.running {
            return Vec::new();
        }

        let elapsed = self.beats_at(now_ms);
        self.state.elapsed_beats = elapsed;

        let mut events = Vec::new();
        let beat_seconds = self.song.tempo.beat_duration_seconds();

        for note in self.song.sorted_notes() {
            if note.start_beat >= elapsed + DISPATCH_TOLERANCE_BEATS {
                break;
            }
            if self.state.played.contains(&note.id) {
                continue;
            }

            let seconds = (note.duration_beats * beat_seconds)
                .clamp(TONE_SECONDS_MIN, TONE_SECONDS_MAX);
            if let Err(e) = tone.play_tone(note.key, seconds, note.velocity) {
                // Non-fatal: log and keep the session going
                notify.push(Notification::warning(
                    NotificationCategory::Playback,
                    e.to_string(),
                ));
            }
            self.state.played.insert(note.id);
            events.push(PlaybackEvent::NoteDispatched(note.id));
        }

        if elapsed >= self.song.duration_beats + TAIL_BEATS {
            self.reset();
            events.push(PlaybackEvent::Finished);
        }

        events
    }

    /// Recompute the wall-clock reference so the current elapsed-beats
    /// value holds at `now_ms`
    fn rearm(&mut self, now_ms: u64) {
        let beat_ms = self.song.tempo.beat_duration_ms();
        self.state.reference_start_ms = now_ms as f64 - self.state.elapsed_beats * beat_ms;
        self.state.running = true;
    }

    fn beats_at(&self, now_ms: u64) -> f64 {
        let beat_ms = self.song.tempo.beat_duration_ms();
        (now_ms as f64 - self.state.reference_start_ms) / beat_ms
    }

    fn reset(&mut self) {
        self.state.running = false;
        self.state.elapsed_beats = 0.0;
        self.state.played.clear();
    }
}
