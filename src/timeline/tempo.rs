// Tempo - conversion between musical time (beats) and wall-clock time

use crate::error::{TimelineError, TimelineResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default tempo for new songs
pub const DEFAULT_BPM: u32 = 120;

/// Tempo in BPM (beats per minute)
///
/// Stored as a positive integer; fractional tempos are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tempo {
    bpm: u32,
}

impl Tempo {
    /// Creates a new tempo; zero BPM is rejected
    pub fn new(bpm: u32) -> TimelineResult<Self> {
        if bpm == 0 {
            return Err(TimelineError::InvalidBpm(bpm));
        }
        Ok(Self { bpm })
    }

    /// Get BPM value
    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Duration of one beat in milliseconds
    pub fn beat_duration_ms(&self) -> f64 {
        self.beat_duration_seconds() * 1000.0
    }

    /// Convert a beat count to seconds
    pub fn beats_to_seconds(&self, beats: f64) -> f64 {
        beats * self.beat_duration_seconds()
    }

    /// Convert a millisecond count to beats
    pub fn ms_to_beats(&self, ms: f64) -> f64 {
        ms / self.beat_duration_ms()
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: DEFAULT_BPM }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_conversions() {
        let tempo = Tempo::new(120).unwrap();
        assert_eq!(tempo.bpm(), 120);
        assert_eq!(tempo.beat_duration_seconds(), 0.5);
        assert_eq!(tempo.beat_duration_ms(), 500.0);
        assert_eq!(tempo.beats_to_seconds(4.0), 2.0);
        assert_eq!(tempo.ms_to_beats(1000.0), 2.0);
    }

    #[test]
    fn test_default_tempo() {
        assert_eq!(Tempo::default().bpm(), 120);
    }

    #[test]
    fn test_zero_bpm_rejected() {
        assert_eq!(Tempo::new(0), Err(TimelineError::InvalidBpm(0)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Tempo::new(90).unwrap().to_string(), "90 BPM");
    }
}
