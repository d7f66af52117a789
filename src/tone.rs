// Tone output - the external collaborator that actually produces sound
// Fire-and-forget: failures are reported but never fatal

/// Shortest tone the core ever asks for, in seconds
pub const TONE_SECONDS_MIN: f64 = 0.1;

/// Longest tone the core ever asks for, in seconds
pub const TONE_SECONDS_MAX: f64 = 4.0;

/// Error from a tone output backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tone output failed: {0}")]
pub struct ToneError(pub String);

/// Result type for tone calls
pub type ToneResult = Result<(), ToneError>;

/// Sounds a key for a number of seconds at a velocity
///
/// Implementations live outside this core (synth, MIDI out, web audio...).
/// Callers catch errors at the call site and keep going.
pub trait ToneOutput {
    fn play_tone(&mut self, key: u8, duration_seconds: f64, velocity: u8) -> ToneResult;
}

/// Tone output that discards everything
#[derive(Debug, Default)]
pub struct NullTone;

impl ToneOutput for NullTone {
    fn play_tone(&mut self, _key: u8, _duration_seconds: f64, _velocity: u8) -> ToneResult {
        Ok(())
    }
}

/// A single captured tone call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCall {
    pub key: u8,
    pub duration_seconds: f64,
    pub velocity: u8,
}

/// Tone output that records every call; used by the demo binary and tests
#[derive(Debug, Default)]
pub struct RecordingTone {
    pub calls: Vec<ToneCall>,
}

impl RecordingTone {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToneOutput for RecordingTone {
    fn play_tone(&mut self, key: u8, duration_seconds: f64, velocity: u8) -> ToneResult {
        self.calls.push(ToneCall {
            key,
            duration_seconds,
            velocity,
        });
        Ok(())
    }
}
