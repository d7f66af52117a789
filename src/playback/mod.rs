// Playback - tempo-driven scheduler dispatching tones from a song snapshot

pub mod scheduler;

pub use scheduler::{PlaybackEvent, PlaybackScheduler, PlaybackState};
