// beatgrid - interactive music-timeline engine
// Notes on a beat-indexed grid, edited with undoable tools and consumed
// by a playback scheduler and a falling-tile rhythm game

pub mod edit;
pub mod error;
pub mod game;
pub mod notify;
pub mod playback;
pub mod store;
pub mod tick;
pub mod timeline;
pub mod tone;

// Re-export commonly used types for convenience
pub use edit::{EditEngine, EditEvent, EditKey, GridEvent, History, Modifiers, Tool};
pub use error::{TimelineError, TimelineResult};
pub use game::{GameConfig, GameEvent, GameSession, Judgement, ScoreBoard};
pub use notify::{Notification, NotificationHub, NotificationLevel};
pub use playback::{PlaybackEvent, PlaybackScheduler};
pub use store::{FileStore, MemoryStore, SongStore, StoreError, export_json, import_json};
pub use tick::{ManualTickSource, TickSource};
pub use timeline::{AddOutcome, Note, NoteId, Song, SongId, Tempo};
pub use tone::{NullTone, RecordingTone, ToneOutput};
