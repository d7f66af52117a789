// Timeline model - songs, notes, tempo, and the pure mutation operations

pub mod note;
pub mod song;
pub mod tempo;

pub use note::{Note, NoteId, generate_note_id};
pub use song::{AddOutcome, GridHit, Song, SongId};
pub use tempo::Tempo;
