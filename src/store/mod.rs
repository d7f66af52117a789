// Persistence - abstract song store plus the textual interchange record
// The working song in memory stays the source of truth; a failed save
// never touches in-memory state

pub mod file;
pub mod memory;
pub mod record;

use crate::timeline::{Song, SongId};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{NoteRecord, SongRecord, export_json, import_json};

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("song {0} not found")]
    NotFound(SongId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value song persistence
///
/// The core treats this as an external collaborator; implementations may
/// sit on a directory, a database, or a remote service. Callers schedule
/// these calls outside the tick path.
pub trait SongStore {
    fn load(&self, id: SongId) -> Result<Song, StoreError>;
    fn save(&mut self, song: &Song) -> Result<(), StoreError>;
    fn list(&self) -> Result<Vec<Song>, StoreError>;
    fn delete(&mut self, id: SongId) -> Result<(), StoreError>;
}
