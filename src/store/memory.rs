// In-memory song store, the default collaborator in tests

use crate::store::{SongStore, StoreError};
use crate::timeline::{Song, SongId};
use std::collections::HashMap;

/// Song store backed by a plain map
#[derive(Debug, Default)]
pub struct MemoryStore {
    songs: HashMap<SongId, Song>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

impl SongStore for MemoryStore {
    fn load(&self, id: SongId) -> Result<Song, StoreError> {
        self.songs.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn save(&mut self, song: &Song) -> Result<(), StoreError> {
        self.songs.insert(song.id, song.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Song>, StoreError> {
        let mut songs: Vec<Song> = self.songs.values().cloned().collect();
        songs.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(songs)
    }

    fn delete(&mut self, id: SongId) -> Result<(), StoreError> {
        self.songs
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
