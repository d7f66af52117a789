// File-backed song store: one RON file per song under a directory

use crate::store::{SongStore, StoreError};
use crate::timeline::{Song, SongId};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SONG_EXTENSION: &str = "ron";

/// Song store persisting each song as `<uuid>.ron` in one directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store at `dir`, creating the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn song_path(&self, id: SongId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, SONG_EXTENSION))
    }

    fn read_song(path: &Path) -> Result<Song, StoreError> {
        let data = fs::read_to_string(path)?;
        ron::from_str(&data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl SongStore for FileStore {
    fn load(&self, id: SongId) -> Result<Song, StoreError> {
        let path = self.song_path(id);
        match Self::read_song(&path) {
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(id))
            }
            other => other,
        }
    }

    fn save(&mut self, song: &Song) -> Result<(), StoreError> {
        let data =
            ron::to_string(song).map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Write-then-rename: a failed save never clobbers the old file
        let path = self.song_path(song.id);
        let tmp = path.with_extension("ron.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Song>, StoreError> {
        let mut songs = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SONG_EXTENSION) {
                continue;
            }
            // A corrupt file should not take the whole library down
            if let Ok(song) = Self::read_song(&path) {
                songs.push(song);
            }
        }
        songs.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(songs)
    }

    fn delete(&mut self, id: SongId) -> Result<(), StoreError> {
        match fs::remove_file(self.song_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        let song = Song::new("On Disk");
        store.save(&song).unwrap();

        let loaded = store.load(song.id).unwrap();
        assert_eq!(loaded.name, "On Disk");
        assert_eq!(loaded.id, song.id);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let id = Song::new("ghost").id;
        assert!(matches!(store.load(id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_list_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        store.save(&Song::new("Good")).unwrap();
        fs::write(dir.path().join("broken.ron"), "not ron at all").unwrap();

        let songs = store.list().unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].name, "Good");
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        let song = Song::new("Doomed");
        store.save(&song).unwrap();
        store.delete(song.id).unwrap();

        assert!(matches!(store.load(song.id), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.delete(song.id),
            Err(StoreError::NotFound(_))
        ));
    }
}
