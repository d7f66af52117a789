// Textual interchange record for songs
// Import validates everything and assigns fresh ids so a shared record
// never collides with an existing library entry

use crate::error::{TimelineError, TimelineResult};
use crate::timeline::{Note, Song, Tempo, generate_note_id};
use serde::{Deserialize, Serialize};

/// Serializable note shape inside a `SongRecord`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub key: u8,
    pub start_time: f64,
    pub duration: f64,
    pub velocity: u8,
}

/// The exported/imported song shape
///
/// `id` is carried for reference but ignored on import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: String,
    pub name: String,
    pub bpm: u32,
    pub duration: f64,
    pub notes: Vec<NoteRecord>,
}

impl SongRecord {
    pub fn from_song(song: &Song) -> Self {
        Self {
            id: song.id.to_string(),
            name: song.name.clone(),
            bpm: song.tempo.bpm(),
            duration: song.duration_beats,
            notes: song
                .sorted_notes()
                .iter()
                .map(|n| NoteRecord {
                    key: n.key,
                    start_time: n.start_beat,
                    duration: n.duration_beats,
                    velocity: n.velocity,
                })
                .collect(),
        }
    }

    /// Build a song from this record, validating every field
    pub fn into_song(self) -> TimelineResult<Song> {
        if self.name.trim().is_empty() {
            return Err(TimelineError::MalformedRecord(
                "song name must not be empty".to_string(),
            ));
        }
        let tempo = Tempo::new(self.bpm)?;

        let mut notes = Vec::with_capacity(self.notes.len());
        for record in self.notes {
            notes.push(Note::new(
                generate_note_id(),
                record.key,
                record.start_time,
                record.duration,
                record.velocity,
            )?);
        }

        Ok(Song::from_parts(self.name, tempo, self.duration, notes))
    }
}

/// Export a song as pretty-printed JSON
pub fn export_json(song: &Song) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&SongRecord::from_song(song))
}

/// Import a song from JSON, assigning fresh song and note ids
pub fn import_json(json: &str) -> TimelineResult<Song> {
    let record: SongRecord = serde_json::from_str(json)
        .map_err(|e| TimelineError::MalformedRecord(e.to_string()))?;
    record.into_song()
}
