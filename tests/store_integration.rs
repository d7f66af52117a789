//! Persistence flows: stores as external collaborators, plus the
//! textual interchange record

use beatgrid::store::{FileStore, MemoryStore, SongStore, StoreError, export_json, import_json};
use beatgrid::timeline::{AddOutcome, Song};

fn phrase(name: &str) -> Song {
    let mut song = Song::new(name);
    for (key, start) in [(1u8, 0.0), (5, 1.5), (8, 3.0)] {
        song = match song.add_note(key, start, 1.0, 100).unwrap() {
            AddOutcome::Added { song, .. } => song,
            AddOutcome::Duplicate => panic!("duplicate in fixture"),
        };
    }
    song
}

/// Both store implementations honor the same contract
#[test]
fn test_stores_share_contract() {
    let dir = tempfile::tempdir().unwrap();
    let mut stores: Vec<Box<dyn SongStore>> = vec![
        Box::new(MemoryStore::new()),
        Box::new(FileStore::open(dir.path()).unwrap()),
    ];

    for store in &mut stores {
        let song = phrase("Contract");
        store.save(&song).unwrap();

        let loaded = store.load(song.id).unwrap();
        assert_eq!(loaded.id, song.id);
        assert_eq!(loaded.note_count(), 3);
        assert_eq!(loaded.sorted_notes()[1].start_beat, 1.5);

        assert_eq!(store.list().unwrap().len(), 1);
        store.delete(song.id).unwrap();
        assert!(matches!(store.load(song.id), Err(StoreError::NotFound(_))));
    }
}

/// A full song survives a disk round trip byte-for-byte in meaning
#[test]
fn test_file_round_trip_preserves_song() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();

    let song = phrase("Round Trip");
    store.save(&song).unwrap();
    let loaded = store.load(song.id).unwrap();

    assert_eq!(loaded, song);
}

/// Saving is in-place: a re-save of an edited song replaces, never
/// duplicates, its library entry
#[test]
fn test_resave_replaces_entry() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();

    let song = phrase("Evolving");
    store.save(&song).unwrap();

    let song = match song.add_note(12, 5.0, 1.0, 100).unwrap() {
        AddOutcome::Added { song, .. } => song,
        AddOutcome::Duplicate => unreachable!(),
    };
    store.save(&song).unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].note_count(), 4);
}

/// The newest-edited song lists first
#[test]
fn test_list_orders_by_recency() {
    let mut store = MemoryStore::new();

    let old = Song::new("Old");
    store.save(&old).unwrap();

    std::thread::sleep(std::time::Duration::from_millis(5));
    let new = Song::new("New");
    store.save(&new).unwrap();

    let names: Vec<String> = store.list().unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["New".to_string(), "Old".to_string()]);
}

/// Export, share, import: the copy is the same music under fresh ids
#[test]
fn test_export_import_is_a_fresh_copy() {
    let song = phrase("Shared");
    let json = export_json(&song).unwrap();

    // The record carries the interchange field names
    assert!(json.contains("\"startTime\""));
    assert!(json.contains("\"bpm\""));

    let imported = import_json(&json).unwrap();
    assert_ne!(imported.id, song.id);
    assert_eq!(imported.name, song.name);
    assert_eq!(imported.tempo, song.tempo);
    assert_eq!(imported.note_count(), song.note_count());
    for (a, b) in imported.sorted_notes().into_iter().zip(song.sorted_notes()) {
        assert_ne!(a.id, b.id);
        assert_eq!(
            (a.key, a.start_beat, a.duration_beats, a.velocity),
            (b.key, b.start_beat, b.duration_beats, b.velocity)
        );
    }

    // An imported song goes into the library like any other
    let mut store = MemoryStore::new();
    store.save(&song).unwrap();
    store.save(&imported).unwrap();
    assert_eq!(store.len(), 2);
}

/// A record with a bad note is rejected whole; nothing partial imports
#[test]
fn test_import_is_all_or_nothing() {
    let json = r#"{
        "id": "abc", "name": "Mixed", "bpm": 120, "duration": 4.0,
        "notes": [
            {"key": 3, "startTime": 0.0, "duration": 1.0, "velocity": 100},
            {"key": 3, "startTime": 2.0, "duration": -1.0, "velocity": 100}
        ]
    }"#;
    assert!(import_json(json).is_err());
}
