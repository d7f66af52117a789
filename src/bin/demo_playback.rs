// Demo: build a song, persist it, and simulate a playback session
// driven by a manual tick source

use beatgrid::store::{FileStore, SongStore, export_json};
use beatgrid::timeline::{AddOutcome, Song};
use beatgrid::tone::RecordingTone;
use beatgrid::{NotificationHub, PlaybackScheduler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== beatgrid playback demo ===\n");

    // Build a small ascending phrase
    let mut song = Song::new("Demo Phrase");
    for (i, key) in [1u8, 3, 5, 8].iter().enumerate() {
        song = match song.add_note(*key, i as f64, 1.0, 100)? {
            AddOutcome::Added { song, .. } => song,
            AddOutcome::Duplicate => song,
        };
    }
    println!(
        "Built '{}': {} notes, {} beats at {}",
        song.name,
        song.note_count(),
        song.duration_beats,
        song.tempo
    );

    // Persist and reload through the file store
    let dir = std::env::temp_dir().join("beatgrid-demo");
    let mut store = FileStore::open(&dir)?;
    store.save(&song)?;
    let loaded = store.load(song.id)?;
    println!("Saved and reloaded from {:?}", store.dir());

    // Interchange record
    println!("\nExport record:\n{}\n", export_json(&loaded)?);

    // Simulate playback: tick every 50 ms of simulated time
    let mut scheduler = PlaybackScheduler::new(loaded);
    let mut tone = RecordingTone::new();
    let mut hub = NotificationHub::new();

    scheduler.start(0);
    let mut now_ms = 0u64;
    while scheduler.is_running() {
        for event in scheduler.on_tick(now_ms, &mut tone, &mut hub) {
            println!("t={:>5} ms  {:?}", now_ms, event);
        }
        now_ms += 50;
    }

    println!("\nDispatched {} tones:", tone.calls.len());
    for call in &tone.calls {
        println!(
            "  key {:>2}  {:.2} s  velocity {}",
            call.key, call.duration_seconds, call.velocity
        );
    }

    store.delete(song.id)?;
    println!("\nCleaned up. Done.");
    Ok(())
}
