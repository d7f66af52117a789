//! Playback sessions driven through the tick-source contract

use beatgrid::notify::NotificationHub;
use beatgrid::playback::{PlaybackEvent, PlaybackScheduler};
use beatgrid::tick::{ManualTickSource, TickSource};
use beatgrid::timeline::{AddOutcome, Song};
use beatgrid::tone::RecordingTone;
use std::cell::RefCell;
use std::rc::Rc;

fn song_with(notes: &[(u8, f64, f64, u8)]) -> Song {
    let mut song = Song::new("Playback");
    for (key, start, duration, velocity) in notes {
        song = match song.add_note(*key, *start, *duration, *velocity).unwrap() {
            AddOutcome::Added { song, .. } => song,
            AddOutcome::Duplicate => panic!("duplicate in fixture"),
        };
    }
    song
}

/// Spec scenario: 120 BPM, one note at beat 0. One tone of ~0.5 s at
/// t=0, and nothing more for that note, ever.
#[test]
fn test_single_note_plays_exactly_once() {
    let song = song_with(&[(1, 0.0, 1.0, 100)]);
    let mut scheduler = PlaybackScheduler::new(song);
    let mut tone = RecordingTone::new();
    let mut hub = NotificationHub::new();

    scheduler.start(0);
    scheduler.on_tick(0, &mut tone, &mut hub);

    assert_eq!(tone.calls.len(), 1);
    assert_eq!(tone.calls[0].key, 1);
    assert!((tone.calls[0].duration_seconds - 0.5).abs() < 1e-9);
    assert_eq!(tone.calls[0].velocity, 100);

    for t in [400, 450, 900, 1800] {
        scheduler.on_tick(t, &mut tone, &mut hub);
    }
    assert_eq!(tone.calls.len(), 1);
}

/// Every note fires at most once across a whole session, regardless of
/// tick cadence
#[test]
fn test_at_most_one_dispatch_per_note() {
    let song = song_with(&[
        (1, 0.0, 0.5, 100),
        (3, 0.5, 0.5, 90),
        (5, 1.0, 1.0, 80),
        (8, 2.5, 0.25, 127),
    ]);
    let mut scheduler = PlaybackScheduler::new(song);
    let mut tone = RecordingTone::new();
    let mut hub = NotificationHub::new();

    scheduler.start(0);
    // Irregular cadence: fast bursts and long gaps
    let mut finished = false;
    for t in [0, 10, 20, 300, 310, 900, 1700, 1710, 2400, 2500] {
        for event in scheduler.on_tick(t, &mut tone, &mut hub) {
            if event == PlaybackEvent::Finished {
                finished = true;
            }
        }
    }

    assert_eq!(tone.calls.len(), 4);
    assert!(finished);
}

/// Pause freezes the beat clock; resume continues with no jump
#[test]
fn test_pause_resume_has_no_discontinuity() {
    let song = song_with(&[(1, 0.0, 1.0, 100), (5, 2.5, 1.0, 100)]);
    let mut scheduler = PlaybackScheduler::new(song);
    let mut tone = RecordingTone::new();
    let mut hub = NotificationHub::new();

    scheduler.start(0);
    scheduler.on_tick(600, &mut tone, &mut hub);
    let frozen = {
        scheduler.pause(700);
        scheduler.elapsed_beats()
    };
    assert!((frozen - 1.4).abs() < 1e-9);

    // A long pause changes nothing
    scheduler.on_tick(60_000, &mut tone, &mut hub);
    assert_eq!(scheduler.elapsed_beats(), frozen);

    // One tick after resuming, elapsed has advanced by one tick's delta
    scheduler.resume(90_000);
    scheduler.on_tick(90_050, &mut tone, &mut hub);
    assert!((scheduler.elapsed_beats() - (frozen + 0.1)).abs() < 1e-9);

    // Only the not-yet-played note fires after resume
    scheduler.on_tick(90_600, &mut tone, &mut hub);
    assert_eq!(tone.calls.len(), 2);
    assert_eq!(tone.calls[1].key, 5);
}

/// The scheduler works unchanged when driven through a tick source
#[test]
fn test_scheduler_behind_tick_source() {
    let song = song_with(&[(2, 0.0, 1.0, 100), (4, 1.0, 1.0, 100)]);
    let scheduler = Rc::new(RefCell::new(PlaybackScheduler::new(song)));
    let tone = Rc::new(RefCell::new(RecordingTone::new()));
    let events = Rc::new(RefCell::new(Vec::new()));

    let mut source = ManualTickSource::new();
    let handle = {
        let scheduler = Rc::clone(&scheduler);
        let tone = Rc::clone(&tone);
        let events = Rc::clone(&events);
        source.register(Box::new(move |now_ms| {
            let mut hub = NotificationHub::new();
            let fired =
                scheduler
                    .borrow_mut()
                    .on_tick(now_ms, &mut *tone.borrow_mut(), &mut hub);
            events.borrow_mut().extend(fired);
        }))
    };

    scheduler.borrow_mut().start(0);
    let mut now = 0;
    while scheduler.borrow().is_running() {
        source.fire(now);
        now += 50;
    }
    source.cancel(handle);

    assert_eq!(tone.borrow().calls.len(), 2);
    assert!(events.borrow().contains(&PlaybackEvent::Finished));
    // Cancelled: firing again reaches nobody
    source.fire(now);
    assert_eq!(events.borrow().len(), 3);
}

/// Explicit stop resets like a natural finish, without emitting Finished
#[test]
fn test_stop_resets_session() {
    let song = song_with(&[(1, 0.0, 1.0, 100)]);
    let mut scheduler = PlaybackScheduler::new(song);
    let mut tone = RecordingTone::new();
    let mut hub = NotificationHub::new();

    scheduler.start(0);
    scheduler.on_tick(100, &mut tone, &mut hub);
    scheduler.stop();

    assert!(!scheduler.is_running());
    assert_eq!(scheduler.elapsed_beats(), 0.0);
    assert_eq!(scheduler.played_count(), 0);

    // A fresh start replays from the top
    scheduler.start(10_000);
    scheduler.on_tick(10_000, &mut tone, &mut hub);
    assert_eq!(tone.calls.len(), 2);
}
