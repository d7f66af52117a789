// Game session - spawns falling tiles ahead of time and judges player
// hits against timing windows

use crate::game::score::{Judgement, ScoreBoard};
use crate::timeline::{Note, NoteId, Song, Tempo};

/// Half-width of the hit-zone band around the ideal hit line,
/// as a fraction of the tile approach
pub const HIT_BAND: f64 = Judgement::GOOD_WINDOW;

/// A tile whose leading edge gets this far unconsumed is missed
pub const FAR_BOUNDARY: f64 = 1.0 + HIT_BAND;

/// Tunables for one game session
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// How far ahead of its beat a tile spawns, in beats
    pub lookahead_beats: f64,
    /// Fall-speed multiplier; 1.0 puts a tile on the hit line exactly
    /// at its note's beat
    pub fall_speed: f64,
    /// How long consumed/missed tiles linger on screen, in milliseconds
    pub miss_grace_ms: u64,
    /// Delay between the last tile resolving and "session over"
    pub end_grace_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lookahead_beats: 2.0,
            fall_speed: 1.0,
            miss_grace_ms: 400,
            end_grace_ms: 600,
        }
    }
}

/// Lifecycle of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Falling,
    Hit(Judgement),
    Missed,
}

/// One falling tile: the gameplay-only stand-in for a note
///
/// `progress` runs from 0.0 at spawn to 1.0 at the ideal hit line.
#[derive(Debug, Clone)]
pub struct Tile {
    pub note_id: NoteId,
    pub key: u8,
    pub duration_beats: f64,
    /// The beat this tile should be hit on
    pub target_beat: f64,
    pub progress: f64,
    pub state: TileState,
    /// When a resolved tile leaves the screen (visual grace period)
    retire_at_ms: Option<u64>,
}

impl Tile {
    fn is_live(&self) -> bool {
        self.state == TileState::Falling
    }

    /// Distance from the ideal hit line
    fn distance(&self) -> f64 {
        (self.progress - 1.0).abs()
    }
}

/// Events emitted by the game session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TileSpawned(NoteId),
    TileJudged {
        note_id: NoteId,
        judgement: Judgement,
    },
    TileMissed(NoteId),
    /// A column hit that matched no tile in the hit band
    Whiff {
        key: u8,
    },
    SessionOver {
        score: u32,
        accuracy: f64,
    },
}

/// Gameplay-mode consumer of a song snapshot
pub struct GameSession {
    /// Canonical-order snapshot taken at session start
    notes: Vec<Note>,
    tempo: Tempo,
    config: GameConfig,
    spawn_cursor: usize,
    tiles: Vec<Tile>,
    pub board: ScoreBoard,
    start_ms: Option<u64>,
    last_elapsed_beats: f64,
    /// Set when the last note has spawned and no live tile remains
    exhausted_since_ms: Option<u64>,
    over: bool,
}

impl GameSession {
    pub fn new(song: &Song, config: GameConfig) -> Self {
        Self {
            notes: song.sorted_notes(),
            tempo: song.tempo,
            config,
            spawn_cursor: 0,
            tiles: Vec::new(),
            board: ScoreBoard::new(),
            start_ms: None,
            last_elapsed_beats: 0.0,
            exhausted_since_ms: None,
            over: false,
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        self.start_ms = Some(now_ms);
        self.last_elapsed_beats = 0.0;
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Tiles currently on screen, resolved ones included until they retire
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Advance the session to `now_ms`: spawn, fall, miss, retire, end
    pub fn on_tick(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let Some(start_ms) = self.start_ms else {
            return Vec::new();
        };
        if self.over {
            return Vec::new();
        }

        let elapsed_beats = self
            .tempo
            .ms_to_beats(now_ms.saturating_sub(start_ms) as f64);
        let delta_beats = elapsed_beats - self.last_elapsed_beats;
        self.last_elapsed_beats = elapsed_beats;

        let mut events = Vec::new();

        // Fall: advance every unconsumed tile proportionally to fall speed
        let step = delta_beats / self.config.lookahead_beats * self.config.fall_speed;
        for tile in self.tiles.iter_mut().filter(|t| t.is_live()) {
            tile.progress += step;
        }

        // Spawn everything due within the lookahead window
        while let Some(note) = self.notes.get(self.spawn_cursor) {
            let spawn_beat = note.start_beat - self.config.lookahead_beats;
            if spawn_beat > elapsed_beats {
                break;
            }
            // A late first tick spawns the tile already part-way down
            let progress =
                (elapsed_beats - spawn_beat) / self.config.lookahead_beats * self.config.fall_speed;
            self.tiles.push(Tile {
                note_id: note.id,
                key: note.key,
                duration_beats: note.duration_beats,
                target_beat: note.start_beat,
                progress,
                state: TileState::Falling,
                retire_at_ms: None,
            });
            events.push(GameEvent::TileSpawned(note.id));
            self.spawn_cursor += 1;
        }

        // Tiles past the far boundary are missed; combo resets
        for tile in self.tiles.iter_mut() {
            if tile.is_live() && tile.progress >= FAR_BOUNDARY {
                tile.state = TileState::Missed;
                tile.retire_at_ms = Some(now_ms + self.config.miss_grace_ms);
                self.board.register_miss();
                events.push(GameEvent::TileMissed(tile.note_id));
            }
        }

        // Drop resolved tiles whose grace period has passed
        self.tiles
            .retain(|t| t.retire_at_ms.is_none_or(|deadline| now_ms < deadline));

        // Session over once notes are exhausted and no live tile remains,
        // after a short grace delay
        let exhausted =
            self.spawn_cursor >= self.notes.len() && self.tiles.iter().all(|t| !t.is_live());
        if exhausted {
            match self.exhausted_since_ms {
                None => self.exhausted_since_ms = Some(now_ms),
                Some(since) if now_ms >= since + self.config.end_grace_ms => {
                    self.over = true;
                    events.push(GameEvent::SessionOver {
                        score: self.board.score,
                        accuracy: self.board.accuracy(),
                    });
                }
                Some(_) => {}
            }
        } else {
            self.exhausted_since_ms = None;
        }

        events
    }

    /// Player input: hit column `key`
    ///
    /// Judges the nearest live tile in that column inside the hit band;
    /// a click matching no tile is a whiff with no scoring effect.
    pub fn hit_column(&mut self, key: u8, now_ms: u64) -> Vec<GameEvent> {
        if self.start_ms.is_none() || self.over {
            return Vec::new();
        }

        let candidate = self
            .tiles
            .iter_mut()
            .filter(|t| t.is_live() && t.key == key && t.distance() <= HIT_BAND)
            .min_by(|a, b| a.distance().total_cmp(&b.distance()));

        let Some(tile) = candidate else {
            return vec![GameEvent::Whiff { key }];
        };

        match Judgement::classify(tile.distance()) {
            Some(judgement) => {
                tile.state = TileState::Hit(judgement);
                tile.retire_at_ms = Some(now_ms + self.config.miss_grace_ms);
                self.board.register_hit(judgement);
                vec![GameEvent::TileJudged {
                    note_id: tile.note_id,
                    judgement,
                }]
            }
            // Exactly on the band edge: not consumable
            None => vec![GameEvent::Whiff { key }],
        }
    }
}
