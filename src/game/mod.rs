// Gameplay mode - falling-tile spawner and timing-window scorer

pub mod score;
pub mod session;

pub use score::{Judgement, ScoreBoard};
pub use session::{GameConfig, GameEvent, GameSession, Tile, TileState};
