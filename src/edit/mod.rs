// Edit engine - tool state machine, selection, and undo/redo history

pub mod engine;
pub mod history;
pub mod session;

pub use engine::{DEFAULT_VELOCITY, EditEngine, EditEvent, EditKey, GridEvent, Modifiers};
pub use history::History;
pub use session::{DragState, EditSession, PencilDuration, Tool};
