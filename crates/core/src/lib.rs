//! Core game logic - pure, deterministic, and testable
//!
//! Everything needed to simulate a game of 3D falling blocks without any rendering,
//! input devices or timers of its own. The driver owns the frame loop and calls in.
//!
//! - **Deterministic**: the same seed and the same inputs produce the same game
//! - **Headless**: file I/O is limited to loading config and the high-score table
//! - **Fixed buffers**: collision candidates live on the stack
//!
//! # Module Structure
//!
//! - [`rotation`]: 90° integer rotations around the principal axes
//! - [`pieces`]: the eight tetracube shapes
//! - [`piece`]: the falling piece (movement, rotation, gravity, visual smoothing)
//! - [`field`]: the 3D grid of locked blocks and plane clearing
//! - [`breaking`]: blocks knocked out by a plane clear, on their way out
//! - [`game_state`]: the game lifecycle, scoring and difficulty
//! - [`scoring`]: score and difficulty formulas
//! - [`rng`]: seeded generator and piece draws
//! - [`config`]: tunables, loadable from JSON
//! - [`snapshot`]: serializable view of a game
//! - [`scoreboard`]: persistent high-score table
//!
//! # Game Rules
//!
//! - The field is `width x height x depth` cells; the floor and the four walls are solid,
//!   the space above the top plane is open.
//! - A piece falls one cell every `1 / difficulty` seconds (`0.1 / difficulty` when fast
//!   falling) and locks when it can't fall any further.
//! - A plane whose every cell is occupied is cleared and everything above drops by one.
//! - The game ends when a freshly spawned piece overlaps the stack.
//!
//! # Example
//!
//! ```
//! use cubefall_core::{GameConfig, GameState};
//! use cubefall_core::types::{GameAction, RotationDirection};
//!
//! let mut game = GameState::new(GameConfig::default(), 12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveLeft);
//! game.apply_action(GameAction::Rotate(RotationDirection::XBackwards));
//!
//! // Fast fall until the first piece lands
//! while game.pieces_placed() == 0 {
//!     game.tick(0.1, true);
//! }
//! assert!(game.score() > 0);
//! ```

pub mod block;
pub mod breaking;
pub mod config;
pub mod field;
pub mod game_state;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod rotation;
pub mod scoreboard;
pub mod scoring;
pub mod snapshot;

pub use cubefall_types as types;

pub use block::{Block, BlockId, BlockIds};
pub use breaking::{BreakingBlock, BreakingPool};
pub use config::{ConfigError, GameConfig};
pub use field::{AddOutcome, PlayField};
pub use game_state::{GameOverObserver, GameState, GameSummary};
pub use piece::{Piece, TickOutcome, VisualTransform};
pub use pieces::get_shape;
pub use rng::{PieceGenerator, SimpleRng};
pub use scoreboard::{HighScore, HighScoreTable, ScoreboardError};
pub use snapshot::{ActiveSnapshot, CellSnapshot, GameSnapshot};
