//! Game state module - the lifecycle of one game
//!
//! Ties the field, the active and upcoming pieces, the piece generator and the
//! score/difficulty rules together. The state owns no frame loop: the driver calls
//! [`GameState::tick`] with elapsed time and feeds input through
//! [`GameState::apply_action`] and [`GameState::apply_drag`].
//!
//! Landing order matters for scoring:
//! 1. lock the piece's blocks into the field
//! 2. award placement points, then raise difficulty
//! 3. clear filled planes, award clear points at the raised difficulty, raise again
//! 4. promote the upcoming piece; if it overlaps the stack the game is over

use std::fmt;

use tracing::{debug, info};

use crate::block::BlockIds;
use crate::config::GameConfig;
use crate::field::PlayField;
use crate::piece::{Piece, TickOutcome};
use crate::rng::PieceGenerator;
use crate::scoring::{piece_placed_score, plane_clear_difficulty, plane_clear_score, Difficulty};
use crate::snapshot::{ActiveSnapshot, CellSnapshot, GameSnapshot};
use crate::types::*;

/// Final numbers of a finished game
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSummary {
    pub score: u64,
    pub difficulty: f64,
    pub pieces_placed: u32,
    pub planes_cleared: u32,
    pub seed: u32,
}

/// Notified once when a game ends
pub trait GameOverObserver {
    fn on_game_over(&mut self, summary: &GameSummary);
}

impl<F> GameOverObserver for F
where
    F: FnMut(&GameSummary),
{
    fn on_game_over(&mut self, summary: &GameSummary) {
        self(summary)
    }
}

/// Complete game state
pub struct GameState {
    config: GameConfig,
    phase: GamePhase,
    field: PlayField,
    active: Option<Piece>,
    next: Option<Piece>,
    generator: PieceGenerator,
    block_ids: BlockIds,
    score: u64,
    /// Score as last shown; frozen once the game is over
    displayed_score: u64,
    difficulty: Difficulty,
    pieces_placed: u32,
    planes_cleared: u32,
    elapsed_secs: f32,
    events: Vec<GameEvent>,
    observers: Vec<Box<dyn GameOverObserver>>,
}

impl GameState {
    /// Create a game from `config` (validated here) and an RNG seed
    ///
    /// The first upcoming piece is drawn immediately; nothing falls until [`start`](Self::start).
    pub fn new(config: GameConfig, seed: u32) -> Self {
        let config = config.validated();
        let field =
            PlayField::with_break_time(config.width, config.height, config.depth, config.block_break_secs);
        let generator = PieceGenerator::new(seed, &config.piece_set);
        let difficulty = Difficulty::new(config.initial_difficulty);

        let mut state = Self {
            config,
            phase: GamePhase::Initializing,
            field,
            active: None,
            next: None,
            generator,
            block_ids: BlockIds::new(),
            score: 0,
            displayed_score: 0,
            difficulty,
            pieces_placed: 0,
            planes_cleared: 0,
            elapsed_secs: 0.0,
            events: Vec::with_capacity(16),
            observers: Vec::new(),
        };
        state.next = Some(state.spawn_next());
        state
    }

    /// Start the game and activate the first piece
    ///
    /// Returns false if the game was already started.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Initializing {
            return false;
        }
        self.phase = GamePhase::Playing;
        info!(
            seed = self.generator.seed(),
            width = self.field.width(),
            height = self.field.height(),
            depth = self.field.depth(),
            "game started"
        );
        self.go_to_next_piece();
        true
    }

    /// Alias of [`start`](Self::start)
    pub fn start_game(&mut self) -> bool {
        self.start()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn field(&self) -> &PlayField {
        &self.field
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    /// The upcoming piece, staged off-field
    pub fn next(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn displayed_score(&self) -> u64 {
        self.displayed_score
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty.get()
    }

    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    pub fn planes_cleared(&self) -> u32 {
        self.planes_cleared
    }

    /// Simulated seconds, including scaled time while paused
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    pub fn seed(&self) -> u32 {
        self.generator.seed()
    }

    /// Current fall delay for the active piece
    pub fn movement_delay(&self, fast_fall: bool) -> f32 {
        Piece::movement_delay(self.difficulty.get(), fast_fall)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            difficulty: self.difficulty.get(),
            pieces_placed: self.pieces_placed,
            planes_cleared: self.planes_cleared,
            seed: self.generator.seed(),
        }
    }

    /// Drain the events emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Register a callback for the end of the game
    pub fn register_game_over_observer(&mut self, observer: impl GameOverObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn spawn_next(&mut self) -> Piece {
        let kind = self.generator.draw();
        let mut piece = Piece::spawn(kind, &self.field, &mut self.block_ids);
        piece.stage(self.config.next_piece_position);
        debug!(kind = kind.as_str(), "next piece drawn");
        piece
    }

    /// Settle the previous landing and bring in the upcoming piece
    ///
    /// Clears filled planes (scoring them), promotes the staged piece and draws a new
    /// one. If the promoted piece overlaps the stack the game ends instead and no new
    /// piece is drawn.
    pub fn go_to_next_piece(&mut self) {
        let cleared = self.field.check_and_clear_filled_planes();
        if cleared > 0 {
            self.planes_cleared += cleared;
            self.events.push(GameEvent::PlanesCleared { count: cleared });
            let difficulty = self.difficulty.get();
            self.add_score(plane_clear_score(
                cleared,
                self.config.score_on_plane_clear_factor,
                difficulty,
            ));
            self.increase_difficulty(plane_clear_difficulty(
                cleared,
                self.config.difficulty_increment_on_plane_clear,
            ));
            debug!(planes = cleared, score = self.score, "planes cleared");
        }

        if let Some(mut old) = self.active.take() {
            old.deactivate();
        }

        let Some(mut piece) = self.next.take() else {
            return;
        };
        piece.activate();
        self.events.push(GameEvent::PieceSpawned(piece.kind()));

        if piece.check_current_collision(&self.field) {
            piece.deactivate();
            self.active = Some(piece);
            self.set_game_over();
            return;
        }

        debug!(kind = piece.kind().as_str(), "piece spawned");
        self.active = Some(piece);
        self.next = Some(self.spawn_next());
    }

    /// End the game and notify observers; later calls do nothing
    pub fn set_game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        if self.phase == GamePhase::Paused {
            self.events.push(GameEvent::Paused(false));
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver);

        let summary = self.summary();
        info!(
            score = summary.score,
            difficulty = summary.difficulty,
            pieces = summary.pieces_placed,
            planes = summary.planes_cleared,
            "game over"
        );
        for observer in &mut self.observers {
            observer.on_game_over(&summary);
        }
    }

    /// Add points; the displayed score only follows while the game is running
    pub fn add_score(&mut self, delta: u64) {
        self.score = self.score.saturating_add(delta);
        if self.phase != GamePhase::GameOver {
            self.displayed_score = self.score;
            self.events.push(GameEvent::ScoreChanged(self.score));
        }
    }

    /// Set difficulty; values below the initial difficulty are raised to it
    pub fn set_difficulty(&mut self, value: f64) {
        self.difficulty.set(value);
        self.events
            .push(GameEvent::DifficultyChanged(self.difficulty.get()));
    }

    fn increase_difficulty(&mut self, by: f64) {
        self.difficulty.increase(by);
        self.events
            .push(GameEvent::DifficultyChanged(self.difficulty.get()));
    }

    /// Main game tick - breaking blocks, gravity and landing
    ///
    /// While paused time runs at `pause_time_scale`. Returns true if the active piece
    /// fell or landed.
    pub fn tick(&mut self, dt: f32, fast_fall: bool) -> bool {
        let dt = match self.phase {
            GamePhase::Initializing => return false,
            GamePhase::GameOver => {
                self.field.update(dt);
                return false;
            }
            GamePhase::Paused => dt * self.config.pause_time_scale,
            GamePhase::Playing => dt,
        };

        self.elapsed_secs += dt;
        self.field.update(dt);

        let difficulty = self.difficulty.get();
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        match active.tick(dt, difficulty, fast_fall, &self.field) {
            TickOutcome::Idle => false,
            TickOutcome::Fell => true,
            TickOutcome::Landed => {
                self.on_landing();
                true
            }
        }
    }

    fn on_landing(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let locked = self.field.add_blocks(piece.into_blocks());
        self.pieces_placed += 1;
        self.events.push(GameEvent::Landed {
            blocks: locked as u32,
        });

        self.add_score(piece_placed_score(
            self.config.score_on_piece_placed_factor,
            self.difficulty.get(),
        ));
        self.increase_difficulty(self.config.difficulty_increment_on_piece_placed);

        self.go_to_next_piece();
    }

    /// Apply a game action; returns true if it changed anything
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if action == GameAction::Pause {
            return self.toggle_pause();
        }

        let playing = self.phase == GamePhase::Playing;
        let field = &self.field;
        let Some(piece) = self.active.as_mut().filter(|p| playing && p.is_active()) else {
            return false;
        };

        let (collided, event) = match action {
            GameAction::Rotate(direction) => (
                piece.attempt_rotate(direction, field),
                GameEvent::Rotated(direction),
            ),
            _ => match action.shift() {
                Some(shift) => (
                    piece.attempt_move(shift.offset(), field),
                    GameEvent::Moved(shift),
                ),
                None => return false,
            },
        };

        self.events
            .push(if collided { GameEvent::Collided } else { event });
        !collided
    }

    /// Feed pointer drag deltas to the active piece; returns true if it rotated
    pub fn apply_drag(&mut self, dx: f32, dy: f32) -> bool {
        let playing = self.phase == GamePhase::Playing;
        let sensitivity = self.config.drag_sensitivity;
        let field = &self.field;
        let Some(piece) = self.active.as_mut().filter(|p| playing && p.is_active()) else {
            return false;
        };

        let mut rotated = false;
        for (direction, collided) in piece.apply_drag(Vec2::new(dx, dy), sensitivity, field) {
            if collided {
                self.events.push(GameEvent::Collided);
            } else {
                rotated = true;
                self.events.push(GameEvent::Rotated(direction));
            }
        }
        rotated
    }

    /// Toggle between playing and paused; no effect in any other phase
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            _ => return false,
        };
        let paused = self.is_paused();
        debug!(paused, "pause toggled");
        self.events.push(GameEvent::Paused(paused));
        true
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.phase = self.phase;
        out.width = self.field.width();
        out.height = self.field.height();
        out.depth = self.field.depth();

        out.blocks.clear();
        out.blocks.extend(self.field.blocks().map(|b| CellSnapshot {
            position: b.position,
            kind: b.kind,
        }));
        out.breaking = self.field.breaking().len() as u32;

        out.active = self.active.as_ref().map(|p| ActiveSnapshot {
            kind: p.kind(),
            position: p.position(),
            cells: p.world_cells().collect(),
            landing_distance: p.landing_distance(&self.field),
        });
        out.next = self.next.as_ref().map(Piece::kind);
        out.seed = self.generator.seed();
        out.score = self.displayed_score;
        out.difficulty = self.difficulty.get();
        out.pieces_placed = self.pieces_placed;
        out.planes_cleared = self.planes_cleared;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("phase", &self.phase)
            .field("field", &self.field)
            .field("active", &self.active)
            .field("next", &self.next)
            .field("score", &self.score)
            .field("displayed_score", &self.displayed_score)
            .field("difficulty", &self.difficulty)
            .field("pieces_placed", &self.pieces_placed)
            .field("planes_cleared", &self.planes_cleared)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default(), 1)
    }
}
