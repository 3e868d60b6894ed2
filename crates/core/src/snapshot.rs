//! Serializable view of a game for renderers, tools and tests

use serde::{Deserialize, Serialize};

use crate::types::{GamePhase, IVec3, PieceKind};

/// A locked block as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub position: IVec3,
    pub kind: PieceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub position: IVec3,
    /// World cells of every block
    pub cells: Vec<IVec3>,
    /// Cells left to fall before landing
    pub landing_distance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub blocks: Vec<CellSnapshot>,
    pub breaking: u32,
    pub active: Option<ActiveSnapshot>,
    pub next: Option<PieceKind>,
    pub seed: u32,
    pub score: u64,
    pub difficulty: f64,
    pub pieces_placed: u32,
    pub planes_cleared: u32,
}

impl GameSnapshot {
    /// Reset to an empty snapshot, keeping allocated capacity
    pub fn clear(&mut self) {
        self.phase = GamePhase::Initializing;
        self.width = 0;
        self.height = 0;
        self.depth = 0;
        self.blocks.clear();
        self.breaking = 0;
        self.active = None;
        self.next = None;
        self.seed = 0;
        self.score = 0;
        self.difficulty = 0.0;
        self.pieces_placed = 0;
        self.planes_cleared = 0;
    }

    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            phase: GamePhase::Initializing,
            width: 0,
            height: 0,
            depth: 0,
            blocks: Vec::new(),
            breaking: 0,
            active: None,
            next: None,
            seed: 0,
            score: 0,
            difficulty: 0.0,
            pieces_placed: 0,
            planes_cleared: 0,
        }
    }
}
