//! Block module - a single unit cube
//!
//! A block has exactly one owner at a time: the active piece (position is a local
//! offset), the play field grid (position is its cell), or the breaking pool.
//! Ownership moves by value between those containers; blocks are never shared.

use crate::types::{IVec3, PieceKind};

/// Unique identity of a block for the lifetime of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// A unit cube
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: BlockId,
    /// Piece the block was spawned with (drives colour in presentation)
    pub kind: PieceKind,
    /// Local offset while part of a piece, world cell once locked
    pub position: IVec3,
}

impl Block {
    pub fn new(id: BlockId, kind: PieceKind, position: IVec3) -> Self {
        Self { id, kind, position }
    }
}

/// Monotonic block id source
#[derive(Debug, Clone, Default)]
pub struct BlockIds {
    next: u32,
}

impl BlockIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> BlockId {
        let id = BlockId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u32 {
        self.next
    }
}
