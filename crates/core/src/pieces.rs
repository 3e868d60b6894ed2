//! Pieces module - tetracube shapes
//!
//! Each shape is a set of block offsets around a pivot block at the origin.
//! Rotations turn the offsets around that pivot (see [`crate::rotation`]).

use crate::types::{IVec3, PieceKind};

/// Shape of a piece - 4 block offsets from the pivot
pub type PieceShape = [IVec3; 4];

const fn v(x: i32, y: i32, z: i32) -> IVec3 {
    IVec3::new(x, y, z)
}

/// Get the spawn shape (block offsets) for a piece kind
pub fn get_shape(kind: PieceKind) -> PieceShape {
    match kind {
        // Standing upright so it drops into a single column
        PieceKind::I => [v(0, -1, 0), v(0, 0, 0), v(0, 1, 0), v(0, 2, 0)],
        PieceKind::O => [v(0, 0, 0), v(1, 0, 0), v(0, 0, 1), v(1, 0, 1)],
        PieceKind::T => [v(-1, 0, 0), v(0, 0, 0), v(1, 0, 0), v(0, 0, 1)],
        PieceKind::L => [v(-1, 0, 0), v(0, 0, 0), v(1, 0, 0), v(1, 0, 1)],
        PieceKind::S => [v(-1, 0, 0), v(0, 0, 0), v(0, 0, 1), v(1, 0, 1)],
        PieceKind::Branch => [v(0, 0, 0), v(1, 0, 0), v(0, 0, 1), v(0, 1, 0)],
        PieceKind::LeftScrew => [v(0, 0, 0), v(1, 0, 0), v(1, 1, 0), v(1, 1, -1)],
        PieceKind::RightScrew => [v(0, 0, 0), v(1, 0, 0), v(1, 1, 0), v(1, 1, 1)],
    }
}

/// Highest block-local Y of a shape, never below 0
pub fn top_offset(offsets: &[IVec3]) -> i32 {
    offsets.iter().map(|o| o.y).fold(0, i32::max)
}
