//! Greedy placement search for headless play
//!
//! Every orientation reachable with up to three quarter turns at the spawn position
//! is tried in every column. Each candidate is dropped on a copy of the piece and
//! rated by the planes it would complete, how tall the stack gets and how many
//! cells it would cover up.

use arrayvec::ArrayVec;
use tracing::trace;

use cubefall_core::{GameState, Piece, PlayField};
use cubefall_types::{GamePhase, IVec3, RotationDirection, MAX_PIECE_BLOCKS};

use crate::place::{apply_place, PlaceError};

/// Any of the 24 orientations of a cube is at most three quarter turns away
const MAX_TURNS: usize = 3;

const PLANE_WEIGHT: f64 = 100.0;
const HEIGHT_WEIGHT: f64 = 1.0;
const HOLE_WEIGHT: f64 = 4.0;
const LANDING_WEIGHT: f64 = 0.5;

type Offsets = ArrayVec<IVec3, MAX_PIECE_BLOCKS>;

/// A chosen placement for the active piece
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub rotations: ArrayVec<RotationDirection, MAX_TURNS>,
    pub x: i32,
    pub z: i32,
    /// Planes the landing would complete
    pub planes: u32,
    pub rating: f64,
}

fn sorted_offsets(piece: &Piece) -> Offsets {
    let mut offsets: Offsets = piece.offsets().collect();
    offsets.sort_unstable();
    offsets
}

/// Distinct orientations reachable from the spawn position, with the turns to get there
fn orientations(
    piece: &Piece,
    field: &PlayField,
) -> Vec<(ArrayVec<RotationDirection, MAX_TURNS>, Piece)> {
    let mut seen: Vec<Offsets> = vec![sorted_offsets(piece)];
    let mut found = vec![(ArrayVec::new(), piece.clone())];
    let mut frontier = 0;

    while frontier < found.len() {
        let (turns, current) = found[frontier].clone();
        frontier += 1;
        if turns.len() == MAX_TURNS {
            continue;
        }
        for direction in RotationDirection::ALL {
            let mut candidate = current.clone();
            if candidate.attempt_rotate(direction, field) {
                continue;
            }
            let key = sorted_offsets(&candidate);
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            let mut path = turns.clone();
            path.push(direction);
            found.push((path, candidate));
        }
    }
    found
}

/// Move a copy of `piece` to the column, the same way [`apply_place`] does
fn shifted(piece: &Piece, field: &PlayField, x: i32, z: i32) -> Option<Piece> {
    let mut moved = piece.clone();
    let anchor = moved.position();
    let steps = [
        (x - anchor.x, IVec3::new(1, 0, 0)),
        (z - anchor.z, IVec3::new(0, 0, 1)),
    ];
    for (delta, unit) in steps {
        let step = if delta > 0 { unit } else { -unit };
        for _ in 0..delta.unsigned_abs() {
            if moved.attempt_move(step, field) {
                return None;
            }
        }
    }
    Some(moved)
}

fn rate(cells: &[IVec3], field: &PlayField) -> (u32, f64) {
    let plane_len = (field.width() * field.depth()) as usize;

    let mut planes = 0;
    let mut levels: ArrayVec<i32, MAX_PIECE_BLOCKS> = ArrayVec::new();
    for c in cells {
        if !levels.contains(&c.y) {
            levels.push(c.y);
        }
    }
    for &y in &levels {
        let added = cells.iter().filter(|c| c.y == y).count();
        if field.plane_fill(y) + added >= plane_len {
            planes += 1;
        }
    }

    let holes = cells
        .iter()
        .filter(|c| {
            let below = **c + IVec3::DOWN;
            below.y >= 0 && !field.is_solid(below) && !cells.contains(&below)
        })
        .count();

    let top = cells.iter().map(|c| c.y + 1).max().unwrap_or(0);
    let stack = (0..field.width())
        .flat_map(|x| (0..field.depth()).map(move |z| (x, z)))
        .map(|(x, z)| field.column_height(x, z))
        .max()
        .unwrap_or(0)
        .max(top);
    let landing = cells.iter().map(|c| c.y as f64).sum::<f64>() / cells.len().max(1) as f64;

    let rating = planes as f64 * PLANE_WEIGHT
        - (stack - planes as i32) as f64 * HEIGHT_WEIGHT
        - holes as f64 * HOLE_WEIGHT
        - landing * LANDING_WEIGHT;
    (planes, rating)
}

/// Best placement for the active piece, or `None` if there is nothing to place
pub fn plan(state: &GameState) -> Option<Placement> {
    if state.phase() != GamePhase::Playing {
        return None;
    }
    let piece = state.active().filter(|p| p.is_active())?;
    let field = state.field();

    let mut best: Option<Placement> = None;
    for (rotations, oriented) in orientations(piece, field) {
        for x in 0..field.width() {
            for z in 0..field.depth() {
                let Some(moved) = shifted(&oriented, field, x, z) else {
                    continue;
                };
                let drop = IVec3::new(0, -(moved.landing_distance(field) as i32), 0);
                let cells: Offsets = moved.world_cells().map(|c| c + drop).collect();
                let (planes, rating) = rate(&cells, field);

                if best.as_ref().map_or(true, |b| rating > b.rating) {
                    best = Some(Placement {
                        rotations: rotations.clone(),
                        x,
                        z,
                        planes,
                        rating,
                    });
                }
            }
        }
    }

    if let Some(p) = &best {
        trace!(x = p.x, z = p.z, turns = p.rotations.len(), rating = p.rating, "planned");
    }
    best
}

/// Plan and apply one placement; `Ok(None)` when the game has nothing left to place
pub fn step(state: &mut GameState) -> Result<Option<Placement>, PlaceError> {
    let Some(placement) = plan(state) else {
        return Ok(None);
    };
    apply_place(state, placement.x, placement.z, &placement.rotations)?;
    Ok(Some(placement))
}
