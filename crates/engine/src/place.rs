//! Whole-piece placement: rotate, shift to a column, drop

use thiserror::Error;
use tracing::debug;

use cubefall_core::GameState;
use cubefall_types::{
    GameAction, GamePhase, IVec3, RotationDirection, Shift, SPAWN_FALL_TIMER_SECS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("game is not playable")]
    NotPlayable,
    #[error("no active piece")]
    NoActive,
    #[error("could not rotate to target orientation")]
    RotationBlocked,
    #[error("target column would place piece out of bounds")]
    OutOfBounds,
    #[error("could not move to target column due to collision")]
    TargetBlocked,
    #[error("piece did not land")]
    DropStalled,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable | PlaceError::NoActive => "not_playable",
            PlaceError::RotationBlocked
            | PlaceError::OutOfBounds
            | PlaceError::TargetBlocked => "invalid_place",
            PlaceError::DropStalled => "stalled",
        }
    }
}

fn step_toward(
    state: &mut GameState,
    delta: i32,
    forward: Shift,
    back: Shift,
) -> Result<(), PlaceError> {
    let shift = if delta > 0 { forward } else { back };
    for _ in 0..delta.unsigned_abs() {
        if !state.apply_action(GameAction::from(shift)) {
            return Err(PlaceError::TargetBlocked);
        }
    }
    Ok(())
}

/// Rotate the active piece, move its anchor to (`target_x`, `target_z`) and fast-fall
/// it until it lands
///
/// Rotations happen at the spawn position, then X moves, then Z moves. Returns how
/// many cells the piece dropped.
pub fn apply_place(
    state: &mut GameState,
    target_x: i32,
    target_z: i32,
    rotations: &[RotationDirection],
) -> Result<u32, PlaceError> {
    if state.phase() != GamePhase::Playing {
        return Err(PlaceError::NotPlayable);
    }
    if !state.active().is_some_and(|p| p.is_active()) {
        return Err(PlaceError::NoActive);
    }

    for &direction in rotations {
        if !state.apply_action(GameAction::Rotate(direction)) {
            return Err(PlaceError::RotationBlocked);
        }
    }

    let Some(active) = state.active() else {
        return Err(PlaceError::NoActive);
    };
    let anchor = active.position();
    let shift = IVec3::new(target_x - anchor.x, 0, target_z - anchor.z);
    let field = state.field();
    if !active.world_cells().all(|c| field.within_walls(c + shift)) {
        return Err(PlaceError::OutOfBounds);
    }

    step_toward(state, shift.x, Shift::Right, Shift::Left)?;
    step_toward(state, shift.z, Shift::Forward, Shift::Back)?;

    let Some(active) = state.active() else {
        return Err(PlaceError::NoActive);
    };
    let distance = active.landing_distance(state.field());

    // Two delays per tick nets one cell per tick once the spawn grace has run out
    let delay = state.movement_delay(true);
    let dt = delay * 2.0;
    let grace_ticks = (SPAWN_FALL_TIMER_SECS.abs() / delay).ceil() as u32;
    let budget = distance + grace_ticks + 2;

    let placed = state.pieces_placed();
    for _ in 0..budget {
        state.tick(dt, true);
        if state.pieces_placed() != placed {
            debug!(x = target_x, z = target_z, distance, "piece placed");
            return Ok(distance);
        }
    }
    Err(PlaceError::DropStalled)
}
