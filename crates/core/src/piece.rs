//! Piece module - the falling cluster of blocks
//!
//! A piece is a handful of blocks at integer offsets around a continuous anchor
//! (`real_position`). Its logical cells are `round(real_position + offset)`.
//! Every move or rotation is computed on candidate cells first and only committed
//! if none of them is solid in the field.
//!
//! Presentation state (the smoothed visual transform and the rotation accumulator)
//! lives here too but never affects collision.

use arrayvec::ArrayVec;
use tracing::warn;

use crate::block::{Block, BlockIds};
use crate::field::PlayField;
use crate::pieces::{get_shape, top_offset};
use crate::rotation::{rotate, vector_for};
use crate::types::*;

/// What a gravity tick did to the piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer still running (or piece inactive)
    Idle,
    /// Dropped one cell
    Fell,
    /// Could not drop; the piece must be locked into the field
    Landed,
}

/// Smoothed transform for rendering
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualTransform {
    pub position: Vec3,
    /// Euler angles in degrees, decaying toward zero after a rotation
    pub rotation: Vec3,
}

/// Exponential-decay weight for one frame of smoothing
///
/// The visual offset from the target is multiplied by this each frame, so
/// movement gets snappier as the fall delay shrinks.
pub fn smoothing_weight(dt: f32, movement_delay: f32) -> f32 {
    let speed = SMOOTHING_FACTOR / movement_delay * dt;
    SMOOTHING_BASE.powf(speed)
}

/// Anchor a piece spawns at: centred on the field, its top block on the top plane
pub fn spawn_anchor(field: &PlayField, offsets: &[IVec3]) -> Vec3 {
    let top = top_offset(offsets);
    Vec3::new(
        (field.width() / 2) as f32,
        (field.height() - top - 1) as f32,
        (field.depth() / 2) as f32,
    )
}

/// A falling piece
#[derive(Debug, Clone)]
pub struct Piece {
    kind: PieceKind,
    real_position: Vec3,
    rotation_offset: Vec3,
    /// Blocks with local offsets as their positions
    parts: ArrayVec<Block, MAX_PIECE_BLOCKS>,
    active: bool,
    fall_timer: f32,
    drag: Vec2,
    visual: VisualTransform,
}

impl Piece {
    /// Create an inactive piece of `kind` at its spawn anchor
    pub fn spawn(kind: PieceKind, field: &PlayField, ids: &mut BlockIds) -> Self {
        let shape = get_shape(kind);
        let anchor = spawn_anchor(field, &shape);
        Self::from_offsets(kind, &shape, anchor, ids)
    }

    /// Create an inactive piece from explicit block offsets
    ///
    /// Offsets beyond `MAX_PIECE_BLOCKS` are dropped.
    pub fn from_offsets(
        kind: PieceKind,
        offsets: &[IVec3],
        anchor: Vec3,
        ids: &mut BlockIds,
    ) -> Self {
        if offsets.is_empty() {
            warn!(?kind, "piece created without blocks");
        }
        if offsets.len() > MAX_PIECE_BLOCKS {
            warn!(
                count = offsets.len(),
                max = MAX_PIECE_BLOCKS,
                "piece has too many blocks, extra blocks dropped"
            );
        }

        let parts = offsets
            .iter()
            .take(MAX_PIECE_BLOCKS)
            .map(|&offset| Block::new(ids.allocate(), kind, offset))
            .collect();

        Self {
            kind,
            real_position: anchor,
            rotation_offset: Vec3::ZERO,
            parts,
            active: false,
            fall_timer: SPAWN_FALL_TIMER_SECS,
            drag: Vec2::ZERO,
            visual: VisualTransform {
                position: anchor,
                rotation: Vec3::ZERO,
            },
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn real_position(&self) -> Vec3 {
        self.real_position
    }

    /// Discrete anchor cell
    pub fn position(&self) -> IVec3 {
        self.real_position.round()
    }

    /// Presentation-only rotation accumulator (degrees)
    pub fn rotation_offset(&self) -> Vec3 {
        self.rotation_offset
    }

    pub fn blocks(&self) -> &[Block] {
        &self.parts
    }

    pub fn offsets(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.parts.iter().map(|b| b.position)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn fall_timer(&self) -> f32 {
        self.fall_timer
    }

    pub fn drag(&self) -> Vec2 {
        self.drag
    }

    pub fn visual(&self) -> VisualTransform {
        self.visual
    }

    /// Place the (inactive) piece's visual at a staging position
    pub fn stage(&mut self, position: Vec3) {
        self.visual.position = position;
        self.visual.rotation = Vec3::ZERO;
    }

    /// Make this the controllable piece, snapping its visual to the anchor
    pub fn activate(&mut self) {
        self.snap_visual();
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    #[inline]
    fn cell_for(&self, offset: IVec3) -> IVec3 {
        (self.real_position + offset.as_vec3()).round()
    }

    /// Rounded world cells of all blocks
    pub fn world_cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.parts.iter().map(|b| self.cell_for(b.position))
    }

    fn collides_at(&self, shift: IVec3, field: &PlayField) -> bool {
        self.world_cells().any(|cell| field.is_solid(cell + shift))
    }

    /// Whether the piece overlaps anything where it stands
    pub fn check_current_collision(&self, field: &PlayField) -> bool {
        self.collides_at(IVec3::ZERO, field)
    }

    /// Move by `offset` unless that collides; returns whether it collided
    pub fn attempt_move(&mut self, offset: IVec3, field: &PlayField) -> bool {
        if self.collides_at(offset, field) {
            return true;
        }
        self.real_position += offset.as_vec3();
        false
    }

    /// Rotate the blocks around the anchor unless that collides; returns whether it collided
    pub fn attempt_rotate(&mut self, direction: RotationDirection, field: &PlayField) -> bool {
        let rotated: ArrayVec<IVec3, MAX_PIECE_BLOCKS> = self
            .parts
            .iter()
            .map(|b| rotate(b.position, direction))
            .collect();

        if rotated.iter().any(|&o| field.is_solid(self.cell_for(o))) {
            return true;
        }

        for (block, offset) in self.parts.iter_mut().zip(rotated) {
            block.position = offset;
        }

        let rotate_by = -vector_for(direction).as_vec3();
        let ro = self.rotation_offset;
        let same_axis = (ro.x != 0.0 && rotate_by.x != 0.0)
            || (ro.y != 0.0 && rotate_by.y != 0.0)
            || (ro.z != 0.0 && rotate_by.z != 0.0);
        if same_axis {
            self.rotation_offset += rotate_by;
        } else {
            self.rotation_offset = rotate_by;
        }

        false
    }

    /// Seconds per gravity step
    pub fn movement_delay(difficulty: f64, fast_fall: bool) -> f32 {
        let base = if fast_fall {
            FAST_FALL_DELAY_SECS
        } else {
            NORMAL_FALL_DELAY_SECS
        };
        (base as f64 / difficulty) as f32
    }

    /// Advance the fall timer and apply gravity
    ///
    /// At most one step per call. The timer keeps its overshoot past the delay.
    pub fn tick(
        &mut self,
        dt: f32,
        difficulty: f64,
        fast_fall: bool,
        field: &PlayField,
    ) -> TickOutcome {
        if !self.active {
            return TickOutcome::Idle;
        }

        let delay = Self::movement_delay(difficulty, fast_fall);
        let mut outcome = TickOutcome::Idle;

        self.fall_timer += dt;
        if self.fall_timer > delay {
            outcome = if self.attempt_move(IVec3::DOWN, field) {
                TickOutcome::Landed
            } else {
                TickOutcome::Fell
            };
            self.fall_timer -= delay;
        }

        if outcome == TickOutcome::Landed {
            self.snap_visual();
        } else {
            self.update_visual(dt, delay);
        }

        outcome
    }

    /// Accumulate pointer drag and turn each threshold crossing into a rotation attempt
    ///
    /// Vertical drag tips around X, horizontal drag turns around Y. Returns the
    /// attempted rotations paired with whether each collided.
    pub fn apply_drag(
        &mut self,
        delta: Vec2,
        sensitivity: f32,
        field: &PlayField,
    ) -> ArrayVec<(RotationDirection, bool), 2> {
        let mut attempts = ArrayVec::new();
        self.drag.x += delta.x;
        self.drag.y += delta.y;

        if self.drag.y > sensitivity {
            self.drag.y -= sensitivity;
            let d = RotationDirection::XBackwards;
            attempts.push((d, self.attempt_rotate(d, field)));
        } else if self.drag.y < -sensitivity {
            self.drag.y += sensitivity;
            let d = RotationDirection::XForwards;
            attempts.push((d, self.attempt_rotate(d, field)));
        }

        if self.drag.x < -sensitivity {
            self.drag.x += sensitivity;
            let d = RotationDirection::YLeft;
            attempts.push((d, self.attempt_rotate(d, field)));
        } else if self.drag.x > sensitivity {
            self.drag.x -= sensitivity;
            let d = RotationDirection::YRight;
            attempts.push((d, self.attempt_rotate(d, field)));
        }

        attempts
    }

    /// How many cells the piece can still fall before landing
    ///
    /// A piece without blocks never lands; its distance is 0.
    pub fn landing_distance(&self, field: &PlayField) -> u32 {
        if self.parts.is_empty() {
            return 0;
        }
        let mut distance = 0;
        while !self.collides_at(IVec3::new(0, -(distance as i32) - 1, 0), field) {
            distance += 1;
        }
        distance
    }

    /// Ease the visual transform toward the logical state
    pub fn update_visual(&mut self, dt: f32, movement_delay: f32) {
        let w = smoothing_weight(dt, movement_delay);
        self.visual.position = self.real_position - (self.real_position - self.visual.position) * w;
        self.rotation_offset *= w;
        self.visual.rotation = self.rotation_offset;
    }

    /// Jump the visual transform to the logical state
    pub fn snap_visual(&mut self) {
        self.visual.position = self.real_position;
        self.visual.rotation = Vec3::ZERO;
    }

    /// Consume the piece, handing out its blocks with world-space positions
    pub fn into_blocks(self) -> impl Iterator<Item = Block> {
        let anchor = self.real_position;
        self.parts.into_iter().map(move |mut block| {
            block.position = (anchor + block.position.as_vec3()).round();
            block
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;

    fn column_piece(anchor: Vec3) -> Piece {
        let offsets = [
            IVec3::new(0, 0, 0),
            IVec3::new(0, 1, 0),
            IVec3::new(0, 2, 0),
            IVec3::new(0, 3, 0),
        ];
        Piece::from_offsets(PieceKind::I, &offsets, anchor, &mut BlockIds::new())
    }

    fn lock(field: &mut PlayField, x: i32, y: i32, z: i32) {
        field.add_block(Block::new(BlockId(999), PieceKind::O, IVec3::new(x, y, z)));
    }

    #[test]
    fn test_spawn_anchor_puts_top_block_on_top_plane() {
        let field = PlayField::new(10, 20, 10);
        let piece = Piece::spawn(PieceKind::I, &field, &mut BlockIds::new());
        assert_eq!(piece.position(), IVec3::new(5, 17, 5));
        let top = piece.world_cells().map(|c| c.y).max().unwrap();
        assert_eq!(top, 19);
        assert!(!piece.is_active());
        assert_eq!(piece.fall_timer(), SPAWN_FALL_TIMER_SECS);
    }

    #[test]
    fn test_spawn_anchor_flat_piece() {
        let field = PlayField::new(7, 12, 5);
        let piece = Piece::spawn(PieceKind::O, &field, &mut BlockIds::new());
        assert_eq!(piece.position(), IVec3::new(3, 11, 2));
    }

    #[test]
    fn test_attempt_move_free_and_blocked() {
        let mut field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 0.0, 5.0));

        assert!(!piece.attempt_move(IVec3::new(1, 0, 0), &field));
        assert_eq!(piece.position(), IVec3::new(6, 0, 5));

        // Floor
        assert!(piece.attempt_move(IVec3::DOWN, &field));
        assert_eq!(piece.position(), IVec3::new(6, 0, 5));

        // Occupied neighbour
        lock(&mut field, 6, 2, 6);
        assert!(piece.attempt_move(IVec3::new(0, 0, 1), &field));
        assert_eq!(piece.position(), IVec3::new(6, 0, 5));
    }

    #[test]
    fn test_attempt_move_into_wall_collides() {
        let field = PlayField::new(3, 20, 3);
        let mut piece = column_piece(Vec3::new(0.0, 5.0, 0.0));
        assert!(piece.attempt_move(IVec3::new(-1, 0, 0), &field));
        assert!(piece.attempt_move(IVec3::new(0, 0, -1), &field));
        assert!(!piece.attempt_move(IVec3::new(2, 0, 2), &field));
        assert!(piece.attempt_move(IVec3::new(1, 0, 0), &field));
    }

    #[test]
    fn test_piece_may_stand_above_the_ceiling() {
        let field = PlayField::new(4, 4, 4);
        let piece = column_piece(Vec3::new(1.0, 3.0, 1.0));
        assert!(!piece.check_current_collision(&field));
    }

    #[test]
    fn test_attempt_rotate_commits_offsets() {
        let field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 5.0, 5.0));

        assert!(!piece.attempt_rotate(RotationDirection::ZRight, &field));
        let offsets: Vec<IVec3> = piece.offsets().collect();
        assert_eq!(
            offsets,
            vec![
                IVec3::new(0, 0, 0),
                IVec3::new(1, 0, 0),
                IVec3::new(2, 0, 0),
                IVec3::new(3, 0, 0)
            ]
        );
        assert_eq!(piece.rotation_offset(), Vec3::new(0.0, 0.0, 90.0));
    }

    #[test]
    fn test_attempt_rotate_blocked_leaves_piece_unchanged() {
        let mut field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 5.0, 5.0));
        lock(&mut field, 7, 5, 5);

        let before: Vec<IVec3> = piece.offsets().collect();
        assert!(piece.attempt_rotate(RotationDirection::ZRight, &field));
        assert_eq!(piece.offsets().collect::<Vec<_>>(), before);
        assert_eq!(piece.rotation_offset(), Vec3::ZERO);
    }

    #[test]
    fn test_rotation_checked_against_current_anchor() {
        // Rotating ZLeft swings the column into -X; the wall at x<0 blocks it
        let field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(1.0, 5.0, 5.0));
        assert!(piece.attempt_rotate(RotationDirection::ZLeft, &field));
        assert!(!piece.attempt_rotate(RotationDirection::ZRight, &field));
    }

    #[test]
    fn test_rotation_accumulator() {
        let field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 10.0, 5.0));

        piece.attempt_rotate(RotationDirection::YLeft, &field);
        assert_eq!(piece.rotation_offset(), Vec3::new(0.0, 90.0, 0.0));

        // Same axis accumulates
        piece.attempt_rotate(RotationDirection::YLeft, &field);
        assert_eq!(piece.rotation_offset(), Vec3::new(0.0, 180.0, 0.0));

        // Another axis resets
        piece.attempt_rotate(RotationDirection::XBackwards, &field);
        assert_eq!(piece.rotation_offset(), Vec3::new(-90.0, 0.0, 0.0));
    }

    #[test]
    fn test_tick_inactive_piece_never_moves() {
        let field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 10.0, 5.0));
        for _ in 0..100 {
            assert_eq!(piece.tick(0.5, 1.0, false, &field), TickOutcome::Idle);
        }
        assert_eq!(piece.position(), IVec3::new(5, 10, 5));
    }

    #[test]
    fn test_tick_falls_after_delay_and_keeps_overshoot() {
        let field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 10.0, 5.0));
        piece.activate();

        // Spawn grace: -0.5 + 1.25 = 0.75, not past the 1.0 delay
        assert_eq!(piece.tick(1.25, 1.0, false, &field), TickOutcome::Idle);
        assert_eq!(piece.tick(0.5, 1.0, false, &field), TickOutcome::Fell);
        assert_eq!(piece.position(), IVec3::new(5, 9, 5));
        assert_eq!(piece.fall_timer(), 0.25);
    }

    #[test]
    fn test_fast_fall_and_difficulty_shorten_delay() {
        assert_eq!(Piece::movement_delay(1.0, false), 1.0);
        assert_eq!(Piece::movement_delay(2.0, false), 0.5);
        assert!((Piece::movement_delay(1.0, true) - 0.1).abs() < 1e-6);
        assert!((Piece::movement_delay(4.0, true) - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_tick_lands_on_floor() {
        let field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 1.0, 5.0));
        piece.activate();

        assert_eq!(piece.tick(2.0, 1.0, false, &field), TickOutcome::Fell);
        assert_eq!(piece.tick(1.5, 1.0, false, &field), TickOutcome::Landed);
        assert_eq!(piece.position(), IVec3::new(5, 0, 5));
        assert_eq!(piece.visual().position, piece.real_position());
    }

    #[test]
    fn test_drag_rotates_and_keeps_signed_remainder() {
        let field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 10.0, 5.0));

        assert!(piece.apply_drag(Vec2::new(0.0, 1.0), 1.5, &field).is_empty());

        let attempts = piece.apply_drag(Vec2::new(0.0, 1.0), 1.5, &field);
        assert_eq!(attempts.as_slice(), &[(RotationDirection::XBackwards, false)]);
        assert_eq!(piece.drag(), Vec2::new(0.0, 0.5));

        let attempts = piece.apply_drag(Vec2::new(-2.0, -2.5), 1.5, &field);
        assert_eq!(
            attempts.as_slice(),
            &[
                (RotationDirection::XForwards, false),
                (RotationDirection::YLeft, false)
            ]
        );
        assert_eq!(piece.drag(), Vec2::new(-0.5, -0.5));

        let attempts = piece.apply_drag(Vec2::new(2.5, 0.0), 1.5, &field);
        assert_eq!(attempts.as_slice(), &[(RotationDirection::YRight, false)]);
        assert_eq!(piece.drag(), Vec2::new(0.5, -0.5));
    }

    #[test]
    fn test_landing_distance() {
        let mut field = PlayField::new(10, 20, 10);
        let piece = column_piece(Vec3::new(5.0, 10.0, 5.0));
        assert_eq!(piece.landing_distance(&field), 10);

        lock(&mut field, 5, 3, 5);
        assert_eq!(piece.landing_distance(&field), 6);
    }

    #[test]
    fn test_empty_piece_has_zero_landing_distance() {
        let field = PlayField::new(10, 20, 10);
        let piece = Piece::from_offsets(
            PieceKind::I,
            &[],
            Vec3::new(5.0, 5.0, 5.0),
            &mut BlockIds::new(),
        );
        assert_eq!(piece.blocks().len(), 0);
        assert_eq!(piece.landing_distance(&field), 0);
    }

    #[test]
    fn test_into_blocks_uses_world_positions() {
        let piece = column_piece(Vec3::new(2.0, 3.0, 4.0));
        let cells: Vec<IVec3> = piece.into_blocks().map(|b| b.position).collect();
        assert_eq!(
            cells,
            vec![
                IVec3::new(2, 3, 4),
                IVec3::new(2, 4, 4),
                IVec3::new(2, 5, 4),
                IVec3::new(2, 6, 4)
            ]
        );
    }

    #[test]
    fn test_visual_smoothing_decays_toward_target() {
        let field = PlayField::new(10, 20, 10);
        let mut piece = column_piece(Vec3::new(5.0, 10.0, 5.0));
        piece.stage(Vec3::new(-5.0, 10.0, 5.0));
        piece.attempt_rotate(RotationDirection::YRight, &field);

        piece.update_visual(0.25, 1.0);
        // 0.2^(4 * 0.25) = 0.2
        let v = piece.visual();
        assert!((v.position.x - 3.0).abs() < 1e-4);
        assert!((v.rotation.y + 18.0).abs() < 1e-3);

        piece.snap_visual();
        assert_eq!(piece.visual().position, piece.real_position());
    }

    #[test]
    fn test_too_many_offsets_are_truncated() {
        let offsets: Vec<IVec3> = (0..12).map(|x| IVec3::new(x, 0, 0)).collect();
        let piece = Piece::from_offsets(PieceKind::I, &offsets, Vec3::ZERO, &mut BlockIds::new());
        assert_eq!(piece.blocks().len(), MAX_PIECE_BLOCKS);
    }
}
