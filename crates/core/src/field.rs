//! Play field module - the 3D grid of locked blocks
//!
//! The field is `width x height x depth` cells stored as a flat array, plane-major
//! (`(y * depth + z) * width + x`), so each horizontal plane is one contiguous slice.
//! That keeps the plane scan in [`PlayField::check_and_clear_filled_planes`] linear.
//!
//! Solidity rules for collision queries:
//! - below the floor (y < 0) or outside the X/Z walls: solid
//! - inside the walls above the top plane (y >= height): open
//! - otherwise: occupied iff a block is locked there

use tracing::{debug, warn};

use crate::block::Block;
use crate::breaking::BreakingPool;
use crate::types::{IVec3, Vec3, BLOCK_BREAK_SECS, MAX_FIELD_EXTENT};

/// Result of locking a block into the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Stored in an empty cell
    Locked,
    /// Stored, overwriting the block that was already there
    Replaced(Block),
    /// Outside the play area; the block was discarded
    OutOfBounds,
}

/// The play field
#[derive(Debug, Clone, PartialEq)]
pub struct PlayField {
    width: i32,
    height: i32,
    depth: i32,
    /// Flat array of cells, plane-major
    cells: Vec<Option<Block>>,
    breaking: BreakingPool,
}

impl PlayField {
    /// Create an empty field; dimensions are clamped to `1..=MAX_FIELD_EXTENT`
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        Self::with_break_time(width, height, depth, BLOCK_BREAK_SECS)
    }

    /// Create an empty field whose cleared blocks linger for `break_secs`
    pub fn with_break_time(width: i32, height: i32, depth: i32, break_secs: f32) -> Self {
        let width = width.clamp(1, MAX_FIELD_EXTENT);
        let height = height.clamp(1, MAX_FIELD_EXTENT);
        let depth = depth.clamp(1, MAX_FIELD_EXTENT);
        let size = width as usize * height as usize * depth as usize;
        Self {
            width,
            height,
            depth,
            cells: vec![None; size],
            breaking: BreakingPool::new(break_secs),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    fn plane_len(&self) -> usize {
        (self.width * self.depth) as usize
    }

    /// Flat index of a cell inside the play area
    #[inline(always)]
    fn index(&self, cell: IVec3) -> Option<usize> {
        if self.in_play_area(cell) {
            Some(((cell.y * self.depth + cell.z) * self.width + cell.x) as usize)
        } else {
            None
        }
    }

    /// Within the X/Z walls and not below the floor (may be above the top plane)
    #[inline]
    pub fn within_walls(&self, cell: IVec3) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.z >= 0 && cell.z < self.depth && cell.y >= 0
    }

    /// Inside the allocated grid
    #[inline]
    pub fn in_play_area(&self, cell: IVec3) -> bool {
        self.within_walls(cell) && cell.y < self.height
    }

    /// Get the block locked at a cell, if any
    pub fn get(&self, cell: IVec3) -> Option<&Block> {
        self.index(cell).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Whether a cell counts as solid for collision
    #[inline]
    pub fn is_solid(&self, cell: IVec3) -> bool {
        match self.index(cell) {
            Some(idx) => self.cells[idx].is_some(),
            None => !self.within_walls(cell),
        }
    }

    /// Whether there is a block at a continuous position (rounded to the nearest cell)
    ///
    /// Positions outside the walls or below the floor count as blocked.
    pub fn has_block_at(&self, position: Vec3) -> bool {
        self.is_solid(position.round())
    }

    /// Lock a block into the cell matching its rounded position
    ///
    /// The block's position must already be in world space.
    pub fn add_block(&mut self, block: Block) -> AddOutcome {
        let Some(idx) = self.index(block.position) else {
            warn!(
                id = block.id.0,
                x = block.position.x,
                y = block.position.y,
                z = block.position.z,
                "block added out of play area, discarding"
            );
            return AddOutcome::OutOfBounds;
        };

        match self.cells[idx].replace(block) {
            None => AddOutcome::Locked,
            Some(previous) => {
                warn!(
                    id = previous.id.0,
                    x = previous.position.x,
                    y = previous.position.y,
                    z = previous.position.z,
                    "locked block overwrote an occupied cell"
                );
                AddOutcome::Replaced(previous)
            }
        }
    }

    /// Lock all given blocks in order; returns how many ended up in the grid
    pub fn add_blocks(&mut self, blocks: impl IntoIterator<Item = Block>) -> usize {
        blocks
            .into_iter()
            .map(|block| self.add_block(block))
            .filter(|outcome| *outcome != AddOutcome::OutOfBounds)
            .count()
    }

    #[cfg(test)]
    fn cell_of(&self, idx: usize) -> IVec3 {
        let idx = idx as i32;
        let x = idx % self.width;
        let z = (idx / self.width) % self.depth;
        let y = idx / (self.width * self.depth);
        IVec3::new(x, y, z)
    }

    fn plane(&self, y: i32) -> &[Option<Block>] {
        let len = self.plane_len();
        let start = y as usize * len;
        &self.cells[start..start + len]
    }

    /// Number of occupied cells in plane `y` (0 outside the grid)
    pub fn plane_fill(&self, y: i32) -> usize {
        if y < 0 || y >= self.height {
            return 0;
        }
        self.plane(y).iter().filter(|c| c.is_some()).count()
    }

    /// Whether every cell of plane `y` is occupied
    pub fn is_plane_filled(&self, y: i32) -> bool {
        if y < 0 || y >= self.height {
            return false;
        }
        self.plane(y).iter().all(|c| c.is_some())
    }

    /// Clear all filled planes and collapse the planes above them
    ///
    /// Scans from the top plane down. Blocks of a cleared plane move to the breaking
    /// pool; every plane above drops by one and the top plane becomes empty.
    /// Returns the number of planes cleared.
    pub fn check_and_clear_filled_planes(&mut self) -> u32 {
        let mut cleared = 0;
        let len = self.plane_len();

        for y in (0..self.height).rev() {
            if !self.is_plane_filled(y) {
                continue;
            }
            cleared += 1;

            let start = y as usize * len;
            for cell in &mut self.cells[start..start + len] {
                if let Some(block) = cell.take() {
                    self.breaking.push(block);
                }
            }

            // The slot below is always empty here: it was knocked out or just vacated
            for src in (start + len)..self.cells.len() {
                if let Some(mut block) = self.cells[src].take() {
                    block.position.y -= 1;
                    self.cells[src - len] = Some(block);
                }
            }

            debug!(plane = y, "plane cleared");
        }

        cleared
    }

    /// Advance breaking blocks; returns how many were removed
    pub fn update(&mut self, dt: f32) -> usize {
        self.breaking.update(dt)
    }

    /// Blocks detached by plane clears that have not expired yet
    pub fn breaking(&self) -> &BreakingPool {
        &self.breaking
    }

    /// All locked blocks
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.cells.iter().flatten()
    }

    /// Number of locked blocks
    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    /// One above the highest occupied cell of a column (0 for an empty column)
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        (0..self.height)
            .rev()
            .find(|&y| self.get(IVec3::new(x, y, z)).is_some())
            .map_or(0, |y| y + 1)
    }

    /// Remove every locked and breaking block
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
        self.breaking.clear();
    }
}

impl Default for PlayField {
    fn default() -> Self {
        use crate::types::{DEFAULT_FIELD_DEPTH, DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH};
        Self::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_DEPTH)
    }
}
