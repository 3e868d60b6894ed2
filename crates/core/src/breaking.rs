//! Breaking pool - blocks knocked out of the field by a plane clear
//!
//! Detached blocks linger for a fixed lifetime (so presentation can animate them
//! flying apart) and are removed once their timer drops below zero.

use crate::block::Block;

/// A detached block and its remaining lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct BreakingBlock {
    pub block: Block,
    pub remaining_secs: f32,
}

/// Transient owner of detached blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakingPool {
    lifetime_secs: f32,
    blocks: Vec<BreakingBlock>,
}

impl BreakingPool {
    /// A pool whose blocks live for `lifetime_secs`; 0 removes them on the next update
    pub fn new(lifetime_secs: f32) -> Self {
        Self {
            lifetime_secs: lifetime_secs.max(0.0),
            blocks: Vec::new(),
        }
    }

    /// Take ownership of a block removed from the field
    pub fn push(&mut self, block: Block) {
        self.blocks.push(BreakingBlock {
            block,
            remaining_secs: self.lifetime_secs,
        });
    }

    /// Advance every timer by `dt`; returns how many blocks were removed
    pub fn update(&mut self, dt: f32) -> usize {
        let before = self.blocks.len();
        self.blocks.retain_mut(|b| {
            b.remaining_secs -= dt;
            b.remaining_secs >= 0.0
        });
        before - self.blocks.len()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BreakingBlock> {
        self.blocks.iter()
    }

    pub fn lifetime_secs(&self) -> f32 {
        self.lifetime_secs
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}
