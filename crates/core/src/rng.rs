//! RNG module - seeded, uniform piece selection
//!
//! Every new "next" piece is drawn uniformly at random from the configured piece set.
//! A single generator instance lives for the whole game and is seeded at game start,
//! so the same seed replays the same piece sequence.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits of the state; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

/// Uniform piece generator over a fixed piece set
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    pool: ArrayVec<PieceKind, 8>,
    rng: SimpleRng,
    seed: u32,
}

impl PieceGenerator {
    /// Create a generator drawing from `pool`
    ///
    /// Duplicates are dropped; an empty pool falls back to every piece kind.
    pub fn new(seed: u32, pool: &[PieceKind]) -> Self {
        let mut unique: ArrayVec<PieceKind, 8> = ArrayVec::new();
        for &kind in pool {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        if unique.is_empty() {
            unique.extend(PieceKind::ALL);
        }

        Self {
            pool: unique,
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        let idx = self.rng.next_range(self.pool.len() as u32) as usize;
        self.pool[idx]
    }

    /// Kinds this generator can produce
    pub fn pool(&self) -> &[PieceKind] {
        &self.pool
    }

    /// The seed this generator was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1, &PieceKind::ALL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(8) < 8);
        }
        assert_eq!(rng.next_range(0), 0);
        assert_eq!(rng.next_range(1), 0);
    }

    #[test]
    fn test_generator_covers_whole_pool() {
        let mut generator = PieceGenerator::new(1, &PieceKind::ALL);
        let mut seen = Vec::new();
        for _ in 0..500 {
            let kind = generator.draw();
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        assert_eq!(seen.len(), PieceKind::ALL.len());
    }

    #[test]
    fn test_generator_respects_pool() {
        let mut generator = PieceGenerator::new(3, &[PieceKind::I, PieceKind::O, PieceKind::I]);
        assert_eq!(generator.pool(), &[PieceKind::I, PieceKind::O]);
        for _ in 0..100 {
            let kind = generator.draw();
            assert!(kind == PieceKind::I || kind == PieceKind::O);
        }
    }

    #[test]
    fn test_generator_empty_pool_falls_back_to_all() {
        let generator = PieceGenerator::new(3, &[]);
        assert_eq!(generator.pool().len(), PieceKind::ALL.len());
    }

    #[test]
    fn test_generator_same_seed_same_sequence() {
        let mut a = PieceGenerator::new(2024, &PieceKind::ALL);
        let mut b = PieceGenerator::new(2024, &PieceKind::ALL);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
        assert_eq!(a.seed(), 2024);
    }
}
