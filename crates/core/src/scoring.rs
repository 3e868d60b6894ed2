//! Scoring module - score and difficulty rules
//!
//! - Landing a piece awards `floor(piece_factor * difficulty)` and raises difficulty
//!   by a fixed increment.
//! - Clearing N planes at once awards `floor(N² * plane_factor * difficulty)` and raises
//!   difficulty by `N * increment`.
//!
//! Difficulty never drops below its starting value.

/// Points for landing one piece
pub fn piece_placed_score(factor: f64, difficulty: f64) -> u64 {
    to_points(factor * difficulty)
}

/// Points for clearing `planes` planes with one landing
pub fn plane_clear_score(planes: u32, factor: f64, difficulty: f64) -> u64 {
    if planes == 0 {
        return 0;
    }
    let n = planes as f64;
    to_points(n * n * factor * difficulty)
}

/// Difficulty gained for clearing `planes` planes
pub fn plane_clear_difficulty(planes: u32, increment: f64) -> f64 {
    planes as f64 * increment
}

/// Truncate toward zero; negative and NaN award nothing
fn to_points(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

/// Difficulty value with a floor
///
/// Assigning anything below the floor stores the floor instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    value: f64,
    floor: f64,
}

impl Difficulty {
    pub fn new(floor: f64) -> Self {
        Self { value: floor, floor }
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Set the difficulty, clamped up to the floor
    pub fn set(&mut self, value: f64) {
        self.value = if value < self.floor || value.is_nan() {
            self.floor
        } else {
            value
        };
    }

    pub fn increase(&mut self, by: f64) {
        self.set(self.value + by);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_placed_score() {
        assert_eq!(piece_placed_score(100.0, 3.0), 300);
        // Truncates like an integer cast
        assert_eq!(piece_placed_score(100.0, 3.019), 301);
        assert_eq!(piece_placed_score(0.0, 3.0), 0);
    }

    #[test]
    fn test_plane_clear_score_is_quadratic() {
        assert_eq!(plane_clear_score(0, 2000.0, 3.0), 0);
        assert_eq!(plane_clear_score(1, 2000.0, 3.0), 6000);
        assert_eq!(plane_clear_score(2, 2000.0, 3.0), 24000);
        assert_eq!(plane_clear_score(3, 2000.0, 1.0), 18000);
    }

    #[test]
    fn test_plane_clear_difficulty() {
        assert_eq!(plane_clear_difficulty(0, 0.25), 0.0);
        assert_eq!(plane_clear_difficulty(3, 0.25), 0.75);
    }

    #[test]
    fn test_negative_scores_award_nothing() {
        assert_eq!(piece_placed_score(-100.0, 3.0), 0);
        assert_eq!(piece_placed_score(f64::NAN, 3.0), 0);
    }

    #[test]
    fn test_difficulty_floor_clamp() {
        let mut d = Difficulty::new(3.0);
        assert_eq!(d.get(), 3.0);

        d.set(1.0);
        assert_eq!(d.get(), 3.0);

        d.set(4.5);
        assert_eq!(d.get(), 4.5);

        d.increase(-10.0);
        assert_eq!(d.get(), 3.0);

        d.increase(0.25);
        assert_eq!(d.get(), 3.25);
        assert_eq!(d.floor(), 3.0);
    }
}
