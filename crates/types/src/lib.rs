//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no required dependencies, so they can be used
//! from the simulation core, from driver loops and from tooling alike. Enable the
//! `serde` feature to derive `Serialize`/`Deserialize` on them.
//!
//! # Field Dimensions
//!
//! Default play field (a 3D well, Y is up):
//!
//! - **Width**: 10 cells along X (indexed 0-9)
//! - **Height**: 20 planes along Y (indexed 0-19)
//! - **Depth**: 10 cells along Z (indexed 0-9)
//!
//! Cells above the top plane are open sky: pieces may exist there, nothing is ever locked there.
//!
//! # Timing Constants
//!
//! Timing values are in seconds and are divided by the current difficulty:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `NORMAL_FALL_DELAY_SECS` | 1.0 | Gravity step at difficulty 1 |
//! | `FAST_FALL_DELAY_SECS` | 0.1 | Gravity step while fast fall is held |
//! | `SPAWN_FALL_TIMER_SECS` | -0.5 | Fall timer value of a freshly spawned piece |
//! | `BLOCK_BREAK_SECS` | 1.0 | Lifetime of a block knocked out by a plane clear |
//! | `PAUSE_TIME_SCALE` | 0.05 | Time scale applied while paused |
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SCORE_ON_PIECE_PLACED_FACTOR` | 100 | Multiplied by difficulty per landed piece |
//! | `SCORE_ON_PLANE_CLEAR_FACTOR` | 2000 | Multiplied by planes² and difficulty |
//! | `DIFFICULTY_INCREMENT_ON_PIECE_PLACED` | 0.01 | Added per landed piece |
//! | `DIFFICULTY_INCREMENT_ON_PLANE_CLEAR` | 0.25 | Added per cleared plane |
//!
//! # Examples
//!
//! ```
//! use cubefall_types::{GameAction, IVec3, PieceKind, RotationDirection, Shift};
//!
//! // Parse a piece kind (case-insensitive)
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//!
//! // Rotation directions come in inverse pairs
//! assert_eq!(RotationDirection::YLeft.inverse(), RotationDirection::YRight);
//!
//! // Lateral shifts map to unit offsets
//! assert_eq!(Shift::Right.offset(), IVec3::new(1, 0, 0));
//!
//! // Parse a game action
//! assert_eq!(GameAction::from_str("moveForward"), Some(GameAction::MoveForward));
//! ```

use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default field width along X
pub const DEFAULT_FIELD_WIDTH: i32 = 10;

/// Default field height along Y
pub const DEFAULT_FIELD_HEIGHT: i32 = 20;

/// Default field depth along Z
pub const DEFAULT_FIELD_DEPTH: i32 = 10;

/// Largest accepted extent of the field along any axis
pub const MAX_FIELD_EXTENT: i32 = 128;

/// Difficulty a new game starts at (and never drops below)
pub const DEFAULT_INITIAL_DIFFICULTY: f64 = 3.0;

/// Gravity step at difficulty 1
pub const NORMAL_FALL_DELAY_SECS: f32 = 1.0;

/// Gravity step at difficulty 1 while fast fall is held
pub const FAST_FALL_DELAY_SECS: f32 = 0.1;

/// Fall timer of a freshly spawned piece (half a second of grace)
pub const SPAWN_FALL_TIMER_SECS: f32 = -0.5;

/// How long a block knocked out by a plane clear lingers before removal
pub const BLOCK_BREAK_SECS: f32 = 1.0;

/// Time scale applied to the simulation while paused
pub const PAUSE_TIME_SCALE: f32 = 0.05;

/// Pointer travel required for one drag rotation
pub const DEFAULT_DRAG_SENSITIVITY: f32 = 1.5;

/// Multiplier for visual movement and rotation speed
pub const SMOOTHING_FACTOR: f32 = 4.0;

/// Base for visual movement and rotation decay (0 = instant, 1 = never moves)
pub const SMOOTHING_BASE: f32 = 0.2;

/// Points per landed piece, multiplied by difficulty
pub const SCORE_ON_PIECE_PLACED_FACTOR: f64 = 100.0;

/// Points per cleared plane, multiplied by planes² and difficulty
pub const SCORE_ON_PLANE_CLEAR_FACTOR: f64 = 2000.0;

/// Difficulty gained per landed piece
pub const DIFFICULTY_INCREMENT_ON_PIECE_PLACED: f64 = 0.01;

/// Difficulty gained per cleared plane
pub const DIFFICULTY_INCREMENT_ON_PLANE_CLEAR: f64 = 0.25;

/// Upper bound on blocks in a single piece (sizes stack buffers)
pub const MAX_PIECE_BLOCKS: usize = 8;

/// Default number of entries kept on the high-score table
pub const DEFAULT_SCOREBOARD_CAPACITY: usize = 20;

/// Integer lattice coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IVec3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl IVec3 {
    pub const ZERO: Self = Self::new(0, 0, 0);
    pub const DOWN: Self = Self::new(0, -1, 0);
    pub const UP: Self = Self::new(0, 1, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Convert to a continuous vector
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl Add for IVec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for IVec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for IVec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for IVec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Continuous 3D vector (positions, euler angles in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Round each axis to the nearest integer (halfway cases go to the even neighbour)
    ///
    /// # Examples
    ///
    /// ```
    /// use cubefall_types::{IVec3, Vec3};
    ///
    /// assert_eq!(Vec3::new(1.4, -0.6, 2.5).round(), IVec3::new(1, -1, 2));
    /// ```
    pub fn round(self) -> IVec3 {
        IVec3::new(
            self.x.round_ties_even() as i32,
            self.y.round_ties_even() as i32,
            self.z.round_ties_even() as i32,
        )
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// 2D pointer delta / drag accumulator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The six 90° rotations a piece can perform
///
/// - **XBackwards / XForwards**: tip the piece around the X axis
/// - **YLeft / YRight**: turn the piece around the vertical axis
/// - **ZLeft / ZRight**: roll the piece around the Z axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RotationDirection {
    XBackwards,
    XForwards,
    YLeft,
    YRight,
    ZLeft,
    ZRight,
}

impl RotationDirection {
    pub const ALL: [Self; 6] = [
        Self::XBackwards,
        Self::XForwards,
        Self::YLeft,
        Self::YRight,
        Self::ZLeft,
        Self::ZRight,
    ];

    /// The rotation that undoes this one
    pub fn inverse(&self) -> Self {
        match self {
            Self::XBackwards => Self::XForwards,
            Self::XForwards => Self::XBackwards,
            Self::YLeft => Self::YRight,
            Self::YRight => Self::YLeft,
            Self::ZLeft => Self::ZRight,
            Self::ZRight => Self::ZLeft,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "xbackwards" => Some(Self::XBackwards),
            "xforwards" => Some(Self::XForwards),
            "yleft" => Some(Self::YLeft),
            "yright" => Some(Self::YRight),
            "zleft" => Some(Self::ZLeft),
            "zright" => Some(Self::ZRight),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XBackwards => "xBackwards",
            Self::XForwards => "xForwards",
            Self::YLeft => "yLeft",
            Self::YRight => "yRight",
            Self::ZLeft => "zLeft",
            Self::ZRight => "zRight",
        }
    }
}

/// Lateral one-cell moves on the horizontal plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shift {
    /// -X
    Left,
    /// +X
    Right,
    /// +Z
    Forward,
    /// -Z
    Back,
}

impl Shift {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Forward, Self::Back];

    /// Unit offset for this shift
    pub fn offset(&self) -> IVec3 {
        match self {
            Self::Left => IVec3::new(-1, 0, 0),
            Self::Right => IVec3::new(1, 0, 0),
            Self::Forward => IVec3::new(0, 0, 1),
            Self::Back => IVec3::new(0, 0, -1),
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These are discrete input edges. Fast fall is a held modifier passed to
/// `tick`, and pointer dragging is fed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameAction {
    /// Move piece one cell along -X
    MoveLeft,
    /// Move piece one cell along +X
    MoveRight,
    /// Move piece one cell along +Z
    MoveForward,
    /// Move piece one cell along -Z
    MoveBack,
    /// Rotate piece 90° in the given direction
    Rotate(RotationDirection),
    /// Toggle pause state
    Pause,
}

impl GameAction {
    /// Parse action from a camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use cubefall_types::{GameAction, RotationDirection};
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(
    ///     GameAction::from_str("rotateZLeft"),
    ///     Some(GameAction::Rotate(RotationDirection::ZLeft))
    /// );
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "moveleft" => Some(Self::MoveLeft),
            "moveright" => Some(Self::MoveRight),
            "moveforward" => Some(Self::MoveForward),
            "moveback" => Some(Self::MoveBack),
            "pause" => Some(Self::Pause),
            _ => lower
                .strip_prefix("rotate")
                .and_then(RotationDirection::from_str)
                .map(Self::Rotate),
        }
    }

    /// The lateral shift this action requests, if any
    pub fn shift(&self) -> Option<Shift> {
        match self {
            Self::MoveLeft => Some(Shift::Left),
            Self::MoveRight => Some(Shift::Right),
            Self::MoveForward => Some(Shift::Forward),
            Self::MoveBack => Some(Shift::Back),
            Self::Rotate(_) | Self::Pause => None,
        }
    }
}

impl From<Shift> for GameAction {
    fn from(shift: Shift) -> Self {
        match shift {
            Shift::Left => Self::MoveLeft,
            Shift::Right => Self::MoveRight,
            Shift::Forward => Self::MoveForward,
            Shift::Back => Self::MoveBack,
        }
    }
}

/// The eight free tetracubes
///
/// - **I**: four in a line (spawns standing upright)
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **L**: L-shaped
/// - **S**: S/Z-shaped
/// - **Branch**: three arms from one corner (non-planar)
/// - **LeftScrew / RightScrew**: chiral twisted pieces (non-planar)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    S,
    Branch,
    LeftScrew,
    RightScrew,
}

impl PieceKind {
    pub const ALL: [Self; 8] = [
        Self::I,
        Self::O,
        Self::T,
        Self::L,
        Self::S,
        Self::Branch,
        Self::LeftScrew,
        Self::RightScrew,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use cubefall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("leftScrew"), Some(PieceKind::LeftScrew));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(Self::I),
            "o" => Some(Self::O),
            "t" => Some(Self::T),
            "l" => Some(Self::L),
            "s" => Some(Self::S),
            "branch" => Some(Self::Branch),
            "leftscrew" => Some(Self::LeftScrew),
            "rightscrew" => Some(Self::RightScrew),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::I => "i",
            Self::O => "o",
            Self::T => "t",
            Self::L => "l",
            Self::S => "s",
            Self::Branch => "branch",
            Self::LeftScrew => "leftScrew",
            Self::RightScrew => "rightScrew",
        }
    }
}

/// Game lifecycle phases
///
/// `Initializing → Playing ⇄ Paused`, and `Playing → GameOver` (terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GamePhase {
    Initializing,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::GameOver => "gameOver",
        }
    }
}

/// Semantic events emitted by the core for display and audio collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameEvent {
    /// The active piece moved one cell sideways
    Moved(Shift),
    /// The active piece rotated
    Rotated(RotationDirection),
    /// A requested move or rotation was blocked
    Collided,
    /// The active piece locked into the field
    Landed { blocks: u32 },
    /// Filled planes were cleared
    PlanesCleared { count: u32 },
    ScoreChanged(u64),
    DifficultyChanged(f64),
    /// A piece became active
    PieceSpawned(PieceKind),
    Paused(bool),
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_matches_reference_values() {
        assert_eq!(DEFAULT_FIELD_WIDTH, 10);
        assert_eq!(DEFAULT_FIELD_HEIGHT, 20);
        assert_eq!(DEFAULT_FIELD_DEPTH, 10);
        assert_eq!(DEFAULT_INITIAL_DIFFICULTY, 3.0);
        assert_eq!(SMOOTHING_FACTOR, 4.0);
        assert_eq!(SMOOTHING_BASE, 0.2);
        assert_eq!(SCORE_ON_PIECE_PLACED_FACTOR, 100.0);
        assert_eq!(SCORE_ON_PLANE_CLEAR_FACTOR, 2000.0);
    }

    #[test]
    fn test_ivec3_arithmetic() {
        let a = IVec3::new(1, 2, 3);
        let b = IVec3::new(-1, 5, 0);
        assert_eq!(a + b, IVec3::new(0, 7, 3));
        assert_eq!(a - b, IVec3::new(2, -3, 3));
        assert_eq!(-a, IVec3::new(-1, -2, -3));
        assert_eq!(a + IVec3::DOWN, IVec3::new(1, 1, 3));
    }

    #[test]
    fn test_vec3_round_ties_to_even() {
        assert_eq!(Vec3::new(0.5, 1.5, -0.5).round(), IVec3::new(0, 2, 0));
        assert_eq!(Vec3::new(4.9999, 3.0001, -2.2).round(), IVec3::new(5, 3, -2));
    }

    #[test]
    fn test_rotation_inverse_pairs() {
        for direction in RotationDirection::ALL {
            assert_ne!(direction, direction.inverse());
            assert_eq!(direction.inverse().inverse(), direction);
        }
    }

    #[test]
    fn test_rotation_direction_names_roundtrip() {
        for direction in RotationDirection::ALL {
            assert_eq!(RotationDirection::from_str(direction.as_str()), Some(direction));
        }
    }

    #[test]
    fn test_shift_offsets_are_horizontal_units() {
        for shift in Shift::ALL {
            let o = shift.offset();
            assert_eq!(o.y, 0);
            assert_eq!(o.x.abs() + o.z.abs(), 1);
            assert_eq!(GameAction::from(shift).shift(), Some(shift));
        }
    }

    #[test]
    fn test_piece_kind_names() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
    }
}
