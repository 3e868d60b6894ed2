//! Helpers that drive a [`cubefall_core::GameState`] one whole piece at a time
//!
//! - [`place`]: rotate, shift and drop the active piece at a chosen column
//! - [`autoplay`]: pick a column and orientation for the active piece

pub mod autoplay;
pub mod place;

pub use autoplay::{plan, step, Placement};
pub use place::{apply_place, PlaceError};
