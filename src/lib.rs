//! Cubefall (workspace facade crate).
//!
//! Re-exports the workspace crates under short names so binaries, tests and benches can
//! use `cubefall::{core,engine,types}`.

pub use cubefall_core as core;
pub use cubefall_engine as engine;
pub use cubefall_types as types;
