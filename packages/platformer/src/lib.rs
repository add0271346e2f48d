//! Movement, collision detection and collision resolution for a tile-grid 2D platformer.
//!
//! Bodies run over slopes, climb ladders, jump, ride moving platforms, push rocks around and
//! sink into liquids. See the `physics` module for how.

#[macro_use]
extern crate tracing;

pub mod logging;
pub mod settings;
pub mod error;
pub mod physics;
pub mod viewport;
