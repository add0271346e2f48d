//! Platformer physics simulation system.
//!
//! This physics system is fundamentally built around axis-aligned rects moving over a tile grid,
//! and makes considerable logic simplifications by resolving one axis at a time. The gist is:
//!
//! - The `Stage` owns the level's `TileGrid` and an arena of `Body`s, addressed by `BodyKey`.
//! - Bodies with `PlatformerPhysics` get moved by `Stage::tick`, which for each body turns its
//!   controller's commands into velocity and then moves it in bounded sub-steps, first along x,
//!   then along y.
//! - After each single-axis move, the body is swept against the tile grid and the other bodies
//!   (`collide_in_one_direction`). Tiles are scanned in the direction of travel and the first
//!   obstruction wins. Slopes are handled by measuring tile heights rather than boxes.
//! - Collisions are responded to immediately (`handle_collision`): landing docks the body onto
//!   what it landed on, so that moving platforms carry their riders along.
//! - Everything interesting that happens is reported to an `EventSink` as a `PhysicsEvent`.

pub mod collision;
pub mod body;
pub mod dock;
pub mod stage;
pub mod events;
pub mod resolver;
pub mod sweep;
pub mod response;


/// Physics system common re-exports.
pub mod prelude {
    pub use super::{
        collision::{
            collide,
            Collider,
            Collision,
        },
        body::{
            Body,
            BodyKey,
            Commands,
            PlatformerPhysics,
            MAX_PUSH_BACK_FRAMES,
        },
        dock::{
            Dockable,
            DockingState,
        },
        stage::Stage,
        events::{
            EventSink,
            PhysicsEvent,
        },
        resolver::tick_body,
        sweep::collide_in_one_direction,
        response::handle_collision,
    };
}
