//! Tile grid data for a 2D platformer, and the geometry that goes with it.
//!
//! Basic example:
//!
//! ```
//! use tile_grid::{
//!     AaRect,
//!     TileGrid,
//!     TypeMask,
//!     TypeRegistry,
//!     highest_in_run,
//! };
//! use vek::*;
//!
//! // initialize game data
//! let mut types = TypeRegistry::new();
//! let spikes = types.register("spikes");
//! let types = types.finalize();
//! assert_eq!(types.parse("spikes,default"), Some(spikes | TypeMask::DEFAULT));
//!
//! // build a level
//! let grid = TileGrid::from_rows(
//!     &[
//!         r"......",
//!         r"..../#",
//!         r"######",
//!     ],
//!     Extent2::new(16.0, 16.0),
//!     TypeMask::DEFAULT | TypeMask::DOCKABLE,
//! );
//!
//! // which tile holds up a body standing at the foot of the slope?
//! let body = AaRect::new(60.0, 0.0, 8.0, 16.0);
//! let range = grid.overlapping_tile_range(&body);
//! let row = range.xs()
//!     .map(|tx| grid.tile_at(tx, 1))
//!     .collect::<Vec<_>>();
//! let (tile, height) = highest_in_run(&row, body.left(), body.right()).unwrap();
//! assert_eq!((tile.tile_x, tile.tile_y), (4, 1));
//! assert_eq!(height, 4.0);
//! ```
//!
//! ## coordinates
//!
//! Pixel space has its origin at the top-left corner of the level with y
//! growing downwards. A tile coordinate (tc) is a 2-vec of unsigned integers
//! wherein the tile's cell starts at the tc times the tile extent.
//!
//! ## heights
//!
//! Tile surfaces are described the other way up: the height of a tile at some
//! x is measured in pixels upwards from the bottom of the tile's cell. See the
//! `slope` functions.
//!
//! ## types
//!
//! Tiles and bodies carry a `TypeMask` saying what they are. Names for bits
//! beyond the built-in ones get registered into a `TypeRegistry` at startup,
//! which is then finalized into a read-only `TypeTable`.


mod rect;
mod axis;
mod types;
mod tile;
mod grid;
pub mod slope;


pub use self::{
    rect::AaRect,
    axis::Axis,
    types::{
        MAX_TYPE_BITS,
        TypeMask,
        TypeRegistry,
        TypeTable,
    },
    tile::{
        Tile,
        TileShape,
    },
    grid::{
        TileGrid,
        TileRange,
    },
    slope::{
        height_at,
        highest_in_run,
        sloped_xy_pull,
    },
};
