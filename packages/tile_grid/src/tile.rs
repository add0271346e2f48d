//! Tile records.

use crate::{
    rect::AaRect,
    types::TypeMask,
};
use vek::*;


/// Shape of a tile, as given when building a grid.
///
/// The surface of a tile is the line `y = slope * x + offset * h`, measured
/// from the tile's bottom-left corner with y pointing up. The tile is solid
/// below that line.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileShape {
    /// Rise in pixels per pixel of run. Zero for flat tiles.
    pub slope: f32,
    /// Fraction of the tile height the surface sits at on the tile's left
    /// edge.
    pub offset: f32,
}

impl TileShape {
    pub const FULL: Self = TileShape { slope: 0.0, offset: 1.0 };

    /// Flat tile filled up to `offset` of its height.
    pub fn flat(offset: f32) -> Self {
        TileShape { slope: 0.0, offset }
    }

    /// Tile whose surface goes from `from` to `to` (fractions of the tile
    /// height) across the tile's width.
    pub fn sloped(from: f32, to: f32, tile_ext: Extent2<f32>) -> Self {
        TileShape {
            slope: (to - from) * tile_ext.h / tile_ext.w,
            offset: from,
        }
    }
}


/// One solid tile of a grid. Immutable once the grid is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub tile_x: u32,
    pub tile_y: u32,
    /// Pixel rect of the whole tile cell.
    pub rect: AaRect,
    pub slope: f32,
    pub offset: f32,
    pub types: TypeMask,
    max_height: f32,
}

impl Tile {
    pub fn new(tc: Vec2<u32>, rect: AaRect, shape: TileShape, types: TypeMask) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&shape.offset),
            "tile offset out of range: {}", shape.offset,
        );
        let mut tile = Tile {
            tile_x: tc.x,
            tile_y: tc.y,
            rect,
            slope: shape.slope,
            offset: shape.offset,
            types,
            max_height: 0.0,
        };
        tile.max_height = crate::slope::height_at(&tile, 0.0)
            .max(crate::slope::height_at(&tile, rect.ext.w));
        tile
    }

    pub fn tc(&self) -> Vec2<u32> {
        Vec2::new(self.tile_x, self.tile_y)
    }

    /// Flat and solid across the whole cell.
    pub fn is_full(&self) -> bool {
        self.slope == 0.0 && self.offset == 1.0
    }

    /// Highest surface point anywhere across the tile, in pixels above its
    /// bottom edge.
    pub fn max_height(&self) -> f32 {
        self.max_height
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn tile(shape: TileShape) -> Tile {
        Tile::new(
            Vec2::new(2, 3),
            AaRect::new(32.0, 48.0, 16.0, 16.0),
            shape,
            TypeMask::DEFAULT,
        )
    }

    #[test]
    fn full_tiles() {
        assert!(tile(TileShape::FULL).is_full());
        assert!(!tile(TileShape::flat(0.5)).is_full());
        assert_eq!(tile(TileShape::FULL).max_height(), 16.0);
    }

    #[test]
    fn max_height_of_slopes() {
        let ext = Extent2::new(16.0, 16.0);
        assert_eq!(tile(TileShape::sloped(0.0, 1.0, ext)).max_height(), 16.0);
        assert_eq!(tile(TileShape::sloped(1.0, 0.0, ext)).max_height(), 16.0);
        assert_eq!(tile(TileShape::sloped(0.0, 0.5, ext)).max_height(), 8.0);
        assert_eq!(tile(TileShape::sloped(0.0, 0.5, ext)).slope, 0.5);
    }
}
