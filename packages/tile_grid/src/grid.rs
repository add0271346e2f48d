//! The tile grid.

use crate::{
    rect::AaRect,
    tile::{
        Tile,
        TileShape,
    },
    types::TypeMask,
};
use std::ops::{
    Index,
    RangeInclusive,
};
use vek::*;


/// Fixed-size 2D grid of optional tiles, addressed by tile coordinates.
///
/// Built once per level, then only read from.
#[derive(Debug, Clone)]
pub struct TileGrid {
    size: Extent2<u32>,
    tile_ext: Extent2<f32>,
    types: TypeMask,
    tiles: Vec<Option<Tile>>,
}

/// Inclusive range of tile coordinates, as returned by
/// `TileGrid::overlapping_tile_range`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TileRange {
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
}

impl TileRange {
    pub fn xs(&self) -> RangeInclusive<u32> {
        self.x_start..=self.x_end
    }

    pub fn ys(&self) -> RangeInclusive<u32> {
        self.y_start..=self.y_end
    }
}

impl TileGrid {
    /// Construct an empty grid of `width` by `height` tiles. Every tile in the
    /// grid will have type `types`.
    pub fn new(
        width: u32,
        height: u32,
        tile_ext: Extent2<f32>,
        types: TypeMask,
    ) -> Self {
        assert!(width > 0 && height > 0, "tile grid must not be empty");
        assert!(tile_ext.w > 0.0 && tile_ext.h > 0.0, "tiles must have area");
        TileGrid {
            size: Extent2::new(width, height),
            tile_ext,
            types,
            tiles: vec![None; width as usize * height as usize],
        }
    }

    /// Build a grid from rows of characters, top row first.
    ///
    /// - `#`: full tile
    /// - `/`: rising 45° slope
    /// - `\`: falling 45° slope
    /// - `_`: flat tile of half height
    /// - `<`: lower half of a rising slope spanning two tiles
    /// - `>`: upper half of a rising slope spanning two tiles
    /// - `.` or space: nothing
    ///
    /// Panics on any other character.
    pub fn from_rows(
        rows: &[&str],
        tile_ext: Extent2<f32>,
        types: TypeMask,
    ) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = TileGrid::new(width as u32, rows.len() as u32, tile_ext, types);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let shape = match c {
                    '#' => TileShape::FULL,
                    '/' => TileShape::sloped(0.0, 1.0, tile_ext),
                    '\\' => TileShape::sloped(1.0, 0.0, tile_ext),
                    '_' => TileShape::flat(0.5),
                    '<' => TileShape::sloped(0.0, 0.5, tile_ext),
                    '>' => TileShape::sloped(0.5, 1.0, tile_ext),
                    '.' | ' ' => continue,
                    c => panic!("unknown tile character {:?} at {},{}", c, x, y),
                };
                grid.set(Vec2::new(x as u32, y as u32), shape);
            }
        }
        grid
    }

    fn idx(&self, tc: Vec2<u32>) -> usize {
        tc.y as usize * self.size.w as usize + tc.x as usize
    }

    /// Put a tile at `tc`, replacing whatever was there.
    ///
    /// Panics if `tc` is outside the grid.
    pub fn set(&mut self, tc: Vec2<u32>, shape: TileShape) {
        assert!(
            tc.x < self.size.w && tc.y < self.size.h,
            "tile coordinate {:?} outside of {:?} grid", tc, self.size,
        );
        let rect = AaRect {
            pos: tc.as_::<f32>() * Vec2::from(self.tile_ext),
            ext: self.tile_ext,
        };
        let i = self.idx(tc);
        self.tiles[i] = Some(Tile::new(tc, rect, shape, self.types));
    }

    /// Remove the tile at `tc`, if any.
    pub fn clear(&mut self, tc: Vec2<u32>) {
        if tc.x < self.size.w && tc.y < self.size.h {
            let i = self.idx(tc);
            self.tiles[i] = None;
        }
    }

    pub fn tile_at(&self, tx: u32, ty: u32) -> Option<&Tile> {
        if tx < self.size.w && ty < self.size.h {
            self.tiles[self.idx(Vec2::new(tx, ty))].as_ref()
        } else {
            None
        }
    }

    /// Like `tile_at`, but tolerates coordinates left of or above the grid,
    /// for probing neighbors.
    pub fn tile_at_signed(&self, tx: i64, ty: i64) -> Option<&Tile> {
        match (u32::try_from(tx), u32::try_from(ty)) {
            (Ok(tx), Ok(ty)) => self.tile_at(tx, ty),
            _ => None,
        }
    }

    /// Range of tiles a rect overlaps with, clamped into the grid.
    ///
    /// A rect reaching past the grid's edge gets the edge row or column
    /// rather than nothing.
    pub fn overlapping_tile_range(&self, rect: &AaRect) -> TileRange {
        fn clamped(pixel: f32, tile_len: f32, dim: u32) -> u32 {
            ((pixel / tile_len).floor() as i64).clamp(0, dim as i64 - 1) as u32
        }
        TileRange {
            x_start: clamped(rect.left(), self.tile_ext.w, self.size.w),
            x_end: clamped(rect.right() - 1.0, self.tile_ext.w, self.size.w),
            y_start: clamped(rect.top(), self.tile_ext.h, self.size.h),
            y_end: clamped(rect.bottom() - 1.0, self.tile_ext.h, self.size.h),
        }
    }

    /// Grid size in tiles.
    pub fn size(&self) -> Extent2<u32> {
        self.size
    }

    /// Size of a single tile in pixels.
    pub fn tile_ext(&self) -> Extent2<f32> {
        self.tile_ext
    }

    /// Type shared by every tile of this grid.
    pub fn types(&self) -> TypeMask {
        self.types
    }

    pub fn pixel_width(&self) -> f32 {
        self.size.w as f32 * self.tile_ext.w
    }

    pub fn pixel_height(&self) -> f32 {
        self.size.h as f32 * self.tile_ext.h
    }

    /// Iterate over all tiles present.
    pub fn tiles(&self) -> impl Iterator<Item=&Tile> + '_ {
        self.tiles.iter().filter_map(Option::as_ref)
    }
}

/// Panics if out of range.
impl Index<Vec2<u32>> for TileGrid {
    type Output = Option<Tile>;

    fn index(&self, tc: Vec2<u32>) -> &Option<Tile> {
        assert!(tc.x < self.size.w && tc.y < self.size.h, "tile coordinate out of range");
        &self.tiles[self.idx(tc)]
    }
}
