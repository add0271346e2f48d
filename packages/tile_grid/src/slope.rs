//! Height math for sloped tiles.
//!
//! Heights are measured in pixels upwards from a tile's bottom edge, which is
//! the opposite of the screen convention used everywhere else.

use crate::{
    rect::AaRect,
    tile::Tile,
};


/// Surface height of `tile` at `x_local` pixels from its left edge.
///
/// `x_local` is clamped into the tile, and the result never goes below zero.
pub fn height_at(tile: &Tile, x_local: f32) -> f32 {
    let x = x_local.clamp(0.0, tile.rect.ext.w);
    (tile.slope * x + tile.offset * tile.rect.ext.h).max(0.0)
}

/// Find the highest tile in a row of tiles spanned by a rect from `start_abs`
/// to `end_abs` (absolute pixel x).
///
/// The outer tiles are measured exactly where the rect's edges cross them,
/// whereas inner tiles count with their maximum height. Ties go to the tile
/// found first. Returns `None` if nothing in the row has any height.
pub fn highest_in_run<'a>(
    tiles: &[Option<&'a Tile>],
    start_abs: f32,
    end_abs: f32,
) -> Option<(&'a Tile, f32)> {
    let (&first, rest) = tiles.split_first()?;
    let mut best: Option<(&'a Tile, f32)> = None;
    let mut consider = |tile: &'a Tile, height: f32| {
        if height > best.map(|(_, h)| h).unwrap_or(0.0) {
            best = Some((tile, height));
        }
    };

    let Some((&last, middle)) = rest.split_last() else {
        // the rect starts and ends in the same tile
        if let Some(tile) = first {
            let height = height_at(tile, start_abs - tile.rect.left())
                .max(height_at(tile, end_abs - tile.rect.left()));
            consider(tile, height);
        }
        return best;
    };

    if let Some(tile) = first {
        let height = height_at(tile, start_abs - tile.rect.left())
            .max(height_at(tile, tile.rect.ext.w));
        consider(tile, height);
    }
    for &tile in middle {
        if let Some(tile) = tile {
            consider(tile, tile.max_height());
        }
    }
    if let Some(tile) = last {
        let height = height_at(tile, end_abs - tile.rect.left())
            .max(height_at(tile, 0.0));
        consider(tile, height);
    }

    best
}

/// Snap `rect` vertically onto the surface of `tile`.
///
/// The surface is sampled under whichever of the rect's edges rides higher on
/// that slope: the right edge on rising slopes, the left edge otherwise.
pub fn sloped_xy_pull(tile: &Tile, rect: &mut AaRect) {
    let x_local =
        if tile.slope > 0.0 {
            rect.right() - tile.rect.left()
        } else {
            rect.left() - tile.rect.left()
        };
    rect.set_bottom(tile.rect.bottom() - height_at(tile, x_local));
}
