//! Sweeping a moved body along one axis against tiles and other bodies.

use super::{
    body::BodyKey,
    collision::{
        collide,
        Collider,
        Collision,
    },
    events::{
        EventSink,
        PhysicsEvent,
    },
    response::handle_collision,
    stage::Stage,
};
use crate::error::PhysicsError;
use tile_grid::{
    height_at,
    highest_in_run,
    sloped_xy_pull,
    Axis,
    Tile,
    TypeMask,
};
use vek::*;


/// Velocity used to lift a body onto a full tile it walked into from an
/// adjoining slope.
const STEP_UP_VELOCITY: f32 = 0.1;

/// Detect and resolve all collisions of a body that just moved along `axis`
/// with signed speed `vel`. `original_pos` is where the body was before the
/// move.
///
/// Tiles come first, and the first tile obstructing the body ends the tile
/// scan. Then every other body the moving body reacts to is tested.
pub fn collide_in_one_direction(
    stage: &mut Stage,
    key: BodyKey,
    axis: Axis,
    vel: f32,
    original_pos: Vec2<f32>,
    sink: &mut dyn EventSink,
) {
    sweep(stage, key, axis, vel, original_pos, sink, &[]);
}

/// `collide_in_one_direction`, ignoring the bodies in `pushers`, which are in
/// the middle of pushing this one.
pub(crate) fn sweep(
    stage: &mut Stage,
    key: BodyKey,
    axis: Axis,
    vel: f32,
    original_pos: Vec2<f32>,
    sink: &mut dyn EventSink,
    pushers: &[BodyKey],
) {
    let Some(body) = stage.body(key) else { return };
    trace!(key, ?axis, vel, "sweep");
    if body.collision_mask.contains(TypeMask::DEFAULT)
        && stage.grid().types().contains(TypeMask::DEFAULT)
    {
        sweep_tiles(stage, key, axis, vel, original_pos, sink, pushers);
    }
    sweep_bodies(stage, key, axis, vel, original_pos, sink, pushers);
}

fn sweep_tiles(
    stage: &mut Stage,
    key: BodyKey,
    axis: Axis,
    vel: f32,
    original_pos: Vec2<f32>,
    sink: &mut dyn EventSink,
    pushers: &[BodyKey],
) {
    let Some(body) = stage.body(key) else { return };
    let rect = body.rect;
    let range = stage.grid().overlapping_tile_range(&rect);
    let tile_ext = stage.grid().tile_ext();

    match axis {
        Axis::X => {
            let allow_stairs_climb = body.physics.as_ref()
                .map(|phys| phys.allow_stairs_climb)
                .unwrap_or(false);
            let is_docked = body.dock.is_docked();

            // columns in the direction of travel, looking for full tiles
            let dir: i64 = if vel > 0.0 { 1 } else { -1 };
            let columns: Vec<u32> =
                if dir > 0 {
                    range.xs().collect()
                } else {
                    range.xs().rev().collect()
                };
            for tx in columns {
                for ty in range.ys() {
                    let Some(tile) = stage.grid().tile_at(tx, ty) else { continue };
                    if !tile.is_full() {
                        continue;
                    }
                    let tile = tile.clone();

                    // an up-slope leading onto this tile from where we come from?
                    let neighbor = stage.grid()
                        .tile_at_signed(tx as i64 - dir, ty as i64)
                        .cloned();
                    let neighbor_edge_height = neighbor.as_ref()
                        .map(|n| height_at(n, if dir > 0 { tile_ext.w } else { 0.0 }))
                        .unwrap_or(0.0);

                    let col =
                        if neighbor_edge_height > 0.0
                            && (neighbor_edge_height >= tile.offset * tile_ext.h || allow_stairs_climb)
                        {
                            // step up onto the tile instead of bumping into it
                            collide_tile(stage, key, &tile, Axis::Y, STEP_UP_VELOCITY, original_pos)
                        } else {
                            let slope_below = neighbor.as_ref().filter(|_| neighbor_edge_height > 0.0);
                            if let (Some(neighbor), true) = (slope_below, is_docked) {
                                // climb the slope as far as it goes before bumping
                                let bottom = stage.body(key).map(|body| body.rect.bottom()).unwrap_or(0.0);
                                let surface = neighbor.rect.bottom() - neighbor_edge_height;
                                stage.move_body(key, Vec2::new(0.0, surface - bottom));
                            }
                            collide_tile(stage, key, &tile, axis, vel, original_pos)
                        };
                    if let Some(col) = col {
                        dispatch(stage, col, sink, pushers);
                        return;
                    }
                }
            }
            // nothing in the way, so check the ground like when falling
            sweep_ground(stage, key, axis, vel, original_pos, sink, pushers);
        }
        Axis::Y if vel < 0.0 => {
            // ceilings are full tiles only
            for ty in range.ys().rev() {
                for tx in range.xs() {
                    let Some(tile) = stage.grid().tile_at(tx, ty) else { continue };
                    if !tile.is_full() {
                        continue;
                    }
                    let tile = tile.clone();
                    if let Some(col) = collide_tile(stage, key, &tile, axis, vel, original_pos) {
                        dispatch(stage, col, sink, pushers);
                        return;
                    }
                }
            }
        }
        Axis::Y => sweep_ground(stage, key, axis, vel, original_pos, sink, pushers),
    }
}

/// Scan tile rows top to bottom for the first row with any height under the
/// body, and land on, stick to, or follow the highest tile in it.
fn sweep_ground(
    stage: &mut Stage,
    key: BodyKey,
    axis: Axis,
    vel: f32,
    original_pos: Vec2<f32>,
    sink: &mut dyn EventSink,
    pushers: &[BodyKey],
) {
    let Some(body) = stage.body(key) else { return };
    let rect = body.rect;
    let is_docked = body.dock.is_docked();
    let docked_to = body.dock.docked_to();
    let range = stage.grid().overlapping_tile_range(&rect);

    let mut highest: Option<(Tile, f32)> = None;
    for ty in range.ys() {
        let row = range.xs()
            .map(|tx| stage.grid().tile_at(tx, ty))
            .collect::<Vec<_>>();
        if let Some((tile, height)) = highest_in_run(&row, rect.left(), rect.right()) {
            highest = Some((tile.clone(), height));
            break;
        }
    }
    let Some((tile, height)) = highest else { return };
    let tile_collider = Collider::Tile(tile.tc());

    match axis {
        Axis::Y => {
            let Some(mut col) = collide_tile(stage, key, &tile, axis, vel, original_pos) else { return };
            // the box test knows nothing about slopes, and the normal points up
            let separate_y = tile.rect.bottom() - height - rect.bottom();
            col.separate.y = separate_y;
            col.distance = separate_y;
            col.magnitude = separate_y.abs();
            // don't snap onto slopes we merely graze while in the air
            if is_docked || col.separate.y < 0.0 {
                dispatch(stage, col, sink, pushers);
            }
        }
        Axis::X if docked_to != Some(tile_collider) => {
            let mut pulled = rect;
            sloped_xy_pull(&tile, &mut pulled);
            stage.move_body(key, Vec2::new(0.0, pulled.bottom() - rect.bottom()));
            if is_docked {
                redock(stage, key, tile_collider);
            }
        }
        Axis::X => {
            if is_docked {
                redock(stage, key, tile_collider);
            }
        }
    }
}

fn collide_tile(
    stage: &Stage,
    key: BodyKey,
    tile: &Tile,
    axis: Axis,
    vel: f32,
    original_pos: Vec2<f32>,
) -> Option<Collision> {
    let rect = stage.body(key)?.rect;
    collide(
        Collider::Body(key),
        &rect,
        Collider::Tile(tile.tc()),
        &tile.rect,
        axis,
        vel,
        original_pos,
    )
}

fn redock(stage: &mut Stage, key: BodyKey, support: Collider) {
    if let Err(e) = stage.dock_to(key, support) {
        log_rejected(key, e);
    }
}

/// Log a refused docking or push back, at a level depending on whether it
/// points to a mis-wired stage.
pub(crate) fn log_rejected(key: BodyKey, e: PhysicsError) {
    match e {
        PhysicsError::NotDockable { .. } => trace!(key, %e, "not docking"),
        _ => warn!(key, %e, "rejected physics operation"),
    }
}

fn sweep_bodies(
    stage: &mut Stage,
    key: BodyKey,
    axis: Axis,
    vel: f32,
    original_pos: Vec2<f32>,
    sink: &mut dyn EventSink,
    pushers: &[BodyKey],
) {
    let others = stage.bodies()
        .map(|(other, _)| other)
        .filter(|&other| other != key && !pushers.contains(&other))
        .collect::<Vec<_>>();
    for other in others {
        let (Some(this_body), Some(other_body)) = (stage.body(key), stage.body(other)) else {
            continue;
        };
        if !this_body.reacts_to(other_body) {
            continue;
        }
        let col = collide(
            Collider::Body(key),
            &this_body.rect,
            Collider::Body(other),
            &other_body.rect,
            axis,
            vel,
            original_pos,
        );
        if let Some(col) = col {
            dispatch(stage, col, sink, pushers);
        }
    }
}

/// Hand a collision to the moving body's collision response, and let the
/// other participant know about it unless it looks after itself.
fn dispatch(stage: &mut Stage, col: Collision, sink: &mut dyn EventSink, pushers: &[BodyKey]) {
    let Collider::Body(key) = col.this else { return };
    trace!(key, other = ?col.other, axis = ?col.axis, separate = ?col.separate, "collision");

    let handles_own = stage.body(key)
        .map(|body| body.handles_own_collisions && body.physics.is_some())
        .unwrap_or(false);
    if handles_own {
        handle_collision(stage, col, sink, pushers);
    } else {
        sink.notify(key, PhysicsEvent::Collided(col));
    }

    if let Collider::Body(other) = col.other {
        let other_handles_own = stage.body(other)
            .map(|body| body.handles_own_collisions)
            .unwrap_or(true);
        if !other_handles_own {
            sink.notify(other, PhysicsEvent::Collided(col.inverted()));
        }
    }
}
