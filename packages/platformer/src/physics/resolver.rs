//! Per-tick movement of a platformer body.
//!
//! A tick takes the body's controller commands, turns them into velocity,
//! then moves the body in sub-steps no longer than the configured maximum.
//! Each sub-step moves along x and resolves x collisions before it moves along
//! y and resolves y collisions.

use super::{
    body::{
        Body,
        BodyKey,
        Commands,
        PlatformerPhysics,
    },
    collision::Collider,
    events::EventSink,
    stage::Stage,
    sweep::collide_in_one_direction,
};
use tile_grid::{
    sloped_xy_pull,
    AaRect,
    Axis,
    TypeMask,
};
use vek::*;


/// Stands in for zero run acceleration, which means instantly reaching top
/// speed.
const INSTANT_ACCELERATION: f32 = 1.0e12;

/// Do a tick of physics to the body at `key`. Does nothing if there is no
/// such body or it has no physics.
pub fn tick_body(stage: &mut Stage, key: BodyKey, dt: f32, sink: &mut dyn EventSink) {
    debug_assert!(dt.is_finite(), "non-finite tick length {}", dt);
    let Some(ax) = intake_commands(stage, key) else { return };

    let max_substep = stage.settings().max_substep;
    let mut remaining = dt;
    while remaining > 0.0 {
        let step = remaining.min(max_substep);
        substep(stage, key, step, ax, sink);
        remaining -= step;
    }
}

/// Apply controller commands to the body's velocity and ladder state, and
/// return the x acceleration for this tick.
fn intake_commands(stage: &mut Stage, key: BodyKey) -> Option<f32> {
    let ladder_rect = stage.body(key)?
        .physics.as_ref()?
        .touched_ladder
        .and_then(|ladder| stage.body(ladder))
        .map(|ladder| ladder.rect);

    let body = stage.body_mut(key)?;
    let Body { rect, vel, types, physics, brain, dock, .. } = body;
    let phys = physics.as_mut()?;
    let mut ax = phys.next_push_back();

    let Some(commands) = *brain else {
        vel.x = 0.0;
        return Some(ax);
    };

    // horizontal
    let run = if phys.run_acceleration != 0.0 { phys.run_acceleration } else { INSTANT_ACCELERATION };
    if commands.contains(Commands::LEFT | Commands::RIGHT) {
        vel.x = 0.0;
    } else if commands.contains(Commands::LEFT) {
        if phys.stops_abruptly_on_direction_change && vel.x > 0.0 {
            vel.x = 0.0;
        }
        ax -= run;
        leave_ladder(phys, types);
    } else if commands.contains(Commands::RIGHT) {
        if phys.stops_abruptly_on_direction_change && vel.x < 0.0 {
            vel.x = 0.0;
        }
        ax += run;
        leave_ladder(phys, types);
    } else {
        vel.x = 0.0;
    }

    // vertical
    if phys.on_ladder.is_some() {
        vel.y = 0.0;
    }
    let mut lock_onto = None;
    let mut jump = false;
    if commands.contains(Commands::UP) {
        match (phys.on_ladder, ladder_rect) {
            (Some(_), Some(ladder)) if rect.bottom() > ladder.top() => vel.y = -phys.climb_speed,
            // reached the top
            (Some(_), _) => leave_ladder(phys, types),
            (None, Some(ladder)) if ladder.bottom() >= rect.bottom() && rect.bottom() > ladder.top() =>
                lock_onto = phys.touched_ladder,
            (None, _) => (),
        }
    } else if commands.contains(Commands::DOWN) {
        match (phys.on_ladder, ladder_rect) {
            (Some(_), Some(ladder)) if rect.bottom() < ladder.bottom() => vel.y = phys.climb_speed,
            // reached the bottom
            (Some(_), _) => leave_ladder(phys, types),
            (None, Some(ladder)) if rect.bottom() < ladder.bottom() && dock.is_docked() =>
                lock_onto = phys.touched_ladder,
            (None, _) => (),
        }
    } else if phys.can_jump {
        if !commands.contains(Commands::JUMP) {
            phys.jump_held = false;
        } else {
            if (phys.on_ladder.is_some() || dock.is_docked()) && !phys.jump_held {
                leave_ladder(phys, types);
                vel.y = -phys.jump_speed;
                jump = true;
            }
            phys.jump_held = true;
        }
    }

    if jump {
        trace!(key, "jump");
        stage.undock(key);
    }
    if let Some(ladder) = lock_onto {
        lock_ladder(stage, key, ladder);
    }
    Some(ax)
}

/// Lock a body into climbing a ladder.
fn lock_ladder(stage: &mut Stage, key: BodyKey, ladder: BodyKey) {
    let Some(center_x) = stage.body(ladder).map(|ladder| ladder.rect.center_x()) else { return };
    stage.undock_riders(key);

    let Some(body) = stage.body_mut(key) else { return };
    let Some(phys) = body.physics.as_mut() else { return };
    phys.on_ladder = Some(ladder);
    phys.gravity = false;
    phys.type_before_ladder = Some(body.types);
    body.rect.set_center_x(center_x);
    body.vel.x = 0.0;
    body.types &= !(TypeMask::DOCKABLE | TypeMask::ONE_WAY_PLATFORM);
    debug!(key, ladder, "locked onto ladder");
}

/// Release a body from its ladder, if it's on one.
pub(crate) fn leave_ladder(phys: &mut PlatformerPhysics, types: &mut TypeMask) {
    if let Some(ladder) = phys.on_ladder.take() {
        phys.gravity = true;
        if let Some(before) = phys.type_before_ladder.take() {
            *types = before;
        }
        debug!(ladder, "left ladder");
    }
}

fn substep(stage: &mut Stage, key: BodyKey, dt: f32, ax: f32, sink: &mut dyn EventSink) {
    let gravity_y = stage.settings().gravity_y;
    let original_pos;
    {
        let Some(body) = stage.body_mut(key) else { return };
        let Body { rect, vel, physics, dock, .. } = body;
        let Some(phys) = physics.as_mut() else { return };

        vel.x = clamp_abs(vel.x + ax * dt, phys.vx_max);
        if phys.gravity {
            vel.y += gravity_y * dt;
        }
        vel.y = clamp_abs(vel.y, phys.max_fall_speed);

        if phys.sinking_until.map(|until| rect.top() >= until).unwrap_or(false) {
            vel.y = 0.0;
        }

        if *vel != Vec2::zero() {
            if phys.on_ladder.is_none() {
                phys.touched_ladder = None;
            }
            phys.at_wall = false;
            phys.at_exit = false;
            dock.to_determine();
        }
        original_pos = rect.pos;
    }

    // x
    let vx = stage.body(key).map(|body| body.vel.x).unwrap_or(0.0);
    if vx != 0.0 {
        stage.move_body(key, Vec2::new(vx * dt, 0.0));
        pull_onto_docked_slope(stage, key);
        collide_in_one_direction(stage, key, Axis::X, vx, original_pos, sink);
    }

    // y
    let vy = stage.body(key).map(|body| body.vel.y).unwrap_or(0.0);
    if vy != 0.0 {
        let mut dy = vy * dt;
        // keep bodies resting on the ground in contact with it
        if dy > 0.0 && dy < 1.0 {
            dy = 1.0;
        }
        stage.move_body(key, Vec2::new(0.0, dy));
        collide_in_one_direction(stage, key, Axis::Y, vy, original_pos, sink);
        if stage.body(key).map(|body| body.dock.is_undetermined()).unwrap_or(false) {
            stage.undock(key);
        }
    }
}

/// If the body stands on a sloped tile, make its height follow the slope.
fn pull_onto_docked_slope(stage: &mut Stage, key: BodyKey) {
    let Some(body) = stage.body(key) else { return };
    if !body.dock.is_docked() {
        return;
    }
    let Some(Collider::Tile(tc)) = body.dock.docked_to() else { return };
    let Some(tile) = stage.grid().tile_at(tc.x, tc.y) else { return };
    if tile.slope == 0.0 {
        return;
    }
    let mut pulled: AaRect = body.rect;
    sloped_xy_pull(tile, &mut pulled);
    let dy = pulled.pos.y - body.rect.pos.y;
    stage.move_body(key, Vec2::new(0.0, dy));
}

/// Clamp `val` into `-max..=max`.
fn clamp_abs(val: f32, max: f32) -> f32 {
    if val.abs() > max {
        max.copysign(val)
    } else {
        val
    }
}
