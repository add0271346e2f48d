//! What a platformer body does when it collides with something.

use super::{
    body::BodyKey,
    collision::{
        Collider,
        Collision,
    },
    events::{
        EventSink,
        PhysicsEvent,
    },
    stage::Stage,
    sweep::{
        log_rejected,
        sweep,
    },
};
use tile_grid::{
    Axis,
    TypeMask,
};
use vek::*;


/// Normal component past which a collision counts as coming from that side.
const SIDE_THRESHOLD: f32 = 0.3;

/// Respond to a collision of the body `col.this`, which must have physics.
///
/// Checked in order: particles, one-way platforms, ladders, exits, liquids,
/// and finally plain solid contact.
pub fn handle_collision(
    stage: &mut Stage,
    mut col: Collision,
    sink: &mut dyn EventSink,
    pushers: &[BodyKey],
) {
    let Collider::Body(key) = col.this else { return };
    let (Some(other_types), Some(other_rect)) = (
        stage.collider_types(col.other),
        stage.collider_rect(col.other),
    ) else { return };
    let other_body = col.other.body();

    // getting hit by a particle
    if other_types.contains(TypeMask::PARTICLE) {
        hit_by_particle(stage, key, &col, sink);
        return;
    }

    let Some(body) = stage.body_mut(key) else { return };
    let height = body.rect.ext.h;
    let Some(phys) = body.physics.as_mut() else { return };

    // one-way platforms only hold up what comes from above
    if other_types.contains(TypeMask::ONE_WAY_PLATFORM) {
        if other_types.contains(TypeMask::LADDER) {
            phys.touched_ladder = other_body;
            if phys.on_ladder.is_some() {
                return;
            }
        }
        if col.axis == Axis::X
            || col.direction_velocity < 0.0
            || col.original_pos.y + height > other_rect.top()
        {
            return;
        }
    } else if other_types.contains(TypeMask::LADDER) {
        phys.touched_ladder = other_body;
        return;
    }

    if other_types.contains(TypeMask::EXIT) {
        phys.at_exit = true;
        debug!(key, "reached exit");
        sink.notify(key, PhysicsEvent::ReachedExit);
        return;
    }

    if other_types.contains(TypeMask::LIQUID) {
        phys.sinking_until = Some(other_rect.top());
        phys.gravity = false;
        body.vel.y = 0.01;
        body.collision_mask = TypeMask::empty();
        let description = other_body
            .and_then(|other| stage.body(other))
            .and_then(|other| other.description.clone());
        stage.move_body(key, Vec2::new(0.0, col.separate.y));
        debug!(key, ?description, "sinking into liquid");
        sink.notify(key, PhysicsEvent::HitLiquid { description });
        return;
    }

    solid_contact(stage, key, &mut col, other_types, sink, pushers);
}

fn hit_by_particle(stage: &mut Stage, key: BodyKey, col: &Collision, sink: &mut dyn EventSink) {
    let accel = stage.settings().push_back_accel;
    let frames = stage.settings().push_back_frames;
    let particle_vx = col.other.body()
        .and_then(|other| stage.body(other))
        .map(|other| other.vel.x)
        .unwrap_or(0.0);

    let Some(phys) = stage.body_mut(key).and_then(|body| body.physics.as_mut()) else { return };
    if phys.is_heavy {
        return;
    }
    let dir =
        if col.normal.x != 0.0 {
            col.normal.x.signum()
        } else if particle_vx != 0.0 {
            particle_vx.signum()
        } else {
            0.0
        };
    if dir != 0.0 {
        if let Err(e) = phys.push_back(vec![accel * dir; frames]) {
            log_rejected(key, e);
        }
    }
    sink.notify(key, PhysicsEvent::HitParticle(*col));
}

fn solid_contact(
    stage: &mut Stage,
    key: BodyKey,
    col: &mut Collision,
    other_types: TypeMask,
    sink: &mut dyn EventSink,
    pushers: &[BodyKey],
) {
    let Some(body) = stage.body(key) else { return };
    let Some(phys) = body.physics.as_ref() else { return };
    let is_heavy = phys.is_heavy;
    let impact = body.vel.map(f32::abs);
    let y_before = body.rect.pos.y;
    let was_docked = body.dock.is_docked();

    // facts about the other body, if it has physics
    let other = col.other.body()
        .and_then(|other| stage.body(other).map(|body| (other, body)))
        .and_then(|(other, body)| body.physics.as_ref().map(|phys| OtherPhysics {
            key: other,
            is_pushable: phys.is_pushable,
            is_heavy: phys.is_heavy,
            squeeze_speed: phys.squeeze_speed,
            vx_max: phys.vx_max,
            is_docked: body.dock.is_docked(),
        }));

    col.impact = 0.0;
    stage.move_body(key, col.separate);

    // landing on something
    if col.normal.y < -SIDE_THRESHOLD {
        if is_heavy && !was_docked && other_types.contains(TypeMask::DEFAULT) {
            sink.notify(key, PhysicsEvent::ShakeViewport);
        }

        let vy = stage.body(key).map(|body| body.vel.y).unwrap_or(0.0);
        let squeezed = other
            .filter(|other| {
                vy > 0.0
                    && is_heavy
                    && !other.is_heavy
                    && other.squeeze_speed > 0.0
                    && other.is_docked
            });
        if let Some(squeezed) = squeezed {
            let speed = squeezed.squeeze_speed;
            if vy > speed {
                // keep only the share of the overlap the squeeze speed allows,
                // never more than the raw move
                let y = y_before + col.separate.y * (1.0 - speed / vy);
                stage.move_body_to(key, None, Some(y));
            } else {
                stage.move_body(key, Vec2::new(0.0, -col.separate.y));
            }
            if let Some(body) = stage.body_mut(key) {
                body.vel.y = speed;
            }
            debug!(key, squeezed = squeezed.key, speed, "squeezing");
            sink.notify(squeezed.key, PhysicsEvent::SqueezedTop { by: key });
        } else {
            if let Some(body) = stage.body_mut(key) {
                if body.vel.y > 0.0 {
                    body.vel.y = 0.0;
                }
            }
            col.impact = impact.y;
            if let Err(e) = stage.dock_to(key, col.other) {
                log_rejected(key, e);
            }
            sink.notify(key, PhysicsEvent::BumpBottom(*col));
        }
    }

    // hitting a ceiling
    if col.normal.y > SIDE_THRESHOLD {
        if let Some(body) = stage.body_mut(key) {
            if body.vel.y < 0.0 {
                body.vel.y = 0.0;
            }
        }
        col.impact = impact.y;
        sink.notify(key, PhysicsEvent::BumpTop(*col));
    }

    // walking into something
    if col.normal.x.abs() > SIDE_THRESHOLD {
        col.impact = impact.x;
        let is_docked = stage.body(key).map(|body| body.dock.is_docked()).unwrap_or(false);
        let pushee = other
            .filter(|other| {
                other.is_pushable
                    && other.vx_max > 0.0
                    && is_docked
                    && !pushers.contains(&other.key)
            });

        let mut bump_wall = false;
        if let Some(pushee) = pushee {
            push(stage, key, pushee.key, pushee.vx_max, col, sink, pushers);
            bump_wall = true;
        } else if let Some(body) = stage.body_mut(key) {
            if body.vel.x * col.normal.x < 0.0 {
                body.vel.x = 0.0;
                bump_wall = true;
            }
        }

        if bump_wall {
            if other_types.contains(TypeMask::DEFAULT) {
                if let Some(phys) = stage.body_mut(key).and_then(|body| body.physics.as_mut()) {
                    phys.at_wall = true;
                }
            }
            let event =
                if col.normal.x < 0.0 {
                    PhysicsEvent::BumpRight(*col)
                } else {
                    PhysicsEvent::BumpLeft(*col)
                };
            sink.notify(key, event);
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct OtherPhysics {
    key: BodyKey,
    is_pushable: bool,
    is_heavy: bool,
    squeeze_speed: f32,
    vx_max: f32,
    is_docked: bool,
}

/// Push `pushee` along with `pusher`, which just walked into it.
///
/// The pushee moves first and resolves its own x collisions, so that it
/// stops at walls. Then the pusher gets put flush against it.
fn push(
    stage: &mut Stage,
    pusher: BodyKey,
    pushee: BodyKey,
    pushee_vx_max: f32,
    col: &Collision,
    sink: &mut dyn EventSink,
    pushers: &[BodyKey],
) {
    let Some(orig_pos) = stage.body(pushee).map(|body| body.rect.pos) else { return };
    let move_x = -col.separate.x * (pushee_vx_max / col.direction_velocity).abs();
    let vx = pushee_vx_max.copysign(col.direction_velocity);
    if let Some(body) = stage.body_mut(pusher) {
        body.vel.x = vx;
    }
    trace!(pusher, pushee, move_x, "push");

    stage.move_body(pushee, Vec2::new(move_x, 0.0));
    let mut pushers = pushers.to_vec();
    pushers.push(pusher);
    sweep(stage, pushee, Axis::X, vx, orig_pos, sink, &pushers);

    let (Some(pusher_rect), Some(pushee_rect)) = (
        stage.body(pusher).map(|body| body.rect),
        stage.body(pushee).map(|body| body.rect),
    ) else { return };
    let dx =
        if vx < 0.0 {
            pushee_rect.right() - pusher_rect.left()
        } else {
            pushee_rect.left() - pusher_rect.right()
        };
    stage.move_body(pusher, Vec2::new(dx, 0.0));
}
