use platformer::{
    physics::prelude::*,
    settings::{
        BodySettings,
        PhysicsSettings,
    },
};
use tile_grid::{
    AaRect,
    TileGrid,
    TypeMask,
    TypeRegistry,
};
use vek::*;


const DT: f32 = 1.0 / 60.0;

fn stage(rows: &[&str]) -> Stage {
    let grid = TileGrid::from_rows(
        rows,
        Extent2::new(16.0, 16.0),
        TypeMask::DEFAULT | TypeMask::DOCKABLE,
    );
    Stage::new(grid, TypeRegistry::new().finalize(), PhysicsSettings::default())
}

fn floored() -> Stage {
    stage(&["....", "....", "....", "####"])
}

fn open() -> Stage {
    stage(&["....", "....", "....", "...."])
}

fn physics() -> PlatformerPhysics {
    PlatformerPhysics::new(&BodySettings::default())
}

fn actor(x: f32, y: f32, w: f32, h: f32) -> Body {
    Body::new(AaRect::new(x, y, w, h), TypeMask::FRIENDLY).with_physics(physics())
}

fn tick(stage: &mut Stage, key: BodyKey) -> Vec<(BodyKey, PhysicsEvent)> {
    let mut events = Vec::new();
    tick_body(stage, key, DT, &mut events);
    events
}

/// Events about `key` only.
fn about(events: &[(BodyKey, PhysicsEvent)], key: BodyKey) -> Vec<PhysicsEvent> {
    events.iter()
        .filter(|(k, _)| *k == key)
        .map(|(_, event)| event.clone())
        .collect()
}

fn count(events: &[(BodyKey, PhysicsEvent)], f: impl Fn(&(BodyKey, PhysicsEvent)) -> bool) -> usize {
    events.iter().filter(|e| f(e)).count()
}


#[test]
fn resting_on_flat_ground() {
    let mut stage = floored();
    let key = stage.add_body(actor(8.0, 32.0, 8.0, 16.0));
    for _ in 0..10 {
        let events = tick(&mut stage, key);
        assert_eq!(count(&events, |e| matches!(e, (k, PhysicsEvent::BumpBottom(_)) if *k == key)), 1);
        let body = stage.body(key).unwrap();
        assert_eq!(body.rect.pos.y, 32.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.dock.is_docked());
        assert_eq!(body.dock.docked_to(), Some(Collider::Tile(Vec2::new(0, 3))));
    }
}

#[test]
fn free_fall() {
    let mut stage = floored();
    let key = stage.add_body(actor(8.0, 0.0, 8.0, 8.0).with_vel(Vec2::new(0.0, 120.0)));
    let events = tick(&mut stage, key);
    assert!(events.is_empty());

    let body = stage.body(key).unwrap();
    let vy = 120.0 + 980.0 * DT;
    assert!((body.vel.y - vy).abs() < 1.0e-3);
    assert!((body.rect.pos.y - vy * DT).abs() < 1.0e-3);
    assert_eq!(body.dock.state(), DockingState::NotDocked);
}

#[test]
fn resting_on_a_slope() {
    let mut stage = stage(&["....", "....", "../.", "####"]);
    // right edge 12 px into a 45° rising tile
    let key = stage.add_body(actor(36.0, 28.0, 8.0, 8.0));
    for _ in 0..5 {
        let events = tick(&mut stage, key);
        let body = stage.body(key).unwrap();
        assert_eq!(body.rect.bottom(), 36.0);
        assert_eq!(body.dock.docked_to(), Some(Collider::Tile(Vec2::new(2, 2))));

        // the landing is measured against the slope surface, not the tile's box
        let landings = about(&events, key).into_iter()
            .filter_map(|event| match event {
                PhysicsEvent::BumpBottom(col) => Some(col),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(landings.len(), 1);
        let col = landings[0];
        assert_eq!(col.separate, Vec2::new(0.0, -1.0));
        assert_eq!(col.distance, -1.0);
        assert_eq!(col.magnitude, 1.0);
        assert_eq!(col.separate, col.normal * -col.distance);
    }
}

/// A body walking right with instant acceleration, docked to `support`.
fn walker(stage: &mut Stage, x: f32, y: f32, support: Vec2<u32>, stairs: bool) -> BodyKey {
    let mut phys = physics();
    phys.run_acceleration = 0.0;
    phys.allow_stairs_climb = stairs;
    let key = stage.add_body(
        Body::new(AaRect::new(x, y, 8.0, 16.0), TypeMask::FRIENDLY)
            .with_physics(phys)
            .with_brain()
    );
    stage.dock_to(key, Collider::Tile(support)).unwrap();
    stage.body_mut(key).unwrap().command(Commands::RIGHT);
    key
}

#[test]
fn walking_up_a_slope_onto_a_block() {
    let mut stage = stage(&["....", "....", "./#.", "####"]);
    // right edge 14 px into the slope
    let key = walker(&mut stage, 22.0, 18.0, Vec2::new(1, 2), false);

    let mut last_bottom = stage.body(key).unwrap().rect.bottom();
    for _ in 0..6 {
        let events = tick(&mut stage, key);
        assert_eq!(count(&events, |e| matches!(e, (_, PhysicsEvent::BumpRight(_)))), 0);
        let body = stage.body(key).unwrap();
        assert!(body.rect.bottom() <= last_bottom);
        assert!(body.dock.is_docked());
        last_bottom = body.rect.bottom();
    }
    let body = stage.body(key).unwrap();
    assert_eq!(body.rect.bottom(), 32.0);
    assert!(body.rect.left() > 32.0);
    assert_eq!(body.dock.docked_to(), Some(Collider::Tile(Vec2::new(2, 2))));
    assert!(!body.physics.as_ref().unwrap().at_wall);
}

#[test]
fn walking_down_a_slope() {
    let mut stage = stage(&["....", "....", ".#\\.", "####"]);
    let key = walker(&mut stage, 22.0, 16.0, Vec2::new(1, 2), true);

    for _ in 0..8 {
        tick(&mut stage, key);
        let body = stage.body(key).unwrap();
        assert_eq!(body.vel.y, 0.0);
        assert!(body.dock.is_docked());
        if body.rect.left() > 32.0 {
            // on a 45° falling slope, the left edge touches the surface
            assert_eq!(body.dock.docked_to(), Some(Collider::Tile(Vec2::new(2, 2))));
            assert!((body.rect.bottom() - body.rect.left()).abs() < 1.0e-3);
        } else {
            assert_eq!(body.rect.bottom(), 32.0);
        }
    }
    assert!(stage.body(key).unwrap().rect.bottom() > 40.0);
}

#[test]
fn stepping_up_stairs() {
    let mut stage = stage(&["....", "....", "._#.", "####"]);
    // standing on the half-height tile, a pixel short of the full one
    let key = walker(&mut stage, 23.0, 24.0, Vec2::new(1, 2), true);

    let events = tick(&mut stage, key);
    assert_eq!(count(&events, |e| matches!(e, (_, PhysicsEvent::BumpRight(_)))), 0);
    assert_eq!(count(&events, |e| matches!(e, (k, PhysicsEvent::BumpBottom(_)) if *k == key)), 1);
    let body = stage.body(key).unwrap();
    assert_eq!(body.rect.bottom(), 32.0);
    assert!(body.rect.right() > 32.0);
    assert_eq!(body.vel.y, 0.0);
    assert_eq!(body.dock.docked_to(), Some(Collider::Tile(Vec2::new(2, 2))));
}

#[test]
fn stairs_block_without_stairs_climbing() {
    let mut stage = stage(&["....", "....", "._#.", "####"]);
    let key = walker(&mut stage, 23.0, 24.0, Vec2::new(1, 2), false);

    let events = tick(&mut stage, key);
    assert_eq!(count(&events, |e| matches!(e, (k, PhysicsEvent::BumpRight(_)) if *k == key)), 1);
    let body = stage.body(key).unwrap();
    assert!((body.rect.right() - 32.0).abs() < 1.0e-3);
    assert_eq!(body.rect.bottom(), 40.0);
    assert_eq!(body.vel.x, 0.0);
    assert!(body.physics.as_ref().unwrap().at_wall);
    assert_eq!(body.dock.docked_to(), Some(Collider::Tile(Vec2::new(1, 2))));
}

#[test]
fn airborne_bodies_follow_slopes_sideways() {
    let mut stage = stage(&["....", "....", "../.", "####"]);
    let mut phys = physics();
    phys.run_acceleration = 0.0;
    // in the air, bottom edge inside the slope's tile row
    let key = stage.add_body(
        Body::new(AaRect::new(30.0, 28.0, 8.0, 8.0), TypeMask::FRIENDLY)
            .with_physics(phys)
            .with_brain()
    );
    stage.body_mut(key).unwrap().command(Commands::RIGHT);

    tick(&mut stage, key);
    let body = stage.body(key).unwrap();
    // the surface under the right edge, which ends up 8.5 px into the slope
    let surface = 48.0 - (body.rect.right() - 32.0);
    assert!((surface - 39.5).abs() < 1.0e-3);
    assert!((body.rect.bottom() - surface).abs() < 1.0e-3);
    assert_eq!(body.dock.docked_to(), Some(Collider::Tile(Vec2::new(2, 2))));
}

#[test]
fn walking_into_a_wall() {
    let mut stage = stage(&["....", "..#.", "####"]);
    let mut phys = physics();
    phys.run_acceleration = 0.0;
    let key = stage.add_body(
        Body::new(AaRect::new(23.0, 16.0, 8.0, 16.0), TypeMask::FRIENDLY)
            .with_physics(phys)
            .with_brain()
    );
    stage.body_mut(key).unwrap().command(Commands::RIGHT);

    let events = tick(&mut stage, key);
    assert_eq!(count(&events, |e| matches!(e, (_, PhysicsEvent::BumpRight(_)))), 1);
    let body = stage.body(key).unwrap();
    assert_eq!(body.rect.right(), 32.0);
    assert_eq!(body.vel.x, 0.0);
    assert!(body.physics.as_ref().unwrap().at_wall);
}

#[test]
fn heavy_body_squeezes() {
    let mut stage = floored();
    let mut squeezable = physics();
    squeezable.squeeze_speed = 10.0;
    let below = stage.add_body(
        Body::new(AaRect::new(16.0, 32.0, 16.0, 16.0), TypeMask::ENEMY | TypeMask::DOCKABLE)
            .with_physics(squeezable)
    );
    stage.dock_to(below, Collider::Tile(Vec2::new(1, 3))).unwrap();

    let mut heavy = physics();
    heavy.is_heavy = true;
    let rock = stage.add_body(
        Body::new(AaRect::new(16.0, 15.0, 16.0, 16.0), TypeMask::DEFAULT)
            .with_physics(heavy)
            .with_mask(TypeMask::ENEMY)
            .with_vel(Vec2::new(0.0, 50.0))
    );

    let events = tick(&mut stage, rock);
    assert!(events.contains(&(below, PhysicsEvent::SqueezedTop { by: rock })));
    assert_eq!(count(&events, |e| matches!(e, (k, PhysicsEvent::BumpBottom(_)) if *k == rock)), 0);
    let body = stage.body(rock).unwrap();
    assert_eq!(body.vel.y, 10.0);
    assert!(!body.dock.is_docked());

    // sinks into the squeezed body, but by less than the unobstructed move
    let vy = 50.0 + 980.0 * DT;
    let raw_bottom = 31.0 + vy * DT;
    let bottom = body.rect.bottom();
    assert!(bottom > 32.0);
    assert!(bottom < raw_bottom);
    assert!((bottom - (32.0 + (raw_bottom - 32.0) * 10.0 / vy)).abs() < 1.0e-3);
}

#[test]
fn heavy_landing_shakes_once() {
    let mut stage = floored();
    let mut heavy = physics();
    heavy.is_heavy = true;
    let rock = stage.add_body(
        Body::new(AaRect::new(16.0, 32.0, 16.0, 16.0), TypeMask::DEFAULT).with_physics(heavy)
    );

    let events = tick(&mut stage, rock);
    assert!(events.contains(&(rock, PhysicsEvent::ShakeViewport)));
    assert_eq!(count(&events, |e| matches!(e, (_, PhysicsEvent::BumpBottom(_)))), 1);

    let events = tick(&mut stage, rock);
    assert!(!events.contains(&(rock, PhysicsEvent::ShakeViewport)));
}

#[test]
fn pushing_a_rock() {
    let mut stage = floored();
    let mut pushable = physics();
    pushable.is_pushable = true;
    pushable.vx_max = 10.0;
    let rock = stage.add_body(
        Body::new(AaRect::new(8.5, 32.0, 16.0, 16.0), TypeMask::DEFAULT | TypeMask::DOCKABLE)
            .with_physics(pushable)
    );
    stage.dock_to(rock, Collider::Tile(Vec2::new(0, 3))).unwrap();

    let mut pusher_physics = physics();
    pusher_physics.vx_max = 50.0;
    let pusher = stage.add_body(
        Body::new(AaRect::new(0.0, 32.0, 8.0, 16.0), TypeMask::FRIENDLY)
            .with_physics(pusher_physics)
            .with_brain()
            .with_vel(Vec2::new(50.0, 0.0))
    );
    stage.dock_to(pusher, Collider::Tile(Vec2::new(0, 3))).unwrap();
    stage.body_mut(pusher).unwrap().command(Commands::RIGHT);

    let events = tick(&mut stage, pusher);
    assert_eq!(count(&events, |e| matches!(e, (k, PhysicsEvent::BumpRight(_)) if *k == pusher)), 1);

    let rock_rect = stage.body(rock).unwrap().rect;
    let pusher_body = stage.body(pusher).unwrap();
    assert!(rock_rect.left() > 8.5);
    assert!((pusher_body.rect.right() - rock_rect.left()).abs() < 1.0e-4);
    assert_eq!(pusher_body.vel.x, 10.0);
    assert!(pusher_body.dock.is_docked());
}

fn one_way_platform(stage: &mut Stage) -> BodyKey {
    stage.add_body(Body::new(
        AaRect::new(0.0, 48.0, 32.0, 8.0),
        TypeMask::ONE_WAY_PLATFORM | TypeMask::DOCKABLE,
    ))
}

#[test]
fn one_way_platform_holds_from_above() {
    let mut stage = open();
    let platform = one_way_platform(&mut stage);
    let key = stage.add_body(actor(8.0, 32.0, 8.0, 16.0).with_mask(TypeMask::ONE_WAY_PLATFORM));

    let events = tick(&mut stage, key);
    assert_eq!(count(&events, |e| matches!(e, (_, PhysicsEvent::BumpBottom(_)))), 1);
    let body = stage.body(key).unwrap();
    assert_eq!(body.rect.bottom(), 48.0);
    assert_eq!(body.dock.docked_to(), Some(Collider::Body(platform)));
    assert_eq!(stage.body(platform).unwrap().dock.riders(), &[key]);
}

#[test]
fn one_way_platform_lets_through_from_below() {
    let mut stage = open();
    one_way_platform(&mut stage);
    let key = stage.add_body(
        actor(8.0, 57.0, 8.0, 16.0)
            .with_mask(TypeMask::ONE_WAY_PLATFORM)
            .with_vel(Vec2::new(0.0, -200.0))
    );

    let events = tick(&mut stage, key);
    assert!(about(&events, key).is_empty());
    let body = stage.body(key).unwrap();
    let vy = -200.0 + 980.0 * DT;
    assert!((body.rect.pos.y - (57.0 + vy * DT)).abs() < 1.0e-3);
    assert!(!body.dock.is_docked());
}

#[test]
fn one_way_platform_lets_through_from_the_side() {
    let mut stage = open();
    one_way_platform(&mut stage);
    let mut phys = physics();
    phys.run_acceleration = 0.0;
    let key = stage.add_body(
        Body::new(AaRect::new(-9.0, 40.0, 8.0, 16.0), TypeMask::FRIENDLY)
            .with_physics(phys)
            .with_mask(TypeMask::ONE_WAY_PLATFORM)
            .with_brain()
    );
    stage.body_mut(key).unwrap().command(Commands::RIGHT);

    let events = tick(&mut stage, key);
    assert!(about(&events, key).is_empty());
    assert!((stage.body(key).unwrap().rect.left() - (-9.0 + 150.0 * DT)).abs() < 1.0e-3);
}

#[test]
fn climbing_a_ladder() {
    let mut stage = floored();
    let ladder = stage.add_body(Body::new(
        AaRect::new(16.0, 0.0, 16.0, 48.0),
        TypeMask::LADDER | TypeMask::ONE_WAY_PLATFORM | TypeMask::DOCKABLE,
    ));
    let key = stage.add_body(
        Body::new(AaRect::new(19.0, 32.0, 8.0, 16.0), TypeMask::FRIENDLY | TypeMask::DOCKABLE)
            .with_physics(physics())
            .with_brain()
    );

    // standing at the foot of the ladder
    tick(&mut stage, key);
    let phys = stage.body(key).unwrap().physics.as_ref().unwrap();
    assert_eq!(phys.touched_ladder, Some(ladder));
    assert_eq!(phys.on_ladder, None);

    // grab it
    stage.body_mut(key).unwrap().command(Commands::UP);
    tick(&mut stage, key);
    let body = stage.body(key).unwrap();
    let phys = body.physics.as_ref().unwrap();
    assert_eq!(phys.on_ladder, Some(ladder));
    assert!(!phys.gravity);
    assert_eq!(body.rect.center_x(), 24.0);
    assert!(!body.types.contains(TypeMask::DOCKABLE));

    // climb
    tick(&mut stage, key);
    let body = stage.body(key).unwrap();
    assert!((body.rect.pos.y - (32.0 - 70.0 * DT)).abs() < 1.0e-3);
    assert_eq!(body.vel.y, -70.0);

    // step off sideways
    stage.body_mut(key).unwrap().command(Commands::LEFT);
    tick(&mut stage, key);
    let body = stage.body(key).unwrap();
    let phys = body.physics.as_ref().unwrap();
    assert_eq!(phys.on_ladder, None);
    assert!(phys.gravity);
    assert_eq!(body.types, TypeMask::FRIENDLY | TypeMask::DOCKABLE);
}

#[test]
fn sinking_into_liquid() {
    let mut stage = open();
    stage.add_body(
        Body::new(AaRect::new(0.0, 32.0, 64.0, 32.0), TypeMask::LIQUID)
            .with_description("water")
    );
    let key = stage.add_body(actor(8.0, 16.0, 8.0, 16.0));

    let events = tick(&mut stage, key);
    assert_eq!(
        about(&events, key),
        vec![PhysicsEvent::HitLiquid { description: Some("water".to_owned()) }],
    );
    let body = stage.body(key).unwrap();
    let phys = body.physics.as_ref().unwrap();
    assert_eq!(phys.sinking_until, Some(32.0));
    assert!(!phys.gravity);
    assert!(body.collision_mask.is_empty());

    // sinks until the top of the body reaches the surface
    for _ in 0..30 {
        assert!(tick(&mut stage, key).is_empty());
    }
    let body = stage.body(key).unwrap();
    assert_eq!(body.rect.top(), 32.0);
    assert_eq!(body.vel.y, 0.0);
}

#[test]
fn reaching_the_exit() {
    let mut stage = open();
    let exit = stage.add_body(Body::new(AaRect::new(0.0, 0.0, 64.0, 64.0), TypeMask::EXIT));
    let key = stage.add_body(actor(8.0, 8.0, 8.0, 8.0).with_mask(TypeMask::EXIT));

    let events = tick(&mut stage, key);
    assert_eq!(about(&events, key), vec![PhysicsEvent::ReachedExit]);
    // the exit doesn't handle its own collisions, so it hears about this one
    assert_eq!(count(&events, |e| matches!(e, (k, PhysicsEvent::Collided(_)) if *k == exit)), 1);
    assert!(stage.body(key).unwrap().physics.as_ref().unwrap().at_exit);
}

#[test]
fn particle_hits_push_back() {
    let mut stage = open();
    let arrow = stage.add_body(
        Body::new(AaRect::new(10.0, 0.0, 4.0, 20.0), TypeMask::PARTICLE)
            .with_vel(Vec2::new(-300.0, 0.0))
    );
    let key = stage.add_body(actor(8.0, 8.0, 8.0, 8.0).with_mask(TypeMask::PARTICLE));

    let events = tick(&mut stage, key);
    assert_eq!(count(&events, |e| matches!(e, (k, PhysicsEvent::HitParticle(_)) if *k == key)), 1);
    assert_eq!(count(&events, |e| matches!(e, (k, PhysicsEvent::Collided(_)) if *k == arrow)), 1);
    assert_eq!(stage.body(key).unwrap().physics.as_ref().unwrap().push_back_remaining(), 5);

    tick(&mut stage, key);
    assert!(stage.body(key).unwrap().vel.x < 0.0);
}

#[test]
fn heavy_bodies_ignore_particles() {
    let mut stage = open();
    stage.add_body(Body::new(AaRect::new(10.0, 0.0, 4.0, 20.0), TypeMask::PARTICLE));
    let mut heavy = physics();
    heavy.is_heavy = true;
    let key = stage.add_body(
        Body::new(AaRect::new(8.0, 8.0, 8.0, 8.0), TypeMask::DEFAULT)
            .with_physics(heavy)
            .with_mask(TypeMask::PARTICLE)
    );
    let events = tick(&mut stage, key);
    assert!(about(&events, key).is_empty());
    assert_eq!(stage.body(key).unwrap().physics.as_ref().unwrap().push_back_remaining(), 0);
}

#[test]
fn riders_follow_their_platform() {
    let mut stage = open();
    let platform = one_way_platform(&mut stage);
    let key = stage.add_body(actor(8.0, 32.0, 8.0, 16.0).with_mask(TypeMask::ONE_WAY_PLATFORM));
    tick(&mut stage, key);

    stage.move_body(platform, Vec2::new(5.0, -3.0));
    let body = stage.body(key).unwrap();
    assert_eq!(body.rect.pos, Vec2::new(13.0, 29.0));
}

#[test]
fn stage_tick_moves_every_physics_body() {
    let mut stage = floored();
    let a = stage.add_body(actor(0.0, 0.0, 8.0, 8.0));
    let b = stage.add_body(actor(32.0, 0.0, 8.0, 8.0));
    let still = stage.add_body(Body::new(AaRect::new(16.0, 0.0, 8.0, 8.0), TypeMask::ENEMY));
    stage.tick(DT, &mut ());
    assert!(stage.body(a).unwrap().rect.pos.y > 0.0);
    assert!(stage.body(b).unwrap().rect.pos.y > 0.0);
    assert_eq!(stage.body(still).unwrap().rect.pos.y, 0.0);
}
