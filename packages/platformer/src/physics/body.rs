//! Bodies and their platformer physics state.

use super::dock::Dockable;
use crate::{
    error::PhysicsError,
    settings::BodySettings,
};
use tile_grid::{
    AaRect,
    TypeMask,
};
use bitflags::bitflags;
use std::collections::VecDeque;
use vek::*;


/// Handle to a body within its stage.
pub type BodyKey = usize;

/// Longest push back sequence a body accepts.
pub const MAX_PUSH_BACK_FRAMES: usize = 16;

bitflags! {
    /// Commands currently held down by whatever controls a body.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct Commands: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const JUMP = 1 << 4;
    }
}


/// Something that takes up space in a stage.
#[derive(Debug, Clone)]
pub struct Body {
    pub rect: AaRect,
    /// In pixels/s.
    pub vel: Vec2<f32>,
    /// What this body is.
    pub types: TypeMask,
    /// What this body reacts to.
    pub collision_mask: TypeMask,
    /// If false, collisions other bodies have with this one get reported to
    /// the event sink for it.
    pub handles_own_collisions: bool,
    /// Free-form text, reported when a body hits this one as a liquid.
    pub description: Option<String>,
    pub dock: Dockable,
    pub physics: Option<PlatformerPhysics>,
    /// Commands from a controller. Bodies with physics but without a
    /// controller don't move horizontally on their own.
    pub brain: Option<Commands>,
}

impl Body {
    pub fn new(rect: AaRect, types: TypeMask) -> Self {
        Body {
            rect,
            vel: Vec2::zero(),
            types,
            collision_mask: TypeMask::empty(),
            handles_own_collisions: false,
            description: None,
            dock: Dockable::default(),
            physics: None,
            brain: None,
        }
    }

    /// Attach platformer physics. This also makes the body collide with solid
    /// geometry, ladders and liquids.
    pub fn with_physics(mut self, physics: PlatformerPhysics) -> Self {
        self.collision_mask |= TypeMask::DEFAULT | TypeMask::LADDER | TypeMask::LIQUID;
        self.handles_own_collisions = true;
        self.physics = Some(physics);
        self
    }

    pub fn with_mask(mut self, mask: TypeMask) -> Self {
        self.collision_mask |= mask;
        self
    }

    /// Attach a controller with no commands held.
    pub fn with_brain(mut self) -> Self {
        self.brain = Some(Commands::empty());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_vel(mut self, vel: Vec2<f32>) -> Self {
        self.vel = vel;
        self
    }

    /// Set the commands held by this body's controller. Does nothing for
    /// bodies without a controller.
    pub fn command(&mut self, commands: Commands) {
        if let Some(brain) = self.brain.as_mut() {
            *brain = commands;
        }
    }

    /// Whether a collision may happen between self and `other` at all.
    pub fn reacts_to(&self, other: &Body) -> bool {
        self.collision_mask.intersects(other.types)
    }
}


/// Platformer movement state of a body.
#[derive(Debug, Clone)]
pub struct PlatformerPhysics {
    /// In pixels/s². Zero means reaching full speed at once.
    pub run_acceleration: f32,
    pub vx_max: f32,
    pub max_fall_speed: f32,
    pub jump_speed: f32,
    pub climb_speed: f32,

    /// Whether gravity pulls this body. Turned off on ladders and in liquids.
    pub gravity: bool,
    pub can_jump: bool,
    /// Other bodies walking into this one push it along.
    pub is_pushable: bool,
    /// Squeezes bodies it lands on, shakes the viewport when hitting the
    /// ground, and shrugs off particle hits.
    pub is_heavy: bool,
    /// If positive, heavy bodies landing on this one sink at most this fast.
    pub squeeze_speed: f32,
    pub stops_abruptly_on_direction_change: bool,
    pub allow_stairs_climb: bool,

    /// Ladder this body is locked into, climbing.
    pub on_ladder: Option<BodyKey>,
    /// Ladder this body currently overlaps.
    pub touched_ladder: Option<BodyKey>,
    /// Type the body had before locking into a ladder.
    pub type_before_ladder: Option<TypeMask>,
    pub at_wall: bool,
    pub at_exit: bool,
    /// Y at which this body stops sinking into a liquid.
    pub sinking_until: Option<f32>,
    /// Jump was held last tick. Jumping needs it to be released first.
    pub jump_held: bool,
    push_back: VecDeque<f32>,
}

impl PlatformerPhysics {
    pub fn new(settings: &BodySettings) -> Self {
        PlatformerPhysics {
            run_acceleration: settings.run_acceleration,
            vx_max: settings.vx_max,
            max_fall_speed: settings.max_fall_speed,
            jump_speed: settings.jump_speed,
            climb_speed: settings.climb_speed,
            gravity: true,
            can_jump: settings.can_jump,
            is_pushable: false,
            is_heavy: false,
            squeeze_speed: 0.0,
            stops_abruptly_on_direction_change: settings.stops_abruptly_on_direction_change,
            allow_stairs_climb: settings.allow_stairs_climb,
            on_ladder: None,
            touched_ladder: None,
            type_before_ladder: None,
            at_wall: false,
            at_exit: false,
            sinking_until: None,
            jump_held: false,
            push_back: VecDeque::new(),
        }
    }

    /// Queue extra x accelerations to apply, one per tick. Replaces anything
    /// still queued.
    pub fn push_back<I>(&mut self, sequence: I) -> Result<(), PhysicsError>
    where
        I: IntoIterator<Item=f32>,
    {
        let sequence = sequence.into_iter().collect::<VecDeque<_>>();
        if sequence.len() > MAX_PUSH_BACK_FRAMES {
            return Err(PhysicsError::PushBackTooLong {
                len: sequence.len(),
                max: MAX_PUSH_BACK_FRAMES,
            });
        }
        self.push_back = sequence;
        Ok(())
    }

    /// Pop this tick's push back acceleration.
    pub fn next_push_back(&mut self) -> f32 {
        self.push_back.pop_front().unwrap_or(0.0)
    }

    pub fn push_back_remaining(&self) -> usize {
        self.push_back.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> PlatformerPhysics {
        PlatformerPhysics::new(&BodySettings::default())
    }

    #[test]
    fn attaching_physics_extends_mask() {
        let body = Body::new(AaRect::new(0.0, 0.0, 8.0, 8.0), TypeMask::FRIENDLY)
            .with_mask(TypeMask::ENEMY)
            .with_physics(physics());
        assert_eq!(
            body.collision_mask,
            TypeMask::ENEMY | TypeMask::DEFAULT | TypeMask::LADDER | TypeMask::LIQUID,
        );
        assert!(body.handles_own_collisions);
    }

    #[test]
    fn push_back_replaces_and_pops() {
        let mut phys = physics();
        phys.push_back([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(phys.next_push_back(), 1.0);
        phys.push_back([7.0]).unwrap();
        assert_eq!(phys.next_push_back(), 7.0);
        assert_eq!(phys.next_push_back(), 0.0);
    }

    #[test]
    fn overlong_push_back_is_rejected() {
        let mut phys = physics();
        phys.push_back([5.0]).unwrap();
        let err = phys.push_back(vec![1.0; MAX_PUSH_BACK_FRAMES + 1]).unwrap_err();
        assert_eq!(err, PhysicsError::PushBackTooLong { len: 17, max: 16 });
        assert_eq!(phys.push_back_remaining(), 1);
    }

    #[test]
    fn commands_need_a_brain() {
        let mut body = Body::new(AaRect::default(), TypeMask::FRIENDLY);
        body.command(Commands::LEFT);
        assert_eq!(body.brain, None);
        let mut body = body.with_brain();
        body.command(Commands::LEFT | Commands::JUMP);
        assert_eq!(body.brain, Some(Commands::LEFT | Commands::JUMP));
    }
}
