//! Notifications raised while resolving collisions.

use super::{
    body::BodyKey,
    collision::Collision,
};


/// Something that happened to a body during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsEvent {
    /// Hit a ceiling.
    BumpTop(Collision),
    /// Landed on something.
    BumpBottom(Collision),
    /// Walked into something on its left.
    BumpLeft(Collision),
    /// Walked into something on its right.
    BumpRight(Collision),
    /// Was hit by a particle (arrow, shot, fireball).
    HitParticle(Collision),
    /// Fell into a liquid, with the liquid body's description.
    HitLiquid {
        description: Option<String>,
    },
    /// A heavy body landed on this one and is squeezing it.
    SqueezedTop {
        by: BodyKey,
    },
    ReachedExit,
    /// A heavy body hit the ground hard enough to shake the viewport.
    ShakeViewport,
    /// Some other body collided with this one. Only raised for bodies which
    /// don't handle their own collisions.
    Collided(Collision),
}

/// Receiver of physics notifications.
pub trait EventSink {
    fn notify(&mut self, body: BodyKey, event: PhysicsEvent);
}

impl EventSink for Vec<(BodyKey, PhysicsEvent)> {
    fn notify(&mut self, body: BodyKey, event: PhysicsEvent) {
        self.push((body, event));
    }
}

/// Ignores everything.
impl EventSink for () {
    fn notify(&mut self, _: BodyKey, _: PhysicsEvent) {}
}
