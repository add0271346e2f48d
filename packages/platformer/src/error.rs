//! Rejected physics operations.

use crate::physics::{
    body::BodyKey,
    collision::Collider,
};
use thiserror::Error;


/// A physics operation that was refused because it would break the docking
/// tree or some other invariant of the stage.
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("{support:?} is not dockable")]
    NotDockable {
        support: Collider,
    },
    #[error("body {rider} docking to {support:?} would form a cycle")]
    DockingCycle {
        rider: BodyKey,
        support: Collider,
    },
    #[error("body {0} cannot dock to itself")]
    SelfDock(BodyKey),
    #[error("push back sequence of {len} frames exceeds the limit of {max}")]
    PushBackTooLong {
        len: usize,
        max: usize,
    },
    #[error("no body with key {0}")]
    NoSuchBody(BodyKey),
}
