//! Axis-aligned rect collision along a single axis.

use super::body::BodyKey;
use tile_grid::{
    AaRect,
    Axis,
};
use vek::*;


/// Something a body can collide with.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Collider {
    Body(BodyKey),
    /// Tile of the stage's grid, by tile coordinate.
    Tile(Vec2<u32>),
}

impl Collider {
    pub fn body(self) -> Option<BodyKey> {
        match self {
            Collider::Body(key) => Some(key),
            Collider::Tile(_) => None,
        }
    }
}

/// Result of a single pairwise collision test.
///
/// Plain value, so a test allocates nothing and nothing outlives the tick
/// that produced it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Collision {
    /// The moving participant.
    pub this: Collider,
    pub other: Collider,
    pub is_collided: bool,
    /// Signed overlap along `normal`, so that `separate == -distance * normal`.
    /// Only positive for a docked body pulled down onto a slope it floats
    /// above.
    pub distance: f32,
    /// `distance.abs()`.
    pub magnitude: f32,
    /// Unit vector along `axis`, pointing out of `other`.
    pub normal: Vec2<f32>,
    /// How far `this` has to move to stop overlapping `other`.
    pub separate: Vec2<f32>,
    pub axis: Axis,
    /// `this`'s velocity along `axis` when the test ran.
    pub direction_velocity: f32,
    /// The speed this collision took away from `this`. Filled in by the
    /// collision response.
    pub impact: f32,
    /// `this`'s position before the move that led to this test.
    pub original_pos: Vec2<f32>,
}

impl Collision {
    /// The same collision, as seen from `other`.
    pub fn inverted(&self) -> Self {
        Collision {
            this: self.other,
            other: self.this,
            normal: -self.normal,
            separate: -self.separate,
            direction_velocity: -self.direction_velocity,
            ..*self
        }
    }
}

/// Test whether `this_rect`, moving along `axis` with signed speed
/// `direction_velocity`, overlaps `other_rect`, and if so how to undo that.
///
/// The separation only ever points against the direction of movement. Returns
/// `None` if the rects don't overlap or if the overlap along `axis` is zero.
///
/// Panics if `direction_velocity` is zero.
pub fn collide(
    this: Collider,
    this_rect: &AaRect,
    other: Collider,
    other_rect: &AaRect,
    axis: Axis,
    direction_velocity: f32,
    original_pos: Vec2<f32>,
) -> Option<Collision> {
    assert!(direction_velocity != 0.0, "collision test with zero direction velocity");

    if !this_rect.intersects(other_rect) {
        return None;
    }

    let (distance, normal) = match (axis, direction_velocity > 0.0) {
        (Axis::X, true) => (-(this_rect.right() - other_rect.left()), -Vec2::unit_x()),
        (Axis::X, false) => (-(other_rect.right() - this_rect.left()), Vec2::unit_x()),
        (Axis::Y, true) => (-(this_rect.bottom() - other_rect.top()), -Vec2::unit_y()),
        (Axis::Y, false) => (-(other_rect.bottom() - this_rect.top()), Vec2::unit_y()),
    };
    let magnitude = distance.abs();
    if magnitude == 0.0 {
        return None;
    }

    Some(Collision {
        this,
        other,
        is_collided: true,
        distance,
        magnitude,
        normal,
        separate: normal * magnitude,
        axis,
        direction_velocity,
        impact: 0.0,
        original_pos,
    })
}
