//! Axis-aligned rectangle.

use vek::*;


/// Axis-aligned rectangle in pixel space.
///
/// Screen convention: `pos` is the top-left corner and y grows downwards.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct AaRect {
    /// Rectangle top-left corner position.
    pub pos: Vec2<f32>,
    /// Rectangle extent from `pos`. Assumed to be non-negative.
    pub ext: Extent2<f32>,
}

impl AaRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        AaRect {
            pos: Vec2 { x, y },
            ext: Extent2 { w, h },
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.ext.w
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.ext.h
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.ext.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.pos.y + self.ext.h / 2.0
    }

    /// Translate self by `v`.
    pub fn translate<V: Into<Vec2<f32>>>(mut self, v: V) -> Self {
        self.pos += v.into();
        self
    }

    pub fn with_x(mut self, x: f32) -> Self {
        self.pos.x = x;
        self
    }

    pub fn with_y(mut self, y: f32) -> Self {
        self.pos.y = y;
        self
    }

    /// Move so that the bottom edge lies at `bottom`, keeping the extent.
    pub fn set_bottom(&mut self, bottom: f32) {
        self.pos.y = bottom - self.ext.h;
    }

    /// Move so that the horizontal center lies at `center_x`.
    pub fn set_center_x(&mut self, center_x: f32) {
        self.pos.x = center_x - self.ext.w / 2.0;
    }

    /// Does self overlap `rhs` with non-zero area?
    ///
    /// Touching edges do not count.
    pub fn intersects(&self, rhs: &AaRect) -> bool {
        self.right() > rhs.left()
            && self.left() < rhs.right()
            && self.bottom() > rhs.top()
            && self.top() < rhs.bottom()
    }
}
