//! Camera following a body around the stage.

use crate::physics::{
    body::BodyKey,
    stage::Stage,
};
use tile_grid::AaRect;
use vek::*;


/// Period of a viewport shake's up-down alternation, in seconds.
const SHAKE_PERIOD: f32 = 0.03;

/// Window onto the stage.
///
/// `x`/`y` is the top-left corner of the window in world coordinates.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    /// Size of the display in pixels.
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    /// Furthest the viewport moves per update when following softly.
    pub max_speed: f32,
    /// World region the viewport may show.
    pub bounds: Option<AaRect>,
    pub follow_x: bool,
    pub follow_y: bool,
    target: Option<BodyKey>,
    /// Subtracted from the followed body's center.
    pub offset: Vec2<f32>,
    shake: Option<Shake>,
}

#[derive(Debug, Copy, Clone)]
struct Shake {
    amplitude: f32,
    duration: f32,
    elapsed: f32,
}

impl Shake {
    fn offset(&self) -> f32 {
        let phase = (self.elapsed / SHAKE_PERIOD).floor() as u32;
        if phase == 0 || self.elapsed >= self.duration {
            0.0
        } else if phase % 2 == 1 {
            self.amplitude
        } else {
            -self.amplitude
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport {
            x: 0.0,
            y: 0.0,
            width,
            height,
            scale: 1.0,
            max_speed: 10.0,
            bounds: None,
            follow_x: true,
            follow_y: true,
            target: None,
            offset: Vec2::zero(),
            shake: None,
        }
    }

    /// Keep the viewport within the whole stage.
    pub fn bounded_by(mut self, stage: &Stage) -> Self {
        let grid = stage.grid();
        self.bounds = Some(AaRect::new(0.0, 0.0, grid.pixel_width(), grid.pixel_height()));
        self
    }

    /// Start following a body. If `first`, jump to it right away rather than
    /// gliding over.
    pub fn follow(&mut self, stage: &Stage, target: BodyKey, first: bool) {
        self.target = Some(target);
        self.follow_target(stage, first);
    }

    pub fn unfollow(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<BodyKey> {
        self.target
    }

    fn follow_target(&mut self, stage: &Stage, first: bool) {
        let Some(body) = self.target.and_then(|target| stage.body(target)) else {
            self.target = None;
            return;
        };
        let x = Some(body.rect.center_x() - self.offset.x).filter(|_| self.follow_x);
        let y = Some(body.rect.center_y() - self.offset.y).filter(|_| self.follow_y);
        if first {
            self.center_on(x, y);
        } else {
            self.soft_center_on(x, y);
        }
    }

    /// Center on the given world coordinates right away.
    pub fn center_on(&mut self, x: Option<f32>, y: Option<f32>) {
        if let Some(x) = x {
            self.x = x - self.width / 2.0 / self.scale;
        }
        if let Some(y) = y {
            self.y = y - self.height / 2.0 / self.scale;
        }
    }

    /// Move a third of the way towards centering on the given world
    /// coordinates, no faster than `max_speed` and not past `bounds`.
    pub fn soft_center_on(&mut self, x: Option<f32>, y: Option<f32>) {
        let bounds = self.bounds;
        if let Some(x) = x {
            let dx = clamp_abs((x - self.width / 2.0 / self.scale - self.x) / 3.0, self.max_speed);
            self.x = soft_move(
                self.x,
                dx,
                bounds.map(|b| (b.left(), b.right() - self.width)),
                self.scale,
            );
        }
        if let Some(y) = y {
            let dy = clamp_abs((y - self.height / 2.0 / self.scale - self.y) / 3.0, self.max_speed);
            self.y = soft_move(
                self.y,
                dy,
                bounds.map(|b| (b.top(), b.bottom() - self.height)),
                self.scale,
            );
        }
    }

    /// Put the top-left corner at the given world coordinates.
    pub fn move_to(&mut self, x: Option<f32>, y: Option<f32>) {
        if let Some(x) = x {
            self.x = x;
        }
        if let Some(y) = y {
            self.y = y;
        }
    }

    /// Start shaking up and down.
    pub fn shake(&mut self, amplitude: f32, duration: f32) {
        self.shake = Some(Shake {
            amplitude,
            duration,
            elapsed: 0.0,
        });
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    /// Advance by `dt` seconds, after the stage has ticked.
    pub fn update(&mut self, stage: &Stage, dt: f32) {
        if self.target.is_some() {
            self.follow_target(stage, false);
        }
        if let Some(shake) = self.shake.as_mut() {
            shake.elapsed += dt;
            if shake.elapsed >= shake.duration {
                self.shake = None;
            }
        }
    }

    /// Offset to render the world at.
    pub fn offsets(&self) -> Vec2<f32> {
        let shake_y = self.shake.map(|shake| shake.offset()).unwrap_or(0.0);
        Vec2::new(self.x, self.y + shake_y)
    }
}

/// Move `pos` by `delta`, snapping to the edge if that would leave
/// `min..=max`.
fn soft_move(pos: f32, delta: f32, limits: Option<(f32, f32)>, scale: f32) -> f32 {
    match limits {
        Some((min, _)) if pos + delta < min => min / scale,
        Some((_, max)) if pos + delta > max / scale => max / scale,
        _ => pos + delta,
    }
}

fn clamp_abs(val: f32, max: f32) -> f32 {
    if val.abs() > max {
        max.copysign(val)
    } else {
        val
    }
}
