use vek::*;


/// One of the two screen axes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Component of `v` along this axis.
    pub fn of(self, v: Vec2<f32>) -> f32 {
        v[self as usize]
    }
}
