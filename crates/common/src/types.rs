use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and CLI output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// One of the two movement axes. Y grows downward (screen space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Unit step along this axis, scaled by `sign`.
    pub fn step(self, sign: i32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(sign as f32, 0.0),
            Axis::Y => Vec2::new(0.0, sign as f32),
        }
    }

    /// Component of `v` along this axis.
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Mutable component of `v` along this axis.
    pub fn of_mut(self, v: &mut Vec2) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Axis-aligned rectangle: top-left corner plus size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Same rectangle moved by `offset`.
    pub fn translated(self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..self
        }
    }

    /// Strict intersection: rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Finite origin and a strictly positive, finite size.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && self.w > 0.0
            && self.h > 0.0
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn overlapping_rects_intersect() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn edge_touching_is_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::new(10.0, 0.0, 10.0, 10.0);
        let below = Aabb::new(0.0, 10.0, 10.0, 10.0);
        let corner = Aabb::new(10.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
        assert!(!a.overlaps(&corner));
    }

    #[test]
    fn translated_keeps_size() {
        let a = Aabb::new(3.0, 0.0, 26.0, 32.0).translated(Vec2::new(10.0, -4.0));
        assert_eq!(a, Aabb::new(13.0, -4.0, 26.0, 32.0));
        assert_eq!(a.max(), Vec2::new(39.0, 28.0));
    }

    #[test]
    fn degenerate_rects_are_invalid() {
        assert!(Aabb::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Aabb::new(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!Aabb::new(0.0, 0.0, 4.0, -1.0).is_valid());
        assert!(!Aabb::new(f32::NAN, 0.0, 4.0, 4.0).is_valid());
    }

    #[test]
    fn axis_helpers() {
        let mut v = Vec2::new(2.0, -3.0);
        assert_eq!(Axis::X.of(v), 2.0);
        assert_eq!(Axis::Y.of(v), -3.0);
        *Axis::Y.of_mut(&mut v) = 0.0;
        assert_eq!(v, Vec2::new(2.0, 0.0));
        assert_eq!(Axis::X.step(-1), Vec2::new(-1.0, 0.0));
        assert_eq!(Axis::Y.step(1), Vec2::new(0.0, 1.0));
    }
}
