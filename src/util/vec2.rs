use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// 2D vector for body positions and per-tick displacements
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn length_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn distance_sq_to(&self, other: Vec2) -> f32 {
        (*self - other).length_sq()
    }

    #[inline]
    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    ///
    /// Components are divided by the length, so axis-aligned vectors map to
    /// exactly `(±1, 0)` or `(0, ±1)`.
    pub fn normalized(&self) -> Option<Vec2> {
        let len = self.length();
        (len > 0.0).then(|| Vec2::new(self.x / len, self.y / len))
    }

    /// Express this vector in the frame whose x-axis is the unit vector `axis`.
    ///
    /// `x` of the result is the component along the axis, `y` the tangential one.
    /// Same rotation as turning by `-atan2(axis.y, axis.x)`, without the
    /// trigonometric round trip. Inverse of [`Vec2::from_frame`].
    #[inline]
    pub fn to_frame(&self, axis: Vec2) -> Self {
        Self {
            x: self.dot(axis),
            y: self.y * axis.x - self.x * axis.y,
        }
    }

    /// Map a vector given in an `axis`-aligned frame back to world axes
    #[inline]
    pub fn from_frame(&self, axis: Vec2) -> Self {
        Self {
            x: self.x * axis.x - self.y * axis.y,
            y: self.x * axis.y + self.y * axis.x,
        }
    }

    /// Check if vector is approximately equal to another
    #[cfg(test)]
    pub(crate) fn approx_eq(&self, other: Vec2, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_length() {
        let v = Vec2::new(3.0, 4.0);
        assert!(approx_eq(v.length(), 5.0));
        assert!(approx_eq(v.length_sq(), 25.0));
    }

    #[test]
    fn test_distance_sq() {
        let a = Vec2::new(100.0, 100.0);
        let b = Vec2::new(108.0, 100.0);
        assert_eq!(a.distance_sq_to(b), 64.0);
    }

    #[test]
    fn test_normalized() {
        assert_eq!(Vec2::new(-8.0, 0.0).normalized(), Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(Vec2::new(0.0, 6.0).normalized(), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(Vec2::ZERO.normalized(), None);

        let n = Vec2::new(3.0, 4.0).normalized().unwrap();
        assert!(n.approx_eq(Vec2::new(0.6, 0.8), EPSILON));
    }

    #[test]
    fn test_frame_along_x_is_identity() {
        let v = Vec2::new(2.0, -2.0);
        let x = Vec2::new(1.0, 0.0);
        assert_eq!(v.to_frame(x), v);
        assert_eq!(v.from_frame(x), v);
    }

    #[test]
    fn test_axis_aligned_frames_are_exact() {
        let v = Vec2::new(2.0, -3.0);
        // Axis along -x: both components flip
        assert_eq!(v.to_frame(Vec2::new(-1.0, 0.0)), Vec2::new(-2.0, 3.0));
        // Axis along +y: the y component becomes the normal one
        assert_eq!(v.to_frame(Vec2::new(0.0, 1.0)), Vec2::new(-3.0, -2.0));
        assert_eq!(Vec2::new(-3.0, -2.0).from_frame(Vec2::new(0.0, 1.0)), v);
    }

    #[test]
    fn test_frame_projects_onto_axis() {
        // Axis along the diagonal: a diagonal vector is purely "normal" in that frame
        let axis = Vec2::new(1.0, 1.0).normalized().unwrap();
        let local = Vec2::new(1.0, 1.0).to_frame(axis);
        assert!(approx_eq(local.x, 2.0_f32.sqrt()));
        assert!(approx_eq(local.y, 0.0));
    }

    #[test]
    fn test_frame_matches_rotation_by_angle() {
        let v = Vec2::new(-1.5, 2.25);
        let angle: f32 = 1.2;
        let axis = Vec2::new(angle.cos(), angle.sin());
        let (sin, cos) = (-angle).sin_cos();
        let rotated = Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);

        assert!(v.to_frame(axis).approx_eq(rotated, EPSILON));
        assert!(v.to_frame(axis).from_frame(axis).approx_eq(v, EPSILON));
    }

    #[test]
    fn test_dot() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 4.0);
        assert!(approx_eq(a.dot(b), 11.0));
    }

    #[test]
    fn test_operators() {
        let mut a = Vec2::new(1.0, 2.0);
        a += Vec2::new(3.0, 4.0);
        assert_eq!(a, Vec2::new(4.0, 6.0));
        assert_eq!(a - Vec2::new(1.0, 1.0), Vec2::new(3.0, 5.0));
    }

    #[test]
    fn test_serde() {
        let v = Vec2::new(1.5, 2.5);
        let encoded = serde_json::to_string(&v).unwrap();
        let decoded: Vec2 = serde_json::from_str(&encoded).unwrap();
        assert_eq!(v, decoded);
    }
}
