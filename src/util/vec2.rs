use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// 2D vector in arena (viewport) coordinates
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

    /// Unit vector pointing along `angle` (radians)
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Divides by the length, or by 1 when the length is zero.
    /// A zero vector stays zero instead of turning into NaN.
    pub fn normalize_or_self(&self) -> Self {
        let len = self.length();
        let divisor = if len > 0.0 { len } else { 1.0 };
        Self {
            x: self.x / divisor,
            y: self.y / divisor,
        }
    }

    #[inline]
    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn distance_to(&self, other: Vec2) -> f32 {
        (*self - other).length()
    }

    pub fn clamp_length(&self, max: f32) -> Self {
        let len = self.length();
        if len > max && len > 0.0 {
            *self * (max / len)
        } else {
            *self
        }
    }

    /// Heading in radians
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotated 90 degrees counter-clockwise
    pub fn perpendicular(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns `fallback` if either component is NaN or infinite
    pub fn finite_or(self, fallback: Vec2) -> Self {
        if self.is_finite() {
            self
        } else {
            fallback
        }
    }
}

/// Moves `current` toward `target` by fraction `t` along the shortest arc
pub fn lerp_angle(current: f32, target: f32, t: f32) -> f32 {
    let delta = target - current;
    let diff = delta.sin().atan2(delta.cos());
    current + diff * t
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

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_length() {
        let v = Vec2::new(3.0, 4.0);
        assert!(approx_eq(v.length(), 5.0));
    }

    #[test]
    fn test_normalize_or_self_zero_stays_zero() {
        let n = Vec2::ZERO.normalize_or_self();
        assert_eq!(n, Vec2::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn test_normalize_or_self_unit_length() {
        let n = Vec2::new(-6.0, 8.0).normalize_or_self();
        assert!(approx_eq(n.length(), 1.0));
        assert!(approx_eq(n.x, -0.6));
    }

    #[test]
    fn test_clamp_length() {
        let v = Vec2::new(30.0, 40.0).clamp_length(10.0);
        assert!(approx_eq(v.length(), 10.0));

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(short.clamp_length(10.0), short);
    }

    #[test]
    fn test_finite_or_replaces_nan() {
        let fallback = Vec2::new(5.0, 5.0);
        assert_eq!(Vec2::new(f32::NAN, 1.0).finite_or(fallback), fallback);
        assert_eq!(Vec2::new(2.0, f32::INFINITY).finite_or(fallback), fallback);
        assert_eq!(Vec2::new(2.0, 3.0).finite_or(fallback), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn test_perpendicular_is_orthogonal() {
        let v = Vec2::new(2.0, 7.0);
        assert!(approx_eq(v.dot(v.perpendicular()), 0.0));
    }

    #[test]
    fn test_perpendicular_of_heading_turns_quarter() {
        for angle in [0.0, 0.7, 2.5, -1.9] {
            let turned = Vec2::from_angle(angle).perpendicular();
            let expected = Vec2::from_angle(angle + PI / 2.0);
            assert!(approx_eq(turned.x, expected.x) && approx_eq(turned.y, expected.y));
        }
    }

    #[test]
    fn test_lerp_angle_takes_short_way_across_wrap() {
        // From just below +PI to just above -PI the short path crosses PI
        let current = PI - 0.1;
        let target = -PI + 0.1;
        let halfway = lerp_angle(current, target, 0.5);
        assert!((halfway - PI).abs() < 1e-4, "got {}", halfway);
    }

    #[test]
    fn test_lerp_angle_full_step_reaches_target_direction() {
        let result = lerp_angle(0.0, PI / 2.0, 1.0);
        assert!(approx_eq(result, PI / 2.0));
    }

    #[test]
    fn test_from_angle_round_trips_heading() {
        let angle = 1.2;
        assert!(approx_eq(Vec2::from_angle(angle).angle(), angle));
    }

    #[test]
    fn test_operators() {
        let mut v = Vec2::new(1.0, 2.0);
        v += Vec2::new(1.0, 1.0);
        v -= Vec2::new(0.5, 0.5);
        v *= 2.0;
        assert_eq!(v, Vec2::new(3.0, 5.0));
        assert_eq!(v * 0.5 - Vec2::new(1.5, 2.5), Vec2::ZERO);
    }
}
