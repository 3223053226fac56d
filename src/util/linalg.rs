#[allow(unused_imports)]
use crate::core::prelude::*;

use crate::util::gg_float;
use crate::util::gg_float::GgFloat;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::{
    fmt,
    fmt::Formatter,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

/// A 2D vector using 32-bit floating point coordinates.
///
/// Shapes and transforms in this crate use a y-up convention: a positive cross product means
/// the second vector is counter-clockwise from the first, and [`Vec2::rotated`] turns
/// counter-clockwise for positive angles.
///
/// # Examples
///
/// ```
/// use gg_collide::util::linalg::Vec2;
///
/// let v1 = Vec2 { x: 3.0, y: 4.0 };
/// let v2 = Vec2 { x: 1.0, y: 2.0 };
/// assert_eq!(v1 + v2, Vec2 { x: 4.0, y: 6.0 });
/// assert_eq!(v1.len(), 5.0);
/// ```
///
/// # Equality
/// Two finite vectors are considered equal if their components differ by less than
/// [`EPSILON`](crate::core::config::EPSILON). Compare `to_bits()` of the components when an
/// exact match matters.
#[derive(Default, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl PartialEq for Vec2 {
    fn eq(&self, other: &Self) -> bool {
        if self.is_finite() || other.is_finite() {
            (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
        } else {
            self.x == other.x && self.y == other.y
        }
    }
}
impl Eq for Vec2 {}

impl Vec2 {
    #[must_use]
    pub fn right() -> Vec2 {
        Vec2 { x: 1.0, y: 0.0 }
    }
    #[must_use]
    pub fn up() -> Vec2 {
        Vec2 { x: 0.0, y: 1.0 }
    }
    #[must_use]
    pub fn left() -> Vec2 {
        Vec2 { x: -1.0, y: 0.0 }
    }
    #[must_use]
    pub fn down() -> Vec2 {
        Vec2 { x: 0.0, y: -1.0 }
    }
    #[must_use]
    pub fn one() -> Vec2 {
        Vec2 { x: 1.0, y: 1.0 }
    }
    #[must_use]
    pub fn zero() -> Vec2 {
        Vec2 { x: 0.0, y: 0.0 }
    }
    #[must_use]
    pub fn splat(v: f32) -> Vec2 {
        Vec2 { x: v, y: v }
    }

    /// Returns the squared length of the vector.
    ///
    /// Use this instead of [`len`](Vec2::len) when comparing lengths to avoid the square root.
    #[must_use]
    pub fn len_squared(&self) -> f32 {
        self.dot(*self)
    }

    #[must_use]
    pub fn len(&self) -> f32 {
        self.len_squared().sqrt()
    }

    /// Returns a unit vector in the same direction as this vector.
    ///
    /// A zero-length vector normalises to the zero vector rather than NaN; callers that need a
    /// direction must reject zero-length input themselves. Negative zero components are
    /// converted to positive zero.
    #[must_use]
    pub fn normed(&self) -> Vec2 {
        let mut rv = match self.len() {
            0.0 => Vec2::zero(),
            len => *self / len,
        };
        rv.x = gg_float::force_positive_zero(rv.x);
        rv.y = gg_float::force_positive_zero(rv.y);
        rv
    }

    #[must_use]
    pub fn abs(&self) -> Vec2 {
        Vec2 {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }

    /// Returns this vector rotated counter-clockwise by the given angle in degrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use gg_collide::util::linalg::Vec2;
    /// let rotated = Vec2::right().rotated(90.0);
    /// assert!(rotated.almost_eq(Vec2::up()));
    /// ```
    #[must_use]
    pub fn rotated(&self, degrees: f32) -> Vec2 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Returns this point rotated counter-clockwise by `degrees` around `pivot`.
    #[must_use]
    pub fn rotated_around(&self, pivot: Vec2, degrees: f32) -> Vec2 {
        (*self - pivot).rotated(degrees) + pivot
    }

    /// Returns a vector perpendicular to this one, rotated 90 degrees clockwise: `(y, -x)`.
    ///
    /// For an edge of a counter-clockwise polygon this points out of the polygon.
    ///
    /// # Examples
    ///
    /// ```
    /// use gg_collide::util::linalg::Vec2;
    /// let vec = Vec2 { x: 3.0, y: 2.0 };
    /// let perpendicular = vec.orthog();
    /// assert_eq!(perpendicular, Vec2 { x: 2.0, y: -3.0 });
    /// assert_eq!(vec.dot(perpendicular), 0.0);
    /// ```
    #[must_use]
    pub fn orthog(&self) -> Vec2 {
        Vec2 {
            x: self.y,
            y: -self.x,
        }
    }

    #[must_use]
    pub fn component_wise(&self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }

    /// Component-wise division. Dividing by the zero vector gives the zero vector.
    #[must_use]
    pub fn component_wise_div(&self, other: Vec2) -> Vec2 {
        if other.is_zero() {
            Vec2::zero()
        } else {
            Vec2 {
                x: self.x / other.x,
                y: self.y / other.y,
            }
        }
    }

    #[must_use]
    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// The 2D cross product: the signed area of the parallelogram spanned by the two vectors.
    /// Positive if `other` is counter-clockwise from `self`.
    ///
    /// ```
    /// use gg_collide::util::linalg::Vec2;
    /// assert_eq!(Vec2 { x: 2.0, y: 0.0 }.cross(Vec2 { x: 0.0, y: 3.0 }), 6.0);
    /// assert_eq!(Vec2 { x: 2.0, y: 0.0 }.cross(Vec2 { x: 0.0, y: -3.0 }), -6.0);
    /// ```
    #[must_use]
    pub fn cross(&self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    #[must_use]
    pub fn dist(&self, other: Vec2) -> f32 {
        (other - *self).len()
    }

    /// Checks if the vector is approximately equal to another vector: the length of their
    /// difference is less than [`EPSILON`](crate::core::config::EPSILON).
    pub fn almost_eq(&self, rhs: Vec2) -> bool {
        (*self - rhs).len() < EPSILON
    }
}

impl Zero for Vec2 {
    fn zero() -> Self {
        Vec2::zero()
    }

    fn is_zero(&self) -> bool {
        self.almost_eq(Self::zero())
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(value: [f32; 2]) -> Self {
        Vec2 {
            x: value[0],
            y: value[1],
        }
    }
}
impl From<(f32, f32)> for Vec2 {
    fn from(value: (f32, f32)) -> Self {
        Vec2 {
            x: value.0,
            y: value.1,
        }
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(value: Vec2) -> Self {
        [value.x, value.y]
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let precision = f.precision();

        write!(f, "vec(")?;
        if let Some(p) = precision {
            write!(f, "{0:.1$}", self.x, p)?;
            write!(f, ", {0:.1$}", self.y, p)?;
        } else {
            write!(f, "{}, {}", self.x, self.y)?;
        }
        write!(f, ")")
    }
}

impl Add<Vec2> for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Self::Output {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}
impl AddAssign<Vec2> for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub<Vec2> for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Self::Output {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}
impl SubAssign<Vec2> for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Sum<Vec2> for Vec2 {
    fn sum<I: Iterator<Item = Vec2>>(iter: I) -> Self {
        iter.fold(Vec2::zero(), Vec2::add)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Self::Output {
        rhs * self
    }
}
impl Mul<Vec2> for f32 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Self::Output {
        Vec2 {
            x: self * rhs.x,
            y: self * rhs.y,
        }
    }
}
impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, rhs: f32) -> Self::Output {
        Vec2 {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}
impl DivAssign<f32> for Vec2 {
    fn div_assign(&mut self, rhs: f32) {
        self.x /= rhs;
        self.y /= rhs;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Self::Output {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Position, rotation and scale of a scene node.
///
/// `rotation` is in degrees, counter-clockwise. A point in the node's local space is scaled,
/// then rotated, then translated by `centre` to reach the parent's space (or world space, for
/// a world transform).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub centre: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    #[must_use]
    pub fn with_centre(centre: Vec2) -> Self {
        Self {
            centre,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn with_rotation(rotation: f32) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn with_scale(scale: Vec2) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn translated(&self, by: Vec2) -> Self {
        Self {
            centre: self.centre + by,
            ..*self
        }
    }

    /// Maps a point from local space through this transform.
    #[must_use]
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        local.component_wise(self.scale).rotated(self.rotation) + self.centre
    }

    /// Maps a direction through this transform. Directions are only rotated; neither scale nor
    /// translation apply.
    #[must_use]
    pub fn rotate_direction(&self, direction: Vec2) -> Vec2 {
        direction.rotated(self.rotation)
    }

    /// Composes a child's local transform onto this (parent) transform, giving the child's
    /// transform in this transform's outer space. Exact when this transform's scale is uniform.
    ///
    /// ```
    /// use gg_collide::util::linalg::{Transform, Vec2};
    /// let parent = Transform { centre: Vec2 { x: 10.0, y: 0.0 }, rotation: 90.0, scale: Vec2::one() };
    /// let child = Transform::with_centre(Vec2 { x: 1.0, y: 0.0 });
    /// let world = parent.then(&child);
    /// assert!(world.centre.almost_eq(Vec2 { x: 10.0, y: 1.0 }));
    /// assert_eq!(world.rotation, 90.0);
    /// ```
    #[must_use]
    pub fn then(&self, child: &Transform) -> Transform {
        Transform {
            centre: self.transform_point(child.centre),
            rotation: self.rotation + child.rotation,
            scale: self.scale.component_wise(child.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            centre: Vec2::zero(),
            rotation: 0.0,
            scale: Vec2::one(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_scalar_multiplication() {
        let a = Vec2 { x: 1.0, y: 1.0 };
        assert_eq!(a * 2.0, Vec2 { x: 2.0, y: 2.0 });
        assert_eq!(2.0 * a, Vec2 { x: 2.0, y: 2.0 });
    }

    #[test]
    fn vec2_equality_is_approximate() {
        let a = Vec2 { x: 1.0, y: 2.0 };
        let nudged = Vec2 {
            x: 1.0 + EPSILON / 2.0,
            y: 2.0,
        };
        assert_eq!(a, nudged);
        assert_ne!(a.x.to_bits(), nudged.x.to_bits());
        assert_ne!(a, Vec2 { x: 1.0 + 2.0 * EPSILON, y: 2.0 });
        let nan = Vec2 { x: f32::NAN, y: 0.0 };
        assert_ne!(nan, nan);
    }

    #[test]
    fn vec2_subtraction() {
        let a = Vec2 { x: 5.0, y: 6.0 };
        let b = Vec2 { x: 3.0, y: 4.0 };
        assert_eq!(a - b, Vec2 { x: 2.0, y: 2.0 });
    }

    #[test]
    fn vec2_assign_ops() {
        let mut a = Vec2 { x: 1.0, y: 2.0 };
        a += Vec2 { x: 3.0, y: 4.0 };
        assert_eq!(a, Vec2 { x: 4.0, y: 6.0 });
        a -= Vec2 { x: 2.0, y: 2.0 };
        assert_eq!(a, Vec2 { x: 2.0, y: 4.0 });
        a *= 2.0;
        assert_eq!(a, Vec2 { x: 4.0, y: 8.0 });
        a /= 4.0;
        assert_eq!(a, Vec2 { x: 1.0, y: 2.0 });
    }

    #[test]
    fn vec2_sum() {
        let total: Vec2 = [Vec2::right(), Vec2::up(), Vec2::one()].into_iter().sum();
        assert_eq!(total, Vec2 { x: 2.0, y: 2.0 });
    }

    #[test]
    fn vec2_normed_zero_is_zero() {
        assert_eq!(Vec2::zero().normed(), Vec2::zero());
        let n = Vec2 { x: -0.0, y: 0.0 }.normed();
        assert_eq!(n.x.to_bits(), 0.0_f32.to_bits());
    }

    #[test]
    fn vec2_normed_has_unit_length() {
        let n = Vec2 { x: 3.0, y: -4.0 }.normed();
        assert!((n.len() - 1.0).abs() < EPSILON);
        assert_eq!(n, Vec2 { x: 0.6, y: -0.8 });
    }

    #[test]
    fn vec2_rotation_quadrants() {
        assert!(Vec2::right().rotated(90.0).almost_eq(Vec2::up()));
        assert!(Vec2::right().rotated(180.0).almost_eq(Vec2::left()));
        assert!(Vec2::right().rotated(270.0).almost_eq(Vec2::down()));
        assert!(Vec2::right().rotated(360.0).almost_eq(Vec2::right()));
        assert!(Vec2::right().rotated(-90.0).almost_eq(Vec2::down()));
        assert!(
            Vec2::right()
                .rotated(45.0)
                .almost_eq(Vec2 { x: 1.0, y: 1.0 }.normed())
        );
    }

    #[test]
    fn vec2_rotation_by_zero_is_exact() {
        let v = Vec2 { x: 0.1, y: -7.3 };
        let r = v.rotated(0.0);
        assert_eq!(r.x.to_bits(), v.x.to_bits());
        assert_eq!(r.y.to_bits(), v.y.to_bits());
    }

    #[test]
    fn vec2_rotated_around_pivot() {
        let p = Vec2 { x: 2.0, y: 1.0 };
        let pivot = Vec2 { x: 1.0, y: 1.0 };
        assert!(p.rotated_around(pivot, 90.0).almost_eq(Vec2 { x: 1.0, y: 2.0 }));
        assert!(pivot.rotated_around(pivot, 33.0).almost_eq(pivot));
    }

    #[test]
    fn vec2_cross_sign_follows_winding() {
        assert!(Vec2::right().cross(Vec2::up()) > 0.0);
        assert!(Vec2::up().cross(Vec2::right()) < 0.0);
        assert_eq!(Vec2::right().cross(Vec2::left()), 0.0);
    }

    #[test]
    fn vec2_orthog_points_clockwise() {
        assert_eq!(Vec2::up().orthog(), Vec2::right());
        assert_eq!(Vec2::right().orthog(), Vec2::down());
    }

    #[test]
    fn vec2_component_wise_div_by_zero() {
        let a = Vec2 { x: 8.0, y: 15.0 };
        assert_eq!(a.component_wise_div(Vec2 { x: 4.0, y: 5.0 }), Vec2 { x: 2.0, y: 3.0 });
        assert_eq!(a.component_wise_div(Vec2::zero()), Vec2::zero());
    }

    #[test]
    fn vec2_display() {
        let v = Vec2 { x: 1.5, y: -2.0 };
        assert_eq!(format!("{v}"), "vec(1.5, -2)");
        assert_eq!(format!("{v:.2}"), "vec(1.50, -2.00)");
    }

    #[test]
    fn transform_point_applies_scale_then_rotation_then_translation() {
        let t = Transform {
            centre: Vec2 { x: 10.0, y: 5.0 },
            rotation: 90.0,
            scale: Vec2 { x: 2.0, y: 1.0 },
        };
        // (1, 0) -> scaled (2, 0) -> rotated (0, 2) -> translated (10, 7)
        assert!(
            t.transform_point(Vec2::right())
                .almost_eq(Vec2 { x: 10.0, y: 7.0 })
        );
        assert!(t.rotate_direction(Vec2::right()).almost_eq(Vec2::up()));
    }

    #[test]
    fn transform_identity_is_exact() {
        let t = Transform::default();
        let p = Vec2 { x: 0.3, y: -0.7 };
        let q = t.transform_point(p);
        assert_eq!(q.x.to_bits(), p.x.to_bits());
        assert_eq!(q.y.to_bits(), p.y.to_bits());
    }

    #[test]
    fn transform_composition_matches_sequential_application() {
        let parent = Transform {
            centre: Vec2 { x: -3.0, y: 2.0 },
            rotation: 30.0,
            scale: Vec2 { x: 2.0, y: 2.0 },
        };
        let child = Transform {
            centre: Vec2 { x: 1.0, y: 4.0 },
            rotation: 15.0,
            scale: Vec2::one(),
        };
        let world = parent.then(&child);
        let local = Vec2 { x: 0.5, y: -0.25 };
        let expected = parent.transform_point(child.transform_point(local));
        assert!(world.transform_point(local).almost_eq(expected));
        assert_eq!(world.rotation, 45.0);
    }

    #[test]
    fn transform_translated() {
        let t = Transform::with_rotation(20.0).translated(Vec2 { x: 1.0, y: 2.0 });
        assert_eq!(t.centre, Vec2 { x: 1.0, y: 2.0 });
        assert_eq!(t.rotation, 20.0);
        assert_eq!(Transform::with_scale(Vec2::splat(3.0)).scale, Vec2::splat(3.0));
    }
}
