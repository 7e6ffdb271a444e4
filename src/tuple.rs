use std::fmt;
use std::ops::{ Add, Sub, Neg, Mul, Div };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A free direction in 3D space.
///
/// Vectors have no position; see `Point` for locations. Equality is tolerant
/// to floating point error (each component within `FEQ_EPSILON`).
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vector3D {
    fn eq(&self, other: &Vector3D) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(v: [f64; 3]) -> Vector3D {
        Vector3D { x: v[0], y: v[1], z: v[2] }
    }
}

impl From<Vector3D> for [f64; 3] {
    fn from(v: Vector3D) -> [f64; 3] {
        [v.x, v.y, v.z]
    }
}

impl Vector3D {
    pub const ZERO: Vector3D = Vector3D { x: 0.0, y: 0.0, z: 0.0 };
    pub const RIGHT: Vector3D = Vector3D { x: 1.0, y: 0.0, z: 0.0 };
    pub const LEFT: Vector3D = Vector3D { x: -1.0, y: 0.0, z: 0.0 };
    pub const UP: Vector3D = Vector3D { x: 0.0, y: 1.0, z: 0.0 };
    pub const DOWN: Vector3D = Vector3D { x: 0.0, y: -1.0, z: 0.0 };
    pub const BACK: Vector3D = Vector3D { x: 0.0, y: 0.0, z: 1.0 };
    pub const FORWARD: Vector3D = Vector3D { x: 0.0, y: 0.0, z: -1.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D { x, y, z }
    }

    pub fn sqr_magnitude(&self) -> f64 {
        self.x.powi(2) + self.y.powi(2) + self.z.powi(2)
    }

    pub fn magnitude(&self) -> f64 {
        self.sqr_magnitude().sqrt()
    }

    /// Normalizes this vector in place.
    ///
    /// The vector must have a non-zero magnitude.
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Returns a unit vector parallel to this one.
    ///
    /// The vector must have a non-zero magnitude; normalizing the zero vector
    /// yields NaN components.
    pub fn normalized(&self) -> Vector3D {
        let mag = self.magnitude();

        Vector3D {
            x: self.x / mag,
            y: self.y / mag,
            z: self.z / mag,
        }
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Vector3D {
        Vector3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// The angle between two vectors, in degrees (0 to 180).
    ///
    /// The cosine is clamped to `[-1, 1]` so rounding on (anti)parallel
    /// vectors cannot push `acos` out of its domain.
    pub fn angle(v1: &Vector3D, v2: &Vector3D) -> f64 {
        let cos = v1.dot(v2) / (v1.magnitude() * v2.magnitude());
        cos.clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// The angle from `from` to `to`, in degrees (-180 to 180).
    ///
    /// The sign is positive when `dir` lies on the same side of the plane
    /// spanned by `from` and `to` as `from x to`.
    ///
    /// # Panics
    ///
    /// Panics if `dir` is coplanar with `from` and `to`.
    pub fn signed_angle(from: &Vector3D, to: &Vector3D, dir: &Vector3D) -> f64 {
        let n = from.cross(to);
        let side = dir.dot(&n);
        assert!(!feq(side, 0.0),
            "Direction vector should not be coplanar with from and to.");

        let angle = Vector3D::angle(from, to);
        if side < 0.0 { -angle } else { angle }
    }

    /// Linearly interpolates between two vectors: `v1 * (1 - p) + v2 * p`.
    pub fn mix(v1: &Vector3D, v2: &Vector3D, p: f64) -> Vector3D {
        *v1 * (1.0 - p) + *v2 * p
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y, z: -self.z }
    }
}

/// Implements scalar right-multiplication for a vector.
///
/// ```
/// use whitted::tuple::Vector3D;
///
/// let v = Vector3D::new(1.0, 2.0, 3.0);
/// assert_eq!(v * 2.0, Vector3D::new(2.0, 4.0, 6.0));
/// ```
impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a vector.
///
/// ```
/// use whitted::tuple::Vector3D;
///
/// let v = Vector3D::new(1.0, 2.0, 3.0);
/// assert_eq!(2.0 * v, Vector3D::new(2.0, 4.0, 6.0));
/// ```
impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, other: Vector3D) -> Vector3D {
        other * self
    }
}

/// Component-wise multiplication of two vectors.
impl Mul<Vector3D> for Vector3D {
    type Output = Vector3D;

    fn mul(self, other: Vector3D) -> Vector3D {
        Vector3D {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }
}

impl Div<f64> for Vector3D {
    type Output = Self;

    fn div(self, other: f64) -> Self {
        Self {
            x: self.x / other,
            y: self.y / other,
            z: self.z / other,
        }
    }
}

/// A location in 3D space.
///
/// Points and vectors are distinct types: a point moved by a vector is a
/// point, and the difference of two points is a vector.
///
/// ```
/// use whitted::tuple::{ Point, Vector3D };
///
/// let p = Point::new(1.0, 2.0, 3.0);
/// let q = Point::new(4.0, 6.0, 3.0);
/// assert_eq!(q - p, Vector3D::new(3.0, 4.0, 0.0));
/// assert_eq!(Point::distance(&p, &q), 5.0);
/// ```
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Point {
    fn eq(&self, other: &Point) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Point {
    fn from(p: [f64; 3]) -> Point {
        Point { x: p[0], y: p[1], z: p[2] }
    }
}

impl From<Point> for [f64; 3] {
    fn from(p: Point) -> [f64; 3] {
        [p.x, p.y, p.z]
    }
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Point {
        Point { x, y, z }
    }

    pub fn distance(p1: &Point, p2: &Point) -> f64 {
        (*p2 - *p1).magnitude()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add<Vector3D> for Point {
    type Output = Point;

    fn add(self, v: Vector3D) -> Point {
        Point {
            x: self.x + v.x,
            y: self.y + v.y,
            z: self.z + v.z,
        }
    }
}

impl Add<Point> for Vector3D {
    type Output = Point;

    fn add(self, p: Point) -> Point {
        p + self
    }
}

impl Sub<Vector3D> for Point {
    type Output = Point;

    fn sub(self, v: Vector3D) -> Point {
        Point {
            x: self.x - v.x,
            y: self.y - v.y,
            z: self.z - v.z,
        }
    }
}

impl Sub<Point> for Point {
    type Output = Vector3D;

    fn sub(self, other: Point) -> Vector3D {
        Vector3D {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a1 = Vector3D::new(3.0, -2.0, 5.0);
    let a2 = Vector3D::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Vector3D::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_points() {
    let p1 = Point::new(3.0, 2.0, 1.0);
    let p2 = Point::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector3D::new(-2.0, -4.0, -6.0));
}

#[test]
fn sub_vector_from_point() {
    let p = Point::new(3.0, 2.0, 1.0);
    let v = Vector3D::new(5.0, 6.0, 7.0);

    assert_eq!(p - v, Point::new(-2.0, -4.0, -6.0));
}

#[test]
fn point_plus_minus_vector_is_identity() {
    let p = Point::new(0.3, -1.7, 12.25);
    let v = Vector3D::new(-4.1, 0.02, 7.5);

    assert_eq!(p + v - v, p);
    assert_eq!(v + p, p + v);
}

#[test]
fn point_difference_matches_distance() {
    let p = Point::new(1.0, -2.0, 0.5);
    let q = Point::new(-3.0, 4.0, 2.5);

    assert!(((q - p).magnitude() - Point::distance(&p, &q)).abs() < 1e-9);
    assert!(((p - q).magnitude() - Point::distance(&q, &p)).abs() < 1e-9);
}

#[test]
fn neg_vector() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector3D::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_and_div_scalar() {
    let a = Vector3D::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Vector3D::new(3.5, -7.0, 10.5));
    assert_eq!(a / 2.0, Vector3D::new(0.5, -1.0, 1.5));
}

#[test]
fn mul_componentwise() {
    let a = Vector3D::new(1.0, -2.0, 3.0);
    let b = Vector3D::new(2.0, 0.5, -1.0);

    assert_eq!(a * b, Vector3D::new(2.0, -1.0, -3.0));
}

#[test]
fn equality_is_tolerant() {
    let a = Vector3D::new(1.0, 2.0, 3.0);

    assert_eq!(a, Vector3D::new(1.0 + 1e-7, 2.0 - 1e-7, 3.0));
    assert_ne!(a, Vector3D::new(1.0 + 1e-5, 2.0, 3.0));
}

#[test]
fn magnitude_neg() {
    let v = Vector3D::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
    assert_eq!(v.sqr_magnitude(), 14.0);
}

#[test]
fn normalize_dirty() {
    let v = Vector3D::new(1.0, 2.0, 3.0);
    let e = Vector3D::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalized(), e);
}

#[test]
fn normalized_vectors_are_unit_and_parallel() {
    let samples = [
        Vector3D::new(4.0, 0.0, 0.0),
        Vector3D::new(-0.001, 0.002, 0.0005),
        Vector3D::new(123.0, -456.0, 789.0),
        Vector3D::new(1e-3, 1e3, -1.0),
    ];

    for v in samples.iter() {
        let n = v.normalized();
        assert!((n.magnitude() - 1.0).abs() < 1e-9);
        assert!(n.cross(v).magnitude() <= 1e-9 * v.magnitude());
        assert!(n.dot(v) > 0.0);
    }
}

#[test]
fn normalize_in_place() {
    let mut v = Vector3D::new(0.0, 3.0, 4.0);
    v.normalize();

    assert_eq!(v, Vector3D::new(0.0, 0.6, 0.8));
}

#[test]
fn dot_vectors() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn cross_vectors() {
    let a = Vector3D::new(1.0, 2.0, 3.0);
    let b = Vector3D::new(2.0, 3.0, 4.0);

    assert_eq!(a.cross(&b), Vector3D::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vector3D::new(1.0, -2.0, 1.0));
}

#[test]
fn angle_between_vectors() {
    assert!((Vector3D::angle(&Vector3D::RIGHT, &Vector3D::UP) - 90.0).abs()
        < 1e-9);
    assert_eq!(Vector3D::angle(&Vector3D::UP, &(Vector3D::UP * 3.0)), 0.0);
    assert!((Vector3D::angle(&Vector3D::UP, &Vector3D::DOWN) - 180.0).abs()
        < 1e-9);

    let diag = Vector3D::new(1.0, 1.0, 0.0);
    assert!((Vector3D::angle(&Vector3D::RIGHT, &diag) - 45.0).abs() < 1e-9);
}

#[test]
fn angle_of_nearly_parallel_vectors_is_finite() {
    let v = Vector3D::new(0.1, 0.2, 0.3);
    let w = v * 7.0;

    assert!(Vector3D::angle(&v, &w).is_finite());
}

#[test]
fn signed_angle_follows_reference_direction() {
    let a = Vector3D::signed_angle(&Vector3D::RIGHT, &Vector3D::UP,
        &Vector3D::BACK);
    let b = Vector3D::signed_angle(&Vector3D::RIGHT, &Vector3D::UP,
        &Vector3D::FORWARD);

    assert!((a - 90.0).abs() < 1e-9);
    assert!((b + 90.0).abs() < 1e-9);
}

#[test]
#[should_panic]
fn signed_angle_rejects_coplanar_direction() {
    Vector3D::signed_angle(&Vector3D::RIGHT, &Vector3D::UP,
        &Vector3D::new(1.0, 1.0, 0.0));
}

#[test]
fn mix_vectors() {
    let a = Vector3D::new(0.0, 2.0, 4.0);
    let b = Vector3D::new(2.0, 2.0, 0.0);

    assert_eq!(Vector3D::mix(&a, &b, 0.0), a);
    assert_eq!(Vector3D::mix(&a, &b, 1.0), b);
    assert_eq!(Vector3D::mix(&a, &b, 0.25), Vector3D::new(0.5, 2.0, 3.0));
}
