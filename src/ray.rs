use crate::consts::RAY_OFFSET;
use crate::tuple::{ Point, Vector3D };

/// A ray with an origin and a unit direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vector3D,
}

impl Ray {
    /// Intersections closer to the origin than this are ignored, so a ray
    /// spawned on a surface does not hit that same surface ("acne").
    pub const OFFSET: f64 = RAY_OFFSET;

    /// Creates a ray. The direction is normalized and must be non-zero.
    pub fn new(origin: Point, direction: Vector3D) -> Ray {
        Ray { origin, direction: direction.normalized() }
    }

    pub fn position(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }
}

#[test]
fn ray_direction_is_normalized() {
    let r = Ray::new(Point::ORIGIN, Vector3D::new(0.0, 3.0, 4.0));

    assert_eq!(r.direction, Vector3D::new(0.0, 0.6, 0.8));
}

#[test]
fn ray_position() {
    let r = Ray::new(Point::new(2.0, 3.0, 4.0), Vector3D::new(1.0, 0.0, 0.0));

    assert_eq!(r.position(0.0), Point::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Point::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Point::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Point::new(4.5, 3.0, 4.0));
}
