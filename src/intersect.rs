use crate::consts::AIR_RI;
use crate::color::Color;
use crate::tuple::{ Point, Vector3D };
use crate::ray::Ray;
use crate::material::Object;

/// The result of intersecting a ray with a single shape.
///
/// `t` is the ray parameter of the hit (`point == ray.position(t)`), always
/// at least `Ray::OFFSET`. A miss is represented by `None` rather than by a
/// sentinel `t`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    pub point: Point,
    pub normal: Vector3D,
    pub t: f64,
}

impl Hit {
    pub fn new(point: Point, normal: Vector3D, t: f64) -> Hit {
        Hit { point, normal, t }
    }
}

/// A hit together with the scene object that produced it.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub hit: Hit,
    pub object: &'a Object,
}

/// Two intersections are equal if their hits are equal and they refer to the
/// same object (by address).
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.hit == other.hit && std::ptr::eq(self.object, other.object)
    }
}

/// Shading state derived from a ray and the hit it produced.
#[derive(Copy, Clone, Debug)]
pub struct IntersectionComputation {
    /// The point where the intersection occurs.
    pub point: Point,

    /// The direction of the incoming ray.
    pub dirv: Vector3D,

    /// The surface normal, flipped to face the incoming ray.
    pub normalv: Vector3D,

    /// Cosine of the angle between the reversed ray and `normalv`; never
    /// negative.
    pub cos: f64,

    /// Whether the ray struck the back side of the surface (i.e. it is
    /// leaving the object).
    pub back_side: bool,

    /// The incoming ray, reflected across the normal.
    pub reflectv: Vector3D,
}

impl IntersectionComputation {
    pub fn new(ray: &Ray, hit: &Hit) -> IntersectionComputation {
        let dirv = ray.direction;
        let mut normalv = hit.normal;
        let mut cos = -dirv.dot(&normalv);

        let back_side = cos < 0.0;
        if back_side {
            cos = -cos;
            normalv = -normalv;
        }

        let reflectv = dirv + normalv * (2.0 * cos);

        IntersectionComputation {
            point: hit.point,
            dirv,
            normalv,
            cos,
            back_side,
            reflectv,
        }
    }

    /// Fresnel reflectance by Schlick's approximation, per channel.
    ///
    /// `f0` is the reflectance at normal incidence; at `cos == 1` the result
    /// is exactly `f0`, and it rises to white at grazing angles.
    pub fn schlick(&self, f0: Color) -> Color {
        f0 + (Color::white() - f0) * (1.0 - self.cos).powi(5)
    }

    /// The refracted direction through a surface with refractive index `n`,
    /// by Snell's law.
    ///
    /// Rays hitting the front side enter the material (index ratio
    /// `AIR_RI / n`), rays hitting the back side leave it (`n / AIR_RI`).
    /// Returns `None` on total internal reflection.
    pub fn refracted(&self, n: f64) -> Option<Vector3D> {
        let ratio = if self.back_side { n / AIR_RI } else { AIR_RI / n };
        let k = 1.0 - ratio.powi(2) * (1.0 - self.cos.powi(2));

        if k < 0.0 {
            return None;
        }

        Some(
            (self.dirv + self.normalv * self.cos) * ratio
                - self.normalv * k.sqrt()
        )
    }
}

#[test]
fn precompute_outside_intersection() {
    let r = Ray::new(Point::new(0.0, 0.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));
    let h = Hit::new(Point::new(0.0, 0.0, -1.0), Vector3D::new(0.0, 0.0, -1.0),
        4.0);
    let comps = IntersectionComputation::new(&r, &h);

    assert!(!comps.back_side);
    assert_eq!(comps.normalv, Vector3D::new(0.0, 0.0, -1.0));
    assert!((comps.cos - 1.0).abs() < 1e-12);
    assert_eq!(comps.reflectv, Vector3D::new(0.0, 0.0, -1.0));
}

#[test]
fn precompute_inside_intersection() {
    let r = Ray::new(Point::ORIGIN, Vector3D::new(0.0, 0.0, 1.0));
    let h = Hit::new(Point::new(0.0, 0.0, 1.0), Vector3D::new(0.0, 0.0, 1.0),
        1.0);
    let comps = IntersectionComputation::new(&r, &h);

    assert!(comps.back_side);
    assert_eq!(comps.normalv, Vector3D::new(0.0, 0.0, -1.0));
    assert!(comps.cos >= 0.0);
}

#[test]
fn reflect_45() {
    let r = Ray::new(Point::new(0.0, 1.0, 0.0), Vector3D::new(1.0, -1.0, 0.0));
    let h = Hit::new(Point::new(1.0, 0.0, 0.0), Vector3D::UP, 2f64.sqrt());
    let comps = IntersectionComputation::new(&r, &h);

    assert_eq!(comps.reflectv, Vector3D::new(1.0, 1.0, 0.0).normalized());
}

#[test]
fn schlick_at_normal_incidence_is_f0() {
    let r = Ray::new(Point::new(0.0, 0.0, 5.0), Vector3D::FORWARD);
    let h = Hit::new(Point::ORIGIN, Vector3D::BACK, 5.0);
    let comps = IntersectionComputation::new(&r, &h);
    let f0 = Color::rgb(0.04, 0.5, 0.9);

    assert_eq!(comps.schlick(f0), f0);
}

#[test]
fn schlick_at_grazing_angle_is_nearly_white() {
    let r = Ray::new(Point::new(-5.0, 0.0, 1e-9), Vector3D::new(1.0, 0.0, -1e-9));
    let h = Hit::new(Point::ORIGIN, Vector3D::BACK, 5.0);
    let comps = IntersectionComputation::new(&r, &h);
    let f = comps.schlick(Color::gray(0.04));

    assert!(f.r > 0.99 && f.g > 0.99 && f.b > 0.99);
}

#[test]
fn refraction_straight_through_keeps_direction() {
    let r = Ray::new(Point::new(0.0, 0.0, 5.0), Vector3D::FORWARD);
    let h = Hit::new(Point::ORIGIN, Vector3D::BACK, 5.0);
    let comps = IntersectionComputation::new(&r, &h);

    assert_eq!(comps.refracted(1.5), Some(Vector3D::FORWARD));
}

#[test]
fn refraction_bends_toward_normal_when_entering() {
    let dir = Vector3D::new(1.0, 0.0, -1.0).normalized();
    let r = Ray::new(Point::new(-1.0, 0.0, 1.0), dir);
    let h = Hit::new(Point::ORIGIN, Vector3D::BACK, 2f64.sqrt());
    let comps = IntersectionComputation::new(&r, &h);

    let t = comps.refracted(1.5).unwrap();
    let sin_i = 45f64.to_radians().sin();
    let sin_t = t.x / t.magnitude();

    assert!((sin_i / sin_t - 1.5).abs() < 1e-9);
    assert!(t.z < 0.0);
}

#[test]
fn total_internal_reflection_has_no_refraction() {
    // Leaving glass at 60 degrees from the normal exceeds the critical angle.
    let dir = Vector3D::new(60f64.to_radians().sin(), 0.0,
        60f64.to_radians().cos());
    let r = Ray::new(Point::new(-dir.x, 0.0, -dir.z), dir);
    let h = Hit::new(Point::ORIGIN, Vector3D::BACK, 1.0);
    let comps = IntersectionComputation::new(&r, &h);

    assert!(comps.back_side);
    assert_eq!(comps.refracted(1.5), None);
}
