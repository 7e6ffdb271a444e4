use crate::feq;
use crate::tuple::{ Point, Vector3D };
use crate::ray::Ray;
use crate::intersect::Hit;
use crate::mesh::Model;

/// The geometry of a scene object.
///
/// Every variant answers the same question: where does a ray first strike
/// the surface, at least `Ray::OFFSET` in front of its origin?
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A sphere with a center and radius.
    Sphere(Sphere),

    /// A finite parallelogram. See `Plane`.
    Plane(Plane),

    /// A polygon mesh. See `Model`.
    Model(Model),
}

impl Shape {
    pub fn sphere(center: Point, radius: f64) -> Shape {
        Shape::Sphere(Sphere::new(center, radius))
    }

    pub fn plane(corner: Point, right: Vector3D, up: Vector3D) -> Shape {
        Shape::Plane(Plane::new(corner, right, up))
    }

    pub fn model(model: Model) -> Shape {
        Shape::Model(model)
    }

    /// Intersects a ray with this shape, returning the nearest valid hit.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        match self {
            Shape::Sphere(ref s) => s.intersect(ray),
            Shape::Plane(ref p) => p.intersect(ray),
            Shape::Model(ref m) => m.intersect(ray),
        }
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Shape {
        Shape::Sphere(s)
    }
}

impl From<Plane> for Shape {
    fn from(p: Plane) -> Shape {
        Shape::Plane(p)
    }
}

impl From<Model> for Shape {
    fn from(m: Model) -> Shape {
        Shape::Model(m)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point, radius: f64) -> Sphere {
        Sphere { center, radius }
    }

    /// Checks whether a ray intersects a sphere.
    ///
    /// Substituting the ray into `|p - center|^2 = radius^2` gives a
    /// quadratic in `t`. The ray direction is a unit vector, so the leading
    /// coefficient is 1.
    ///
    /// The nearer root is preferred. If it lies within the offset shell (the
    /// ray starts on or inside the sphere) the farther root is used; if both
    /// do, the sphere is behind the ray.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let center_to_ray = ray.origin - self.center;

        let b = 2.0 * ray.direction.dot(&center_to_ray);
        let c = center_to_ray.sqr_magnitude() - self.radius.powi(2);

        let discriminant = b.powi(2) - 4.0 * c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t_far = (-b + root) / 2.0;
        let t_near = (-b - root) / 2.0;

        if t_far < Ray::OFFSET {
            return None;
        }

        let t = if t_near < Ray::OFFSET { t_far } else { t_near };
        let point = ray.position(t);
        let normal = (point - self.center).normalized();

        Some(Hit::new(point, normal, t))
    }
}

/// A finite plane.
///
/// The plane is the parallelogram spanned by the `right` and `up` edges from
/// `corner`. Its normal is `right x up`, normalized.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub corner: Point,
    pub right: Vector3D,
    pub up: Vector3D,
}

impl Plane {
    pub fn new(corner: Point, right: Vector3D, up: Vector3D) -> Plane {
        Plane { corner, right, up }
    }

    pub fn normal(&self) -> Vector3D {
        self.right.cross(&self.up).normalized()
    }

    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let n = self.normal();
        let t = intersect_plane_equation(ray, &self.corner, &n)?;
        let point = ray.position(t);

        // Project the hit onto both edges; each projection must fall within
        // the edge's length.
        let v = point - self.corner;
        if !within_edge(&v, &self.up) || !within_edge(&v, &self.right) {
            return None;
        }

        Some(Hit::new(point, n, t))
    }
}

fn within_edge(v: &Vector3D, edge: &Vector3D) -> bool {
    let edge_len = edge.magnitude();
    let len = v.dot(edge) / edge_len;

    len >= 0.0 && len <= edge_len
}

/// Solves for the ray parameter where `ray` crosses the infinite plane
/// through `on_plane` with unit normal `n`.
///
/// Returns `None` when the ray is parallel to the plane or the crossing is
/// closer than `Ray::OFFSET`.
pub(crate) fn intersect_plane_equation(ray: &Ray, on_plane: &Point,
    n: &Vector3D) -> Option<f64> {
    let divisor = ray.direction.dot(n);
    if feq(divisor, 0.0) {
        return None;
    }

    let t = -(ray.origin - *on_plane).dot(n) / divisor;
    if t < Ray::OFFSET {
        return None;
    }

    Some(t)
}

#[test]
fn ray_hits_sphere_at_distance_minus_radius() {
    let s = Sphere::new(Point::ORIGIN, 2.0);
    let r = Ray::new(Point::new(0.0, 0.0, -7.0), Vector3D::new(0.0, 0.0, 3.0));

    let hit = s.intersect(&r).unwrap();
    assert!((hit.t - 5.0).abs() < 1e-9);
    assert_eq!(hit.point, Point::new(0.0, 0.0, -2.0));
    assert_eq!(hit.normal, Vector3D::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_hits_offset_sphere_normal_points_outward() {
    let center = Point::new(1.0, 2.0, 3.0);
    let s = Sphere::new(center, 0.5);
    let origin = Point::new(4.0, 6.0, 3.0);
    let r = Ray::new(origin, center - origin);

    let hit = s.intersect(&r).unwrap();
    assert!((hit.t - 4.5).abs() < 1e-9);
    assert!(hit.normal.dot(&(hit.point - center)) > 0.0);
    assert!((hit.normal.magnitude() - 1.0).abs() < 1e-9);
}

#[test]
fn ray_misses_sphere() {
    let s = Sphere::new(Point::ORIGIN, 1.0);
    let r = Ray::new(Point::new(0.0, 1.5, -5.0), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn ray_is_tangent_to_sphere() {
    let s = Sphere::new(Point::ORIGIN, 1.0);
    let r = Ray::new(Point::new(0.0, 1.0, -5.0), Vector3D::new(0.0, 0.0, 1.0));

    let hit = s.intersect(&r).unwrap();
    assert!((hit.t - 5.0).abs() < 1e-9);
}

#[test]
fn ray_inside_sphere_hits_far_side() {
    let s = Sphere::new(Point::ORIGIN, 1.0);
    let r = Ray::new(Point::ORIGIN, Vector3D::new(0.0, 0.0, 1.0));

    let hit = s.intersect(&r).unwrap();
    assert!((hit.t - 1.0).abs() < 1e-9);
    assert_eq!(hit.normal, Vector3D::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_on_sphere_surface_ignores_its_origin() {
    let s = Sphere::new(Point::ORIGIN, 1.0);
    let r = Ray::new(Point::new(0.0, 0.0, -1.0), Vector3D::new(0.0, 0.0, 1.0));

    let hit = s.intersect(&r).unwrap();
    assert!((hit.t - 2.0).abs() < 1e-9);

    let outward = Ray::new(Point::new(0.0, 0.0, -1.0),
        Vector3D::new(0.0, 0.0, -1.0));
    assert_eq!(s.intersect(&outward), None);
}

#[test]
fn sphere_is_behind_ray() {
    let s = Sphere::new(Point::ORIGIN, 1.0);
    let r = Ray::new(Point::new(0.0, 0.0, 5.0), Vector3D::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn ray_hits_plane_inside_footprint() {
    let p = Plane::new(Point::ORIGIN, Vector3D::new(2.0, 0.0, 0.0),
        Vector3D::new(0.0, 2.0, 0.0));
    let r = Ray::new(Point::new(1.0, 1.5, 3.0), Vector3D::new(0.0, 0.0, -1.0));

    let hit = p.intersect(&r).unwrap();
    assert!((hit.t - 3.0).abs() < 1e-9);
    assert_eq!(hit.point, Point::new(1.0, 1.5, 0.0));
    assert_eq!(hit.normal, Vector3D::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_outside_plane_footprint_misses() {
    let p = Plane::new(Point::ORIGIN, Vector3D::new(2.0, 0.0, 0.0),
        Vector3D::new(0.0, 2.0, 0.0));

    // The infinite plane z = 0 is crossed in every case below.
    let beyond_right = Ray::new(Point::new(2.5, 1.0, 3.0), Vector3D::FORWARD);
    let before_corner = Ray::new(Point::new(-0.5, 1.0, 3.0), Vector3D::FORWARD);
    let beyond_up = Ray::new(Point::new(1.0, 2.01, 3.0), Vector3D::FORWARD);
    let below = Ray::new(Point::new(1.0, -0.01, 3.0), Vector3D::FORWARD);

    assert_eq!(p.intersect(&beyond_right), None);
    assert_eq!(p.intersect(&before_corner), None);
    assert_eq!(p.intersect(&beyond_up), None);
    assert_eq!(p.intersect(&below), None);
}

#[test]
fn plane_hit_from_behind_keeps_geometric_normal() {
    let p = Plane::new(Point::ORIGIN, Vector3D::new(2.0, 0.0, 0.0),
        Vector3D::new(0.0, 2.0, 0.0));
    let r = Ray::new(Point::new(1.0, 1.0, -3.0), Vector3D::BACK);

    let hit = p.intersect(&r).unwrap();
    assert_eq!(hit.normal, Vector3D::BACK);
}

#[test]
fn ray_parallel_to_plane_misses() {
    let p = Plane::new(Point::ORIGIN, Vector3D::new(2.0, 0.0, 0.0),
        Vector3D::new(0.0, 2.0, 0.0));
    let r = Ray::new(Point::new(1.0, 1.0, 1.0), Vector3D::new(1.0, 0.0, 0.0));

    assert_eq!(p.intersect(&r), None);
}

#[test]
fn plane_behind_ray_misses() {
    let p = Plane::new(Point::ORIGIN, Vector3D::new(2.0, 0.0, 0.0),
        Vector3D::new(0.0, 2.0, 0.0));
    let r = Ray::new(Point::new(1.0, 1.0, 1.0), Vector3D::BACK);

    assert_eq!(p.intersect(&r), None);
}

#[test]
fn shape_dispatches_to_variant() {
    let s = Shape::sphere(Point::ORIGIN, 1.0);
    let r = Ray::new(Point::new(0.0, 0.0, -5.0), Vector3D::BACK);

    assert_eq!(s.intersect(&r), Sphere::new(Point::ORIGIN, 1.0).intersect(&r));
}
