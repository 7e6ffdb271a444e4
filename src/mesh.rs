use std::path::Path;

use log::{ debug, warn };

use crate::tuple::{ Point, Vector3D };
use crate::ray::Ray;
use crate::intersect::Hit;
use crate::shape::intersect_plane_equation;
use crate::obj::ObjParser;

/// A planar polygon.
///
/// Vertices must be coplanar, non-degenerate and wound consistently; the
/// normal follows the right-hand rule over the first two edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    vertices: Vec<Point>,
}

impl Face {
    /// Creates a face from its vertices.
    ///
    /// # Panics
    ///
    /// Panics if fewer than three vertices are given.
    pub fn new(vertices: Vec<Point>) -> Face {
        assert!(vertices.len() >= 3, "A face needs at least three vertices.");
        Face { vertices }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn normal(&self) -> Vector3D {
        let e1 = self.vertices[1] - self.vertices[0];
        let e2 = self.vertices[2] - self.vertices[0];
        e1.cross(&e2).normalized()
    }

    /// Checks whether a point on this face's plane lies inside the polygon.
    ///
    /// For every vertex, the point must lie on the same side of the edge to
    /// the next vertex as the previous vertex does. Points on an edge count
    /// as inside.
    pub fn contains(&self, p: &Point) -> bool {
        let count = self.vertices.len();

        (0..count).all(|i| {
            let current = self.vertices[i];
            let next = self.vertices[(i + 1) % count];
            let prev = self.vertices[(i + count - 1) % count];

            let edge = next - current;
            let to_point = *p - current;
            let to_prev = prev - current;

            edge.cross(&to_point).dot(&edge.cross(&to_prev)) >= 0.0
        })
    }
}

/// A polygon mesh.
///
/// Intersection is a linear scan over all faces; there is no spatial index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub faces: Vec<Face>,
}

impl Model {
    pub fn new(faces: Vec<Face>) -> Model {
        Model { faces }
    }

    /// Loads a model from an OBJ file, scaling then offsetting each vertex.
    ///
    /// A missing or unreadable file is not fatal: a warning is logged and an
    /// empty model is returned, which no ray will ever hit.
    pub fn load<P: AsRef<Path>>(path: P, offset: Vector3D, scale: f64)
        -> Model {
        let path = path.as_ref();
        let mut parser = ObjParser::new(path)
            .with_offset(offset)
            .with_scale(scale);

        match parser.parse() {
            Ok(()) => {
                debug!("Loaded {} faces from {} ({} lines ignored).",
                    parser.faces.len(), path.display(), parser.ignored_lines);
                parser.into_model()
            },
            Err(e) => {
                warn!("Could not load model {}: {}", path.display(), e);
                Model::default()
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Intersects a ray with every face, keeping the nearest hit.
    ///
    /// On equal `t` the face stored first wins.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;

        for face in self.faces.iter() {
            let n = face.normal();
            let t = match intersect_plane_equation(ray, &face.vertices[0], &n) {
                Some(t) => t,
                None => continue,
            };

            if let Some(ref hit) = nearest {
                if t >= hit.t {
                    continue;
                }
            }

            let point = ray.position(t);
            if face.contains(&point) {
                nearest = Some(Hit::new(point, n, t));
            }
        }

        nearest
    }
}

#[cfg(test)]
fn unit_square_at(z: f64) -> Face {
    Face::new(vec![
        Point::new(0.0, 0.0, z),
        Point::new(1.0, 0.0, z),
        Point::new(1.0, 1.0, z),
        Point::new(0.0, 1.0, z),
    ])
}

#[test]
#[should_panic]
fn face_needs_three_vertices() {
    Face::new(vec![Point::ORIGIN, Point::new(1.0, 0.0, 0.0)]);
}

#[test]
fn face_normal_follows_winding() {
    let ccw = unit_square_at(0.0);
    let cw = Face::new(ccw.vertices().iter().rev().cloned().collect());

    assert_eq!(ccw.normal(), Vector3D::BACK);
    assert_eq!(cw.normal(), Vector3D::FORWARD);
}

#[test]
fn face_contains_points_inside_only() {
    let tri = Face::new(vec![
        Point::new(0.0, 1.0, 0.0),
        Point::new(-1.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
    ]);

    assert!(tri.contains(&Point::new(0.0, 0.5, 0.0)));
    assert!(tri.contains(&Point::new(0.0, 0.0, 0.0)));
    assert!(!tri.contains(&Point::new(0.6, 0.6, 0.0)));
    assert!(!tri.contains(&Point::new(-0.6, 0.6, 0.0)));
    assert!(!tri.contains(&Point::new(0.0, -0.1, 0.0)));
}

#[test]
fn ray_strikes_mesh_face() {
    let m = Model::new(vec![unit_square_at(0.0)]);
    let r = Ray::new(Point::new(0.25, 0.75, 2.0), Vector3D::FORWARD);

    let hit = m.intersect(&r).unwrap();
    assert!((hit.t - 2.0).abs() < 1e-9);
    assert_eq!(hit.point, Point::new(0.25, 0.75, 0.0));
    assert_eq!(hit.normal, Vector3D::BACK);
}

#[test]
fn ray_misses_mesh_outside_faces() {
    let m = Model::new(vec![unit_square_at(0.0)]);
    let r = Ray::new(Point::new(1.25, 0.5, 2.0), Vector3D::FORWARD);

    assert_eq!(m.intersect(&r), None);
}

#[test]
fn ray_parallel_to_face_misses() {
    let m = Model::new(vec![unit_square_at(0.0)]);
    let r = Ray::new(Point::new(0.5, 0.5, 0.0), Vector3D::RIGHT);

    assert_eq!(m.intersect(&r), None);
}

#[test]
fn mesh_keeps_nearest_face() {
    let m = Model::new(vec![
        unit_square_at(-3.0),
        unit_square_at(1.0),
        unit_square_at(-1.0),
    ]);
    let r = Ray::new(Point::new(0.5, 0.5, 2.0), Vector3D::FORWARD);

    let hit = m.intersect(&r).unwrap();
    assert!((hit.t - 1.0).abs() < 1e-9);
    assert_eq!(hit.point, Point::new(0.5, 0.5, 1.0));
}

#[test]
fn mesh_tie_keeps_first_face() {
    let first = unit_square_at(0.0);
    let second = Face::new(first.vertices().iter().rev().cloned().collect());
    let m = Model::new(vec![first, second]);
    let r = Ray::new(Point::new(0.5, 0.5, 2.0), Vector3D::FORWARD);

    assert_eq!(m.intersect(&r).unwrap().normal, Vector3D::BACK);
}

#[test]
fn empty_model_is_never_hit() {
    let m = Model::default();
    let r = Ray::new(Point::ORIGIN, Vector3D::FORWARD);

    assert!(m.is_empty());
    assert_eq!(m.intersect(&r), None);
}

#[test]
fn loading_missing_model_yields_empty_mesh() {
    let m = Model::load("./models/does-not-exist.obj", Vector3D::ZERO, 1.0);

    assert!(m.is_empty());
}

#[test]
fn loading_model_applies_scale_and_offset() {
    let m = Model::load("./models/vertices-and-faces.obj",
        Vector3D::new(0.0, 0.0, 1.0), 2.0);

    assert_eq!(m.faces.len(), 2);
    assert_eq!(m.faces[0].vertices()[0], Point::new(-2.0, 2.0, 1.0));
}

#[test]
fn loading_model_with_latin1_comments_keeps_faces() {
    let m = Model::load("./models/latin1-comment.obj", Vector3D::ZERO, 1.0);

    assert_eq!(m.faces.len(), 1);
    assert_eq!(m.faces[0].vertices()[1], Point::new(1.0, 0.0, 0.0));
}
