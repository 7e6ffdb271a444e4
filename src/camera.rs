use thiserror::Error;

use crate::feq;
use crate::tuple::{ Point, Vector3D };
use crate::ray::Ray;

/// Errors raised while setting up a camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("up vector {up} is collinear with view direction {view}")]
    Collinear { up: Vector3D, view: Vector3D },

    #[error("up vector {up} or view direction {view} has zero length")]
    Degenerate { up: Vector3D, view: Vector3D },
}

/// A pinhole camera.
///
/// The camera looks from `eye` toward `center`. `up` and `right` form an
/// orthonormal basis of the image plane once `check_up_and_right` succeeds;
/// the image plane passes through `center`.
///
/// `width` and `height` are the dimensions of the viewport on the image
/// plane. They are zero until `set_perspective` is called for an image size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point,
    pub center: Point,
    pub up: Vector3D,
    pub right: Vector3D,

    /// Vertical field of view, in degrees.
    pub fovy: f64,

    pub width: f64,
    pub height: f64,
}

impl Camera {
    /// Creates a camera, validating its basis.
    pub fn try_new(eye: Point, center: Point, up: Vector3D, fovy: f64)
        -> Result<Camera, CameraError> {
        let mut camera = Camera {
            eye,
            center,
            up,
            right: Vector3D::ZERO,
            fovy,
            width: 0.0,
            height: 0.0,
        };

        if !camera.check_up_and_right() {
            let view = eye - center;
            if feq(view.sqr_magnitude(), 0.0) || feq(up.sqr_magnitude(), 0.0) {
                return Err(CameraError::Degenerate { up, view });
            }

            return Err(CameraError::Collinear { up, view });
        }

        Ok(camera)
    }

    /// Creates a camera.
    ///
    /// # Panics
    ///
    /// Panics if `up` is collinear with the view direction, or if either
    /// has zero length (`eye == center`).
    pub fn new(eye: Point, center: Point, up: Vector3D, fovy: f64) -> Camera {
        match Camera::try_new(eye, center, up, fovy) {
            Ok(camera) => camera,
            Err(e) => panic!("Invalid camera: {}", e),
        }
    }

    /// Derives `right` from `up` and the view direction, then makes `up`
    /// orthogonal to both. Both end up normalized.
    ///
    /// Returns `false`, leaving the camera untouched, if `up` is parallel to
    /// the view direction or either of them has zero length.
    pub fn check_up_and_right(&mut self) -> bool {
        let n = self.eye - self.center;
        if feq(n.sqr_magnitude(), 0.0) || feq(self.up.sqr_magnitude(), 0.0) {
            return false;
        }

        let angle = Vector3D::angle(&self.up, &n);
        if !angle.is_finite() || feq(angle, 0.0) || feq(angle, 180.0) {
            return false;
        }

        self.right = self.up.cross(&n).normalized();
        if !feq(angle, 90.0) {
            self.up = n.cross(&self.right);
        }
        self.up.normalize();

        true
    }

    /// Sizes the viewport for an image of `w` by `h` pixels.
    pub fn set_perspective(&mut self, w: usize, h: usize) {
        let distance = Point::distance(&self.eye, &self.center);
        self.height = 2.0 * distance * (self.fovy.to_radians() / 2.0).tan();
        self.width = self.height * (w as f64) / (h as f64);
    }

    /// The primary ray through pixel (`x`, `y`) of a `w` by `h` image.
    ///
    /// Pixel (0, 0) is the bottom-left corner of the image; `y` grows
    /// upward. Rays pass through pixel centers.
    pub fn get_ray(&self, x: usize, y: usize, w: usize, h: usize) -> Ray {
        let pixel_width = self.width / (w as f64);
        let pixel_height = self.height / (h as f64);

        let dx = -((w - 1) as f64) * pixel_width / 2.0 + (x as f64) * pixel_width;
        let dy = -((h - 1) as f64) * pixel_height / 2.0
            + (y as f64) * pixel_height;

        let direction = (self.center - self.eye)
            + self.right * dx
            + self.up * dy;

        Ray::new(self.eye, direction)
    }
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::new(Point::new(0.0, 0.0, 1.0), Point::ORIGIN, Vector3D::UP,
            60.0)
    }
}

#[test]
fn basis_is_orthonormalized() {
    let c = Camera::new(Point::new(0.0, 0.0, 5.0), Point::ORIGIN,
        Vector3D::new(0.0, 2.0, 2.0), 60.0);

    assert_eq!(c.right, Vector3D::RIGHT);
    assert_eq!(c.up, Vector3D::UP);
}

#[test]
fn orthogonal_up_is_only_normalized() {
    let c = Camera::new(Point::new(8.0, 0.0, 2.0), Point::new(0.0, 0.0, 2.0),
        Vector3D::new(0.0, 0.0, 3.0), 60.0);

    assert_eq!(c.up, Vector3D::BACK);
    assert_eq!(c.right, Vector3D::UP);
}

#[test]
fn collinear_up_is_rejected() {
    let res = Camera::try_new(Point::new(0.0, 0.0, 5.0), Point::ORIGIN,
        Vector3D::BACK, 60.0);
    assert!(matches!(res, Err(CameraError::Collinear { .. })));

    let res = Camera::try_new(Point::new(0.0, 0.0, 5.0), Point::ORIGIN,
        Vector3D::FORWARD, 60.0);
    assert!(res.is_err());
}

#[test]
#[should_panic]
fn new_panics_on_collinear_up() {
    Camera::new(Point::new(0.0, 5.0, 0.0), Point::ORIGIN, Vector3D::UP, 60.0);
}

#[test]
fn eye_at_center_is_rejected() {
    let res = Camera::try_new(Point::ORIGIN, Point::ORIGIN, Vector3D::UP, 60.0);
    assert!(matches!(res, Err(CameraError::Degenerate { .. })));

    let res = Camera::try_new(Point::new(0.0, 0.0, 5.0), Point::ORIGIN,
        Vector3D::ZERO, 60.0);
    assert!(matches!(res, Err(CameraError::Degenerate { .. })));
}

#[test]
#[should_panic]
fn new_panics_when_eye_is_at_center() {
    Camera::new(Point::new(1.0, 1.0, 1.0), Point::new(1.0, 1.0, 1.0),
        Vector3D::UP, 60.0);
}

#[test]
fn rejected_basis_leaves_camera_untouched() {
    let mut c = Camera::new(Point::new(0.0, 0.0, 5.0), Point::ORIGIN,
        Vector3D::UP, 60.0);
    c.center = c.eye;

    assert!(!c.check_up_and_right());
    assert_eq!(c.up, Vector3D::UP);
    assert_eq!(c.right, Vector3D::RIGHT);
}

#[test]
fn perspective_sizes_viewport() {
    let mut c = Camera::new(Point::new(0.0, 0.0, 5.0), Point::ORIGIN,
        Vector3D::UP, 90.0);
    c.set_perspective(200, 100);

    assert!((c.height - 10.0).abs() < 1e-9);
    assert!((c.width - 20.0).abs() < 1e-9);
}

#[test]
fn ray_through_center() {
    let mut c = Camera::new(Point::new(0.0, 0.0, 5.0), Point::ORIGIN,
        Vector3D::UP, 90.0);
    c.set_perspective(3, 3);
    let r = c.get_ray(1, 1, 3, 3);

    assert_eq!(r.origin, Point::new(0.0, 0.0, 5.0));
    assert_eq!(r.direction, Vector3D::FORWARD);
}

#[test]
fn ray_through_corners() {
    let mut c = Camera::new(Point::new(0.0, 0.0, 1.0), Point::ORIGIN,
        Vector3D::UP, 90.0);
    c.set_perspective(2, 2);

    let bottom_left = c.get_ray(0, 0, 2, 2);
    let top_right = c.get_ray(1, 1, 2, 2);

    assert_eq!(bottom_left.direction,
        Vector3D::new(-0.5, -0.5, -1.0).normalized());
    assert_eq!(top_right.direction,
        Vector3D::new(0.5, 0.5, -1.0).normalized());
}
