use crate::color::Color;
use crate::tuple::{ Point, Vector3D };
use crate::ray::Ray;
use crate::intersect::Hit;
use crate::material::Material;

/// Answers shadow queries for light sources.
///
/// Lights don't know about the scene they light. Whatever can block light
/// (normally the `Scene`) is handed to them when shading.
pub trait Occluder {
    /// Whether anything is struck by `ray` before parameter `t_max`.
    fn is_occluded(&self, ray: &Ray, t_max: f64) -> bool;
}

/// Uniform light reaching every surface facing the viewer.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AmbientLight {
    pub intensity: Color,
}

impl AmbientLight {
    pub fn new(intensity: Color) -> AmbientLight {
        AmbientLight { intensity }
    }

    /// The ambient term for a hit seen along direction `view`.
    ///
    /// Surfaces seen from their back side receive no ambient light.
    pub fn color(&self, hit: &Hit, material: &Material, view: &Vector3D)
        -> Color {
        if view.dot(&hit.normal) > 0.0 {
            return Color::black();
        }

        material.ka * self.intensity
    }
}

/// A point light.
///
/// A very simple light source. Provides a color and a position where light is
/// produced from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Point,
}

impl PointLight {
    pub fn new(intensity: Color, position: Point) -> PointLight {
        PointLight { intensity, position }
    }

    /// Blinn-Phong diffuse and specular light for a hit seen along `view`.
    ///
    /// `view` is the direction of the incoming ray (from the eye toward the
    /// surface). No light is contributed if the viewer sees the back of the
    /// surface, if the light is behind the surface, or if `occluder` reports
    /// something between the hit point and the light.
    pub fn color(&self, occluder: &dyn Occluder, hit: &Hit,
        material: &Material, view: &Vector3D) -> Color {
        let normalv = hit.normal;
        if view.dot(&normalv) > 0.0 {
            return Color::black();
        }

        // Direction and distance from the hit point to the light
        let to_light = self.position - hit.point;
        let distance = to_light.magnitude();
        let lightv = to_light.normalized();

        let shadow_ray = Ray::new(hit.point, lightv);
        if occluder.is_occluded(&shadow_ray, distance) {
            return Color::black();
        }

        let light_dot_normal = lightv.dot(&normalv);
        if light_dot_normal <= 0.0 {
            return Color::black();
        }

        // Halfway vector between the light and the viewer
        let halfv = lightv - *view;
        let half_dot_normal = (halfv.dot(&normalv) / halfv.magnitude()).max(0.0);

        let diffuse = material.kd * self.intensity * light_dot_normal;
        let specular = material.ks * self.intensity
            * half_dot_normal.powi(material.shininess);

        diffuse + specular
    }
}

/// A light source in a scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    Ambient(AmbientLight),
    Point(PointLight),
}

impl Light {
    pub fn is_ambient(&self) -> bool {
        matches!(self, Light::Ambient(_))
    }

    pub fn intensity(&self) -> Color {
        match self {
            Light::Ambient(ref a) => a.intensity,
            Light::Point(ref p) => p.intensity,
        }
    }

    /// The contribution of this light to the local shading of a hit.
    pub fn color(&self, occluder: &dyn Occluder, hit: &Hit,
        material: &Material, view: &Vector3D) -> Color {
        match self {
            Light::Ambient(ref a) => a.color(hit, material, view),
            Light::Point(ref p) => p.color(occluder, hit, material, view),
        }
    }
}

impl From<AmbientLight> for Light {
    fn from(a: AmbientLight) -> Light {
        Light::Ambient(a)
    }
}

impl From<PointLight> for Light {
    fn from(p: PointLight) -> Light {
        Light::Point(p)
    }
}

/* Tests */

#[cfg(test)]
struct Unblocked;

#[cfg(test)]
impl Occluder for Unblocked {
    fn is_occluded(&self, _ray: &Ray, _t_max: f64) -> bool {
        false
    }
}

/// An occluder with a single blocker `at` units along every shadow ray.
#[cfg(test)]
struct Wall {
    at: f64,
}

#[cfg(test)]
impl Occluder for Wall {
    fn is_occluded(&self, _ray: &Ray, t_max: f64) -> bool {
        self.at < t_max
    }
}

#[cfg(test)]
fn facing_hit() -> (Hit, Vector3D) {
    let hit = Hit::new(Point::ORIGIN, Vector3D::new(0.0, 0.0, -1.0), 5.0);
    let view = Vector3D::new(0.0, 0.0, 1.0);
    (hit, view)
}

#[test]
fn eye_between_light_and_surface() {
    let m = Material::rough(Color::white(), 0.9, 0.9, 200);
    let (hit, view) = facing_hit();
    let light = PointLight::new(Color::white(), Point::new(0.0, 0.0, -10.0));

    let res = light.color(&Unblocked, &hit, &m, &view);
    assert_eq!(res, Color::gray(1.8));
}

#[test]
fn light_offset_45_degrees() {
    let m = Material::rough(Color::white(), 0.9, 0.9, 200);
    let (hit, view) = facing_hit();
    let light = PointLight::new(Color::white(), Point::new(0.0, 10.0, -10.0));

    let res = light.color(&Unblocked, &hit, &m, &view);
    let expected = 0.9 / 2f64.sqrt();
    assert!((res.r - expected).abs() < 1e-4);
    assert!((res.g - expected).abs() < 1e-4);
    assert!((res.b - expected).abs() < 1e-4);
}

#[test]
fn light_behind_surface() {
    let m = Material::rough(Color::white(), 0.9, 0.9, 200);
    let (hit, view) = facing_hit();
    let light = PointLight::new(Color::white(), Point::new(0.0, 0.0, 10.0));

    assert_eq!(light.color(&Unblocked, &hit, &m, &view), Color::black());
}

#[test]
fn viewer_behind_surface_sees_no_light() {
    let m = Material::rough(Color::white(), 0.9, 0.9, 200);
    let (hit, _) = facing_hit();
    let view = Vector3D::new(0.0, 0.0, -1.0);
    let light = PointLight::new(Color::white(), Point::new(0.0, 0.0, -10.0));
    let ambient = AmbientLight::new(Color::white());

    assert_eq!(light.color(&Unblocked, &hit, &m, &view), Color::black());
    assert_eq!(ambient.color(&hit, &m, &view), Color::black());
}

#[test]
fn occluder_between_light_and_point_blocks_light() {
    let m = Material::rough(Color::white(), 0.9, 0.9, 200);
    let (hit, view) = facing_hit();
    let light = PointLight::new(Color::white(), Point::new(0.0, 0.0, -10.0));

    assert_eq!(light.color(&Wall { at: 5.0 }, &hit, &m, &view), Color::black());
    assert_eq!(light.color(&Wall { at: 15.0 }, &hit, &m, &view),
        Color::gray(1.8));
}

#[test]
fn ambient_uses_ambient_coefficient() {
    let m = Material::rough(Color::rgb(1.0, 0.5, 0.0), 0.9, 0.9, 200);
    let (hit, view) = facing_hit();
    let ambient = AmbientLight::new(Color::gray(0.2));

    assert_eq!(ambient.color(&hit, &m, &view), Color::rgb(0.1, 0.05, 0.0));
}

#[test]
fn light_enum_dispatches() {
    let m = Material::rough(Color::white(), 0.9, 0.9, 200);
    let (hit, view) = facing_hit();
    let ambient: Light = AmbientLight::new(Color::gray(0.2)).into();
    let point: Light = PointLight::new(Color::white(),
        Point::new(0.0, 0.0, -10.0)).into();

    assert!(ambient.is_ambient());
    assert!(!point.is_ambient());
    assert_eq!(ambient.color(&Unblocked, &hit, &m, &view), Color::gray(0.1));
    assert_eq!(point.color(&Unblocked, &hit, &m, &view), Color::gray(1.8));
}
