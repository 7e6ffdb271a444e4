use std::time::Instant;

use log::{ debug, info };

use crate::consts::MAX_DEPTH;
use crate::color::Color;
use crate::ray::Ray;
use crate::camera::Camera;
use crate::material::Object;
use crate::light::{ AmbientLight, Light, Occluder };
use crate::intersect::{ Intersection, IntersectionComputation };

/// A handle to an object added to a `Scene`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// A handle to a light added to a `Scene`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LightId(usize);

/// A scene with objects, lights and a camera.
///
/// The ambient light has its own slot; every other light is a point light.
/// A scene is built up front and then only read while rendering, so a single
/// `&Scene` can be shared by any number of render threads.
#[derive(Clone, Debug)]
pub struct Scene {
    objects: Vec<(ObjectId, Object)>,
    lights: Vec<(LightId, Light)>,
    ambient: AmbientLight,
    camera: Camera,
    background: Color,
    max_depth: usize,
    next_id: usize,
}

impl Default for Scene {
    fn default() -> Scene {
        Scene {
            objects: Vec::new(),
            lights: Vec::new(),
            ambient: AmbientLight::default(),
            camera: Camera::default(),
            background: Color::black(),
            max_depth: MAX_DEPTH,
            next_id: 0,
        }
    }
}

impl Scene {
    /// Creates an empty scene with a black background and no light.
    pub fn new() -> Scene {
        Default::default()
    }

    fn issue_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.issue_id());
        debug!("Adding object {:?}: {:?}", id, object.material().kind);
        self.objects.push((id, object));
        id
    }

    /// Removes an object, returning it if it was in the scene.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Object> {
        let index = self.objects.iter().position(|(oid, _)| *oid == id)?;
        Some(self.objects.remove(index).1)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.iter()
            .find(|(oid, _)| *oid == id)
            .map(|(_, object)| object)
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter().map(|(_, object)| object)
    }

    /// Adds a light source.
    ///
    /// # Panics
    ///
    /// Panics if `light` is an ambient light; use `set_ambient_light`.
    pub fn add_light<L: Into<Light>>(&mut self, light: L) -> LightId {
        let light = light.into();
        assert!(!light.is_ambient(),
            "Ambient light must be set with set_ambient_light.");

        let id = LightId(self.issue_id());
        debug!("Adding light {:?} with intensity {:?}", id, light.intensity());
        self.lights.push((id, light));
        id
    }

    pub fn remove_light(&mut self, id: LightId) -> Option<Light> {
        let index = self.lights.iter().position(|(lid, _)| *lid == id)?;
        Some(self.lights.remove(index).1)
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter().map(|(_, light)| light)
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_ambient_light(&mut self, ambient: AmbientLight) {
        self.ambient = ambient;
    }

    pub fn ambient_light(&self) -> &AmbientLight {
        &self.ambient
    }

    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Finds the nearest object struck by a ray.
    ///
    /// Objects are tested in insertion order; a later object only replaces
    /// the current hit if it is strictly nearer.
    pub fn get_intersection(&self, ray: &Ray) -> Option<Intersection> {
        let mut nearest: Option<Intersection> = None;

        for (_, object) in self.objects.iter() {
            let hit = match object.shape.intersect(ray) {
                Some(hit) => hit,
                None => continue,
            };

            let nearer = match nearest {
                Some(ref i) => hit.t < i.hit.t,
                None => true,
            };

            if nearer {
                nearest = Some(Intersection { hit, object });
            }
        }

        nearest
    }

    /// Traces a ray through the scene, returning the light it carries back.
    ///
    /// `depth` counts the bounces so far; past `max_depth` a ray carries
    /// nothing. Rays that miss every object carry the background color. The
    /// result is not clamped.
    pub fn ray_trace(&self, ray: &Ray, depth: usize) -> Color {
        if depth > self.max_depth {
            return Color::black();
        }

        let intersection = match self.get_intersection(ray) {
            Some(i) => i,
            None => return self.background,
        };

        let hit = &intersection.hit;
        let material = intersection.object.material();

        // Local illumination
        let mut color = self.ambient.color(hit, material, &ray.direction);
        for (_, light) in self.lights.iter() {
            color = color + light.color(self, hit, material, &ray.direction);
        }

        if material.is_rough() {
            return color;
        }

        let comps = IntersectionComputation::new(ray, hit);
        let fresnel = comps.schlick(material.f0);

        let reflect_ray = Ray::new(comps.point, comps.reflectv);
        color = color + fresnel * self.ray_trace(&reflect_ray, depth + 1);

        if material.is_refractive() {
            // Nothing is transmitted on total internal reflection
            if let Some(refractv) = comps.refracted(material.refractive_index) {
                let refract_ray = Ray::new(comps.point, refractv);
                color = color + (Color::white() - fresnel)
                    * self.ray_trace(&refract_ray, depth + 1);
            }
        }

        color
    }

    /// Renders the scene into a `w` by `h` RGB buffer.
    ///
    /// The buffer is row-major with three bytes per pixel, starting at the
    /// top-left corner of the image.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` is not exactly `w * h * 3` bytes long.
    pub fn render(&self, pixels: &mut [u8], w: usize, h: usize) {
        assert_eq!(pixels.len(), w * h * 3,
            "Pixel buffer does not match a {}x{} image.", w, h);
        if w == 0 || h == 0 {
            return;
        }

        info!("Rendering {}x{} image with {} objects and {} lights...",
            w, h, self.objects.len(), self.lights.len());
        let start = Instant::now();

        self.render_rows(pixels, w, h, 0);

        info!("...done in {:.2?}.", start.elapsed());
    }

    /// Renders a band of consecutive buffer rows, starting at `first_row`,
    /// into `band`.
    ///
    /// # Panics
    ///
    /// Panics if `band` does not hold whole rows or runs past the bottom of
    /// the image.
    pub fn render_rows(&self, band: &mut [u8], w: usize, h: usize,
        first_row: usize) {
        if w == 0 || h == 0 {
            assert!(band.is_empty(), "Band is not empty for an empty image.");
            return;
        }

        let row_len = w * 3;
        assert!(band.len() % row_len == 0,
            "Band does not hold whole rows of a {}-pixel wide image.", w);
        assert!(first_row + band.len() / row_len <= h,
            "Band runs past the bottom of a {}-pixel high image.", h);

        let mut camera = self.camera;
        camera.set_perspective(w, h);

        for (i, row) in band.chunks_mut(row_len).enumerate() {
            // Buffer rows run top to bottom; camera rows bottom to top.
            let y = h - 1 - (first_row + i);

            for x in 0..w {
                let ray = camera.get_ray(x, y, w, h);
                let color = self.ray_trace(&ray, 0);
                row[x * 3..x * 3 + 3].copy_from_slice(&color.to_rgb8());
            }
        }
    }
}

impl Occluder for Scene {
    fn is_occluded(&self, ray: &Ray, t_max: f64) -> bool {
        match self.get_intersection(ray) {
            Some(i) => i.hit.t < t_max,
            None => false,
        }
    }
}

/* Tests */

#[cfg(test)]
use crate::tuple::{ Point, Vector3D };

#[cfg(test)]
use crate::material::Material;

#[cfg(test)]
use crate::light::PointLight;

#[cfg(test)]
use crate::shape::Shape;

/// A unit sphere at the origin, lit from above and viewed from above.
#[cfg(test)]
fn lit_sphere_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_object(Object::new(Shape::sphere(Point::ORIGIN, 1.0),
        Material::rough(Color::white(), 0.9, 0.9, 32)));
    scene.add_light(PointLight::new(Color::white(), Point::new(0.0, 10.0, 0.0)));
    scene.set_camera(Camera::new(Point::new(0.0, 5.0, 0.0), Point::ORIGIN,
        Vector3D::FORWARD, 60.0));

    scene
}

#[test]
fn nearest_object_is_found() {
    let mut scene = Scene::new();
    let far = scene.add_object(Object::new(
        Shape::sphere(Point::new(0.0, 0.0, -10.0), 1.0), Material::default()));
    let near = scene.add_object(Object::new(
        Shape::sphere(Point::new(0.0, 0.0, -4.0), 1.0), Material::default()));

    let r = Ray::new(Point::ORIGIN, Vector3D::FORWARD);
    let i = scene.get_intersection(&r).unwrap();

    assert!((i.hit.t - 3.0).abs() < 1e-9);
    assert!(std::ptr::eq(i.object, scene.object(near).unwrap()));
    assert_ne!(far, near);
}

#[test]
fn empty_scene_has_no_intersection() {
    let scene = Scene::new();
    let r = Ray::new(Point::ORIGIN, Vector3D::FORWARD);

    assert!(scene.get_intersection(&r).is_none());
    assert!(!scene.is_occluded(&r, f64::INFINITY));
}

#[test]
fn removing_objects_and_lights() {
    let mut scene = lit_sphere_scene();
    let extra = scene.add_object(Object::new(
        Shape::sphere(Point::new(5.0, 0.0, 0.0), 1.0), Material::default()));
    let light = scene.add_light(PointLight::new(Color::white(), Point::ORIGIN));

    assert_eq!(scene.objects().count(), 2);
    assert_eq!(scene.lights().count(), 2);

    assert!(scene.remove_object(extra).is_some());
    assert!(scene.remove_object(extra).is_none());
    assert!(scene.remove_light(light).is_some());

    assert_eq!(scene.objects().count(), 1);
    assert_eq!(scene.lights().count(), 1);
}

#[test]
#[should_panic]
fn ambient_light_cannot_be_added_as_light() {
    let mut scene = Scene::new();
    scene.add_light(AmbientLight::new(Color::white()));
}

#[test]
fn occlusion_is_limited_to_t_max() {
    let scene = lit_sphere_scene();
    let r = Ray::new(Point::new(0.0, 0.0, 5.0), Vector3D::FORWARD);

    assert!(scene.is_occluded(&r, 10.0));
    assert!(!scene.is_occluded(&r, 3.0));
}

#[test]
fn occluder_shadows_point_light() {
    let mut scene = Scene::new();
    scene.add_object(Object::new(Shape::sphere(Point::ORIGIN, 1.0),
        Material::rough(Color::white(), 0.9, 0.9, 32)));
    scene.add_light(PointLight::new(Color::white(), Point::new(4.0, 5.0, 0.0)));

    let r = Ray::new(Point::new(0.0, 5.0, 0.0), Vector3D::DOWN);
    let lit = scene.ray_trace(&r, 0);
    assert!(lit.r > 0.1);

    let blocker = scene.add_object(Object::new(
        Shape::sphere(Point::new(2.0, 3.0, 0.0), 0.5), Material::default()));
    assert_eq!(scene.ray_trace(&r, 0), Color::black());

    scene.remove_object(blocker);
    assert_eq!(scene.ray_trace(&r, 0), lit);
}

#[test]
fn depth_limit_returns_black() {
    let mut scene = lit_sphere_scene();
    scene.set_background(Color::white());
    scene.set_ambient_light(AmbientLight::new(Color::white()));

    let hit = Ray::new(Point::new(0.0, 5.0, 0.0), Vector3D::DOWN);
    let miss = Ray::new(Point::new(0.0, 5.0, 0.0), Vector3D::UP);
    let past_limit = scene.max_depth() + 1;

    assert_eq!(scene.ray_trace(&hit, past_limit), Color::black());
    assert_eq!(scene.ray_trace(&miss, past_limit), Color::black());
    assert_eq!(scene.ray_trace(&miss, scene.max_depth()), Color::white());
}

#[test]
fn miss_returns_background() {
    let mut scene = lit_sphere_scene();
    scene.set_background(Color::rgb(0.1, 0.2, 0.3));
    let r = Ray::new(Point::new(0.0, 5.0, 0.0), Vector3D::RIGHT);

    assert_eq!(scene.ray_trace(&r, 0), Color::rgb(0.1, 0.2, 0.3));
}

#[test]
fn perfect_mirror_reflects_background() {
    let mut scene = Scene::new();
    scene.set_background(Color::rgb(0.2, 0.4, 0.6));
    scene.add_object(Object::new(
        Shape::plane(Point::new(-1.0, -1.0, 0.0), Vector3D::new(2.0, 0.0, 0.0),
            Vector3D::new(0.0, 2.0, 0.0)),
        Material::reflective(Color::black(), 0.0, 0.0, 1, 0.0, Color::white())));

    let r = Ray::new(Point::new(0.0, 0.0, 5.0), Vector3D::FORWARD);
    assert_eq!(scene.ray_trace(&r, 0), Color::rgb(0.2, 0.4, 0.6));
}

#[test]
fn facing_mirrors_terminate() {
    let mut scene = Scene::new();
    let mirror = Material::reflective(Color::white(), 0.5, 0.5, 8, 1.0,
        Color::white());
    scene.set_ambient_light(AmbientLight::new(Color::gray(0.1)));
    scene.add_object(Object::new(
        Shape::plane(Point::new(-1.0, -1.0, -1.0), Vector3D::new(2.0, 0.0, 0.0),
            Vector3D::new(0.0, 2.0, 0.0)), mirror));
    scene.add_object(Object::new(
        Shape::plane(Point::new(-1.0, -1.0, 1.0), Vector3D::new(0.0, 2.0, 0.0),
            Vector3D::new(2.0, 0.0, 0.0)), mirror));

    let r = Ray::new(Point::ORIGIN, Vector3D::FORWARD);
    let c = scene.ray_trace(&r, 0);

    // One ambient term per bounce, depths 0 through 5
    assert_eq!(c, Color::gray(0.05 * 6.0));
}

#[test]
fn clear_sphere_at_normal_incidence_shows_background() {
    let mut scene = Scene::new();
    scene.set_background(Color::rgb(0.0, 0.5, 1.0));
    scene.add_object(Object::new(Shape::sphere(Point::ORIGIN, 1.0),
        Material::refractive(Color::black(), 0.0, 0.0, 1, 0.0, Color::black(),
            crate::consts::GLASS_RI)));

    let r = Ray::new(Point::new(0.0, 0.0, 5.0), Vector3D::FORWARD);
    assert_eq!(scene.ray_trace(&r, 0), Color::rgb(0.0, 0.5, 1.0));
}

#[test]
fn render_lit_sphere() {
    let scene = lit_sphere_scene();
    let mut pixels = vec![0; 11 * 11 * 3];
    scene.render(&mut pixels, 11, 11);

    // Center pixel faces the light; the corner sees empty space.
    let center = (5 * 11 + 5) * 3;
    assert_eq!(&pixels[center..center + 3], &[255, 255, 255]);
    assert_eq!(&pixels[0..3], &[0, 0, 0]);
}

#[test]
fn render_buffer_starts_at_top_row() {
    let mut scene = Scene::new();
    scene.set_ambient_light(AmbientLight::new(Color::white()));
    scene.add_object(Object::new(Shape::sphere(Point::new(0.0, 0.9, 0.0), 0.5),
        Material::rough(Color::white(), 0.9, 0.9, 32)));
    scene.set_camera(Camera::new(Point::new(0.0, 0.0, 5.0), Point::ORIGIN,
        Vector3D::UP, 30.0));

    let mut pixels = vec![0; 3 * 3 * 3];
    scene.render(&mut pixels, 3, 3);

    let top_middle = 3;
    let bottom_middle = 2 * 9 + 3;
    assert_ne!(&pixels[top_middle..top_middle + 3], &[0, 0, 0]);
    assert_eq!(&pixels[bottom_middle..bottom_middle + 3], &[0, 0, 0]);
}

#[test]
fn render_empty_image_is_a_no_op() {
    let scene = lit_sphere_scene();

    scene.render(&mut [], 0, 0);
    scene.render(&mut [], 0, 4);
    scene.render_rows(&mut [], 3, 0, 0);
}

#[test]
#[should_panic]
fn render_rejects_missized_buffer() {
    let scene = lit_sphere_scene();
    let mut pixels = vec![0; 10];
    scene.render(&mut pixels, 2, 2);
}
