use crate::consts::GLASS_RI;
use crate::color::Color;
use crate::tuple::{ Point, Vector3D };
use crate::camera::Camera;
use crate::shape::Shape;
use crate::mesh::{ Face, Model };
use crate::material::{ Material, Object };
use crate::light::{ AmbientLight, PointLight };
use crate::scene::Scene;

/// A small tetrahedron resting on the floor.
pub fn tetrahedron() -> Model {
    let p1 = Point::new(0.29, 0.0, 0.866);
    let p2 = Point::new(0.866, 0.0, 0.0);
    let p3 = Point::new(0.0, 0.5, 0.0);
    let p4 = Point::new(0.0, -0.5, 0.0);

    Model::new(vec![
        Face::new(vec![p1, p2, p3]),
        Face::new(vec![p1, p3, p4]),
        Face::new(vec![p1, p4, p2]),
        Face::new(vec![p2, p4, p3]),
    ])
}

/// The built-in scene rendered when no scene file is given.
///
/// Four spheres (matte, glossy, mirror and glass) and a tetrahedron stand on
/// a floor in the `z = 0` plane, behind a pane of glass. The camera looks
/// down the x axis with z up.
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();

    scene.set_ambient_light(AmbientLight::new(Color::gray(0.1)));
    scene.add_light(PointLight::new(Color::gray(0.4), Point::new(0.0, 0.0, 5.0)));
    scene.add_light(PointLight::new(Color::gray(0.9 * 0.4),
        Point::new(4.0, 4.0, 4.0)));
    scene.add_light(PointLight::new(Color::gray(0.9 * 0.4),
        Point::new(3.0, -3.0, 1.0)));

    scene.add_object(Object::new(Shape::sphere(Point::new(0.0, -2.0, 1.0), 1.0),
        Material::rough(Color::rgb(0.0, 1.0, 0.0), 0.8, 0.2, 32)));
    scene.add_object(Object::new(Shape::sphere(Point::new(-0.2, 1.5, 0.8), 0.8),
        Material::rough(Color::rgb(1.0, 0.0, 0.0), 0.3, 0.7, 128)));
    scene.add_object(Object::new(Shape::sphere(Point::new(-3.0, 0.0, 1.5), 1.5),
        Material::reflective(Color::gray(0.86), 0.4, 0.8, 128, 0.0,
            Color::gray(0.65))));
    scene.add_object(Object::new(Shape::sphere(Point::new(3.0, 0.0, 0.5), 0.5),
        Material::refractive(Color::white(), 0.35, 0.8, 128, 0.0,
            Color::gray(0.02), GLASS_RI)));

    // Floor
    scene.add_object(Object::new(
        Shape::plane(Point::new(-10.0, -10.0, 0.0), Vector3D::new(20.0, 0.0, 0.0),
            Vector3D::new(0.0, 20.0, 0.0)),
        Material::rough(Color::gray(0.8), 0.7, 0.5, 32)));

    // Glass pane
    scene.add_object(Object::new(
        Shape::plane(Point::new(5.0, 0.0, 0.0), Vector3D::new(0.0, 20.0, 0.0),
            Vector3D::new(0.0, 0.0, 20.0)),
        Material::refractive(Color::gray(0.8), 0.7, 0.5, 32, 0.0,
            Color::gray(0.08), GLASS_RI)));

    scene.add_object(Object::new(tetrahedron(),
        Material::reflective(Color::rgb(1.0, 1.0, 0.0), 0.4, 0.9, 128, 0.0,
            Color::rgb(0.85, 0.83, 0.79))));

    scene.set_camera(Camera::new(Point::new(8.0, 0.0, 2.0),
        Point::new(0.0, 0.0, 1.0), Vector3D::BACK, 60.0));
    scene.set_background(Color::gray(0.3));

    scene
}

#[test]
fn tetrahedron_faces_point_outward() {
    let model = tetrahedron();
    let inside = Point::new(0.25, 0.0, 0.2);

    for face in model.faces.iter() {
        let outward = face.vertices()[0] - inside;
        assert!(face.normal().dot(&outward) > 0.0);
    }
}

#[test]
fn demo_scene_renders() {
    let scene = demo_scene();
    let (w, h) = (16, 9);
    let mut pixels = vec![0; w * h * 3];

    scene.render(&mut pixels, w, h);

    // The floor fills the bottom of the frame and is lit.
    let bottom_middle = ((h - 1) * w + w / 2) * 3;
    assert!(pixels[bottom_middle..bottom_middle + 3].iter().any(|&b| b > 0));
}
