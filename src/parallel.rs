use std::time::Instant;

use log::{ debug, info };
use rayon::prelude::*;

use crate::scene::Scene;

/// Height, in pixel rows, of the bands handed to render threads.
pub const DEFAULT_BAND_ROWS: usize = 16;

/// Renders a scene on the current rayon pool.
///
/// Produces the same buffer as `Scene::render`.
pub fn render_parallel(scene: &Scene, pixels: &mut [u8], w: usize, h: usize) {
    render_bands(scene, pixels, w, h, DEFAULT_BAND_ROWS);
}

/// Renders a scene in bands of `band_rows` rows each.
///
/// Bands are disjoint slices of `pixels`, so threads never share a pixel.
/// The last band may be shorter than `band_rows`.
///
/// # Panics
///
/// Panics if `pixels` is not exactly `w * h * 3` bytes long, or if any of
/// `w`, `h` and `band_rows` is zero.
pub fn render_bands(scene: &Scene, pixels: &mut [u8], w: usize, h: usize,
    band_rows: usize) {
    assert!(w > 0 && h > 0, "Cannot render an empty image.");
    assert!(band_rows > 0, "Bands must hold at least one row.");
    assert_eq!(pixels.len(), w * h * 3,
        "Pixel buffer does not match a {}x{} image.", w, h);

    info!("Rendering {}x{} image in {}-row bands on {} threads...",
        w, h, band_rows, rayon::current_num_threads());
    let start = Instant::now();

    let row_len = w * 3;
    pixels.par_chunks_mut(band_rows * row_len)
        .enumerate()
        .for_each(|(i, band)| {
            let first_row = i * band_rows;
            scene.render_rows(band, w, h, first_row);

            debug!("Rendered rows {}..{}", first_row,
                first_row + band.len() / row_len);
        });

    info!("...done in {:.2?}.", start.elapsed());
}

#[cfg(test)]
fn small_scene() -> Scene {
    use crate::tuple::{ Point, Vector3D };
    use crate::color::Color;
    use crate::camera::Camera;
    use crate::shape::Shape;
    use crate::material::{ Material, Object };
    use crate::light::{ AmbientLight, PointLight };

    let mut scene = Scene::new();
    scene.set_background(Color::rgb(0.1, 0.1, 0.3));
    scene.set_ambient_light(AmbientLight::new(Color::gray(0.2)));
    scene.add_light(PointLight::new(Color::white(), Point::new(2.0, 5.0, 5.0)));

    scene.add_object(Object::new(Shape::sphere(Point::ORIGIN, 1.0),
        Material::rough(Color::rgb(1.0, 0.2, 0.2), 0.8, 0.5, 16)));
    scene.add_object(Object::new(
        Shape::plane(Point::new(-3.0, -1.0, 3.0), Vector3D::new(6.0, 0.0, 0.0),
            Vector3D::new(0.0, 0.0, -6.0)),
        Material::reflective(Color::gray(0.5), 0.5, 0.2, 8, 0.0,
            Color::gray(0.3))));

    scene.set_camera(Camera::new(Point::new(0.0, 1.0, 6.0), Point::ORIGIN,
        Vector3D::UP, 45.0));

    scene
}

#[test]
fn parallel_render_matches_sequential() {
    let scene = small_scene();
    let (w, h) = (13, 9);

    let mut sequential = vec![0; w * h * 3];
    scene.render(&mut sequential, w, h);

    let mut banded = vec![0; w * h * 3];
    render_bands(&scene, &mut banded, w, h, 2);
    assert_eq!(banded, sequential);

    let mut parallel = vec![0; w * h * 3];
    render_parallel(&scene, &mut parallel, w, h);
    assert_eq!(parallel, sequential);
}

#[test]
#[should_panic]
fn parallel_render_rejects_missized_buffer() {
    let scene = small_scene();
    let mut pixels = vec![0; 5];
    render_parallel(&scene, &mut pixels, 2, 2);
}
