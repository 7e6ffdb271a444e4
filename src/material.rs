use crate::consts::{ AIR_RI, AMBIENT_WEIGHT };
use crate::color::Color;
use crate::shape::Shape;

/// How a surface continues a ray after local shading.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    /// Local (ambient, diffuse, specular) shading only.
    Rough,

    /// Local shading plus a Fresnel-weighted mirror reflection.
    Reflective,

    /// Reflection plus a transmitted ray weighted by the remaining energy.
    Refractive,
}

/// A material record.
///
/// Blinn-Phong coefficients are derived once, at construction, from the base
/// color:
///
/// * `ka = AMBIENT_WEIGHT * color`
/// * `kd = diffuse * color`
/// * `ks = specular * color`
///
/// The reflectance at normal incidence `f0` is blended toward the base color
/// by `metalness`, so fully metallic surfaces reflect in their own color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,

    /// Convergence of the specular highlight, typically 1 to 128.
    pub shininess: i32,
    pub metalness: f64,

    /// Fresnel reflectance at normal incidence.
    pub f0: Color,

    /// Index of refraction. Always `AIR_RI` unless refractive.
    pub refractive_index: f64,

    pub ka: Color,
    pub kd: Color,
    pub ks: Color,
}

impl Material {
    fn with_kind(kind: MaterialKind, color: Color, diffuse: f64,
        specular: f64, shininess: i32) -> Material {
        Material {
            kind,
            color,
            shininess,
            metalness: 0.0,
            f0: Color::black(),
            refractive_index: AIR_RI,
            ka: color * AMBIENT_WEIGHT,
            kd: color * diffuse,
            ks: color * specular,
        }
    }

    /// A surface with local shading only.
    pub fn rough(color: Color, diffuse: f64, specular: f64, shininess: i32)
        -> Material {
        Material::with_kind(MaterialKind::Rough, color, diffuse, specular,
            shininess)
    }

    /// A mirror-like surface with reflectance `f0` at normal incidence.
    pub fn reflective(color: Color, diffuse: f64, specular: f64,
        shininess: i32, metalness: f64, f0: Color) -> Material {
        Material {
            metalness,
            f0: Color::mix(&f0, &color, metalness),
            ..Material::with_kind(MaterialKind::Reflective, color, diffuse,
                specular, shininess)
        }
    }

    /// A transparent surface with index of refraction `n`.
    pub fn refractive(color: Color, diffuse: f64, specular: f64,
        shininess: i32, metalness: f64, f0: Color, n: f64) -> Material {
        Material {
            kind: MaterialKind::Refractive,
            refractive_index: n,
            ..Material::reflective(color, diffuse, specular, shininess,
                metalness, f0)
        }
    }

    pub fn is_rough(&self) -> bool {
        self.kind == MaterialKind::Rough
    }

    pub fn is_refractive(&self) -> bool {
        self.kind == MaterialKind::Refractive
    }
}

impl Default for Material {
    fn default() -> Material {
        Material::rough(Color::white(), 0.9, 0.9, 32)
    }
}

/// Placeholder for surface texturing. Textures are carried by a `Renderer`
/// but never sampled.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Texture;

/// The appearance of an object.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Renderer {
    pub material: Material,
    pub texture: Option<Texture>,
}

impl Renderer {
    pub fn new(material: Material) -> Renderer {
        Renderer { material, texture: None }
    }
}

/// A scene object: geometry plus appearance.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub shape: Shape,
    pub renderer: Renderer,
}

impl Object {
    pub fn new<S: Into<Shape>>(shape: S, material: Material) -> Object {
        Object { shape: shape.into(), renderer: Renderer::new(material) }
    }

    pub fn material(&self) -> &Material {
        &self.renderer.material
    }
}

#[test]
fn rough_material_coefficients() {
    let m = Material::rough(Color::rgb(0.2, 0.4, 0.8), 0.5, 0.25, 16);

    assert_eq!(m.kind, MaterialKind::Rough);
    assert_eq!(m.ka, Color::rgb(0.1, 0.2, 0.4));
    assert_eq!(m.kd, Color::rgb(0.1, 0.2, 0.4));
    assert_eq!(m.ks, Color::rgb(0.05, 0.1, 0.2));
    assert_eq!(m.refractive_index, AIR_RI);
    assert!(m.is_rough());
}

#[test]
fn metalness_blends_f0_toward_color() {
    let color = Color::rgb(1.0, 0.5, 0.0);
    let f0 = Color::gray(0.04);

    let dielectric = Material::reflective(color, 0.5, 0.5, 32, 0.0, f0);
    let metal = Material::reflective(color, 0.5, 0.5, 32, 1.0, f0);
    let half = Material::reflective(color, 0.5, 0.5, 32, 0.5, f0);

    assert_eq!(dielectric.f0, f0);
    assert_eq!(metal.f0, color);
    assert_eq!(half.f0, Color::rgb(0.52, 0.27, 0.02));
}

#[test]
fn refractive_material_keeps_index() {
    let m = Material::refractive(Color::white(), 0.3, 0.8, 128, 0.0,
        Color::gray(0.02), crate::consts::GLASS_RI);

    assert!(m.is_refractive());
    assert!(!m.is_rough());
    assert_eq!(m.refractive_index, 1.5);
    assert_eq!(m.f0, Color::gray(0.02));
}
