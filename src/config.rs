use std::fs;
use std::io;
use std::path::{ Path, PathBuf };

use log::{ debug, info };
use serde::{ Serialize, Deserialize };
use thiserror::Error;

use crate::consts::MAX_DEPTH;
use crate::color::Color;
use crate::tuple::{ Point, Vector3D };
use crate::camera::{ Camera, CameraError };
use crate::shape::Shape;
use crate::mesh::{ Face, Model };
use crate::material::{ Material, Object };
use crate::light::{ AmbientLight, PointLight };
use crate::scene::Scene;

/// Errors raised while loading a scene description.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scene file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid camera: {0}")]
    Camera(#[from] CameraError),

    #[error("polygon {index} has {count} vertices, at least three are needed")]
    Face { index: usize, count: usize },

    #[error("image size must be positive, got {width}x{height}")]
    ImageSize { width: usize, height: usize },

    #[error("field of view must lie strictly between 0 and 180 degrees, got {fovy}")]
    Fovy { fovy: f64 },

    #[error("object {index} has negative shininess {shininess}")]
    Shininess { index: usize, shininess: i32 },
}

/// A scene description, as read from a JSON scene file.
///
/// A minimal file looks like the following:
///
/// ```json
/// {
///   "width": 320,
///   "height": 240,
///   "background": [0.3, 0.3, 0.3],
///   "ambient": [0.1, 0.1, 0.1],
///   "camera": { "eye": [8, 0, 2], "center": [0, 0, 1], "up": [0, 0, 1],
///               "fovy": 60 },
///   "lights": [ { "position": [0, 0, 5], "intensity": [0.4, 0.4, 0.4] } ],
///   "objects": [
///     { "shape": { "type": "sphere", "center": [0, 0, 1], "radius": 1 },
///       "material": { "type": "rough", "color": [0, 1, 0], "diffuse": 0.8,
///                     "specular": 0.2, "shininess": 32 } }
///   ]
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneJson {
    pub width: usize,
    pub height: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub background: Color,

    #[serde(default)]
    pub ambient: Color,

    pub camera: CameraJson,

    #[serde(default)]
    pub lights: Vec<LightJson>,

    #[serde(default)]
    pub objects: Vec<ObjectJson>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraJson {
    pub eye: Point,
    pub center: Point,
    pub up: Vector3D,

    /// Vertical field of view, in degrees.
    pub fovy: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LightJson {
    pub position: Point,
    pub intensity: Color,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectJson {
    pub shape: ShapeJson,
    pub material: MaterialJson,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeJson {
    Sphere {
        center: Point,
        radius: f64,
    },

    Plane {
        corner: Point,
        right: Vector3D,
        up: Vector3D,
    },

    /// A mesh read from an OBJ file. Relative paths are resolved against
    /// the directory of the scene file.
    Model {
        path: PathBuf,

        #[serde(default)]
        offset: Vector3D,

        #[serde(default = "default_scale")]
        scale: f64,
    },

    /// A mesh given inline, one vertex list per face.
    Polygons {
        faces: Vec<Vec<Point>>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialJson {
    Rough {
        color: Color,
        diffuse: f64,
        specular: f64,
        shininess: i32,
    },

    Reflective {
        color: Color,
        diffuse: f64,
        specular: f64,
        shininess: i32,

        #[serde(default)]
        metalness: f64,
        f0: Color,
    },

    Refractive {
        color: Color,
        diffuse: f64,
        specular: f64,
        shininess: i32,

        #[serde(default)]
        metalness: f64,
        f0: Color,
        refractive_index: f64,
    },
}

fn default_max_depth() -> usize {
    MAX_DEPTH
}

fn default_scale() -> f64 {
    1.0
}

impl MaterialJson {
    fn shininess(&self) -> i32 {
        match *self {
            MaterialJson::Rough { shininess, .. }
            | MaterialJson::Reflective { shininess, .. }
            | MaterialJson::Refractive { shininess, .. } => shininess,
        }
    }
}

impl From<MaterialJson> for Material {
    fn from(material_json: MaterialJson) -> Material {
        match material_json {
            MaterialJson::Rough { color, diffuse, specular, shininess } =>
                Material::rough(color, diffuse, specular, shininess),

            MaterialJson::Reflective {
                color, diffuse, specular, shininess, metalness, f0
            } => Material::reflective(color, diffuse, specular, shininess,
                metalness, f0),

            MaterialJson::Refractive {
                color, diffuse, specular, shininess, metalness, f0,
                refractive_index
            } => Material::refractive(color, diffuse, specular, shininess,
                metalness, f0, refractive_index),
        }
    }
}

impl ShapeJson {
    fn into_shape(self, base_dir: &Path) -> Result<Shape, ConfigError> {
        let shape = match self {
            ShapeJson::Sphere { center, radius } => Shape::sphere(center, radius),
            ShapeJson::Plane { corner, right, up } => Shape::plane(corner, right, up),
            ShapeJson::Model { path, offset, scale } => {
                let path = base_dir.join(path);
                Shape::model(Model::load(path, offset, scale))
            },
            ShapeJson::Polygons { faces } => {
                let mut polygons = Vec::with_capacity(faces.len());
                for (index, vertices) in faces.into_iter().enumerate() {
                    if vertices.len() < 3 {
                        return Err(ConfigError::Face {
                            index,
                            count: vertices.len(),
                        });
                    }

                    polygons.push(Face::new(vertices));
                }

                Shape::model(Model::new(polygons))
            },
        };

        Ok(shape)
    }
}

/// A scene ready to render, together with the image size it asks for.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub width: usize,
    pub height: usize,
    pub scene: Scene,
}

impl SceneJson {
    /// Builds the scene this description specifies.
    ///
    /// Model paths are resolved against `base_dir`.
    pub fn into_config(self, base_dir: &Path) -> Result<SceneConfig, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ImageSize {
                width: self.width,
                height: self.height,
            });
        }

        // Also rejects NaN
        if !(self.camera.fovy > 0.0 && self.camera.fovy < 180.0) {
            return Err(ConfigError::Fovy { fovy: self.camera.fovy });
        }

        let camera = Camera::try_new(self.camera.eye, self.camera.center,
            self.camera.up, self.camera.fovy)?;

        let mut scene = Scene::new();
        scene.set_camera(camera);
        scene.set_background(self.background);
        scene.set_ambient_light(AmbientLight::new(self.ambient));
        scene.set_max_depth(self.max_depth);

        for light in self.lights {
            scene.add_light(PointLight::new(light.intensity, light.position));
        }

        for (index, object) in self.objects.into_iter().enumerate() {
            let shininess = object.material.shininess();
            if shininess < 0 {
                return Err(ConfigError::Shininess { index, shininess });
            }

            let shape = object.shape.into_shape(base_dir)?;
            scene.add_object(Object::new(shape, object.material.into()));
        }

        debug!("Built scene with {} objects and {} lights.",
            scene.objects().count(), scene.lights().count());

        Ok(SceneConfig { width: self.width, height: self.height, scene })
    }
}

/// Parses a JSON scene description. Model paths are resolved against
/// `base_dir`.
pub fn parse_scene(json: &str, base_dir: &Path)
    -> Result<SceneConfig, ConfigError> {
    let scene_json: SceneJson = serde_json::from_str(json)?;
    scene_json.into_config(base_dir)
}

/// Reads a JSON scene file.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SceneConfig, ConfigError> {
    let path = path.as_ref();
    info!("Loading scene from {}", path.display());

    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_scene(&json, base_dir)
}

#[test]
fn parse_minimal_scene() {
    let json = r#"{
        "width": 4,
        "height": 3,
        "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "up": [0, 1, 0],
                    "fovy": 60 }
    }"#;

    let config = parse_scene(json, Path::new(".")).unwrap();

    assert_eq!(config.width, 4);
    assert_eq!(config.height, 3);
    assert_eq!(config.scene.max_depth(), MAX_DEPTH);
    assert_eq!(config.scene.background(), Color::black());
    assert_eq!(config.scene.objects().count(), 0);
}

#[test]
fn parse_shapes_and_materials() {
    let json = r#"{
        "width": 4,
        "height": 3,
        "max_depth": 2,
        "background": [0.3, 0.3, 0.3],
        "ambient": [0.1, 0.1, 0.1],
        "camera": { "eye": [8, 0, 2], "center": [0, 0, 1], "up": [0, 0, 1],
                    "fovy": 60 },
        "lights": [ { "position": [0, 0, 5], "intensity": [0.4, 0.4, 0.4] } ],
        "objects": [
            { "shape": { "type": "sphere", "center": [0, -2, 1], "radius": 1 },
              "material": { "type": "rough", "color": [0, 1, 0],
                            "diffuse": 0.8, "specular": 0.2, "shininess": 32 } },
            { "shape": { "type": "plane", "corner": [-10, -10, 0],
                         "right": [20, 0, 0], "up": [0, 20, 0] },
              "material": { "type": "reflective", "color": [1, 1, 1],
                            "diffuse": 0.7, "specular": 0.5, "shininess": 32,
                            "f0": [0.08, 0.08, 0.08] } },
            { "shape": { "type": "polygons",
                         "faces": [ [[0, 0, 0], [1, 0, 0], [0, 1, 0]] ] },
              "material": { "type": "refractive", "color": [1, 1, 1],
                            "diffuse": 0.35, "specular": 0.8,
                            "shininess": 128, "f0": [0.02, 0.02, 0.02],
                            "refractive_index": 1.5 } }
        ]
    }"#;

    let config = parse_scene(json, Path::new(".")).unwrap();
    let scene = &config.scene;
    let objects: Vec<&Object> = scene.objects().collect();

    assert_eq!(scene.max_depth(), 2);
    assert_eq!(scene.ambient_light().intensity, Color::gray(0.1));
    assert_eq!(scene.lights().count(), 1);
    assert_eq!(objects.len(), 3);

    assert_eq!(objects[0].shape,
        Shape::sphere(Point::new(0.0, -2.0, 1.0), 1.0));
    assert!(objects[0].material().is_rough());
    assert_eq!(objects[1].material().f0, Color::gray(0.08));
    assert!(objects[2].material().is_refractive());
    assert_eq!(objects[2].material().refractive_index, 1.5);

    match objects[2].shape {
        Shape::Model(ref m) => assert_eq!(m.faces.len(), 1),
        ref other => panic!("expected a model, got {:?}", other),
    }
}

#[test]
fn model_paths_are_relative_to_scene_file() {
    let json = r#"{
        "width": 4,
        "height": 3,
        "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "up": [0, 1, 0],
                    "fovy": 60 },
        "objects": [
            { "shape": { "type": "model", "path": "tetrahedron.obj",
                         "scale": 2 },
              "material": { "type": "rough", "color": [1, 1, 0],
                            "diffuse": 0.4, "specular": 0.9,
                            "shininess": 128 } }
        ]
    }"#;

    let config = parse_scene(json, Path::new("./models")).unwrap();
    let object = config.scene.objects().next().unwrap();

    match object.shape {
        Shape::Model(ref m) => {
            assert_eq!(m.faces.len(), 4);
            assert_eq!(m.faces[1].vertices()[2], Point::new(0.0, -1.0, 0.0));
        },
        ref other => panic!("expected a model, got {:?}", other),
    }
}

#[test]
fn collinear_camera_is_an_error() {
    let json = r#"{
        "width": 4,
        "height": 3,
        "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "up": [0, 0, 1],
                    "fovy": 60 }
    }"#;

    match parse_scene(json, Path::new(".")) {
        Err(ConfigError::Camera(_)) => (),
        other => panic!("expected camera error, got {:?}", other),
    }
}

#[test]
fn degenerate_polygon_is_an_error() {
    let json = r#"{
        "width": 4,
        "height": 3,
        "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "up": [0, 1, 0],
                    "fovy": 60 },
        "objects": [
            { "shape": { "type": "polygons", "faces": [ [[0, 0, 0], [1, 0, 0]] ] },
              "material": { "type": "rough", "color": [1, 1, 1],
                            "diffuse": 0.5, "specular": 0.5, "shininess": 8 } }
        ]
    }"#;

    match parse_scene(json, Path::new(".")) {
        Err(ConfigError::Face { index: 0, count: 2 }) => (),
        other => panic!("expected face error, got {:?}", other),
    }
}

#[test]
fn unknown_shape_is_an_error() {
    let json = r#"{
        "width": 4,
        "height": 3,
        "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "up": [0, 1, 0],
                    "fovy": 60 },
        "objects": [
            { "shape": { "type": "torus" },
              "material": { "type": "rough", "color": [1, 1, 1],
                            "diffuse": 0.5, "specular": 0.5, "shininess": 8 } }
        ]
    }"#;

    assert!(matches!(parse_scene(json, Path::new(".")),
        Err(ConfigError::Json(_))));
}

#[test]
fn zero_sized_image_is_an_error() {
    let json = r#"{
        "width": 0,
        "height": 3,
        "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "up": [0, 1, 0],
                    "fovy": 60 }
    }"#;

    assert!(matches!(parse_scene(json, Path::new(".")),
        Err(ConfigError::ImageSize { .. })));
}

#[test]
fn eye_at_center_is_an_error() {
    let json = r#"{
        "width": 4,
        "height": 3,
        "camera": { "eye": [1, 1, 1], "center": [1, 1, 1], "up": [0, 1, 0],
                    "fovy": 60 }
    }"#;

    assert!(matches!(parse_scene(json, Path::new(".")),
        Err(ConfigError::Camera(CameraError::Degenerate { .. }))));
}

#[test]
fn field_of_view_out_of_range_is_an_error() {
    for fovy in &["0", "180", "-10", "270"] {
        let json = format!(r#"{{
            "width": 4,
            "height": 3,
            "camera": {{ "eye": [0, 0, 5], "center": [0, 0, 0],
                        "up": [0, 1, 0], "fovy": {} }}
        }}"#, fovy);

        match parse_scene(&json, Path::new(".")) {
            Err(ConfigError::Fovy { .. }) => (),
            other => panic!("expected fovy error for {}, got {:?}", fovy, other),
        }
    }
}

#[test]
fn negative_shininess_is_an_error() {
    let json = r#"{
        "width": 4,
        "height": 3,
        "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "up": [0, 1, 0],
                    "fovy": 60 },
        "objects": [
            { "shape": { "type": "sphere", "center": [0, 0, 0], "radius": 1 },
              "material": { "type": "rough", "color": [1, 1, 1],
                            "diffuse": 0.5, "specular": 0.5, "shininess": 8 } },
            { "shape": { "type": "sphere", "center": [2, 0, 0], "radius": 1 },
              "material": { "type": "reflective", "color": [1, 1, 1],
                            "diffuse": 0.5, "specular": 0.5, "shininess": -4,
                            "f0": [0.5, 0.5, 0.5] } }
        ]
    }"#;

    match parse_scene(json, Path::new(".")) {
        Err(ConfigError::Shininess { index: 1, shininess: -4 }) => (),
        other => panic!("expected shininess error, got {:?}", other),
    }
}

#[test]
fn scene_fixture_loads() {
    let config = from_path("./scenes/demo.json").unwrap();

    assert!(config.width > 0 && config.height > 0);
    assert!(config.scene.objects().count() > 0);
    assert!(config.scene.lights().count() > 0);
}

#[test]
fn missing_scene_file_is_an_error() {
    assert!(matches!(from_path("./scenes/does-not-exist.json"),
        Err(ConfigError::Io { .. })));
}
