pub mod consts;

pub mod tuple;
pub mod color;
pub mod ray;

pub mod intersect;
pub mod shape;
pub mod mesh;
pub mod obj;

pub mod material;
pub mod light;
pub mod camera;
pub mod scene;

pub mod canvas;
pub mod parallel;
pub mod config;
pub mod demo;

use consts::FEQ_EPSILON;

/// Compares two floats, tolerating differences below `FEQ_EPSILON`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
