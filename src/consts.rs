// Floating point comparisons
pub const FEQ_EPSILON: f64 = 1e-6;

// Ray parameters below this are treated as a re-hit of the origin surface
pub const RAY_OFFSET: f64 = 1e-4;

// Maximum recursion depth for reflected and refracted rays
pub const MAX_DEPTH: usize = 5;

// Refraction index of the medium surrounding every object
pub const AIR_RI: f64 = 1.0;

// Refraction index of ordinary glass
pub const GLASS_RI: f64 = 1.5;

// Fraction of the surface color reflected under ambient light
pub const AMBIENT_WEIGHT: f64 = 0.5;

// Runtime defaults
pub const CANVAS_WIDTH: usize = 640;
pub const CANVAS_HEIGHT: usize = 360;
pub const OUT_FILE: &str = "./out.ppm";
