pub const EPSILON: f32 = 1e-5;
pub const MIN_POLYGON_VERTICES: usize = 3;
