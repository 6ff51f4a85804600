// Floating point comparisons and surface offsets
pub const FEQ_EPSILON: f64 = 0.00001;

// Maximum recursion depth for reflection and refraction rays
pub const RECURSION_DEPTH: usize = 4;

// Render threads used when the hardware concurrency can't be detected
pub const DEFAULT_THREADS: usize = 8;

// Minimum number of children before a group is split by `divide`
pub const DEFAULT_BVH_THRESHOLD: usize = 4;

// Common refraction indices
pub const VACUUM_RI: f64 = 1.0;
pub const AIR_RI: f64 = 1.00029;
pub const WATER_RI: f64 = 1.333;
pub const GLASS_RI: f64 = 1.52;
pub const DIAMOND_RI: f64 = 2.417;
