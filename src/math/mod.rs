pub mod curve_math;
pub mod fixed_point;
