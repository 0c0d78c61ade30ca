//! Geometry: the read-only point cloud and the legality predicates used to
//! rank candidate reconnections.

pub mod point_set;
pub mod predicates;

pub use point_set::PointSet;
pub use predicates::{in_sphere, orientation, power_test, ORIENTATION_EPS};
