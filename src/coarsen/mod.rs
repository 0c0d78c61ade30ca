//! The coarsening engine: pass driver, cavity repair, and the level
//! hierarchy it produces.

pub mod controller;
pub mod hierarchy;
pub mod retriangulate;

pub use controller::{removal_score, CoarseningController};
pub use hierarchy::{Level, MultilevelHierarchy};
pub use retriangulate::{CollisionPolicy, EarKey, RepairStats, RetriangulationEngine};
