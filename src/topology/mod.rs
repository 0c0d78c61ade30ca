//! Topology abstractions: point identities and per-level neighbor adjacency.

pub mod graph;
pub mod point;

pub use graph::{GraphStats, NeighborGraph};
pub use point::PointId;
