//! # mesh-coarsen
//!
//! mesh-coarsen is an adaptive mesh coarsening engine for unstructured point
//! clouds. It produces a hierarchy of progressively simplified neighbor
//! graphs used to accelerate iterative transfer solvers via multigrid: points
//! whose scalar field is most redundant with their neighborhood are removed
//! greedily, the hole each removal leaves is repaired by a power-test-driven
//! retriangulation, and removal priorities are kept consistent as the mesh
//! mutates.
//!
//! The surrounding simulation owns the point positions and the scalar field
//! and hands them in read-only; this crate owns the per-level adjacency
//! snapshots and the priority bookkeeping. The solvers that consume the
//! hierarchy (and the Voronoi/Delaunay stage that builds level 0) live
//! outside.
//!
//! ## Determinism
//!
//! Coarsening is strictly sequential: each removal depends on the previous
//! one's effect on scores and connectivity. Priority ties resolve to the
//! smallest key, so a pass is reproducible for a given input and removal
//! target.
//!
//! ## Usage
//!
//! ```rust
//! use mesh_coarsen::prelude::*;
//!
//! # fn main() -> Result<(), CoarsenError> {
//! let points = PointSet::new(
//!     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!     vec![1.0, 1.0, 1.0],
//! )?;
//! let base = NeighborGraph::from_edges([
//!     (PointId::new(0), PointId::new(1)),
//!     (PointId::new(1), PointId::new(2)),
//! ]);
//! let mut controller = CoarseningController::new(&points, base)?;
//! controller.coarsen(0.0, 1)?;
//! assert_eq!(controller.point_count(), 3);
//! # Ok(())
//! # }
//! ```

pub mod coarsen;
pub mod data;
pub mod debug_invariants;
pub mod error;
pub mod geometry;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use error::CoarsenError;

/// A convenient prelude importing the most-used types and traits.
pub mod prelude {
    pub use crate::coarsen::controller::{removal_score, CoarseningController};
    pub use crate::coarsen::hierarchy::{Level, MultilevelHierarchy};
    pub use crate::coarsen::retriangulate::{
        CollisionPolicy, RepairStats, RetriangulationEngine,
    };
    pub use crate::data::dual_index::DualPriorityIndex;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::error::CoarsenError;
    pub use crate::geometry::point_set::PointSet;
    pub use crate::geometry::predicates::{orientation, power_test};
    pub use crate::topology::graph::{GraphStats, NeighborGraph};
    pub use crate::topology::point::PointId;
}
