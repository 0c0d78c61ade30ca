//! Ordered level snapshots and the live removal index of one session.
//!
//! The hierarchy owns what used to be process-wide state in the original
//! model (current level, deepest materialized level, the priority maps):
//! everything is explicit instance state with a clear init/reset lifecycle.
//! Once a level is pushed, its snapshot is never written again; re-entering
//! it is a pointer move, not a recomputation.

use crate::data::dual_index::DualPriorityIndex;
use crate::error::CoarsenError;
use crate::topology::graph::NeighborGraph;
use crate::topology::point::PointId;

/// One coarsening level: an adjacency snapshot and its live point count.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    graph: NeighborGraph,
    point_count: usize,
}

impl Level {
    /// Creates a level from a graph snapshot and its live point count.
    pub fn new(graph: NeighborGraph, point_count: usize) -> Self {
        Self { graph, point_count }
    }

    /// The adjacency snapshot of this level.
    #[inline]
    pub fn graph(&self) -> &NeighborGraph {
        &self.graph
    }

    /// Number of live (non-removed) points at this level.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }
}

/// The ordered list of level snapshots plus the session's removal index.
#[derive(Clone, Debug)]
pub struct MultilevelHierarchy {
    levels: Vec<Level>,
    current: usize,
    removal: DualPriorityIndex<PointId, f64>,
}

impl MultilevelHierarchy {
    /// Creates a hierarchy holding the base level and its initial removal
    /// priorities.
    pub fn new(base: Level, removal: DualPriorityIndex<PointId, f64>) -> Self {
        Self {
            levels: vec![base],
            current: 0,
            removal,
        }
    }

    /// The deepest level materialized so far.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.levels.len() - 1
    }

    /// The level current queries are answered from.
    #[inline]
    pub fn current_level(&self) -> usize {
        self.current
    }

    /// Repoints the active level at an already-materialized snapshot.
    pub fn set_current(&mut self, level: usize) -> Result<(), CoarsenError> {
        if level > self.max_level() {
            return Err(CoarsenError::LevelNotMaterialized {
                requested: level,
                max: self.max_level(),
            });
        }
        self.current = level;
        Ok(())
    }

    /// The snapshot of `level`, if materialized.
    pub fn level(&self, level: usize) -> Result<&Level, CoarsenError> {
        self.levels
            .get(level)
            .ok_or(CoarsenError::LevelNotMaterialized {
                requested: level,
                max: self.max_level(),
            })
    }

    /// The currently active level.
    #[inline]
    pub fn active(&self) -> &Level {
        &self.levels[self.current]
    }

    /// The deepest materialized level (the one further coarsening starts
    /// from).
    #[inline]
    pub fn coarsest(&self) -> &Level {
        self.levels.last().expect("hierarchy always holds level 0")
    }

    /// Appends a finalized level, makes it current, and installs the removal
    /// index matching its live point set.
    pub fn push_level(&mut self, level: Level, removal: DualPriorityIndex<PointId, f64>) {
        self.levels.push(level);
        self.current = self.max_level();
        self.removal = removal;
    }

    /// Hard reset: discards every level above 0, restores the counters, and
    /// installs a freshly rebuilt removal index.
    pub fn reset(&mut self, removal: DualPriorityIndex<PointId, f64>) {
        self.levels.truncate(1);
        self.current = 0;
        self.removal = removal;
    }

    /// The removal priorities of the live point set at the deepest level.
    #[inline]
    pub fn removal_index(&self) -> &DualPriorityIndex<PointId, f64> {
        &self.removal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::point::PointId;

    fn base() -> MultilevelHierarchy {
        let graph = NeighborGraph::from_edges([(PointId::new(0), PointId::new(1))]);
        MultilevelHierarchy::new(Level::new(graph, 2), DualPriorityIndex::new())
    }

    #[test]
    fn navigation_is_bounded_by_materialized_levels() {
        let mut h = base();
        assert_eq!(h.max_level(), 0);
        assert!(matches!(
            h.set_current(1),
            Err(CoarsenError::LevelNotMaterialized { requested: 1, max: 0 })
        ));
        h.push_level(Level::new(NeighborGraph::new(), 1), DualPriorityIndex::new());
        assert_eq!(h.current_level(), 1);
        h.set_current(0).unwrap();
        assert_eq!(h.active().point_count(), 2);
    }

    #[test]
    fn reset_discards_everything_above_base() {
        let mut h = base();
        h.push_level(Level::new(NeighborGraph::new(), 1), DualPriorityIndex::new());
        h.reset(DualPriorityIndex::new());
        assert_eq!(h.max_level(), 0);
        assert_eq!(h.current_level(), 0);
        assert_eq!(h.active().point_count(), 2);
    }
}
