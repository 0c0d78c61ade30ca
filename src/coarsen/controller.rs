//! Per-session driver of coarsening passes.
//!
//! One controller instance owns one coarsening session: it holds the level
//! hierarchy, reads the host model's point set, and runs strictly sequential
//! removal passes — each removal's effect on neighbor scores and connectivity
//! feeds the next pick, so removals are never batched.
//!
//! A pass is atomic: it works on clones of the coarsest graph and of the live
//! removal index and commits them only when every removal and cavity repair
//! succeeded. On error the hierarchy is exactly as it was before the pass.

use crate::coarsen::hierarchy::{Level, MultilevelHierarchy};
use crate::coarsen::retriangulate::RetriangulationEngine;
use crate::data::dual_index::DualPriorityIndex;
use crate::debug_invariants::DebugInvariants;
use crate::error::CoarsenError;
use crate::geometry::point_set::PointSet;
use crate::topology::graph::NeighborGraph;
use crate::topology::point::PointId;

/// Removal priority of `p`: the worst-case relative difference of the scalar
/// field against its current neighbors. Lower means more redundant. Isolated
/// points score 0.0.
pub fn removal_score(
    graph: &NeighborGraph,
    points: &PointSet,
    p: PointId,
) -> Result<f64, CoarsenError> {
    let mut worst = 0.0_f64;
    for q in graph.neighbors(p) {
        worst = worst.max(points.relative_field_difference(p, q)?);
    }
    Ok(worst)
}

fn build_removal_index(
    graph: &NeighborGraph,
    points: &PointSet,
) -> Result<DualPriorityIndex<PointId, f64>, CoarsenError> {
    let mut index = DualPriorityIndex::new();
    for raw in 0..points.len() as u32 {
        let p = PointId::new(raw);
        index.insert(p, removal_score(graph, points, p)?)?;
    }
    Ok(index)
}

/// Drives coarsening passes for one session over a fixed point set.
#[derive(Debug)]
pub struct CoarseningController<'a> {
    points: &'a PointSet,
    engine: RetriangulationEngine,
    hierarchy: MultilevelHierarchy,
}

impl<'a> CoarseningController<'a> {
    /// Starts a session from the host model's point set and its level-0
    /// neighbor graph (built by an external Voronoi/Delaunay stage).
    ///
    /// The base graph must be symmetric and may only reference points of
    /// `points`; every point receives an initial removal priority.
    pub fn new(points: &'a PointSet, base_graph: NeighborGraph) -> Result<Self, CoarsenError> {
        base_graph.validate_invariants()?;
        for p in base_graph.point_ids() {
            if !points.contains(p) {
                return Err(CoarsenError::UnknownPoint(p));
            }
        }
        let removal = build_removal_index(&base_graph, points)?;
        crate::debug_invariants!(removal.validate_invariants(), "initial removal index");
        let base = Level::new(base_graph, points.len());
        Ok(Self {
            points,
            engine: RetriangulationEngine::new(),
            hierarchy: MultilevelHierarchy::new(base, removal),
        })
    }

    /// Coarsens to `target_level`.
    ///
    /// Re-entering an already-materialized level is a cheap repoint of the
    /// active graph — no recomputation. Materializing a new level (exactly
    /// one past the deepest) removes `floor(fraction * point_count)` points
    /// one at a time, most redundant first, repairing each cavity and
    /// rescoring each touched neighbor before the next pick.
    pub fn coarsen(&mut self, fraction: f64, target_level: usize) -> Result<(), CoarsenError> {
        let max = self.hierarchy.max_level();
        if target_level <= max {
            log::debug!("re-entering materialized level {target_level}");
            return self.hierarchy.set_current(target_level);
        }
        if target_level != max + 1 {
            return Err(CoarsenError::LevelNotMaterialized {
                requested: target_level,
                max,
            });
        }
        if !(0.0..1.0).contains(&fraction) {
            return Err(CoarsenError::InvalidFraction(fraction));
        }

        let coarsest = self.hierarchy.coarsest();
        let live = coarsest.point_count();
        let quota = (fraction * live as f64).floor() as usize;
        // Independent working copies keep the pass atomic; on the very first
        // pass this also leaves level 0 and level 1 as separate snapshots of
        // the base adjacency.
        let mut graph = coarsest.graph().clone();
        let mut removal = self.hierarchy.removal_index().clone();
        log::debug!(
            "materializing level {target_level}: removing {quota} of {live} points ({} edges)",
            graph.edge_count()
        );

        let mut removed = 0usize;
        for _ in 0..quota {
            let Some((p, score)) = removal.pop_min() else {
                log::warn!("removal queue exhausted after {removed} of {quota} removals");
                break;
            };
            let mut cavity: Vec<PointId> = graph.neighbors(p).collect();
            cavity.sort_unstable();
            log::trace!(
                "removing point {p} (score {score:.3e}) with {} neighbors",
                cavity.len()
            );
            graph.remove_all_edges(p);
            self.engine.repair_cavity(&mut graph, self.points, p, &cavity)?;
            for &n in &cavity {
                removal.insert(n, removal_score(&graph, self.points, n)?)?;
            }
            removed += 1;
        }

        graph.debug_assert_invariants();
        removal.debug_assert_invariants();
        self.hierarchy
            .push_level(Level::new(graph, live - removed), removal);
        Ok(())
    }

    /// Hard reset back to the base grid: discards every level above 0 and
    /// rebuilds the removal priorities from the level-0 adjacency.
    pub fn reset_grid(&mut self) -> Result<(), CoarsenError> {
        let removal = build_removal_index(self.hierarchy.level(0)?.graph(), self.points)?;
        self.hierarchy.reset(removal);
        Ok(())
    }

    /// Repoints the active level at an already-materialized snapshot.
    pub fn goto_level(&mut self, level: usize) -> Result<(), CoarsenError> {
        self.hierarchy.set_current(level)
    }

    /// The level current queries are answered from.
    pub fn current_level(&self) -> usize {
        self.hierarchy.current_level()
    }

    /// The deepest materialized level.
    pub fn max_level(&self) -> usize {
        self.hierarchy.max_level()
    }

    /// The adjacency of the active level, for the solver to restrict its
    /// interpolation and solve operations to surviving points.
    pub fn active_graph(&self) -> &NeighborGraph {
        self.hierarchy.active().graph()
    }

    /// Live point count of the active level.
    pub fn point_count(&self) -> usize {
        self.hierarchy.active().point_count()
    }

    /// Adjacency snapshot of an arbitrary materialized level.
    pub fn graph_at(&self, level: usize) -> Result<&NeighborGraph, CoarsenError> {
        Ok(self.hierarchy.level(level)?.graph())
    }

    /// Read-only peek at the next point the removal queue would offer.
    pub fn next_removal_candidate(&self) -> Option<(PointId, f64)> {
        self.hierarchy.removal_index().peek_min()
    }

    /// The level hierarchy of this session.
    pub fn hierarchy(&self) -> &MultilevelHierarchy {
        &self.hierarchy
    }
}
