//! Cavity repair after a point removal.
//!
//! Removing a point leaves a hole in the neighbor graph bounded by the
//! removed point's former neighbors (the cavity rim). The engine restores a
//! conforming simplicial connectivity among the rim points: candidate
//! tetrahedra ("ears") are enumerated from the local facet structure, ranked
//! by the power test against the removed point's position, and consumed
//! best-first, each consumed ear adding one edge and seeding follow-up
//! candidates from its open faces.
//!
//! Two candidates competing for the same edge are a known race: the loser is
//! either discarded outright (same cavity facet) or force-promoted to maximum
//! priority so the queue keeps draining. That escalation is a best-effort
//! heuristic carried over deliberately, not a termination proof; see
//! [`CollisionPolicy`].

use crate::data::dual_index::DualPriorityIndex;
use crate::error::CoarsenError;
use crate::geometry::point_set::PointSet;
use crate::geometry::predicates::power_test;
use crate::topology::graph::NeighborGraph;
use crate::topology::point::PointId;
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use std::collections::BTreeSet;

/// A cavity with fewer rim points than this cannot host a tetrahedron and is
/// left untouched by the repair.
const MIN_CAVITY_FOR_TET: usize = 4;

/// Identity of a candidate reconnection: the edge it would add and the
/// mutually shared rim pair supporting it. Both pairs are kept sorted so the
/// key is order-independent.
///
/// Two candidates over the same four points but different defining edges are
/// distinct (a quadrilateral rim needs both diagonals offered separately).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EarKey {
    /// The edge this candidate would add, sorted.
    pub edge: [PointId; 2],
    /// The supporting pair completing the tetrahedron, sorted.
    pub rim: [PointId; 2],
}

impl EarKey {
    fn new(edge: (PointId, PointId), rim: (PointId, PointId)) -> Self {
        let sort2 = |a: PointId, b: PointId| if a <= b { [a, b] } else { [b, a] };
        EarKey {
            edge: sort2(edge.0, edge.1),
            rim: sort2(rim.0, rim.1),
        }
    }

    /// The four points of the candidate tetrahedron.
    pub fn points(&self) -> [PointId; 4] {
        [self.edge[0], self.edge[1], self.rim[0], self.rim[1]]
    }

    /// Number of distinct points in the union of two candidates.
    fn shared_point_total(&self, other: &EarKey) -> usize {
        let union: BTreeSet<PointId> = self
            .points()
            .into_iter()
            .chain(other.points())
            .collect();
        union.len()
    }
}

/// How the engine resolves two queued candidates targeting the same edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Force the colliding candidate to maximum priority so it is consumed
    /// (and found redundant) immediately instead of lingering with a stale
    /// score. Best-effort forward-progress workaround.
    #[default]
    EscalateToMax,
}

/// Counters describing one cavity repair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RepairStats {
    /// Edges added to close the cavity.
    pub edges_added: usize,
    /// Candidates successfully scored and enqueued.
    pub candidates_scored: usize,
    /// Candidates rejected by the degeneracy guard of the power test.
    pub degenerate_skipped: usize,
}

/// Repairs the hole left by a removed point using the power test.
#[derive(Copy, Clone, Debug, Default)]
pub struct RetriangulationEngine {
    /// Resolution policy for same-edge candidate collisions.
    pub policy: CollisionPolicy,
}

impl RetriangulationEngine {
    /// Creates an engine with the default collision policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores local connectivity among `cavity` (the removed point's former
    /// neighbors) after the caller has severed every edge incident to
    /// `removed`.
    ///
    /// Individual degenerate candidates are skipped; the repair fails with
    /// [`CoarsenError::UnresolvedCavity`] only when the candidate queue
    /// drains while a ≥4-point cavity is still under-connected.
    pub fn repair_cavity(
        &self,
        graph: &mut NeighborGraph,
        points: &PointSet,
        removed: PointId,
        cavity: &[PointId],
    ) -> Result<RepairStats, CoarsenError> {
        let mut stats = RepairStats::default();
        if cavity.len() < MIN_CAVITY_FOR_TET {
            return Ok(stats);
        }

        let mut rim: Vec<PointId> = cavity.to_vec();
        rim.sort_unstable();
        let rim_set: HashSet<PointId> = rim.iter().copied().collect();
        let removed_pos = points.position(removed)?;

        // Local facet structure: neighbors of each rim point that are rim
        // points themselves.
        let relevant: HashMap<PointId, HashSet<PointId>> = rim
            .iter()
            .map(|&n| (n, graph.neighbors(n).filter(|q| rim_set.contains(q)).collect()))
            .collect();

        let mut queue: DualPriorityIndex<EarKey, f64> = DualPriorityIndex::new();

        let enqueue = |queue: &mut DualPriorityIndex<EarKey, f64>,
                       stats: &mut RepairStats,
                       key: EarKey|
         -> Result<(), CoarsenError> {
            if queue.contains_key(&key) {
                return Ok(());
            }
            let [a, b] = key.edge;
            let [c, d] = key.rim;
            let tet = [
                points.position(a)?,
                points.position(b)?,
                points.position(c)?,
                points.position(d)?,
            ];
            match power_test(&tet, removed_pos) {
                Ok(score) => {
                    queue.insert(key, score)?;
                    stats.candidates_scored += 1;
                    Ok(())
                }
                Err(CoarsenError::DegenerateGeometry { det }) => {
                    log::debug!(
                        "skipping degenerate candidate {key:?} around removed point {removed} (det {det:e})"
                    );
                    stats.degenerate_skipped += 1;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        // Every non-adjacent rim pair, supported by any two points both rim
        // points already connect to, is a candidate tetrahedron.
        for (i, j) in rim.iter().copied().tuple_combinations() {
            if graph.contains_edge(i, j) {
                continue;
            }
            let common: Vec<PointId> = relevant[&i]
                .intersection(&relevant[&j])
                .copied()
                .sorted_unstable()
                .collect();
            for (k, l) in common.into_iter().tuple_combinations() {
                enqueue(&mut queue, &mut stats, EarKey::new((i, j), (k, l)))?;
            }
        }

        while let Some((key, score)) = queue.pop_max() {
            let [i, j] = key.edge;
            if graph.contains_edge(i, j) {
                // Edge resolved by an earlier candidate (possibly an
                // escalated collision); consume without effect.
                continue;
            }
            graph.add_edge(i, j);
            stats.edges_added += 1;
            log::trace!("cavity of {removed}: added edge ({i}, {j}) with power score {score}");

            // Remaining candidates over the same edge: a candidate on the
            // same cavity facet (5 distinct points total) is redundant;
            // anything else is escalated per policy.
            let colliding: Vec<EarKey> = queue
                .iter()
                .map(|(k, _)| k)
                .filter(|c| c.edge == key.edge)
                .collect();
            for c in colliding {
                if key.shared_point_total(&c) == 5 {
                    queue.remove(&c);
                } else {
                    match self.policy {
                        CollisionPolicy::EscalateToMax => {
                            log::warn!(
                                "collision-priority escalation of {c:?} after edge ({i}, {j}) was added"
                            );
                            queue.insert(c, f64::INFINITY)?;
                        }
                    }
                }
            }

            // Seed follow-up candidates from the two faces of the added
            // tetrahedron that do not contain the new edge: a rim point
            // adjacent to exactly two vertices of such a face pairs with the
            // third to form a new ear.
            let [k, l] = key.rim;
            for face in [[i, k, l], [j, k, l]] {
                for &m in &rim {
                    if key.points().contains(&m) {
                        continue;
                    }
                    let attached: Vec<bool> =
                        face.iter().map(|&v| graph.contains_edge(m, v)).collect();
                    if attached.iter().filter(|&&a| a).count() != 2 {
                        continue;
                    }
                    let far = face[attached.iter().position(|&a| !a).unwrap_or(0)];
                    let support: Vec<PointId> = face
                        .iter()
                        .copied()
                        .filter(|&v| v != far)
                        .collect();
                    enqueue(
                        &mut queue,
                        &mut stats,
                        EarKey::new((far, m), (support[0], support[1])),
                    )?;
                }
            }
        }

        // A closed cavity leaves every rim point on at least one tetrahedral
        // facet, i.e. with three or more in-cavity neighbors.
        let open = rim
            .iter()
            .filter(|&&n| graph.neighbors(n).filter(|q| rim_set.contains(q)).count() < 3)
            .count();
        if open > 0 {
            return Err(CoarsenError::UnresolvedCavity { removed, open });
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: u32) -> PointId {
        PointId::new(i)
    }

    #[test]
    fn ear_key_is_order_independent() {
        let a = EarKey::new((p(3), p(1)), (p(9), p(4)));
        let b = EarKey::new((p(1), p(3)), (p(4), p(9)));
        assert_eq!(a, b);
        assert_eq!(a.points(), [p(1), p(3), p(4), p(9)]);
    }

    #[test]
    fn shared_point_total_counts_the_union() {
        let a = EarKey::new((p(1), p(2)), (p(3), p(4)));
        let same_facet = EarKey::new((p(1), p(2)), (p(3), p(5)));
        let disjoint_rim = EarKey::new((p(1), p(2)), (p(5), p(6)));
        assert_eq!(a.shared_point_total(&same_facet), 5);
        assert_eq!(a.shared_point_total(&disjoint_rim), 6);
    }

    #[test]
    fn tiny_cavity_is_left_untouched() {
        let engine = RetriangulationEngine::new();
        let points = PointSet::new(vec![[0.0; 3]; 4], vec![1.0; 4]).unwrap();
        let mut graph = NeighborGraph::from_edges([(p(1), p(2)), (p(2), p(3))]);
        let before = graph.clone();
        let stats = engine
            .repair_cavity(&mut graph, &points, p(0), &[p(1), p(2), p(3)])
            .unwrap();
        assert_eq!(stats, RepairStats::default());
        assert_eq!(graph, before);
    }

    #[test]
    fn quadrilateral_rim_gains_both_diagonals() {
        // Removed point 0 at the origin; rim 1..=4 a near-square ring, bent
        // out of plane so candidate tetrahedra are non-degenerate.
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.1],
            [0.0, 1.0, -0.1],
            [-1.0, 0.0, 0.1],
            [0.0, -1.0, -0.1],
        ];
        let points = PointSet::new(positions, vec![1.0; 5]).unwrap();
        let ring = [(p(1), p(2)), (p(2), p(3)), (p(3), p(4)), (p(4), p(1))];
        let mut graph = NeighborGraph::from_edges(ring);
        for i in 1..=4 {
            graph.add_edge(p(0), p(i));
        }
        graph.remove_all_edges(p(0));

        let engine = RetriangulationEngine::new();
        let stats = engine
            .repair_cavity(&mut graph, &points, p(0), &[p(1), p(2), p(3), p(4)])
            .unwrap();

        assert_eq!(stats.edges_added, 2);
        assert!(graph.contains_edge(p(1), p(3)));
        assert!(graph.contains_edge(p(2), p(4)));
        assert_eq!(graph.degree(p(0)), 0);
    }

    #[test]
    fn coplanar_rim_reports_unresolved_cavity() {
        // A perfectly flat quadrilateral rim: every candidate is degenerate,
        // so the queue drains without closing the cavity.
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
        ];
        let points = PointSet::new(positions, vec![1.0; 5]).unwrap();
        let ring = [(p(1), p(2)), (p(2), p(3)), (p(3), p(4)), (p(4), p(1))];
        let mut graph = NeighborGraph::from_edges(ring);

        let engine = RetriangulationEngine::new();
        let err = engine
            .repair_cavity(&mut graph, &points, p(0), &[p(1), p(2), p(3), p(4)])
            .unwrap_err();
        assert!(matches!(err, CoarsenError::UnresolvedCavity { open: 4, .. }));
    }
}
