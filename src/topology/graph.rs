//! Symmetric undirected adjacency for one coarsening level.
//!
//! A [`NeighborGraph`] maps each point id to the set of its current neighbors.
//! The structure is undirected: `b ∈ neighbors(a)` iff `a ∈ neighbors(b)`,
//! and never contains self-loops. Both directions of an edge are kept in
//! sync by every mutating operation, mirrored-map style, and a derived
//! statistics cache is invalidated on mutation.
//!
//! Each coarsening level owns one deep-copied snapshot of this structure;
//! removed points stay addressable but isolated (empty neighbor set).

use crate::debug_invariants::DebugInvariants;
use crate::error::CoarsenError;
use crate::topology::point::PointId;
use hashbrown::{HashMap, HashSet};
use once_cell::sync::OnceCell;

/// Derived per-graph statistics, cached until the next mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GraphStats {
    /// Number of undirected edges.
    pub edge_count: usize,
    /// Largest neighbor-set size over all points.
    pub max_degree: usize,
}

/// Undirected, symmetric neighbor adjacency with no self-loops.
#[derive(Clone, Debug, Default)]
pub struct NeighborGraph {
    adjacency: HashMap<PointId, HashSet<PointId>>,
    stats: OnceCell<GraphStats>,
}

impl NeighborGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from an iterator of undirected edges.
    ///
    /// # Example
    /// ```rust
    /// use mesh_coarsen::topology::graph::NeighborGraph;
    /// use mesh_coarsen::topology::point::PointId;
    /// let g = NeighborGraph::from_edges([(0, 1), (1, 2)].map(|(a, b)| {
    ///     (PointId::new(a), PointId::new(b))
    /// }));
    /// assert_eq!(g.edge_count(), 2);
    /// assert!(g.contains_edge(PointId::new(1), PointId::new(0)));
    /// ```
    pub fn from_edges<I: IntoIterator<Item = (PointId, PointId)>>(edges: I) -> Self {
        let mut graph = Self::default();
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Makes `p` addressable with an empty neighbor set if it is not yet.
    pub fn add_point(&mut self, p: PointId) {
        self.adjacency.entry(p).or_default();
    }

    /// Iterates over the current neighbors of `p` (empty if `p` is unknown).
    pub fn neighbors(&self, p: PointId) -> impl Iterator<Item = PointId> + '_ {
        self.adjacency.get(&p).into_iter().flatten().copied()
    }

    /// The neighbor set of `p`, if `p` is addressable.
    #[inline]
    pub fn neighbor_set(&self, p: PointId) -> Option<&HashSet<PointId>> {
        self.adjacency.get(&p)
    }

    /// Number of neighbors of `p`.
    #[inline]
    pub fn degree(&self, p: PointId) -> usize {
        self.adjacency.get(&p).map_or(0, HashSet::len)
    }

    /// Whether the undirected edge `(a, b)` is present.
    #[inline]
    pub fn contains_edge(&self, a: PointId, b: PointId) -> bool {
        self.adjacency.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Iterates over every addressable point id, removed-but-isolated included.
    pub fn point_ids(&self) -> impl Iterator<Item = PointId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of addressable points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Adds the undirected edge `(a, b)`.
    ///
    /// Idempotent: adding a present edge is a no-op. Self-loops are not
    /// representable; `a == b` is rejected in debug builds and ignored
    /// otherwise.
    pub fn add_edge(&mut self, a: PointId, b: PointId) {
        debug_assert_ne!(a, b, "self-loop on {a}");
        if a == b {
            return;
        }
        let fresh = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        if fresh {
            self.invalidate_stats();
        }
    }

    /// Removes the undirected edge `(a, b)`.
    ///
    /// Fails with [`CoarsenError::GraphInconsistency`] if the edge is absent
    /// in either direction; a one-sided hit additionally means the symmetry
    /// invariant was already broken.
    pub fn remove_edge(&mut self, a: PointId, b: PointId) -> Result<(), CoarsenError> {
        let fwd = self
            .adjacency
            .get_mut(&a)
            .is_some_and(|set| set.remove(&b));
        let rev = self
            .adjacency
            .get_mut(&b)
            .is_some_and(|set| set.remove(&a));
        match (fwd, rev) {
            (true, true) => {
                self.invalidate_stats();
                Ok(())
            }
            (false, false) => Err(CoarsenError::GraphInconsistency(format!(
                "no edge between {a} and {b}"
            ))),
            _ => Err(CoarsenError::GraphInconsistency(format!(
                "asymmetric adjacency between {a} and {b}"
            ))),
        }
    }

    /// Severs every edge incident to `p`, returning how many were removed.
    ///
    /// `p` stays addressable afterwards, with an empty neighbor set.
    pub fn remove_all_edges(&mut self, p: PointId) -> usize {
        let severed = std::mem::take(self.adjacency.entry(p).or_default());
        for n in &severed {
            if let Some(set) = self.adjacency.get_mut(n) {
                let present = set.remove(&p);
                debug_assert!(present, "asymmetric adjacency between {p} and {n}");
            }
        }
        if !severed.is_empty() {
            self.invalidate_stats();
        }
        severed.len()
    }

    /// Number of undirected edges (cached until the next mutation).
    pub fn edge_count(&self) -> usize {
        self.stats().edge_count
    }

    /// Derived statistics, recomputed lazily after mutations.
    pub fn stats(&self) -> GraphStats {
        *self.stats.get_or_init(|| {
            let half_edges: usize = self.adjacency.values().map(HashSet::len).sum();
            GraphStats {
                edge_count: half_edges / 2,
                max_degree: self.adjacency.values().map(HashSet::len).max().unwrap_or(0),
            }
        })
    }

    #[inline]
    fn invalidate_stats(&mut self) {
        self.stats.take();
    }
}

/// Equality on adjacency content only; cached statistics do not participate.
impl PartialEq for NeighborGraph {
    fn eq(&self, other: &Self) -> bool {
        self.adjacency == other.adjacency
    }
}

impl Eq for NeighborGraph {}

impl DebugInvariants for NeighborGraph {
    fn validate_invariants(&self) -> Result<(), CoarsenError> {
        for (&a, set) in &self.adjacency {
            for &b in set {
                if a == b {
                    return Err(CoarsenError::GraphInconsistency(format!(
                        "self-loop on {a}"
                    )));
                }
                let mirrored = self
                    .adjacency
                    .get(&b)
                    .is_some_and(|back| back.contains(&a));
                if !mirrored {
                    return Err(CoarsenError::GraphInconsistency(format!(
                        "asymmetric adjacency between {a} and {b}"
                    )));
                }
            }
        }
        Ok(())
    }
}
