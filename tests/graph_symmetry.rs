//! Symmetry of the neighbor graph under randomized mutation, and the error
//! behavior of edge removal.

use mesh_coarsen::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn p(i: u32) -> PointId {
    PointId::new(i)
}

#[test]
fn random_mutations_preserve_symmetry() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut graph = NeighborGraph::new();
    let mut edges: Vec<(PointId, PointId)> = Vec::new();

    for _ in 0..500 {
        let a = p(rng.gen_range(0..40));
        let b = p(rng.gen_range(0..40));
        if a == b {
            continue;
        }
        match rng.gen_range(0..3u8) {
            0 | 1 => {
                if !graph.contains_edge(a, b) {
                    edges.push((a, b));
                }
                graph.add_edge(a, b);
            }
            _ => {
                if let Some(pos) = edges
                    .iter()
                    .position(|&(x, y)| (x, y) == (a, b) || (y, x) == (a, b))
                {
                    graph.remove_edge(a, b).unwrap();
                    edges.swap_remove(pos);
                } else {
                    assert!(graph.remove_edge(a, b).is_err());
                }
            }
        }
        graph.validate_invariants().unwrap();
    }
    assert_eq!(graph.edge_count(), edges.len());

    // Symmetry holds for every pair, both present and absent.
    for a in 0..40u32 {
        for b in 0..40u32 {
            assert_eq!(graph.contains_edge(p(a), p(b)), graph.contains_edge(p(b), p(a)));
        }
    }
}

#[test]
fn remove_all_edges_isolated_repeatedly_is_harmless() {
    let mut graph = NeighborGraph::from_edges([(p(0), p(1)), (p(0), p(2))]);
    assert_eq!(graph.remove_all_edges(p(0)), 2);
    assert_eq!(graph.remove_all_edges(p(0)), 0);
    graph.validate_invariants().unwrap();
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn degrees_match_neighbor_iteration() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut graph = NeighborGraph::new();
    for _ in 0..200 {
        let a = p(rng.gen_range(0..25));
        let b = p(rng.gen_range(0..25));
        if a != b {
            graph.add_edge(a, b);
        }
    }
    for id in graph.point_ids().collect::<Vec<_>>() {
        assert_eq!(graph.degree(id), graph.neighbors(id).count());
        assert_eq!(
            graph.neighbor_set(id).map(|s| s.len()).unwrap_or(0),
            graph.degree(id)
        );
    }
}
