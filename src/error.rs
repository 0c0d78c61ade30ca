//! CoarsenError: Unified error type for mesh-coarsen public APIs
//!
//! Every fallible operation in the crate reports through this enum so callers
//! get robust, non-panicking error handling with enough payload to diagnose
//! the failure (the offending point, determinant, or level).

use thiserror::Error;

use crate::topology::point::PointId;

/// Unified error type for mesh-coarsen operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoarsenError {
    /// The adjacency structure violated an invariant (asymmetric edge,
    /// self-loop, or a removal of an edge that is not there).
    #[error("graph inconsistency: {0}")]
    GraphInconsistency(String),
    /// A candidate tetrahedron was too flat to score: its orientation
    /// determinant is within tolerance of zero.
    #[error("degenerate tetrahedron: orientation determinant {det:e} is within tolerance of zero")]
    DegenerateGeometry { det: f64 },
    /// The forward and reverse views of a priority index disagree.
    #[error("priority index corruption: {0}")]
    PriorityIndexCorruption(String),
    /// Retriangulation drained its candidate queue while the cavity left by
    /// `removed` still had `open` under-connected rim points.
    #[error("cavity of removed point {removed} could not be closed: {open} rim point(s) under-connected")]
    UnresolvedCavity { removed: PointId, open: usize },
    /// Removal fraction outside `[0, 1)` (or NaN).
    #[error("removal fraction {0} is outside [0, 1)")]
    InvalidFraction(f64),
    /// Requested a hierarchy level that has not been materialized; only
    /// existing levels and `max + 1` are reachable.
    #[error("level {requested} is not materialized (coarsest existing level is {max})")]
    LevelNotMaterialized { requested: usize, max: usize },
    /// A point id with no entry in the host point set.
    #[error("unknown point {0}")]
    UnknownPoint(PointId),
    /// A NaN score was offered to a priority index.
    #[error("non-finite priority score {0}")]
    NonFiniteScore(f64),
    /// Positions and scalar field arrays differ in length.
    #[error("positions ({positions}) and field ({field}) arrays differ in length")]
    FieldLengthMismatch { positions: usize, field: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(raw: u32) -> PointId {
        PointId::new(raw)
    }

    #[test]
    fn messages_carry_the_payload() {
        let err = CoarsenError::UnresolvedCavity { removed: p(3), open: 2 };
        assert!(err.to_string().contains('3'));
        assert!(err.to_string().contains("2 rim point(s)"));

        let err = CoarsenError::LevelNotMaterialized { requested: 4, max: 1 };
        assert_eq!(
            err.to_string(),
            "level 4 is not materialized (coarsest existing level is 1)"
        );
    }

    #[test]
    fn errors_compare_by_value() {
        assert_eq!(
            CoarsenError::UnknownPoint(p(7)),
            CoarsenError::UnknownPoint(p(7))
        );
        assert_ne!(
            CoarsenError::InvalidFraction(1.0),
            CoarsenError::InvalidFraction(1.5)
        );
    }
}
