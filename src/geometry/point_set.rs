//! Read-only view of the host model's point cloud.
//!
//! The surrounding simulation owns the positions and the scalar field (an
//! abundance-like quantity) and hands them in once per coarsening session.
//! This crate only ever reads them; all mutable state lives in the per-level
//! neighbor graphs and the priority indices.

use crate::error::CoarsenError;
use crate::topology::point::PointId;

/// Immutable positions and scalar field, keyed by dense [`PointId`].
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    positions: Vec<[f64; 3]>,
    field: Vec<f64>,
}

impl PointSet {
    /// Creates a point set from parallel position and scalar-field arrays.
    ///
    /// Fails with [`CoarsenError::FieldLengthMismatch`] if the arrays differ
    /// in length.
    pub fn new(positions: Vec<[f64; 3]>, field: Vec<f64>) -> Result<Self, CoarsenError> {
        if positions.len() != field.len() {
            return Err(CoarsenError::FieldLengthMismatch {
                positions: positions.len(),
                field: field.len(),
            });
        }
        Ok(Self { positions, field })
    }

    /// Number of points in the base cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether `p` indexes into this cloud.
    #[inline]
    pub fn contains(&self, p: PointId) -> bool {
        p.index() < self.positions.len()
    }

    /// Position of `p`.
    pub fn position(&self, p: PointId) -> Result<[f64; 3], CoarsenError> {
        self.positions
            .get(p.index())
            .copied()
            .ok_or(CoarsenError::UnknownPoint(p))
    }

    /// Scalar-field value of `p`.
    pub fn field_value(&self, p: PointId) -> Result<f64, CoarsenError> {
        self.field
            .get(p.index())
            .copied()
            .ok_or(CoarsenError::UnknownPoint(p))
    }

    /// Relative difference of the scalar field between `p` and its neighbor
    /// `q`, normalized by the neighbor's value.
    ///
    /// A zero neighbor value with a non-zero difference yields `+inf`, so such
    /// points are never considered redundant.
    pub fn relative_field_difference(
        &self,
        p: PointId,
        q: PointId,
    ) -> Result<f64, CoarsenError> {
        let fp = self.field_value(p)?;
        let fq = self.field_value(q)?;
        let diff = (fp - fq).abs();
        if diff == 0.0 {
            Ok(0.0)
        } else if fq == 0.0 {
            Ok(f64::INFINITY)
        } else {
            Ok(diff / fq.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: u32) -> PointId {
        PointId::new(i)
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = PointSet::new(vec![[0.0; 3]; 3], vec![1.0; 2]).unwrap_err();
        assert_eq!(
            err,
            CoarsenError::FieldLengthMismatch { positions: 3, field: 2 }
        );
    }

    #[test]
    fn lookup_and_bounds() {
        let set = PointSet::new(vec![[1.0, 2.0, 3.0]], vec![0.5]).unwrap();
        assert_eq!(set.position(p(0)).unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(set.field_value(p(0)).unwrap(), 0.5);
        assert_eq!(set.position(p(1)), Err(CoarsenError::UnknownPoint(p(1))));
    }

    #[test]
    fn relative_difference_is_neighbor_normalized() {
        let set = PointSet::new(vec![[0.0; 3]; 3], vec![1.0, 1.01, 0.0]).unwrap();
        let d01 = set.relative_field_difference(p(0), p(1)).unwrap();
        let d10 = set.relative_field_difference(p(1), p(0)).unwrap();
        assert!((d01 - 0.01 / 1.01).abs() < 1e-15);
        assert!((d10 - 0.01).abs() < 1e-15);
        assert_eq!(set.relative_field_difference(p(0), p(2)).unwrap(), f64::INFINITY);
        assert_eq!(set.relative_field_difference(p(2), p(2)).unwrap(), 0.0);
    }
}
