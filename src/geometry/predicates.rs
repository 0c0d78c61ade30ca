//! Geometric legality predicates for candidate tetrahedra.
//!
//! Candidate reconnections are ranked by a power test: the ratio of the
//! lifted in-sphere determinant (tetrahedron vertices plus the removed
//! point) to the orientation determinant of the tetrahedron alone. The
//! ratio is invariant under vertex reordering and is positive exactly when
//! the removed point lies inside the candidate's circumsphere, so a larger
//! value means the candidate is more Delaunay-legal with respect to the
//! cavity it is meant to fill.
//!
//! Near-coplanar tetrahedra make the ratio undefined; those candidates are
//! reported as [`CoarsenError::DegenerateGeometry`] instead of propagating
//! NaN through the candidate queue.

use crate::error::CoarsenError;

/// Orientation determinants with absolute value at or below this are treated
/// as degenerate (near-coplanar vertices).
pub const ORIENTATION_EPS: f64 = 1e-12;

#[inline]
fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn norm2(v: [f64; 3]) -> f64 {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2]
}

#[inline]
fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Orientation determinant of a tetrahedron.
///
/// Equivalent to the 4×4 determinant over homogeneous coordinates; the sign
/// encodes the handedness of the vertex order, the magnitude is six times the
/// signed volume.
pub fn orientation(tet: &[[f64; 3]; 4]) -> f64 {
    det3([
        sub(tet[1], tet[0]),
        sub(tet[2], tet[0]),
        sub(tet[3], tet[0]),
    ])
}

/// Lifted in-sphere determinant of a tetrahedron and a query point.
///
/// This is the 5×5 determinant over rows (x, y, z, squared norm, 1) reduced
/// against the query point's column. Its sign depends on the tetrahedron's
/// orientation; use [`power_test`] for the orientation-independent ratio.
pub fn in_sphere(tet: &[[f64; 3]; 4], query: [f64; 3]) -> f64 {
    let row = |v: [f64; 3]| {
        let d = sub(v, query);
        [d[0], d[1], d[2], norm2(d)]
    };
    let m = [row(tet[0]), row(tet[1]), row(tet[2]), row(tet[3])];
    // Expand along the lifted column.
    let minor = |skip: usize| {
        let mut rows = [[0.0; 3]; 3];
        let mut k = 0;
        for (i, r) in m.iter().enumerate() {
            if i != skip {
                rows[k] = [r[0], r[1], r[2]];
                k += 1;
            }
        }
        det3(rows)
    };
    -m[0][3] * minor(0) + m[1][3] * minor(1) - m[2][3] * minor(2) + m[3][3] * minor(3)
}

/// Power test: legality score of a candidate tetrahedron with respect to the
/// position of the removed point whose cavity it would help fill.
///
/// Positive iff the removed point lies strictly inside the candidate's
/// circumsphere, regardless of vertex order. Fails with
/// [`CoarsenError::DegenerateGeometry`] when the orientation determinant is
/// within [`ORIENTATION_EPS`] of zero.
pub fn power_test(tet: &[[f64; 3]; 4], removed: [f64; 3]) -> Result<f64, CoarsenError> {
    let orient = orientation(tet);
    if orient.abs() <= ORIENTATION_EPS {
        return Err(CoarsenError::DegenerateGeometry { det: orient });
    }
    Ok(-in_sphere(tet, removed) / orient)
}
