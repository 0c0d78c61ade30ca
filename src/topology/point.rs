//! `PointId`: a strong, zero-cost handle for points of the cloud.
//!
//! Every point of the host model's cloud is identified by a dense integer id
//! that doubles as the offset into the position and scalar-field arrays of
//! [`PointSet`](crate::geometry::point_set::PointSet). Ids are assigned once
//! by the host model and never re-issued; coarsening only ever removes them.
//!
//! The newtype is `repr(transparent)` over `u32`, so it has the same layout
//! and ABI as the raw index and can live in dense arrays without overhead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one point of the cloud; also its offset into the point set.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PointId(u32);

impl PointId {
    /// Creates a `PointId` from a raw dense index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        PointId(raw)
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the id as an array offset.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for PointId {
    #[inline]
    fn from(raw: u32) -> Self {
        PointId(raw)
    }
}

impl fmt::Debug for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointId").field(&self.0).finish()
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_get_index() {
        let p = PointId::new(42);
        assert_eq!(p.get(), 42);
        assert_eq!(p.index(), 42);
        assert_eq!(PointId::from(7u32), PointId::new(7));
    }

    #[test]
    fn debug_and_display() {
        let p = PointId::new(7);
        assert_eq!(format!("{:?}", p), "PointId(7)");
        assert_eq!(format!("{}", p), "7");
    }

    #[test]
    fn ordering_and_hash() {
        let a = PointId::new(1);
        let b = PointId::new(2);
        assert!(a < b);
        let mut set = std::collections::HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 2);
    }
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let p = PointId::new(123);
        let s = serde_json::to_string(&p).unwrap();
        let q: PointId = serde_json::from_str(&s).unwrap();
        assert_eq!(q, p);
    }
}
