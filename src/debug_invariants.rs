//! Invariant validation for the mutable bookkeeping structures.
//!
//! The neighbor graph and the priority index each maintain two views that
//! must stay in lockstep (mirrored adjacency, forward/reverse score maps).
//! This trait gives both a uniform, non-panicking validation entry point;
//! the macro wires it into mutating code paths in debug builds or when the
//! `check-invariants` feature is enabled.

use crate::error::CoarsenError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation encountered.
    fn validate_invariants(&self) -> Result<(), CoarsenError>;

    /// Assert invariants in debug builds or when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] {e}");
        }
    }
}

/// Run a fallible check and panic on error when invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
