//! Supporting data structures for the coarsening engine.

pub mod dual_index;

pub use dual_index::DualPriorityIndex;
