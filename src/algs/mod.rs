//! Per-index geometry kernels and the level drivers built on them.

pub mod build;
pub mod classify;
pub mod coarsen;
pub mod connectivity;
pub mod mvmc;
pub mod parallel;
pub mod reduction;

pub use build::{BuildOptions, build_level};
pub use coarsen::{CoarsenOptions, coarsen_level};
