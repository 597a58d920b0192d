//! Geometry utilities for mesh-eb.
//!
//! Placement of the index space in physical space, implicit surface
//! descriptions, and the sampled cut-cell moment estimator used for the finest
//! level.

pub mod grid;
pub mod implicit;
pub mod moments;
