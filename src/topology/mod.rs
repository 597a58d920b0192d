//! Top-level module for structured index-space and cell-classification types.
//!
//! This module provides:
//! - `IntVect`, `IndexType` and `IndexRange` for the Cartesian index space
//! - `Axis`, `Side` and `Face` for writing direction-agnostic kernels
//! - `EbType` / `CellKind` classifications and the `CellFlag` connectivity flag

pub mod axis;
pub mod cell_flag;
pub mod cell_type;
pub mod index_range;

pub use axis::{Axis, Face, Side};
pub use cell_flag::{CellFlag, Neighbors};
pub use cell_type::{CellKind, EbType};
pub use index_range::{IndexRange, IndexType, IntVect};
