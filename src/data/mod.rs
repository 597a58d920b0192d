//! Data module: per-level field arrays and their storage

pub mod eb_level;
pub mod field;
pub mod storage;

pub use eb_level::EbLevel;
pub use field::{FieldArray, RealArray};
pub use storage::{Storage, VecStorage};
