//! Data-parallel dispatch of per-index kernels.
//!
//! Every kernel in this crate is a pure function of an index and read-only
//! inputs, so the only parallel primitive needed is an ordered map over an
//! [`IndexRange`]. With the `rayon` feature the map runs on the global rayon
//! pool; without it, sequentially. Either way results come back in range
//! order (x fastest), which keeps error reduction deterministic.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::data::field::FieldArray;
use crate::topology::index_range::{IndexRange, IntVect};

/// Evaluate `f` at every index of `range`, returning results in range order.
pub fn map_points<T, F>(range: &IndexRange, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(IntVect) -> T + Send + Sync,
{
    #[cfg(feature = "rayon")]
    {
        let points: Vec<IntVect> = range.iter().collect();
        points.into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        range.iter().map(f).collect()
    }
}

/// Evaluate `f` over `region` and store the results in component 0 of `out`.
///
/// `region` must lie inside `out`'s range.
pub fn fill_points<T, F>(out: &mut FieldArray<T>, region: &IndexRange, f: F)
where
    T: Send,
    F: Fn(IntVect) -> T + Send + Sync,
{
    debug_assert!(out.range().contains_range(region));
    let values = map_points(region, f);
    for (iv, v) in region.iter().zip(values) {
        out[iv] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::field::RealArray;

    #[test]
    fn results_follow_range_order() {
        let r = IndexRange::new((0, 0, 0), (3, 2, 1));
        let out = map_points(&r, |iv| r.offset_of(iv));
        assert_eq!(out.len(), r.num_points());
        for (n, off) in out.into_iter().enumerate() {
            assert_eq!(off, Some(n));
        }
    }

    #[test]
    fn fill_points_writes_only_region() {
        let mut a = RealArray::new(IndexRange::cube(3), 1, -1.0);
        let region = IndexRange::new((1, 1, 1), (2, 2, 2));
        fill_points(&mut a, &region, |iv| f64::from(iv.0[0]));
        assert_eq!(a[IntVect::new(2, 1, 1)], 2.0);
        assert_eq!(a[IntVect::new(0, 0, 0)], -1.0);
    }
}
