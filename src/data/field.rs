//! Multi-component arrays over an [`IndexRange`].
//!
//! A `FieldArray` stores `ncomp` values per index of its range in a flat
//! buffer, component-major (all of component 0, then all of component 1, …)
//! with x varying fastest inside a component. Shared borrows are the read-only
//! view kernels consume; exclusive borrows are the read-write view.
//!
//! Indexing with `array[iv]` or `array[(iv, comp)]` panics outside the range,
//! exactly like slice indexing. Use [`FieldArray::try_get`] where an index may
//! legitimately fall outside.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::data::storage::{Storage, VecStorage};
use crate::mesh_error::MeshEbError;
use crate::topology::index_range::{IndexRange, IntVect};

/// Array of `T` over an index range with `ncomp` components.
#[derive(Clone, Debug)]
pub struct FieldArray<T, S = VecStorage<T>>
where
    S: Storage<T>,
{
    range: IndexRange,
    ncomp: usize,
    data: S,
    _marker: PhantomData<T>,
}

/// The common `f64` array.
pub type RealArray = FieldArray<f64>;

impl<T: Clone, S: Storage<T>> FieldArray<T, S> {
    /// Allocate over `range` with every element set to `fill`.
    pub fn new(range: IndexRange, ncomp: usize, fill: T) -> Self {
        FieldArray {
            range,
            ncomp,
            data: S::with_len(range.num_points() * ncomp, fill),
            _marker: PhantomData,
        }
    }

    /// Overwrite every element.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Overwrite component `comp` on the part of `region` inside this array.
    pub fn fill_region(&mut self, region: &IndexRange, comp: usize, value: T) {
        let region = region.intersection(&self.range);
        for iv in region.iter() {
            self[(iv, comp)] = value.clone();
        }
    }
}

impl<T, S: Storage<T>> FieldArray<T, S> {
    /// Wrap an existing buffer; its length must be `range.num_points() * ncomp`.
    pub fn from_storage(range: IndexRange, ncomp: usize, data: S) -> Result<Self, MeshEbError> {
        let expected = range.num_points() * ncomp;
        if data.len() != expected {
            return Err(MeshEbError::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(FieldArray {
            range,
            ncomp,
            data,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn range(&self) -> &IndexRange {
        &self.range
    }

    #[inline]
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    /// Flat buffer offset of `(iv, comp)`, or `None` outside the array.
    #[inline]
    pub fn offset_of(&self, iv: IntVect, comp: usize) -> Option<usize> {
        if comp >= self.ncomp {
            return None;
        }
        self.range
            .offset_of(iv)
            .map(|o| o + comp * self.range.num_points())
    }

    /// Fallible element access.
    pub fn try_get(&self, iv: IntVect, comp: usize) -> Result<&T, MeshEbError> {
        if comp >= self.ncomp {
            return Err(MeshEbError::ComponentOutOfRange {
                comp,
                ncomp: self.ncomp,
            });
        }
        let off = self.offset_of(iv, comp).ok_or(MeshEbError::IndexOutOfRange {
            index: iv,
            range: self.range,
        })?;
        Ok(&self.data.as_slice()[off])
    }

    /// Fallible mutable element access.
    pub fn try_get_mut(&mut self, iv: IntVect, comp: usize) -> Result<&mut T, MeshEbError> {
        if comp >= self.ncomp {
            return Err(MeshEbError::ComponentOutOfRange {
                comp,
                ncomp: self.ncomp,
            });
        }
        let off = self.offset_of(iv, comp).ok_or(MeshEbError::IndexOutOfRange {
            index: iv,
            range: self.range,
        })?;
        Ok(&mut self.data.as_mut_slice()[off])
    }

    /// Component `comp` as a slice, x fastest.
    pub fn component(&self, comp: usize) -> &[T] {
        let n = self.range.num_points();
        &self.data.as_slice()[comp * n..(comp + 1) * n]
    }

    /// `(index, &value)` pairs of component `comp` in range order.
    pub fn iter_comp(&self, comp: usize) -> impl Iterator<Item = (IntVect, &T)> + '_ {
        self.range.iter().zip(self.component(comp).iter())
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    pub fn storage(&self) -> &S {
        &self.data
    }

    #[track_caller]
    #[inline]
    fn checked_offset(&self, iv: IntVect, comp: usize) -> usize {
        match self.offset_of(iv, comp) {
            Some(off) => off,
            None => panic!(
                "index ({iv}, {comp}) out of bounds for array over {} with {} components",
                self.range, self.ncomp
            ),
        }
    }
}

impl<T: Copy, S: Storage<T>> FieldArray<T, S> {
    /// Copy of component `comp` at `iv`, or `None` outside the array.
    #[inline]
    pub fn get(&self, iv: IntVect, comp: usize) -> Option<T> {
        self.offset_of(iv, comp).map(|o| self.data.as_slice()[o])
    }

    /// The first three components at `iv` as a vector.
    #[track_caller]
    pub fn vec3(&self, iv: IntVect) -> [f64; 3]
    where
        T: Into<f64>,
    {
        [self[(iv, 0)].into(), self[(iv, 1)].into(), self[(iv, 2)].into()]
    }
}

impl<T, S: Storage<T>> Index<IntVect> for FieldArray<T, S> {
    type Output = T;
    #[track_caller]
    #[inline]
    fn index(&self, iv: IntVect) -> &T {
        let off = self.checked_offset(iv, 0);
        &self.data.as_slice()[off]
    }
}

impl<T, S: Storage<T>> IndexMut<IntVect> for FieldArray<T, S> {
    #[track_caller]
    #[inline]
    fn index_mut(&mut self, iv: IntVect) -> &mut T {
        let off = self.checked_offset(iv, 0);
        &mut self.data.as_mut_slice()[off]
    }
}

impl<T, S: Storage<T>> Index<(IntVect, usize)> for FieldArray<T, S> {
    type Output = T;
    #[track_caller]
    #[inline]
    fn index(&self, (iv, comp): (IntVect, usize)) -> &T {
        let off = self.checked_offset(iv, comp);
        &self.data.as_slice()[off]
    }
}

impl<T, S: Storage<T>> IndexMut<(IntVect, usize)> for FieldArray<T, S> {
    #[track_caller]
    #[inline]
    fn index_mut(&mut self, (iv, comp): (IntVect, usize)) -> &mut T {
        let off = self.checked_offset(iv, comp);
        &mut self.data.as_mut_slice()[off]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::index_range::IndexType;

    #[test]
    fn component_major_layout() {
        let r = IndexRange::new((-1, 0, 0), (0, 1, 0));
        let mut a = RealArray::new(r, 2, 0.0);
        a[(IntVect::new(0, 1, 0), 1)] = 5.0;
        assert_eq!(a.offset_of(IntVect::new(0, 1, 0), 1), Some(3 + 4));
        assert_eq!(a.component(1)[3], 5.0);
        assert_eq!(a.get(IntVect::new(0, 1, 0), 1), Some(5.0));
        assert_eq!(a.get(IntVect::new(1, 1, 0), 0), None);
    }

    #[test]
    fn try_get_reports_out_of_range() {
        let r = IndexRange::with_type((0, 0, 0), (1, 1, 1), IndexType::NODE);
        let a = FieldArray::<f64>::new(r, 1, 1.0);
        assert!(matches!(
            a.try_get(IntVect::new(2, 0, 0), 0),
            Err(MeshEbError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            a.try_get(IntVect::new(0, 0, 0), 1),
            Err(MeshEbError::ComponentOutOfRange { comp: 1, ncomp: 1 })
        ));
        assert_eq!(*a.try_get(IntVect::new(1, 1, 1), 0).unwrap(), 1.0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn indexing_outside_panics() {
        let a = RealArray::new(IndexRange::cube(2), 1, 0.0);
        let _ = a[IntVect::new(2, 0, 0)];
    }

    #[test]
    fn from_storage_checks_length() {
        let r = IndexRange::cube(2);
        assert!(RealArray::from_storage(r, 1, VecStorage::from(vec![0.0; 7])).is_err());
        let a = RealArray::from_storage(r, 1, VecStorage::from(vec![2.0; 8])).unwrap();
        assert!(a.iter_comp(0).all(|(_, v)| *v == 2.0));
    }

    #[test]
    fn fill_region_clips_to_array() {
        let mut a = RealArray::new(IndexRange::cube(2), 1, 0.0);
        a.fill_region(&IndexRange::new((1, 1, 1), (5, 5, 5)), 0, 3.0);
        assert_eq!(a[IntVect::new(1, 1, 1)], 3.0);
        assert_eq!(a[IntVect::new(0, 1, 1)], 0.0);
    }
}
