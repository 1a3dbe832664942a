use crate::view::{View, ViewMut};
use core::fmt::Debug;

mod private {
    pub trait Sealed {}
}

/// Shape of an array or view with rank fixed at compile time.
///
/// Implemented for `[usize; 1]` up to `[usize; 6]`. Indexing a view peels off
/// the first dimension, [`Item`](Dimension::Item) is what is left over:
/// a reference for rank 1, a view of rank N-1 otherwise.
pub trait Dimension: private::Sealed + Copy + Eq + Debug + Send + Sync + 'static {
    /// Rank
    const NDIM: usize;

    /// Result of peeling off the first dimension of a shared view
    type Item<'a, T: 'a>;

    /// Result of peeling off the first dimension of a mutable view
    type ItemMut<'a, T: 'a>;

    /// Extents as slice
    fn slice(&self) -> &[usize];

    /// Extents as mutable slice
    fn slice_mut(&mut self) -> &mut [usize];

    /// All-zero shape of this rank
    fn zeros() -> Self;

    /// Number of elements (a product of extents)
    fn size(&self) -> usize {
        self.slice().iter().product()
    }

    /// Number of elements, `None` if the product overflows
    fn size_checked(&self) -> Option<usize> {
        self.slice()
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d))
    }

    /// Number of elements in one step along the first dimension
    fn outer_stride(&self) -> usize {
        self.slice()[1..].iter().product()
    }

    /// Row major offset of `index`, `None` if any index is out of range
    fn offset(&self, index: &Self) -> Option<usize> {
        let mut offset = 0;
        for (&extent, &i) in self.slice().iter().zip(index.slice()) {
            if i >= extent {
                return None;
            }
            offset = offset * extent + i;
        }
        Some(offset)
    }

    /// Peel off the first dimension at `index`.
    ///
    /// # Safety
    ///
    /// `index < self.slice()[0]` and `ptr` must point to `self.size()`
    /// elements valid for reads during `'a`.
    unsafe fn item<'a, T: 'a>(&self, ptr: *const T, index: usize) -> Self::Item<'a, T>;

    /// Peel off the first dimension at `index` for writing.
    ///
    /// # Safety
    ///
    /// `index < self.slice()[0]` and `ptr` must point to `self.size()`
    /// elements valid for reads and writes and not aliased during `'a`.
    unsafe fn item_mut<'a, T: 'a>(&self, ptr: *mut T, index: usize) -> Self::ItemMut<'a, T>;
}

/// Shape of rank 1
pub type Ix1 = [usize; 1];
/// Shape of rank 2
pub type Ix2 = [usize; 2];
/// Shape of rank 3
pub type Ix3 = [usize; 3];
/// Shape of rank 4
pub type Ix4 = [usize; 4];
/// Shape of rank 5
pub type Ix5 = [usize; 5];
/// Shape of rank 6
pub type Ix6 = [usize; 6];

impl private::Sealed for [usize; 1] {}

impl Dimension for [usize; 1] {
    const NDIM: usize = 1;
    type Item<'a, T: 'a> = &'a T;
    type ItemMut<'a, T: 'a> = &'a mut T;

    fn slice(&self) -> &[usize] {
        self
    }

    fn slice_mut(&mut self) -> &mut [usize] {
        self
    }

    fn zeros() -> Self {
        [0]
    }

    unsafe fn item<'a, T: 'a>(&self, ptr: *const T, index: usize) -> &'a T {
        &*ptr.add(index)
    }

    unsafe fn item_mut<'a, T: 'a>(&self, ptr: *mut T, index: usize) -> &'a mut T {
        &mut *ptr.add(index)
    }
}

macro_rules! impl_dimension {
    ($($n:literal => $m:literal),* $(,)?) => {
        $(
            impl private::Sealed for [usize; $n] {}

            impl Dimension for [usize; $n] {
                const NDIM: usize = $n;
                type Item<'a, T: 'a> = View<'a, T, [usize; $m]>;
                type ItemMut<'a, T: 'a> = ViewMut<'a, T, [usize; $m]>;

                fn slice(&self) -> &[usize] {
                    self
                }

                fn slice_mut(&mut self) -> &mut [usize] {
                    self
                }

                fn zeros() -> Self {
                    [0; $n]
                }

                unsafe fn item<'a, T: 'a>(&self, ptr: *const T, index: usize) -> Self::Item<'a, T> {
                    let mut sub = [0; $m];
                    sub.copy_from_slice(&self[1..]);
                    View::from_raw_parts(sub, ptr.add(index * sub.size()))
                }

                unsafe fn item_mut<'a, T: 'a>(&self, ptr: *mut T, index: usize) -> Self::ItemMut<'a, T> {
                    let mut sub = [0; $m];
                    sub.copy_from_slice(&self[1..]);
                    ViewMut::from_raw_parts(sub, ptr.add(index * sub.size()))
                }
            }
        )*
    };
}

impl_dimension!(2 => 1, 3 => 2, 4 => 3, 5 => 4, 6 => 5);

#[cfg(test)]
mod tests {
    use super::Dimension;

    #[test]
    fn row_major_offset() {
        let shape: [usize; 3] = [2, 3, 4];
        assert_eq!(shape.offset(&[0, 0, 0]), Some(0));
        assert_eq!(shape.offset(&[0, 0, 3]), Some(3));
        assert_eq!(shape.offset(&[0, 1, 0]), Some(4));
        assert_eq!(shape.offset(&[1, 2, 3]), Some(23));
        assert_eq!(shape.offset(&[2, 0, 0]), None);
        assert_eq!(shape.offset(&[0, 3, 0]), None);
    }

    #[test]
    fn sizes() {
        let shape: [usize; 3] = [4, 3, 2];
        assert_eq!(shape.size(), 24);
        assert_eq!(shape.outer_stride(), 6);
        assert_eq!([5usize].outer_stride(), 1);
        assert_eq!(<[usize; 3]>::zeros().size(), 0);
        assert_eq!([usize::MAX, 2].size_checked(), None);
        assert_eq!(<[usize; 6]>::NDIM, 6);
    }
}
