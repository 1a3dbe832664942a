use crate::dimension::{Dimension, Ix1};
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

/// Read only view into contiguous row major storage owned by someone else.
///
/// A view is a shape and a pointer, it is `Copy` and costs nothing to pass
/// around. Lifetime `'a` ties it to the storage it borrows.
pub struct View<'a, T, D: Dimension> {
    shape: D,
    ptr: *const T,
    _marker: PhantomData<&'a [T]>,
}

/// Mutable view into contiguous row major storage owned by someone else.
pub struct ViewMut<'a, T, D: Dimension> {
    shape: D,
    ptr: *mut T,
    _marker: PhantomData<&'a mut [T]>,
}

// Same rules as &[T] and &mut [T]
unsafe impl<T: Sync, D: Dimension> Send for View<'_, T, D> {}
unsafe impl<T: Sync, D: Dimension> Sync for View<'_, T, D> {}
unsafe impl<T: Send, D: Dimension> Send for ViewMut<'_, T, D> {}
unsafe impl<T: Sync, D: Dimension> Sync for ViewMut<'_, T, D> {}

impl<T, D: Dimension> Clone for View<'_, T, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, D: Dimension> Copy for View<'_, T, D> {}

// Element count of a shape that must fit in memory
#[track_caller]
fn numel_of<D: Dimension>(shape: &D) -> usize {
    match shape.size_checked() {
        Some(numel) => numel,
        None => panic!("Element count of shape {shape:?} overflows usize"),
    }
}

#[track_caller]
fn check_len<D: Dimension>(shape: &D, len: usize) {
    let numel = numel_of(shape);
    assert_eq!(
        numel, len,
        "Shape {shape:?} needs {numel} elements, but got {len}"
    );
}

#[track_caller]
fn check_index<D: Dimension>(shape: &D, index: usize) {
    assert!(
        index < shape.slice()[0],
        "Index {index} out of bounds for shape {shape:?}"
    );
}

#[track_caller]
fn reshaped<D: Dimension, E: Dimension>(shape: &D, new_shape: E) -> E {
    assert_eq!(
        numel_of(shape),
        numel_of(&new_shape),
        "Cannot reshape {shape:?} into {new_shape:?}, element counts differ"
    );
    new_shape
}

// Shape and element offset of rows [offset, offset + count)
#[track_caller]
fn sliced<D: Dimension>(shape: &D, offset: usize, count: usize) -> (D, usize) {
    let rows = shape.slice()[0];
    assert!(
        offset.checked_add(count).is_some_and(|end| end <= rows),
        "Slice [{offset}, {offset} + {count}) out of bounds for shape {shape:?}"
    );
    let mut sub = *shape;
    sub.slice_mut()[0] = count;
    (sub, offset * shape.outer_stride())
}

impl<'a, T, D: Dimension> View<'a, T, D> {
    /// Create view of `data` with given shape.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not the product of `shape`.
    #[track_caller]
    pub fn from_slice(shape: D, data: &'a [T]) -> Self {
        check_len(&shape, data.len());
        Self {
            shape,
            ptr: data.as_ptr(),
            _marker: PhantomData,
        }
    }

    /// Create view from shape and pointer, taken as given.
    ///
    /// # Safety
    ///
    /// Unless the shape has zero elements, `ptr` must point to
    /// `shape.size()` initialized elements that stay valid and unmodified
    /// for `'a`.
    pub unsafe fn from_raw_parts(shape: D, ptr: *const T) -> Self {
        Self {
            shape,
            ptr,
            _marker: PhantomData,
        }
    }

    /// Get view's shape
    #[must_use]
    pub fn shape(&self) -> D {
        self.shape
    }

    /// Get extent of dimension `axis`
    #[must_use]
    pub fn dim(&self, axis: usize) -> usize {
        self.shape.slice()[axis]
    }

    /// Get view's rank
    #[must_use]
    pub const fn ndim(&self) -> usize {
        D::NDIM
    }

    /// Number of elements (a product of the shape)
    #[must_use]
    pub fn numel(&self) -> usize {
        self.shape.size()
    }

    /// True if the view has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Pointer to the first element, may be null for empty views
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    /// Peel off the first dimension.
    ///
    /// Returns element reference for rank 1 and view of rank N-1 otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.dim(0)`.
    #[track_caller]
    #[inline]
    pub fn at(self, index: usize) -> D::Item<'a, T> {
        check_index(&self.shape, index);
        unsafe { self.shape.item(self.ptr, index) }
    }

    /// Peel off the first dimension, `None` if `index` is out of range
    #[inline]
    pub fn get(self, index: usize) -> Option<D::Item<'a, T>> {
        if index < self.shape.slice()[0] {
            Some(unsafe { self.shape.item(self.ptr, index) })
        } else {
            None
        }
    }

    /// Peel off the first dimension without bounds checking.
    ///
    /// # Safety
    ///
    /// `index < self.dim(0)`.
    #[inline(always)]
    pub unsafe fn at_unchecked(self, index: usize) -> D::Item<'a, T> {
        debug_assert!(index < self.shape.slice()[0]);
        self.shape.item(self.ptr, index)
    }

    /// View the same storage with a different shape.
    ///
    /// # Panics
    ///
    /// Panics if element counts of both shapes differ.
    #[track_caller]
    pub fn reshape<E: Dimension>(self, shape: E) -> View<'a, T, E> {
        View {
            shape: reshaped(&self.shape, shape),
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// View all elements as one dimension
    pub fn flatten(self) -> View<'a, T, Ix1> {
        self.reshape([self.numel()])
    }

    /// View of `count` rows of the first dimension starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + count > self.dim(0)`.
    #[track_caller]
    pub fn slice(self, offset: usize, count: usize) -> Self {
        let (shape, start) = sliced(&self.shape, offset, count);
        Self {
            shape,
            ptr: self.ptr.wrapping_add(start),
            _marker: PhantomData,
        }
    }

    /// View of rows of the first dimension from `offset` to the end
    #[track_caller]
    pub fn slice_from(self, offset: usize) -> Self {
        let rows = self.shape.slice()[0];
        self.slice(offset, rows.saturating_sub(offset))
    }

    /// Split into rows `[0, mid)` and `[mid, dim(0))` of the first dimension
    #[track_caller]
    pub fn split_at(self, mid: usize) -> (Self, Self) {
        (self.slice(0, mid), self.slice_from(mid))
    }

    /// All elements in row major order
    pub fn as_slice(self) -> &'a [T] {
        let numel = self.numel();
        if numel == 0 {
            &[]
        } else {
            unsafe { core::slice::from_raw_parts(self.ptr, numel) }
        }
    }

    /// Iterate over all elements in row major order, regardless of rank.
    /// Use `.rev()` for reverse order.
    pub fn iter(self) -> core::slice::Iter<'a, T> {
        self.as_slice().iter()
    }
}

impl<'a, T, D: Dimension> IntoIterator for View<'a, T, D> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, D: Dimension> Index<D> for View<'_, T, D> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: D) -> &T {
        match self.shape.offset(&index) {
            Some(offset) => &self.as_slice()[offset],
            None => panic!("Index {index:?} out of bounds for shape {:?}", self.shape),
        }
    }
}

impl<T> Index<usize> for View<'_, T, Ix1> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<'a, T, D: Dimension> ViewMut<'a, T, D> {
    /// Create mutable view of `data` with given shape.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` is not the product of `shape`.
    #[track_caller]
    pub fn from_slice_mut(shape: D, data: &'a mut [T]) -> Self {
        check_len(&shape, data.len());
        Self {
            shape,
            ptr: data.as_mut_ptr(),
            _marker: PhantomData,
        }
    }

    /// Create mutable view from shape and pointer, taken as given.
    ///
    /// # Safety
    ///
    /// Unless the shape has zero elements, `ptr` must point to
    /// `shape.size()` initialized elements that nothing else accesses for `'a`.
    pub unsafe fn from_raw_parts(shape: D, ptr: *mut T) -> Self {
        Self {
            shape,
            ptr,
            _marker: PhantomData,
        }
    }

    /// Get view's shape
    #[must_use]
    pub fn shape(&self) -> D {
        self.shape
    }

    /// Get extent of dimension `axis`
    #[must_use]
    pub fn dim(&self, axis: usize) -> usize {
        self.shape.slice()[axis]
    }

    /// Get view's rank
    #[must_use]
    pub const fn ndim(&self) -> usize {
        D::NDIM
    }

    /// Number of elements (a product of the shape)
    #[must_use]
    pub fn numel(&self) -> usize {
        self.shape.size()
    }

    /// True if the view has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Pointer to the first element, may be null for empty views
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    /// Mutable pointer to the first element, may be null for empty views
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr
    }

    /// Read only view of the same storage
    pub fn view(&self) -> View<'_, T, D> {
        View {
            shape: self.shape,
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Turn into read only view of the same storage
    pub fn into_view(self) -> View<'a, T, D> {
        View {
            shape: self.shape,
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Shorter lived mutable view of the same storage
    pub fn reborrow(&mut self) -> ViewMut<'_, T, D> {
        ViewMut {
            shape: self.shape,
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Peel off the first dimension for reading
    #[track_caller]
    #[inline]
    pub fn at(&self, index: usize) -> D::Item<'_, T> {
        self.view().at(index)
    }

    /// Peel off the first dimension for writing.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.dim(0)`.
    #[track_caller]
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> D::ItemMut<'_, T> {
        self.reborrow().into_at(index)
    }

    /// Peel off the first dimension, keeping the full lifetime
    #[track_caller]
    #[inline]
    pub fn into_at(self, index: usize) -> D::ItemMut<'a, T> {
        check_index(&self.shape, index);
        unsafe { self.shape.item_mut(self.ptr, index) }
    }

    /// Peel off the first dimension for writing, `None` if `index` is out of range
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<D::ItemMut<'_, T>> {
        if index < self.shape.slice()[0] {
            Some(unsafe { self.shape.item_mut(self.ptr, index) })
        } else {
            None
        }
    }

    /// Peel off the first dimension for writing without bounds checking.
    ///
    /// # Safety
    ///
    /// `index < self.dim(0)`.
    #[inline(always)]
    pub unsafe fn at_unchecked_mut(&mut self, index: usize) -> D::ItemMut<'_, T> {
        debug_assert!(index < self.shape.slice()[0]);
        self.shape.item_mut(self.ptr, index)
    }

    /// View the same storage with a different shape.
    ///
    /// # Panics
    ///
    /// Panics if element counts of both shapes differ.
    #[track_caller]
    pub fn reshape<E: Dimension>(self, shape: E) -> ViewMut<'a, T, E> {
        ViewMut {
            shape: reshaped(&self.shape, shape),
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// View all elements as one dimension
    pub fn flatten(self) -> ViewMut<'a, T, Ix1> {
        let numel = self.numel();
        self.reshape([numel])
    }

    /// View of `count` rows of the first dimension starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + count > self.dim(0)`.
    #[track_caller]
    pub fn slice(self, offset: usize, count: usize) -> Self {
        let (shape, start) = sliced(&self.shape, offset, count);
        Self {
            shape,
            ptr: self.ptr.wrapping_add(start),
            _marker: PhantomData,
        }
    }

    /// View of rows of the first dimension from `offset` to the end
    #[track_caller]
    pub fn slice_from(self, offset: usize) -> Self {
        let rows = self.shape.slice()[0];
        self.slice(offset, rows.saturating_sub(offset))
    }

    /// Split into two disjoint views, rows `[0, mid)` and `[mid, dim(0))`.
    /// Both halves can be handed to different threads.
    #[track_caller]
    pub fn split_at_mut(self, mid: usize) -> (Self, Self) {
        let rows = self.shape.slice()[0];
        let (head, _) = sliced(&self.shape, 0, mid);
        let (tail, start) = sliced(&self.shape, mid, rows - mid);
        (
            Self {
                shape: head,
                ptr: self.ptr,
                _marker: PhantomData,
            },
            Self {
                shape: tail,
                ptr: self.ptr.wrapping_add(start),
                _marker: PhantomData,
            },
        )
    }

    /// All elements in row major order
    pub fn as_slice(&self) -> &[T] {
        self.view().as_slice()
    }

    /// All elements in row major order, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.reborrow().into_slice()
    }

    /// Turn into mutable slice of all elements, keeping the full lifetime
    pub fn into_slice(self) -> &'a mut [T] {
        let numel = self.numel();
        if numel == 0 {
            &mut []
        } else {
            unsafe { core::slice::from_raw_parts_mut(self.ptr, numel) }
        }
    }

    /// Iterate over all elements in row major order
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably over all elements in row major order
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Assign `value` to every element
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.as_mut_slice().fill(value);
    }
}

impl<'a, T, D: Dimension> From<ViewMut<'a, T, D>> for View<'a, T, D> {
    fn from(view: ViewMut<'a, T, D>) -> Self {
        view.into_view()
    }
}

impl<'a, T, D: Dimension> IntoIterator for ViewMut<'a, T, D> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_slice().iter_mut()
    }
}

impl<T, D: Dimension> Index<D> for ViewMut<'_, T, D> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: D) -> &T {
        match self.shape.offset(&index) {
            Some(offset) => &self.as_slice()[offset],
            None => panic!("Index {index:?} out of bounds for shape {:?}", self.shape),
        }
    }
}

impl<T, D: Dimension> IndexMut<D> for ViewMut<'_, T, D> {
    #[track_caller]
    fn index_mut(&mut self, index: D) -> &mut T {
        match self.shape.offset(&index) {
            Some(offset) => &mut self.as_mut_slice()[offset],
            None => panic!("Index {index:?} out of bounds for shape {:?}", self.shape),
        }
    }
}

impl<T> Index<usize> for ViewMut<'_, T, Ix1> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        check_index(&self.shape, index);
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for ViewMut<'_, T, Ix1> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        check_index(&self.shape, index);
        &mut self.as_mut_slice()[index]
    }
}
