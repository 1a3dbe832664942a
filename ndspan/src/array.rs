use crate::allocator::{AlignedAllocator, ArrayAllocator};
use crate::config::Config;
use crate::dimension::{Dimension, Ix1};
use crate::element::Element;
use crate::error::NdError;
use crate::view::{View, ViewMut};
use core::ops::{Index, IndexMut};
use core::ptr::NonNull;

/// Owning n-dimensional array with contiguous row major storage.
///
/// Storage comes from allocator `A`, by default [`AlignedAllocator`].
/// An array with zero elements holds no allocation and a null pointer.
/// All indexing, reshaping and slicing goes through [`View`] and [`ViewMut`],
/// borrowed from the array.
///
/// ```
/// use ndspan::Array;
/// let mut x: Array<i32, [usize; 2]> = Array::from_slice([2, 2], &[1, 0, 0, 1])?;
/// *x.at_mut(1).at_mut(0) = 5;
/// assert_eq!(x.to_string(), "[[1,0],[5,1]]");
/// # Ok::<(), ndspan::NdError>(())
/// ```
pub struct Array<T, D: Dimension, A: ArrayAllocator<T> = AlignedAllocator<T>> {
    alloc: A,
    shape: D,
    ptr: *mut T,
}

// Same rules as Vec<T, A>
unsafe impl<T: Send, D: Dimension, A: ArrayAllocator<T> + Send> Send for Array<T, D, A> {}
unsafe impl<T: Sync, D: Dimension, A: ArrayAllocator<T> + Sync> Sync for Array<T, D, A> {}

/// Block being filled with elements.
///
/// If dropped before [`finish`](Filling::finish), drops elements
/// written so far in reverse order and releases the block.
struct Filling<'a, T, A: ArrayAllocator<T>> {
    alloc: &'a A,
    ptr: NonNull<T>,
    capacity: usize,
    len: usize,
}

impl<'a, T, A: ArrayAllocator<T>> Filling<'a, T, A> {
    fn new(alloc: &'a A, capacity: usize) -> Result<Self, NdError> {
        let ptr = if capacity == 0 {
            NonNull::dangling()
        } else {
            alloc.allocate(capacity)?
        };
        Ok(Self {
            alloc,
            ptr,
            capacity,
            len: 0,
        })
    }

    fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    fn push(&mut self, value: T) {
        debug_assert!(!self.is_full());
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    fn construct_next(&mut self)
    where
        T: Element,
    {
        debug_assert!(!self.is_full());
        unsafe { self.alloc.construct(self.ptr.as_ptr().add(self.len)) };
        self.len += 1;
    }

    fn append(&mut self, data: &mut Vec<T>) {
        debug_assert!(self.len + data.len() <= self.capacity);
        let n = data.len();
        unsafe {
            core::ptr::copy_nonoverlapping(data.as_ptr(), self.ptr.as_ptr().add(self.len), n);
            data.set_len(0);
        }
        self.len += n;
    }

    // Null for empty blocks
    fn finish(self) -> *mut T {
        debug_assert!(self.is_full());
        let ptr = if self.capacity == 0 {
            core::ptr::null_mut()
        } else {
            self.ptr.as_ptr()
        };
        core::mem::forget(self);
        ptr
    }
}

impl<T, A: ArrayAllocator<T>> Drop for Filling<'_, T, A> {
    fn drop(&mut self) {
        unsafe {
            for i in (0..self.len).rev() {
                self.alloc.destroy(self.ptr.as_ptr().add(i));
            }
            if self.capacity != 0 {
                self.alloc.deallocate(self.ptr, self.capacity);
            }
        }
    }
}

// Clone can not return errors, report them like std collections do
fn clone_failed(err: NdError) -> ! {
    match err {
        NdError::AllocationError { layout } => std::alloc::handle_alloc_error(layout),
        err => panic!("{err}"),
    }
}

impl<T, D: Dimension> Array<T, D> {
    /// Array of default elements in cache line aligned storage.
    ///
    /// Elements of [`Element::TRIVIAL`] types are left as the allocator hands
    /// them out, which for [`AlignedAllocator`] means zeroed.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    pub fn new(shape: D) -> Result<Self, NdError>
    where
        T: Element,
    {
        Self::new_in(shape, AlignedAllocator::new())
    }

    /// Array with all elements cloned from `value`
    /// # Errors
    /// Returns error if the storage could not be allocated.
    pub fn from_elem(shape: D, value: T) -> Result<Self, NdError>
    where
        T: Clone,
    {
        Self::from_elem_in(shape, value, AlignedAllocator::new())
    }

    /// Array with elements taken from iterator in row major order.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    /// # Panics
    /// Panics if iterator does not yield exactly `shape.size()` elements.
    #[track_caller]
    pub fn from_shape_iter(shape: D, iter: impl IntoIterator<Item = T>) -> Result<Self, NdError> {
        Self::from_shape_iter_in(shape, iter, AlignedAllocator::new())
    }

    /// Array with elements cloned from slice in row major order.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    /// # Panics
    /// Panics if `data.len()` is not the product of `shape`.
    #[track_caller]
    pub fn from_slice(shape: D, data: &[T]) -> Result<Self, NdError>
    where
        T: Clone,
    {
        Self::from_slice_in(shape, data, AlignedAllocator::new())
    }

    /// Array with elements moved out of vector in row major order.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    /// # Panics
    /// Panics if `data.len()` is not the product of `shape`.
    #[track_caller]
    pub fn from_vec(shape: D, data: Vec<T>) -> Result<Self, NdError> {
        Self::from_vec_in(shape, data, AlignedAllocator::new())
    }
}

impl<T, D: Dimension, A: ArrayAllocator<T>> Array<T, D, A> {
    /// Empty array with all-zero shape, does not allocate
    pub fn empty_in(alloc: A) -> Self {
        Self {
            alloc,
            shape: D::zeros(),
            ptr: core::ptr::null_mut(),
        }
    }

    fn checked_numel(shape: &D) -> Result<usize, NdError> {
        shape.size_checked().ok_or_else(|| NdError::ShapeOverflow {
            shape: shape.slice().into(),
        })
    }

    fn build(
        shape: D,
        alloc: A,
        fill: impl FnOnce(&mut Filling<'_, T, A>),
    ) -> Result<Self, NdError> {
        let numel = Self::checked_numel(&shape)?;
        let mut filling = Filling::new(&alloc, numel)?;
        fill(&mut filling);
        let ptr = filling.finish();
        if Config::get().debug_array() {
            println!("Constructed array {shape:?} with {numel} elements at {ptr:?}");
        }
        Ok(Self { alloc, shape, ptr })
    }

    /// Array of default elements, constructed by `alloc`.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    pub fn new_in(shape: D, alloc: A) -> Result<Self, NdError>
    where
        T: Element,
    {
        Self::build(shape, alloc, |block| {
            while !block.is_full() {
                block.construct_next();
            }
        })
    }

    /// Array with all elements cloned from `value`, stored in `alloc`.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    pub fn from_elem_in(shape: D, value: T, alloc: A) -> Result<Self, NdError>
    where
        T: Clone,
    {
        Self::build(shape, alloc, |block| {
            while !block.is_full() {
                block.push(value.clone());
            }
        })
    }

    /// Array with elements taken from iterator, stored in `alloc`.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    /// # Panics
    /// Panics if iterator does not yield exactly `shape.size()` elements.
    #[track_caller]
    pub fn from_shape_iter_in(
        shape: D,
        iter: impl IntoIterator<Item = T>,
        alloc: A,
    ) -> Result<Self, NdError> {
        let mut iter = iter.into_iter();
        let array = Self::build(shape, alloc, |block| {
            while !block.is_full() {
                match iter.next() {
                    Some(x) => block.push(x),
                    None => panic!(
                        "Iterator yielded fewer than {} elements needed by shape {shape:?}",
                        block.capacity
                    ),
                }
            }
        })?;
        assert!(
            iter.next().is_none(),
            "Iterator yielded more than {} elements needed by shape {shape:?}",
            shape.size()
        );
        Ok(array)
    }

    /// Array with elements cloned from slice, stored in `alloc`.
    /// # Errors
    /// Returns error if the element count of `shape` overflows or the storage
    /// could not be allocated.
    /// # Panics
    /// Panics if `data.len()` is not the product of `shape`.
    #[track_caller]
    pub fn from_slice_in(shape: D, data: &[T], alloc: A) -> Result<Self, NdError>
    where
        T: Clone,
    {
        let numel = Self::checked_numel(&shape)?;
        assert_eq!(
            numel,
            data.len(),
            "Shape {shape:?} does not match {} elements",
            data.len()
        );
        Self::from_shape_iter_in(shape, data.iter().cloned(), alloc)
    }

    /// Array with elements moved out of vector, stored in `alloc`.
    /// # Errors
    /// Returns error if the element count of `shape` overflows or the storage
    /// could not be allocated.
    /// # Panics
    /// Panics if `data.len()` is not the product of `shape`.
    #[track_caller]
    pub fn from_vec_in(shape: D, mut data: Vec<T>, alloc: A) -> Result<Self, NdError> {
        let numel = Self::checked_numel(&shape)?;
        assert_eq!(
            numel,
            data.len(),
            "Shape {shape:?} does not match {} elements",
            data.len()
        );
        Self::build(shape, alloc, |block| block.append(&mut data))
    }

    /// Clone into storage of the same allocator.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    pub fn try_clone(&self) -> Result<Self, NdError>
    where
        T: Clone,
    {
        self.clone_in(self.alloc.clone())
    }

    /// Clone into storage of a different allocator.
    /// # Errors
    /// Returns error if the storage could not be allocated.
    pub fn clone_in<B: ArrayAllocator<T>>(&self, alloc: B) -> Result<Array<T, D, B>, NdError>
    where
        T: Clone,
    {
        let source = self.as_slice();
        Array::build(self.shape, alloc, |block| {
            for x in source {
                block.push(x.clone());
            }
        })
    }

    /// Move elements into storage of a different allocator.
    ///
    /// Elements are relocated bitwise, so this never panics.
    /// # Errors
    /// Returns error if the storage could not be allocated,
    /// `self` is dropped in that case.
    pub fn into_allocator<B: ArrayAllocator<T>>(mut self, alloc: B) -> Result<Array<T, D, B>, NdError> {
        let shape = self.shape;
        if self.ptr.is_null() {
            return Ok(Array::empty_in(alloc).with_shape(shape));
        }
        let numel = self.numel();
        let dst = alloc.allocate(numel)?;
        unsafe {
            core::ptr::copy_nonoverlapping(self.ptr, dst.as_ptr(), numel);
            self.alloc.deallocate(NonNull::new_unchecked(self.ptr), numel);
        }
        // Elements moved out, leave nothing for drop
        self.ptr = core::ptr::null_mut();
        self.shape = D::zeros();
        Ok(Array {
            alloc,
            shape,
            ptr: dst.as_ptr(),
        })
    }

    /// Move elements into storage of `alloc`, keeping the current block
    /// if `alloc` compares equal to the current allocator.
    /// # Errors
    /// Returns error if the storage could not be allocated,
    /// `self` is dropped in that case.
    pub fn with_allocator(mut self, alloc: A) -> Result<Self, NdError>
    where
        A: PartialEq,
    {
        if self.alloc == alloc {
            self.alloc = alloc;
            return Ok(self);
        }
        self.into_allocator(alloc)
    }

    // Only for arrays without elements
    fn with_shape(mut self, shape: D) -> Self {
        debug_assert!(self.ptr.is_null() && shape.size() == 0);
        self.shape = shape;
        self
    }

    /// Get array's shape
    #[must_use]
    pub fn shape(&self) -> D {
        self.shape
    }

    /// Extent of dimension `axis`.
    /// # Panics
    /// Panics if `axis >= self.ndim()`.
    #[track_caller]
    pub fn dim(&self, axis: usize) -> usize {
        self.shape.slice()[axis]
    }

    /// Rank
    #[must_use]
    pub const fn ndim(&self) -> usize {
        D::NDIM
    }

    /// Number of elements
    #[must_use]
    pub fn numel(&self) -> usize {
        self.shape.size()
    }

    /// True if there are no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ptr.is_null()
    }

    /// Pointer to first element, null for empty arrays
    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    /// Mutable pointer to first element, null for empty arrays
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr
    }

    /// Allocator providing storage
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Read only view of all elements
    pub fn view(&self) -> View<'_, T, D> {
        unsafe { View::from_raw_parts(self.shape, self.ptr) }
    }

    /// Read only view, also for mutable arrays
    pub fn cview(&self) -> View<'_, T, D> {
        self.view()
    }

    /// Mutable view of all elements
    pub fn view_mut(&mut self) -> ViewMut<'_, T, D> {
        unsafe { ViewMut::from_raw_parts(self.shape, self.ptr) }
    }

    /// Peel off the first dimension, see [`View::at`]
    #[track_caller]
    #[inline]
    pub fn at(&self, index: usize) -> D::Item<'_, T> {
        self.view().at(index)
    }

    /// Peel off the first dimension mutably, see [`ViewMut::into_at`]
    #[track_caller]
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> D::ItemMut<'_, T> {
        self.view_mut().into_at(index)
    }

    /// Peel off the first dimension, `None` if `index` is out of range
    pub fn get(&self, index: usize) -> Option<D::Item<'_, T>> {
        self.view().get(index)
    }

    /// Peel off the first dimension mutably, `None` if `index` is out of range
    pub fn get_mut(&mut self, index: usize) -> Option<D::ItemMut<'_, T>> {
        if index < self.dim(0) {
            Some(self.view_mut().into_at(index))
        } else {
            None
        }
    }

    /// Peel off the first dimension without bounds checking.
    /// # Safety
    /// `index < self.dim(0)`.
    #[inline(always)]
    pub unsafe fn at_unchecked(&self, index: usize) -> D::Item<'_, T> {
        self.view().at_unchecked(index)
    }

    /// View with a different shape, see [`View::reshape`]
    #[track_caller]
    pub fn reshape<E: Dimension>(&self, shape: E) -> View<'_, T, E> {
        self.view().reshape(shape)
    }

    /// Mutable view with a different shape
    #[track_caller]
    pub fn reshape_mut<E: Dimension>(&mut self, shape: E) -> ViewMut<'_, T, E> {
        self.view_mut().reshape(shape)
    }

    /// View all elements as one dimension
    pub fn flatten(&self) -> View<'_, T, Ix1> {
        self.view().flatten()
    }

    /// View all elements as one dimension mutably
    pub fn flatten_mut(&mut self) -> ViewMut<'_, T, Ix1> {
        self.view_mut().flatten()
    }

    /// View of `count` rows starting at `offset`, see [`View::slice`]
    #[track_caller]
    pub fn slice(&self, offset: usize, count: usize) -> View<'_, T, D> {
        self.view().slice(offset, count)
    }

    /// Mutable view of `count` rows starting at `offset`
    #[track_caller]
    pub fn slice_mut(&mut self, offset: usize, count: usize) -> ViewMut<'_, T, D> {
        self.view_mut().slice(offset, count)
    }

    /// View of rows from `offset` to the end
    #[track_caller]
    pub fn slice_from(&self, offset: usize) -> View<'_, T, D> {
        self.view().slice_from(offset)
    }

    /// Mutable view of rows from `offset` to the end
    #[track_caller]
    pub fn slice_from_mut(&mut self, offset: usize) -> ViewMut<'_, T, D> {
        self.view_mut().slice_from(offset)
    }

    /// Split rows at `mid` into two views
    #[track_caller]
    pub fn split_at(&self, mid: usize) -> (View<'_, T, D>, View<'_, T, D>) {
        self.view().split_at(mid)
    }

    /// Split rows at `mid` into two disjoint mutable views
    #[track_caller]
    pub fn split_at_mut(&mut self, mid: usize) -> (ViewMut<'_, T, D>, ViewMut<'_, T, D>) {
        self.view_mut().split_at_mut(mid)
    }

    /// All elements in row major order
    pub fn as_slice(&self) -> &[T] {
        self.view().as_slice()
    }

    /// All elements in row major order, mutably
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.view_mut().into_slice()
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

    /// Exchange contents (allocator included) with `other`
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }
}

impl<'a, T: Clone, D: Dimension> View<'a, T, D> {
    /// Copy viewed elements into a new array
    /// # Errors
    /// Returns error if the storage could not be allocated.
    pub fn to_array(self) -> Result<Array<T, D>, NdError> {
        Array::from_shape_iter(self.shape(), self.iter().cloned())
    }
}

impl<T, D: Dimension, A: ArrayAllocator<T> + Default> Default for Array<T, D, A> {
    fn default() -> Self {
        Self::empty_in(A::default())
    }
}

impl<T: Clone, D: Dimension, A: ArrayAllocator<T>> Clone for Array<T, D, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| clone_failed(err))
    }

    /// Reuses current storage if element counts match
    fn clone_from(&mut self, source: &Self) {
        if self.numel() == source.numel() {
            self.as_mut_slice().clone_from_slice(source.as_slice());
            self.shape = source.shape;
        } else {
            *self = source
                .clone_in(self.alloc.clone())
                .unwrap_or_else(|err| clone_failed(err));
        }
    }
}

impl<T, D: Dimension, A: ArrayAllocator<T>> Drop for Array<T, D, A> {
    fn drop(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        let numel = self.numel();
        if Config::get().debug_array() {
            println!("Dropping array {:?} with {numel} elements at {:?}", self.shape, self.ptr);
        }
        unsafe {
            if core::mem::needs_drop::<T>() {
                for i in (0..numel).rev() {
                    self.alloc.destroy(self.ptr.add(i));
                }
            }
            self.alloc.deallocate(NonNull::new_unchecked(self.ptr), numel);
        }
    }
}

impl<T, U, D, A, B> PartialEq<Array<U, D, B>> for Array<T, D, A>
where
    T: PartialEq<U>,
    D: Dimension,
    A: ArrayAllocator<T>,
    B: ArrayAllocator<U>,
{
    fn eq(&self, other: &Array<U, D, B>) -> bool {
        self.shape == other.shape && self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, D: Dimension, A: ArrayAllocator<T>> Eq for Array<T, D, A> {}

impl<T, D: Dimension, A: ArrayAllocator<T>> Index<D> for Array<T, D, A> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: D) -> &T {
        match self.shape.offset(&index) {
            Some(offset) => unsafe { &*self.ptr.add(offset) },
            None => panic!("Index {index:?} out of bounds for shape {:?}", self.shape),
        }
    }
}

impl<T, D: Dimension, A: ArrayAllocator<T>> IndexMut<D> for Array<T, D, A> {
    #[track_caller]
    fn index_mut(&mut self, index: D) -> &mut T {
        match self.shape.offset(&index) {
            Some(offset) => unsafe { &mut *self.ptr.add(offset) },
            None => panic!("Index {index:?} out of bounds for shape {:?}", self.shape),
        }
    }
}

impl<T, A: ArrayAllocator<T>> Index<usize> for Array<T, Ix1, A> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T, A: ArrayAllocator<T>> IndexMut<usize> for Array<T, Ix1, A> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<'a, T, D: Dimension, A: ArrayAllocator<T>> IntoIterator for &'a Array<T, D, A> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, D: Dimension, A: ArrayAllocator<T>> IntoIterator for &'a mut Array<T, D, A> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
