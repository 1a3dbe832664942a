//! Allocators provide storage for [`Array`](crate::Array).
//!
//! [`AlignedAllocator`] is the default and hands out cache line aligned blocks,
//! [`StdAllocator`] uses natural alignment of the element type and
//! [`ArenaAllocator`] bumps through a caller supplied buffer.

use crate::config::Config;
use crate::element::Element;
use crate::error::NdError;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::alloc::Layout;

mod arena;

pub use arena::{Arena, ArenaAllocator};

/// Storage and element lifetime provider of an array.
///
/// # Safety
///
/// `allocate(n)` must return a block valid for reads and writes of `n`
/// elements of `T`, aligned to at least `align_of::<T>()`, which stays valid
/// until it is passed to `deallocate` with the same `n`.
/// If `construct` does not write the element, the block must already hold
/// a valid `T` in that slot (all zeros for [`Element::TRIVIAL`] types).
/// Allocators that compare equal must be able to deallocate each other's blocks.
pub unsafe trait ArrayAllocator<T>: Clone {
    /// Alignment of blocks handed out by this allocator
    fn alignment(&self) -> usize;

    /// Get storage for `n` elements.
    /// # Errors
    /// Returns [`NdError::CapacityOverflow`] if `n` elements do not form
    /// a valid layout and [`NdError::AllocationError`] if the system
    /// could not provide the block.
    fn allocate(&self, n: usize) -> Result<NonNull<T>, NdError>;

    /// Release storage for `n` elements.
    /// # Safety
    /// `ptr` must come from `allocate(n)` of this allocator (or one equal to it)
    /// and all elements must be already destroyed.
    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize);

    /// Bring the slot at `ptr` to a valid default state.
    /// # Safety
    /// `ptr` must point into a block from `allocate` and the slot must not hold
    /// a live element.
    unsafe fn construct(&self, ptr: *mut T)
    where
        T: Element,
    {
        ptr.write(T::default_value());
    }

    /// Drop the element at `ptr` in place.
    /// # Safety
    /// `ptr` must point to a live element, which is dead afterwards.
    unsafe fn destroy(&self, ptr: *mut T) {
        core::ptr::drop_in_place(ptr);
    }
}

/// Returns layout of `n` elements of `T` aligned to at least `align`
fn array_layout<T>(n: usize, align: usize) -> Result<Layout, NdError> {
    let align = align.max(core::mem::align_of::<T>());
    n.checked_mul(core::mem::size_of::<T>())
        .and_then(|size| Layout::from_size_align(size, align).ok())
        .ok_or(NdError::CapacityOverflow { numel: n, align })
}

/// Pointer that is aligned and non null, but points to no storage
fn dangling<T>(layout: Layout) -> NonNull<T> {
    NonNull::new(core::ptr::null_mut::<u8>().wrapping_add(layout.align()).cast::<T>())
        .unwrap_or(NonNull::dangling())
}

/// Allocator handing out blocks aligned to a fixed alignment,
/// by default [`Config::alignment`] which is
/// [`CACHE_LINE_SIZE`](crate::CACHE_LINE_SIZE) unless `NDSPAN_ALIGN` says otherwise.
///
/// Blocks are zero filled, constructing [`Element::TRIVIAL`] elements is skipped.
pub struct AlignedAllocator<T> {
    align: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> AlignedAllocator<T> {
    /// Allocator with configured default alignment
    #[must_use]
    pub fn new() -> Self {
        Self::with_alignment(Config::get().alignment())
    }

    /// Allocator with custom alignment.
    /// # Panics
    /// Panics if `align` is not a power of two.
    #[track_caller]
    #[must_use]
    pub fn with_alignment(align: usize) -> Self {
        assert!(
            align.is_power_of_two(),
            "Alignment must be a power of two, got {align}"
        );
        Self {
            align,
            _marker: PhantomData,
        }
    }

    /// Same alignment for a different element type
    #[must_use]
    pub fn cast<U>(&self) -> AlignedAllocator<U> {
        AlignedAllocator {
            align: self.align,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for AlignedAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for AlignedAllocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AlignedAllocator<T> {}

impl<T> core::fmt::Debug for AlignedAllocator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("AlignedAllocator({})", self.align))
    }
}

impl<T, U> PartialEq<AlignedAllocator<U>> for AlignedAllocator<T> {
    fn eq(&self, other: &AlignedAllocator<U>) -> bool {
        self.align == other.align
    }
}

impl<T> Eq for AlignedAllocator<T> {}

unsafe impl<T> ArrayAllocator<T> for AlignedAllocator<T> {
    fn alignment(&self) -> usize {
        self.align
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, NdError> {
        let layout = array_layout::<T>(n, self.align)?;
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        // Zeroed, so that skipped construction never exposes uninitialized memory
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        if Config::get().debug_alloc() {
            println!(
                "Allocated {} bytes aligned to {} at {ptr:?}",
                layout.size(),
                layout.align()
            );
        }
        NonNull::new(ptr.cast::<T>()).ok_or(NdError::AllocationError { layout })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let Ok(layout) = array_layout::<T>(n, self.align) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }
        if Config::get().debug_alloc() {
            println!("Deallocating {} bytes at {ptr:?}", layout.size());
        }
        std::alloc::dealloc(ptr.as_ptr().cast(), layout);
    }

    unsafe fn construct(&self, ptr: *mut T)
    where
        T: Element,
    {
        if !T::TRIVIAL {
            ptr.write(T::default_value());
        }
    }
}

/// Allocator using natural alignment of `T`.
///
/// Always constructs elements, so arrays of numbers built from shape alone are zeroed.
pub struct StdAllocator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> StdAllocator<T> {
    /// New allocator, all instances are interchangeable
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for StdAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for StdAllocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StdAllocator<T> {}

impl<T> core::fmt::Debug for StdAllocator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("StdAllocator")
    }
}

impl<T, U> PartialEq<StdAllocator<U>> for StdAllocator<T> {
    fn eq(&self, _: &StdAllocator<U>) -> bool {
        true
    }
}

impl<T> Eq for StdAllocator<T> {}

unsafe impl<T> ArrayAllocator<T> for StdAllocator<T> {
    fn alignment(&self) -> usize {
        core::mem::align_of::<T>()
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, NdError> {
        let layout = array_layout::<T>(n, 1)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr.cast::<T>()).ok_or(NdError::AllocationError { layout })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        if let Ok(layout) = array_layout::<T>(n, 1) {
            if layout.size() != 0 {
                std::alloc::dealloc(ptr.as_ptr().cast(), layout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AlignedAllocator, ArrayAllocator, StdAllocator};
    use crate::NdError;

    #[test]
    fn aligned_blocks() -> Result<(), NdError> {
        let alloc = AlignedAllocator::<u8>::with_alignment(256);
        let ptr = alloc.allocate(3)?;
        assert_eq!(ptr.as_ptr() as usize % 256, 0);
        // Fresh blocks are zeroed
        assert_eq!(unsafe { *ptr.as_ptr().add(2) }, 0);
        unsafe { alloc.deallocate(ptr, 3) };
        Ok(())
    }

    #[test]
    fn zero_sized_requests() -> Result<(), NdError> {
        let alloc = AlignedAllocator::<f32>::with_alignment(64);
        let ptr = alloc.allocate(0)?;
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
        unsafe { alloc.deallocate(ptr, 0) };
        let alloc = StdAllocator::<()>::new();
        let ptr = alloc.allocate(10)?;
        unsafe { alloc.deallocate(ptr, 10) };
        Ok(())
    }

    #[test]
    fn capacity_overflow() {
        let alloc = AlignedAllocator::<u64>::with_alignment(64);
        assert_eq!(
            alloc.allocate(usize::MAX / 4),
            Err(NdError::CapacityOverflow {
                numel: usize::MAX / 4,
                align: 64
            })
        );
        assert!(matches!(
            StdAllocator::<u32>::new().allocate(usize::MAX),
            Err(NdError::CapacityOverflow { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn alignment_must_be_power_of_two() {
        let _ = AlignedAllocator::<u8>::with_alignment(48);
    }
}
