use super::{array_layout, ArrayAllocator};
use crate::config::Config;
use crate::error::NdError;
use core::cell::Cell;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::alloc::Layout;

/// Fixed byte buffer handed out front to back.
///
/// Memory is never reclaimed, it becomes available again only after
/// the arena (and with it every array borrowing it) is gone.
pub struct Arena<'b> {
    base: NonNull<u8>,
    capacity: usize,
    used: Cell<usize>,
    _buffer: PhantomData<&'b mut [u8]>,
}

impl<'b> Arena<'b> {
    /// Arena over caller supplied buffer
    pub fn new(buffer: &'b mut [u8]) -> Self {
        Self {
            capacity: buffer.len(),
            base: NonNull::from(buffer).cast(),
            used: Cell::new(0),
            _buffer: PhantomData,
        }
    }

    /// Pointer to the start of the buffer
    pub fn as_ptr(&self) -> *const u8 {
        self.base.as_ptr()
    }

    /// Size of the buffer in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out so far, including alignment padding
    pub fn used(&self) -> usize {
        self.used.get()
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        self.capacity - self.used.get()
    }

    /// Allocator drawing from this arena
    pub fn allocator<T>(&self) -> ArenaAllocator<'_, T> {
        ArenaAllocator {
            arena: self,
            _marker: PhantomData,
        }
    }

    fn bump(&self, layout: Layout) -> Option<NonNull<u8>> {
        let used = self.used.get();
        let pad = self.base.as_ptr().wrapping_add(used).align_offset(layout.align());
        let begin = used.checked_add(pad)?;
        let end = begin.checked_add(layout.size())?;
        if end > self.capacity {
            return None;
        }
        self.used.set(end);
        // begin <= capacity, so the pointer stays inside the buffer
        NonNull::new(unsafe { self.base.as_ptr().add(begin) })
    }
}

impl core::fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!(
            "Arena({}/{} bytes used)",
            self.used(),
            self.capacity
        ))
    }
}

/// Allocator bumping through an [`Arena`], deallocation is a no-op.
pub struct ArenaAllocator<'a, T> {
    arena: &'a Arena<'a>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> ArenaAllocator<'a, T> {
    /// Arena this allocator draws from
    pub fn arena(&self) -> &'a Arena<'a> {
        self.arena
    }
}

impl<T> Clone for ArenaAllocator<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaAllocator<'_, T> {}

impl<T> core::fmt::Debug for ArenaAllocator<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ArenaAllocator").field(self.arena).finish()
    }
}

impl<T, U> PartialEq<ArenaAllocator<'_, U>> for ArenaAllocator<'_, T> {
    fn eq(&self, other: &ArenaAllocator<'_, U>) -> bool {
        core::ptr::eq(self.arena.as_ptr(), other.arena.as_ptr())
    }
}

impl<T> Eq for ArenaAllocator<'_, T> {}

unsafe impl<T> ArrayAllocator<T> for ArenaAllocator<'_, T> {
    fn alignment(&self) -> usize {
        core::mem::align_of::<T>()
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, NdError> {
        let layout = array_layout::<T>(n, 1)?;
        let ptr = self
            .arena
            .bump(layout)
            .ok_or(NdError::AllocationError { layout })?;
        if Config::get().debug_alloc() {
            println!(
                "Arena allocated {} bytes at {ptr:?}, {} bytes remaining",
                layout.size(),
                self.arena.remaining()
            );
        }
        Ok(ptr.cast())
    }

    unsafe fn deallocate(&self, _ptr: NonNull<T>, _n: usize) {}
}

#[cfg(test)]
mod tests {
    use super::Arena;
    use crate::{ArrayAllocator, NdError};

    #[test]
    fn bumps_front_to_back() -> Result<(), NdError> {
        let mut buffer = [0u8; 64];
        let arena = Arena::new(&mut buffer);
        let alloc = arena.allocator::<u32>();
        let a = alloc.allocate(4)?;
        let b = alloc.allocate(2)?;
        assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 16);
        assert_eq!(b.as_ptr() as usize % 4, 0);
        assert!(arena.used() >= 24);
        Ok(())
    }

    #[test]
    fn exhausted_arena_fails() {
        let mut buffer = [0u8; 16];
        let arena = Arena::new(&mut buffer);
        let alloc = arena.allocator::<u8>();
        assert!(alloc.allocate(16).is_ok());
        assert!(matches!(alloc.allocate(1), Err(NdError::AllocationError { .. })));
        assert_eq!(arena.remaining(), 0);
    }
}
