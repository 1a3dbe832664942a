use ndspan::{config::Config, AlignedAllocator, Arena, ArrayAllocator, NdError, StdAllocator};
use std::mem::MaybeUninit;

#[test]
fn default_alignment_is_cache_line() -> Result<(), NdError> {
    let alloc = AlignedAllocator::<i32>::default();
    assert_eq!(alloc.alignment(), Config::get().alignment());
    if std::env::var("NDSPAN_ALIGN").is_err() {
        assert_eq!(alloc.alignment(), ndspan::CACHE_LINE_SIZE);
    }
    let p = alloc.allocate(4)?;
    assert_eq!(p.as_ptr() as usize % alloc.alignment(), 0);
    unsafe { alloc.deallocate(p, 4) };
    Ok(())
}

#[test]
fn custom_alignment() -> Result<(), NdError> {
    let alloc = AlignedAllocator::<i32>::with_alignment(8);
    assert_eq!(alloc.alignment(), 8);
    let p = alloc.allocate(4)?;
    assert_eq!(p.as_ptr() as usize % 8, 0);
    unsafe { alloc.deallocate(p, 4) };

    let alloc = AlignedAllocator::<u8>::with_alignment(4096);
    let p = alloc.allocate(1)?;
    assert_eq!(p.as_ptr() as usize % 4096, 0);
    unsafe { alloc.deallocate(p, 1) };
    Ok(())
}

#[test]
fn never_null() -> Result<(), NdError> {
    let alloc = AlignedAllocator::<i32>::new();
    for n in [0, 1, 4, 1000] {
        let p = alloc.allocate(n)?;
        assert!(!p.as_ptr().is_null());
        unsafe { alloc.deallocate(p, n) };
    }
    Ok(())
}

#[test]
fn trivial_elements_are_not_constructed() {
    let alloc = AlignedAllocator::<i32>::new();
    let mut data = 42;
    unsafe {
        alloc.construct(&mut data);
        assert_eq!(data, 42);
        alloc.destroy(&mut data);
    }
}

#[test]
fn std_allocator_constructs_everything() {
    let alloc = StdAllocator::<i32>::new();
    let mut data = 42;
    unsafe {
        alloc.construct(&mut data);
        assert_eq!(data, 0);
    }
}

#[test]
fn non_trivial_elements_are_constructed() {
    let alloc = AlignedAllocator::<String>::new();
    let mut data = MaybeUninit::<String>::uninit();
    unsafe {
        alloc.construct(data.as_mut_ptr());
        assert!((&(*data.as_ptr())).is_empty());
        alloc.destroy(data.as_mut_ptr());
    }
}

#[test]
fn equal_alignment_means_equal() {
    let alloc = AlignedAllocator::<i32>::new();
    let blloc = AlignedAllocator::<String>::new();
    assert!(alloc == blloc);
    assert_eq!(alloc.cast::<f64>(), alloc);
    assert!(StdAllocator::<u8>::new() == StdAllocator::<String>::new());
}

#[test]
fn different_alignment_means_not_equal() {
    let alloc = AlignedAllocator::<i32>::with_alignment(8);
    let blloc = AlignedAllocator::<String>::with_alignment(16);
    assert!(alloc != blloc);
}

#[test]
fn arena_allocators_equal_by_arena() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    let first = Arena::new(&mut a);
    let second = Arena::new(&mut b);
    assert!(first.allocator::<u8>() == first.allocator::<f32>());
    assert!(first.allocator::<u8>() != second.allocator::<u8>());
    assert_eq!(first.capacity(), 32);
    assert_eq!(second.remaining(), 32);
}

#[test]
fn arena_deallocation_is_noop() -> Result<(), NdError> {
    let mut buffer = [0u8; 64];
    let arena = Arena::new(&mut buffer);
    let alloc = arena.allocator::<u16>();
    let p = alloc.allocate(8)?;
    let used = arena.used();
    unsafe { alloc.deallocate(p, 8) };
    assert_eq!(arena.used(), used);
    Ok(())
}
