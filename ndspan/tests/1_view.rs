use ndspan::{Dimension, View, ViewMut};

#[test]
fn pointer_shape_pair() {
    let data = [0i32; 4];
    let view = View::from_slice([2, 2], &data);
    assert_eq!(view.dim(0), 2);
    assert_eq!(view.dim(1), 2);
    assert_eq!(view.as_ptr(), data.as_ptr());
}

#[test]
fn index_1d() {
    let data = [3, 1, 4, 1];
    let view = View::from_slice([4], &data);
    assert_eq!(view.dim(0), 4);
    assert_eq!(*view.at(0), 3);
    assert_eq!(*view.at(1), 1);
    assert_eq!(view[2], 4);
    assert_eq!(view[[3]], 1);
    assert_eq!(view.get(4), None);
}

#[test]
fn index_2d() {
    let data = [3, 1, 4, 1, 5, 9];
    let view = View::from_slice([2, 3], &data);
    assert_eq!(view.shape(), [2, 3]);
    assert_eq!(view.at(0).as_slice(), [3, 1, 4]);
    assert_eq!(view.at(1).as_slice(), [1, 5, 9]);
    assert_eq!(*view.at(1).at(2), 9);
    assert_eq!(view[[0, 1]], 1);
    assert_eq!(view[[1, 0]], 1);
    assert!(view.get(2).is_none());
}

#[test]
fn index_3d() {
    let data = [
        3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, //
        9, 7, 9, 3, 2, 3, 8, 4, 6, 2, 6, 4,
    ];
    let view = View::from_slice([2, 3, 4], &data);
    assert_eq!(view.shape(), [2, 3, 4]);
    for i in 0..2 {
        for j in 0..3 {
            for k in 0..4 {
                assert_eq!(*view.at(i).at(j).at(k), data[i * 12 + j * 4 + k]);
                assert_eq!(view[[i, j, k]], data[i * 12 + j * 4 + k]);
            }
        }
    }
    assert_eq!(view.at(1).at(2).as_slice(), [6, 2, 6, 4]);
    assert_eq!(unsafe { *view.at_unchecked(0).at_unchecked(1).at_unchecked(1) }, 9);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn index_out_of_range() {
    let data = [0u8; 6];
    let view = View::from_slice([2, 3], &data);
    let _ = view.at(2);
}

#[test]
#[should_panic(expected = "needs 6 elements")]
fn shape_must_match_data() {
    let data = [0u8; 5];
    let _ = View::from_slice([2, 3], &data);
}

#[test]
fn modify_through_index() {
    let mut data = [0; 4];
    let mut view = ViewMut::from_slice_mut([4], &mut data);
    assert_eq!(view.dim(0), 4);
    *view.at_mut(0) = 1;
    *view.at_mut(1) = 2;
    view[2] = 3;
    view[[3]] = 4;
    assert_eq!(view.as_slice(), [1, 2, 3, 4]);

    let mut data = [0; 6];
    let mut view = ViewMut::from_slice_mut([2, 3], &mut data);
    *view.at_mut(1).at_mut(2) = 7;
    view[[0, 1]] = 5;
    if let Some(mut row) = view.get_mut(1) {
        row[0] = 2;
    }
    assert!(view.get_mut(2).is_none());
    assert_eq!(data, [0, 5, 0, 2, 0, 7]);
}

#[test]
fn convert_to_read_only() {
    let mut data = [0; 4];
    let view = ViewMut::from_slice_mut([4], &mut data);
    let ptr = view.as_ptr();
    let shape = view.shape();
    let cview = view.view();
    assert_eq!(cview.shape(), shape);
    assert_eq!(cview.as_ptr(), ptr);
    let cview: View<i32, _> = view.into();
    assert_eq!(cview.shape(), shape);
    assert_eq!(cview.as_ptr(), ptr);
}

#[test]
fn element_count() {
    let data = [0; 24];
    let view = View::from_slice([4, 3, 2], &data);
    assert_eq!(view.numel(), 24);
    assert!(!view.is_empty());
}

#[test]
fn dim_count() {
    let view = View::<i32, [usize; 6]>::from_slice([0; 6], &[]);
    assert_eq!(view.ndim(), 6);
    assert_eq!(<[usize; 6] as Dimension>::NDIM, 6);
    assert!(view.is_empty());
}

#[test]
fn iterate_regardless_of_rank() {
    let data = [3, 1, 4, 1, 5, 9];
    let view = View::from_slice([3, 2], &data);
    assert!(view.iter().eq(data.iter()));
    let mut count = 0;
    for x in view {
        assert!(data.contains(x));
        count += 1;
    }
    assert_eq!(count, 6);
}

#[test]
fn modify_through_iterator() {
    let mut data = [0; 4];
    let mut view = ViewMut::from_slice_mut([4], &mut data);
    for (i, x) in view.iter_mut().enumerate() {
        *x = i;
    }
    assert_eq!(view.as_slice(), [0, 1, 2, 3]);
    for (i, x) in view.iter_mut().rev().enumerate() {
        *x = i;
    }
    assert_eq!(data, [3, 2, 1, 0]);
}

#[test]
fn reverse_iteration() {
    let data = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8];
    let view = View::from_slice([2, 3, 2], &data);
    let reversed: Vec<i32> = view.iter().rev().copied().collect();
    assert_eq!(reversed, [8, 5, 3, 5, 6, 2, 9, 5, 1, 4, 1, 3]);
    assert!(view.iter().rev().eq(view.flatten().as_slice().iter().rev()));
    assert!(view.at(1).iter().rev().eq([8, 5, 3, 5, 6, 2].iter()));
}

#[test]
fn reshape_and_slice() {
    let data: Vec<u32> = (0..24).collect();
    let view = View::from_slice([2, 3, 4], &data);
    let flat = view.flatten();
    assert_eq!(flat.shape(), [24]);
    let mat = view.reshape([6, 4]);
    assert_eq!(mat.at(5).as_slice(), [20, 21, 22, 23]);
    let rows = mat.slice(1, 2);
    assert_eq!(rows.shape(), [2, 4]);
    assert_eq!(rows.as_slice(), [4, 5, 6, 7, 8, 9, 10, 11]);
    let tail = mat.slice_from(4);
    assert_eq!(tail.shape(), [2, 4]);
    assert_eq!(*tail.at(0).at(0), 16);
    let (head, tail) = view.split_at(1);
    assert_eq!(head.numel() + tail.numel(), 24);
    assert_eq!(*tail.at(0).at(0).at(0), 12);
    // Empty slices at the end are fine
    assert!(mat.slice(6, 0).is_empty());
    assert!(mat.slice_from(6).as_slice().is_empty());
}

#[test]
#[should_panic(expected = "Cannot reshape")]
fn reshape_needs_same_count() {
    let data = [0u8; 6];
    let _ = View::from_slice([2, 3], &data).reshape([4, 2]);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn slice_out_of_range() {
    let data = [0u8; 6];
    let _ = View::from_slice([3, 2], &data).slice(2, 2);
}

const HIGH_BIT: usize = 1 << (usize::BITS - 1);

// [2, HIGH_BIT] wraps to 0 elements without overflow checks
#[test]
#[should_panic(expected = "overflows usize")]
fn from_slice_rejects_overflowing_shape() {
    let data: [u8; 0] = [];
    let _ = View::from_slice([2, HIGH_BIT], &data);
}

// [2, HIGH_BIT + 2] wraps to 4 elements without overflow checks
#[test]
#[should_panic(expected = "overflows usize")]
fn reshape_rejects_overflowing_shape() {
    let backing = [1u32, 2, 3, 4, 0xDEAD];
    let view = View::from_slice([4], &backing[..4]);
    let _ = *view.reshape([2, HIGH_BIT + 2]).at(1).at(2);
}

#[test]
#[should_panic(expected = "overflows usize")]
fn reshape_mut_rejects_overflowing_shape() {
    let mut backing = [0u32; 5];
    let view = ViewMut::from_slice_mut([4], &mut backing[..4]);
    let mut wide = view.reshape([2, HIGH_BIT + 2]);
    *wide.at_mut(1).at_mut(2) = 7;
}

#[test]
fn fill_and_split() {
    let mut data = [0i64; 8];
    let view = ViewMut::from_slice_mut([4, 2], &mut data);
    let (mut head, mut tail) = view.split_at_mut(1);
    head.fill(1);
    tail.fill(2);
    assert_eq!(data, [1, 1, 2, 2, 2, 2, 2, 2]);
}

#[test]
fn reborrow_keeps_view_usable() {
    let mut data = [0u16; 6];
    let mut view = ViewMut::from_slice_mut([2, 3], &mut data);
    {
        let mut row = view.reborrow().into_at(1);
        row[0] = 4;
    }
    let mut flat = view.reborrow().flatten();
    flat[5] = 6;
    assert_eq!(view.as_slice(), [0, 0, 0, 4, 0, 6]);
    let slice = view.into_slice();
    slice[0] = 1;
    assert_eq!(data, [1, 0, 0, 4, 0, 6]);
}

#[test]
fn display() {
    let data = [1, 0, 0, 1];
    let view = View::from_slice([2, 2], &data);
    assert_eq!(view.to_string(), "[[1,0],[0,1]]");
    let mut data = [1.5f32, 2.];
    let view = ViewMut::from_slice_mut([1, 2], &mut data);
    assert_eq!(view.to_string(), "[[1.5,2]]");
}

#[test]
fn display_empty() {
    let view = View::<i32, [usize; 3]>::from_slice([0; 3], &[]);
    assert_eq!(view.to_string(), "[]");
}

#[test]
fn split_across_threads() {
    let mut data = vec![0u64; 64];
    let view = ViewMut::from_slice_mut([8, 8], &mut data);
    let (mut top, mut bottom) = view.split_at_mut(4);
    std::thread::scope(|s| {
        s.spawn(move || top.fill(1));
        s.spawn(move || {
            for (i, x) in bottom.iter_mut().enumerate() {
                *x = i as u64;
            }
        });
    });
    assert_eq!(data[..32].iter().sum::<u64>(), 32);
    assert_eq!(data[32..].iter().sum::<u64>(), (0..32).sum::<u64>());
}
