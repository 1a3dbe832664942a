//! Nested bracket rendering, `[[1,0],[0,1]]` for a 2x2 identity.

use crate::array::Array;
use crate::allocator::ArrayAllocator;
use crate::dimension::Dimension;
use crate::view::{View, ViewMut};
use core::fmt::{Debug, Display, Formatter, Result};

type ElementFmt<T> = fn(&T, &mut Formatter<'_>) -> Result;

pub(crate) fn fmt_nested<T>(
    f: &mut Formatter<'_>,
    shape: &[usize],
    data: &[T],
    fmt_element: ElementFmt<T>,
) -> Result {
    // Any zero extent renders as a single empty list
    if data.is_empty() {
        return f.write_str("[]");
    }
    fmt_block(f, shape, data, fmt_element)
}

fn fmt_block<T>(f: &mut Formatter<'_>, shape: &[usize], data: &[T], fmt_element: ElementFmt<T>) -> Result {
    f.write_str("[")?;
    if shape.len() == 1 {
        for (i, x) in data.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            fmt_element(x, f)?;
        }
    } else {
        let step: usize = shape[1..].iter().product();
        for (i, block) in data.chunks(step).enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            fmt_block(f, &shape[1..], block, fmt_element)?;
        }
    }
    f.write_str("]")
}

impl<T: Display, D: Dimension> Display for View<'_, T, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        fmt_nested(f, self.shape().slice(), self.as_slice(), Display::fmt)
    }
}

impl<T: Debug, D: Dimension> Debug for View<'_, T, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        fmt_nested(f, self.shape().slice(), self.as_slice(), Debug::fmt)
    }
}

impl<T: Display, D: Dimension> Display for ViewMut<'_, T, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(&self.view(), f)
    }
}

impl<T: Debug, D: Dimension> Debug for ViewMut<'_, T, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Debug::fmt(&self.view(), f)
    }
}

impl<T: Display, D: Dimension, A: ArrayAllocator<T>> Display for Array<T, D, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(&self.view(), f)
    }
}

impl<T: Debug, D: Dimension, A: ArrayAllocator<T>> Debug for Array<T, D, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Debug::fmt(&self.view(), f)
    }
}

#[cfg(test)]
mod tests {
    use crate::View;

    #[test]
    fn nested_brackets() {
        let data = [1, 0, 0, 1];
        assert_eq!(View::from_slice([2, 2], &data).to_string(), "[[1,0],[0,1]]");
        assert_eq!(View::from_slice([4], &data).to_string(), "[1,0,0,1]");
        let data: Vec<i32> = (0..8).collect();
        assert_eq!(
            View::from_slice([2, 2, 2], &data).to_string(),
            "[[[0,1],[2,3]],[[4,5],[6,7]]]"
        );
    }

    #[test]
    fn empty_renders_as_single_list() {
        let view = View::<i32, _>::from_slice([0, 0, 0], &[]);
        assert_eq!(view.to_string(), "[]");
        let view = View::<i32, _>::from_slice([3, 0], &[]);
        assert_eq!(view.to_string(), "[]");
    }

    #[test]
    fn element_formatting_is_forwarded() {
        let data = [0.5f32, 1.26];
        let view = View::from_slice([2], &data);
        assert_eq!(format!("{view:.1}"), "[0.5,1.3]");
        let data = ["a", "b"];
        assert_eq!(format!("{:?}", View::from_slice([1, 2], &data)), "[[\"a\",\"b\"]]");
    }
}
