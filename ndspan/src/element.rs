/// Element types that an allocator can bring to life in fresh storage.
///
/// Needed only by [`Array::new`](crate::Array::new), every other constructor
/// writes its elements from values supplied by the caller.
///
/// # Safety
///
/// If `TRIVIAL` is `true`, every initialized bit pattern (in particular all
/// zeros) must be a valid value of `Self` and `Self` must not need drop.
/// Allocators rely on this to skip construction entirely.
pub unsafe trait Element: Sized {
    /// Fresh slots may be left as the allocator hands them out
    const TRIVIAL: bool;

    /// Value written by allocators that do construct elements
    fn default_value() -> Self;
}

macro_rules! impl_trivial {
    ($($t:ty => $zero:expr),* $(,)?) => {
        $(
            unsafe impl Element for $t {
                const TRIVIAL: bool = true;

                fn default_value() -> Self {
                    $zero
                }
            }
        )*
    };
}

impl_trivial!(
    u8 => 0, u16 => 0, u32 => 0, u64 => 0, u128 => 0, usize => 0,
    i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0,
    f32 => 0.0, f64 => 0.0,
);

#[cfg(feature = "half")]
impl_trivial!(half::f16 => half::f16::ZERO, half::bf16 => half::bf16::ZERO);

// Not every bit pattern is a valid bool or char
unsafe impl Element for bool {
    const TRIVIAL: bool = false;

    fn default_value() -> Self {
        false
    }
}

unsafe impl Element for char {
    const TRIVIAL: bool = false;

    fn default_value() -> Self {
        '\0'
    }
}

unsafe impl Element for String {
    const TRIVIAL: bool = false;

    fn default_value() -> Self {
        String::new()
    }
}

unsafe impl<T> Element for Vec<T> {
    const TRIVIAL: bool = false;

    fn default_value() -> Self {
        Vec::new()
    }
}

unsafe impl<T> Element for Option<T> {
    const TRIVIAL: bool = false;

    fn default_value() -> Self {
        None
    }
}
