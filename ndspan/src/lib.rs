//! # ndspan
//!
//! ndspan is a small library of n-dimensional arrays with rank fixed at compile
//! time. [`Array`] owns contiguous row major storage obtained from an allocator,
//! [`View`] and [`ViewMut`] borrow it. Indexing peels off the first dimension,
//! so `x.at(i).at(j)` on a 3D array yields a 1D view.
//!
//! Storage is by default aligned to [`CACHE_LINE_SIZE`] by [`AlignedAllocator`],
//! any type implementing [`ArrayAllocator`] can be plugged in instead.
//!
//! ```
//! use ndspan::{Array, View};
//! let x: Array<f32, [usize; 3]> = Array::from_shape_iter([2, 2, 2], (0..8).map(|x| x as f32))?;
//! assert_eq!(x.at(1).at(0).as_slice(), [4f32, 5.]);
//! assert_eq!(x.as_ptr() as usize % ndspan::CACHE_LINE_SIZE, 0);
//!
//! let data = [1, 0, 0, 1];
//! let eye = View::from_slice([2, 2], &data);
//! assert_eq!(eye.to_string(), "[[1,0],[0,1]]");
//! # Ok::<(), ndspan::NdError>(())
//! ```
//!
#![forbid(rustdoc::broken_intra_doc_links)]
#![forbid(rustdoc::private_intra_doc_links)]
#![forbid(missing_docs)]
#![forbid(rustdoc::missing_crate_level_docs)]
#![forbid(rustdoc::private_doc_tests)]
#![forbid(rustdoc::invalid_codeblock_attributes)]
#![forbid(rustdoc::invalid_html_tags)]
#![forbid(rustdoc::invalid_rust_codeblocks)]
#![forbid(rustdoc::bare_urls)]
#![forbid(rustdoc::unescaped_backticks)]
#![forbid(rustdoc::redundant_explicit_links)]

mod allocator;
mod array;
/// Environment configuration, see [Config](config::Config)
pub mod config;
mod dimension;
mod display;
mod element;
mod error;
mod view;

pub use allocator::{AlignedAllocator, Arena, ArenaAllocator, ArrayAllocator, StdAllocator};
pub use array::Array;
pub use config::CACHE_LINE_SIZE;
pub use dimension::{Dimension, Ix1, Ix2, Ix3, Ix4, Ix5, Ix6};
pub use element::Element;
pub use error::NdError;
pub use view::{View, ViewMut};
