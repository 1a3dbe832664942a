use std::alloc::Layout;

/// Enumeration representing the errors that can occur while building arrays.
///
/// Shape mismatches, out of range indices and invalid slices are programmer
/// errors and panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NdError {
    /// Allocator could not provide a block for this layout
    AllocationError {
        /// Requested layout
        layout: Layout,
    },
    /// Product of shape's extents does not fit into usize
    ShapeOverflow {
        /// Requested shape
        shape: Box<[usize]>,
    },
    /// Element count times element size does not fit into a layout
    CapacityOverflow {
        /// Requested number of elements
        numel: usize,
        /// Requested alignment
        align: usize,
    },
}

impl std::fmt::Display for NdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NdError::AllocationError { layout } => f.write_fmt(format_args!(
                "Allocation error: could not allocate {} bytes aligned to {}",
                layout.size(),
                layout.align()
            )),
            NdError::ShapeOverflow { shape } => f.write_fmt(format_args!(
                "Shape overflow: number of elements of shape {shape:?} does not fit into usize"
            )),
            NdError::CapacityOverflow { numel, align } => f.write_fmt(format_args!(
                "Capacity overflow: {numel} elements aligned to {align} do not form a valid layout"
            )),
        }
    }
}

impl std::error::Error for NdError {}
