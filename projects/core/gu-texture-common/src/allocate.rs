//! Memory allocation for texture and palette buffers.
//!
//! Every buffer owned by a texture or palette is obtained through a [`TextureAllocator`], which
//! is passed explicitly to the operations that allocate. This allows arena-backed or pooled
//! strategies to be plugged in without any global state.
//!
//! ## Useful APIs
//!
//! [`TextureAllocator`]: The allocation seam.
//! [`CacheLineAllocator`]: Default allocator, hands out 64-byte aligned memory.
//! [`allocate_zeroed`]: Allocates through any [`TextureAllocator`] and clears the memory.
//!
//! ## Safety
//!
//! All allocation operations are wrapped in safe APIs. Memory is deallocated when the
//! [`RawAlloc`] returned by an allocator is dropped, so a failure part way through a
//! multi-step operation releases everything allocated before it.

use core::alloc::{Layout, LayoutError};
use safe_allocator_api::prelude::*;
use safe_allocator_api::RawAlloc;
use thiserror::Error;

/// Alignment of allocations made by [`CacheLineAllocator`].
///
/// The device only requires 16-byte alignment for pixel data; a full cache line also keeps
/// CPU-side transforms from straddling lines.
pub const CACHE_LINE_SIZE: usize = 64;

/// Source of the memory backing texture and palette buffers.
pub trait TextureAllocator {
    /// Allocates `num_bytes` bytes. The contents of the returned memory are unspecified.
    fn allocate(&self, num_bytes: usize) -> Result<RawAlloc, AllocateError>;
}

impl<T: TextureAllocator + ?Sized> TextureAllocator for &T {
    #[inline]
    fn allocate(&self, num_bytes: usize) -> Result<RawAlloc, AllocateError> {
        (**self).allocate(num_bytes)
    }
}

/// The default [`TextureAllocator`], backed by the global allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheLineAllocator;

impl TextureAllocator for CacheLineAllocator {
    #[inline]
    fn allocate(&self, num_bytes: usize) -> Result<RawAlloc, AllocateError> {
        allocate_align_64(num_bytes)
    }
}

/// Allocates data with an alignment of 64 bytes.
///
/// # Parameters
///
/// - `num_bytes`: The number of bytes to allocate
///
/// # Returns
///
/// A [`RawAlloc`] containing the allocated data
pub fn allocate_align_64(num_bytes: usize) -> Result<RawAlloc, AllocateError> {
    // Zero sized layouts are not supported by the underlying allocator.
    let layout = Layout::from_size_align(num_bytes.max(1), CACHE_LINE_SIZE)?;
    Ok(RawAlloc::new(layout)?)
}

/// Allocates `num_bytes` through `allocator` and fills the memory with zeroes.
///
/// # Examples
///
/// ```
/// use gu_texture_common::allocate::{allocate_zeroed, CacheLineAllocator};
///
/// let buffer = allocate_zeroed(&CacheLineAllocator, 128)?;
/// assert!(buffer.as_slice()[..128].iter().all(|&byte| byte == 0));
/// # Ok::<(), gu_texture_common::allocate::AllocateError>(())
/// ```
pub fn allocate_zeroed<A: TextureAllocator + ?Sized>(
    allocator: &A,
    num_bytes: usize,
) -> Result<RawAlloc, AllocateError> {
    let mut allocation = allocator.allocate(num_bytes)?;
    if allocation.len() < num_bytes {
        return Err(AllocateError::TooSmall {
            requested: num_bytes,
            actual: allocation.len(),
        });
    }
    allocation.as_mut_slice().fill(0);
    Ok(allocation)
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to `num_bytes` being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// An error that occurred while allocating memory.
    #[error(transparent)]
    AllocationFailed(#[from] AllocError),

    /// A custom allocator declined the request.
    #[error("Allocator refused a request for {requested} bytes")]
    Refused {
        /// The number of bytes requested
        requested: usize,
    },

    /// A custom allocator returned less memory than requested.
    #[error("Allocator returned {actual} bytes for a request of {requested} bytes")]
    TooSmall {
        /// The number of bytes requested
        requested: usize,
        /// The number of bytes returned
        actual: usize,
    },
}
