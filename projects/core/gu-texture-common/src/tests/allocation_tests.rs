use crate::allocate::{
    allocate_align_64, allocate_zeroed, AllocateError, CacheLineAllocator, TextureAllocator,
    CACHE_LINE_SIZE,
};
use safe_allocator_api::RawAlloc;

/// Allocator that declines every request.
struct RefusingAllocator;

impl TextureAllocator for RefusingAllocator {
    fn allocate(&self, num_bytes: usize) -> Result<RawAlloc, AllocateError> {
        Err(AllocateError::Refused {
            requested: num_bytes,
        })
    }
}

#[test]
fn cache_line_allocator_aligns_to_64_bytes() {
    let allocation = CacheLineAllocator.allocate(100).unwrap();
    assert_eq!(allocation.as_ptr() as usize % CACHE_LINE_SIZE, 0);
    assert!(allocation.len() >= 100);
}

#[test]
fn zero_sized_requests_still_allocate() {
    let allocation = allocate_align_64(0).unwrap();
    assert!(allocation.len() >= 1);
}

#[test]
fn allocate_zeroed_clears_memory() {
    let allocation = allocate_zeroed(&CacheLineAllocator, 4096).unwrap();
    assert!(allocation.as_slice()[..4096].iter().all(|&byte| byte == 0));
}

#[test]
fn allocate_zeroed_forwards_refusal() {
    let result = allocate_zeroed(&RefusingAllocator, 16);
    assert_eq!(result.err(), Some(AllocateError::Refused { requested: 16 }));
}

#[test]
fn oversized_layout_is_reported() {
    let result = allocate_align_64(usize::MAX);
    assert!(matches!(result, Err(AllocateError::LayoutError(_))));
}
