//! Allocation accounting
//!
//! [`CountingAllocator`] forwards to the system allocator and counts every
//! allocation made by the current thread. Install it in a binary or test crate
//! with `#[global_allocator]`; the runner snapshots the counters around the
//! timed loop.
//!
//! ```rust,ignore
//! #[global_allocator]
//! static ALLOCATOR: pq_bench::alloc::CountingAllocator = pq_bench::alloc::CountingAllocator;
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

thread_local! {
    static ALLOCATIONS: Cell<u64> = const { Cell::new(0) };
    static ALLOCATED_BYTES: Cell<u64> = const { Cell::new(0) };
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Global allocator that counts allocations per thread
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingAllocator;

impl CountingAllocator {
    #[inline]
    fn record(size: usize) {
        INSTALLED.store(true, Ordering::Relaxed);
        // Counters are unavailable while the thread is being torn down
        let _ = ALLOCATIONS.try_with(|count| count.set(count.get() + 1));
        let _ = ALLOCATED_BYTES.try_with(|bytes| bytes.set(bytes.get() + size as u64));
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        Self::record(layout.size());
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        Self::record(layout.size());
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        Self::record(new_size);
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

/// Allocation counters of the current thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocStats {
    /// Number of allocations, reallocations included
    pub allocations: u64,
    /// Total bytes requested
    pub bytes: u64,
}

impl AllocStats {
    /// Counters accumulated between `earlier` and `self`
    pub fn since(&self, earlier: &AllocStats) -> AllocStats {
        AllocStats {
            allocations: self.allocations.saturating_sub(earlier.allocations),
            bytes: self.bytes.saturating_sub(earlier.bytes),
        }
    }
}

/// Whether [`CountingAllocator`] is the active global allocator
///
/// Becomes `true` after the first allocation routed through it.
pub fn is_active() -> bool {
    INSTALLED.load(Ordering::Relaxed)
}

/// Current counters of the calling thread
pub fn snapshot() -> AllocStats {
    AllocStats {
        allocations: ALLOCATIONS.try_with(Cell::get).unwrap_or(0),
        bytes: ALLOCATED_BYTES.try_with(Cell::get).unwrap_or(0),
    }
}
