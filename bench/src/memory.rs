//! Memory profiling utilities using dhat.
//!
//! A built world owns all of its storage, so a steady frame loop should allocate nothing. These
//! helpers measure that: take a [`MemoryProfiler`], snapshot after building the world, run frames,
//! and compare.
//!
//! Profiling adds overhead and is only compiled in with the `memory_profiling` feature. The bench
//! binary must also install `dhat::Alloc` as its global allocator.
//!
//! ```bash
//! cargo bench -p sparse_bench --features memory_profiling
//! ```
//!
//! Load the generated `dhat-heap.json` into
//! <https://nnethercote.github.io/dh_view/dh_view.html> for the full profile.

use std::mem::size_of;

use sparse_engine::ecs::Entity;

/// Heap statistics, either cumulative or the difference between two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Total bytes allocated.
    pub bytes_allocated: u64,
    /// Total number of allocations.
    pub allocation_count: u64,
    /// Peak heap usage in bytes.
    pub peak_bytes: u64,
}

impl MemoryStats {
    /// The allocations made between `earlier` and `self`. Peak is carried from `self`.
    pub fn since(&self, earlier: &MemoryStats) -> MemoryStats {
        MemoryStats {
            bytes_allocated: self.bytes_allocated.saturating_sub(earlier.bytes_allocated),
            allocation_count: self.allocation_count.saturating_sub(earlier.allocation_count),
            peak_bytes: self.peak_bytes,
        }
    }

    /// Bytes allocated per entity.
    pub fn bytes_per_entity(&self, entity_count: usize) -> f64 {
        if entity_count == 0 {
            0.0
        } else {
            self.bytes_allocated as f64 / entity_count as f64
        }
    }
}

impl std::fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "allocated: {} bytes ({} allocs), peak: {} bytes",
            self.bytes_allocated, self.allocation_count, self.peak_bytes
        )
    }
}

/// The bytes a component table of `C` preallocates for `capacity` entities: the sparse index, the
/// dense entity array, and the values.
pub const fn table_footprint<C>(capacity: usize) -> usize {
    capacity * (size_of::<u32>() + size_of::<Entity>() + size_of::<C>())
}

/// Active heap profiler. Only one can exist at a time.
#[cfg(feature = "memory_profiling")]
pub struct MemoryProfiler {
    _profiler: dhat::Profiler,
}

#[cfg(feature = "memory_profiling")]
impl MemoryProfiler {
    pub fn start() -> Self {
        Self {
            _profiler: dhat::Profiler::new_heap(),
        }
    }

    /// Cumulative statistics since [`MemoryProfiler::start`].
    pub fn snapshot(&self) -> MemoryStats {
        let stats = dhat::HeapStats::get();
        MemoryStats {
            bytes_allocated: stats.total_bytes,
            allocation_count: stats.total_blocks,
            peak_bytes: stats.max_bytes as u64,
        }
    }

    /// Stop profiling, writing `dhat-heap.json`.
    pub fn finish(self) -> MemoryStats {
        self.snapshot()
    }
}

#[cfg(not(feature = "memory_profiling"))]
pub struct MemoryProfiler;

#[cfg(not(feature = "memory_profiling"))]
impl MemoryProfiler {
    pub fn start() -> Self {
        Self
    }

    /// Always empty without the `memory_profiling` feature.
    pub fn snapshot(&self) -> MemoryStats {
        MemoryStats::default()
    }

    pub fn finish(self) -> MemoryStats {
        MemoryStats::default()
    }
}

/// Measure the allocations of a setup step and of the frames run after it.
///
/// Returns `(setup, frames)`. With a fixed-capacity world, `frames.allocation_count` should stay
/// at zero however much the entities churn.
pub fn measure_steady_state<S, T, F>(
    setup: S,
    mut frame: F,
    frame_count: usize,
) -> (MemoryStats, MemoryStats)
where
    S: FnOnce() -> T,
    F: FnMut(&mut T),
{
    let profiler = MemoryProfiler::start();
    let start = profiler.snapshot();

    let mut state = setup();
    let after_setup = profiler.snapshot();

    for _ in 0..frame_count {
        frame(&mut state);
    }
    let after_frames = profiler.finish();

    (after_setup.since(&start), after_frames.since(&after_setup))
}
