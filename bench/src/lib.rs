//! Benchmark utilities for the sparse-set ECS.
//!
//! - **Microbenchmarks**: spawn, dense iteration, signature queries, component add/remove, and
//!   mark + flush cycles
//! - **Scenario benchmarks**: frame loops with steady entity churn (particles, game world)
//! - **Memory tracking**: heap allocation profiling via dhat, used to confirm that frames allocate
//!   nothing once the world is built
//! - **Frame timing**: per-phase timing of an input, update, flush, render loop
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p sparse_bench
//!
//! # Run specific benchmark group
//! cargo bench -p sparse_bench -- query
//!
//! # Run with memory profiling (slower)
//! cargo bench -p sparse_bench --features memory_profiling
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports. Memory profiles are written to
//! `dhat-heap.json`.

pub mod components;
pub mod frame_timer;
pub mod memory;
pub mod scenarios;
