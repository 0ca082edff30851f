//! Shared entry point for the workspace benchmarks, so every bench uses the same `criterion`.

pub use criterion::*;
