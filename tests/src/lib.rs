//! # Hashweave Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Cross-subsystem flows
//! └── benches/           # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hw-tests integration::
//! cargo bench -p hw-tests
//! ```

pub mod fixtures;
pub mod integration;
