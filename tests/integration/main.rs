//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one slice of the
//! pipeline against mock adapters.  All tests run on the host with no
//! real hardware or network required:
//!
//! ```text
//! cargo test --no-default-features
//! ```

mod auth_tests;
mod mock_hw;
mod poll_loop_tests;
mod ups_tests;
