//! Testing utilities for applications embedding strata.
//!
//! Provides an in-memory [`MockBackend`] so migration units and run
//! orchestration can be exercised without a live database.

mod mock;

pub use mock::MockBackend;
