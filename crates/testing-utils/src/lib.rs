//! # Overlord Testing Utils
//!
//! Shared testing utilities for the worker selection crates.
//!
//! ## Features
//!
//! - **Test Data Builders**: `WorkerViewBuilder` and `TaskBuilder` with sensible defaults
//! - **Mock Collaborators**: in-memory `WorkerPoolSource` / `TaskAssigner` doubles
//! - **Random Pools**: seeded worker pool generation for property-style tests
//!
//! ## Usage
//!
//! Add this crate as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! overlord-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod helpers;
pub mod mocks;

// Re-export commonly used items
pub use builders::*;
pub use helpers::*;
pub use mocks::*;
