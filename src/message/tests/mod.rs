//! Unit tests for the message module.
//!
//! Tests are organised by component, covering happy paths, error cases,
//! and edge cases for all public APIs.

mod error_tests;
mod v5_to_v4_tests;
mod version_tests;
