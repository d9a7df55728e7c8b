//! Version dispatch: choosing and applying the adapter for a message.
//!
//! This module provides the registry that maps a (source, target) major
//! version pair to the adapter for that exact conversion, and the
//! `adapt` entry points built on it.

pub mod config;
pub mod registry;

pub use config::AdaptConfig;
pub use registry::{AdapterRegistry, adapt, adapt_value, default_registry};
