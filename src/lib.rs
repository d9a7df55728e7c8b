//! Msgspec adapter: cross-version rewriting of kernel protocol messages.
//!
//! A kernel and its clients exchange requests, replies and broadcasts
//! whose shape changes between protocol major versions. When a peer speaks
//! a different major version, every message is rewritten field by field
//! so each side only sees its own version's shape.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure message types and text/version helpers
//! - **Ports**: Abstract trait interfaces for adapters and token resolution
//! - **Adapters**: The concrete directional adapters
//!
//! # Modules
//!
//! - [`message`]: Message model, adapters and version dispatch

pub mod message;
