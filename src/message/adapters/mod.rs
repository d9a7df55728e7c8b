//! Concrete adapters for the message module.
//!
//! This module provides the directional implementations of the
//! [`MessageAdapter`] port, following hexagonal architecture principles,
//! plus the default [`TokenResolver`] used when downgrading inspection
//! requests.
//!
//! # Available Adapters
//!
//! - [`V5ToV4Adapter`]: rewrites protocol 5 messages for protocol 4 peers
//! - [`V4ToV5Adapter`]: rewrites protocol 4 messages for protocol 5 peers
//!
//! [`MessageAdapter`]: crate::message::ports::MessageAdapter
//! [`TokenResolver`]: crate::message::ports::TokenResolver

mod fields;
pub mod token;
pub mod v4_to_v5;
pub mod v5_to_v4;

pub use token::IdentifierTokenResolver;
pub use v4_to_v5::{EMPTY_DOCSTRING, V4ToV5Adapter};
pub use v5_to_v4::{LEGACY_IMPLEMENTATION_KEY, V5_TO_V4_RENAMES, V5ToV4Adapter};
