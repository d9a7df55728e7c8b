//! Versioned wire messages and their cross-version adaptation.
//!
//! This module implements the message model, the per-type content
//! transforms between protocol major versions, and the version dispatch
//! that selects them.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Message`], [`domain::Header`]) and
//!   the line/cursor and version helpers
//! - **Ports**: Abstract trait interfaces ([`ports::MessageAdapter`], [`ports::TokenResolver`])
//! - **Adapters**: Concrete implementations ([`adapters::V5ToV4Adapter`],
//!   [`adapters::V4ToV5Adapter`], [`adapters::IdentifierTokenResolver`])
//! - **Versioning**: Dispatch by (source, target) major version
//!
//! # Example
//!
//! ```
//! use msgspec_adapter::message::domain::Message;
//! use msgspec_adapter::message::versioning::AdapterRegistry;
//! use serde_json::json;
//!
//! let registry = AdapterRegistry::new();
//! let message = Message::from_value(json!({
//!     "header": {"msg_type": "complete_reply", "version": "5.0"},
//!     "content": {
//!         "status": "ok",
//!         "matches": ["foobar", "foobaz"],
//!         "cursor_start": 3,
//!         "cursor_end": 6,
//!         "metadata": {}
//!     },
//!     "metadata": {}
//! }))
//! .expect("valid message");
//!
//! let adapted = registry.adapt(message, 4).expect("should adapt");
//! assert_eq!(adapted.content().get("matched_text"), Some(&json!("foo")));
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod versioning;

#[cfg(test)]
mod tests;
