//! Domain types for the message subsystem.
//!
//! This module contains pure domain types with no infrastructure dependencies:
//! the wire message itself and the small text and version helpers the
//! content transforms rely on.

mod cursor;
mod message;
mod version;

pub use cursor::code_to_line;
pub use message::{Header, JsonMap, Message};
pub use version::{
    CURRENT_MAJOR_VERSION, LEGACY_MAJOR_VERSION, V4_VERSION, V5_VERSION, major_version,
    segments_to_version, version_to_segments,
};
