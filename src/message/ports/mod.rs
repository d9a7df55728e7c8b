//! Port trait definitions for the message subsystem.
//!
//! Ports define the abstract interfaces of the adaptation pipeline: the
//! adapter contract itself and the external token resolver it depends on.

pub mod adapter;
pub mod token;

pub use adapter::{ContentTransform, MessageAdapter, TransformTable, TypeRenameMap};
pub use token::TokenResolver;
