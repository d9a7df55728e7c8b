//! Adapter port: the per-message rewriting pipeline.
//!
//! An adapter converts one message between two adjacent major-version
//! shapes. The pipeline is fixed: header, metadata, message type, then
//! the content transform registered under the (renamed) message type.

use crate::message::{
    domain::{JsonMap, Message},
    error::AdaptResult,
};
use std::collections::HashMap;
use tracing::debug;

/// A pure rewrite of one message type's content.
pub type ContentTransform = Box<dyn Fn(JsonMap) -> AdaptResult<JsonMap> + Send + Sync>;

/// Reply statuses whose content keeps a version-stable error envelope.
const ERROR_STATUSES: &[&str] = &["error", "aborted"];

/// Immutable mapping from old message-type names to new ones.
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::ports::TypeRenameMap;
///
/// let renames = TypeRenameMap::new([("execute_result", "pyout")]);
/// assert_eq!(renames.renamed("execute_result"), Some("pyout"));
/// assert_eq!(renames.inverted().renamed("pyout"), Some("execute_result"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRenameMap {
    renames: HashMap<String, String>,
}

impl TypeRenameMap {
    /// Builds a rename map from `(old, new)` pairs.
    #[must_use]
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            renames: pairs
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        }
    }

    /// Creates a map that renames nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the new name for `msg_type`, if it is renamed.
    #[must_use]
    pub fn renamed(&self, msg_type: &str) -> Option<&str> {
        self.renames.get(msg_type).map(String::as_str)
    }

    /// Returns the map with every `(old, new)` pair reversed.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            renames: self
                .renames
                .iter()
                .map(|(old, new)| (new.clone(), old.clone()))
                .collect(),
        }
    }

    /// Returns the number of renamed types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.renames.len()
    }

    /// Returns `true` if nothing is renamed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }
}

/// Content transforms keyed by message type, built once per adapter.
#[derive(Default)]
pub struct TransformTable {
    transforms: HashMap<String, ContentTransform>,
}

impl TransformTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transform for a message type.
    ///
    /// If a transform is already registered for the type, it is replaced.
    pub fn register<F>(&mut self, msg_type: &str, transform: F)
    where
        F: Fn(JsonMap) -> AdaptResult<JsonMap> + Send + Sync + 'static,
    {
        self.transforms
            .insert(msg_type.to_owned(), Box::new(transform));
    }

    /// Returns the transform registered for a message type.
    #[must_use]
    pub fn get(&self, msg_type: &str) -> Option<&ContentTransform> {
        self.transforms.get(msg_type)
    }

    /// Returns `true` if a transform is registered for the message type.
    #[must_use]
    pub fn contains(&self, msg_type: &str) -> bool {
        self.transforms.contains_key(msg_type)
    }
}

impl std::fmt::Debug for TransformTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("TransformTable")
            .field("types", &types)
            .finish()
    }
}

/// Trait for adapting messages from one major protocol version to another.
///
/// Implementations supply the rename table and the per-type content
/// transforms; the provided [`MessageAdapter::adapt`] runs the pipeline.
///
/// # Implementation Notes
///
/// - Adapters must be stateless beyond their immutable tables, so one
///   instance can serve any number of concurrent callers
/// - A message type without a transform is passed through, not rejected
/// - Each transform runs at most once per message
pub trait MessageAdapter: Send + Sync {
    /// Returns the version string describing the target wire shape.
    fn target_version(&self) -> &str;

    /// Returns the message-type rename table.
    fn type_renames(&self) -> &TypeRenameMap;

    /// Returns the content transforms keyed by post-rename message type.
    fn transforms(&self) -> &TransformTable;

    /// Rewrites the header. The default leaves it unchanged.
    ///
    /// # Errors
    ///
    /// Implementations may reject headers they cannot rewrite.
    fn update_header(&self, message: Message) -> AdaptResult<Message> {
        Ok(message)
    }

    /// Rewrites the metadata. The default leaves it unchanged.
    ///
    /// # Errors
    ///
    /// Implementations may reject metadata they cannot rewrite.
    fn update_metadata(&self, message: Message) -> AdaptResult<Message> {
        Ok(message)
    }

    /// Renames the message type when it appears in the rename table.
    fn update_msg_type(&self, mut message: Message) -> Message {
        if let Some(renamed) = self.type_renames().renamed(message.msg_type()) {
            message.set_msg_type(renamed);
        }
        message
    }

    /// Called *instead of* the type-specific transform for replies whose
    /// status is `error` or `aborted`. The default leaves them unchanged.
    ///
    /// # Errors
    ///
    /// Implementations may reject error replies they cannot rewrite.
    fn handle_reply_status_error(&self, message: Message) -> AdaptResult<Message> {
        Ok(message)
    }

    /// Runs the full pipeline on one message.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a pipeline stage; the message is
    /// consumed and must be treated as undeliverable.
    fn adapt(&self, message: Message) -> AdaptResult<Message> {
        let renamed = self
            .update_header(message)
            .and_then(|headed| self.update_metadata(headed))
            .map(|annotated| self.update_msg_type(annotated))?;

        let Some(transform) = self.transforms().get(renamed.msg_type()) else {
            debug!(msg_type = renamed.msg_type(), "no content transform, passing through");
            return Ok(renamed);
        };

        if renamed
            .status()
            .is_some_and(|status| ERROR_STATUSES.contains(&status))
        {
            debug!(
                msg_type = renamed.msg_type(),
                status = renamed.status(),
                "error reply bypasses content transform"
            );
            return self.handle_reply_status_error(renamed);
        }

        renamed.map_content(transform)
    }
}
