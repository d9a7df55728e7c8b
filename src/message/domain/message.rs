//! The wire message exchanged between a kernel and its clients.
//!
//! A message is transient: it is decoded by the transport, passed through
//! at most one adapter, and handed back. Adapters take it by value and
//! return the rewritten message, so no aliasing survives a call.

use crate::message::error::{AdaptError, AdaptResult};
use serde::{Deserialize, Serialize, de::IgnoredAny};
use serde_json::{Map, Value};

/// A JSON object as carried in message headers, content and metadata.
pub type JsonMap = Map<String, Value>;

/// The header of a protocol message.
///
/// Only `msg_type` and `version` are interpreted; every other header key
/// (`msg_id`, `session`, `username`, `date`, ...) is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Semantic kind of the message, e.g. `execute_request`.
    msg_type: String,

    /// Dotted protocol version of the sender, absent before protocol 5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,

    /// Header keys this crate does not interpret.
    #[serde(flatten)]
    extra: JsonMap,
}

impl Header {
    /// Creates a header for the given message type with no version.
    #[must_use]
    pub fn new(msg_type: impl Into<String>) -> Self {
        Self {
            msg_type: msg_type.into(),
            version: None,
            extra: JsonMap::new(),
        }
    }

    /// Sets the protocol version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds an uninterpreted header field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Returns the message type.
    #[must_use]
    pub fn msg_type(&self) -> &str {
        &self.msg_type
    }

    /// Returns the declared protocol version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Stamps the protocol version.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    /// Removes the protocol version key.
    pub fn clear_version(&mut self) {
        self.version = None;
    }

    /// Returns the header fields this crate does not interpret.
    #[must_use]
    pub const fn extra(&self) -> &JsonMap {
        &self.extra
    }
}

/// A protocol message: header, content, metadata and passthrough fields.
///
/// # Invariants
///
/// - `header.msg_type` and the top-level `msg_type` are always equal; the
///   only way to change either is [`Message::set_msg_type`].
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::domain::{Header, Message};
/// use serde_json::json;
///
/// let message = Message::from_value(json!({
///     "header": {"msg_type": "input_request", "version": "5.0"},
///     "content": {"prompt": "> ", "password": false},
///     "metadata": {}
/// }))
/// .expect("valid message");
///
/// assert_eq!(message.msg_type(), "input_request");
/// assert_eq!(message.header().version(), Some("5.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireMessage")]
pub struct Message {
    /// The message header.
    header: Header,

    /// Denormalised copy of `header.msg_type`.
    msg_type: String,

    /// Header of the message this one replies to.
    parent_header: JsonMap,

    /// Type-specific message body.
    content: JsonMap,

    /// Auxiliary metadata, passed through unchanged.
    metadata: JsonMap,

    /// Top-level keys this crate does not interpret (`buffers`, `msg_id`, ...).
    #[serde(flatten)]
    extra: JsonMap,
}

/// Wire form accepted on deserialisation; the top-level `msg_type` may be
/// omitted and is then taken from the header. A `null` parent header or
/// metadata reads as empty.
#[derive(Deserialize)]
struct WireMessage {
    header: Header,
    #[serde(default, rename = "msg_type")]
    _msg_type: IgnoredAny,
    #[serde(default)]
    parent_header: Option<JsonMap>,
    #[serde(default)]
    content: JsonMap,
    #[serde(default)]
    metadata: Option<JsonMap>,
    #[serde(flatten)]
    extra: JsonMap,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        // The header is authoritative when the two copies disagree.
        let WireMessage {
            header,
            parent_header,
            content,
            metadata,
            extra,
            ..
        } = wire;
        let msg_type = header.msg_type.clone();
        Self {
            header,
            msg_type,
            parent_header: parent_header.unwrap_or_default(),
            content,
            metadata: metadata.unwrap_or_default(),
            extra,
        }
    }
}

impl Message {
    /// Creates a message with the given header and content and empty
    /// metadata and parent header.
    #[must_use]
    pub fn new(header: Header, content: JsonMap) -> Self {
        let msg_type = header.msg_type.clone();
        Self {
            header,
            msg_type,
            parent_header: JsonMap::new(),
            content,
            metadata: JsonMap::new(),
            extra: JsonMap::new(),
        }
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: JsonMap) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the parent header.
    #[must_use]
    pub fn with_parent_header(mut self, parent_header: JsonMap) -> Self {
        self.parent_header = parent_header;
        self
    }

    /// Decodes a message from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::MalformedMessage`] if the value lacks a header
    /// with a string `msg_type`, or if `content`, `metadata` or
    /// `parent_header` are not objects.
    pub fn from_value(value: Value) -> AdaptResult<Self> {
        serde_json::from_value(value).map_err(|e| AdaptError::malformed(e.to_string()))
    }

    /// Encodes the message into its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::MalformedMessage`] if encoding fails.
    pub fn into_value(self) -> AdaptResult<Value> {
        serde_json::to_value(self).map_err(|e| AdaptError::malformed(e.to_string()))
    }

    /// Returns the message type.
    #[must_use]
    pub fn msg_type(&self) -> &str {
        &self.msg_type
    }

    /// Renames the message type in the header and the top-level copy.
    pub fn set_msg_type(&mut self, msg_type: impl Into<String>) {
        let renamed = msg_type.into();
        self.header.msg_type.clone_from(&renamed);
        self.msg_type = renamed;
    }

    /// Returns the header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Returns a mutable reference to the header.
    ///
    /// The message type cannot be changed through it; use
    /// [`Message::set_msg_type`].
    #[expect(
        clippy::missing_const_for_fn,
        reason = "&mut self methods cannot be const in stable Rust"
    )]
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Returns the parent header.
    #[must_use]
    pub const fn parent_header(&self) -> &JsonMap {
        &self.parent_header
    }

    /// Returns the content.
    #[must_use]
    pub const fn content(&self) -> &JsonMap {
        &self.content
    }

    /// Returns the metadata.
    #[must_use]
    pub const fn metadata(&self) -> &JsonMap {
        &self.metadata
    }

    /// Returns a mutable reference to the metadata.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "&mut self methods cannot be const in stable Rust"
    )]
    pub fn metadata_mut(&mut self) -> &mut JsonMap {
        &mut self.metadata
    }

    /// Returns the top-level fields this crate does not interpret.
    #[must_use]
    pub const fn extra(&self) -> &JsonMap {
        &self.extra
    }

    /// Returns the `content.status` value when it is a string.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.content.get("status").and_then(Value::as_str)
    }

    /// Replaces the content with the result of `transform`.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `transform`; the message is
    /// consumed in that case.
    pub fn map_content<F>(mut self, transform: F) -> AdaptResult<Self>
    where
        F: FnOnce(JsonMap) -> AdaptResult<JsonMap>,
    {
        let content = std::mem::take(&mut self.content);
        self.content = transform(content)?;
        Ok(self)
    }
}
