//! Downgrades protocol 5 messages to the protocol 4 shape.
//!
//! Several transforms here are lossy: protocol 4 has no room for the
//! richer inspection reply, completion cursor span or kernel banner.

use super::fields::{
    object, required, required_cursor, required_i64, required_object_mut, required_str,
};
use super::token::IdentifierTokenResolver;
use crate::message::{
    domain::{JsonMap, Message, V4_VERSION, code_to_line, version_to_segments},
    error::{AdaptError, AdaptResult},
    ports::{MessageAdapter, TokenResolver, TransformTable, TypeRenameMap},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::warn;

/// Message types renamed between protocol 5 (left) and protocol 4 (right).
pub const V5_TO_V4_RENAMES: [(&str, &str); 5] = [
    ("execute_result", "pyout"),
    ("execute_input", "pyin"),
    ("error", "pyerr"),
    ("inspect_request", "object_info_request"),
    ("inspect_reply", "object_info_reply"),
];

/// Key protocol 4 peers read the kernel implementation from.
///
/// The spelling is part of the legacy wire contract and must not be
/// corrected.
pub const LEGACY_IMPLEMENTATION_KEY: &str = "implmentation";

const KERNEL_INFO_REPLY: &str = "kernel_info_reply";
const EXECUTE_REQUEST: &str = "execute_request";
const EXECUTE_REPLY: &str = "execute_reply";
const COMPLETE_REQUEST: &str = "complete_request";
const COMPLETE_REPLY: &str = "complete_reply";
const OBJECT_INFO_REQUEST: &str = "object_info_request";
const OBJECT_INFO_REPLY: &str = "object_info_reply";
const DISPLAY_DATA: &str = "display_data";
const INPUT_REQUEST: &str = "input_request";

/// Adapter from protocol 5 to protocol 4.
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::adapters::V5ToV4Adapter;
/// use msgspec_adapter::message::domain::Message;
/// use msgspec_adapter::message::ports::MessageAdapter;
/// use serde_json::json;
///
/// let adapter = V5ToV4Adapter::default();
/// let message = Message::from_value(json!({
///     "header": {"msg_type": "execute_result", "version": "5.0"},
///     "content": {"data": {}},
///     "metadata": {}
/// }))
/// .expect("valid message");
///
/// let adapted = adapter.adapt(message).expect("should adapt");
/// assert_eq!(adapted.msg_type(), "pyout");
/// assert_eq!(adapted.header().version(), None);
/// ```
#[derive(Debug)]
pub struct V5ToV4Adapter {
    renames: TypeRenameMap,
    transforms: TransformTable,
}

impl V5ToV4Adapter {
    /// Creates the adapter with an injected rename table and token resolver.
    #[must_use]
    pub fn new(renames: TypeRenameMap, resolver: Arc<dyn TokenResolver>) -> Self {
        let mut transforms = TransformTable::new();
        transforms.register(KERNEL_INFO_REPLY, kernel_info_reply);
        transforms.register(EXECUTE_REQUEST, execute_request);
        transforms.register(EXECUTE_REPLY, execute_reply);
        transforms.register(COMPLETE_REQUEST, |content| complete_request(&content));
        transforms.register(COMPLETE_REPLY, complete_reply);
        transforms.register(OBJECT_INFO_REQUEST, move |content| {
            object_info_request(&content, resolver.as_ref())
        });
        transforms.register(OBJECT_INFO_REPLY, |_| Ok(object_info_reply()));
        transforms.register(DISPLAY_DATA, display_data);
        transforms.register(INPUT_REQUEST, input_request);
        Self {
            renames,
            transforms,
        }
    }

    /// Creates the adapter with the standard renames and the given resolver.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn TokenResolver>) -> Self {
        Self::new(Self::default_renames(), resolver)
    }

    /// Returns the standard protocol 5 to 4 rename table.
    #[must_use]
    pub fn default_renames() -> TypeRenameMap {
        TypeRenameMap::new(V5_TO_V4_RENAMES)
    }
}

impl Default for V5ToV4Adapter {
    fn default() -> Self {
        Self::with_resolver(Arc::new(IdentifierTokenResolver::new()))
    }
}

impl MessageAdapter for V5ToV4Adapter {
    fn target_version(&self) -> &str {
        V4_VERSION
    }

    fn type_renames(&self) -> &TypeRenameMap {
        &self.renames
    }

    fn transforms(&self) -> &TransformTable {
        &self.transforms
    }

    fn update_header(&self, mut message: Message) -> AdaptResult<Message> {
        message.header_mut().clear_version();
        Ok(message)
    }
}

// shell channel

fn kernel_info_reply(mut content: JsonMap) -> AdaptResult<JsonMap> {
    content.remove("banner");
    for key in ["language_version", "protocol_version"] {
        if let Some(segments) = content
            .get(key)
            .and_then(Value::as_str)
            .map(version_to_segments)
        {
            content.insert(key.to_owned(), json!(segments));
        }
    }

    let implementation = content.remove("implementation");
    if implementation.as_ref().and_then(Value::as_str) == Some("ipython")
        && let Some(version) = content.remove("implementation_version")
    {
        content.insert("ipython_version".to_owned(), version);
    }
    content.remove("implementation_version");

    if !content.contains_key(LEGACY_IMPLEMENTATION_KEY) {
        let language = kernel_language(&content)?;
        content.insert(LEGACY_IMPLEMENTATION_KEY.to_owned(), language);
    }
    Ok(content)
}

/// Reads `language`, falling back to `language_info.name`.
fn kernel_language(content: &JsonMap) -> AdaptResult<Value> {
    content
        .get("language")
        .or_else(|| content.get("language_info").and_then(|info| info.get("name")))
        .cloned()
        .ok_or_else(|| AdaptError::missing_field(KERNEL_INFO_REPLY, "language"))
}

#[expect(
    clippy::unnecessary_wraps,
    reason = "transforms share the fallible TransformTable signature"
)]
fn execute_request(mut content: JsonMap) -> AdaptResult<JsonMap> {
    content
        .entry("user_variables")
        .or_insert_with(|| Value::Array(Vec::new()));
    Ok(content)
}

fn execute_reply(mut content: JsonMap) -> AdaptResult<JsonMap> {
    let has_payload = content
        .get("payload")
        .and_then(Value::as_array)
        .is_some_and(|payload| !payload.is_empty());
    if has_payload {
        return Err(AdaptError::not_supported(
            EXECUTE_REPLY,
            "payloads cannot be expressed in protocol 4",
        ));
    }
    content
        .entry("user_variables")
        .or_insert_with(|| Value::Object(JsonMap::new()));
    Ok(content)
}

fn complete_request(content: &JsonMap) -> AdaptResult<JsonMap> {
    let code = required_str(content, COMPLETE_REQUEST, "code")?;
    let cursor_pos = required_cursor(content, COMPLETE_REQUEST, "cursor_pos")?;
    let (line, line_cursor) = code_to_line(code, cursor_pos);

    Ok(object([
        ("text", json!("")),
        ("line", json!(line)),
        ("block", Value::Null),
        ("cursor_pos", json!(line_cursor)),
    ]))
}

fn complete_reply(mut content: JsonMap) -> AdaptResult<JsonMap> {
    let cursor_start = required_i64(&content, COMPLETE_REPLY, "cursor_start")?;
    let cursor_end = required_i64(&content, COMPLETE_REPLY, "cursor_end")?;
    let first_match = required(&content, COMPLETE_REPLY, "matches")?
        .as_array()
        .ok_or_else(|| AdaptError::invalid_field(COMPLETE_REPLY, "matches", "a list"))?
        .first()
        .ok_or_else(|| AdaptError::missing_field(COMPLETE_REPLY, "matches[0]"))?
        .as_str()
        .ok_or_else(|| AdaptError::invalid_field(COMPLETE_REPLY, "matches[0]", "a string"))?;

    let matched_text = char_prefix(first_match, cursor_end.saturating_sub(cursor_start));

    content.remove("cursor_start");
    content.remove("cursor_end");
    content.remove("metadata");
    content.insert("matched_text".to_owned(), json!(matched_text));
    Ok(content)
}

/// Takes the first `len` characters of `text`; a negative `len` drops that
/// many characters from the end instead.
fn char_prefix(text: &str, len: i64) -> String {
    let keep = if len >= 0 {
        usize::try_from(len).unwrap_or(usize::MAX)
    } else {
        let drop = usize::try_from(len.unsigned_abs()).unwrap_or(usize::MAX);
        text.chars().count().saturating_sub(drop)
    };
    text.chars().take(keep).collect()
}

fn object_info_request(content: &JsonMap, resolver: &dyn TokenResolver) -> AdaptResult<JsonMap> {
    let code = required_str(content, OBJECT_INFO_REQUEST, "code")?;
    let cursor_pos = required_cursor(content, OBJECT_INFO_REQUEST, "cursor_pos")?;
    let detail_level = required(content, OBJECT_INFO_REQUEST, "detail_level")?.clone();
    let oname = resolver.token_at_cursor(code, cursor_pos);

    Ok(object([
        ("oname", json!(oname)),
        ("detail_level", detail_level),
    ]))
}

/// The protocol 5 inspection reply has no protocol 4 equivalent.
fn object_info_reply() -> JsonMap {
    object([("found", json!(false)), ("name", json!("unknown"))])
}

// iopub channel

fn display_data(mut content: JsonMap) -> AdaptResult<JsonMap> {
    content
        .entry("source")
        .or_insert_with(|| json!("display"));

    let data = required_object_mut(&mut content, DISPLAY_DATA, "data")?;
    if let Some(value) = data.get_mut("application/json") {
        match serde_json::to_string(&*value) {
            Ok(encoded) => *value = Value::String(encoded),
            Err(error) => warn!(%error, "failed to encode application/json display data"),
        }
    }
    Ok(content)
}

// stdin channel

#[expect(
    clippy::unnecessary_wraps,
    reason = "transforms share the fallible TransformTable signature"
)]
fn input_request(mut content: JsonMap) -> AdaptResult<JsonMap> {
    content.remove("password");
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_prefix_truncates_to_length() {
        assert_eq!(char_prefix("foobar", 3), "foo");
        assert_eq!(char_prefix("foo", 10), "foo");
    }

    #[test]
    fn char_prefix_negative_length_drops_from_end() {
        assert_eq!(char_prefix("foobar", -2), "foob");
        assert_eq!(char_prefix("ab", -5), "");
    }
}
