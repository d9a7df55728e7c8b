//! Upgrades protocol 4 messages to the protocol 5 shape.
//!
//! Not an inverse of the downgrade: some protocol 5 fields cannot be
//! recovered and are filled with sentinels or empty values.

use super::fields::{object, required_object_mut, required_str, take_required};
use super::v5_to_v4::V5_TO_V4_RENAMES;
use crate::message::{
    domain::{JsonMap, Message, V5_VERSION},
    error::{AdaptError, AdaptResult},
    ports::{MessageAdapter, TransformTable, TypeRenameMap},
};
use serde_json::{Value, json};
use tracing::warn;

const KERNEL_INFO_REPLY: &str = "kernel_info_reply";
const EXECUTE_REQUEST: &str = "execute_request";
const EXECUTE_REPLY: &str = "execute_reply";
const COMPLETE_REQUEST: &str = "complete_request";
const COMPLETE_REPLY: &str = "complete_reply";
const INSPECT_REQUEST: &str = "inspect_request";
const INSPECT_REPLY: &str = "inspect_reply";
const DISPLAY_DATA: &str = "display_data";
const INPUT_REQUEST: &str = "input_request";

/// Placeholder shown when a found object has neither signature nor docs.
pub const EMPTY_DOCSTRING: &str = "<empty docstring>";

/// Signature keys of a protocol 4 inspection reply, most specific first.
const DEFINITION_KEYS: [&str; 3] = ["call_def", "init_definition", "definition"];

/// Docstring keys of a protocol 4 inspection reply, most specific first.
const DOCSTRING_KEYS: [&str; 3] = ["call_docstring", "init_docstring", "docstring"];

/// Adapter from protocol 4 to protocol 5.
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::adapters::V4ToV5Adapter;
/// use msgspec_adapter::message::domain::Message;
/// use msgspec_adapter::message::ports::MessageAdapter;
/// use serde_json::json;
///
/// let adapter = V4ToV5Adapter::default();
/// let message = Message::from_value(json!({
///     "header": {"msg_type": "input_request"},
///     "content": {"prompt": "> "},
///     "metadata": {}
/// }))
/// .expect("valid message");
///
/// let adapted = adapter.adapt(message).expect("should adapt");
/// assert_eq!(adapted.header().version(), Some("5.0"));
/// assert_eq!(adapted.content().get("password"), Some(&json!(false)));
/// ```
#[derive(Debug)]
pub struct V4ToV5Adapter {
    renames: TypeRenameMap,
    transforms: TransformTable,
}

impl V4ToV5Adapter {
    /// Creates the adapter with an injected rename table.
    #[must_use]
    pub fn new(renames: TypeRenameMap) -> Self {
        let mut transforms = TransformTable::new();
        transforms.register(KERNEL_INFO_REPLY, kernel_info_reply);
        transforms.register(EXECUTE_REQUEST, execute_request);
        transforms.register(EXECUTE_REPLY, execute_reply);
        transforms.register(COMPLETE_REQUEST, complete_request);
        transforms.register(COMPLETE_REPLY, complete_reply);
        transforms.register(INSPECT_REQUEST, inspect_request);
        transforms.register(INSPECT_REPLY, inspect_reply);
        transforms.register(DISPLAY_DATA, display_data);
        transforms.register(INPUT_REQUEST, input_request);
        Self {
            renames,
            transforms,
        }
    }

    /// Returns the standard protocol 4 to 5 rename table, the inverse of
    /// the protocol 5 to 4 renames.
    #[must_use]
    pub fn default_renames() -> TypeRenameMap {
        TypeRenameMap::new(V5_TO_V4_RENAMES).inverted()
    }
}

impl Default for V4ToV5Adapter {
    fn default() -> Self {
        Self::new(Self::default_renames())
    }
}

impl MessageAdapter for V4ToV5Adapter {
    fn target_version(&self) -> &str {
        V5_VERSION
    }

    fn type_renames(&self) -> &TypeRenameMap {
        &self.renames
    }

    fn transforms(&self) -> &TransformTable {
        &self.transforms
    }

    fn update_header(&self, mut message: Message) -> AdaptResult<Message> {
        message.header_mut().set_version(V5_VERSION);
        Ok(message)
    }
}

// shell channel

fn kernel_info_reply(mut content: JsonMap) -> AdaptResult<JsonMap> {
    for key in ["language_version", "protocol_version", "ipython_version"] {
        if let Some(version) = content
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .map(dotted)
        {
            content.insert(key.to_owned(), json!(version));
        }
    }

    let is_python = required_str(&content, KERNEL_INFO_REPLY, "language")?.starts_with("python");
    if is_python && let Some(version) = content.remove("ipython_version") {
        content.insert("implementation".to_owned(), json!("ipython"));
        content.insert("implementation_version".to_owned(), version);
    }

    content.insert("banner".to_owned(), json!(""));
    Ok(content)
}

/// Joins version list elements with dots, keeping string elements as-is.
fn dotted(segments: &[Value]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn execute_request(mut content: JsonMap) -> AdaptResult<JsonMap> {
    let user_variables = match content.remove("user_variables") {
        None => Vec::new(),
        Some(Value::Array(names)) => names,
        Some(_) => {
            return Err(AdaptError::invalid_field(
                EXECUTE_REQUEST,
                "user_variables",
                "a list of names",
            ));
        }
    };

    let user_expressions = user_expressions_mut(&mut content, EXECUTE_REQUEST)?;
    for variable in user_variables {
        let Value::String(name) = variable else {
            return Err(AdaptError::invalid_field(
                EXECUTE_REQUEST,
                "user_variables",
                "a list of names",
            ));
        };
        user_expressions.insert(name.clone(), Value::String(name));
    }
    Ok(content)
}

fn execute_reply(mut content: JsonMap) -> AdaptResult<JsonMap> {
    let user_variables = match content.remove("user_variables") {
        None | Some(Value::Null) => JsonMap::new(),
        Some(Value::Object(values)) => values,
        Some(_) => {
            return Err(AdaptError::invalid_field(
                EXECUTE_REPLY,
                "user_variables",
                "an object",
            ));
        }
    };

    user_expressions_mut(&mut content, EXECUTE_REPLY)?.extend(user_variables);
    Ok(content)
}

/// Returns `user_expressions`, inserting an empty object when absent.
fn user_expressions_mut<'a>(
    content: &'a mut JsonMap,
    msg_type: &str,
) -> AdaptResult<&'a mut JsonMap> {
    content
        .entry("user_expressions")
        .or_insert_with(|| Value::Object(JsonMap::new()));
    required_object_mut(content, msg_type, "user_expressions")
}

fn complete_request(mut content: JsonMap) -> AdaptResult<JsonMap> {
    let line = take_required(&mut content, COMPLETE_REQUEST, "line")?;
    let cursor_pos = take_required(&mut content, COMPLETE_REQUEST, "cursor_pos")?;

    Ok(object([("code", line), ("cursor_pos", cursor_pos)]))
}

/// Protocol 4 only reports the matched text, so the start is expressed as
/// a negative offset from the current cursor.
fn complete_reply(mut content: JsonMap) -> AdaptResult<JsonMap> {
    let matched_len = required_str(&content, COMPLETE_REPLY, "matched_text")?
        .chars()
        .count();
    let cursor_start = i64::try_from(matched_len).map_or(i64::MIN, |len| -len);
    let matches = take_required(&mut content, COMPLETE_REPLY, "matches")?;

    Ok(object([
        ("status", json!("ok")),
        ("matches", matches),
        ("cursor_start", json!(cursor_start)),
        ("cursor_end", Value::Null),
        ("metadata", json!({})),
    ]))
}

fn inspect_request(mut content: JsonMap) -> AdaptResult<JsonMap> {
    let oname = required_str(&content, INSPECT_REQUEST, "oname")?.to_owned();
    let detail_level = take_required(&mut content, INSPECT_REQUEST, "detail_level")?;
    let cursor_pos = oname.chars().count();

    Ok(object([
        ("code", json!(oname)),
        ("cursor_pos", json!(cursor_pos)),
        ("detail_level", detail_level),
    ]))
}

fn inspect_reply(mut content: JsonMap) -> AdaptResult<JsonMap> {
    let found = take_required(&mut content, INSPECT_REPLY, "found")?;
    let name = take_required(&mut content, INSPECT_REPLY, "name")?;

    let mut data = JsonMap::new();
    if is_truthy(&found) {
        let lines: Vec<&str> = [
            first_present(&content, &DEFINITION_KEYS),
            first_present(&content, &DOCSTRING_KEYS),
        ]
        .into_iter()
        .flatten()
        .collect();
        let text = if lines.is_empty() {
            EMPTY_DOCSTRING.to_owned()
        } else {
            lines.join("\n")
        };
        data.insert("text/plain".to_owned(), json!(text));
    }

    Ok(object([
        ("status", json!("ok")),
        ("found", found),
        ("name", name),
        ("data", Value::Object(data)),
        ("metadata", json!({})),
    ]))
}

/// Returns the first of `keys` holding a non-empty string.
fn first_present<'a>(content: &'a JsonMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        content
            .get(*key)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    })
}

/// Truthiness of a JSON value as protocol 4 senders use it for `found`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

// iopub channel

fn display_data(mut content: JsonMap) -> AdaptResult<JsonMap> {
    content.remove("source");

    let data = required_object_mut(&mut content, DISPLAY_DATA, "data")?;
    if let Some(value) = data.get_mut("application/json")
        && let Some(encoded) = value.as_str()
    {
        match serde_json::from_str::<Value>(encoded) {
            Ok(decoded) => *value = decoded,
            Err(error) => warn!(%error, "failed to decode application/json display data"),
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
    content
        .entry("password")
        .or_insert_with(|| json!(false));
    Ok(content)
}
