//! Required-field accessors shared by the content transforms.

use crate::message::{
    domain::JsonMap,
    error::{AdaptError, AdaptResult},
};
use serde_json::Value;

/// Returns a required field.
pub(crate) fn required<'a>(
    content: &'a JsonMap,
    msg_type: &str,
    field: &str,
) -> AdaptResult<&'a Value> {
    content
        .get(field)
        .ok_or_else(|| AdaptError::missing_field(msg_type, field))
}

/// Removes and returns a required field.
pub(crate) fn take_required(
    content: &mut JsonMap,
    msg_type: &str,
    field: &str,
) -> AdaptResult<Value> {
    content
        .remove(field)
        .ok_or_else(|| AdaptError::missing_field(msg_type, field))
}

/// Returns a required string field.
pub(crate) fn required_str<'a>(
    content: &'a JsonMap,
    msg_type: &str,
    field: &str,
) -> AdaptResult<&'a str> {
    required(content, msg_type, field)?
        .as_str()
        .ok_or_else(|| AdaptError::invalid_field(msg_type, field, "a string"))
}

/// Returns a required integer field.
pub(crate) fn required_i64(content: &JsonMap, msg_type: &str, field: &str) -> AdaptResult<i64> {
    required(content, msg_type, field)?
        .as_i64()
        .ok_or_else(|| AdaptError::invalid_field(msg_type, field, "an integer"))
}

/// Returns a required cursor offset.
pub(crate) fn required_cursor(
    content: &JsonMap,
    msg_type: &str,
    field: &str,
) -> AdaptResult<usize> {
    required(content, msg_type, field)?
        .as_u64()
        .and_then(|pos| usize::try_from(pos).ok())
        .ok_or_else(|| AdaptError::invalid_field(msg_type, field, "a non-negative integer"))
}

/// Returns a required object field for in-place edits.
pub(crate) fn required_object_mut<'a>(
    content: &'a mut JsonMap,
    msg_type: &str,
    field: &str,
) -> AdaptResult<&'a mut JsonMap> {
    content
        .get_mut(field)
        .ok_or_else(|| AdaptError::missing_field(msg_type, field))?
        .as_object_mut()
        .ok_or_else(|| AdaptError::invalid_field(msg_type, field, "an object"))
}

/// Builds a content object from key/value pairs.
pub(crate) fn object<const N: usize>(pairs: [(&str, Value); N]) -> JsonMap {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}
