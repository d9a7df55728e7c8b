//! Protocol version identifiers.
//!
//! On the wire a version is a dotted string (`"5.0"`); the legacy
//! `kernel_info_reply` carries versions as integer lists (`[5, 0]`).
//! Conversions between the two forms are total: non-numeric segments are
//! dropped rather than reported.

/// Major version assumed when a header carries no `version` key.
///
/// Protocol 4 is the last version before the key was introduced.
pub const LEGACY_MAJOR_VERSION: u32 = 4;

/// Major version spoken by this implementation, the default adapt target.
pub const CURRENT_MAJOR_VERSION: u32 = 5;

/// Version string describing the protocol 4 wire shape.
pub const V4_VERSION: &str = "4.1";

/// Version string stamped into headers adapted to protocol 5.
pub const V5_VERSION: &str = "5.0";

/// Converts a dotted version string into its numeric segments.
///
/// Segments that do not parse as integers are skipped.
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::domain::version_to_segments;
///
/// assert_eq!(version_to_segments("5.0.dev"), vec![5, 0]);
/// assert!(version_to_segments("dev").is_empty());
/// ```
#[must_use]
pub fn version_to_segments(version: &str) -> Vec<i64> {
    version
        .split('.')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

/// Joins numeric segments into a dotted version string.
#[must_use]
pub fn segments_to_version(segments: &[i64]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Parses the major version from a dotted version string.
///
/// Only the leading segment is considered; `"5.0"` and `"5.x"` both yield
/// `Some(5)`. Returns `None` when the leading segment is not an integer.
#[must_use]
pub fn major_version(version: &str) -> Option<u32> {
    version
        .split('.')
        .next()
        .and_then(|major| major.trim().parse::<u32>().ok())
}
