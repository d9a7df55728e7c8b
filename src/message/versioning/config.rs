//! Version settings a host can embed in its own configuration.

use crate::message::domain::{CURRENT_MAJOR_VERSION, LEGACY_MAJOR_VERSION};
use serde::{Deserialize, Serialize};

/// Configuration for version dispatch.
///
/// Missing fields take their defaults when deserialised.
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::versioning::AdaptConfig;
///
/// let config: AdaptConfig = serde_json::from_str(r#"{"target_major": 4}"#)
///     .expect("valid config");
/// assert_eq!(config.target_major, 4);
/// assert_eq!(config.legacy_major, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptConfig {
    /// Major version messages are adapted to when no target is given.
    pub target_major: u32,

    /// Major version assumed for headers without a `version` key.
    pub legacy_major: u32,
}

impl Default for AdaptConfig {
    fn default() -> Self {
        Self {
            target_major: CURRENT_MAJOR_VERSION,
            legacy_major: LEGACY_MAJOR_VERSION,
        }
    }
}
