//! Adapter registry keyed by (source, target) major version.
//!
//! The registry selects the adapter for a message from the version its
//! header declares and the version the receiving peer speaks. Pairs with
//! no registered adapter, including same-version pairs, pass through.

use super::AdaptConfig;
use crate::message::{
    adapters::{IdentifierTokenResolver, V4ToV5Adapter, V5ToV4Adapter},
    domain::{Header, Message, major_version},
    error::{AdaptError, AdaptResult},
    ports::{MessageAdapter, TokenResolver},
};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

static DEFAULT_REGISTRY: Lazy<AdapterRegistry> = Lazy::new(AdapterRegistry::new);

/// Registry of message adapters keyed by `(from, to)` major version.
///
/// Build it once at start-up; it is immutable afterwards and can be
/// shared across threads without locking.
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::domain::{Header, Message};
/// use msgspec_adapter::message::versioning::AdapterRegistry;
/// use serde_json::json;
///
/// let registry = AdapterRegistry::new();
/// let content = json!({"prompt": "> ", "password": true});
/// let message = Message::new(
///     Header::new("input_request").with_version("5.0"),
///     content.as_object().cloned().unwrap_or_default(),
/// );
///
/// let adapted = registry.adapt(message, 4).expect("should adapt");
/// assert!(adapted.content().get("password").is_none());
/// ```
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<(u32, u32), Box<dyn MessageAdapter>>,
    config: AdaptConfig,
}

impl AdapterRegistry {
    /// Creates a registry with the protocol 4/5 adapters in both directions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_token_resolver(Arc::new(IdentifierTokenResolver::new()))
    }

    /// Creates the default registry, resolving inspection targets with the
    /// given token resolver.
    #[must_use]
    pub fn with_token_resolver(resolver: Arc<dyn TokenResolver>) -> Self {
        let mut registry = Self::empty();
        registry.register(5, 4, Box::new(V5ToV4Adapter::with_resolver(resolver)));
        registry.register(4, 5, Box::new(V4ToV5Adapter::default()));
        registry
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Applies version settings.
    #[must_use]
    pub fn with_config(mut self, config: AdaptConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the version settings.
    #[must_use]
    pub const fn config(&self) -> &AdaptConfig {
        &self.config
    }

    /// Registers an adapter for a version pair.
    ///
    /// If an adapter is already registered for the pair, it is replaced.
    pub fn register(
        &mut self,
        from_version: u32,
        to_version: u32,
        adapter: Box<dyn MessageAdapter>,
    ) {
        self.adapters.insert((from_version, to_version), adapter);
    }

    /// Returns `true` if an adapter is registered for the version pair.
    #[must_use]
    pub fn has_adapter(&self, from_version: u32, to_version: u32) -> bool {
        self.adapters.contains_key(&(from_version, to_version))
    }

    /// Returns the adapter registered for the version pair.
    #[must_use]
    pub fn get(&self, from_version: u32, to_version: u32) -> Option<&dyn MessageAdapter> {
        self.adapters
            .get(&(from_version, to_version))
            .map(|adapter| adapter.as_ref())
    }

    /// Returns the major version a header was sent with.
    ///
    /// Headers without a `version` key predate protocol 5 and are assumed
    /// to be at the configured legacy version.
    ///
    /// # Errors
    ///
    /// Returns `AdaptError::InvalidVersion` if the leading segment of the
    /// declared version is not an integer.
    pub fn source_major_version(&self, header: &Header) -> AdaptResult<u32> {
        self.declared_major(header.version())
    }

    /// Adapts a message to the target major version.
    ///
    /// # Errors
    ///
    /// - Returns `AdaptError::InvalidVersion` if the header declares an
    ///   unparseable version.
    /// - Propagates any error raised by the selected adapter.
    pub fn adapt(&self, message: Message, to_version: u32) -> AdaptResult<Message> {
        let from_version = self.source_major_version(message.header())?;
        match self.get(from_version, to_version) {
            Some(adapter) => adapter.adapt(message),
            None => {
                debug!(from_version, to_version, "no adapter registered, passing through");
                Ok(message)
            }
        }
    }

    /// Adapts a message to the configured target major version.
    ///
    /// # Errors
    ///
    /// See [`AdapterRegistry::adapt`].
    pub fn adapt_to_default(&self, message: Message) -> AdaptResult<Message> {
        self.adapt(message, self.config.target_major)
    }

    /// Adapts a message in JSON wire form to the target major version.
    ///
    /// When no adapter applies the value is returned exactly as given,
    /// without being decoded.
    ///
    /// # Errors
    ///
    /// - Returns `AdaptError::InvalidVersion` if the header declares an
    ///   unparseable version.
    /// - Returns `AdaptError::MalformedMessage` if an adapter applies but
    ///   the value is not a well-formed message.
    /// - Propagates any error raised by the selected adapter.
    pub fn adapt_value(&self, value: Value, to_version: u32) -> AdaptResult<Value> {
        let declared = match value.get("header").and_then(|header| header.get("version")) {
            None | Some(Value::Null) => None,
            Some(Value::String(version)) => Some(version.as_str()),
            Some(other) => return Err(AdaptError::InvalidVersion(other.to_string())),
        };
        let from_version = self.declared_major(declared)?;

        let Some(adapter) = self.get(from_version, to_version) else {
            debug!(from_version, to_version, "no adapter registered, passing through");
            return Ok(value);
        };
        adapter.adapt(Message::from_value(value)?)?.into_value()
    }

    fn declared_major(&self, version: Option<&str>) -> AdaptResult<u32> {
        match version {
            None => Ok(self.config.legacy_major),
            Some(declared) => major_version(declared)
                .ok_or_else(|| AdaptError::InvalidVersion(declared.to_owned())),
        }
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pairs: Vec<&(u32, u32)> = self.adapters.keys().collect();
        pairs.sort_unstable();
        f.debug_struct("AdapterRegistry")
            .field("pairs", &pairs)
            .field("config", &self.config)
            .finish()
    }
}

/// Returns the process-wide registry, built on first use.
#[must_use]
pub fn default_registry() -> &'static AdapterRegistry {
    &DEFAULT_REGISTRY
}

/// Adapts a message to the target major version using the default registry.
///
/// # Errors
///
/// See [`AdapterRegistry::adapt`].
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::domain::Message;
/// use msgspec_adapter::message::versioning::adapt;
/// use serde_json::json;
///
/// let message = Message::from_value(json!({
///     "header": {"msg_type": "pyout"},
///     "content": {"data": {}},
///     "metadata": {}
/// }))
/// .expect("valid message");
///
/// let adapted = adapt(message, 5).expect("should adapt");
/// assert_eq!(adapted.msg_type(), "execute_result");
/// ```
pub fn adapt(message: Message, to_version: u32) -> AdaptResult<Message> {
    DEFAULT_REGISTRY.adapt(message, to_version)
}

/// Adapts a JSON wire message using the default registry.
///
/// # Errors
///
/// See [`AdapterRegistry::adapt_value`].
pub fn adapt_value(value: Value, to_version: u32) -> AdaptResult<Value> {
    DEFAULT_REGISTRY.adapt_value(value, to_version)
}
