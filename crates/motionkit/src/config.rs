//! # Session configuration
//!
//! ## Overview
//!
//! A [SessionConfig] holds the settings that a [Session](crate::session::Session) reads while
//! processing keys. Use [SessionConfig::builder] to change any of the defaults.
//!
//! ```
//! use motionkit::config::SessionConfig;
//! use motionkit::key::{Key, NamedKey};
//!
//! let config = SessionConfig::builder()
//!     .default_mode("normal")
//!     .escape_key(Key::Named(NamedKey::Escape))
//!     .chain_placeholder("-")
//!     .max_count(100)
//!     .build();
//!
//! assert_eq!(config.clamp_count(5000), 100);
//! ```
use crate::editing::surround::SurroundMap;
use crate::key::Key;

/// Largest repeat count used when none is configured.
pub const DEFAULT_MAX_COUNT: usize = 10_000;

/// Settings for an editing session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionConfig {
    /// The mode to start in, and to fall back to after errors.
    pub default_mode: String,

    /// The key that returns to the default mode from any other mode, including insert.
    pub escape_key: Key,

    /// What to show in the status text in place of the pending keys when there aren't any.
    pub chain_placeholder: String,

    /// Delimiters used by the surround modes.
    pub surround: SurroundMap,

    /// Repeat counts above this are clamped to it.
    pub max_count: usize,
}

impl SessionConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Limit a typed repeat count to the configured maximum.
    pub fn clamp_count(&self, count: usize) -> usize {
        count.min(self.max_count).max(1)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            default_mode: "normal".into(),
            escape_key: Key::ESC,
            chain_placeholder: String::new(),
            surround: SurroundMap::default(),
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

/// Build a new [SessionConfig].
#[derive(Default)]
pub struct SessionConfigBuilder(SessionConfig);

impl SessionConfigBuilder {
    /// Finish building the [SessionConfig].
    pub fn build(self) -> SessionConfig {
        self.0
    }

    /// Set the mode to start in.
    pub fn default_mode<T: Into<String>>(mut self, v: T) -> Self {
        self.0.default_mode = v.into();
        self
    }

    /// Set the key that returns to the default mode.
    pub fn escape_key(mut self, v: Key) -> Self {
        self.0.escape_key = v;
        self
    }

    /// Set the placeholder shown when no keys are pending.
    pub fn chain_placeholder<T: Into<String>>(mut self, v: T) -> Self {
        self.0.chain_placeholder = v.into();
        self
    }

    /// Set the [SurroundMap].
    pub fn surround(mut self, v: SurroundMap) -> Self {
        self.0.surround = v;
        self
    }

    /// Set the largest repeat count.
    pub fn max_count(mut self, v: usize) -> Self {
        self.0.max_count = v.max(1);
        self
    }
}

impl From<SessionConfig> for SessionConfigBuilder {
    fn from(config: SessionConfig) -> Self {
        SessionConfigBuilder(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();

        assert_eq!(config.default_mode, "normal");
        assert_eq!(config.escape_key, Key::ESC);
        assert_eq!(config.clamp_count(0), 1);
        assert_eq!(config.clamp_count(20_000), DEFAULT_MAX_COUNT);
    }

    #[test]
    fn test_builder_from_existing() {
        let config = SessionConfigBuilder::from(SessionConfig::default()).max_count(0).build();

        assert_eq!(config.max_count, 1);
        assert_eq!(config.surround, SurroundMap::default());
    }
}
