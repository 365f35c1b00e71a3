//! Configuration for the topic jail
//!
//! The configuration is created once at startup and is read-only afterwards;
//! every handler invocation shares it behind an `Arc` without locking.
//!
//! ## Configuration Sources
//!
//! Configuration is layered with this precedence (highest last):
//! 1. Built-in defaults ([`defaults`])
//! 2. A TOML file ([`JailConfig::from_file`])
//! 3. Ordered `(key, value)` option pairs from the host's config loader
//!    ([`JailConfig::apply_overrides`])
//!
//! ## Example
//!
//! ```toml
//! # jail.toml
//! username = "admin"
//! get_topic = "$dps/registrations/GET/iotdps-get-operationstatus/"
//! put_topic = "$dps/registrations/PUT/iotdps-register/"
//! sub_topic = "$dps/registrations/res/#"
//! ```

mod defaults;

pub use defaults::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{JailError, Result};

/// Jail configuration: the admin exemption prefix and the three fixed
/// provisioning exception topics.
///
/// All four fields must be non-empty; [`JailConfig::validate`] enforces this
/// and [`crate::JailEnforcer::new`] calls it before accepting a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JailConfig {
    /// Client identifier prefix exempt from jailing.
    ///
    /// The exemption is a raw prefix test: `"admin2"` and `"admin-backup"`
    /// are exempt too. See [`crate::jail::is_jailed`].
    #[serde(alias = "username")]
    pub admin_id: String,

    /// Fixed provisioning status topic, always writable by jailed clients
    pub get_topic: String,

    /// Fixed provisioning registration topic, always writable by jailed
    /// clients
    pub put_topic: String,

    /// Fixed provisioning response filter, always subscribable by jailed
    /// clients
    pub sub_topic: String,
}

impl Default for JailConfig {
    fn default() -> Self {
        Self {
            admin_id: DEFAULT_ADMIN_ID.to_string(),
            get_topic: DEFAULT_GET_TOPIC.to_string(),
            put_topic: DEFAULT_PUT_TOPIC.to_string(),
            sub_topic: DEFAULT_SUB_TOPIC.to_string(),
        }
    }
}

impl JailConfig {
    /// Build a configuration from defaults plus an ordered sequence of
    /// `(key, value)` option pairs, then validate it.
    pub fn from_options<'a, I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        config.apply_overrides(options);
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&contents).map_err(|e| {
            JailError::Config(format!(
                "failed to parse {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply host-supplied option overrides in order.
    ///
    /// Recognized keys (case-insensitive): `username`, `get_topic`,
    /// `put_topic`, `sub_topic`. Unrecognized keys are ignored. Later entries
    /// for the same key win; there is no deduplication pass.
    pub fn apply_overrides<'a, I>(&mut self, options: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in options {
            match key.to_ascii_lowercase().as_str() {
                "username" => self.admin_id = value.to_string(),
                "get_topic" => self.get_topic = value.to_string(),
                "put_topic" => self.put_topic = value.to_string(),
                "sub_topic" => self.sub_topic = value.to_string(),
                other => {
                    debug!(key = %other, "Ignoring unrecognized jail option");
                }
            }
        }
    }

    /// Check that all four fields are non-empty.
    ///
    /// An empty `admin_id` would exempt every client (every string starts
    /// with the empty prefix) and an empty topic pattern would match every
    /// topic, so both are rejected.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("username", &self.admin_id),
            ("get_topic", &self.get_topic),
            ("put_topic", &self.put_topic),
            ("sub_topic", &self.sub_topic),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(JailError::Config(format!("`{name}` must not be empty")));
            }
        }
        Ok(())
    }

    /// Emit one informational line listing the active configuration values.
    pub fn log_active(&self) {
        info!(
            username = %self.admin_id,
            get_topic = %self.get_topic,
            put_topic = %self.put_topic,
            sub_topic = %self.sub_topic,
            "Topic jail configuration active"
        );
    }
}
