//! Storefront: an event-driven shop client core.
//!
//! Browse a product catalog, inspect products, keep a basket, and check out through a
//! two-step order form. Every UI update is driven by events on a publish/subscribe bus;
//! the view layer only receives typed render instructions and emits named events.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Console shell (main.rs)                            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime.rs)                               │  ← Pumps actions
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ App Layer     │   │ UI Layer      │   │ API Layer     │
//! │ (app/)        │   │ (ui/)         │   │ (api/)        │
//! │ - AppState    │   │ - View models │   │ - ShopApi     │
//! │ - Coordinator │   │ - View trait  │   │ - reqwest     │
//! │ - FlowPhase   │   │ - Console     │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Event bus (events/) and domain types (domain/)     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional export
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`events`]: Event bus, matchers, payloads, event names
//! - [`domain`]: Products, draft order, validation, errors
//! - [`app`]: Application state and the coordinator
//! - [`api`]: Shop API trait and HTTP client
//! - [`ui`]: View models, the `View` boundary, console front end
//! - [`runtime`]: Wiring and the action pump
//! - [`infrastructure`]: Per-user paths
//! - [`observability`]: Tracing setup and span export
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/storefront/config.toml
//! api_url = "http://localhost:3000/api/weblarek"
//! cdn_url = "http://localhost:3000/content/weblarek"
//! currency = "synapses"
//! keep_basket_on_failure = false
//! request_timeout_secs = 10
//! trace_level = "info"
//! trace_file = "storefront-trace.jsonl"
//! ```
//!
//! Every key can be overridden by a `STOREFRONT_<KEY>` environment variable.
//!
//! # Example
//!
//! ```
//! use storefront::events::{names, EventPayload};
//! use storefront::{initialize, Config};
//!
//! let shop = initialize(&Config::default());
//! shop.bus().emit(names::BASKET_OPEN, &EventPayload::Empty);
//! assert_eq!(shop.state().basket_len(), 0);
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod events;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod ui;

pub use app::{Action, AppState, Coordinator, FlowPhase, RenderInstruction};
pub use domain::{Result, StorefrontError};
pub use events::{EventBus, EventPayload, Matcher};
pub use runtime::Storefront;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use ui::{DisplaySettings, Theme};

/// Prefix of environment variables overriding configuration keys.
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Client configuration.
///
/// Built from defaults, then a TOML file, then string overrides (environment).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the shop REST API.
    pub api_url: String,

    /// Base URL product image paths are relative to.
    pub cdn_url: String,

    /// Currency name shown after prices. Default: `"synapses"`
    pub currency: String,

    /// Keep basket and draft when the shop refuses an order.
    ///
    /// Orders that never reach the shop always keep them. Default: `false`
    pub keep_basket_on_failure: bool,

    /// Per-request timeout, at least 1. Default: 10
    pub request_timeout_secs: u64,

    /// Tracing filter, e.g. `"debug"` or `"storefront=trace"`.
    ///
    /// `RUST_LOG` takes precedence. Default: `"warn"`
    pub trace_level: Option<String>,

    /// JSON-lines span export file; relative paths resolve in the data directory.
    pub trace_file: Option<String>,

    /// Colored console output. Default: `true`
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api/weblarek".to_string(),
            cdn_url: "http://localhost:3000/content/weblarek".to_string(),
            currency: DisplaySettings::default().currency,
            keep_basket_on_failure: false,
            request_timeout_secs: 10,
            trace_level: None,
            trace_file: None,
            color: true,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(StorefrontError::Config(format!(
            "{key}: expected a boolean, got `{other}`"
        ))),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl Config {
    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration,
    /// including a zero `request_timeout_secs`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.request_timeout_secs == 0 {
            return Err(StorefrontError::Config(
                "request_timeout_secs: must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    /// Builds configuration from defaults and a key/value map.
    ///
    /// # Errors
    ///
    /// See [`with_overrides`](Self::with_overrides).
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use storefront::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "https://shop.example/api".to_string());
    /// map.insert("keep_basket_on_failure".to_string(), "yes".to_string());
    ///
    /// let config = Config::from_map(&map)?;
    /// assert_eq!(config.api_url, "https://shop.example/api");
    /// assert!(config.keep_basket_on_failure);
    /// assert_eq!(config.request_timeout_secs, 10);
    /// # Ok::<(), storefront::StorefrontError>(())
    /// ```
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        Self::default().with_overrides(map)
    }

    /// Applies string overrides on top of `self`.
    ///
    /// Unknown keys are ignored. Empty `trace_level`/`trace_file` values unset them.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Config`] if a boolean or numeric value does not parse,
    /// or `request_timeout_secs` is zero.
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Result<Self> {
        for (key, value) in map {
            match key.as_str() {
                "api_url" => self.api_url = value.trim().to_string(),
                "cdn_url" => self.cdn_url = value.trim().to_string(),
                "currency" => self.currency = value.trim().to_string(),
                "keep_basket_on_failure" => self.keep_basket_on_failure = parse_bool(key, value)?,
                "request_timeout_secs" => {
                    self.request_timeout_secs = value.trim().parse().map_err(|e| {
                        StorefrontError::Config(format!("{key}: {e}"))
                    })?;
                }
                "trace_level" => self.trace_level = non_empty(value),
                "trace_file" => self.trace_file = non_empty(value),
                "color" => self.color = parse_bool(key, value)?,
                _ => tracing::debug!(key = %key, "ignoring unknown configuration key"),
            }
        }
        self.validate()
    }

    /// `STOREFRONT_*` variables as a lowercase key map.
    #[must_use]
    pub fn env_overrides() -> BTreeMap<String, String> {
        std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_ascii_lowercase(), value))
            })
            .collect()
    }

    /// Loads the effective configuration.
    ///
    /// An explicit `path` must exist. Without one, the per-user config file is used when
    /// present. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => match infrastructure::config_file() {
                Some(default) if default.exists() => Self::from_file(default)?,
                _ => Self::default(),
            },
        };
        base.with_overrides(&Self::env_overrides())
    }

    /// Price and image formatting settings.
    #[must_use]
    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            cdn_url: self.cdn_url.clone(),
            currency: self.currency.clone(),
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Console theme honoring [`color`](Self::color).
    #[must_use]
    pub fn theme(&self) -> Theme {
        if self.color {
            Theme::default()
        } else {
            Theme::plain()
        }
    }
}

/// Builds a storefront from configuration.
///
/// Does not touch the network or install tracing; see [`observability::init_tracing`]
/// and [`Storefront::start`].
#[must_use]
pub fn initialize(config: &Config) -> Storefront {
    tracing::debug!(api_url = %config.api_url, "initializing storefront");
    Storefront::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn toml_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "currency = \"credits\"\nkeep_basket_on_failure = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.currency, "credits");
        assert!(config.keep_basket_on_failure);
        assert_eq!(config.api_url, Config::default().api_url);
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scan_depth = 4\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(StorefrontError::ConfigParse(_))
        ));
    }

    #[test]
    fn overrides_apply_over_file_values() {
        let base = Config {
            trace_file: Some("trace.jsonl".into()),
            ..Config::default()
        };

        let config = base
            .with_overrides(&map(&[
                ("request_timeout_secs", "3"),
                ("trace_file", ""),
                ("color", "off"),
                ("unrelated", "x"),
            ]))
            .unwrap();

        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.trace_file, None);
        assert!(!config.color);
        assert_eq!(config.theme(), Theme::plain());
    }

    #[test]
    fn invalid_override_values_are_errors() {
        assert!(matches!(
            Config::from_map(&map(&[("request_timeout_secs", "soon")])),
            Err(StorefrontError::Config(_))
        ));
        assert!(matches!(
            Config::from_map(&map(&[("keep_basket_on_failure", "maybe")])),
            Err(StorefrontError::Config(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(
            Config::from_map(&map(&[("request_timeout_secs", "0")])),
            Err(StorefrontError::Config(ref message)) if message.contains("request_timeout_secs")
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout_secs = 0\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(StorefrontError::Config(_))
        ));
    }

    #[test]
    fn display_settings_follow_config() {
        let config = Config::from_map(&map(&[("currency", "credits")])).unwrap();
        assert_eq!(config.display_settings().price(Some(5)), "5 credits");
    }
}
