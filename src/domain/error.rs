//! Error types for the storefront client.
//!
//! This module defines the centralized error type [`StorefrontError`] and a type alias
//! [`Result`] used throughout the crate. Validation problems in the draft order are *not*
//! errors in this sense: they are surfaced as [`FormErrors`](crate::domain::FormErrors) and
//! block submission without failing any operation.

use thiserror::Error;

/// The main error type for storefront operations.
///
/// Covers the HTTP boundary (transport and API status failures), configuration loading,
/// and event payloads that do not carry the shape a handler expects.
///
/// # Examples
///
/// ```
/// use storefront::StorefrontError;
///
/// let err = StorefrontError::Api { status: 400, message: "Неверная сумма заказа".into() };
/// assert_eq!(err.to_string(), "API responded with 400: Неверная сумма заказа");
/// ```
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The HTTP request could not be sent or its body could not be read.
    ///
    /// Wraps `reqwest` transport and body-decoding failures.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    ///
    /// `message` is the `error` field of the response body when present, otherwise the
    /// canonical reason phrase of the status.
    #[error("API responded with {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided or canonical error description.
        message: String,
    },

    /// JSON encoding or decoding failed outside of an HTTP exchange.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration file is not valid TOML for [`Config`](crate::Config).
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// An event arrived with a payload variant its handler cannot use.
    #[error("unexpected payload for `{event}`: expected {expected}")]
    Payload {
        /// Name of the emitted event.
        event: String,
        /// Payload variant the handler needs.
        expected: &'static str,
    },

    /// A draft-order field name outside `payment`, `address`, `email`, `phone`.
    #[error("unknown order field: {0}")]
    UnknownField(String),

    /// A payment method other than `online` or `cash`.
    #[error("unknown payment method: {0}")]
    UnknownPayment(String),

    /// A console command referenced a product that is not in the catalog or basket.
    #[error("no such product: {0}")]
    UnknownProduct(String),

    /// A console line that does not parse as a command.
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),
}

/// A specialized `Result` type for storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;
