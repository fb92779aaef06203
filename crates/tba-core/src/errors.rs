use std::fmt;

use crate::status::StatusFamily;

/// Core error type for the Bot API client.
///
/// Every API operation fails with exactly one of the first four variants.
/// `Config` is only produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    PlatformStatus(#[from] PlatformStatusError),

    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),

    #[error("client usage error: {0}")]
    ClientUsage(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The network exchange itself failed; no HTTP response was received.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

/// An HTTP response arrived but its status (or the platform envelope) signals failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformStatusError {
    pub family: StatusFamily,
    pub status: u16,
    pub reason: String,
    /// Request URL with the bot token redacted.
    pub url: String,
    /// `Location` header of a redirect response.
    pub location: Option<String>,
    /// `error_code` reported inside the platform envelope.
    pub error_code: Option<i64>,
    pub description: Option<String>,
    /// Seconds to wait before repeating the request (flood control).
    pub retry_after: Option<u64>,
    /// The group was migrated to a supergroup with this id.
    pub migrate_to_chat_id: Option<i64>,
}

impl fmt::Display for PlatformStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_code {
            Some(code) if code != i64::from(self.status) => write!(
                f,
                "{} '{}' (HTTP {} {}) for url '{}'",
                self.family.label(),
                code,
                self.status,
                self.reason,
                self.url
            )?,
            _ => write!(
                f,
                "{} '{} {}' for url '{}'",
                self.family.label(),
                self.status,
                self.reason,
                self.url
            )?,
        }
        if let Some(location) = &self.location {
            write!(f, "\nRedirect location: '{location}'")?;
        }
        if let Some(description) = &self.description {
            write!(f, " ({description})")?;
        }
        Ok(())
    }
}

impl std::error::Error for PlatformStatusError {}

/// A payload did not match the shape of the entity it was parsed into.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid {entity} at `{path}`: {message}")]
pub struct SchemaValidationError {
    pub entity: String,
    /// Dotted field path; `.` is the payload root.
    pub path: String,
    pub message: String,
}

impl SchemaValidationError {
    pub fn new(entity: impl Into<String>, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Re-root the path under `prefix` (e.g. `result`).
    pub fn within(mut self, prefix: &str) -> Self {
        self.path = if self.path == "." {
            prefix.to_string()
        } else if self.path.starts_with('[') {
            format!("{prefix}{}", self.path)
        } else {
            format!("{prefix}.{}", self.path)
        };
        self
    }

    /// Whether the failure names `field` (in the path or in the underlying message).
    pub fn mentions(&self, field: &str) -> bool {
        self.path.split(['.', '[']).any(|seg| seg == field) || self.message.contains(field)
    }
}
