//! Error handling for PG Admin
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Main error type for PG Admin
#[derive(Error, Debug)]
pub enum PgAdminError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Login error: {0}")]
    Login(#[from] LoginError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Form file error: {0}")]
    FormFile(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Remote API specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API request failed: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API timeout")]
    Timeout,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("API service unavailable")]
    ServiceUnavailable,
}

/// Login attempt failures, each carrying the message shown next to the form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("Too many failed attempts. Please wait {remaining_seconds} seconds.")]
    LockedOut { remaining_seconds: u64 },

    #[error("Please fill in all fields")]
    MissingFields { locked_for: Option<u64> },

    #[error("Invalid credentials.")]
    InvalidCredentials { locked_for: Option<u64> },
}

impl LoginError {
    /// Lockout started by this failure, in seconds
    pub fn locked_for(&self) -> Option<u64> {
        match self {
            LoginError::LockedOut { .. } => None,
            LoginError::MissingFields { locked_for } | LoginError::InvalidCredentials { locked_for } => *locked_for,
        }
    }

    /// Whether the attempt was rejected before any network call
    pub fn is_lockout(&self) -> bool {
        matches!(self, LoginError::LockedOut { .. })
    }
}

/// Field-keyed validation messages produced by form checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for a field, replacing any earlier one
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Convert into a `Result`, failing when any field has an error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(PgAdminError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Result type alias for PG Admin operations
pub type Result<T> = std::result::Result<T, PgAdminError>;

impl PgAdminError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            PgAdminError::Api(_) => true,
            PgAdminError::Login(e) => e.is_lockout(),
            PgAdminError::Config(_) => false,
            PgAdminError::NotAuthenticated => true,
            PgAdminError::NotFound { .. } => false,
            PgAdminError::InvalidStateTransition { .. } => false,
            PgAdminError::Validation(_) => true,
            PgAdminError::Http(_) => true,
            PgAdminError::Serialization(_) => false,
            PgAdminError::FormFile(_) => true,
            PgAdminError::Io(_) => true,
            PgAdminError::UrlParse(_) => false,
            PgAdminError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PgAdminError::Config(_) => ErrorSeverity::Critical,
            PgAdminError::UrlParse(_) => ErrorSeverity::Critical,
            PgAdminError::Login(_) => ErrorSeverity::Warning,
            PgAdminError::NotAuthenticated => ErrorSeverity::Warning,
            PgAdminError::Validation(_) => ErrorSeverity::Info,
            PgAdminError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Message suitable for a page banner
    pub fn user_message(&self) -> String {
        match self {
            PgAdminError::Api(_) | PgAdminError::Http(_) => {
                "Something went wrong while talking to the server. Please try again.".to_string()
            }
            PgAdminError::Login(e) => e.to_string(),
            PgAdminError::Validation(errors) => format!("Please fix the highlighted fields ({})", errors.len()),
            other => other.to_string(),
        }
    }
}

/// Error severity levels, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
