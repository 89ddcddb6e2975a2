//! # Errors
//!
//! Centralized error handling for ripple.
//! Each collaborator gets its own enum; `AppError` is what a request ends with.

use thiserror::Error;

/// Failure of a single call to the datastore collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backend could not be reached or rejected the query
    #[error("datastore unavailable: {0}")]
    Unavailable(String),

    /// A row came back in a shape the mapping could not read
    #[error("malformed row in {table}: {reason}")]
    Malformed { table: &'static str, reason: String },
}

/// Failure of the text-generation collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// No credential was configured; raised before any network call.
    #[error("Hugging Face API key not configured")]
    MissingCredential,

    /// The endpoint answered with a non-success status.
    /// Retriable by the caller (rate limiting, cold model, ...).
    #[error("AI API error: {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, timeout).
    #[error("AI API request failed: {0}")]
    Transport(String),

    /// The call succeeded but no generated text was present.
    #[error("AI API returned no generated text")]
    EmptyOutput,

    /// The call succeeded but the payload was not the expected JSON.
    #[error("AI API returned an unreadable payload: {0}")]
    MalformedPayload(String),
}

/// Failure to pull a JSON object out of generated text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    #[error("No JSON found in response")]
    NotFound,

    #[error("Failed to parse JSON from AI response: {0}")]
    Invalid(String),
}

/// Session verification failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("missing credentials")]
    Missing,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// The primary error type a request terminates with.
#[derive(Error, Debug)]
pub enum AppError {
    /// No valid session (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found (e.g. Donor)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Required configuration is absent
    #[error("{0}")]
    Config(String),

    /// The generation endpoint failed or could not be reached
    #[error("{0}")]
    Upstream(String),

    /// The generation call succeeded but its payload was unusable
    #[error("{0}")]
    Parse(String),

    /// Infrastructure failure
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::NotFound(..) => "not_found",
            AppError::Config(_) => "config",
            AppError::Upstream(_) => "upstream",
            AppError::Parse(_) => "parse",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::MissingCredential => AppError::Config(err.to_string()),
            GenerationError::Upstream { .. } | GenerationError::Transport(_) => {
                AppError::Upstream(err.to_string())
            }
            GenerationError::EmptyOutput | GenerationError::MalformedPayload(_) => {
                AppError::Parse(err.to_string())
            }
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        AppError::Unauthorized
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// A specialized Result type for ripple request handling.
pub type Result<T> = std::result::Result<T, AppError>;
