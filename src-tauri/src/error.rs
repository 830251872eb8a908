use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failures raised by the document and blob backends.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email is already registered")]
    EmailInUse,

    #[error("Federated sign-in is not available")]
    FederatedUnavailable,

    #[error("Invalid sign-in token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    Mobile,
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Every failing field of a form, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message_for(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("\n"))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please describe the issue")]
    MissingIssue,

    #[error("Please select a date")]
    MissingDate,

    #[error("Please select a time")]
    MissingTime,

    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,

    #[error("{0}")]
    Form(FormErrors),
}

/// Error type of every repository and screen session operation.
///
/// The `Display` output is the user-facing message published in error
/// states and returned over IPC.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    NotFound(String),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Image upload failed: {0}")]
    Upload(StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Maps a backend `NotFound` onto the user-facing message, passing every
    /// other failure through.
    pub fn not_found_as(err: StoreError, message: &str) -> Self {
        match err {
            StoreError::NotFound { .. } => ServiceError::NotFound(message.to_string()),
            other => ServiceError::Store(other),
        }
    }
}
