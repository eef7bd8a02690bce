//! Error types for message construction and sending
//!
//! Every defect raised while assembling or validating an outbound message is
//! terminal: it describes something the caller has to fix before submitting
//! again. None of them is worth retrying.
//!
//! # Example
//!
//! ```
//! use datovka_core::{MessageBuilder, MessageError, MessageErrorKind};
//!
//! let err = MessageBuilder::new().build().unwrap_err();
//! assert_eq!(err.kind(), MessageErrorKind::MissingRequiredField);
//! assert!(matches!(err, MessageError::MissingRequiredField(_)));
//! ```

use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;

use crate::outcome::STATUS_INTERNAL_ERROR;

/// Structural defects of an outbound message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Envelope, annotation or recipient is absent or blank
    #[error("Required field '{0}' is missing or empty")]
    MissingRequiredField(Cow<'static, str>),

    /// More recipients than the service accepts
    #[error("Recipient count {count} exceeds maximum {max}")]
    RecipientCountOverflow {
        /// Number of recipients in the message
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// A data message must carry at least one file
    #[error("Missing main file: at least one attachment is required")]
    MissingMainFile,

    /// Attachments together exceed the size ceiling
    #[error("Total size {} exceeds maximum {}", format_size(*.total), format_size(*.max))]
    FileSizeOverflow {
        /// Total attachment size that was rejected
        total: u64,
        /// Configured maximum
        max: u64,
    },

    /// Attachment path does not point to an existing file
    #[error("Attachment file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Required argument is absent or blank
    #[error("Argument '{0}' must not be empty")]
    InvalidArgument(Cow<'static, str>),

    /// Attachment exists but could not be read
    #[error("Attachment I/O error: {message}")]
    Io {
        /// Kind of the underlying I/O failure
        kind: std::io::ErrorKind,
        /// Message of the underlying I/O failure
        message: String,
    },
}

/// Fieldless discriminant of [`MessageError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageErrorKind {
    /// See [`MessageError::MissingRequiredField`]
    MissingRequiredField,
    /// See [`MessageError::RecipientCountOverflow`]
    RecipientCountOverflow,
    /// See [`MessageError::MissingMainFile`]
    MissingMainFile,
    /// See [`MessageError::FileSizeOverflow`]
    FileSizeOverflow,
    /// See [`MessageError::FileNotFound`]
    FileNotFound,
    /// See [`MessageError::InvalidArgument`]
    InvalidArgument,
    /// See [`MessageError::Io`]
    Io,
}

impl MessageError {
    /// Returns the kind of this defect
    #[must_use]
    pub fn kind(&self) -> MessageErrorKind {
        match self {
            MessageError::MissingRequiredField(_) => MessageErrorKind::MissingRequiredField,
            MessageError::RecipientCountOverflow { .. } => {
                MessageErrorKind::RecipientCountOverflow
            }
            MessageError::MissingMainFile => MessageErrorKind::MissingMainFile,
            MessageError::FileSizeOverflow { .. } => MessageErrorKind::FileSizeOverflow,
            MessageError::FileNotFound(_) => MessageErrorKind::FileNotFound,
            MessageError::InvalidArgument(_) => MessageErrorKind::InvalidArgument,
            MessageError::Io { .. } => MessageErrorKind::Io,
        }
    }

    /// Name of the missing field or offending argument, if any
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match self {
            MessageError::MissingRequiredField(name) | MessageError::InvalidArgument(name) => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Create a missing-field error with static context (zero allocation)
    #[must_use]
    pub const fn missing_field(field: &'static str) -> Self {
        MessageError::MissingRequiredField(Cow::Borrowed(field))
    }

    /// Create an invalid-argument error with static context (zero allocation)
    #[must_use]
    pub const fn invalid_argument(argument: &'static str) -> Self {
        MessageError::InvalidArgument(Cow::Borrowed(argument))
    }
}

impl From<std::io::Error> for MessageError {
    fn from(err: std::io::Error) -> Self {
        MessageError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Errors of the external transport collaborator
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error below the SOAP layer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Service could not be reached
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication was rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Response could not be interpreted
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Transport-specific error
    #[error("Transport error: {0}")]
    Other(String),
}

/// Errors of the send operation
#[derive(Debug, Error)]
pub enum ClientError {
    /// Message failed local validation; nothing was sent
    #[error(transparent)]
    Message(#[from] MessageError),

    /// Transport failed to deliver the request
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Service answered with a non-success status
    #[error("Operation failed with status {code}: {message}")]
    Status {
        /// ISDS status code
        code: String,
        /// ISDS status message
        message: String,
    },
}

impl ClientError {
    /// Status code to report for this error in an outcome envelope
    #[must_use]
    pub fn status_code(&self) -> &str {
        match self {
            ClientError::Status { code, .. } => code,
            _ => STATUS_INTERNAL_ERROR,
        }
    }
}

/// Result type for message construction and validation
pub type Result<T> = std::result::Result<T, MessageError>;

/// Result type for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    const KIB: u64 = 1024;

    if bytes >= MIB {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
