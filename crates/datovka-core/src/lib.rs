//! # Datovka Core
//!
//! Client-side message handling for the Czech Data Box system (ISDS,
//! "datové schránky").
//!
//! This crate provides:
//! - A fluent [`MessageBuilder`] for outbound data messages
//! - A [`MessageValidator`] enforcing recipient, attachment and size rules
//! - Attachment helpers: MIME inference and the `.txt` encoding convention
//! - Endpoint URLs and login descriptors for the six SOAP services
//! - A [`DataBoxApi`] send operation over a pluggable [`MessageTransport`]
//!
//! ## Flow
//!
//! ```text
//! MessageBuilder ──add_*──► size check per attachment
//!       │
//!     build ──────────────► full validation ──► OutboundMessage
//!                                                    │
//! DataBoxApi::send_data_message ── validation ──► MessageTransport
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attachment;
pub mod builder;
pub mod client;
pub mod codec;
pub mod endpoint;
pub mod error;
pub mod limits;
pub mod message;
pub mod outcome;
pub mod validator;

pub use attachment::Attachment;
pub use builder::MessageBuilder;
pub use client::{CreateMessageOutput, DataBoxApi, MessageTransport, ServiceStatus};
pub use endpoint::{CertificateMode, Credentials, Environment, Service};
pub use error::{ClientError, MessageError, MessageErrorKind, TransportError};
pub use limits::{MAX_RECIPIENTS, MAX_TOTAL_SIZE_BYTES, ValidationLimits};
pub use message::{AttachmentEntry, Envelope, FileContent, LegalTitle, OutboundMessage};
pub use outcome::Outcome;
pub use validator::MessageValidator;
