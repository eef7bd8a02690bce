//! Send operation on top of a pluggable transport.
//!
//! The SOAP binding itself is not part of this crate. Anything that can
//! deliver a `CreateMessage` request implements [`MessageTransport`];
//! [`DataBoxApi`] validates every message again before handing it over.

use async_trait::async_trait;
use std::path::Path;
use tracing::{info, warn};

use crate::attachment::Attachment;
use crate::error::{ClientError, MessageError, TransportResult};
use crate::message::{AttachmentEntry, Envelope, OutboundMessage};
use crate::outcome::{Outcome, STATUS_OK};
use crate::validator::MessageValidator;

/// Status block of a service response (`dmStatus`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    /// Status code, `"0000"` on success
    pub code: String,
    /// Status message
    pub message: String,
}

/// Response to `CreateMessage`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateMessageOutput {
    /// ID assigned to the new message (`dmID`)
    pub message_id: Option<String>,
    /// Status block, if the service returned one
    pub status: Option<ServiceStatus>,
}

/// Delivers `CreateMessage` requests to the operations service
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Submit a message
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the request could not be delivered or
    /// the response could not be read.
    async fn create_message(&self, message: &OutboundMessage)
    -> TransportResult<CreateMessageOutput>;
}

/// Message operations of a Data Box account
pub struct DataBoxApi<T> {
    transport: T,
    validator: MessageValidator,
}

impl<T: MessageTransport> DataBoxApi<T> {
    /// Create an API using the service ceilings
    pub fn new(transport: T) -> Self {
        Self::with_validator(transport, MessageValidator::default())
    }

    /// Create an API with a custom validator
    pub fn with_validator(transport: T, validator: MessageValidator) -> Self {
        Self {
            transport,
            validator,
        }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a data message
    ///
    /// The message is validated before the transport is called. A missing
    /// status in the response counts as success.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Message`] if validation fails; nothing is sent
    /// - [`ClientError::Transport`] if the transport fails
    pub async fn send_data_message(
        &self,
        message: &OutboundMessage,
    ) -> Result<Outcome<CreateMessageOutput>, ClientError> {
        self.validator.validate_for_sending(message)?;

        info!(
            "Sending message to {} with {} attachment(s)",
            message.recipient_id().unwrap_or_default(),
            message.files().len()
        );
        let output = self.transport.create_message(message).await?;

        let (code, status_message) = match &output.status {
            Some(status) => (status.code.clone(), status.message.clone()),
            None => (STATUS_OK.to_string(), "Success".to_string()),
        };
        if code != STATUS_OK {
            warn!("Service rejected message: {} {}", code, status_message);
        }
        Ok(Outcome::success_with_status(output, code, status_message))
    }

    /// Assemble a message from prepared attachments
    ///
    /// The message is not validated; [`DataBoxApi::send_data_message`]
    /// does that.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidArgument`] for a blank recipient or
    /// subject.
    pub fn create_basic_data_message(
        &self,
        recipient_id: &str,
        subject: &str,
        attachments: Vec<Attachment>,
    ) -> Result<OutboundMessage, MessageError> {
        if recipient_id.trim().is_empty() {
            return Err(MessageError::invalid_argument("recipient"));
        }
        if subject.trim().is_empty() {
            return Err(MessageError::invalid_argument("subject"));
        }

        let envelope = Envelope {
            recipient_id: Some(recipient_id.to_string()),
            annotation: Some(subject.to_string()),
            ..Envelope::default()
        };
        let files = attachments.into_iter().map(AttachmentEntry::from).collect();
        Ok(OutboundMessage::new(envelope, files))
    }

    /// Assemble a message from files on disk
    ///
    /// Paths that do not name an existing file are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidArgument`] for a blank recipient or
    /// subject, or [`MessageError::Io`] if an existing file cannot be read.
    pub fn create_basic_data_message_from_paths<P: AsRef<Path>>(
        &self,
        recipient_id: &str,
        subject: &str,
        paths: &[P],
    ) -> Result<OutboundMessage, MessageError> {
        let mut attachments = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                warn!("Skipping missing attachment {}", path.display());
                continue;
            }
            attachments.push(Attachment::from_file(path)?);
        }
        self.create_basic_data_message(recipient_id, subject, attachments)
    }
}
