//! Structural validation of outbound messages.

use tracing::debug;

use crate::error::{MessageError, Result};
use crate::limits::ValidationLimits;
use crate::message::{AttachmentEntry, OutboundMessage};

/// Checks the structural rules a data message must satisfy before sending
///
/// The validator holds nothing but its limits and is safe to share between
/// threads. [`MessageValidator::default`] uses the ceilings of the live
/// service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageValidator {
    limits: ValidationLimits,
}

impl MessageValidator {
    /// Create a validator with custom limits
    #[must_use]
    pub const fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Limits in effect
    #[must_use]
    pub const fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Validate a complete message
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// envelope, annotation, recipient presence, recipient count,
    /// attachment presence, total attachment size.
    ///
    /// # Errors
    ///
    /// Returns the first [`MessageError`] the message violates.
    pub fn validate_for_sending(&self, message: &OutboundMessage) -> Result<()> {
        let result = self.check(message);
        if let Err(err) = &result {
            debug!("Message rejected: {}", err);
        }
        result
    }

    fn check(&self, message: &OutboundMessage) -> Result<()> {
        let envelope = message
            .envelope
            .as_ref()
            .ok_or(MessageError::missing_field("envelope"))?;

        if is_blank(envelope.annotation.as_deref()) {
            return Err(MessageError::missing_field("annotation"));
        }

        // Only the single envelope recipient exists today; the upper bound
        // stays for bulk messages.
        let recipient_count = usize::from(!is_blank(envelope.recipient_id.as_deref()));
        if recipient_count < 1 {
            return Err(MessageError::missing_field("recipient"));
        }
        if recipient_count > self.limits.max_recipients {
            return Err(MessageError::RecipientCountOverflow {
                count: recipient_count,
                max: self.limits.max_recipients,
            });
        }

        let files = match message.files.as_deref() {
            Some(files) if !files.is_empty() => files,
            _ => return Err(MessageError::MissingMainFile),
        };

        let total = total_size(files);
        if total > self.limits.max_total_size_bytes {
            return Err(MessageError::FileSizeOverflow {
                total,
                max: self.limits.max_total_size_bytes,
            });
        }

        Ok(())
    }

    /// Check whether a file of `new_file_size` bytes may be added
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::FileSizeOverflow`] carrying the prospective
    /// total when `current_total + new_file_size` exceeds the limit.
    pub fn validate_adding_file(&self, current_total: u64, new_file_size: u64) -> Result<()> {
        let total = current_total.saturating_add(new_file_size);
        if total > self.limits.max_total_size_bytes {
            return Err(MessageError::FileSizeOverflow {
                total,
                max: self.limits.max_total_size_bytes,
            });
        }
        Ok(())
    }
}

/// Sum of binary content lengths; XML content counts as zero
pub fn total_size(files: &[AttachmentEntry]) -> u64 {
    files
        .iter()
        .filter_map(|file| file.content.encoded_len())
        .fold(0u64, u64::saturating_add)
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
