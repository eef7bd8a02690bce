//! Fluent builder for outbound data messages.
//!
//! The builder validates in two places. Every attachment addition checks
//! the running size total before anything is appended, so an oversized
//! file is reported on its own. [`MessageBuilder::build`] then validates the
//! whole message, which is the only point where recipient, subject and
//! attachment presence can be judged.
//!
//! A failed call never changes the builder: the running total and the file
//! list are only updated after the size check passes.
//!
//! # Example
//!
//! ```
//! use datovka_core::MessageBuilder;
//!
//! # fn main() -> Result<(), datovka_core::MessageError> {
//! let message = MessageBuilder::new()
//!     .to("abc1234")?
//!     .with_subject("Quarterly report")?
//!     .with_sender_ref_number("2024/117")
//!     .add_text_content("report.txt", "All figures attached.")?
//!     .build()?;
//!
//! assert_eq!(message.recipient_id(), Some("abc1234"));
//! assert_eq!(message.files().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::attachment::{Attachment, file_name_of};
use crate::codec;
use crate::error::{MessageError, Result};
use crate::limits::ValidationLimits;
use crate::message::{AttachmentEntry, Envelope, LegalTitle, OutboundMessage};
use crate::validator::MessageValidator;

/// Accumulates envelope fields and attachments for one message
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    envelope: Envelope,
    files: Vec<AttachmentEntry>,
    current_total_size: u64,
    validator: MessageValidator,
}

impl MessageBuilder {
    /// Create a builder using the service ceilings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with custom limits
    #[must_use]
    pub fn with_limits(limits: ValidationLimits) -> Self {
        Self::with_validator(MessageValidator::new(limits))
    }

    /// Create a builder around an existing validator
    #[must_use]
    pub fn with_validator(validator: MessageValidator) -> Self {
        Self {
            validator,
            ..Self::default()
        }
    }

    /// Set the recipient data box ID
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidArgument`] for a blank ID.
    pub fn to(&mut self, recipient_id: &str) -> Result<&mut Self> {
        self.envelope.recipient_id = Some(non_blank(recipient_id, "recipient")?);
        Ok(self)
    }

    /// Set the subject
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidArgument`] for a blank subject.
    pub fn with_subject(&mut self, subject: &str) -> Result<&mut Self> {
        self.envelope.annotation = Some(non_blank(subject, "subject")?);
        Ok(self)
    }

    /// Set the sender identification
    pub fn with_sender_ident(&mut self, sender_ident: impl Into<String>) -> &mut Self {
        self.envelope.sender_ident = Some(sender_ident.into());
        self
    }

    /// Set the sender reference number
    pub fn with_sender_ref_number(&mut self, ref_number: impl Into<String>) -> &mut Self {
        self.envelope.sender_ref_number = Some(ref_number.into());
        self
    }

    /// Set the recipient reference number
    pub fn with_recipient_ref_number(&mut self, ref_number: impl Into<String>) -> &mut Self {
        self.envelope.recipient_ref_number = Some(ref_number.into());
        self
    }

    /// Set the "to hands" addressee
    pub fn with_to_hands(&mut self, to_hands: impl Into<String>) -> &mut Self {
        self.envelope.to_hands = Some(to_hands.into());
        self
    }

    /// Set the message type tag
    pub fn with_type(&mut self, message_type: impl Into<String>) -> &mut Self {
        self.envelope.message_type = Some(message_type.into());
        self
    }

    /// Set the legal title
    pub fn with_legal_title(&mut self, legal_title: LegalTitle) -> &mut Self {
        self.envelope.legal_title = Some(legal_title);
        self
    }

    /// Request personal delivery
    pub fn personal_delivery(&mut self, enabled: bool) -> &mut Self {
        self.envelope.personal_delivery = Some(enabled);
        self
    }

    /// Allow substitute delivery (delivery by fiction)
    pub fn allow_subst_delivery(&mut self, allowed: bool) -> &mut Self {
        self.envelope.allow_subst_delivery = Some(allowed);
        self
    }

    /// Attach a file from disk
    ///
    /// See [`Attachment::from_file`] for MIME inference and the `.txt`
    /// encoding.
    ///
    /// # Errors
    ///
    /// - [`MessageError::InvalidArgument`] for an empty path or empty file
    /// - [`MessageError::FileNotFound`] if the path is not an existing file
    /// - [`MessageError::Io`] if reading fails
    /// - [`MessageError::FileSizeOverflow`] if the file does not fit
    pub fn add_attachment_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(MessageError::invalid_argument("file_path"));
        }
        let attachment = Attachment::from_file(path)?;
        self.add_prepared(attachment)
    }

    /// Attach a file from disk without blocking the runtime
    ///
    /// Same checks as [`MessageBuilder::add_attachment_path`]. The read
    /// completes before the size check runs.
    ///
    /// # Errors
    ///
    /// See [`MessageBuilder::add_attachment_path`].
    pub async fn add_attachment_path_async(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(MessageError::invalid_argument("file_path"));
        }
        let is_file = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(MessageError::FileNotFound(path.to_path_buf()));
        }

        let content = tokio::fs::read(path).await?;
        self.add_prepared(Attachment::from_raw(file_name_of(path), content))
    }

    /// Attach raw bytes
    ///
    /// The MIME type is inferred from `file_name` when `mime_type` is
    /// `None`. Content is stored as given.
    ///
    /// # Errors
    ///
    /// - [`MessageError::InvalidArgument`] for a blank name or empty content
    /// - [`MessageError::FileSizeOverflow`] if the content does not fit
    pub fn add_attachment(
        &mut self,
        file_name: &str,
        content: Vec<u8>,
        mime_type: Option<&str>,
    ) -> Result<&mut Self> {
        let file_name = non_blank(file_name, "file_name")?;
        if content.is_empty() {
            return Err(MessageError::invalid_argument("content"));
        }
        let mime_type = mime_type.unwrap_or_else(|| codec::mime_type_for(&file_name));
        let entry = AttachmentEntry::encoded(file_name, mime_type, content);
        self.push(entry)
    }

    /// Attach the contents of a byte stream
    ///
    /// # Errors
    ///
    /// See [`Attachment::from_reader`] and [`MessageBuilder::add_prepared`].
    pub fn add_attachment_reader<R: Read>(
        &mut self,
        reader: R,
        file_name: &str,
    ) -> Result<&mut Self> {
        let attachment = Attachment::from_reader(reader, file_name)?;
        self.add_prepared(attachment)
    }

    /// Attach UTF-8 text as a `text/plain` file
    ///
    /// # Errors
    ///
    /// - [`MessageError::InvalidArgument`] for a blank name or blank text
    /// - [`MessageError::FileSizeOverflow`] if the text does not fit
    pub fn add_text_content(&mut self, file_name: &str, text: &str) -> Result<&mut Self> {
        if text.trim().is_empty() {
            return Err(MessageError::invalid_argument("text_content"));
        }
        self.add_attachment(file_name, text.as_bytes().to_vec(), Some(codec::TEXT_MIME_TYPE))
    }

    /// Attach an already prepared [`Attachment`]
    ///
    /// # Errors
    ///
    /// - [`MessageError::InvalidArgument`] for a blank name or empty content
    /// - [`MessageError::FileSizeOverflow`] if the content does not fit
    pub fn add_prepared(&mut self, attachment: Attachment) -> Result<&mut Self> {
        if attachment.file_name.trim().is_empty() {
            return Err(MessageError::invalid_argument("file_name"));
        }
        if attachment.content.is_empty() {
            return Err(MessageError::invalid_argument("content"));
        }
        self.push(attachment.into())
    }

    fn push(&mut self, entry: AttachmentEntry) -> Result<&mut Self> {
        let size = entry.content.encoded_len().unwrap_or(0);
        self.validator
            .validate_adding_file(self.current_total_size, size)?;

        debug!(
            "Attachment added: {} ({}, {} bytes)",
            entry.file_name, entry.mime_type, size
        );
        self.files.push(entry);
        self.current_total_size += size;
        Ok(self)
    }

    /// Total size of the attachments added so far
    #[must_use]
    pub fn current_total_size(&self) -> u64 {
        self.current_total_size
    }

    /// Number of attachments added so far
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.files.len()
    }

    /// Envelope as currently configured
    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Assemble and validate the message
    ///
    /// The builder is left untouched, so a failed build can be fixed and
    /// retried, and repeated builds of the same state yield equal messages.
    ///
    /// # Errors
    ///
    /// Returns the first defect found by
    /// [`MessageValidator::validate_for_sending`].
    pub fn build(&self) -> Result<OutboundMessage> {
        let message = OutboundMessage::new(self.envelope.clone(), self.files.clone());
        self.validator.validate_for_sending(&message)?;

        debug!(
            "Message built: {} attachment(s), {} bytes",
            self.files.len(),
            self.current_total_size
        );
        Ok(message)
    }
}

fn non_blank(value: &str, argument: &'static str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(MessageError::invalid_argument(argument));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MessageErrorKind;
    use crate::limits::MAX_TOTAL_SIZE_BYTES;
    use std::io::{Cursor, Write};

    fn small_builder(max_total: u64) -> MessageBuilder {
        MessageBuilder::with_limits(ValidationLimits::new(50, max_total))
    }

    #[test]
    fn test_build_valid_message() {
        let message = MessageBuilder::new()
            .to("testbox123")
            .unwrap()
            .with_subject("Test Subject")
            .unwrap()
            .add_text_content("content.txt", "Test message content")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(message.recipient_id(), Some("testbox123"));
        assert_eq!(message.annotation(), Some("Test Subject"));
        assert_eq!(message.files().len(), 1);
        assert_eq!(message.files()[0].mime_type, "text/plain");
    }

    #[test]
    fn test_build_without_recipient() {
        let mut builder = MessageBuilder::new();
        builder
            .with_subject("Test")
            .unwrap()
            .add_text_content("content.txt", "Content")
            .unwrap();

        let err = builder.build().unwrap_err();
        assert_eq!(err, MessageError::missing_field("recipient"));
    }

    #[test]
    fn test_build_without_subject() {
        let mut builder = MessageBuilder::new();
        builder
            .to("testbox123")
            .unwrap()
            .add_text_content("content.txt", "Content")
            .unwrap();

        let err = builder.build().unwrap_err();
        assert_eq!(err, MessageError::missing_field("annotation"));
    }

    #[test]
    fn test_build_without_attachments() {
        let mut builder = MessageBuilder::new();
        builder.to("testbox123").unwrap().with_subject("Test").unwrap();

        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), MessageErrorKind::MissingMainFile);
    }

    #[test]
    fn test_blank_setters_rejected() {
        let mut builder = MessageBuilder::new();
        assert_eq!(
            builder.to("  ").unwrap_err(),
            MessageError::invalid_argument("recipient")
        );
        assert_eq!(
            builder.with_subject("").unwrap_err(),
            MessageError::invalid_argument("subject")
        );
        assert_eq!(builder.envelope(), &Envelope::default());
    }

    #[test]
    fn test_last_write_wins() {
        let mut builder = MessageBuilder::new();
        builder
            .to("first")
            .unwrap()
            .to("second")
            .unwrap()
            .with_sender_ident("A")
            .with_sender_ident("B");

        assert_eq!(builder.envelope().recipient_id.as_deref(), Some("second"));
        assert_eq!(builder.envelope().sender_ident.as_deref(), Some("B"));
    }

    #[test]
    fn test_optional_fields() {
        let legal_title = LegalTitle {
            law: Some("300".to_string()),
            year: Some("2008".to_string()),
            ..LegalTitle::default()
        };
        let message = MessageBuilder::new()
            .to("testbox123")
            .unwrap()
            .with_subject("Fluent test")
            .unwrap()
            .with_sender_ident("SENDER001")
            .with_sender_ref_number("REF123")
            .with_recipient_ref_number("REF456")
            .with_to_hands("Jan Novak")
            .with_type("K")
            .with_legal_title(legal_title.clone())
            .personal_delivery(true)
            .allow_subst_delivery(true)
            .add_text_content("content.txt", "Test content")
            .unwrap()
            .build()
            .unwrap();

        let envelope = message.envelope.as_ref().unwrap();
        assert_eq!(envelope.sender_ident.as_deref(), Some("SENDER001"));
        assert_eq!(envelope.sender_ref_number.as_deref(), Some("REF123"));
        assert_eq!(envelope.recipient_ref_number.as_deref(), Some("REF456"));
        assert_eq!(envelope.to_hands.as_deref(), Some("Jan Novak"));
        assert_eq!(envelope.message_type.as_deref(), Some("K"));
        assert_eq!(envelope.legal_title.as_ref(), Some(&legal_title));
        assert!(envelope.is_personal_delivery());
        assert!(envelope.allows_subst_delivery());
    }

    #[test]
    fn test_flags_default_false() {
        let message = MessageBuilder::new()
            .to("testbox123")
            .unwrap()
            .with_subject("Flags")
            .unwrap()
            .add_text_content("a.txt", "a")
            .unwrap()
            .build()
            .unwrap();

        let envelope = message.envelope.unwrap();
        assert!(!envelope.is_personal_delivery());
        assert!(!envelope.allows_subst_delivery());
    }

    #[test]
    fn test_current_total_size_and_count() {
        let mut builder = MessageBuilder::new();
        builder.add_text_content("test.txt", "Test content").unwrap();
        assert_eq!(builder.current_total_size(), "Test content".len() as u64);

        builder.add_text_content("file2.txt", "Content 2").unwrap();
        assert_eq!(builder.attachment_count(), 2);
    }

    #[test]
    fn test_oversized_attachment_rejected_before_append() {
        let mut builder = MessageBuilder::new();
        let large = vec![0u8; (MAX_TOTAL_SIZE_BYTES + 1) as usize];

        let err = builder
            .add_attachment("large_file.bin", large, None)
            .unwrap_err();
        assert_eq!(
            err,
            MessageError::FileSizeOverflow {
                total: MAX_TOTAL_SIZE_BYTES + 1,
                max: MAX_TOTAL_SIZE_BYTES,
            }
        );
        assert_eq!(builder.attachment_count(), 0);
        assert_eq!(builder.current_total_size(), 0);
    }

    #[test]
    fn test_cumulative_overflow_keeps_prior_state() {
        let mut builder = small_builder(10);
        builder.add_attachment("a.bin", vec![1; 4], None).unwrap();
        builder.add_attachment("b.bin", vec![2; 6], None).unwrap();

        let err = builder.add_attachment("c.bin", vec![3; 1], None).unwrap_err();
        assert_eq!(err, MessageError::FileSizeOverflow { total: 11, max: 10 });
        assert_eq!(builder.attachment_count(), 2);
        assert_eq!(builder.current_total_size(), 10);

        // Still usable after the failed add.
        builder.to("abc").unwrap().with_subject("Full").unwrap();
        assert_eq!(builder.build().unwrap().files().len(), 2);
    }

    #[test]
    fn test_explicit_mime_type_is_kept() {
        let message = MessageBuilder::new()
            .to("abc")
            .unwrap()
            .with_subject("Mime")
            .unwrap()
            .add_attachment("data.pdf", vec![1, 2, 3], Some("application/x-custom"))
            .unwrap()
            .add_attachment("scan.png", vec![4], None)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(message.files()[0].mime_type, "application/x-custom");
        assert_eq!(message.files()[1].mime_type, "image/png");
    }

    #[test]
    fn test_raw_bytes_are_not_text_encoded() {
        let mut builder = MessageBuilder::new();
        builder.add_attachment("note.txt", b"Hello".to_vec(), None).unwrap();
        assert_eq!(builder.current_total_size(), 5);
    }

    #[test]
    fn test_empty_arguments_rejected() {
        let mut builder = MessageBuilder::new();
        assert_eq!(
            builder.add_attachment(" ", vec![1], None).unwrap_err(),
            MessageError::invalid_argument("file_name")
        );
        assert_eq!(
            builder.add_attachment("a.bin", Vec::new(), None).unwrap_err(),
            MessageError::invalid_argument("content")
        );
        assert_eq!(
            builder.add_text_content("a.txt", "   ").unwrap_err(),
            MessageError::invalid_argument("text_content")
        );
        assert_eq!(
            builder.add_attachment_path("").unwrap_err(),
            MessageError::invalid_argument("file_path")
        );
        assert_eq!(builder.attachment_count(), 0);
    }

    #[test]
    fn test_add_attachment_path() {
        let mut temp = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        temp.write_all(b"Test content for attachment").unwrap();
        temp.flush().unwrap();

        let mut builder = MessageBuilder::new();
        builder.add_attachment_path(temp.path()).unwrap();

        let expected = codec::encode_if_text_file("a.txt", b"Test content for attachment".to_vec());
        assert_eq!(builder.current_total_size(), expected.len() as u64);

        let message = builder
            .to("abc")
            .unwrap()
            .with_subject("File")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(message.files()[0].file_name, file_name_of(temp.path()));
        assert_eq!(message.files()[0].content.as_bytes(), Some(&expected[..]));
    }

    #[test]
    fn test_add_attachment_path_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nope.pdf");

        let mut builder = MessageBuilder::new();
        let err = builder.add_attachment_path(&path).unwrap_err();
        assert_eq!(err, MessageError::FileNotFound(path));
        assert_eq!(builder.attachment_count(), 0);
    }

    #[tokio::test]
    async fn test_add_attachment_path_async() {
        let mut temp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        temp.write_all(b"%PDF-1.4").unwrap();
        temp.flush().unwrap();

        let mut builder = MessageBuilder::new();
        builder.add_attachment_path_async(temp.path()).await.unwrap();
        assert_eq!(builder.current_total_size(), 8);

        let missing = temp.path().with_extension("missing");
        let err = builder
            .add_attachment_path_async(&missing)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), MessageErrorKind::FileNotFound);
        assert_eq!(builder.attachment_count(), 1);
    }

    #[test]
    fn test_add_attachment_reader() {
        let mut builder = MessageBuilder::new();
        builder
            .add_attachment_reader(Cursor::new(b"stream body".to_vec()), "stream.bin")
            .unwrap();
        assert_eq!(builder.current_total_size(), 11);

        let err = builder
            .add_attachment_reader(Cursor::new(Vec::new()), "empty.bin")
            .unwrap_err();
        assert_eq!(err, MessageError::invalid_argument("content"));
    }

    #[test]
    fn test_build_twice_yields_equal_messages() {
        let mut builder = MessageBuilder::new();
        builder
            .to("abc")
            .unwrap()
            .with_subject("Twice")
            .unwrap()
            .add_text_content("a.txt", "one")
            .unwrap();

        let first = builder.build().unwrap();
        let second = builder.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_build_can_be_fixed() {
        let mut builder = MessageBuilder::new();
        builder.with_subject("Later").unwrap();
        builder.add_text_content("a.txt", "one").unwrap();
        assert!(builder.build().is_err());

        builder.to("abc").unwrap();
        assert!(builder.build().is_ok());
    }
}
