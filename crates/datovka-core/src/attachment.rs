//! Attachments read from disk, streams or memory.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::codec;
use crate::error::{MessageError, Result};
use crate::message::{AttachmentEntry, FileContent};

/// A file to attach to a data message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name
    pub file_name: String,
    /// Content as it will be transmitted
    pub content: Vec<u8>,
    /// MIME type
    pub mime_type: String,
    /// Optional description
    pub description: Option<String>,
}

impl Attachment {
    /// Create an attachment, inferring the MIME type when `mime_type` is `None`
    pub fn new(file_name: impl Into<String>, content: Vec<u8>, mime_type: Option<&str>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_type
            .unwrap_or_else(|| codec::mime_type_for(&file_name))
            .to_string();
        Self {
            file_name,
            content,
            mime_type,
            description: None,
        }
    }

    /// Read an attachment from disk
    ///
    /// The MIME type is inferred from the extension and `.txt` content is
    /// encoded per [`codec::encode_if_text_file`].
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::FileNotFound`] if `path` is not an existing
    /// file, or [`MessageError::Io`] if reading fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MessageError::FileNotFound(path.to_path_buf()));
        }

        let file_name = file_name_of(path);
        let content = fs::read(path)?;
        Ok(Self::from_raw(file_name, content))
    }

    /// Read an attachment from a byte stream
    ///
    /// The stream is read to its end; inference and text-file encoding
    /// follow [`Attachment::from_file`].
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::InvalidArgument`] for a blank file name, or
    /// [`MessageError::Io`] if reading fails.
    pub fn from_reader<R: Read>(mut reader: R, file_name: &str) -> Result<Self> {
        if file_name.trim().is_empty() {
            return Err(MessageError::invalid_argument("file_name"));
        }

        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        Ok(Self::from_raw(file_name.to_string(), content))
    }

    pub(crate) fn from_raw(file_name: String, content: Vec<u8>) -> Self {
        let content = codec::encode_if_text_file(&file_name, content);
        Self::new(file_name, content, None)
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Write the content to `path`, creating missing parent directories
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Io`] if a directory or the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &self.content)?;
        Ok(())
    }

    /// Content as a base64 string
    #[must_use]
    pub fn content_as_base64(&self) -> String {
        STANDARD.encode(&self.content)
    }

    /// Content length in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

impl From<Attachment> for AttachmentEntry {
    fn from(attachment: Attachment) -> Self {
        AttachmentEntry {
            file_name: attachment.file_name,
            mime_type: attachment.mime_type,
            content: FileContent::Encoded(attachment.content),
            description: attachment.description,
        }
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
