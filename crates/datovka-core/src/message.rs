//! Wire-ready outbound message.
//!
//! These types mirror the `CreateMessage` request of the operations service:
//! an envelope and an ordered file array. Both halves are optional at the
//! type level so that messages assembled outside [`MessageBuilder`] can be
//! checked by the validator before they are handed to the transport.
//!
//! [`MessageBuilder`]: crate::MessageBuilder

use serde::{Deserialize, Serialize};

/// Metadata part of an outbound message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Recipient data box ID (`dbIDRecipient`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    /// Subject (`dmAnnotation`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// Sender identification (`dmSenderIdent`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_ident: Option<String>,
    /// Sender reference number (`dmSenderRefNumber`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_ref_number: Option<String>,
    /// Recipient reference number (`dmRecipientRefNumber`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_ref_number: Option<String>,
    /// Addressee person at the recipient (`dmToHands`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_hands: Option<String>,
    /// Deliver only to a person with full access (`dmPersonalDelivery`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_delivery: Option<bool>,
    /// Allow delivery by fiction (`dmAllowSubstDelivery`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_subst_delivery: Option<bool>,
    /// Message type tag (`dmType`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    /// Legal title the message is sent under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_title: Option<LegalTitle>,
}

impl Envelope {
    /// Whether personal delivery was requested
    #[must_use]
    pub fn is_personal_delivery(&self) -> bool {
        self.personal_delivery.unwrap_or(false)
    }

    /// Whether substitute delivery is allowed
    #[must_use]
    pub fn allows_subst_delivery(&self) -> bool {
        self.allow_subst_delivery.unwrap_or(false)
    }
}

/// Legal title fields (`dmLegalTitle*`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalTitle {
    /// Law number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub law: Option<String>,
    /// Year of the law
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<String>,
    /// Point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<String>,
}

/// Content of a single file entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileContent {
    /// Binary content (`dmEncodedContent`), base64 on the wire
    Encoded(#[serde(with = "base64_bytes")] Vec<u8>),
    /// Inline XML document (`dmXMLContent`)
    Xml(String),
}

impl FileContent {
    /// Length of binary content, `None` for XML content
    #[must_use]
    pub fn encoded_len(&self) -> Option<u64> {
        match self {
            FileContent::Encoded(bytes) => Some(bytes.len() as u64),
            FileContent::Xml(_) => None,
        }
    }

    /// Binary content, if any
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FileContent::Encoded(bytes) => Some(bytes),
            FileContent::Xml(_) => None,
        }
    }
}

/// One file of an outbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentEntry {
    /// File name (`dmFileDescr`)
    pub file_name: String,
    /// MIME type (`dmMimeType`)
    pub mime_type: String,
    /// File content
    pub content: FileContent,
    /// Free-text description supplied by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AttachmentEntry {
    /// Create an entry with binary content
    pub fn encoded(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            content: FileContent::Encoded(content),
            description: None,
        }
    }
}

/// Complete outbound message (`tMessageCreateInput`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Envelope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope: Option<Envelope>,
    /// File array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<AttachmentEntry>>,
}

impl OutboundMessage {
    /// Create a message from an envelope and its files
    #[must_use]
    pub fn new(envelope: Envelope, files: Vec<AttachmentEntry>) -> Self {
        Self {
            envelope: Some(envelope),
            files: Some(files),
        }
    }

    /// Recipient data box ID
    #[must_use]
    pub fn recipient_id(&self) -> Option<&str> {
        self.envelope.as_ref()?.recipient_id.as_deref()
    }

    /// Subject
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        self.envelope.as_ref()?.annotation.as_deref()
    }

    /// Files in order, empty when the array is absent
    #[must_use]
    pub fn files(&self) -> &[AttachmentEntry] {
        self.files.as_deref().unwrap_or_default()
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OutboundMessage {
        let envelope = Envelope {
            recipient_id: Some("abc1234".to_string()),
            annotation: Some("Invoice".to_string()),
            ..Envelope::default()
        };
        OutboundMessage::new(
            envelope,
            vec![AttachmentEntry::encoded(
                "invoice.pdf",
                "application/pdf",
                b"%PDF".to_vec(),
            )],
        )
    }

    #[test]
    fn test_accessors() {
        let message = sample();
        assert_eq!(message.recipient_id(), Some("abc1234"));
        assert_eq!(message.annotation(), Some("Invoice"));
        assert_eq!(message.files().len(), 1);

        let empty = OutboundMessage::default();
        assert_eq!(empty.recipient_id(), None);
        assert!(empty.files().is_empty());
    }

    #[test]
    fn test_flags_default_to_false() {
        let envelope = Envelope::default();
        assert!(!envelope.is_personal_delivery());
        assert!(!envelope.allows_subst_delivery());
    }

    #[test]
    fn test_encoded_content_serializes_as_base64() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["files"][0]["content"]["encoded"], "JVBERg==");
        assert!(json["envelope"].get("to_hands").is_none());
        assert!(json["files"][0].get("description").is_none());

        let back: OutboundMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_xml_content_has_no_encoded_len() {
        let content = FileContent::Xml("<a/>".to_string());
        assert_eq!(content.encoded_len(), None);
        assert_eq!(content.as_bytes(), None);
        assert_eq!(FileContent::Encoded(vec![1, 2, 3]).encoded_len(), Some(3));
    }
}
