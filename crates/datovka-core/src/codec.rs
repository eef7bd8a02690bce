//! Attachment codec.
//!
//! MIME type inference from file names and the text-file encoding the
//! service expects: `.txt` content travels base64 encoded *inside* the
//! already base64 encoded `dmEncodedContent` element.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;

/// Fallback MIME type for unknown extensions
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// MIME type of plain text attachments
pub const TEXT_MIME_TYPE: &str = "text/plain";

/// Extensions specific to the Data Box ecosystem, checked first
const DATA_BOX_MIME_TYPES: &[(&str, &str)] = &[
    ("isdoc", "text/isdoc"),
    ("isdocx", "text/isdocx"),
    ("zfo", "application/vnd.software602.filler.form-xml-zip"),
];

const COMMON_MIME_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("txt", TEXT_MIME_TYPE),
    ("xml", "text/xml"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
];

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Infer the MIME type of a file from its extension
///
/// # Example
///
/// ```
/// use datovka_core::codec::mime_type_for;
///
/// assert_eq!(mime_type_for("report.PDF"), "application/pdf");
/// assert_eq!(mime_type_for("form.zfo"), "application/vnd.software602.filler.form-xml-zip");
/// assert_eq!(mime_type_for("archive.7z"), "application/octet-stream");
/// ```
#[must_use]
pub fn mime_type_for(file_name: &str) -> &'static str {
    let Some(ext) = extension(file_name) else {
        return DEFAULT_MIME_TYPE;
    };

    DATA_BOX_MIME_TYPES
        .iter()
        .chain(COMMON_MIME_TYPES)
        .find(|(known, _)| *known == ext)
        .map_or(DEFAULT_MIME_TYPE, |(_, mime)| *mime)
}

/// Whether the file name has a `.txt` extension (case-insensitive)
#[must_use]
pub fn is_text_file(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| ext == "txt")
}

/// Apply the text-file encoding convention
///
/// For `.txt` files the result is the UTF-8 bytes of the standard base64
/// encoding of `content`. Any other file is returned unchanged.
#[must_use]
pub fn encode_if_text_file(file_name: &str, content: Vec<u8>) -> Vec<u8> {
    if is_text_file(file_name) {
        STANDARD.encode(&content).into_bytes()
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_lookup() {
        assert_eq!(mime_type_for("document.pdf"), "application/pdf");
        assert_eq!(mime_type_for("image.jpg"), "image/jpeg");
        assert_eq!(mime_type_for("image.JPEG"), "image/jpeg");
        assert_eq!(mime_type_for("file.txt"), "text/plain");
        assert_eq!(mime_type_for("data.xml"), "text/xml");
        assert_eq!(mime_type_for("invoice.isdoc"), "text/isdoc");
        assert_eq!(mime_type_for("invoice.isdocx"), "text/isdocx");
        assert_eq!(
            mime_type_for("message.zfo"),
            "application/vnd.software602.filler.form-xml-zip"
        );
        assert_eq!(
            mime_type_for("sheet.xlsx"),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn test_mime_fallback() {
        assert_eq!(mime_type_for("README"), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for("archive.tar.gz"), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for(""), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for(".txt"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_text_file_double_encoding() {
        let encoded = encode_if_text_file("note.txt", b"Hello".to_vec());
        assert_eq!(encoded, b"SGVsbG8=");

        let encoded = encode_if_text_file("NOTE.TXT", b"Hello".to_vec());
        assert_eq!(encoded, b"SGVsbG8=");
    }

    #[test]
    fn test_non_text_file_unchanged() {
        let content = vec![0x25, 0x50, 0x44, 0x46];
        assert_eq!(encode_if_text_file("doc.pdf", content.clone()), content);
        assert_eq!(encode_if_text_file("notes.txt.bak", content.clone()), content);
    }
}
