//! Input Encoder: turns an uploaded file or pasted text into a transportable `ResumeInput`.
//!
//! Binary documents (PDF) are carried as standard base64 of the raw bytes; everything
//! else is decoded as UTF-8 text. No parsing, OCR or size limits.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const PDF_MIME: &str = "application/pdf";
pub const TEXT_MIME: &str = "text/plain";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    PlainText,
    BinaryDocument,
}

/// A résumé ready to send. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeInput {
    /// Decoded text for `PlainText`, base64 for `BinaryDocument`.
    pub content: String,
    pub content_kind: ContentKind,
    pub mime_type: String,
}

impl ResumeInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: text.into(),
            content_kind: ContentKind::PlainText,
            mime_type: TEXT_MIME.to_string(),
        }
    }

    /// Encodes an uploaded file. The declared media type decides the encoding; when it is
    /// missing or generic the file extension is used instead.
    pub fn from_file(bytes: &[u8], declared_mime: Option<&str>, file_name: Option<&str>) -> Self {
        let mime_type = effective_mime(declared_mime, file_name);

        if is_binary_document(&mime_type) {
            Self {
                content: STANDARD.encode(bytes),
                content_kind: ContentKind::BinaryDocument,
                mime_type,
            }
        } else {
            Self::from_text(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

fn is_binary_document(mime_type: &str) -> bool {
    mime_type == PDF_MIME
}

fn effective_mime(declared: Option<&str>, file_name: Option<&str>) -> String {
    let declared = declared
        .and_then(|m| m.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty() && m != OCTET_STREAM_MIME);

    if let Some(mime) = declared {
        return mime;
    }

    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => PDF_MIME.to_string(),
        _ => TEXT_MIME.to_string(),
    }
}

/// The résumé half of a submission form. Text and upload are mutually exclusive:
/// typing text discards any uploaded payload and its file name, and a new upload
/// replaces typed text.
#[derive(Debug, Default)]
pub struct ResumeDraft {
    input: Option<ResumeInput>,
    file_name: Option<String>,
}

impl ResumeDraft {
    pub fn type_text(&mut self, text: impl Into<String>) {
        self.input = Some(ResumeInput::from_text(text));
        self.file_name = None;
    }

    pub fn upload(&mut self, file_name: Option<String>, declared_mime: Option<&str>, bytes: &[u8]) {
        self.input = Some(ResumeInput::from_file(
            bytes,
            declared_mime,
            file_name.as_deref(),
        ));
        self.file_name = file_name;
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn content_kind(&self) -> Option<ContentKind> {
        self.input.as_ref().map(|i| i.content_kind)
    }

    /// The input to submit, if any content was provided.
    pub fn into_input(self) -> Option<ResumeInput> {
        self.input.filter(|i| !i.is_empty())
    }
}
