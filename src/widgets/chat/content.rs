// Message value model and content-type sniffing
//
// A chat message's payload is one of four conceptual shapes: raw text, raw
// bytes of unknown type, a file-input record carrying a declared MIME type,
// or an already-renderable composite that bypasses dispatch entirely.

use crate::widgets::chat::renderable::Renderable;
use bytes::Bytes;

/// A file delivered through a file-input control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    /// Raw file contents
    pub contents: Bytes,
    /// Original file name, shown in placeholder renderings
    pub file_name: String,
    /// Declared MIME type; trusted over sniffing when present
    pub mime_type: String,
}

impl FileInput {
    pub fn new(
        contents: impl Into<Bytes>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            contents: contents.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// The message payload.
#[derive(Debug, Clone)]
pub enum Value {
    /// Plain text (rendered as markdown)
    Text(String),
    /// Raw bytes with no declared type; the sniffer may classify them
    Bytes(Bytes),
    /// A file-input record with a declared MIME type
    File(FileInput),
    /// A pre-built renderable, passed through dispatch unchanged
    Panel(Renderable),
}

impl Value {
    /// The text payload, when this value is plain text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<FileInput> for Value {
    fn from(file: FileInput) -> Self {
        Value::File(file)
    }
}

impl From<Renderable> for Value {
    fn from(panel: Renderable) -> Self {
        Value::Panel(panel)
    }
}

/// Infer a MIME type from leading magic bytes.
///
/// Best effort: an unrecognized signature returns `None`, which dispatch
/// treats as "type undetermined" (non-fatal, generic rendering applies).
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"%PDF") {
        return Some("application/pdf");
    }
    if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]) {
        return Some("image/png");
    }
    if data.starts_with(&[0xff, 0xd8, 0xff]) {
        return Some("image/jpeg");
    }
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") {
        match &data[8..12] {
            b"WEBP" => return Some("image/webp"),
            b"WAVE" => return Some("audio/wav"),
            b"AVI " => return Some("video/x-msvideo"),
            _ => {}
        }
    }
    if data.starts_with(b"ID3") || data.starts_with(&[0xff, 0xfb]) || data.starts_with(&[0xff, 0xf3])
    {
        return Some("audio/mpeg");
    }
    if data.starts_with(b"OggS") {
        return Some("audio/ogg");
    }
    if data.starts_with(b"fLaC") {
        return Some("audio/flac");
    }
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        return Some("video/mp4");
    }
    if data.starts_with(&[0x1a, 0x45, 0xdf, 0xa3]) {
        return Some("video/webm");
    }
    // Printable UTF-8 without NULs is treated as plain text
    if !data.is_empty() && !data.contains(&0) && std::str::from_utf8(data).is_ok() {
        return Some("text/plain");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_common_signatures() {
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0];
        assert_eq!(sniff_mime(&png), Some("image/png"));
        assert_eq!(sniff_mime(b"%PDF-1.7 ..."), Some("application/pdf"));
        assert_eq!(sniff_mime(&[0xff, 0xd8, 0xff, 0xe0]), Some("image/jpeg"));
        assert_eq!(sniff_mime(b"GIF89a......"), Some("image/gif"));
        assert_eq!(sniff_mime(b"ID3\x03tag data"), Some("audio/mpeg"));
        assert_eq!(sniff_mime(b"OggS\x00\x02"), Some("audio/ogg"));
    }

    #[test]
    fn test_sniff_riff_containers_disambiguated() {
        assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WAVEfmt "), Some("audio/wav"));
        assert_eq!(sniff_mime(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
    }

    #[test]
    fn test_sniff_mp4_ftyp_at_offset_four() {
        assert_eq!(sniff_mime(b"\x00\x00\x00\x20ftypisom...."), Some("video/mp4"));
    }

    #[test]
    fn test_sniff_utf8_falls_back_to_text() {
        assert_eq!(sniff_mime(b"hello, world"), Some("text/plain"));
    }

    #[test]
    fn test_sniff_unknown_is_none() {
        assert_eq!(sniff_mime(&[0x00, 0x01, 0x02, 0x03]), None);
        assert_eq!(sniff_mime(&[]), None);
    }
}
