//! Attachment acceptance rules.
//!
//! A rejected attachment is dropped silently; the text part of the message
//! still goes out. The length cap applies to the encoded text as sent by the
//! client (base64 data URL), not the decoded byte count.

/// Maximum accepted length of the encoded file payload.
pub const MAX_ENCODED_FILE_LEN: usize = 2_000_000;

const ALLOWED_MEDIA_PREFIXES: &[&str] = &["image/", "audio/", "video/"];

/// Whether an attachment with the given encoded payload and declared MIME
/// type may ride along with a message. The prefix match is case-sensitive.
pub fn attachment_allowed(file: &str, file_type: &str) -> bool {
    ALLOWED_MEDIA_PREFIXES
        .iter()
        .any(|prefix| file_type.starts_with(prefix))
        && file.len() < MAX_ENCODED_FILE_LEN
}
