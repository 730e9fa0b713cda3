//! Content classification: image, text, or ignored, from declared kind and name alone.

use crate::types::{Classification, FileMeta};
use crate::utils::config::{
    IMAGE_EXTENSIONS, IMAGE_MIME_PREFIX, TEXT_APPLICATION_KINDS, TEXT_EXTENSIONS,
    TEXT_MIME_PREFIX, UNRELIABLE_CONTENT_KINDS,
};

use super::tools::extension_of;

/// Classify a file. Pure and total: same name and kind always give the same answer.
///
/// Declared image kinds win, then declared text kinds. Image extensions are only trusted when the
/// declared kind is empty or `application/octet-stream`; text extensions apply regardless. Anything
/// else is [`Classification::Ignored`] so unknown binaries are never decoded as text.
pub fn classify(meta: &FileMeta) -> Classification {
    classify_parts(&meta.name, &meta.content_kind)
}

/// [`classify`] over borrowed parts.
pub fn classify_parts(name: &str, content_kind: &str) -> Classification {
    let kind = normalize_kind(content_kind);
    if kind.starts_with(IMAGE_MIME_PREFIX) {
        return Classification::Image;
    }
    if is_text_kind(&kind) {
        return Classification::Text;
    }
    let ext = extension_of(name);
    if UNRELIABLE_CONTENT_KINDS.contains(&kind.as_str())
        && ext.as_deref().is_some_and(is_image_extension)
    {
        return Classification::Image;
    }
    if ext.as_deref().is_some_and(is_text_extension) {
        return Classification::Text;
    }
    Classification::Ignored
}

/// Lowercase essence of a media type: parameters (`; charset=...`) and whitespace dropped.
fn normalize_kind(content_kind: &str) -> String {
    content_kind
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

fn is_text_kind(kind: &str) -> bool {
    kind.starts_with(TEXT_MIME_PREFIX)
        || kind.ends_with("+json")
        || kind.ends_with("+xml")
        || TEXT_APPLICATION_KINDS.contains(&kind)
}

/// Check if an extension (lowercase, no dot) is a known image type.
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// Check if an extension (lowercase, no dot) is a known text/code type.
pub fn is_text_extension(ext: &str) -> bool {
    TEXT_EXTENSIONS.contains(&ext)
}
