//! String normalisation and form-input predicates.
//!
//! Everything here is a pure function of its arguments, except
//! [`is_valid_image`] which clears a rejected file selection.
//!
//! [`sanitize_input`] is pattern based and best effort. It strips the
//! common markup shapes from free text before display; it is not an HTML
//! parser and must not be relied on as a security boundary.

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Media types accepted for event and profile images.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Upper bound on an uploaded image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Marker appended by [`truncate_string`].
pub const ELLIPSIS: &str = "...";

/// Minimum length accepted by [`is_password_strong`].
pub const MIN_PASSWORD_LENGTH: usize = 8;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script.*?>.*?</script>").expect("valid regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[\\/!]*?[^<>]*?>").expect("valid regex"));

static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<style.*?>.*?</style>").expect("valid regex"));

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<![\s\S]*?--[ \t\n\r]*>").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Text transforms
// ---------------------------------------------------------------------------

/// Trim both ends and collapse every internal whitespace run to one space.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove script blocks, tag-like substrings, style blocks and HTML
/// comments, in that order.
pub fn sanitize_input(s: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(s, "");
    let without_tags = TAG_RE.replace_all(&without_scripts, "");
    let without_styles = STYLE_RE.replace_all(&without_tags, "");
    COMMENT_RE.replace_all(&without_styles, "").into_owned()
}

/// Return `s` unchanged when it has at most `max_len` characters,
/// otherwise its first `max_len` characters followed by [`ELLIPSIS`].
pub fn truncate_string(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &s[..cut]),
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// True when `s` is empty after trimming.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// At least [`MIN_PASSWORD_LENGTH`] characters, at least one ASCII letter
/// and at least one ASCII digit.
pub fn is_password_strong(s: &str) -> bool {
    s.chars().count() >= MIN_PASSWORD_LENGTH
        && s.chars().any(|c| c.is_ascii_alphabetic())
        && s.chars().any(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Image selection
// ---------------------------------------------------------------------------

/// Metadata of a file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// A single-file picker: either empty or holding one selected file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    file: Option<SelectedFile>,
}

impl FileSelection {
    pub fn new(file: SelectedFile) -> Self {
        Self { file: Some(file) }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn clear(&mut self) {
        self.file = None;
    }
}

/// Accept the selection iff it holds a file of an allowed media type no
/// larger than [`MAX_IMAGE_BYTES`]. A present but rejected file is cleared
/// from the selection.
pub fn is_valid_image(selection: &mut FileSelection) -> bool {
    let Some(file) = selection.file() else {
        return false;
    };

    let accepted =
        ALLOWED_IMAGE_TYPES.contains(&file.media_type.as_str()) && file.size <= MAX_IMAGE_BYTES;

    if !accepted {
        selection.clear();
    }
    accepted
}
