//! Site domain types.

use serde::{Deserialize, Serialize};

/// Publication status of a site.
///
/// Wire format: `"draft"` / `"published"`, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteStatus {
    Draft,
    Published,
}

impl SiteStatus {
    /// Parse a stored status value. Returns `None` for unknown values.
    pub fn from_str_value(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// Maximum slug length. DNS-label sized.
pub const MAX_SLUG_LEN: usize = 63;

/// Validate a site slug: non-empty, at most [`MAX_SLUG_LEN`] bytes,
/// lowercase ASCII alphanumerics and hyphens, no leading/trailing hyphen.
pub fn validate_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return false;
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return false;
    }
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
