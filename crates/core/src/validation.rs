//! Pure field validation shared by the admin form, the contact form and the
//! server boundary.
//!
//! Every function here is synchronous and side-effect free so the same rule
//! set runs both where the user types and where the request lands.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use validator::ValidateUrl;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest accepted image upload (2 MiB).
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";

/// MIME types accepted for dog pictures.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[MIME_JPEG, MIME_PNG];

/// `local@domain.tld`: one `@`, no whitespace, a dot somewhere after the `@`.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// `+` then 7 to 15 digits in total, single spaces allowed between digits.
const PHONE_PATTERN: &str = r"^\+(?:[0-9] ?){6,14}[0-9]$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Contact fields
// ---------------------------------------------------------------------------

/// Whether `s` looks like `local@domain.tld`.
pub fn validate_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Whether `s` is an international phone number (`+33 6 12 34 56 78`).
///
/// An empty string never matches; callers decide whether phone is optional.
pub fn validate_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Why an image was refused before staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum ImageErrorKind {
    #[error("Only JPEG and PNG images are accepted")]
    UnsupportedType,
    #[error("Image exceeds the 2 MiB limit")]
    TooLarge,
}

/// Check the declared MIME type and byte size of an upload.
///
/// The type is checked first, so an oversized GIF reports `UnsupportedType`.
pub fn validate_image(content_type: &str, size_bytes: u64) -> Result<(), ImageErrorKind> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(ImageErrorKind::UnsupportedType);
    }
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(ImageErrorKind::TooLarge);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Dog fields
// ---------------------------------------------------------------------------

/// Trim a required text field, rejecting it if nothing is left.
pub fn require_text(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank input becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Coerce a form value to a whole number of months, at least 1.
///
/// Fractional input is truncated toward zero the way a number input reads
/// `"3.7"` as 3.
pub fn coerce_age_months(raw: &str) -> Result<i32, CoreError> {
    let trimmed = raw.trim();
    let value = match trimmed.parse::<i64>() {
        Ok(n) => n,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => f.trunc() as i64,
            _ => {
                return Err(CoreError::Validation(
                    "age_months must be a number".to_string(),
                ))
            }
        },
    };
    age_months_in_range(value)
}

/// Check an already-numeric age.
pub fn age_months_in_range(value: i64) -> Result<i32, CoreError> {
    if value < 1 {
        return Err(CoreError::Validation(
            "age_months must be at least 1".to_string(),
        ));
    }
    i32::try_from(value)
        .map_err(|_| CoreError::Validation("age_months is too large".to_string()))
}

/// Coerce a form value to a non-negative price.
pub fn coerce_price(raw: &str) -> Result<f64, CoreError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| CoreError::Validation("price must be a number".to_string()))?;
    price_in_range(value)
}

/// Check an already-numeric price.
pub fn price_in_range(value: f64) -> Result<f64, CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation("price must be a number".to_string()));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(
            "price must not be negative".to_string(),
        ));
    }
    Ok(value)
}

/// Normalise an optional image URL: blank means unset, anything else must be
/// an absolute `http(s)` URL.
pub fn validate_image_url(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(url) = optional_text(raw) else {
        return Ok(None);
    };
    let has_web_scheme = url.starts_with("http://") || url.starts_with("https://");
    if !has_web_scheme || !url.validate_url() {
        return Err(CoreError::Validation(format!(
            "image_url '{url}' is not a valid URL"
        )));
    }
    Ok(Some(url))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn phone_examples() {
        assert!(validate_phone("+1 234 567 8901"));
        assert!(validate_phone("+33612345678"));
        assert!(!validate_phone("1234567890"));
        assert!(!validate_phone(""));
    }

    #[test]
    fn phone_digit_bounds() {
        // 7 digits is the minimum, 15 the maximum.
        assert!(validate_phone("+1234567"));
        assert!(!validate_phone("+123456"));
        assert!(validate_phone("+123456789012345"));
        assert!(!validate_phone("+1234567890123456"));
    }

    #[test]
    fn phone_rejects_double_spaces_and_trailing_space() {
        assert!(!validate_phone("+1  234 567 890"));
        assert!(!validate_phone("+1 234 567 890 "));
        assert!(!validate_phone("+1-234-567-890"));
    }

    #[test]
    fn email_examples() {
        assert!(validate_email("john@example.com"));
        assert!(validate_email("john.doe@sub.example.co"));
        assert!(!validate_email("john@com"));
        assert!(!validate_email("john doe@example.com"));
        assert!(!validate_email("john@@example.com"));
        assert!(!validate_email("john@exa@mple.com"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn image_limits() {
        assert_eq!(
            validate_image(MIME_PNG, 3 * 1024 * 1024),
            Err(ImageErrorKind::TooLarge)
        );
        assert_eq!(
            validate_image("image/gif", 1024 * 1024),
            Err(ImageErrorKind::UnsupportedType)
        );
        assert_eq!(validate_image(MIME_JPEG, 500 * 1024), Ok(()));
        assert_eq!(validate_image(MIME_JPEG, MAX_IMAGE_BYTES), Ok(()));
        assert_eq!(
            validate_image(MIME_JPEG, MAX_IMAGE_BYTES + 1),
            Err(ImageErrorKind::TooLarge)
        );
    }

    #[test]
    fn type_is_checked_before_size() {
        assert_eq!(
            validate_image("image/gif", 10 * 1024 * 1024),
            Err(ImageErrorKind::UnsupportedType)
        );
    }

    #[test]
    fn text_is_trimmed_and_required() {
        assert_eq!(require_text("name", "  Rex ").unwrap(), "Rex");
        assert_matches!(require_text("name", "   "), Err(CoreError::Validation(_)));
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" hi ")), Some("hi".to_string()));
    }

    #[test]
    fn age_coercion() {
        assert_eq!(coerce_age_months("1").unwrap(), 1);
        assert_eq!(coerce_age_months(" 12 ").unwrap(), 12);
        assert_eq!(coerce_age_months("3.7").unwrap(), 3);
        assert_matches!(coerce_age_months("0"), Err(CoreError::Validation(_)));
        assert_matches!(coerce_age_months("-4"), Err(CoreError::Validation(_)));
        assert_matches!(coerce_age_months("abc"), Err(CoreError::Validation(_)));
        assert_matches!(coerce_age_months(""), Err(CoreError::Validation(_)));
        assert_matches!(coerce_age_months("NaN"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn price_coercion() {
        assert_eq!(coerce_price("0").unwrap(), 0.0);
        assert_eq!(coerce_price("1499.99").unwrap(), 1499.99);
        assert_matches!(coerce_price("-1"), Err(CoreError::Validation(_)));
        assert_matches!(coerce_price("cheap"), Err(CoreError::Validation(_)));
        assert_matches!(coerce_price("inf"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn image_url_normalisation() {
        assert_eq!(validate_image_url(None).unwrap(), None);
        assert_eq!(validate_image_url(Some("")).unwrap(), None);
        assert_eq!(
            validate_image_url(Some("https://cdn.example.com/dogs/1.png")).unwrap(),
            Some("https://cdn.example.com/dogs/1.png".to_string())
        );
        assert_matches!(
            validate_image_url(Some("not a url")),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_image_url(Some("ftp://example.com/x.png")),
            Err(CoreError::Validation(_))
        );
    }
}
