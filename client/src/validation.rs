//! Pure validation helpers used before anything reaches the backend.
//!
//! # Example
//!
//! ```rust
//! use bulkmail::validation::{format_file_size, is_supported_recipient_file, is_valid_email};
//!
//! assert!(is_valid_email("jane.doe+news@example.org"));
//! assert!(is_supported_recipient_file("contacts.XLSX"));
//! assert_eq!(format_file_size(2048), "2.00 KB");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RECIPIENT_FILE_EXTENSIONS;

/// Accepted recipient address format.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex")
});

/// Check an address against [`EMAIL_PATTERN`]. No trimming is done here.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Whether a file name ends with one of the accepted recipient-file extensions.
pub fn is_supported_recipient_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    RECIPIENT_FILE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Human-readable byte size: `B` below 1 KiB, then `KB` / `MB` with two decimals.
///
/// Ties round up, so 1152 bytes is `1.13 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.2} KB", hundredths(bytes, KIB))
    } else {
        format!("{:.2} MB", hundredths(bytes, MIB))
    }
}

/// `bytes / unit` rounded half-up to two decimals.
fn hundredths(bytes: u64, unit: u64) -> f64 {
    (bytes as f64 * 100.0 / unit as f64).round() / 100.0
}
