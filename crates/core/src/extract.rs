//! Extraction and validation of scanned QR payloads.
//!
//! Badge QR codes encode a URL of the form `https://host/.../badge/<id>`.
//! Ticket QR codes encode the attendee's personal ticket link on the
//! ticketing provider's domain.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Domain marker that identifies a ticket URL.
pub const TICKET_DOMAIN_MARKER: &str = "lu.ma";

/// Path segment that precedes the badge identifier.
const BADGE_SEGMENT: &str = "badge";

/// Message shown when a badge scan cannot be decoded into an identifier.
pub const BADGE_REJECTION_MESSAGE: &str =
    "Could not read badge ID. Make sure you're scanning a valid badge QR code.";

/// Message shown when the second scan is not a ticket URL.
pub const TICKET_REJECTION_MESSAGE: &str =
    "That doesn't look like a valid QR ticket. Please scan the attendee's ticket QR code.";

/// Fallback for partial or malformed payloads: `/badge/<token>` where the
/// token stops at `/`, `?` or whitespace.
static BADGE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/badge/([^/?\s]+)").expect("valid regex"));

/// Why a scanned payload was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRejection {
    NotABadge,
    NotATicket,
}

impl ScanRejection {
    /// The corrective message shown to staff.
    pub fn message(self) -> &'static str {
        match self {
            ScanRejection::NotABadge => BADGE_REJECTION_MESSAGE,
            ScanRejection::NotATicket => TICKET_REJECTION_MESSAGE,
        }
    }
}

impl std::fmt::Display for ScanRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ScanRejection {}

/// Extract the badge identifier from a scanned payload.
///
/// Absolute URLs are split into non-empty path segments and the segment
/// after the first `badge` segment is returned. Anything else falls back to
/// a `/badge/<token>` pattern match.
///
/// ```
/// use badgelink_core::extract::extract_badge_code;
///
/// assert_eq!(extract_badge_code("https://x.io/e/badge/B1").as_deref(), Some("B1"));
/// assert_eq!(extract_badge_code("/badge/ABC123?x=1").as_deref(), Some("ABC123"));
/// assert_eq!(extract_badge_code("not a url, no badge segment"), None);
/// ```
pub fn extract_badge_code(raw: &str) -> Option<String> {
    if let Ok(url) = Url::parse(raw) {
        let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
        if let Some(idx) = segments.iter().position(|s| *s == BADGE_SEGMENT) {
            if let Some(code) = segments.get(idx + 1) {
                return Some((*code).to_string());
            }
        }
    }

    BADGE_PATH_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether `raw` looks like a ticket URL.
///
/// A case-insensitive substring check for [`TICKET_DOMAIN_MARKER`]; it only
/// exists to reject obviously wrong scans such as a second badge.
pub fn is_ticket_url(raw: &str) -> bool {
    raw.to_lowercase().contains(TICKET_DOMAIN_MARKER)
}

/// Classify the first (badge) scan.
pub fn classify_badge_scan(raw: &str) -> Result<String, ScanRejection> {
    extract_badge_code(raw).ok_or(ScanRejection::NotABadge)
}

/// Classify the second (ticket) scan. The accepted value is the raw payload.
pub fn classify_ticket_scan(raw: &str) -> Result<String, ScanRejection> {
    if is_ticket_url(raw) {
        Ok(raw.to_string())
    } else {
        Err(ScanRejection::NotATicket)
    }
}
