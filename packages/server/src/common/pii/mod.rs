/// PII (Personally Identifiable Information) detection and redaction
///
/// This module masks contact details before anything reaches the logs.
/// It detects emails and phone numbers with two narrow regexes and replaces
/// every match with a partially masked form.
///
/// # Masking
///
/// - Email: first character of the local part kept, domain kept
///   (`john@example.com` -> `j***@example.com`)
/// - Phone: punctuation dropped, first digit and last two digits kept
///   (`+1-555-234-9981` -> `1*****81`)
///
/// Emails are masked first; phones are then detected on the email-masked text.
/// Detection is purely textual, so anything that looks like an email or a
/// phone number (an ISO date, for instance) is masked too.
///
/// # Examples
///
/// ```rust
/// use registry_core::common::pii::{redact, redact_text};
///
/// assert_eq!(redact(None), None);
/// assert_eq!(redact_text("mail jo@example.com"), "mail j***@example.com");
/// assert_eq!(redact_text("call +1-555-234-9981"), "call 1*****81");
/// ```
///
/// # Integration Points
///
/// This module is used in:
/// - Payload logging middleware (every request and response body)

pub mod detector;
pub mod redactor;

// Re-export main types and functions
pub use detector::{detect_pii, PiiFindings, PiiMatch, PiiType};
pub use redactor::{redact, redact_pii, redact_text};
