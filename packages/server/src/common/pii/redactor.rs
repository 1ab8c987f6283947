use super::detector::{detect_pii, PiiFindings, PiiMatch, PiiType};

/// Redact emails and phone numbers from an optional string.
///
/// `None` passes through untouched.
pub fn redact(input: Option<&str>) -> Option<String> {
    input.map(redact_text)
}

/// Redact emails, then phone numbers found in the email-redacted text.
pub fn redact_text(text: &str) -> String {
    let email_findings = detect_pii(text, PiiType::Email);
    let without_emails = redact_pii(text, &email_findings);

    let phone_findings = detect_pii(&without_emails, PiiType::Phone);
    redact_pii(&without_emails, &phone_findings)
}

/// Replace every finding with its masked form.
///
/// Findings must come from `text` and must not overlap.
pub fn redact_pii(text: &str, findings: &PiiFindings) -> String {
    if findings.is_empty() {
        return text.to_string();
    }

    // Sort matches by position (reverse order so we can replace without offset issues)
    let mut sorted_matches: Vec<&PiiMatch> = findings.matches.iter().collect();
    sorted_matches.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = text.to_string();

    for pii_match in sorted_matches {
        let replacement = mask_value(&pii_match.value, pii_match.pii_type);
        result.replace_range(pii_match.start..pii_match.end, &replacement);
    }

    result
}

fn mask_value(value: &str, pii_type: PiiType) -> String {
    match pii_type {
        PiiType::Email => mask_email(value),
        PiiType::Phone => mask_phone(value),
    }
}

/// Mask email: john.doe@example.com -> j***@example.com
fn mask_email(email: &str) -> String {
    let Some(at_pos) = email.find('@') else {
        return "***".to_string();
    };

    let (local, domain) = email.split_at(at_pos);
    match local.chars().next() {
        Some(first_char) => format!("{}***{}", first_char, domain),
        None => format!("***{}", domain),
    }
}

/// Mask phone: +1-555-234-9981 -> 1*****81
///
/// The replacement is rebuilt from the digits alone; separators are dropped.
fn mask_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() <= 4 {
        return format!("***{}", digits);
    }

    // ASCII digits only, so byte slicing is safe
    let first = &digits[..1];
    let last_two = &digits[digits.len() - 2..];
    format!("{}*****{}", first, last_two)
}
