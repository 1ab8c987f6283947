use lazy_static::lazy_static;
use regex::Regex;

/// Type of PII that was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiiType {
    Email,
    Phone,
}

/// A detected piece of PII with its location
#[derive(Debug, Clone)]
pub struct PiiMatch {
    pub pii_type: PiiType,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

/// Collection of detected PII, in the order it appears in the text
#[derive(Debug, Default, Clone)]
pub struct PiiFindings {
    pub matches: Vec<PiiMatch>,
}

impl PiiFindings {
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
        }
    }

    pub fn add(&mut self, pii_type: PiiType, value: String, start: usize, end: usize) {
        self.matches.push(PiiMatch {
            pii_type,
            value,
            start,
            end,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }
}

lazy_static! {
    // Email: local part, '@', dot-separated domain ending in a 2-6 letter TLD
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"([A-Za-z0-9._%+-]+)@([A-Za-z0-9.-]+\.[A-Za-z]{2,6})"
    ).unwrap();

    // Phone: optional '+', a digit, 4+ digits/hyphens/spaces/parens, a digit
    static ref PHONE_REGEX: Regex = Regex::new(
        r"\+?[0-9][0-9\-\s()]{4,}[0-9]"
    ).unwrap();
}

/// Detect every non-overlapping occurrence of one kind of PII, left to right
pub fn detect_pii(text: &str, pii_type: PiiType) -> PiiFindings {
    let regex: &Regex = match pii_type {
        PiiType::Email => &EMAIL_REGEX,
        PiiType::Phone => &PHONE_REGEX,
    };

    let mut findings = PiiFindings::new();
    for mat in regex.find_iter(text) {
        findings.add(pii_type, mat.as_str().to_string(), mat.start(), mat.end());
    }

    findings
}
