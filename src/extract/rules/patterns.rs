//! Shared regex patterns and vocabulary tables for receipt extraction.
//!
//! The vocabularies are plain data so they can be unit-tested and extended
//! without touching selector control flow.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Money tokens. A currency marker makes the cents optional; bare
    // numbers must carry exactly two fractional digits.
    pub static ref MONEY_MARKED: Regex = Regex::new(
        r"[$€£]\s*(\d{1,6}(?:,\d{3})*(?:\.\d{2})?)\b"
    ).unwrap();

    pub static ref MONEY_PLAIN: Regex = Regex::new(
        r"\b(\d{1,6}(?:,\d{3})*\.\d{2})\b"
    ).unwrap();

    // Secondary acceptance path for comma-as-decimal-separator locales.
    pub static ref MONEY_COMMA_DECIMAL: Regex = Regex::new(
        r"\b(\d{1,6}(?:\.\d{3})*,\d{2})\b"
    ).unwrap();

    // Date shapes, in selector priority order.
    pub static ref DATE_ISO: Regex = Regex::new(
        r"\b(20\d{2})[-/](\d{1,2})[-/](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b"
    ).unwrap();

    pub static ref DATE_DOTTED: Regex = Regex::new(
        r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b"
    ).unwrap();

    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(20\d{2})\b"
    ).unwrap();

    pub static ref TIME_OF_DAY: Regex = Regex::new(
        r"\b\d{1,2}:\d{2}(?::\d{2})?\b"
    ).unwrap();

    // Vendor noise shapes.
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}"
    ).unwrap();

    pub static ref STATE_ZIP: Regex = Regex::new(
        r"\b[A-Z]{2}\s+\d{5}(?:-\d{4})?\b"
    ).unwrap();

    pub static ref STREET_NUMBER: Regex = Regex::new(
        r"^\d{1,6}\s+[A-Za-z]"
    ).unwrap();
}

/// Total-style labels, strongest first.
pub const TOTAL_LABELS: &[&str] = &[
    "grand total",
    "amount due",
    "total due",
    "balance due",
    "total",
];

pub const SUBTOTAL_LABELS: &[&str] = &["subtotal", "sub total"];

pub const TAX_LABELS: &[&str] = &["sales tax", "tax"];

/// Payment-method and tender vocabulary. Lines carrying these frequently
/// hold a similarly-shaped number that is not the total.
pub const TENDER_VOCAB: &[&str] = &[
    "visa",
    "mastercard",
    "amex",
    "american express",
    "discover",
    "debit",
    "credit",
    "change",
    "cash",
    "tender",
    "tip",
    "gratuity",
    "service charge",
    "auth",
    "approval",
    "approved",
    "authorized",
    "ref",
    "trans",
    "transaction",
];

/// Quantity vocabulary whose numbers look like currency but are not.
pub const UNIT_TRAPS: &[&str] = &[
    "gallon",
    "gallons",
    "gal",
    "qty",
    "quantity",
    "lb",
    "lbs",
    "oz",
    "kg",
    "liter",
    "litre",
    "each",
];

/// Boilerplate that disqualifies a line as a vendor header outright.
pub const VENDOR_NOISE_VOCAB: &[&str] = &[
    "thank you",
    "thanks",
    "welcome",
    "come again",
    "receipt",
    "invoice",
    "customer copy",
    "merchant copy",
    "copy",
    "total",
    "subtotal",
    "tax",
    "change",
    "cash",
    "visa",
    "mastercard",
    "amex",
    "discover",
    "approved",
    "authorization",
    "auth",
    "ref",
    "transaction",
    "trans",
    "entry method",
    "merchant id",
    "terminal",
];

/// Footer/policy vocabulary; penalized rather than disqualifying, since
/// some store names legitimately contain one of these words.
pub const FOOTER_VOCAB: &[&str] = &[
    "return policy",
    "returns",
    "survey",
    "www",
    "http",
    "rewards",
    "coupon",
    "member",
    "please",
    "retain",
];

/// Merchant-name tokens: legal suffixes, common category words, and known
/// brand fragments. Presence is a strong vendor signal.
pub const MERCHANT_TOKENS: &[&str] = &[
    "inc",
    "llc",
    "corp",
    "co",
    "company",
    "ltd",
    "market",
    "store",
    "shop",
    "mart",
    "deli",
    "diner",
    "cafe",
    "coffee",
    "grill",
    "pizza",
    "restaurant",
    "bar",
    "gas",
    "fuel",
    "station",
    "oil",
    "hardware",
    "auto",
    "supply",
    "lumber",
    "pharmacy",
    "shell",
    "chevron",
    "exxon",
    "mobil",
    "sunoco",
    "wawa",
    "speedway",
    "valero",
    "citgo",
    "barnes",
    "noble",
    "depot",
    "lowes",
    "costco",
    "walmart",
    "target",
    "starbucks",
    "dunkin",
];

/// Street/state tokens hinting a postal address when digits are present.
pub const ADDRESS_HINTS: &[&str] = &[
    "st", "street", "rd", "road", "ave", "avenue", "blvd", "boulevard", "ln", "lane", "dr",
    "drive", "hwy", "highway", "suite", "ste", "unit", "pa", "nj", "ny", "ca", "tx", "fl", "il",
    "oh", "wa", "va", "md", "ma", "ct", "ga", "nc", "az", "co", "mi", "mn", "mo", "or", "tn",
    "wi",
];

/// Word-boundary containment of a normalized phrase in normalized text.
///
/// Both arguments must already be lowercased with punctuation softened;
/// matching is on whole words, so "total" does not hit inside "subtotal".
pub fn contains_phrase(norm: &str, phrase: &str) -> bool {
    if norm.len() < phrase.len() {
        return false;
    }
    format!(" {} ", norm).contains(&format!(" {} ", phrase))
}

/// Any of the phrases, word-bounded.
pub fn contains_any(norm: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(norm, p))
}

/// True when the normalized line carries unit-trap vocabulary.
pub fn has_unit_trap(norm: &str) -> bool {
    contains_any(norm, UNIT_TRAPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_phrase_is_word_bounded() {
        assert!(contains_phrase("grand total 38 72", "total"));
        assert!(contains_phrase("grand total 38 72", "grand total"));
        assert!(!contains_phrase("subtotal 30 74", "total"));
        assert!(!contains_phrase("regal cinema", "gal"));
    }

    #[test]
    fn test_unit_traps() {
        assert!(has_unit_trap("unleaded 12 404 gal"));
        assert!(has_unit_trap("qty 2"));
        assert!(!has_unit_trap("total 38 72"));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(PHONE.is_match("(215) 555-0187"));
        assert!(PHONE.is_match("215-555-0187"));
        assert!(PHONE.is_match("+1 215 555 0187"));
        assert!(!PHONE.is_match("#2259"));
    }

    #[test]
    fn test_state_zip() {
        assert!(STATE_ZIP.is_match("PHILADELPHIA PA 19103"));
        assert!(STATE_ZIP.is_match("NJ 08540-1234"));
        assert!(!STATE_ZIP.is_match("BARNES & NOBLE #2259"));
    }
}
