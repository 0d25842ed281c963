//! Vendor candidate generation, filtering, and scoring.

use tracing::debug;

use crate::normalize::{collapse_spaced_letters, normalize_blob};

use super::money::MoneyMatcher;
use super::patterns::{
    contains_any, contains_phrase, ADDRESS_HINTS, DATE_DOTTED, DATE_ISO, DATE_MDY, FOOTER_VOCAB,
    MERCHANT_TOKENS, PHONE, STATE_ZIP, STREET_NUMBER, TIME_OF_DAY, VENDOR_NOISE_VOCAB,
};
use super::{confidence_from_score, FieldExtractor};

/// Header lines longer than this are policy paragraphs, not store names.
const MAX_HEADER_LEN: usize = 56;

/// Score bands mapping a raw vendor score to a reported confidence.
/// Marginal survivors report 0.60; very strong headers approach 0.95.
const VENDOR_BANDS: &[(f32, f32)] = &[
    (2.2, 0.95),
    (1.8, 0.92),
    (1.4, 0.85),
    (1.0, 0.78),
    (0.7, 0.70),
    (0.4, 0.64),
    (f32::MIN, 0.60),
];

/// The chosen vendor plus alternates for UI display.
///
/// The default value is the documented unknown-vendor state: empty name,
/// confidence 0.0, no alternates. That state is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorPick {
    pub name: String,
    pub confidence: f32,
    pub alternates: Vec<String>,
}

/// Scores lines and adjacent line-pairs from the top of the receipt and
/// returns the best-ranked merchant header.
pub struct VendorSelector {
    window: usize,
}

impl VendorSelector {
    pub fn new() -> Self {
        Self { window: 72 }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }

    pub fn select(&self, lines: &[String]) -> VendorPick {
        let top: Vec<String> = lines
            .iter()
            .take(self.window)
            .map(|l| collapse_spaced_letters(l))
            .collect();

        // Candidates are single lines plus merged adjacent short lines,
        // which repairs headers OCR split across two lines.
        let mut candidates: Vec<(String, usize)> = Vec::new();
        for (i, a) in top.iter().enumerate() {
            candidates.push((a.clone(), i));
            if let Some(b) = top.get(i + 1) {
                let a_len = a.chars().count();
                let b_len = b.chars().count();
                if (3..=22).contains(&a_len)
                    && (3..=26).contains(&b_len)
                    && !is_noise(a)
                    && !is_noise(b)
                {
                    candidates.push((format!("{a} {b}"), i));
                }
            }
        }

        let mut scored: Vec<(String, f32)> = candidates
            .into_iter()
            .filter_map(|(c, i)| self.score(&c, i).map(|s| (c, s)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let Some((best, best_score)) = scored.first().cloned() else {
            debug!("no vendor candidate survived filtering");
            return VendorPick::default();
        };

        let best_key = normalize_blob(&best);
        let mut seen = vec![best_key];
        let mut alternates = Vec::new();
        for (candidate, _) in scored.iter().skip(1) {
            let key = normalize_blob(candidate);
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            seen.push(key);
            alternates.push(candidate.clone());
            if alternates.len() >= 3 {
                break;
            }
        }

        let confidence = confidence_from_score(best_score, VENDOR_BANDS);
        debug!(vendor = %best, score = best_score, confidence, "vendor selected");
        VendorPick {
            name: best,
            confidence,
            alternates,
        }
    }

    /// Weighted score for a surviving candidate; `None` when disqualified.
    fn score(&self, line: &str, idx: usize) -> Option<f32> {
        if is_noise(line) {
            return None;
        }

        let mut score = 0.0f32;

        // Earlier lines are more header-like; smooth decay, no hard cutoff.
        score += 0.4 * (1.0 - idx as f32 / self.window as f32).max(0.0);

        let total = line.chars().count().max(1);
        let letters = line.chars().filter(|c| c.is_alphabetic()).count();
        let uppers = line
            .chars()
            .filter(|c| c.is_alphabetic() && c.is_uppercase())
            .count();
        let digits = line.chars().filter(|c| c.is_ascii_digit()).count();
        let punct = line
            .chars()
            .filter(|c| !c.is_alphanumeric() && *c != ' ' && *c != '&' && *c != '#')
            .count();

        if letters > 0 {
            score += 0.9 * uppers as f32 / letters as f32;
        }
        score += 0.5 * letters as f32 / total as f32;
        score -= 0.15 * digits as f32;
        score -= 0.20 * punct as f32;

        // Structural punctuation typical of store headers.
        if line.contains('&') || line.contains('#') {
            score += 0.15;
        }

        let words = line.split_whitespace().count();
        score += match words {
            1..=5 => 0.6,
            6..=10 => 0.3,
            _ => -0.4,
        };

        let norm = normalize_blob(line);
        if MERCHANT_TOKENS.iter().any(|t| contains_phrase(&norm, t)) {
            score += 0.35;
        }
        if contains_any(&norm, FOOTER_VOCAB) {
            score -= 0.5;
        }

        Some(score)
    }
}

impl Default for VendorSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Outright disqualification: shapes and vocabulary that never belong to a
/// merchant header.
fn is_noise(line: &str) -> bool {
    let norm = normalize_blob(line);
    if norm.is_empty() {
        return true;
    }
    if contains_any(&norm, VENDOR_NOISE_VOCAB) {
        return true;
    }
    if PHONE.is_match(line) {
        return true;
    }
    if MoneyMatcher::new().extract(line).is_some() {
        return true;
    }
    if DATE_ISO.is_match(line)
        || DATE_MDY.is_match(line)
        || DATE_DOTTED.is_match(line)
        || TIME_OF_DAY.is_match(line)
    {
        return true;
    }
    if looks_like_address(line, &norm) {
        return true;
    }
    if line.chars().count() > MAX_HEADER_LEN {
        return true;
    }
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 3 {
        return true;
    }
    // lines that are mostly one-character tokens are OCR fragments
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() >= 4 && tokens.iter().filter(|t| t.chars().count() <= 1).count() * 2 > tokens.len() {
        return true;
    }
    false
}

fn looks_like_address(line: &str, norm: &str) -> bool {
    if STATE_ZIP.is_match(&line.to_uppercase()) {
        return true;
    }
    if STREET_NUMBER.is_match(line) {
        return true;
    }
    let has_digit = line.chars().any(|c| c.is_ascii_digit());
    has_digit && norm.split_whitespace().any(|t| ADDRESS_HINTS.contains(&t))
}
