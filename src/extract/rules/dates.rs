//! Date token matching and the date selector.

use chrono::NaiveDate;

use super::patterns::{DATE_DOTTED, DATE_ISO, DATE_MDY, DATE_MONTH_NAME};
use super::FieldExtractor;

/// Years outside this window are treated as OCR digit corruption.
const YEAR_MIN: i32 = 2010;
const YEAR_MAX: i32 = 2035;

/// One validated calendar date with a format-dependent confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateMatch {
    pub value: NaiveDate,
    pub confidence: f32,
}

/// Date formats in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateFormat {
    Iso,
    SlashDash,
    Dotted,
    MonthName,
}

/// Per-format confidence: unambiguous formats score higher.
const FORMATS: [(DateFormat, f32); 4] = [
    (DateFormat::Iso, 0.95),
    (DateFormat::SlashDash, 0.85),
    (DateFormat::Dotted, 0.80),
    (DateFormat::MonthName, 0.82),
];

/// Locates date-shaped substrings and validates them against a real
/// calendar.
pub struct DateMatcher;

impl DateMatcher {
    pub fn new() -> Self {
        Self
    }

    fn match_format(&self, text: &str, format: DateFormat) -> Option<NaiveDate> {
        match format {
            DateFormat::Iso => DATE_ISO.captures_iter(text).find_map(|caps| {
                validated(
                    caps[1].parse().ok()?,
                    caps[2].parse().ok()?,
                    caps[3].parse().ok()?,
                )
            }),
            DateFormat::SlashDash => DATE_MDY.captures_iter(text).find_map(|caps| {
                validated(
                    parse_year(&caps[3])?,
                    caps[1].parse().ok()?,
                    caps[2].parse().ok()?,
                )
            }),
            DateFormat::Dotted => DATE_DOTTED.captures_iter(text).find_map(|caps| {
                validated(
                    caps[3].parse().ok()?,
                    caps[1].parse().ok()?,
                    caps[2].parse().ok()?,
                )
            }),
            DateFormat::MonthName => DATE_MONTH_NAME.captures_iter(text).find_map(|caps| {
                validated(
                    caps[3].parse().ok()?,
                    month_number(&caps[1])?,
                    caps[2].parse().ok()?,
                )
            }),
        }
    }
}

impl Default for DateMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateMatcher {
    type Output = DateMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        FORMATS.iter().find_map(|&(format, confidence)| {
            self.match_format(text, format)
                .map(|value| DateMatch { value, confidence })
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<DateMatch> = Vec::new();
        for &(format, confidence) in &FORMATS {
            if let Some(value) = self.match_format(text, format) {
                if results.iter().any(|r| r.value == value) {
                    continue;
                }
                results.push(DateMatch { value, confidence });
            }
        }
        results
    }
}

/// Picks the receipt's transaction date.
///
/// Format priority is absolute; within a format, a match in the leading
/// header lines is preferred and a match anywhere else costs a small
/// confidence haircut.
pub struct DateSelector {
    matcher: DateMatcher,
    header_lines: usize,
}

impl DateSelector {
    pub fn new() -> Self {
        Self {
            matcher: DateMatcher::new(),
            header_lines: 24,
        }
    }

    pub fn with_header_lines(mut self, lines: usize) -> Self {
        self.header_lines = lines;
        self
    }

    /// Returns `None` when no plausible date exists anywhere in the text.
    pub fn select(&self, lines: &[String]) -> Option<DateMatch> {
        if lines.is_empty() {
            return None;
        }
        let split = self.header_lines.min(lines.len());
        let header = lines[..split].join("\n");
        let rest = lines[split..].join("\n");

        for &(format, confidence) in &FORMATS {
            if let Some(value) = self.matcher.match_format(&header, format) {
                return Some(DateMatch { value, confidence });
            }
            if let Some(value) = self.matcher.match_format(&rest, format) {
                return Some(DateMatch {
                    value,
                    confidence: (confidence - 0.05).max(0.0),
                });
            }
        }
        None
    }
}

impl Default for DateSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn validated(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years on receipts are always the 2000s.
fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    Some(if s.len() == 2 { 2000 + year } else { year })
}

fn month_number(prefix: &str) -> Option<u32> {
    match prefix.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_date() {
        let m = DateMatcher::new().extract("2024-03-14").unwrap();
        assert_eq!(m.value, date(2024, 3, 14));
        assert_eq!(m.confidence, 0.95);
    }

    #[test]
    fn test_slash_date_two_digit_year() {
        let m = DateMatcher::new().extract("03/14/24").unwrap();
        assert_eq!(m.value, date(2024, 3, 14));
        assert_eq!(m.confidence, 0.85);
    }

    #[test]
    fn test_dotted_date() {
        let m = DateMatcher::new().extract("03.14.2024").unwrap();
        assert_eq!(m.value, date(2024, 3, 14));
        assert_eq!(m.confidence, 0.80);
    }

    #[test]
    fn test_month_name_date() {
        let m = DateMatcher::new().extract("March 14, 2024").unwrap();
        assert_eq!(m.value, date(2024, 3, 14));
        assert_eq!(m.confidence, 0.82);

        let m = DateMatcher::new().extract("Mar 14 2024").unwrap();
        assert_eq!(m.value, date(2024, 3, 14));
    }

    #[test]
    fn test_year_window() {
        let matcher = DateMatcher::new();
        assert!(matcher.extract("03/14/1999").is_none());
        assert!(matcher.extract("03/14/2050").is_none());
        assert!(matcher.extract("2036-01-01").is_none());
    }

    #[test]
    fn test_invalid_calendar_date_rejected() {
        assert!(DateMatcher::new().extract("13/45/2024").is_none());
    }

    #[test]
    fn test_iso_wins_over_slash() {
        let m = DateMatcher::new().extract("03/14/24 2024-03-15").unwrap();
        assert_eq!(m.value, date(2024, 3, 15));
        assert_eq!(m.confidence, 0.95);
    }

    #[test]
    fn test_selector_prefers_header_region() {
        let mut lines: Vec<String> = vec!["SHELL OIL".into(), "03/14/2024".into()];
        lines.extend((0..30).map(|_| "ITEM 1.00".into()));
        lines.push("03/15/2024".into());

        let m = DateSelector::new().select(&lines).unwrap();
        assert_eq!(m.value, date(2024, 3, 14));
        assert_eq!(m.confidence, 0.85);
    }

    #[test]
    fn test_selector_haircut_outside_header() {
        let mut lines: Vec<String> = (0..30).map(|_| "ITEM ONE".to_string()).collect();
        lines.push("03/14/2024".into());

        let m = DateSelector::new().select(&lines).unwrap();
        assert_eq!(m.value, date(2024, 3, 14));
        assert!((m.confidence - 0.80).abs() < 1e-6);
    }

    #[test]
    fn test_no_date() {
        assert!(DateSelector::new().select(&[]).is_none());
        assert!(
            DateSelector::new()
                .select(&["SHELL OIL".to_string(), "TOTAL 5.00".to_string()])
                .is_none()
        );
    }
}
