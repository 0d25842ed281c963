//! Money token matching and validation.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{MONEY_COMMA_DECIMAL, MONEY_MARKED, MONEY_PLAIN};
use super::FieldExtractor;

/// One currency-shaped token found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyToken {
    /// Parsed value.
    pub value: Decimal,

    /// The token carried an explicit currency marker (`$38.72`).
    pub marked: bool,

    /// Byte offset of the match start within the line.
    pub start: usize,
}

/// Locates currency-shaped substrings within a line.
///
/// Matches are returned in left-to-right order; callers typically prefer
/// the rightmost or the largest depending on context. Values that are
/// non-positive or implausibly large are dropped, which rejects most OCR
/// digit-run garbage such as two amounts fused into one number.
pub struct MoneyMatcher;

impl MoneyMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MoneyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MoneyMatcher {
    type Output = MoneyToken;

    fn extract(&self, line: &str) -> Option<Self::Output> {
        self.extract_all(line).into_iter().next()
    }

    fn extract_all(&self, line: &str) -> Vec<Self::Output> {
        let mut tokens: Vec<MoneyToken> = Vec::new();
        let mut spans: Vec<(usize, usize)> = Vec::new();

        for caps in MONEY_MARKED.captures_iter(line) {
            let m = caps.get(0).unwrap();
            if let Some(value) = parse_amount(&caps[1]) {
                spans.push((m.start(), m.end()));
                tokens.push(MoneyToken {
                    value,
                    marked: true,
                    start: m.start(),
                });
            }
        }

        for caps in MONEY_PLAIN.captures_iter(line) {
            let m = caps.get(0).unwrap();
            if overlaps(&spans, m.start(), m.end()) {
                continue;
            }
            if let Some(value) = parse_amount(&caps[1]) {
                spans.push((m.start(), m.end()));
                tokens.push(MoneyToken {
                    value,
                    marked: false,
                    start: m.start(),
                });
            }
        }

        // Comma-decimal locales only get a say when the line produced no
        // dot-decimal token.
        if tokens.is_empty() {
            for caps in MONEY_COMMA_DECIMAL.captures_iter(line) {
                let m = caps.get(0).unwrap();
                if let Some(value) = parse_comma_amount(&caps[1]) {
                    tokens.push(MoneyToken {
                        value,
                        marked: false,
                        start: m.start(),
                    });
                }
            }
        }

        tokens.sort_by_key(|t| t.start);
        tokens
    }
}

fn overlaps(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|&(s, e)| start < e && s < end)
}

/// Parse a dot-decimal amount, rejecting non-positive and implausibly
/// large values (> 99,999).
pub fn parse_amount(token: &str) -> Option<Decimal> {
    let cleaned = token.replace(',', "");
    let value = Decimal::from_str(cleaned.trim()).ok()?;
    plausible(value).then_some(value)
}

/// Parse a comma-decimal amount (`1.234,56`), same plausibility rules.
pub fn parse_comma_amount(token: &str) -> Option<Decimal> {
    let cleaned = token.replace('.', "").replace(',', ".");
    let value = Decimal::from_str(cleaned.trim()).ok()?;
    plausible(value).then_some(value)
}

fn plausible(value: Decimal) -> bool {
    value > Decimal::ZERO && value <= Decimal::from(99_999u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<Decimal> {
        MoneyMatcher::new()
            .extract_all(line)
            .into_iter()
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn test_marked_amounts() {
        let tokens = MoneyMatcher::new().extract_all("TOTAL $38.72");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, Decimal::new(3872, 2));
        assert!(tokens[0].marked);
    }

    #[test]
    fn test_marked_integer_amount() {
        assert_eq!(values("CASH $40"), vec![Decimal::new(40, 0)]);
    }

    #[test]
    fn test_bare_integer_needs_marker() {
        assert!(values("STORE #2259").is_empty());
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(values("Amount due 1,234.56"), vec![Decimal::new(123456, 2)]);
    }

    #[test]
    fn test_comma_decimal_locale() {
        assert_eq!(values("Summe 1.234,56"), vec![Decimal::new(123456, 2)]);
    }

    #[test]
    fn test_rejects_garbage_digit_runs() {
        // two fused amounts parse above the plausibility cap
        assert!(values("123456.78").is_empty());
        assert!(values("$0.00").is_empty());
    }

    #[test]
    fn test_three_decimal_quantity_is_not_money() {
        assert!(values("UNLEADED 12.404 GAL").is_empty());
    }

    #[test]
    fn test_left_to_right_order() {
        let vals = values("Subtotal 30.74 Tax 1.85");
        assert_eq!(vals, vec![Decimal::new(3074, 2), Decimal::new(185, 2)]);
    }

    #[test]
    fn test_time_is_not_money() {
        assert!(values("03/14/2024 12:38").is_empty());
    }
}
