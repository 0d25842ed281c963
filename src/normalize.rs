//! Text normalization shared by every downstream module.
//!
//! All functions here are pure and total; empty input yields empty output.

/// Normalized view of one receipt's OCR text: an ordered sequence of
/// non-empty, whitespace-collapsed lines plus a lowercased blob form for
/// substring search.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    lines: Vec<String>,
    blob: String,
}

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let lines: Vec<String> = raw
            .lines()
            .map(clean_line)
            .filter(|l| !l.is_empty())
            .collect();
        let blob = normalize_blob(raw);
        Self { lines, blob }
    }

    /// Non-empty, whitespace-collapsed lines in document order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lowercased, punctuation-softened form of the whole text.
    pub fn blob(&self) -> &str {
        &self.blob
    }
}

/// Trim a line and collapse internal whitespace runs to single spaces.
pub fn clean_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, fold common Latin-1 diacritics to ASCII, soften everything
/// that is not alphanumeric to a space, and collapse whitespace.
pub fn normalize_blob(s: &str) -> String {
    let softened: String = s
        .chars()
        .map(fold_diacritic)
        .flat_map(|c| c.to_lowercase())
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    softened.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold the common Latin-1 accented characters to their ASCII base.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        _ => c,
    }
}

/// Collapse runs of three or more single-letter tokens into one word.
///
/// Repairs OCR letter-spacing artifacts: `"S H E L L"` becomes `"SHELL"`.
pub fn collapse_spaced_letters(s: &str) -> String {
    let tokens: Vec<&str> = s.split_whitespace().collect();
    let mut out: Vec<String> = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let mut j = i;
        while j < tokens.len() && is_single_letter(tokens[j]) {
            j += 1;
        }
        if j - i >= 3 {
            out.push(tokens[i..j].concat());
            i = j;
        } else if j > i {
            out.extend(tokens[i..j].iter().map(|t| t.to_string()));
            i = j;
        } else {
            out.push(tokens[i].to_string());
            i += 1;
        }
    }

    out.join(" ")
}

fn is_single_letter(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}
