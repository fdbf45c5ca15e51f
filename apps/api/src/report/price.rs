//! Price Normalizer — rewrites the model's free-text price range into the
//! canonical `$<low> to $<high> USD` form.
//!
//! The upstream model emits ranges in many shapes (`30to100`, `$30 to 100`,
//! `$100-$50`, doubled `USD` suffixes). Instead of chaining substitution
//! regexes, this is one deterministic pass: find the first line with a
//! recognized price label and two integer tokens after it, then replace the
//! remainder of that line with the canonical rendering.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Labels the model uses for the resale estimate line. Longest variants
    /// first so "Estimated Resale Price" is not matched as "Resale Price".
    static ref PRICE_LABEL: Regex = Regex::new(
        r"(?i)\b(estimated\s+resale\s+price|resale\s+price|price\s+range|price\s+estimate)\b",
    )
    .expect("price label regex is valid");
}

/// A parsed resale price range. Always holds `low <= high`; construction
/// sorts the two captured values because the model sometimes emits them
/// high-to-low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub low: u64,
    pub high: u64,
}

impl PriceRange {
    pub fn new(a: u64, b: u64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// Scans `text` for the first two integer tokens, ignoring `$`, `-`,
    /// `to`, and anything else between them. Grouping commas are folded into
    /// the surrounding number, so `$1,500` reads as 1500 rather than (1, 5).
    /// Returns `None` unless two tokens are found.
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens = [0u64; 2];
        let mut found = 0;
        let bytes = text.as_bytes();
        let mut i = 0;

        while i < bytes.len() && found < 2 {
            if !bytes[i].is_ascii_digit() {
                i += 1;
                continue;
            }
            let mut digits = String::new();
            while i < bytes.len() {
                if bytes[i].is_ascii_digit() {
                    digits.push(bytes[i] as char);
                    i += 1;
                } else if bytes[i] == b',' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit()
                {
                    i += 1; // grouping comma
                } else {
                    break;
                }
            }
            // Overflowing runs are skipped rather than truncated.
            if let Ok(n) = digits.parse::<u64>() {
                tokens[found] = n;
                found += 1;
            }
        }

        if found == 2 {
            Some(Self::new(tokens[0], tokens[1]))
        } else {
            None
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${} to ${} USD", self.low, self.high)
    }
}

/// Normalizes the first price line in `text` to `<label>: $<low> to $<high> USD`.
///
/// Policy (intentionally forgiving — malformed model output must never break
/// report rendering):
/// - at most one line is rewritten, the first that carries both a label and
///   two integer tokens;
/// - a label with fewer than two parsable numbers is left untouched;
/// - text with no price label at all is returned unchanged;
/// - the pass is idempotent, so re-normalizing stored reports is safe.
pub fn normalize_price(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rewritten_any = false;

    // Positional substitution: only the matched line's own span is replaced,
    // and original line terminators are carried through untouched.
    for segment in text.split_inclusive('\n') {
        if !rewritten_any {
            let line = segment.strip_suffix('\n').unwrap_or(segment);
            let (line, had_cr) = match line.strip_suffix('\r') {
                Some(stripped) => (stripped, true),
                None => (line, false),
            };
            if let Some(rewritten) = rewrite_price_line(line) {
                if rewritten == line {
                    return text.to_string();
                }
                result.push_str(&rewritten);
                if had_cr {
                    result.push('\r');
                }
                if segment.ends_with('\n') {
                    result.push('\n');
                }
                rewritten_any = true;
                continue;
            }
        }
        result.push_str(segment);
    }

    if rewritten_any {
        result
    } else {
        text.to_string()
    }
}

fn rewrite_price_line(line: &str) -> Option<String> {
    let label = PRICE_LABEL.find(line)?;
    let range = PriceRange::parse(&line[label.end()..])?;
    Some(format!("{}: {range}", &line[..label.end()]))
}
