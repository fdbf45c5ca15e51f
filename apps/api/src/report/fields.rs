//! Field Extractor — splits the model's free-text report into the fixed
//! field set used for structured rendering.
//!
//! This is a best-effort parser over unstructured external output. The
//! upstream model is *asked* for a five-label format but nothing guarantees
//! it; missing labels simply yield empty fields and extraction never fails.

use serde::{Deserialize, Serialize};

/// The canonical report field set. Historical prompt variants added and
/// dropped fields ("Condition", "Keywords"); condition is an input hint
/// here, never an output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    Type,
    StyleAndEra,
    Materials,
    Details,
    EstimatedResalePrice,
}

/// Label prefixes recognized on report lines, most specific first. Matching
/// is ASCII case-insensitive and requires a colon after the label.
const FIELD_LABELS: &[(&str, ReportField)] = &[
    ("estimated resale price", ReportField::EstimatedResalePrice),
    ("resale price", ReportField::EstimatedResalePrice),
    ("price range", ReportField::EstimatedResalePrice),
    ("price estimate", ReportField::EstimatedResalePrice),
    ("style & era", ReportField::StyleAndEra),
    ("style and era", ReportField::StyleAndEra),
    ("style/era", ReportField::StyleAndEra),
    ("style", ReportField::StyleAndEra),
    ("jewelry type", ReportField::Type),
    ("type", ReportField::Type),
    ("materials", ReportField::Materials),
    ("material", ReportField::Materials),
    ("details", ReportField::Details),
    ("description", ReportField::Details),
];

/// Extraction output. Every key is always present; an absent label leaves
/// its field as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub jewelry_type: String,
    pub style_and_era: String,
    pub materials: String,
    pub details: String,
    pub estimated_resale_price: String,
}

impl ParsedReport {
    pub fn get(&self, field: ReportField) -> &str {
        match field {
            ReportField::Type => &self.jewelry_type,
            ReportField::StyleAndEra => &self.style_and_era,
            ReportField::Materials => &self.materials,
            ReportField::Details => &self.details,
            ReportField::EstimatedResalePrice => &self.estimated_resale_price,
        }
    }

    fn set(&mut self, field: ReportField, value: String) {
        let slot = match field {
            ReportField::Type => &mut self.jewelry_type,
            ReportField::StyleAndEra => &mut self.style_and_era,
            ReportField::Materials => &mut self.materials,
            ReportField::Details => &mut self.details,
            ReportField::EstimatedResalePrice => &mut self.estimated_resale_price,
        };
        *slot = value;
    }
}

/// Controls what happens to lines that match no label.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Append unmatched lines to the details field instead of discarding
    /// them. Off by default; the full normalized text is kept alongside the
    /// parsed fields, so nothing is lost either way.
    pub keep_unmatched: bool,
}

/// Splits `text` into lines and assigns each labeled line's value (the
/// trimmed remainder after the first colon) to its field. The last
/// occurrence of a duplicated label wins. Leading markdown list and emphasis
/// markers are stripped before matching since the model emits markdown.
pub fn extract_fields(text: &str, options: ExtractOptions) -> ParsedReport {
    let mut report = ParsedReport::default();
    let mut unmatched: Vec<&str> = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim().trim_start_matches(['-', '*', ' ']);
        if line.is_empty() {
            continue;
        }
        match match_label(line) {
            Some((field, value)) => report.set(field, value),
            None => {
                if options.keep_unmatched {
                    unmatched.push(line);
                }
            }
        }
    }

    if !unmatched.is_empty() {
        let extra = unmatched.join("\n");
        if report.details.is_empty() {
            report.details = extra;
        } else {
            report.details = format!("{}\n{extra}", report.details);
        }
    }

    report
}

fn match_label(line: &str) -> Option<(ReportField, String)> {
    for &(label, field) in FIELD_LABELS {
        let Some(prefix) = line.get(..label.len()) else {
            continue;
        };
        if !prefix.eq_ignore_ascii_case(label) {
            continue;
        }
        // Require the colon; "Materials unknown" is not a labeled line.
        // Tolerate trailing bold markers as in "**Materials:** gold".
        let rest = line[label.len()..].trim_start();
        if let Some(value) = rest.strip_prefix(':') {
            let value = value.trim().trim_matches('*').trim();
            return Some((field, value.to_string()));
        }
    }
    None
}
