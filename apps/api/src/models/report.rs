use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::report::fields::ParsedReport;

/// User-declared condition of the piece, offered as a hint to the model.
/// Mirrors the four-option selector the upload form presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Excellent => "Excellent",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
        }
    }

    /// Case-insensitive parse of the form value. Unknown strings are a
    /// validation error, not a silent default.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Condition::Excellent),
            "good" => Some(Condition::Good),
            "fair" => Some(Condition::Fair),
            "poor" => Some(Condition::Poor),
            _ => None,
        }
    }
}

/// One generated appraisal report, as stored in session history and returned
/// to the client. Derived fresh on every generation; never persisted beyond
/// the in-memory session list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Filenames of the uploaded photos this report covers.
    pub image_filenames: Vec<String>,
    /// Verbatim model output, kept for display and debugging.
    pub raw_text: String,
    /// Price-normalized text — what the user downloads.
    pub report_text: String,
    pub fields: ParsedReport,
    /// Stem of the first uploaded image; drives the
    /// `<stem>_jewelry_report.txt` download filename.
    pub download_stem: String,
}

impl ReportRecord {
    pub fn download_filename(&self) -> String {
        format!("{}_jewelry_report.txt", self.download_stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parse_case_insensitive() {
        assert_eq!(Condition::parse("good"), Some(Condition::Good));
        assert_eq!(Condition::parse(" EXCELLENT "), Some(Condition::Excellent));
    }

    #[test]
    fn test_condition_parse_rejects_unknown() {
        assert_eq!(Condition::parse("mint"), None);
    }

    #[test]
    fn test_download_filename_convention() {
        let record = ReportRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            image_filenames: vec!["gold_brooch.jpg".to_string()],
            raw_text: String::new(),
            report_text: String::new(),
            fields: ParsedReport::default(),
            download_stem: "gold_brooch".to_string(),
        };
        assert_eq!(record.download_filename(), "gold_brooch_jewelry_report.txt");
    }
}
