//! Report generation pipeline: prompt → vision call → price normalization →
//! field extraction → `ReportRecord`.
//!
//! Everything after the LLM call is a pure function over text, so the
//! pipeline below the network boundary is testable without a live model.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::report::{Condition, ReportRecord};
use crate::report::fields::{extract_fields, ExtractOptions};
use crate::report::images::UploadedImage;
use crate::report::price::normalize_price;
use crate::report::prompts::{render_hints, APPRAISAL_PROMPT_TEMPLATE, APPRAISAL_SYSTEM};

/// One report request: validated uploads plus the optional user hints.
#[derive(Debug)]
pub struct GenerateParams {
    pub images: Vec<UploadedImage>,
    pub jewelry_type: Option<String>,
    pub condition: Option<Condition>,
    pub notes: Option<String>,
}

impl GenerateParams {
    pub fn prompt(&self) -> String {
        let hints = render_hints(
            self.jewelry_type.as_deref(),
            self.condition.map(|c| c.as_str()),
            self.notes.as_deref(),
        );
        APPRAISAL_PROMPT_TEMPLATE.replace("{hints}", &hints)
    }
}

/// Runs the full pipeline for one request. Upstream failure surfaces as
/// `AppError::Llm` with the client's message; nothing downstream of the call
/// can fail.
pub async fn generate_report(
    llm: &LlmClient,
    params: &GenerateParams,
) -> Result<ReportRecord, AppError> {
    let attachments: Vec<_> = params.images.iter().map(UploadedImage::to_attachment).collect();

    let raw_text = llm
        .call_vision(&attachments, &params.prompt(), APPRAISAL_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let record = assemble_record(params, raw_text);
    info!(
        report_id = %record.id,
        images = record.image_filenames.len(),
        "report generated"
    );
    Ok(record)
}

/// Pure tail of the pipeline: normalizes and extracts the model text and
/// stamps the record. Split out so the text path is testable on fixtures.
pub fn assemble_record(params: &GenerateParams, raw_text: String) -> ReportRecord {
    let report_text = normalize_price(&raw_text);
    let fields = extract_fields(&report_text, ExtractOptions::default());

    let download_stem = params
        .images
        .first()
        .map(|image| image.stem().to_string())
        .unwrap_or_else(|| "jewelry".to_string());

    ReportRecord {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        image_filenames: params
            .images
            .iter()
            .map(|image| image.filename.clone())
            .collect(),
        raw_text,
        report_text,
        fields,
        download_stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn upload(filename: &str) -> UploadedImage {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        UploadedImage::from_bytes(filename, Bytes::from(buffer.into_inner()), usize::MAX).unwrap()
    }

    fn params(filenames: &[&str]) -> GenerateParams {
        GenerateParams {
            images: filenames.iter().map(|name| upload(name)).collect(),
            jewelry_type: None,
            condition: None,
            notes: None,
        }
    }

    #[test]
    fn test_prompt_without_hints_has_no_placeholder() {
        let prompt = params(&["ring.png"]).prompt();
        assert!(!prompt.contains("{hints}"));
        assert!(prompt.contains("resale price range"));
    }

    #[test]
    fn test_prompt_includes_supplied_hints() {
        let mut p = params(&["ring.png"]);
        p.jewelry_type = Some("cocktail ring".to_string());
        p.condition = Some(Condition::Fair);
        p.notes = Some("stone is loose".to_string());
        let prompt = p.prompt();
        assert!(prompt.contains("cocktail ring"));
        assert!(prompt.contains("Fair condition"));
        assert!(prompt.contains("stone is loose"));
    }

    #[test]
    fn test_assemble_normalizes_price_and_extracts_fields() {
        let raw = "Type: Brooch\n\
            Style & Era: Art Deco, 1920s\n\
            Materials: Sterling silver\n\
            Details: Fan motif\n\
            Estimated Resale Price: 25-75"
            .to_string();
        let record = assemble_record(&params(&["brooch.png"]), raw.clone());

        assert_eq!(record.raw_text, raw);
        assert!(record
            .report_text
            .contains("Estimated Resale Price: $25 to $75 USD"));
        assert_eq!(record.fields.jewelry_type, "Brooch");
        assert_eq!(record.fields.estimated_resale_price, "$25 to $75 USD");
    }

    #[test]
    fn test_assemble_swaps_reversed_range() {
        let record = assemble_record(
            &params(&["ring.png"]),
            "Price Range: $100to$50".to_string(),
        );
        assert_eq!(record.report_text, "Price Range: $50 to $100 USD");
    }

    #[test]
    fn test_assemble_tolerates_unstructured_text() {
        let record = assemble_record(
            &params(&["ring.png"]),
            "I can't tell much from this photo.".to_string(),
        );
        assert_eq!(record.report_text, "I can't tell much from this photo.");
        assert_eq!(record.fields.jewelry_type, "");
        assert_eq!(record.fields.estimated_resale_price, "");
    }

    #[test]
    fn test_assemble_uses_first_image_for_stem() {
        let record = assemble_record(
            &params(&["gold_ring.jpg.png", "side_view.png"]),
            String::new(),
        );
        assert_eq!(record.download_stem, "gold_ring.jpg");
        assert_eq!(record.image_filenames.len(), 2);
    }
}
