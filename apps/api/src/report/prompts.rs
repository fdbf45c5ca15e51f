// All LLM prompt constants for report generation.

/// System prompt for the appraisal call — fixes the persona and the labeled
/// output format the normalization pipeline expects.
pub const APPRAISAL_SYSTEM: &str =
    "You are a jewelry appraiser and reseller's virtual assistant. \
    Analyze the jewelry photos and produce a concise resale report. \
    Respond in plain text using EXACTLY these five labeled lines, in order:\n\
    Type: <what the piece is>\n\
    Style & Era: <style and approximate era>\n\
    Materials: <materials and finishes, best guess>\n\
    Details: <notable construction details, marks, condition notes>\n\
    Estimated Resale Price: $<low> to $<high> USD\n\
    Do NOT add extra sections, markdown, or commentary outside these lines.";

/// User prompt template. Replace `{hints}` with the output of
/// [`render_hints`] before sending.
pub const APPRAISAL_PROMPT_TEMPLATE: &str = "Here is a piece of jewelry I would like to resell. \
    Please identify it and estimate a realistic resale price range.{hints}";

/// Renders the optional user-supplied hints (type guess, condition, notes)
/// as sentences appended to the prompt. Empty when nothing was supplied.
pub fn render_hints(
    jewelry_type: Option<&str>,
    condition: Option<&str>,
    notes: Option<&str>,
) -> String {
    let mut hints = String::new();
    if let Some(jewelry_type) = jewelry_type {
        hints.push_str(&format!(" I believe it is a {jewelry_type}."));
    }
    if let Some(condition) = condition {
        hints.push_str(&format!(" It is in {condition} condition."));
    }
    if let Some(notes) = notes {
        hints.push_str(&format!(" Additional notes: {notes}"));
    }
    hints
}
