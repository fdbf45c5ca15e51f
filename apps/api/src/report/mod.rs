// Report generation and normalization.
// Pipeline: prompt → vision LLM call → price normalization → field
// extraction. All LLM calls go through llm_client — no direct API calls here.

pub mod fields;
pub mod generator;
pub mod handlers;
pub mod images;
pub mod price;
pub mod prompts;
