// Résumé vs job description gap analysis.
// Implements: input encoding, prompt + schema, the AI call, strict verdict decoding.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod analyzer;
pub mod encoder;
pub mod handlers;
pub mod models;
pub mod prompts;
