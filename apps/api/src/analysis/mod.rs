// Pitch analysis: prompt building, model reply parsing, the analyze pipeline,
// and the coaching calls built on top of stored analyses.
// All LLM calls go through llm_client::TextGenerator.

pub mod compare;
pub mod handlers;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod tips;
