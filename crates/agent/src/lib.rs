//! Insight generation: the language-model half of CultureHub.
//!
//! A submission flows through a fixed sequence:
//! 1. **Parse** (`intent`) - free text to a structured [`culturehub_core::AgentOutput`]
//! 2. **Build** - [`culturehub_core::QueryBuilder`] merges it over the use-case defaults
//! 3. **Query** - [`culturehub_qloo::RecommendationClient`] fetches recommendations
//! 4. **Narrate** (`narrate`) - results to a human-readable report
//!
//! Every stage degrades instead of failing: a bad model answer falls back to defaults,
//! a failed query yields no results, and a failed narration yields a fixed sentence.
//! [`runtime::InsightRuntime::generate`] therefore always returns a report.

pub mod intent;
pub mod llm;
pub mod narrate;
pub mod prompts;
pub mod runtime;

pub use llm::{GeminiClient, LlmClient};
pub use runtime::{InsightReport, InsightRuntime};
