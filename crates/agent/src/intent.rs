use culturehub_core::{AgentOutput, UseCase};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm::LlmClient;
use crate::prompts::parse_prompt;

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("no valid JSON block found in model response")]
    MissingJsonBlock,
    #[error("JSON block is not a valid agent output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct ParseOutcome {
    pub output: AgentOutput,
    /// Set when the default output was substituted.
    pub failure: Option<ParseFailure>,
}

/// Parse stage: free text to [`AgentOutput`], falling back to the use-case default.
#[derive(Clone, Debug)]
pub struct IntentParser {
    fallback_city: String,
}

impl IntentParser {
    pub fn new(fallback_city: impl Into<String>) -> Self {
        Self { fallback_city: fallback_city.into() }
    }

    pub async fn parse<L>(
        &self,
        llm: &L,
        use_case: UseCase,
        free_text: &str,
        correlation_id: &str,
    ) -> ParseOutcome
    where
        L: LlmClient + ?Sized,
    {
        let prompt = parse_prompt(use_case, free_text);
        let result = match llm.complete(&prompt).await {
            Ok(response) => extract_agent_output(&response),
            Err(error) => Err(ParseFailure::Generation(error.to_string())),
        };

        match result {
            Ok(output) => {
                info!(
                    event_name = "insight.parse.completed",
                    correlation_id,
                    preference_count = output.preferences.len(),
                    param_count = output.qloo_params.len(),
                    "model intent parsed"
                );
                ParseOutcome { output, failure: None }
            }
            Err(failure) => {
                warn!(
                    event_name = "insight.parse.fallback",
                    correlation_id,
                    error = %failure,
                    "using default agent output"
                );
                ParseOutcome {
                    output: AgentOutput::fallback(use_case, &self.fallback_city),
                    failure: Some(failure),
                }
            }
        }
    }
}

/// Parses the first ```` ```json ```` fenced block of a model response.
pub fn extract_agent_output(response: &str) -> Result<AgentOutput, ParseFailure> {
    let block = first_json_block(response).ok_or(ParseFailure::MissingJsonBlock)?;
    Ok(serde_json::from_str(block)?)
}

fn first_json_block(text: &str) -> Option<&str> {
    const OPENING: &str = "```json";
    const CLOSING: &str = "```";

    let start = text.find(OPENING)? + OPENING.len();
    let after_tag = &text[start..];
    let body_start = after_tag.find('\n')? + 1;
    if !after_tag[..body_start].trim().is_empty() {
        return None;
    }

    let body = &after_tag[body_start..];
    let end = body.find(CLOSING)?;
    Some(body[..end].trim())
}
