use culturehub_core::notice::{Notice, NoticeSource};
use tracing::{error, info};

use crate::llm::LlmClient;
use crate::prompts::{narrate_prompt, NarrationInput};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Narration {
    pub text: String,
    pub notice: Option<Notice>,
}

impl Narration {
    pub fn is_fallback(&self) -> bool {
        self.notice.is_some()
    }
}

/// Narrate stage: renders results into the final report text. Never returns empty text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Narrator;

impl Narrator {
    pub fn new() -> Self {
        Self
    }

    pub async fn narrate<L>(
        &self,
        llm: &L,
        input: &NarrationInput<'_>,
        correlation_id: &str,
    ) -> Narration
    where
        L: LlmClient + ?Sized,
    {
        let prompt = narrate_prompt(input);
        let failure = match llm.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(
                    event_name = "insight.narrate.completed",
                    correlation_id,
                    narrative_len = text.len(),
                    "narrative generated"
                );
                return Narration { text, notice: None };
            }
            Ok(_) => "model returned an empty response".to_string(),
            Err(error) => error.to_string(),
        };

        error!(
            event_name = "insight.narrate.fallback",
            correlation_id,
            error = %failure,
            "using fallback narrative"
        );
        Narration {
            text: fallback_narrative(input),
            notice: Some(Notice::error(
                NoticeSource::Narrate,
                format!("Error generating response: {failure}"),
            )),
        }
    }
}

pub fn fallback_narrative(input: &NarrationInput<'_>) -> String {
    format!(
        "Based on your preferences '{}', we suggest exploring options in {} for {}.",
        input.free_text,
        input.location,
        input.use_case.label().to_lowercase()
    )
}
