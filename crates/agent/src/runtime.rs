use culturehub_core::domain::params::FILTER_LOCATION_QUERY;
use culturehub_core::notice::{Notice, NoticeSource};
use culturehub_core::{
    split_itinerary, AgentOutput, DaySection, InsightRequest, QueryBuilder, QueryCorrection,
    QueryParameters, UseCase,
};
use culturehub_qloo::{QlooTransport, RecommendationClient, ReqwestTransport};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::intent::IntentParser;
use crate::llm::{GeminiClient, LlmClient};
use crate::narrate::Narrator;
use crate::prompts::NarrationInput;

/// Everything produced by one submission, ready for display.
#[derive(Clone, Debug, Serialize)]
pub struct InsightReport {
    pub correlation_id: String,
    pub use_case: UseCase,
    pub free_text: String,
    pub agent_output: AgentOutput,
    pub used_default_intent: bool,
    pub query: QueryParameters,
    pub corrections: Vec<QueryCorrection>,
    pub results: Vec<Value>,
    pub recommendation_attempts: u8,
    pub location: String,
    pub narrative: String,
    pub notices: Vec<Notice>,
}

impl InsightReport {
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Query location, or the fallback city when the query had none.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The five itinerary sections, for the trip-planning use case only.
    pub fn day_sections(&self) -> Option<Vec<DaySection>> {
        self.use_case.is_trip().then(|| split_itinerary(&self.narrative, &self.location))
    }
}

/// Runs parse, build, query and narrate in sequence for one request.
pub struct InsightRuntime<L, T = ReqwestTransport> {
    llm: L,
    recommendations: RecommendationClient<T>,
    parser: IntentParser,
    builder: QueryBuilder,
    narrator: Narrator,
    fallback_city: String,
}

impl InsightRuntime<GeminiClient, ReqwestTransport> {
    pub fn from_config(config: &culturehub_core::config::AppConfig) -> anyhow::Result<Self> {
        let llm = GeminiClient::from_config(&config.gemini)?;
        let recommendations = RecommendationClient::from_config(&config.qloo)?;
        Ok(Self::new(llm, recommendations, config.qloo.fallback_city.clone()))
    }
}

impl<L, T> InsightRuntime<L, T>
where
    L: LlmClient,
    T: QlooTransport,
{
    pub fn new(
        llm: L,
        recommendations: RecommendationClient<T>,
        fallback_city: impl Into<String>,
    ) -> Self {
        let fallback_city = fallback_city.into();
        Self {
            llm,
            recommendations,
            parser: IntentParser::new(fallback_city.clone()),
            builder: QueryBuilder::new(),
            narrator: Narrator::new(),
            fallback_city,
        }
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    pub fn recommendations(&self) -> &RecommendationClient<T> {
        &self.recommendations
    }

    pub async fn generate(&self, request: &InsightRequest) -> InsightReport {
        let correlation_id = Uuid::new_v4().to_string();
        let correlation_id = correlation_id.as_str();
        let mut notices = Vec::new();

        info!(
            event_name = "insight.request.started",
            correlation_id,
            use_case = request.use_case.slug(),
            input_len = request.free_text.len(),
            "generating insights"
        );

        let parsed =
            self.parser.parse(&self.llm, request.use_case, &request.free_text, correlation_id).await;
        let used_default_intent = parsed.failure.is_some();
        if let Some(failure) = &parsed.failure {
            notices.push(Notice::warning(
                NoticeSource::Parse,
                format!("Error parsing model response: {failure}. Using default parameters."),
            ));
        }
        let agent_output = parsed.output;

        let built = self.builder.build(request.use_case, &agent_output);
        for correction in &built.corrections {
            debug!(event_name = "insight.query.corrected", correlation_id, ?correction, "query corrected");
        }
        let location = built
            .parameters
            .non_blank_text(FILTER_LOCATION_QUERY)
            .unwrap_or_else(|| self.fallback_city.clone());

        let outcome = self.recommendations.query(&built.parameters).await;
        notices.extend(outcome.notice.clone());

        let narration = self
            .narrator
            .narrate(
                &self.llm,
                &NarrationInput {
                    use_case: request.use_case,
                    free_text: &request.free_text,
                    results: &outcome.results,
                    response_format: &agent_output.response_format,
                    preferences: &agent_output.preferences,
                    location: &location,
                },
                correlation_id,
            )
            .await;
        notices.extend(narration.notice);

        info!(
            event_name = "insight.request.completed",
            correlation_id,
            result_count = outcome.results.len(),
            attempts = outcome.attempts,
            notice_count = notices.len(),
            "insights generated"
        );

        InsightReport {
            correlation_id: correlation_id.to_string(),
            use_case: request.use_case,
            free_text: request.free_text.clone(),
            agent_output,
            used_default_intent,
            query: built.parameters,
            corrections: built.corrections,
            results: outcome.results,
            recommendation_attempts: outcome.attempts,
            location,
            narrative: narration.text,
            notices,
        }
    }
}
