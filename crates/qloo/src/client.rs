use culturehub_core::config::QlooConfig;
use culturehub_core::domain::entity::PLACE_ENTITY_TYPE;
use culturehub_core::domain::params::{
    QueryParameters, FILTER_LOCATION_QUERY, FILTER_TYPE, SIGNAL_TAGS,
};
use culturehub_core::notice::{Notice, NoticeSource};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::transport::{HttpReply, QlooTransport, ReqwestTransport, TransportError};

const FORBIDDEN: u16 = 403;

/// Result records plus how they were obtained. Never an error: failures degrade to
/// an empty result set with a notice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationOutcome {
    pub results: Vec<Value>,
    pub attempts: u8,
    pub degraded: bool,
    pub notice: Option<Notice>,
}

impl RecommendationOutcome {
    fn succeeded(results: Vec<Value>, attempts: u8, degraded: bool) -> Self {
        let notice = degraded.then(|| {
            Notice::info(
                NoticeSource::Recommendations,
                "Qloo API access was denied for the full query; showing results for simplified parameters.",
            )
        });
        Self { results, attempts, degraded, notice }
    }

    fn failed(attempts: u8, degraded: bool, notice: Notice) -> Self {
        Self { results: Vec::new(), attempts, degraded, notice: Some(notice) }
    }
}

enum Attempt {
    Results(Vec<Value>),
    Forbidden,
    Failed(String),
}

pub struct RecommendationClient<T = ReqwestTransport> {
    transport: T,
    fallback_city: String,
    fallback_tag: String,
}

impl RecommendationClient<ReqwestTransport> {
    pub fn from_config(config: &QlooConfig) -> Result<Self, TransportError> {
        Ok(Self::new(
            ReqwestTransport::from_config(config)?,
            config.fallback_city.clone(),
            config.fallback_tag.clone(),
        ))
    }
}

impl<T> RecommendationClient<T>
where
    T: QlooTransport,
{
    pub fn new(transport: T, fallback_city: impl Into<String>, fallback_tag: impl Into<String>) -> Self {
        Self { transport, fallback_city: fallback_city.into(), fallback_tag: fallback_tag.into() }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Queries the insights endpoint. A 403 on the first attempt triggers exactly one
    /// retry with [`Self::simplified_parameters`]; nothing else is retried.
    pub async fn query(&self, params: &QueryParameters) -> RecommendationOutcome {
        let mut params = params.clone();
        params.normalize_lists();

        match self.attempt(&params, 1).await {
            Attempt::Results(results) => RecommendationOutcome::succeeded(results, 1, false),
            Attempt::Failed(reason) => RecommendationOutcome::failed(
                1,
                false,
                Notice::warning(
                    NoticeSource::Recommendations,
                    format!("Qloo API error: {reason}. Using fallback data."),
                ),
            ),
            Attempt::Forbidden => {
                let simplified = self.simplified_parameters(&params);
                warn!(
                    event_name = "insight.query.degraded_retry",
                    filter_type = PLACE_ENTITY_TYPE,
                    "qloo access denied, retrying with simplified parameters"
                );

                match self.attempt(&simplified, 2).await {
                    Attempt::Results(results) => RecommendationOutcome::succeeded(results, 2, true),
                    Attempt::Forbidden => RecommendationOutcome::failed(
                        2,
                        true,
                        Notice::error(
                            NoticeSource::Recommendations,
                            "Qloo API access denied (403) after retry. Please check the API key. Using fallback data.",
                        ),
                    ),
                    Attempt::Failed(reason) => RecommendationOutcome::failed(
                        2,
                        true,
                        Notice::warning(
                            NoticeSource::Recommendations,
                            format!("Qloo API error: {reason}. Using fallback data."),
                        ),
                    ),
                }
            }
        }
    }

    /// Minimal query used after an authorization failure: places only, one tag.
    pub fn simplified_parameters(&self, params: &QueryParameters) -> QueryParameters {
        let location = params
            .non_blank_text(FILTER_LOCATION_QUERY)
            .unwrap_or_else(|| self.fallback_city.clone());
        let tag = params
            .non_blank_text(SIGNAL_TAGS)
            .and_then(|tags| tags.split(',').map(str::trim).find(|tag| !tag.is_empty()).map(str::to_string))
            .unwrap_or_else(|| self.fallback_tag.clone());

        let mut simplified = QueryParameters::new();
        simplified.insert_text(FILTER_TYPE, PLACE_ENTITY_TYPE);
        simplified.insert_text(FILTER_LOCATION_QUERY, location);
        simplified.insert_text(SIGNAL_TAGS, tag);
        simplified
    }

    async fn attempt(&self, params: &QueryParameters, attempt: u8) -> Attempt {
        let query = params.to_query_pairs();
        let reply = match self.transport.get(&query).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(
                    event_name = "insight.query.transport_failed",
                    attempt,
                    error = %error,
                    "qloo request failed"
                );
                return Attempt::Failed(error.to_string());
            }
        };

        if reply.status == FORBIDDEN {
            warn!(event_name = "insight.query.forbidden", attempt, "qloo returned 403");
            return Attempt::Forbidden;
        }

        if !reply.is_success() {
            warn!(
                event_name = "insight.query.http_error",
                attempt,
                status = reply.status,
                "qloo returned an error status"
            );
            return Attempt::Failed(format!("HTTP {}", reply.status));
        }

        match parse_results(&reply) {
            Ok(results) => {
                info!(
                    event_name = "insight.query.completed",
                    attempt,
                    result_count = results.len(),
                    "qloo results received"
                );
                Attempt::Results(results)
            }
            Err(error) => {
                warn!(
                    event_name = "insight.query.invalid_body",
                    attempt,
                    error = %error,
                    "qloo body is not valid json"
                );
                Attempt::Failed(format!("invalid response body: {error}"))
            }
        }
    }
}

/// Accepts `results` as an array, or as an object wrapping an `entities` array.
fn parse_results(reply: &HttpReply) -> Result<Vec<Value>, serde_json::Error> {
    let body: Value = serde_json::from_str(&reply.body)?;
    let results = match body.get("results") {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(map)) => match map.get("entities") {
            Some(Value::Array(entities)) => entities.clone(),
            _ => vec![Value::Object(map.clone())],
        },
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other.clone()],
    };
    Ok(results)
}

#[cfg(test)]
mod tests {
    use culturehub_core::domain::params::{
        QueryParameters, FILTER_LOCATION_QUERY, FILTER_TYPE, SIGNAL_TAGS,
    };

    use super::{parse_results, RecommendationClient};
    use crate::transport::{HttpReply, QlooTransport, TransportError};

    struct Unreachable;

    #[async_trait::async_trait]
    impl QlooTransport for Unreachable {
        async fn get(&self, _query: &[(String, String)]) -> Result<HttpReply, TransportError> {
            Err(TransportError::Connect("unreachable".to_string()))
        }
    }

    fn client() -> RecommendationClient<Unreachable> {
        RecommendationClient::new(Unreachable, "New York City", "culture")
    }

    #[test]
    fn simplified_parameters_keep_location_and_first_tag() {
        let mut params = QueryParameters::new();
        params.insert_text(FILTER_TYPE, "urn:entity:place,urn:entity:destination");
        params.insert_text(FILTER_LOCATION_QUERY, "New Orleans");
        params.insert_text(SIGNAL_TAGS, "jazz,Italian");
        params.insert_text("take", "20");

        let simplified = client().simplified_parameters(&params);

        assert_eq!(simplified.len(), 3);
        assert_eq!(simplified.text(FILTER_TYPE).as_deref(), Some("urn:entity:place"));
        assert_eq!(simplified.text(FILTER_LOCATION_QUERY).as_deref(), Some("New Orleans"));
        assert_eq!(simplified.text(SIGNAL_TAGS).as_deref(), Some("jazz"));
    }

    #[test]
    fn simplified_parameters_fill_in_fallbacks() {
        let mut params = QueryParameters::new();
        params.insert_text(FILTER_TYPE, "urn:entity:book");
        params.insert_text(FILTER_LOCATION_QUERY, "");
        params.insert_text(SIGNAL_TAGS, "");

        let simplified = client().simplified_parameters(&params);

        assert_eq!(simplified.text(FILTER_LOCATION_QUERY).as_deref(), Some("New York City"));
        assert_eq!(simplified.text(SIGNAL_TAGS).as_deref(), Some("culture"));
    }

    #[test]
    fn results_are_read_from_array_or_entities() {
        let array = HttpReply { status: 200, body: r#"{"results":[{"name":"A"}]}"#.to_string() };
        assert_eq!(parse_results(&array).map(|items| items.len()).ok(), Some(1));

        let wrapped = HttpReply {
            status: 200,
            body: r#"{"success":true,"results":{"entities":[{"name":"A"},{"name":"B"}]}}"#
                .to_string(),
        };
        assert_eq!(parse_results(&wrapped).map(|items| items.len()).ok(), Some(2));

        let missing = HttpReply { status: 200, body: r#"{"success":true}"#.to_string() };
        assert_eq!(parse_results(&missing).map(|items| items.len()).ok(), Some(0));

        let broken = HttpReply { status: 200, body: "<html>".to_string() };
        assert!(parse_results(&broken).is_err());
    }
}
