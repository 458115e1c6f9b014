use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use culturehub_core::domain::params::{
    QueryParameters, FILTER_LOCATION_QUERY, FILTER_TYPE, SIGNAL_TAGS,
};
use culturehub_core::notice::NoticeSeverity;
use culturehub_qloo::{HttpReply, QlooTransport, RecommendationClient, TransportError};

enum Scripted {
    Reply(u16, &'static str),
    Timeout,
}

/// Plays back scripted replies and records every query it receives.
struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Vec<(String, String)>>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Scripted>) -> Self {
        Self { script: Mutex::new(script.into()), calls: Mutex::new(Vec::new()) }
    }

    fn calls(&self) -> Vec<Vec<(String, String)>> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl QlooTransport for ScriptedTransport {
    async fn get(&self, query: &[(String, String)]) -> Result<HttpReply, TransportError> {
        self.calls.lock().expect("calls lock").push(query.to_vec());
        match self.script.lock().expect("script lock").pop_front() {
            Some(Scripted::Reply(status, body)) => Ok(HttpReply { status, body: body.to_string() }),
            Some(Scripted::Timeout) => Err(TransportError::Timeout("30s elapsed".to_string())),
            None => panic!("transport called more often than scripted"),
        }
    }
}

fn trip_params() -> QueryParameters {
    let mut params = QueryParameters::new();
    params.insert_text(FILTER_TYPE, "urn:entity:place,urn:entity:destination");
    params.insert_text(FILTER_LOCATION_QUERY, "New Orleans");
    params.insert_list(SIGNAL_TAGS, vec!["jazz".to_string(), "Italian".to_string()]);
    params
}

fn value_of<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
}

#[tokio::test]
async fn success_returns_results_after_one_call() {
    let client = RecommendationClient::new(
        ScriptedTransport::new(vec![Scripted::Reply(200, r#"{"results":[{"name":"Preservation Hall"}]}"#)]),
        "New York City",
        "culture",
    );

    let outcome = client.query(&trip_params()).await;

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.attempts, 1);
    assert!(!outcome.degraded);
    assert_eq!(outcome.notice, None);

    let calls = client.transport().calls();
    assert_eq!(value_of(&calls[0], SIGNAL_TAGS), Some("jazz,Italian"));
}

#[tokio::test]
async fn forbidden_then_success_uses_simplified_query() {
    let client = RecommendationClient::new(
        ScriptedTransport::new(vec![
            Scripted::Reply(403, r#"{"error":"forbidden"}"#),
            Scripted::Reply(200, r#"{"results":[{"name":"Cafe du Monde"}]}"#),
        ]),
        "New York City",
        "culture",
    );

    let outcome = client.query(&trip_params()).await;

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.attempts, 2);
    assert!(outcome.degraded);
    assert_eq!(outcome.notice.map(|notice| notice.severity), Some(NoticeSeverity::Info));

    let calls = client.transport().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(value_of(&calls[1], FILTER_TYPE), Some("urn:entity:place"));
    assert_eq!(value_of(&calls[1], FILTER_LOCATION_QUERY), Some("New Orleans"));
    assert_eq!(value_of(&calls[1], SIGNAL_TAGS), Some("jazz"));
}

#[tokio::test]
async fn forbidden_twice_stops_after_the_single_retry() {
    let client = RecommendationClient::new(
        ScriptedTransport::new(vec![Scripted::Reply(403, ""), Scripted::Reply(403, "")]),
        "New York City",
        "culture",
    );

    let outcome = client.query(&trip_params()).await;

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.attempts, 2);
    assert_eq!(client.transport().calls().len(), 2);
    let notice = outcome.notice.expect("403 after retry should be reported");
    assert_eq!(notice.severity, NoticeSeverity::Error);
    assert!(notice.message.contains("after retry"));
}

#[tokio::test]
async fn other_http_errors_are_not_retried() {
    for status in [400_u16, 401, 404, 429, 500, 503] {
        let client = RecommendationClient::new(
            ScriptedTransport::new(vec![Scripted::Reply(status, "oops")]),
            "New York City",
            "culture",
        );

        let outcome = client.query(&trip_params()).await;

        assert!(outcome.results.is_empty());
        assert_eq!(client.transport().calls().len(), 1, "status {status} must not retry");
        assert_eq!(
            outcome.notice.map(|notice| notice.severity),
            Some(NoticeSeverity::Warning)
        );
    }
}

#[tokio::test]
async fn transport_failures_degrade_to_empty_results() {
    let client = RecommendationClient::new(
        ScriptedTransport::new(vec![Scripted::Timeout]),
        "New York City",
        "culture",
    );

    let outcome = client.query(&trip_params()).await;

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.attempts, 1);
    let notice = outcome.notice.expect("timeout should be reported");
    assert!(notice.message.contains("timed out"));
}

#[tokio::test]
async fn retry_failure_other_than_403_is_a_warning() {
    let client = RecommendationClient::new(
        ScriptedTransport::new(vec![Scripted::Reply(403, ""), Scripted::Reply(502, "")]),
        "New York City",
        "culture",
    );

    let outcome = client.query(&trip_params()).await;

    assert_eq!(client.transport().calls().len(), 2);
    assert!(outcome.results.is_empty());
    assert_eq!(outcome.notice.map(|notice| notice.severity), Some(NoticeSeverity::Warning));
}

#[tokio::test]
async fn blank_parameters_are_left_off_the_wire() {
    let mut params = QueryParameters::new();
    params.insert_text(FILTER_TYPE, "urn:entity:brand");
    params.insert_text(FILTER_LOCATION_QUERY, "");
    params.insert_list(SIGNAL_TAGS, Vec::new());

    let client = RecommendationClient::new(
        ScriptedTransport::new(vec![Scripted::Reply(200, r#"{"results":[]}"#)]),
        "New York City",
        "culture",
    );
    let outcome = client.query(&params).await;

    assert!(outcome.results.is_empty());
    assert_eq!(outcome.notice, None);
    assert_eq!(
        client.transport().calls()[0],
        vec![(FILTER_TYPE.to_string(), "urn:entity:brand".to_string())]
    );
}
