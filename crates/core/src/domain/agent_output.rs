use serde::{Deserialize, Serialize};

use crate::domain::params::{QueryParameters, FILTER_LOCATION_QUERY};
use crate::domain::use_case::UseCase;

pub const MAX_PREFERENCE_TAGS: usize = 2;
pub const FALLBACK_PREFERENCES: [&str; 2] = ["culture", "history"];

/// Structured intent extracted from the user's free text by the parse stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub preferences: Vec<String>,
    pub qloo_params: QueryParameters,
    pub response_format: String,
}

impl AgentOutput {
    /// Substitute used when the model's answer cannot be parsed.
    pub fn fallback(use_case: UseCase, fallback_city: &str) -> Self {
        let mut qloo_params = use_case.default_parameters();
        let location = if use_case.is_trip() { fallback_city } else { "" };
        qloo_params.insert_text(FILTER_LOCATION_QUERY, location);

        Self {
            preferences: FALLBACK_PREFERENCES.iter().map(|value| value.to_string()).collect(),
            qloo_params,
            response_format: use_case.default_response_format().to_string(),
        }
    }

    /// The first two non-blank preferences, trimmed and comma-joined. Blank entries are
    /// skipped so they never produce an empty tag on the wire.
    pub fn preference_tags(&self) -> Option<String> {
        let tags = self
            .preferences
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .take(MAX_PREFERENCE_TAGS)
            .collect::<Vec<_>>();

        (!tags.is_empty()).then(|| tags.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::AgentOutput;
    use crate::domain::params::{FILTER_LOCATION_QUERY, FILTER_TYPE};
    use crate::domain::use_case::UseCase;

    #[test]
    fn fallback_for_trip_uses_fallback_city() {
        let output = AgentOutput::fallback(UseCase::PlanTrip, "New York City");

        assert_eq!(output.preferences, vec!["culture", "history"]);
        assert_eq!(
            output.qloo_params.text(FILTER_LOCATION_QUERY).as_deref(),
            Some("New York City")
        );
        assert_eq!(
            output.response_format,
            "5-day itinerary with daily activities, estimated costs, and transportation"
        );
    }

    #[test]
    fn fallback_for_other_use_cases_has_empty_location() {
        let output = AgentOutput::fallback(UseCase::DiscoverContent, "New York City");

        assert_eq!(output.qloo_params.text(FILTER_LOCATION_QUERY).as_deref(), Some(""));
        assert_eq!(
            output.qloo_params.text(FILTER_TYPE).as_deref(),
            Some(UseCase::DiscoverContent.template().filter_type)
        );
        assert_eq!(output.response_format, "bulleted list of recommendations");
    }

    #[test]
    fn preference_tags_take_at_most_two_in_order() {
        let output = AgentOutput {
            preferences: vec!["jazz".into(), "Italian".into(), "architecture".into()],
            ..AgentOutput::fallback(UseCase::Lifestyle, "New York City")
        };
        assert_eq!(output.preference_tags().as_deref(), Some("jazz,Italian"));

        let empty = AgentOutput { preferences: Vec::new(), ..output };
        assert_eq!(empty.preference_tags(), None);
    }

    #[test]
    fn preference_tags_skip_blank_entries() {
        let output = AgentOutput {
            preferences: vec!["".into(), " jazz ".into(), "  ".into(), "blues".into(), "soul".into()],
            ..AgentOutput::fallback(UseCase::Lifestyle, "New York City")
        };
        assert_eq!(output.preference_tags().as_deref(), Some("jazz,blues"));

        let blank_only = AgentOutput { preferences: vec!["".into(), " ".into()], ..output };
        assert_eq!(blank_only.preference_tags(), None);
    }

    #[test]
    fn parses_the_three_field_model_shape() {
        let output: AgentOutput = serde_json::from_str(
            r#"{
                "preferences": ["adventure", "history"],
                "qloo_params": {
                    "filter.type": "urn:entity:place,urn:entity:destination",
                    "filter.location.query": "New York City",
                    "signal.interests.tags": "adventure,history"
                },
                "response_format": "5-day itinerary"
            }"#,
        )
        .expect("model shape should parse");

        assert_eq!(output.qloo_params.len(), 3);
        assert_eq!(output.response_format, "5-day itinerary");
    }
}
