//! Query construction: use-case defaults, model overrides, then validation.
//!
//! The returned parameters always carry a non-empty, allow-listed `filter.type`, and both
//! `filter.type` and `signal.interests.tags` are comma-joined text rather than lists.

use serde::Serialize;

use crate::domain::agent_output::AgentOutput;
use crate::domain::entity::validate_entity_types;
use crate::domain::params::{QueryParameters, FILTER_TYPE, SIGNAL_TAGS};
use crate::domain::use_case::UseCase;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryCorrection {
    TagsFromPreferences { tags: String },
    FilterTypePruned { requested: String, kept: String },
    FilterTypeReset { requested: String, default: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuiltQuery {
    pub parameters: QueryParameters,
    pub corrections: Vec<QueryCorrection>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, use_case: UseCase, agent_output: &AgentOutput) -> BuiltQuery {
        let mut corrections = Vec::new();
        let mut parameters = use_case.default_parameters();
        parameters.overlay(&agent_output.qloo_params);

        if parameters.is_blank(SIGNAL_TAGS) {
            if let Some(tags) = agent_output.preference_tags() {
                parameters.insert_text(SIGNAL_TAGS, tags.clone());
                corrections.push(QueryCorrection::TagsFromPreferences { tags });
            }
        }

        let requested = parameters.text(FILTER_TYPE).unwrap_or_default();
        match validate_entity_types(&requested) {
            Ok(kept) => {
                if kept != requested {
                    corrections.push(QueryCorrection::FilterTypePruned {
                        requested: requested.clone(),
                        kept: kept.clone(),
                    });
                }
                parameters.insert_text(FILTER_TYPE, kept);
            }
            Err(_) => {
                let default = use_case.template().filter_type.to_string();
                corrections.push(QueryCorrection::FilterTypeReset {
                    requested,
                    default: default.clone(),
                });
                parameters.insert_text(FILTER_TYPE, default);
            }
        }

        parameters.normalize_lists();
        BuiltQuery { parameters, corrections }
    }
}
