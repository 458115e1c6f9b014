use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::params::{QueryParameters, FILTER_LOCATION_QUERY, FILTER_TYPE, SIGNAL_TAGS};
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCase {
    PlanTrip,
    Lifestyle,
    DiscoverContent,
    PredictAudience,
    PersonalizeProduct,
    CulturalTrends,
}

/// Immutable per-use-case default query shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UseCaseTemplate {
    pub filter_type: &'static str,
    pub includes_location: bool,
}

impl UseCase {
    pub const ALL: [UseCase; 6] = [
        Self::PlanTrip,
        Self::Lifestyle,
        Self::DiscoverContent,
        Self::PredictAudience,
        Self::PersonalizeProduct,
        Self::CulturalTrends,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PlanTrip => "Plan a Trip (Travel Itinerary)",
            Self::Lifestyle => "Lifestyle Recommendations (Dining, Fashion, etc.)",
            Self::DiscoverContent => "Discover Content (Books, Music, etc.)",
            Self::PredictAudience => "Predict Audience for a Product",
            Self::PersonalizeProduct => "Personalize a Product Experience",
            Self::CulturalTrends => "Research Cultural Trends",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::PlanTrip => "trip",
            Self::Lifestyle => "lifestyle",
            Self::DiscoverContent => "content",
            Self::PredictAudience => "audience",
            Self::PersonalizeProduct => "personalize",
            Self::CulturalTrends => "trends",
        }
    }

    /// Short name used inside prompt instructions ("For 'Plan a Trip', ...").
    pub fn short_label(self) -> &'static str {
        match self {
            Self::PlanTrip => "Plan a Trip",
            Self::Lifestyle => "Lifestyle Recommendations",
            Self::DiscoverContent => "Discover Content",
            Self::PredictAudience => "Predict Audience",
            Self::PersonalizeProduct => "Personalize a Product",
            Self::CulturalTrends => "Research Cultural Trends",
        }
    }

    pub fn is_trip(self) -> bool {
        matches!(self, Self::PlanTrip)
    }

    pub fn template(self) -> UseCaseTemplate {
        match self {
            Self::PlanTrip => UseCaseTemplate {
                filter_type: "urn:entity:place,urn:entity:destination",
                includes_location: true,
            },
            Self::Lifestyle => UseCaseTemplate {
                filter_type: "urn:entity:place,urn:entity:brand",
                includes_location: false,
            },
            Self::DiscoverContent => UseCaseTemplate {
                filter_type:
                    "urn:entity:book,urn:entity:artist,urn:entity:podcast,urn:entity:movie,urn:entity:tv_show",
                includes_location: false,
            },
            Self::PredictAudience => {
                UseCaseTemplate { filter_type: "urn:entity:person", includes_location: false }
            }
            Self::PersonalizeProduct => {
                UseCaseTemplate { filter_type: "urn:entity:brand", includes_location: false }
            }
            Self::CulturalTrends => UseCaseTemplate {
                filter_type: "urn:entity:artist,urn:entity:movie,urn:entity:tv_show",
                includes_location: false,
            },
        }
    }

    /// Fresh copy of the default parameters. Callers own the result and may mutate it freely.
    pub fn default_parameters(self) -> QueryParameters {
        let template = self.template();
        let mut params = QueryParameters::new();
        params.insert_text(FILTER_TYPE, template.filter_type);
        params.insert_list(SIGNAL_TAGS, Vec::new());
        if template.includes_location {
            params.insert_text(FILTER_LOCATION_QUERY, "");
        }
        params
    }

    pub fn default_response_format(self) -> &'static str {
        if self.is_trip() {
            "5-day itinerary with daily activities, estimated costs, and transportation"
        } else {
            "bulleted list of recommendations"
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UseCase {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|use_case| {
                use_case.label().eq_ignore_ascii_case(needle)
                    || use_case.slug().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| DomainError::UnknownUseCase(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::UseCase;
    use crate::domain::entity::validate_entity_types;
    use crate::domain::params::{FILTER_LOCATION_QUERY, FILTER_TYPE, SIGNAL_TAGS};
    use crate::errors::DomainError;

    #[test]
    fn every_default_filter_type_passes_the_allow_list() {
        for use_case in UseCase::ALL {
            let filter_type = use_case.template().filter_type;
            assert_eq!(
                validate_entity_types(filter_type).as_deref(),
                Ok(filter_type),
                "default for {use_case} must be fully valid"
            );
        }
    }

    #[test]
    fn parses_labels_and_slugs() {
        assert_eq!("Plan a Trip (Travel Itinerary)".parse::<UseCase>(), Ok(UseCase::PlanTrip));
        assert_eq!(" TRENDS ".parse::<UseCase>(), Ok(UseCase::CulturalTrends));
        assert_eq!(
            "karaoke".parse::<UseCase>(),
            Err(DomainError::UnknownUseCase("karaoke".to_string()))
        );
    }

    #[test]
    fn default_parameters_are_independent_copies() {
        let mut first = UseCase::PlanTrip.default_parameters();
        first.insert_text(FILTER_TYPE, "urn:entity:movie");
        first.insert_text(FILTER_LOCATION_QUERY, "Lisbon");

        let second = UseCase::PlanTrip.default_parameters();
        assert_eq!(second.text(FILTER_TYPE).as_deref(), Some("urn:entity:place,urn:entity:destination"));
        assert_eq!(second.text(FILTER_LOCATION_QUERY).as_deref(), Some(""));
        assert!(second.is_blank(SIGNAL_TAGS));
    }

    #[test]
    fn only_trip_template_carries_a_location_key() {
        for use_case in UseCase::ALL {
            let params = use_case.default_parameters();
            assert_eq!(params.contains(FILTER_LOCATION_QUERY), use_case.is_trip());
        }
    }
}
