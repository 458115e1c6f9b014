//! Prompt templates for the two generation stages.

use culturehub_core::domain::entity::VALID_ENTITY_TYPES;
use culturehub_core::UseCase;
use serde_json::Value;

/// Instruction asking the model to turn free text into a fenced JSON block with
/// `preferences`, `qloo_params` and `response_format`.
pub fn parse_prompt(use_case: UseCase, free_text: &str) -> String {
    let type_rules = UseCase::ALL
        .iter()
        .map(|candidate| {
            let template = candidate.template();
            let location_hint = if template.includes_location {
                " and include filter.location.query (specific city, e.g., 'New York City' if 'USA' is input)"
            } else {
                ""
            };
            format!(
                "           - For '{}', use filter.type={}{}.",
                candidate.short_label(),
                template.filter_type,
                location_hint
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
        You are an intelligent cultural recommendation agent for Qloo's Taste AI API. The user selected the use case: "{use_case}".
        Their input is: "{free_text}".

        Instructions:
        1. Extract key preferences (e.g., music genres, cuisines, locations, product ideas).
        2. Determine Qloo API parameters based on the use case:
{type_rules}
        3. Suggest up to 2 specific tags for signal.interests.tags (e.g., 'jazz', 'Italian'). Avoid location-specific tags like 'French Quarter'.
        4. Ensure filter.type is a comma-separated string of valid types: {valid_types}.
        5. Ensure signal.interests.tags is a comma-separated string.
        6. Specify a response format (e.g., '5-day itinerary with daily activities, estimated costs, and transportation', 'bulleted list', 'audience profile').
        7. Output valid JSON with no extra text, comments, or trailing commas.

        Return:
        ```json
        {{
            "preferences": ["key1", "key2"],
            "qloo_params": {{
                "filter.type": "urn:entity:type1,urn:entity:type2",
                "filter.location.query": "specific city",
                "signal.interests.tags": "tag1,tag2"
            }},
            "response_format": "format description"
        }}
        ```

        Example for input "Plan a 5-day trip to USA" and use case "Plan a Trip":
        ```json
        {{
            "preferences": ["adventure", "history"],
            "qloo_params": {{
                "filter.type": "urn:entity:place,urn:entity:destination",
                "filter.location.query": "New York City",
                "signal.interests.tags": "adventure,history"
            }},
            "response_format": "5-day itinerary with daily activities, estimated costs, and transportation"
        }}
        ```
        "#,
        use_case = use_case.label(),
        valid_types = VALID_ENTITY_TYPES.join(", "),
    )
}

/// Everything the narrate stage embeds in its prompt.
#[derive(Clone, Copy, Debug)]
pub struct NarrationInput<'a> {
    pub use_case: UseCase,
    pub free_text: &'a str,
    pub results: &'a [Value],
    pub response_format: &'a str,
    pub preferences: &'a [String],
    pub location: &'a str,
}

pub fn narrate_prompt(input: &NarrationInput<'_>) -> String {
    let preferences = format!("{:?}", input.preferences);
    let data_section = if input.results.is_empty() {
        format!(
            "No Qloo API data was returned for this request. Provide a fallback response based on preferences {preferences} and location {}.",
            input.location
        )
    } else {
        let serialized =
            serde_json::to_string_pretty(input.results).unwrap_or_else(|_| "[]".to_string());
        format!("Qloo API data:\n{serialized}")
    };

    let format_rule = if input.use_case.is_trip() {
        "- Format as a 5-day itinerary with daily activities, estimated costs, and transportation (e.g., walking, subway). Start each day with a bold heading of the form **Day N:** (Day 1 through Day 5)."
    } else {
        "- Use a bulleted list or another format that suits the use case (e.g., audience profile)."
    };

    format!(
        r#"
        You are a cultural insights expert. Based on the use case "{use_case}" and user preferences "{free_text}".

        {data_section}

        Generate a response in the format: {response_format}.

        Instructions:
        - Highlight affinity scores (0-100, >80 is very high, 60-80 is high, <50 is low).
        - Make it engaging, concise, and culturally insightful.
        - Emphasize Qloo's privacy-first Taste AI for ethical personalization; no personal data is required.
        - If Qloo data is empty, provide a fallback response based on preferences {preferences} and location {location}.
        {format_rule}
        "#,
        use_case = input.use_case.label(),
        free_text = input.free_text,
        response_format = input.response_format,
        location = input.location,
    )
}
