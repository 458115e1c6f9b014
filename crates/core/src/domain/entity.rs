use crate::errors::DomainError;

/// Entity types accepted by the recommendation provider's `filter.type` parameter.
pub const VALID_ENTITY_TYPES: [&str; 10] = [
    "urn:entity:artist",
    "urn:entity:book",
    "urn:entity:brand",
    "urn:entity:destination",
    "urn:entity:movie",
    "urn:entity:person",
    "urn:entity:place",
    "urn:entity:podcast",
    "urn:entity:tv_show",
    "urn:entity:video_game",
];

pub const PLACE_ENTITY_TYPE: &str = "urn:entity:place";

pub fn is_valid_entity_type(candidate: &str) -> bool {
    VALID_ENTITY_TYPES.contains(&candidate)
}

/// Keeps the allow-listed tokens of a comma-joined type string, in their original order.
///
/// Duplicates are kept as given. Surrounding whitespace around each token is ignored.
pub fn validate_entity_types(candidate: &str) -> Result<String, DomainError> {
    let retained = candidate
        .split(',')
        .map(str::trim)
        .filter(|token| is_valid_entity_type(token))
        .collect::<Vec<_>>();

    if retained.is_empty() {
        return Err(DomainError::InvalidEntityTypes(candidate.to_string()));
    }

    Ok(retained.join(","))
}

#[cfg(test)]
mod tests {
    use super::{validate_entity_types, VALID_ENTITY_TYPES};
    use crate::errors::DomainError;

    #[test]
    fn drops_unknown_tokens_and_keeps_order() {
        let validated =
            validate_entity_types("urn:entity:movie,urn:entity:tag,urn:entity:book").expect("valid");
        assert_eq!(validated, "urn:entity:movie,urn:entity:book");
    }

    #[test]
    fn keeps_duplicates_as_given() {
        let validated =
            validate_entity_types("urn:entity:place,urn:entity:place").expect("valid");
        assert_eq!(validated, "urn:entity:place,urn:entity:place");
    }

    #[test]
    fn tolerates_spaces_after_commas() {
        let validated =
            validate_entity_types("urn:entity:place, urn:entity:brand").expect("valid");
        assert_eq!(validated, "urn:entity:place,urn:entity:brand");
    }

    #[test]
    fn signals_invalid_when_nothing_survives() {
        for candidate in ["", "urn:entity:tag", "restaurant,hotel", ",,"] {
            assert_eq!(
                validate_entity_types(candidate),
                Err(DomainError::InvalidEntityTypes(candidate.to_string()))
            );
        }
    }

    #[test]
    fn accepts_the_full_allow_list() {
        let all = VALID_ENTITY_TYPES.join(",");
        assert_eq!(validate_entity_types(&all).as_deref(), Ok(all.as_str()));
    }
}
