use serde::{Deserialize, Serialize};

use crate::domain::use_case::UseCase;
use crate::errors::DomainError;

/// One user submission: a use case plus the free-text preferences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRequest {
    pub use_case: UseCase,
    pub free_text: String,
}

impl InsightRequest {
    pub fn new(use_case: UseCase, free_text: impl Into<String>) -> Result<Self, DomainError> {
        let free_text = free_text.into();
        if free_text.trim().is_empty() {
            return Err(DomainError::EmptyPreferences);
        }
        Ok(Self { use_case, free_text: free_text.trim().to_string() })
    }
}
