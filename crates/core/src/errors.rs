use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown use case `{0}`")]
    UnknownUseCase(String),
    #[error("preferences text must not be empty")]
    EmptyPreferences,
    #[error("no recognized entity types in `{0}`")]
    InvalidEntityTypes(String),
}

impl DomainError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownUseCase(_) => {
                "Choose one of the listed use cases (run `culturehub use-cases`)."
            }
            Self::EmptyPreferences => "Share your preferences or goals to get insights.",
            Self::InvalidEntityTypes(_) => "The requested entity types are not supported.",
        }
    }
}
