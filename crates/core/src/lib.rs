pub mod config;
pub mod domain;
pub mod errors;
pub mod notice;
pub mod query;
pub mod report;

pub use domain::agent_output::AgentOutput;
pub use domain::entity::{validate_entity_types, VALID_ENTITY_TYPES};
pub use domain::params::{ParamValue, QueryParameters};
pub use domain::request::InsightRequest;
pub use domain::use_case::UseCase;
pub use errors::DomainError;
pub use notice::{Notice, NoticeSeverity, NoticeSource};
pub use query::{BuiltQuery, QueryBuilder, QueryCorrection};
pub use report::{split_itinerary, DaySection};
