pub mod agent_output;
pub mod entity;
pub mod params;
pub mod request;
pub mod use_case;
