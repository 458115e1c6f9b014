pub mod config;
pub mod doctor;
pub mod generate;
pub mod use_cases;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

/// JSON payload printed when a command fails. `status` lets scripts tell it apart from
/// `generate --json` report output.
#[derive(Debug, Serialize)]
struct CommandFailure {
    command: String,
    status: &'static str,
    error_class: String,
    message: String,
}

const FAILURE_STATUS: &str = "error";

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandFailure {
            command: command.to_string(),
            status: FAILURE_STATUS,
            error_class: error_class.to_string(),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandFailure) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
