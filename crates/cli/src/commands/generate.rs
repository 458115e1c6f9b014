use culturehub_agent::InsightRuntime;
use culturehub_core::config::{AppConfig, LoadOptions};
use culturehub_core::{InsightRequest, UseCase};

use crate::commands::CommandResult;
use crate::init_logging;
use crate::render::render_report;

const COMMAND: &str = "generate";

pub fn run(use_case: &str, input: &str, json_output: bool) -> CommandResult {
    let request = match use_case
        .parse::<UseCase>()
        .and_then(|use_case| InsightRequest::new(use_case, input))
    {
        Ok(request) => request,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "invalid_input",
                format!("{error}. {}", error.user_message()),
                3,
            );
        }
    };

    let config = match AppConfig::load(LoadOptions { load_dotenv: true, ..LoadOptions::default() })
    {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config_validation", error.to_string(), 2);
        }
    };
    init_logging(&config);

    let insight_runtime = match InsightRuntime::from_config(&config) {
        Ok(insight_runtime) => insight_runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime_init",
                format!("failed to initialize clients: {error:#}"),
                4,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                4,
            );
        }
    };

    let report = runtime.block_on(insight_runtime.generate(&request));

    if json_output {
        return match serde_json::to_string_pretty(&report) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure(
                COMMAND,
                "serialization",
                format!("report serialization failed: {error}"),
                1,
            ),
        };
    }

    CommandResult { exit_code: 0, output: render_report(&report) }
}
