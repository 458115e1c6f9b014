use std::env;
use std::sync::{Mutex, OnceLock};

use culturehub_cli::commands::{config, doctor, generate, use_cases};
use serde_json::Value;

const GEMINI_KEY: &str = "AIzaSyTestOnlyGeminiKey1234";
const QLOO_KEY: &str = "qloo-test-only-key-5678";

#[test]
fn generate_returns_config_failure_without_credentials() {
    with_env(&[], || {
        let result = generate::run("trip", "jazz and Creole food in New Orleans", false);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "generate");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn generate_rejects_unknown_use_case_before_loading_config() {
    with_env(&[], || {
        let result = generate::run("astrology", "anything", false);
        assert_eq!(result.exit_code, 3, "expected invalid input code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
        assert!(payload["message"].as_str().unwrap_or_default().contains("astrology"));
    });
}

#[test]
fn generate_rejects_blank_preferences() {
    with_env(&[("CULTUREHUB_GEMINI_API_KEY", GEMINI_KEY), ("CULTUREHUB_QLOO_API_KEY", QLOO_KEY)], || {
        let result = generate::run("lifestyle", "   ", true);
        assert_eq!(result.exit_code, 3, "expected invalid input code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
    });
}

#[test]
fn doctor_passes_with_credentials_present() {
    with_env(&[("GEMINI_API_KEY", GEMINI_KEY), ("QLOO_API_KEY", QLOO_KEY)], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["overall_status"], "pass");

        let checks = payload["checks"].as_array().expect("checks array");
        assert!(checks.iter().any(|check| check["name"] == "use_case_templates"));
    });
}

#[test]
fn doctor_reports_missing_credentials() {
    with_env(&[], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["overall_status"], "fail");
        assert_eq!(payload["checks"][0]["name"], "config_validation");
        assert_eq!(payload["checks"][0]["status"], "fail");
        assert_eq!(payload["checks"][1]["status"], "skipped");
    });
}

#[test]
fn doctor_flags_plain_http_endpoints() {
    with_env(
        &[
            ("GEMINI_API_KEY", GEMINI_KEY),
            ("QLOO_API_KEY", QLOO_KEY),
            ("CULTUREHUB_QLOO_BASE_URL", "http://localhost:8080/v2/insights/"),
        ],
        || {
            let output = doctor::run(false);
            assert!(output.contains("[fail] endpoint_security"));
            assert!(output.contains("qloo.base_url"));
        },
    );
}

#[test]
fn config_output_redacts_api_keys() {
    with_env(
        &[
            ("CULTUREHUB_GEMINI_API_KEY", GEMINI_KEY),
            ("QLOO_API_KEY", QLOO_KEY),
            ("CULTUREHUB_QLOO_FALLBACK_CITY", "Chicago"),
        ],
        || {
            let output = config::run();
            assert!(!output.contains(GEMINI_KEY));
            assert!(!output.contains(QLOO_KEY));
            assert!(output.contains("gemini.api_key = ***1234 (source: env (CULTUREHUB_GEMINI_API_KEY))"));
            assert!(output.contains("qloo.api_key = ***5678 (source: env (QLOO_API_KEY))"));
            assert!(output.contains("qloo.fallback_city = Chicago (source: env"));
            assert!(output.contains("gemini.model = gemini-2.5-pro (source: default)"));
        },
    );
}

#[test]
fn use_cases_lists_slugs() {
    let output = use_cases::run();
    assert!(output.contains("trip"));
    assert!(output.contains("Plan a Trip"));
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "GEMINI_API_KEY",
        "QLOO_API_KEY",
        "CULTUREHUB_GEMINI_API_KEY",
        "CULTUREHUB_GEMINI_MODEL",
        "CULTUREHUB_GEMINI_BASE_URL",
        "CULTUREHUB_GEMINI_TIMEOUT_SECS",
        "CULTUREHUB_QLOO_API_KEY",
        "CULTUREHUB_QLOO_BASE_URL",
        "CULTUREHUB_QLOO_TIMEOUT_SECS",
        "CULTUREHUB_QLOO_FALLBACK_CITY",
        "CULTUREHUB_QLOO_FALLBACK_TAG",
        "CULTUREHUB_LOGGING_LEVEL",
        "CULTUREHUB_LOGGING_FORMAT",
        "CULTUREHUB_LOG_LEVEL",
        "CULTUREHUB_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
