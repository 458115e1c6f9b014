use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use culturehub_core::config::{resolve_config_path, AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

struct Field<'a> {
    key_path: &'static str,
    value: String,
    env_keys: &'a [&'static str],
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions { load_dotenv: true, ..LoadOptions::default() })
    {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        Field {
            key_path: "gemini.api_key",
            value: redact_secret(config.gemini.api_key.expose_secret()),
            env_keys: &["CULTUREHUB_GEMINI_API_KEY", "GEMINI_API_KEY"],
        },
        Field {
            key_path: "gemini.model",
            value: config.gemini.model.clone(),
            env_keys: &["CULTUREHUB_GEMINI_MODEL"],
        },
        Field {
            key_path: "gemini.base_url",
            value: config.gemini.base_url.clone(),
            env_keys: &["CULTUREHUB_GEMINI_BASE_URL"],
        },
        Field {
            key_path: "gemini.timeout_secs",
            value: config.gemini.timeout_secs.to_string(),
            env_keys: &["CULTUREHUB_GEMINI_TIMEOUT_SECS"],
        },
        Field {
            key_path: "qloo.api_key",
            value: redact_secret(config.qloo.api_key.expose_secret()),
            env_keys: &["CULTUREHUB_QLOO_API_KEY", "QLOO_API_KEY"],
        },
        Field {
            key_path: "qloo.base_url",
            value: config.qloo.base_url.clone(),
            env_keys: &["CULTUREHUB_QLOO_BASE_URL"],
        },
        Field {
            key_path: "qloo.timeout_secs",
            value: config.qloo.timeout_secs.to_string(),
            env_keys: &["CULTUREHUB_QLOO_TIMEOUT_SECS"],
        },
        Field {
            key_path: "qloo.fallback_city",
            value: config.qloo.fallback_city.clone(),
            env_keys: &["CULTUREHUB_QLOO_FALLBACK_CITY"],
        },
        Field {
            key_path: "qloo.fallback_tag",
            value: config.qloo.fallback_tag.clone(),
            env_keys: &["CULTUREHUB_QLOO_FALLBACK_TAG"],
        },
        Field {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["CULTUREHUB_LOGGING_LEVEL", "CULTUREHUB_LOG_LEVEL"],
        },
        Field {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["CULTUREHUB_LOGGING_FORMAT", "CULTUREHUB_LOG_FORMAT"],
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.iter().map(|field| {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        render_line(field.key_path, &field.value, source)
    }));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|env_key| env::var_os(env_key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Shows at most the last four characters of a secret.
fn redact_secret(secret: &str) -> String {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let chars = trimmed.chars().collect::<Vec<_>>();
    if chars.len() <= 8 {
        return "<redacted>".to_string();
    }

    let suffix = chars[chars.len() - 4..].iter().collect::<String>();
    format!("***{suffix}")
}

#[cfg(test)]
mod tests {
    use toml::Value;

    use super::{contains_path, redact_secret};

    #[test]
    fn short_secrets_are_fully_hidden() {
        assert_eq!(redact_secret(""), "<empty>");
        assert_eq!(redact_secret("abc123"), "<redacted>");
    }

    #[test]
    fn long_secrets_keep_a_short_suffix() {
        assert_eq!(redact_secret("AIzaSyExampleKey9876"), "***9876");
    }

    #[test]
    fn nested_paths_are_detected_in_toml() {
        let doc = "[qloo]\nfallback_city = \"Paris\"\n".parse::<Value>().expect("toml fixture");
        assert!(contains_path(&doc, "qloo.fallback_city"));
        assert!(!contains_path(&doc, "qloo.base_url"));
        assert!(!contains_path(&doc, "gemini.model"));
    }
}
