use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "culturehub.toml";
pub const NESTED_CONFIG_FILE: &str = "config/culturehub.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub qloo: QlooConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct QlooConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub timeout_secs: u64,
    pub fallback_city: String,
    pub fallback_tag: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub qloo_api_key: Option<String>,
    pub qloo_base_url: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub load_dotenv: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig {
                api_key: String::new().into(),
                model: "gemini-2.5-pro".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                timeout_secs: 60,
            },
            qloo: QlooConfig {
                api_key: String::new().into(),
                base_url: "https://hackathon.api.qloo.com/v2/insights/".to_string(),
                timeout_secs: 30,
                fallback_city: "New York City".to_string(),
                fallback_tag: "culture".to_string(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        if options.load_dotenv {
            // A missing .env is normal outside local development.
            let _ = dotenvy::dotenv();
        }

        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(gemini) = patch.gemini {
            if let Some(gemini_api_key_value) = gemini.api_key {
                self.gemini.api_key = secret_value(gemini_api_key_value);
            }
            if let Some(model) = gemini.model {
                self.gemini.model = model;
            }
            if let Some(base_url) = gemini.base_url {
                self.gemini.base_url = base_url;
            }
            if let Some(timeout_secs) = gemini.timeout_secs {
                self.gemini.timeout_secs = timeout_secs;
            }
        }

        if let Some(qloo) = patch.qloo {
            if let Some(qloo_api_key_value) = qloo.api_key {
                self.qloo.api_key = secret_value(qloo_api_key_value);
            }
            if let Some(base_url) = qloo.base_url {
                self.qloo.base_url = base_url;
            }
            if let Some(timeout_secs) = qloo.timeout_secs {
                self.qloo.timeout_secs = timeout_secs;
            }
            if let Some(fallback_city) = qloo.fallback_city {
                self.qloo.fallback_city = fallback_city;
            }
            if let Some(fallback_tag) = qloo.fallback_tag {
                self.qloo.fallback_tag = fallback_tag;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let gemini_api_key =
            read_env("CULTUREHUB_GEMINI_API_KEY").or_else(|| read_env("GEMINI_API_KEY"));
        if let Some(value) = gemini_api_key {
            self.gemini.api_key = secret_value(value);
        }
        if let Some(value) = read_env("CULTUREHUB_GEMINI_MODEL") {
            self.gemini.model = value;
        }
        if let Some(value) = read_env("CULTUREHUB_GEMINI_BASE_URL") {
            self.gemini.base_url = value;
        }
        if let Some(value) = read_env("CULTUREHUB_GEMINI_TIMEOUT_SECS") {
            self.gemini.timeout_secs = parse_u64("CULTUREHUB_GEMINI_TIMEOUT_SECS", &value)?;
        }

        let qloo_api_key = read_env("CULTUREHUB_QLOO_API_KEY").or_else(|| read_env("QLOO_API_KEY"));
        if let Some(value) = qloo_api_key {
            self.qloo.api_key = secret_value(value);
        }
        if let Some(value) = read_env("CULTUREHUB_QLOO_BASE_URL") {
            self.qloo.base_url = value;
        }
        if let Some(value) = read_env("CULTUREHUB_QLOO_TIMEOUT_SECS") {
            self.qloo.timeout_secs = parse_u64("CULTUREHUB_QLOO_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("CULTUREHUB_QLOO_FALLBACK_CITY") {
            self.qloo.fallback_city = value;
        }
        if let Some(value) = read_env("CULTUREHUB_QLOO_FALLBACK_TAG") {
            self.qloo.fallback_tag = value;
        }

        let log_level =
            read_env("CULTUREHUB_LOGGING_LEVEL").or_else(|| read_env("CULTUREHUB_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CULTUREHUB_LOGGING_FORMAT").or_else(|| read_env("CULTUREHUB_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(gemini_api_key) = overrides.gemini_api_key {
            self.gemini.api_key = secret_value(gemini_api_key);
        }
        if let Some(gemini_model) = overrides.gemini_model {
            self.gemini.model = gemini_model;
        }
        if let Some(qloo_api_key) = overrides.qloo_api_key {
            self.qloo.api_key = secret_value(qloo_api_key);
        }
        if let Some(qloo_base_url) = overrides.qloo_base_url {
            self.qloo.base_url = qloo_base_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_gemini(&self.gemini)?;
        validate_qloo(&self.qloo)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_gemini(gemini: &GeminiConfig) -> Result<(), ConfigError> {
    if gemini.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "gemini.api_key is required. Set GEMINI_API_KEY (or CULTUREHUB_GEMINI_API_KEY); keys are issued at https://aistudio.google.com/apikey".to_string(),
        ));
    }
    if gemini.model.trim().is_empty() {
        return Err(ConfigError::Validation("gemini.model must not be empty".to_string()));
    }
    validate_http_url("gemini.base_url", &gemini.base_url)?;
    validate_timeout("gemini.timeout_secs", gemini.timeout_secs)
}

fn validate_qloo(qloo: &QlooConfig) -> Result<(), ConfigError> {
    if qloo.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "qloo.api_key is required. Set QLOO_API_KEY (or CULTUREHUB_QLOO_API_KEY)".to_string(),
        ));
    }
    validate_http_url("qloo.base_url", &qloo.base_url)?;
    validate_timeout("qloo.timeout_secs", qloo.timeout_secs)?;

    if qloo.fallback_city.trim().is_empty() {
        return Err(ConfigError::Validation("qloo.fallback_city must not be empty".to_string()));
    }
    if qloo.fallback_tag.trim().is_empty() {
        return Err(ConfigError::Validation("qloo.fallback_tag must not be empty".to_string()));
    }

    Ok(())
}

fn validate_http_url(key: &str, url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{key} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn validate_timeout(key: &str, timeout_secs: u64) -> Result<(), ConfigError> {
    if timeout_secs == 0 || timeout_secs > 300 {
        return Err(ConfigError::Validation(format!("{key} must be in range 1..=300")));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    gemini: Option<GeminiPatch>,
    qloo: Option<QlooPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiPatch {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct QlooPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    fallback_city: Option<String>,
    fallback_tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
