use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeSource {
    Parse,
    Recommendations,
    Narrate,
}

/// A non-fatal degradation surfaced to the user next to the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub source: NoticeSource,
    pub message: String,
}

impl Notice {
    pub fn info(source: NoticeSource, message: impl Into<String>) -> Self {
        Self { severity: NoticeSeverity::Info, source, message: message.into() }
    }

    pub fn warning(source: NoticeSource, message: impl Into<String>) -> Self {
        Self { severity: NoticeSeverity::Warning, source, message: message.into() }
    }

    pub fn error(source: NoticeSource, message: impl Into<String>) -> Self {
        Self { severity: NoticeSeverity::Error, source, message: message.into() }
    }

    pub fn label(&self) -> &'static str {
        match self.severity {
            NoticeSeverity::Info => "info",
            NoticeSeverity::Warning => "warning",
            NoticeSeverity::Error => "error",
        }
    }
}
