use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity of a captured console message, mapped from the browser's
/// structured console API type rather than guessed from message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warning,
    Error,
    Debug,
    /// Other console APIs (table, trace, assert, ...)
    Other,
}

impl ConsoleLevel {
    pub fn is_error(&self) -> bool {
        matches!(self, ConsoleLevel::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleLevel::Log => "log",
            ConsoleLevel::Info => "info",
            ConsoleLevel::Warning => "warning",
            ConsoleLevel::Error => "error",
            ConsoleLevel::Debug => "debug",
            ConsoleLevel::Other => "other",
        }
    }
}

/// A console message observed during the run. Immutable once captured;
/// messages accumulate in arrival order for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub text: String,
    /// Source location if the browser reported one (e.g. "app.js:42:10").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ConsoleMessage {
    pub fn new(level: ConsoleLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Element count for one selector group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSummary {
    pub group: String,
    pub count: usize,
}

/// Text and href of the first matched link, if the page has any links.
/// A missing href attribute is a value here, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSample {
    pub text: String,
    pub href: Option<String>,
}

/// The structured result of one smoke-test run. Created fresh per run and
/// immutable after the run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeReport {
    pub target_url: String,
    pub title: String,
    pub element_summaries: Vec<ElementSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_link: Option<LinkSample>,
    pub console_messages: Vec<ConsoleMessage>,
    /// Count of console messages with error severity, computed over the
    /// full captured sequence.
    pub error_count: usize,
    pub screenshot_paths: Vec<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SmokeReport {
    /// Recompute the error count from the message sequence. Always equals
    /// the stored `error_count` on a well-formed report.
    pub fn recount_errors(&self) -> usize {
        self.console_messages
            .iter()
            .filter(|m| m.level.is_error())
            .count()
    }

    pub fn has_console_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_messages(messages: Vec<ConsoleMessage>) -> SmokeReport {
        let error_count = messages.iter().filter(|m| m.level.is_error()).count();
        SmokeReport {
            target_url: "http://localhost:3000".to_string(),
            title: "Test".to_string(),
            element_summaries: vec![],
            first_link: None,
            console_messages: messages,
            error_count,
            screenshot_paths: vec![],
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_error_count_matches_recount() {
        let report = report_with_messages(vec![
            ConsoleMessage::new(ConsoleLevel::Log, "starting"),
            ConsoleMessage::new(ConsoleLevel::Error, "boom"),
            ConsoleMessage::new(ConsoleLevel::Warning, "careful"),
            ConsoleMessage::new(ConsoleLevel::Error, "boom again"),
        ]);

        assert_eq!(report.error_count, 2);
        assert_eq!(report.recount_errors(), report.error_count);
        assert!(report.has_console_errors());
    }

    #[test]
    fn test_error_count_zero_without_errors() {
        let report = report_with_messages(vec![
            ConsoleMessage::new(ConsoleLevel::Log, "this text contains error"),
            ConsoleMessage::new(ConsoleLevel::Info, "Error: not really"),
        ]);

        // Severity tagging, not substring matching: "error" in message text
        // does not make a message an error.
        assert_eq!(report.error_count, 0);
        assert!(!report.has_console_errors());
    }

    #[test]
    fn test_link_sample_absent_href_is_a_value() {
        let sample = LinkSample {
            text: "Home".to_string(),
            href: None,
        };

        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["text"], "Home");
        assert!(json.get("href").is_none() || json["href"].is_null());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = report_with_messages(vec![ConsoleMessage::new(
            ConsoleLevel::Error,
            "failed to fetch",
        )]);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"error_count\":1"));
        assert!(json.contains("\"level\":\"error\""));
    }

    #[test]
    fn test_console_message_with_source() {
        let msg = ConsoleMessage::new(ConsoleLevel::Warning, "deprecated")
            .with_source("app.js:10:4");
        assert_eq!(msg.source.as_deref(), Some("app.js:10:4"));
    }
}
