//! Core types for the analysis command.
//!
//! These types are transport-agnostic: the LSP server converts
//! [`Notification`]s into `window/showMessage` calls, the CLI prints them.

use serde::{Deserialize, Serialize};

/// Prefix placed before every finding shown to the user.
pub const FINDING_PREFIX: &str = "@smooth ";

/// Suffix placed after every finding shown to the user.
pub const FINDING_SUFFIX: &str = " @jam";

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Error,
}

/// A transient message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    /// Wrap one line of oracle output in the finding markers.
    ///
    /// The line is kept verbatim; an empty line still yields a notification.
    pub fn finding(line: &str) -> Self {
        Self::info(format!("{FINDING_PREFIX}{line}{FINDING_SUFFIX}"))
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// The text of the active document, captured at invocation time.
///
/// The request is consumed by the oracle that receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    source: String,
}

impl AnalysisRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.source.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_wraps_line_in_markers() {
        let n = Notification::finding("Use @smooth on loop_sum");
        assert_eq!(n.kind, NotificationKind::Info);
        insta::assert_snapshot!(n.message, @"@smooth Use @smooth on loop_sum @jam");
    }

    #[test]
    fn blank_finding_is_still_decorated() {
        assert_eq!(Notification::finding("").message, "@smooth  @jam");
    }

    #[test]
    fn notification_serializes_with_lowercase_kind() {
        let json = serde_json::to_value(Notification::error("boom")).unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn request_preserves_bytes() {
        let source = "def f():\r\n\treturn 'ñ'\n";
        let request = AnalysisRequest::new(source);
        assert_eq!(request.source(), source);
        assert_eq!(request.into_bytes(), source.as_bytes());
    }
}
