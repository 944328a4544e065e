//! The `smooth-criminal.analyze` command handler.

use crate::document::Document;
use crate::oracle::Oracle;
use crate::types::{AnalysisRequest, Notification};

/// Identifier of the user-invokable analyze command.
pub const ANALYZE_COMMAND: &str = "smooth-criminal.analyze";

pub const NO_ACTIVE_DOCUMENT: &str = "No active editor.";
pub const NO_SUGGESTIONS: &str = "No suggestions.";

/// Analyze the active document and return the notifications to show.
///
/// Without an active document the oracle is not started and a single
/// informational notice is returned. Otherwise the document text is handed
/// to the oracle verbatim and its output is turned into notifications by
/// [`render_output`]. Oracle failures become a single error notification.
pub async fn analyze(active: Option<&Document>, oracle: &dyn Oracle) -> Vec<Notification> {
    let Some(document) = active else {
        tracing::info!("analyze invoked without an active document");
        return vec![Notification::info(NO_ACTIVE_DOCUMENT)];
    };

    let request = AnalysisRequest::new(document.content());
    tracing::info!(
        document = document.filename(),
        version = ?document.version(),
        "analyzing document"
    );

    match oracle.run(request).await {
        Ok(output) => render_output(&output),
        Err(e) => {
            tracing::warn!(document = document.filename(), error = %e, "analysis failed");
            vec![Notification::error(format!("Analysis failed: {e}"))]
        }
    }
}

/// Turn successful oracle output into notifications.
///
/// Output that is empty after trimming yields one "no suggestions" notice.
/// Anything else is split on `'\n'` and every line, blank ones included,
/// becomes one decorated finding.
pub fn render_output(output: &str) -> Vec<Notification> {
    if output.trim().is_empty() {
        return vec![Notification::info(NO_SUGGESTIONS)];
    }
    output.split('\n').map(Notification::finding).collect()
}
