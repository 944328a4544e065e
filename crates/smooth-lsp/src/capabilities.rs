//! LSP capability negotiation.

use tower_lsp::lsp_types::{
    ExecuteCommandOptions, ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions,
};

use smooth_lsp_core::ANALYZE_COMMAND;

/// Get the server capabilities to report to the client.
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        // The analyze command needs the current text of the document
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                will_save: None,
                will_save_wait_until: None,
                save: None,
            },
        )),

        execute_command_provider: Some(ExecuteCommandOptions {
            commands: vec![ANALYZE_COMMAND.to_string()],
            ..Default::default()
        }),

        ..Default::default()
    }
}
