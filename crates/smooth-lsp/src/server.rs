//! LSP server implementation using tower-lsp.

use std::sync::Arc;
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use smooth_lsp_core::{ANALYZE_COMMAND, Document, DocumentStore, ProcessOracle, ServerSettings};

use crate::capabilities::server_capabilities;
use crate::convert;

/// The smooth-criminal language server.
pub struct SmoothLanguageServer {
    /// The LSP client for sending notifications.
    client: Client,
    /// Document store for managing open documents.
    documents: Arc<RwLock<DocumentStore>>,
    /// Settings from `initializationOptions` and configuration changes.
    settings: Arc<RwLock<ServerSettings>>,
}

impl SmoothLanguageServer {
    /// Create a new language server instance.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(DocumentStore::new())),
            settings: Arc::new(RwLock::new(ServerSettings::default())),
        }
    }

    /// Replace the settings if the payload carries a smooth-criminal section.
    ///
    /// Payloads meant for other extensions, and malformed sections, leave the
    /// current settings untouched.
    async fn apply_settings(&self, payload: &serde_json::Value) {
        let Some(section) = convert::settings_section(payload) else {
            tracing::debug!("settings payload has no smooth-criminal section");
            return;
        };
        if let Some(settings) = ServerSettings::from_json(section) {
            tracing::debug!(?settings, "settings updated");
            *self.settings.write().await = settings;
        }
    }

    /// Snapshot the document named by the command arguments.
    ///
    /// The text is cloned so no lock is held while the oracle runs.
    async fn active_document(&self, arguments: &[serde_json::Value]) -> Option<Document> {
        let uri = convert::document_uri(arguments)?;
        let documents = self.documents.read().await;
        documents.get(uri).cloned()
    }

    /// Run the analyze command and show its notifications.
    async fn run_analyze(&self, arguments: &[serde_json::Value]) {
        let active = self.active_document(arguments).await;
        let oracle = {
            let settings = self.settings.read().await;
            ProcessOracle::from_settings(&settings.oracle)
        };

        let notifications = smooth_lsp_core::analyze(active.as_ref(), &oracle).await;
        for notification in notifications {
            self.client
                .show_message(convert::message_type(notification.kind), notification.message)
                .await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for SmoothLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        if let Some(options) = params.initialization_options.as_ref() {
            self.apply_settings(options).await;
        }

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: "smooth-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        tracing::info!("smooth-lsp initialized");
        self.client
            .log_message(MessageType::INFO, "smooth-criminal LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let mut documents = self.documents.write().await;
        documents.open(doc.uri.as_str(), doc.text, doc.version);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Full document sync: the last change carries the whole text
        if let Some(change) = params.content_changes.into_iter().last() {
            let mut documents = self.documents.write().await;
            documents.change(uri.as_str(), change.text, version);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let mut documents = self.documents.write().await;
        documents.close(params.text_document.uri.as_str());
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.apply_settings(&params.settings).await;
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        if params.command != ANALYZE_COMMAND {
            return Err(Error::invalid_params(format!(
                "unknown command: {}",
                params.command
            )));
        }

        self.run_analyze(&params.arguments).await;
        Ok(None)
    }
}

/// Run the LSP server over stdio.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(SmoothLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
