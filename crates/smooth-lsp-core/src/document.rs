//! Document abstraction for the analysis command.
//!
//! A language server only sees the text the editor has sent it, so open
//! documents are mirrored here (full sync) and looked up by URI when the
//! user invokes the analyze command.

use std::collections::HashMap;

/// An open editor document.
#[derive(Debug, Clone)]
pub struct Document {
    /// The document's URI or path.
    uri: String,
    /// The document content, exactly as the editor sent it.
    content: String,
    /// Version number for tracking changes (optional, used by LSP).
    version: Option<i32>,
}

impl Document {
    /// Create a new document with the given URI and content.
    pub fn new(uri: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            content: content.into(),
            version: None,
        }
    }

    /// Create a new document with a version number.
    pub fn with_version(uri: impl Into<String>, content: impl Into<String>, version: i32) -> Self {
        Self {
            uri: uri.into(),
            content: content.into(),
            version: Some(version),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn version(&self) -> Option<i32> {
        self.version
    }

    /// Get the filename from the URI (for log messages).
    pub fn filename(&self) -> &str {
        self.uri.rsplit(['/', '\\']).next().unwrap_or(&self.uri)
    }

    /// Replace the content, recording the new version.
    pub fn set_content_with_version(&mut self, content: impl Into<String>, version: i32) {
        self.content = content.into();
        self.version = Some(version);
    }
}

/// In-memory store of the documents the editor currently has open.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or replace a document in the store.
    pub fn open(&mut self, uri: impl Into<String>, content: impl Into<String>, version: i32) {
        let uri = uri.into();
        self.documents
            .insert(uri.clone(), Document::with_version(uri, content, version));
    }

    /// Update a document's content. Changes for unknown URIs are ignored.
    pub fn change(&mut self, uri: &str, content: impl Into<String>, version: i32) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.set_content_with_version(content, version);
        }
    }

    pub fn close(&mut self, uri: &str) {
        self.documents.remove(uri);
    }

    pub fn get(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }
}
