//! Transport-agnostic core of the smooth-criminal editor integration.
//!
//! This crate owns everything that does not depend on the LSP protocol:
//! the in-memory document mirror, the boundary to the external analysis
//! oracle, and the `analyze` command handler that turns oracle output into
//! user-facing notifications.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       smooth-lsp-core                        │
//! │                                                              │
//! │  document.rs ──► command.rs ──► oracle.rs ──► (subprocess)   │
//! │                      │                                       │
//! │                      ▼                                       │
//! │                  types.rs (Notification)                     │
//! └──────────────────────────────────────────────────────────────┘
//!             │                                    │
//!             ▼                                    ▼
//! ┌───────────────────────┐          ┌─────────────────────────────┐
//! │      smooth-lsp       │          │     smooth analyze (CLI)    │
//! │  (window/showMessage) │          │     (stdout / stderr)       │
//! └───────────────────────┘          └─────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use smooth_lsp_core::{Document, ProcessOracle, OracleSettings, analyze};
//!
//! let doc = Document::new("file:///app.py", source);
//! let oracle = ProcessOracle::from_settings(&OracleSettings::default());
//! for notification in analyze(Some(&doc), &oracle).await {
//!     println!("{}", notification.message);
//! }
//! ```

pub mod command;
pub mod document;
pub mod oracle;
pub mod settings;
pub mod types;

pub use command::{ANALYZE_COMMAND, analyze, render_output};
pub use document::{Document, DocumentStore};
pub use oracle::{CommandOutput, Oracle, OracleError, ProcessOracle};
pub use settings::{OracleSettings, ServerSettings};
pub use types::{AnalysisRequest, Notification, NotificationKind};
