//! smooth-criminal Language Server Protocol implementation.
//!
//! This crate exposes the `smooth-criminal.analyze` command of
//! `smooth-lsp-core` through the tower-lsp framework. Findings are shown to
//! the user with `window/showMessage`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          smooth-lsp                          │
//! │   tower-lsp wrapper, JSON-RPC/stdio, `smooth lsp` command    │
//! │                                                              │
//! │  ┌──────────────┐  ┌─────────────┐  ┌────────────────────┐   │
//! │  │  server.rs   │  │ convert.rs  │  │  capabilities.rs   │   │
//! │  │LanguageServer│  │ Core ↔ LSP  │  │ executeCommand     │   │
//! │  └──────┬───────┘  └──────┬──────┘  └────────────────────┘   │
//! │         └─────────────────┴───────────────┐                  │
//! │  ┌────────────────────────────────────────▼───────────────┐  │
//! │  │                    smooth-lsp-core                     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```bash
//! smooth lsp
//! ```
//!
//! Or programmatically:
//!
//! ```rust,ignore
//! smooth_lsp::run_server().await;
//! ```

pub mod capabilities;
pub mod convert;
pub mod server;

pub use server::run_server;
