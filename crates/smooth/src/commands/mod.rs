//! Command implementations for the smooth CLI
//!
//! Each command module handles the CLI interface and delegates to
//! smooth-lsp-core / smooth-lsp for the actual work.

pub mod analyze;
pub mod lsp;
