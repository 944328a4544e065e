//! LSP server command implementation.

use anyhow::Result;

/// Execute the LSP server.
///
/// Serves JSON-RPC over stdio until the client disconnects.
pub fn execute() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        smooth_lsp::run_server().await;
    });

    Ok(())
}
