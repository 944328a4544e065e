//! Oracle and server settings.
//!
//! Settings arrive as JSON (LSP `initializationOptions` or
//! `workspace/didChangeConfiguration`) and are deserialized with serde.
//! Every field has a default, so an empty object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides the default interpreter.
pub const INTERPRETER_ENV_VAR: &str = "SMOOTH_CRIMINAL_PYTHON";

/// Interpreter used when neither settings nor environment name one.
pub const DEFAULT_INTERPRETER: &str = "python";

/// Default bound on a single oracle run, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Python program run by the default oracle.
///
/// Reads the document from stdin, parses it, runs the smooth-criminal AST
/// visitor and prints one finding per line.
pub const ANALYZER_SCRIPT: &str = "
import ast, sys
from smooth_criminal.analizer import ASTAnalyzer
code = sys.stdin.read()
tree = ast.parse(code)
a = ASTAnalyzer()
a.visit(tree)
for f in a.findings:
    print(f)
";

/// How to start the external analysis oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OracleSettings {
    /// Program to start (name on `PATH` or a path).
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Upper bound on one run in seconds. `0` means wait indefinitely.
    pub timeout_secs: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: vec!["-c".to_string(), ANALYZER_SCRIPT.to_string()],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OracleSettings {
    /// The bounded wait for one run, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Resolve the program to an executable path.
    ///
    /// Names are looked up on `PATH`; when the lookup fails the bare name is
    /// returned unchanged so that spawning reports the real error.
    pub fn resolve_program(&self) -> PathBuf {
        match which::which(&self.program) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(program = %self.program, error = %e, "program not found on PATH");
                PathBuf::from(&self.program)
            }
        }
    }
}

fn default_program() -> String {
    match std::env::var(INTERPRETER_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_INTERPRETER.to_string(),
    }
}

/// Settings accepted by the language server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    pub oracle: OracleSettings,
}

impl ServerSettings {
    /// Parse settings from a JSON value.
    ///
    /// Returns `None` when the value does not have the expected shape; the
    /// caller decides whether to keep its previous settings.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match serde_json::from_value(value.clone()) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed settings");
                None
            }
        }
    }
}
