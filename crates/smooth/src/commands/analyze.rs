//! `smooth analyze` command implementation.
//!
//! Runs the same handler as the editor command against a file or stdin and
//! prints one notification per line: findings on stdout, errors on stderr.

use anyhow::{Context, Result};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use smooth_lsp_core::{Document, Notification, OracleSettings, ProcessOracle};

pub struct AnalyzeArgs {
    pub file: Option<PathBuf>,
    pub python: Option<String>,
    pub oracle_args: Vec<String>,
    pub timeout: Option<u64>,
}

impl AnalyzeArgs {
    /// Apply command-line overrides on top of the default settings.
    fn oracle_settings(&self) -> OracleSettings {
        let mut settings = OracleSettings::default();
        if let Some(python) = &self.python {
            settings.program = python.clone();
        }
        if !self.oracle_args.is_empty() {
            settings.args = self.oracle_args.clone();
        }
        if let Some(secs) = self.timeout {
            settings.timeout_secs = secs;
        }
        settings
    }
}

pub fn execute(args: AnalyzeArgs) -> Result<ExitCode> {
    // Read the source before anything is spawned
    let document = read_document(args.file.as_deref())?;
    let oracle = ProcessOracle::from_settings(&args.oracle_settings());

    let runtime = tokio::runtime::Runtime::new()?;
    let notifications =
        runtime.block_on(async { smooth_lsp_core::analyze(Some(&document), &oracle).await });

    let failed = emit(&notifications, &mut io::stdout().lock(), &mut io::stderr().lock())?;
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn read_document(file: Option<&Path>) -> Result<Document> {
    match file {
        None => read_stdin(),
        Some(path) if path == Path::new("-") => read_stdin(),
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let name = path.display().to_string();
            Ok(Document::new(&name, decode_source(&name, bytes)))
        }
    }
}

fn read_stdin() -> Result<Document> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read source from stdin")?;
    Ok(Document::new("<stdin>", decode_source("<stdin>", bytes)))
}

/// Decode source bytes as UTF-8, replacing invalid sequences.
///
/// Non-UTF-8 sources (e.g. Latin-1 with a coding declaration) are still
/// analyzed; the replaced characters only affect string literals and comments.
fn decode_source(name: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(source = name, "source is not valid UTF-8; decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

/// Print notifications, returning whether any of them was an error.
fn emit(
    notifications: &[Notification],
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    let mut failed = false;
    for notification in notifications {
        if notification.is_error() {
            failed = true;
            writeln!(err, "{notification}")?;
        } else {
            writeln!(out, "{notification}")?;
        }
    }
    out.flush()?;
    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> AnalyzeArgs {
        AnalyzeArgs {
            file: None,
            python: None,
            oracle_args: Vec::new(),
            timeout: None,
        }
    }

    #[test]
    fn default_settings_are_kept_without_overrides() {
        assert_eq!(args().oracle_settings(), OracleSettings::default());
    }

    #[test]
    fn overrides_replace_program_args_and_timeout() {
        let settings = AnalyzeArgs {
            python: Some("python3.12".to_string()),
            oracle_args: vec!["-m".to_string(), "smooth_criminal.oracle".to_string()],
            timeout: Some(0),
            ..args()
        }
        .oracle_settings();

        assert_eq!(settings.program, "python3.12");
        assert_eq!(settings.args, vec!["-m", "smooth_criminal.oracle"]);
        assert_eq!(settings.timeout(), None);
    }

    #[test]
    fn emit_routes_errors_to_stderr() {
        let notifications = vec![
            Notification::finding("use @jam"),
            Notification::error("Analysis failed: boom"),
        ];
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let failed = emit(&notifications, &mut out, &mut err).unwrap();

        assert!(failed);
        assert_eq!(String::from_utf8(out).unwrap(), "@smooth use @jam @jam\n");
        assert_eq!(String::from_utf8(err).unwrap(), "Analysis failed: boom\n");
    }

    #[test]
    fn emit_without_errors_succeeds() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let failed = emit(&[Notification::info("No suggestions.")], &mut out, &mut err).unwrap();
        assert!(!failed);
        assert!(err.is_empty());
    }

    #[test]
    fn latin1_source_is_decoded_lossily() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("latin1.py");
        let mut bytes = b"# -*- coding: latin-1 -*-\nname = 'Jos".to_vec();
        bytes.extend_from_slice(&[0xe9, b'\'', b'\n']);
        std::fs::write(&path, bytes).unwrap();

        let doc = read_document(Some(&path)).unwrap();
        assert_eq!(doc.content(), "# -*- coding: latin-1 -*-\nname = 'Jos\u{FFFD}'\n");
    }

    #[test]
    fn utf8_source_is_kept_verbatim() {
        assert_eq!(decode_source("a.py", "x = 'ñ'\n".as_bytes().to_vec()), "x = 'ñ'\n");
    }

    #[test]
    fn missing_file_is_reported_before_analysis() {
        let err = read_document(Some(Path::new("/definitely/not/here.py"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.py"));
    }
}
