//! Test helpers for running CLI invocations against a temporary database.

use super::*;
use camino::Utf8PathBuf;
use tempfile::TempDir;

/// Temporary workspace holding a SQLite database path.
pub(super) struct Workspace {
    _dir: TempDir,
    database: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let database = Utf8PathBuf::from_path_buf(dir.path().join("sitekit.db"))
            .expect("utf-8 temp path");
        Self {
            _dir: dir,
            database,
        }
    }

    pub(super) fn database(&self) -> &Utf8PathBuf {
        &self.database
    }

    /// Run `sitekit --database <db> <args..>` and capture stdout.
    pub(super) fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let mut argv = vec!["sitekit", "--database", self.database.as_str()];
        argv.extend_from_slice(args);
        run_argv(&argv)
    }
}

/// Parse `argv` (including the binary name) and capture stdout.
pub(super) fn run_argv(argv: &[&str]) -> Result<String, CliError> {
    let cli = Cli::try_parse_from(argv).map_err(CliError::ArgumentParsing)?;
    let mut output = Vec::new();
    run_with(cli, &mut output)?;
    Ok(String::from_utf8(output).expect("utf-8 output"))
}

/// Decode pretty JSON output into a value.
pub(super) fn parse_json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).expect("json output")
}
