//! Import command handler.
//!
//! Implements the `import` subcommand against the JSON file store.

use super::{OutputFormat, exit_codes};
use crate::config::{AppConfig, Validatable};
use crate::import::{RequestSummary, SpdxBomImporter};
use crate::model::AttachmentContent;
use crate::sink::JsonFileSink;
use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

/// Entity the described package is imported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImportAs {
    #[default]
    Release,
    Project,
}

/// Everything the `import` subcommand needs.
#[derive(Debug, Clone)]
pub struct ImportCommand {
    pub file: PathBuf,
    pub target: ImportAs,
    pub output: OutputFormat,
    /// File configuration with CLI overrides applied
    pub config: AppConfig,
}

/// Run the import command, returning the desired exit code.
///
/// The store is flushed whatever the outcome: entities written before a
/// failure stay.
pub fn run_import(command: ImportCommand) -> Result<i32> {
    let errors = command.config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration: {}", messages.join("; "));
    }

    let file_name = command
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", command.file.display()))?
        .to_string();
    let reader = File::open(&command.file)
        .map(BufReader::new)
        .with_context(|| format!("failed to open {}", command.file.display()))?;

    let store_path = &command.config.store.path;
    let sink = JsonFileSink::open(store_path)
        .with_context(|| format!("failed to open store {}", store_path.display()))?;
    let importer = SpdxBomImporter::new(sink, command.config.import);

    let content = AttachmentContent::new(uuid::Uuid::new_v4().simple().to_string(), file_name);
    let user = command.config.user.to_user();
    let summary = match command.target {
        ImportAs::Release => importer.import_as_release(reader, &content, &user),
        ImportAs::Project => importer.import_as_project(reader, &content, &user),
    };

    importer
        .sink()
        .flush()
        .with_context(|| format!("failed to write store {}", store_path.display()))?;

    let mut stdout = std::io::stdout().lock();
    write_summary(&mut stdout, &summary, command.output)?;

    Ok(if summary.is_success() {
        exit_codes::SUCCESS
    } else {
        exit_codes::IMPORT_FAILED
    })
}

fn write_summary(out: &mut impl Write, summary: &RequestSummary, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(summary).context("failed to serialize summary")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text => {
            writeln!(out, "{}: {}", summary.request_status, summary.message)?;
            writeln!(
                out,
                "Elements: {} total, {} affected",
                summary.total_elements, summary.total_affected_elements
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BOM: &str = "SPDXVersion: SPDX-2.2\n\
DataLicense: CC0-1.0\n\
SPDXID: SPDXRef-DOCUMENT\n\
DocumentName: tool\n\
DocumentNamespace: http://example.org/tool\n\
Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-tool\n\
PackageName: tool\n\
SPDXID: SPDXRef-tool\n\
PackageVersion: 0.3\n";

    fn command(dir: &TempDir, target: ImportAs) -> ImportCommand {
        let file = dir.path().join("tool.spdx");
        std::fs::write(&file, BOM).unwrap();
        ImportCommand {
            file,
            target,
            output: OutputFormat::Json,
            config: AppConfig::builder()
                .store_path(dir.path().join("store.json"))
                .user("ci@example.org", "Build")
                .build(),
        }
    }

    #[test]
    fn test_import_writes_store() {
        let dir = TempDir::new().unwrap();
        let code = run_import(command(&dir, ImportAs::Release)).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let store = JsonFileSink::open(dir.path().join("store.json")).unwrap();
        let state = store.snapshot().unwrap();
        assert_eq!(state.components.len(), 1);
        assert_eq!(state.releases.len(), 1);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = TempDir::new().unwrap();
        let mut cmd = command(&dir, ImportAs::Project);
        cmd.config.user.email = String::new();
        assert!(run_import(cmd).is_err());
    }

    #[test]
    fn test_text_summary() {
        let summary = RequestSummary::failure("nope");
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary, OutputFormat::Text).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("FAILURE: nope"));
        assert!(text.contains("0 total"));
    }
}
