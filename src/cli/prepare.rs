//! Prepare command handler.
//!
//! Implements the `prepare` subcommand: a dry run that previews what an
//! import of a file would create.

use super::{OutputFormat, exit_codes};
use crate::config::ImportConfig;
use crate::import::{ImportPreparation, SpdxBomImporter};
use crate::sink::InMemorySink;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Run the prepare command, returning the desired exit code.
///
/// Nothing is written; the preview runs against an empty in-memory sink.
pub fn run_prepare(path: &Path, output: OutputFormat) -> Result<i32> {
    let importer = SpdxBomImporter::new(InMemorySink::new(), ImportConfig::default());
    let preparation = importer.prepare_import(path);

    let mut stdout = std::io::stdout().lock();
    write_preparation(&mut stdout, &preparation, output)?;

    Ok(if preparation.is_success() {
        exit_codes::SUCCESS
    } else {
        exit_codes::IMPORT_FAILED
    })
}

fn write_preparation(
    out: &mut impl Write,
    preparation: &ImportPreparation,
    output: OutputFormat,
) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(preparation)
                .context("failed to serialize preparation")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text => {
            if !preparation.is_success() {
                writeln!(out, "FAILURE: {}", preparation.message)?;
                return Ok(());
            }
            writeln!(out, "SUCCESS")?;
            writeln!(out, "Components: {}", preparation.component_names.join(", "))?;
            writeln!(out, "Releases:   {}", preparation.release_names.join(", "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::RequestStatus;

    #[test]
    fn test_text_output() {
        let preparation = ImportPreparation {
            request_status: Some(RequestStatus::Success),
            component_names: vec!["app".into(), "lib".into()],
            release_names: vec!["app 1.0".into()],
            versions: vec!["1.0".into(), String::new()],
            message: String::new(),
        };
        let mut buf = Vec::new();
        write_preparation(&mut buf, &preparation, OutputFormat::Text).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("SUCCESS"));
        assert!(text.contains("app, lib"));
        assert!(text.contains("app 1.0"));
    }

    #[test]
    fn test_json_failure_output() {
        let preparation = ImportPreparation::failure("error-read-file");
        let mut buf = Vec::new();
        write_preparation(&mut buf, &preparation, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["requestStatus"], "FAILURE");
        assert_eq!(value["message"], "error-read-file");
    }

    #[test]
    fn test_missing_file_fails() {
        let code = run_prepare(Path::new("/no/such/bom.spdx"), OutputFormat::Json).unwrap();
        assert_eq!(code, exit_codes::IMPORT_FAILED);
    }
}
