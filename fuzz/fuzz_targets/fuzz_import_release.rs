#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_importer::config::ImportConfig;
use sbom_importer::model::{AttachmentContent, User};
use sbom_importer::{InMemorySink, SpdxBomImporter};

/// Fuzz the whole release import against an in-memory store.
///
/// Relationship graphs built from arbitrary input must never send the
/// walk into a loop or a panic.
fuzz_target!(|data: &[u8]| {
    let importer = SpdxBomImporter::new(
        InMemorySink::new(),
        ImportConfig {
            spdx_document_enabled: true,
            flexible_project_release_relationship: false,
        },
    );
    let content = AttachmentContent::new("fuzz", "fuzz.spdx");
    let user = User::new("fuzz@example.com", "Fuzz");
    let _ = importer.import_as_release(data, &content, &user);
});
