#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_importer::parsers::{DocumentParser, TagValueParser};

/// Fuzz the SPDX tag-value reader.
///
/// Input is tried raw and behind a valid document header, so the package
/// and relationship tags are reached.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let parser = TagValueParser::new();
        let _ = parser.parse_str(s);

        if s.len() < 10_000 {
            let wrapped = format!(
                "SPDXVersion: SPDX-2.2\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\nDocumentName: fuzz\nDocumentNamespace: https://example.com/fuzz\n{s}",
            );
            let _ = parser.parse_str(&wrapped);
        }
    }
});
