#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz file type detection over arbitrary upload names.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = sbom_importer::parsers::detect_file_type(s);
    }
});
