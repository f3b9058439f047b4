#![no_main]
use libfuzzer_sys::fuzz_target;
use sbom_importer::parsers::{DocumentParser, RdfXmlParser};

/// Fuzz the SPDX RDF/XML reader, raw and inside an `rdf:RDF` envelope.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let parser = RdfXmlParser::new();
        let _ = parser.parse_str(s);

        if s.len() < 10_000 {
            let wrapped = format!(
                r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:spdx="http://spdx.org/rdf/terms#"><spdx:SpdxDocument rdf:about="http://example.com/fuzz#SPDXRef-DOCUMENT"><spdx:specVersion>SPDX-2.2</spdx:specVersion>{s}</spdx:SpdxDocument></rdf:RDF>"#,
            );
            let _ = parser.parse_str(&wrapped);
        }
    }
});
