//! Property-based tests for the SPDX readers.
//!
//! Ensures parsers don't panic on arbitrary input, including random strings,
//! tag-value-like lines, and XML-like fragments.

use proptest::prelude::*;
use sbom_importer::model::SpdxDocumentIndex;
use sbom_importer::parsers::{
    DocumentParser, RdfXmlParser, SpdxFileType, TagValueParser, detect_file_type, parse_spdx_str,
};

const HEADER: &str = "SPDXVersion: SPDX-2.2\nDataLicense: CC0-1.0\nSPDXID: SPDXRef-DOCUMENT\nDocumentName: p\nDocumentNamespace: http://example.org/p\n";

proptest! {
    // Random input is expected to fail; only the absence of panics is checked.
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn tag_value_doesnt_panic(s in "\\PC{0,2000}") {
        let _ = TagValueParser::new().parse_str(&s);
    }

    #[test]
    fn rdf_doesnt_panic(s in "\\PC{0,2000}") {
        let _ = RdfXmlParser::new().parse_str(&s);
    }

    #[test]
    fn detect_file_type_doesnt_panic(s in "\\PC{0,200}") {
        let _ = detect_file_type(&s);
    }

    #[test]
    fn xml_like_input_doesnt_panic(
        s in prop::string::string_regex(r#"<[a-z:]{1,20}>[^<]{0,200}</[a-z:]{1,20}>"#).unwrap()
    ) {
        let _ = parse_spdx_str(&s, SpdxFileType::RdfXml);
    }

    #[test]
    fn tag_value_lines_dont_panic(
        lines in prop::collection::vec(("[A-Za-z]{1,20}", "\\PC{0,100}"), 0..30)
    ) {
        let body: String = lines
            .iter()
            .map(|(key, value)| format!("{key}: {value}\n"))
            .collect();
        if let Ok(doc) = parse_spdx_str(&format!("{HEADER}{body}"), SpdxFileType::TagValue) {
            let index = SpdxDocumentIndex::build(&doc);
            let _ = index.described_packages();
        }
    }

    #[test]
    fn package_names_survive_parsing(
        name in "[A-Za-z0-9][A-Za-z0-9._-]{0,30}",
        version in "[0-9]{1,3}(\\.[0-9]{1,3}){0,2}",
    ) {
        let input = format!(
            "{HEADER}Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-p\nPackageName: {name}\nSPDXID: SPDXRef-p\nPackageVersion: {version}\n"
        );
        let doc = parse_spdx_str(&input, SpdxFileType::TagValue).unwrap();
        prop_assert_eq!(doc.packages.len(), 1);
        prop_assert_eq!(&doc.packages[0].name, &name);
        prop_assert_eq!(doc.packages[0].version.as_deref(), Some(version.as_str()));

        let index = SpdxDocumentIndex::build(&doc);
        prop_assert_eq!(index.described_packages(), vec![0]);
    }
}
