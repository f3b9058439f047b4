//! Parser tests over the SPDX fixture files.

use sbom_importer::model::{RelationshipType, SpdxDocument, SpdxDocumentIndex};
use sbom_importer::parsers::{ParseError, SpdxFileType, detect_file_type, parse_spdx_file};
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join("spdx").join(name)
}

fn parse(name: &str) -> SpdxDocument {
    parse_spdx_file(&fixture_path(name))
        .unwrap_or_else(|e| panic!("{name} should parse: {e}"))
}

fn relationship_triples(doc: &SpdxDocument) -> Vec<(&str, &str, &str)> {
    doc.relationships
        .iter()
        .map(|r| {
            (
                r.spdx_element_id.as_str(),
                r.relationship_type.as_str(),
                r.related_spdx_element.as_str(),
            )
        })
        .collect()
}

mod tag_value_tests {
    use super::*;

    #[test]
    fn test_all_valid_fixtures_parse() {
        for name in [
            "app.spdx",
            "chain.spdx",
            "contains_and_describes.spdx",
            "cycle.spdx",
            "multiple_top_level.spdx",
            "no_top_level.spdx",
            "versionless.spdx",
        ] {
            let doc = parse(name);
            assert_eq!(doc.spdx_id, "SPDXRef-DOCUMENT", "{name}");
            assert!(!doc.packages.is_empty(), "{name}");
        }
    }

    #[test]
    fn test_app_document_header() {
        let doc = parse("app.spdx");
        assert_eq!(doc.spdx_version, "SPDX-2.2");
        assert_eq!(doc.data_license, "CC0-1.0");
        assert_eq!(doc.name, "app");
        assert_eq!(doc.document_namespace, "http://example.org/spdx/app-2.0");
        assert_eq!(doc.comment.as_deref(), Some("Sample application BOM"));

        let info = &doc.creation_info;
        assert!(info.creators.iter().any(|c| c == "Tool: builder-1.4"));
        assert!(info.creators.iter().any(|c| c == "Organization: Example Corp"));
        assert_eq!(info.created.as_deref(), Some("2024-03-01T12:00:00Z"));
        assert_eq!(info.comment.as_deref(), Some("Built on CI"));
        assert_eq!(info.license_list_version.as_deref(), Some("3.19"));
    }

    #[test]
    fn test_app_external_document_refs() {
        let doc = parse("app.spdx");
        assert_eq!(doc.external_document_refs.len(), 2);

        let base = &doc.external_document_refs[0];
        assert_eq!(base.external_document_id, "DocumentRef-base");
        assert_eq!(base.spdx_document_uri, "http://example.org/spdx/base");
        let checksum = base.checksum.as_ref().unwrap();
        assert_eq!(checksum.algorithm, "SHA1");
        assert_eq!(checksum.value, "d6a770ba38583ed4bb4525bd96e50461655d2759");

        assert!(doc.external_document_refs[1].checksum.is_none());
    }

    #[test]
    fn test_app_elements() {
        let doc = parse("app.spdx");
        let names: Vec<_> = doc.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["app", "lib", "tool"]);
        assert_eq!(doc.files.len(), 1);
        assert_eq!(doc.files[0].file_name, "./src/main.c");
        assert_eq!(doc.snippets.len(), 1);
        assert_eq!(doc.snippets[0].snippet_from_file, "SPDXRef-main-c");
        assert_eq!(doc.annotations.len(), 1);
        assert_eq!(doc.annotations[0].annotation_type, "REVIEW");
    }

    #[test]
    fn test_app_package_details() {
        let doc = parse("app.spdx");
        let app = &doc.packages[0];
        assert_eq!(app.version.as_deref(), Some("2.0"));
        assert_eq!(app.package_file_name.as_deref(), Some("app-2.0.tar.gz"));
        assert_eq!(app.files_analyzed, Some(true));
        assert_eq!(app.checksums[0].algorithm, "SHA256");
        assert_eq!(app.copyright_text.as_deref(), Some("Copyright 2024 Example Corp"));
        assert_eq!(app.license_concluded.as_deref(), Some("MIT"));
        assert_eq!(app.license_declared.as_deref(), Some("NOASSERTION"));

        let code = app.verification_code.as_ref().unwrap();
        assert_eq!(code.excluded_files, vec!["./app.spdx"]);
        assert_eq!(app.external_refs.len(), 1);
        assert_eq!(app.external_refs[0].reference_type, "purl");
        assert_eq!(app.external_refs[0].locator, "pkg:generic/app@2.0");
    }

    #[test]
    fn test_app_relationships() {
        let doc = parse("app.spdx");
        let triples = relationship_triples(&doc);
        assert_eq!(triples.len(), 4);
        assert!(triples.contains(&("SPDXRef-DOCUMENT", "DESCRIBES", "SPDXRef-app")));
        assert!(triples.contains(&("SPDXRef-app", "CONTAINS", "SPDXRef-lib")));
        assert!(triples.contains(&("SPDXRef-app", "DEPENDS_ON", "SPDXRef-tool")));
        assert!(triples.contains(&("SPDXRef-app", "CONTAINS", "SPDXRef-main-c")));
    }

    #[test]
    fn test_extracted_license_text() {
        let doc = parse("app.spdx");
        let license = &doc.extracted_licenses[0];
        assert_eq!(license.license_id, "LicenseRef-custom");
        assert_eq!(license.extracted_text.as_deref(), Some("Custom terms\napply here"));
        assert_eq!(license.name.as_deref(), Some("Custom License"));
        assert_eq!(license.cross_refs, vec!["https://example.org/custom"]);
    }

    #[test]
    fn test_versionless_package() {
        let doc = parse("versionless.spdx");
        let vendored = doc.packages.iter().find(|p| p.name == "vendored").unwrap();
        assert!(vendored.version.is_none());
    }

    #[test]
    fn test_broken_reports_line() {
        let err = parse_spdx_file(&fixture_path("broken.spdx")).unwrap_err();
        assert!(matches!(err, ParseError::TagValueError { .. }), "{err:?}");
        assert!(err.to_string().contains("line"));
    }
}

mod rdf_tests {
    use super::*;

    #[test]
    fn test_both_suffixes_parse_alike() {
        let rdf = parse("widget.rdf");
        let xml = parse("widget.spdx.rdf.xml");
        assert_eq!(rdf.packages.len(), xml.packages.len());
        assert_eq!(relationship_triples(&rdf), relationship_triples(&xml));
    }

    #[test]
    fn test_widget_document() {
        let doc = parse("widget.rdf");
        assert_eq!(doc.spdx_version, "SPDX-2.2");
        assert_eq!(doc.spdx_id, "SPDXRef-DOCUMENT");
        assert_eq!(doc.name, "widget");
        assert_eq!(doc.data_license, "CC0-1.0");
        assert_eq!(doc.creation_info.creators, vec!["Tool: rdf-writer"]);
    }

    #[test]
    fn test_widget_packages() {
        let doc = parse("widget.rdf");
        assert_eq!(doc.packages.len(), 2);

        let widget = doc.packages.iter().find(|p| p.name == "widget").unwrap();
        assert_eq!(widget.spdx_id, "SPDXRef-widget");
        assert_eq!(widget.version.as_deref(), Some("1.0"));
        assert_eq!(widget.license_declared.as_deref(), Some("MIT"));

        let gear = doc.packages.iter().find(|p| p.name == "gear").unwrap();
        assert_eq!(gear.license_declared.as_deref(), Some("NOASSERTION"));
    }

    #[test]
    fn test_widget_relationships() {
        let doc = parse("widget.rdf");
        let triples = relationship_triples(&doc);
        assert!(triples.contains(&("SPDXRef-DOCUMENT", "DESCRIBES", "SPDXRef-widget")));
        assert!(triples.contains(&("SPDXRef-widget", "CONTAINS", "SPDXRef-gear")));
    }
}

mod index_tests {
    use super::*;

    fn described_names(name: &str) -> Vec<String> {
        let doc = parse(name);
        let index = SpdxDocumentIndex::build(&doc);
        index
            .described_packages()
            .into_iter()
            .filter_map(|idx| index.package(idx).map(|p| p.name.clone()))
            .collect()
    }

    #[test]
    fn test_described_packages() {
        assert_eq!(described_names("app.spdx"), vec!["app"]);
        assert_eq!(described_names("widget.rdf"), vec!["widget"]);
        assert!(described_names("no_top_level.spdx").is_empty());
        assert!(described_names("multiple_top_level.spdx").len() > 1);
    }

    #[test]
    fn test_relationships_of_package() {
        let doc = parse("app.spdx");
        let index = SpdxDocumentIndex::build(&doc);
        let kinds: Vec<_> = index
            .relationships_of("SPDXRef-app")
            .into_iter()
            .map(|r| r.relationship_type.clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                RelationshipType::Contains,
                RelationshipType::DependsOn,
                RelationshipType::Contains
            ]
        );
        assert!(index.package_index("SPDXRef-main-c").is_none());
        assert_eq!(index.package_index("SPDXRef-lib"), Some(1));
    }
}

mod detection_tests {
    use super::*;

    #[test]
    fn test_supported_names() {
        assert_eq!(detect_file_type("app.spdx"), Some(SpdxFileType::TagValue));
        assert_eq!(detect_file_type("widget.rdf"), Some(SpdxFileType::RdfXml));
        assert_eq!(detect_file_type("widget.spdx.rdf.xml"), Some(SpdxFileType::RdfXml));
        assert_eq!(detect_file_type("WIDGET.RDF.XML"), Some(SpdxFileType::RdfXml));
    }

    #[test]
    fn test_unsupported_names() {
        for name in ["chain.txt", "bom.json", "bom.xml", "spdx", "bom.spdx.json", ""] {
            assert_eq!(detect_file_type(name), None, "{name}");
        }
    }

    #[test]
    fn test_valid_content_with_wrong_name_is_rejected() {
        let err = parse_spdx_file(&fixture_path("chain.txt")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidStructure(_)), "{err:?}");
        assert!(err.to_string().contains("chain.txt"));
    }
}
