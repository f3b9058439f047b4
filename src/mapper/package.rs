//! Per-package information records.

use super::document::{annotations_from, relationships_from};
use super::values::{declared_license, value_or_default};
use crate::error::MappingError;
use crate::model::{
    ChecksumRecord, ElementRef, ExternalRefRecord, PackageInformation, PackageVerificationCode,
    SpdxChecksum, SpdxDocumentIndex, SpdxExternalRef, SpdxPackage, VerificationCodeRecord,
};

/// Package information for one package, or `None` when it has no name or
/// no version.
#[must_use]
pub fn package_information(
    index: &SpdxDocumentIndex<'_>,
    pkg: &SpdxPackage,
    spdx_document_id: &str,
) -> Option<PackageInformation> {
    if pkg.name.trim().is_empty() {
        return None;
    }
    let version = pkg.version()?;

    Some(PackageInformation {
        id: None,
        spdx_document_id: spdx_document_id.to_string(),
        name: pkg.name.clone(),
        spdx_id: pkg.spdx_id.clone(),
        version_info: version.to_string(),
        package_file_name: value_or_default(pkg.package_file_name.as_deref()),
        supplier: value_or_default(pkg.supplier.as_deref()),
        originator: value_or_default(pkg.originator.as_deref()),
        download_location: value_or_default(pkg.download_location.as_deref()),
        files_analyzed: pkg.files_analyzed.unwrap_or(true),
        verification_code: verification_code_from(pkg.verification_code.as_ref()),
        checksums: checksums_from(&pkg.checksums),
        homepage: value_or_default(pkg.homepage.as_deref()),
        source_info: value_or_default(pkg.source_info.as_deref()),
        primary_package_purpose: value_or_default(pkg.primary_package_purpose.as_deref()),
        release_date: value_or_default(pkg.release_date.as_deref()),
        built_date: value_or_default(pkg.built_date.as_deref()),
        valid_until_date: value_or_default(pkg.valid_until_date.as_deref()),
        license_concluded: value_or_default(pkg.license_concluded.as_deref()),
        license_info_from_files: pkg.license_info_from_files.clone(),
        license_declared: declared_license(pkg.license_declared.as_deref()),
        license_comments: value_or_default(pkg.license_comments.as_deref()),
        copyright_text: value_or_default(pkg.copyright_text.as_deref()),
        summary: value_or_default(pkg.summary.as_deref()),
        description: value_or_default(pkg.description.as_deref()),
        package_comment: value_or_default(pkg.comment.as_deref()),
        external_refs: external_refs_from(&pkg.external_refs),
        attribution_text: pkg.attribution_texts.clone(),
        annotations: annotations_from(index.annotations_of(&pkg.spdx_id)),
        relationships: relationships_from(
            index
                .relationships_of(&pkg.spdx_id)
                .into_iter()
                .filter(|rel| {
                    !matches!(index.resolve(&rel.related_spdx_element), ElementRef::File(_))
                }),
        ),
        index: 0,
    })
}

/// Checksums with upper-cased algorithm names.
///
/// Any incomplete checksum degrades the whole set to empty.
pub fn checksums_from(checksums: &[SpdxChecksum]) -> Vec<ChecksumRecord> {
    if let Some(bad) = checksums.iter().find(|c| !c.is_complete()) {
        let e = MappingError::IncompleteChecksum {
            algorithm: bad.algorithm.clone(),
            value: bad.value.clone(),
        };
        tracing::warn!(error = %e, "Dropping package checksums");
        return Vec::new();
    }

    checksums
        .iter()
        .enumerate()
        .map(|(index, checksum)| ChecksumRecord {
            algorithm: checksum.algorithm.to_uppercase(),
            checksum_value: checksum.value.clone(),
            index,
        })
        .collect()
}

pub fn external_refs_from(refs: &[SpdxExternalRef]) -> Vec<ExternalRefRecord> {
    refs.iter()
        .enumerate()
        .map(|(index, r)| ExternalRefRecord {
            reference_category: r.category.clone(),
            reference_type: r.reference_type.clone(),
            reference_locator: r.locator.clone(),
            comment: value_or_default(r.comment.as_deref()),
            index,
        })
        .collect()
}

#[must_use]
pub fn verification_code_from(code: Option<&PackageVerificationCode>) -> VerificationCodeRecord {
    code.map(|c| VerificationCodeRecord {
        value: c.value.clone(),
        excluded_files: c.excluded_files.clone(),
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SpdxAnnotation, SpdxDocument};

    fn document_with(pkg: SpdxPackage) -> SpdxDocument {
        let mut doc = SpdxDocument::default();
        doc.packages.push(pkg);
        doc
    }

    #[test]
    fn test_package_information_requires_version() {
        let doc = document_with(SpdxPackage::new("SPDXRef-A", "a"));
        let index = SpdxDocumentIndex::build(&doc);
        assert!(package_information(&index, &doc.packages[0], "doc-1").is_none());
    }

    #[test]
    fn test_package_information_fields() {
        let mut pkg = SpdxPackage::new("SPDXRef-A", "openssl").with_version("3.0.1");
        pkg.license_declared = Some("NOASSERTION".into());
        pkg.license_concluded = Some("Apache-2.0".into());
        pkg.checksums = vec![
            SpdxChecksum::new("sha1", "aa"),
            SpdxChecksum::new("Sha256", "bb"),
        ];
        pkg.external_refs.push(SpdxExternalRef {
            category: "PACKAGE_MANAGER".into(),
            reference_type: "purl".into(),
            locator: "pkg:generic/openssl@3.0.1".into(),
            comment: None,
        });
        pkg.verification_code = Some(PackageVerificationCode {
            value: "d6a770ba38583ed4bb4525bd96e50461655d2758".into(),
            excluded_files: vec!["./package.spdx".into()],
        });
        let mut doc = document_with(pkg);
        doc.annotations.push(SpdxAnnotation {
            spdx_ref: "SPDXRef-A".into(),
            annotator: "Person: Jane".into(),
            annotation_type: "REVIEW".into(),
            comment: Some("looks fine".into()),
            ..SpdxAnnotation::default()
        });

        let index = SpdxDocumentIndex::build(&doc);
        let info = package_information(&index, &doc.packages[0], "doc-1").unwrap();
        assert_eq!(info.spdx_document_id, "doc-1");
        assert_eq!(info.version_info, "3.0.1");
        assert_eq!(info.license_declared, "");
        assert_eq!(info.license_concluded, "Apache-2.0");
        assert!(info.files_analyzed);
        assert_eq!(info.checksums.len(), 2);
        assert_eq!(info.checksums[0].algorithm, "SHA1");
        assert_eq!(info.checksums[1].algorithm, "SHA256");
        assert_eq!(info.checksums[1].index, 1);
        assert_eq!(info.external_refs[0].reference_type, "purl");
        assert_eq!(info.external_refs[0].comment, "");
        assert_eq!(info.verification_code.excluded_files.len(), 1);
        assert_eq!(info.annotations.len(), 1);
        assert_eq!(info.annotations[0].annotation_comment, "looks fine");
        assert_eq!(info.supplier, "");
        assert!(info.relationships.is_empty());
    }

    #[test]
    fn test_package_relationships_skip_files() {
        use crate::model::{RelationshipType, SpdxFile, SpdxRelationship};

        let mut doc = document_with(SpdxPackage::new("SPDXRef-A", "a").with_version("1"));
        doc.packages.push(SpdxPackage::new("SPDXRef-B", "b").with_version("2"));
        doc.files.push(SpdxFile {
            spdx_id: "SPDXRef-F".into(),
            ..SpdxFile::default()
        });
        for (kind, target) in [
            (RelationshipType::Contains, "SPDXRef-F"),
            (RelationshipType::DependsOn, "SPDXRef-B"),
        ] {
            doc.relationships
                .push(SpdxRelationship::new("SPDXRef-A", kind, target));
        }

        let index = SpdxDocumentIndex::build(&doc);
        let info = package_information(&index, &doc.packages[0], "doc-1").unwrap();
        assert_eq!(info.relationships.len(), 1);
        assert_eq!(info.relationships[0].relationship_type, "DEPENDS_ON");
        assert_eq!(info.relationships[0].index, 0);
    }

    #[test]
    fn test_incomplete_checksum_empties_set() {
        let checksums = vec![SpdxChecksum::new("SHA1", "aa"), SpdxChecksum::new("", "bb")];
        assert!(checksums_from(&checksums).is_empty());
    }
}
