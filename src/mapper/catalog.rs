//! Catalog entities built from packages and uploads.

use super::values::{created_on_today, value_or_default};
use crate::model::{
    Attachment, AttachmentContent, AttachmentType, CheckStatus, Component, ComponentType,
    Project, Release, SpdxPackage, User,
};

/// Comment stored on every attachment created by an import.
pub const ATTACHMENT_COMMENT: &str = "Used for SPDX Bom import";

/// Component for a package, owned by the importing user's department.
#[must_use]
pub fn component_from_package(pkg: &SpdxPackage, user: &User) -> Component {
    let business_unit = if user.department.trim().is_empty() {
        tracing::warn!(
            user = %user.email,
            component = %pkg.name,
            "Importing user has no department, component gets no business unit"
        );
        None
    } else {
        Some(user.department.clone())
    };

    Component {
        id: None,
        name: pkg.name.clone(),
        component_type: ComponentType::Oss,
        business_unit,
        created_by: user.email.clone(),
        created_on: created_on_today(),
    }
}

/// Release for a package, or `None` when the package has no version.
#[must_use]
pub fn release_from_package(pkg: &SpdxPackage, component_id: &str, user: &User) -> Option<Release> {
    let version = pkg.version()?;
    Some(Release {
        id: None,
        name: pkg.name.clone(),
        version: version.to_string(),
        component_id: component_id.to_string(),
        created_by: user.email.clone(),
        created_on: created_on_today(),
        ..Release::default()
    })
}

/// Project for a package. A missing version becomes `""`.
#[must_use]
pub fn project_from_package(pkg: &SpdxPackage, user: &User) -> Project {
    Project {
        id: None,
        name: pkg.name.clone(),
        version: value_or_default(pkg.version()),
        created_by: user.email.clone(),
        created_on: created_on_today(),
        ..Project::default()
    }
}

/// Attachment recording the uploaded BOM itself.
#[must_use]
pub fn attachment_from_upload(content: &AttachmentContent, sha256: &str, user: &User) -> Attachment {
    Attachment {
        attachment_content_id: content.id.clone(),
        filename: content.filename.clone(),
        attachment_type: AttachmentType::ComponentLicenseInfoCombined,
        created_comment: ATTACHMENT_COMMENT.to_string(),
        created_by: user.email.clone(),
        created_on: created_on_today(),
        check_status: CheckStatus::NotChecked,
        sha256: sha256.to_string(),
    }
}
