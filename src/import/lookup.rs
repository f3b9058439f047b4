//! Find-or-create helpers for components and releases.
//!
//! Each helper does one best-effort lookup by exact name and only writes on
//! a miss. The sink's own insert-if-absent keeps a racing import from
//! creating a duplicate between the lookup and the write.

use crate::error::{ErrorContext, Result};
use crate::mapper::component_from_package;
use crate::model::{Release, SpdxPackage, User};
use crate::sink::{BomSink, Response};

/// Component named after `pkg`, reused when one with that name exists.
pub fn find_or_create_component<S: BomSink + ?Sized>(
    sink: &S,
    pkg: &SpdxPackage,
    user: &User,
) -> Result<Response> {
    let existing = sink
        .search_component(&pkg.name)
        .with_context(|| format!("searching component '{}'", pkg.name))?;
    if let Some(id) = existing.and_then(|c| c.id) {
        tracing::debug!(component = %pkg.name, id = %id, "Reusing component");
        return Ok(Response::existing(id));
    }

    sink.add_component(component_from_package(pkg, user))
        .with_context(|| format!("adding component '{}'", pkg.name))
}

/// Store `release` unless one with the same qualified name exists.
///
/// A hit is reused as is, except that links the new release carries and
/// the stored one lacks are added to it.
pub fn find_or_create_release<S: BomSink + ?Sized>(sink: &S, release: Release) -> Result<Response> {
    let name = release.qualified_name();
    let existing = sink
        .search_release(&name)
        .with_context(|| format!("searching release '{name}'"))?;

    if let Some(found) = existing {
        let has_new_links = release
            .release_id_to_relationship
            .keys()
            .any(|id| !found.release_id_to_relationship.contains_key(id));
        if let (false, Some(id)) = (has_new_links, found.id) {
            tracing::debug!(release = %name, id = %id, "Reusing release");
            return Ok(Response::existing(id));
        }
    }

    sink.add_release(release)
        .with_context(|| format!("adding release '{name}'"))
}

/// Id of the stored release named `"{name} {version}"`, if any.
pub fn find_release_id<S: BomSink + ?Sized>(
    sink: &S,
    qualified_name: &str,
) -> Result<Option<String>> {
    Ok(sink
        .search_release(qualified_name)
        .with_context(|| format!("searching release '{qualified_name}'"))?
        .and_then(|r| r.id))
}
