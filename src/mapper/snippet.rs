//! Snippet records and their ranges.

use super::values::value_or_default;
use crate::error::MappingError;
use crate::model::{
    PointerKind, RangeType, SnippetInformation, SnippetRange, SpdxSnippet, StartEndPointer,
};

/// Slot of each range kind in [`SnippetInformation::snippet_ranges`].
const BYTE_RANGE_INDEX: usize = 0;
const LINE_RANGE_INDEX: usize = 1;

pub fn snippets_from(snippets: &[SpdxSnippet]) -> Vec<SnippetInformation> {
    snippets
        .iter()
        .enumerate()
        .map(|(index, snippet)| snippet_information(snippet, index))
        .collect()
}

#[must_use]
pub fn snippet_information(snippet: &SpdxSnippet, index: usize) -> SnippetInformation {
    SnippetInformation {
        spdx_id: snippet.spdx_id.clone(),
        snippet_from_file: snippet.snippet_from_file.clone(),
        snippet_ranges: snippet_ranges(snippet),
        license_concluded: value_or_default(snippet.license_concluded.as_deref()),
        license_info_in_snippets: snippet.license_info_in_snippet.clone(),
        license_comments: value_or_default(snippet.license_comments.as_deref()),
        copyright_text: value_or_default(snippet.copyright_text.as_deref()),
        comment: value_or_default(snippet.comment.as_deref()),
        name: value_or_default(snippet.name.as_deref()),
        snippet_attribution_text: snippet.attribution_texts.join("|"),
        index,
    }
}

/// Byte range first, then the line range if there is one.
///
/// A range whose pointers are missing or of different kinds is logged and
/// left out; the rest of the snippet still maps.
pub fn snippet_ranges(snippet: &SpdxSnippet) -> Vec<SnippetRange> {
    let mut ranges = Vec::with_capacity(2);
    let candidates = [
        (Some(&snippet.byte_range), BYTE_RANGE_INDEX),
        (snippet.line_range.as_ref(), LINE_RANGE_INDEX),
    ];

    for (pointer, index) in candidates {
        let Some(pointer) = pointer.filter(|p| !p.is_empty()) else {
            continue;
        };
        match snippet_range(pointer, index) {
            Ok(range) => ranges.push(range),
            Err(e) => tracing::warn!(
                snippet = %snippet.spdx_id,
                error = %e,
                "Skipping snippet range"
            ),
        }
    }
    ranges
}

fn snippet_range(pointer: &StartEndPointer, index: usize) -> Result<SnippetRange, MappingError> {
    let start = pointer
        .start
        .as_ref()
        .ok_or(MappingError::MissingPointer("start"))?;
    let end = pointer
        .end
        .as_ref()
        .ok_or(MappingError::MissingPointer("end"))?;
    if start.kind != end.kind {
        return Err(MappingError::MismatchedPointers {
            start: start.kind.to_string(),
            end: end.kind.to_string(),
        });
    }

    let range_type = match start.kind {
        PointerKind::ByteOffset => RangeType::Byte,
        PointerKind::LineNumber => RangeType::Line,
    };
    Ok(SnippetRange {
        range_type,
        start_pointer: start.value.to_string(),
        end_pointer: end.value.to_string(),
        reference: start.reference.clone(),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SinglePointer;

    fn byte_snippet() -> SpdxSnippet {
        SpdxSnippet {
            spdx_id: "SPDXRef-Snippet".into(),
            snippet_from_file: "SPDXRef-File".into(),
            byte_range: StartEndPointer::new(
                SinglePointer::byte_offset("SPDXRef-File", 10),
                SinglePointer::byte_offset("SPDXRef-File", 42),
            ),
            ..SpdxSnippet::default()
        }
    }

    #[test]
    fn test_byte_range_only() {
        let ranges = snippet_ranges(&byte_snippet());
        assert_eq!(
            ranges,
            vec![SnippetRange {
                range_type: RangeType::Byte,
                start_pointer: "10".into(),
                end_pointer: "42".into(),
                reference: "SPDXRef-File".into(),
                index: 0,
            }]
        );
    }

    #[test]
    fn test_line_range_gets_second_slot() {
        let mut snippet = byte_snippet();
        snippet.line_range = Some(StartEndPointer::new(
            SinglePointer::line_number("SPDXRef-File", 3),
            SinglePointer::line_number("SPDXRef-File", 5),
        ));

        let ranges = snippet_ranges(&snippet);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].range_type, RangeType::Line);
        assert_eq!(ranges[1].start_pointer, "3");
        assert_eq!(ranges[1].end_pointer, "5");
        assert_eq!(ranges[1].index, 1);
    }

    #[test]
    fn test_bad_range_is_skipped() {
        let mut snippet = byte_snippet();
        snippet.byte_range.end = None;
        snippet.line_range = Some(StartEndPointer::new(
            SinglePointer::line_number("SPDXRef-File", 3),
            SinglePointer::byte_offset("SPDXRef-File", 5),
        ));
        assert!(snippet_ranges(&snippet).is_empty());

        let info = snippet_information(&snippet, 4);
        assert_eq!(info.index, 4);
        assert_eq!(info.spdx_id, "SPDXRef-Snippet");
    }

    #[test]
    fn test_attribution_texts_joined() {
        let mut snippet = byte_snippet();
        snippet.attribution_texts = vec!["first".into(), "second".into()];
        let info = snippet_information(&snippet, 0);
        assert_eq!(info.snippet_attribution_text, "first|second");
        assert_eq!(info.license_concluded, "");
    }
}
