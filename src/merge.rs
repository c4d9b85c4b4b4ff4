use crate::chapter::{natural_keys, Chapter, SeqKey};
use crate::error::ExtractError;

/// Fold one document's chapters onto the accumulated book. A chapter
/// without a sequence designator is the continuation of a chapter split
/// across a document boundary; its paragraphs belong to the previous
/// chapter.
pub fn merge_into(addend: Vec<Chapter>, augend: &mut Vec<Chapter>) -> Result<(), ExtractError> {
    for chapter in addend {
        if chapter.seq.is_empty() {
            debug_assert!(chapter.title.is_empty());
            match augend.last_mut() {
                Some(previous) => previous.pars.extend(chapter.pars),
                None => {
                    return Err(ExtractError::AmbiguousContinuation(
                        "headerless leading chapter has no predecessor to merge into".to_string(),
                    ))
                }
            }
        } else {
            augend.push(chapter);
        }
    }
    Ok(())
}

/// Merge per-source chapter lists of one logical book into a single
/// ordered list. Sources are ordered by natural-key comparison of their
/// identifiers, so "b_2.html" precedes "b_10.html".
pub fn merge_sources(
    mut sources: Vec<(String, Vec<Chapter>)>,
) -> Result<Vec<Chapter>, ExtractError> {
    sources.sort_by_key(|(id, _)| natural_keys(id));
    let mut merged = Vec::new();
    for (_, chapters) in sources {
        merge_into(chapters, &mut merged)?;
    }
    Ok(merged)
}

/// Check a merged chapter list for monotonic ordering and structural
/// completeness.
pub fn validate(chapters: &[Chapter]) -> Result<(), ExtractError> {
    let mut prev_key = SeqKey::min();
    for chapter in chapters {
        let key = chapter.sort_key();
        if key < prev_key {
            return Err(ExtractError::OutOfOrder {
                seq: chapter.seq.clone(),
                title: chapter.title.clone(),
            });
        }
        let missing = if chapter.seq.is_empty() {
            Some("seq")
        } else if chapter.title.is_empty() {
            Some("title")
        } else if chapter.pars.is_empty() {
            Some("pars")
        } else {
            None
        };
        if let Some(field) = missing {
            return Err(ExtractError::IncompleteChapter {
                field,
                seq: chapter.seq.clone(),
                title: chapter.title.clone(),
            });
        }
        prev_key = key;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(seq: &str, title: &str, pars: &[&str]) -> Chapter {
        Chapter {
            seq: seq.to_string(),
            title: title.to_string(),
            pars: pars.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn continuation(pars: &[&str]) -> Chapter {
        chapter("", "", pars)
    }

    #[test]
    fn continuation_stitches_across_file_boundary() {
        let sources = vec![
            (
                "b_002.html".to_string(),
                vec![continuation(&["Continued paragraph."])],
            ),
            (
                "b_001.html".to_string(),
                vec![chapter("1", "The Start", &["Opening paragraph."])],
            ),
        ];
        let merged = merge_sources(sources).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].pars, ["Opening paragraph.", "Continued paragraph."]);
    }

    #[test]
    fn sources_order_by_natural_key() {
        let sources = vec![
            (
                "b_010.html".to_string(),
                vec![chapter("10", "Late", &["x"])],
            ),
            (
                "b_002.html".to_string(),
                vec![chapter("2", "Early", &["y"])],
            ),
        ];
        let merged = merge_sources(sources).unwrap();
        assert_eq!(merged[0].seq, "2");
        assert_eq!(merged[1].seq, "10");
    }

    #[test]
    fn leading_headerless_chapter_is_fatal() {
        let sources = vec![(
            "b_001.html".to_string(),
            vec![continuation(&["Orphaned paragraph."])],
        )];
        assert!(matches!(
            merge_sources(sources),
            Err(ExtractError::AmbiguousContinuation(_))
        ));
    }

    #[test]
    fn validate_accepts_ordered_complete_chapters() {
        let chapters = vec![
            chapter("prologue", "Origins", &["a"]),
            chapter("2", "Early", &["b"]),
            chapter("10", "Late", &["c"]),
            chapter("epilogue", "Last", &["d"]),
        ];
        assert!(validate(&chapters).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_order() {
        let chapters = vec![
            chapter("10", "Late", &["a"]),
            chapter("2", "Early", &["b"]),
        ];
        let err = validate(&chapters).unwrap_err();
        assert!(matches!(err, ExtractError::OutOfOrder { ref seq, .. } if seq == "2"));
    }

    #[test]
    fn validate_rejects_incomplete_chapters() {
        let err = validate(&[chapter("1", "", &["a"])]).unwrap_err();
        assert!(matches!(err, ExtractError::IncompleteChapter { field: "title", .. }));

        let err = validate(&[chapter("1", "Title", &[])]).unwrap_err();
        assert!(matches!(err, ExtractError::IncompleteChapter { field: "pars", .. }));
    }
}
