use crate::chapter::{normalize_spacing, seq_sort_key};
use crate::error::ExtractError;
use std::collections::HashMap;

/// Navigation labels that name front/back matter rather than chapters.
pub const TITLE_BLACKLIST: [&str; 13] = [
    "cover",
    "cover page",
    "title",
    "title page",
    "copyright",
    "copyright page",
    "dedication",
    "contents",
    "table of contents",
    "maps",
    "glossary",
    "about the author",
    "start",
];

pub fn is_blacklisted_title(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TITLE_BLACKLIST.contains(&lowered.as_str())
}

/// One entry of a book's navigation manifest: a display label and a
/// reference to the source document it points at.
#[derive(Debug, Clone)]
pub struct NavEntry {
    pub label: String,
    pub src: String,
}

/// An ordered chapter reference resolved from navigation: the sequence
/// designator and display name parsed out of the label(s), plus the
/// source document to segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterDescriptor {
    pub seq: String,
    pub name: String,
    pub src: String,
}

/// Turn raw navigation entries into chapter descriptors ordered by the
/// chapter sort key. Boilerplate labels are dropped, and entries that
/// reference the same source document are merged into one descriptor
/// (some books list a chapter number and its subtitle as two separate
/// navigation points).
pub fn resolve_navigation(entries: &[NavEntry]) -> Result<Vec<ChapterDescriptor>, ExtractError> {
    let mut src_order: Vec<&str> = Vec::new();
    let mut labels_by_src: HashMap<&str, Vec<String>> = HashMap::new();
    for entry in entries {
        let label = normalize_spacing(&entry.label);
        if is_blacklisted_title(&label) {
            continue;
        }
        labels_by_src
            .entry(entry.src.as_str())
            .or_insert_with(|| {
                src_order.push(entry.src.as_str());
                Vec::new()
            })
            .push(label);
    }

    let mut descriptors = Vec::new();
    for src in src_order {
        let joined = normalize_spacing(&labels_by_src[src].join(" "));
        if is_blacklisted_title(&joined) {
            continue;
        }
        let (seq, name) = parse_chapter_title(&joined);
        descriptors.push(ChapterDescriptor {
            seq,
            name,
            src: src.to_string(),
        });
    }

    if descriptors.is_empty() {
        return Err(ExtractError::EmptyNavigation);
    }
    descriptors.sort_by_key(|desc| seq_sort_key(&desc.seq));
    Ok(descriptors)
}

/// Split a navigation label into a sequence designator and a chapter
/// name: a leading "Chapter" token is dropped, the next token becomes
/// the designator and the rest the name.
fn parse_chapter_title(title: &str) -> (String, String) {
    let mut tokens = title.split_whitespace().peekable();
    if let Some(first) = tokens.peek() {
        if first.eq_ignore_ascii_case("chapter") {
            tokens.next();
        }
    }
    let seq = normalize_chapter_seq(tokens.next().unwrap_or(""));
    let name = tokens.collect::<Vec<_>>().join(" ");
    (seq, name)
}

fn normalize_chapter_seq(token: &str) -> String {
    let stripped = token.strip_suffix(':').unwrap_or(token);
    let lowered = stripped.to_lowercase();
    if lowered.starts_with("prologue") {
        "PROLOGUE".to_string()
    } else if lowered.starts_with("epilogue") {
        "EPILOGUE".to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, src: &str) -> NavEntry {
        NavEntry {
            label: label.to_string(),
            src: src.to_string(),
        }
    }

    #[test]
    fn boilerplate_labels_are_filtered() {
        let entries = vec![
            entry("Cover", "cover.html"),
            entry("Table of Contents", "toc.html"),
            entry("Chapter 1: The Start", "ch01.html"),
            entry("About the Author", "author.html"),
        ];
        let descs = resolve_navigation(&entries).unwrap();
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].seq, "1");
        assert_eq!(descs[0].name, "The Start");
        assert_eq!(descs[0].src, "ch01.html");
    }

    #[test]
    fn duplicate_src_labels_are_joined_before_parsing() {
        let entries = vec![
            entry("Chapter 3", "ch03.html"),
            entry("The Shadow Rising", "ch03.html"),
        ];
        let descs = resolve_navigation(&entries).unwrap();
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].seq, "3");
        assert_eq!(descs[0].name, "The Shadow Rising");
    }

    #[test]
    fn descriptors_sort_prologue_first_epilogue_last() {
        let entries = vec![
            entry("Epilogue: To Be Continued", "z.html"),
            entry("Chapter 10 Late", "j.html"),
            entry("Chapter 2 Early", "b.html"),
            entry("Prologue: Dragonmount", "a.html"),
        ];
        let seqs: Vec<String> = resolve_navigation(&entries)
            .unwrap()
            .into_iter()
            .map(|d| d.seq)
            .collect();
        assert_eq!(seqs, ["PROLOGUE", "2", "10", "EPILOGUE"]);
    }

    #[test]
    fn trailing_colon_is_stripped_from_seq() {
        let entries = vec![entry("Chapter 7: Out of the Woods", "ch07.html")];
        let descs = resolve_navigation(&entries).unwrap();
        assert_eq!(descs[0].seq, "7");
        assert_eq!(descs[0].name, "Out of the Woods");
    }

    #[test]
    fn empty_navigation_is_fatal() {
        let entries = vec![entry("Cover Page", "cover.html")];
        assert!(matches!(
            resolve_navigation(&entries),
            Err(ExtractError::EmptyNavigation)
        ));
        assert!(matches!(
            resolve_navigation(&[]),
            Err(ExtractError::EmptyNavigation)
        ));
    }
}
