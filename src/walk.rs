use crate::chapter::natural_keys;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

static HTML_EXTENSION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^x?html?$").unwrap());

pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HTML_EXTENSION_PATTERN.is_match(ext))
}

pub fn is_epub_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase()),
        Some(ext) if ext == "epub"
    )
}

/// Collect all files under the given paths (directories are walked
/// recursively, symlinks followed) that satisfy `matches`, deduplicated
/// and in natural-key order of their full path.
pub fn collect_files(inpaths: &[PathBuf], matches: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for inpath in inpaths {
        if inpath.is_dir() {
            walk_dir(inpath, &matches, &mut found);
        } else if matches(inpath) {
            found.insert(inpath.clone());
        }
    }
    let mut files: Vec<PathBuf> = found.into_iter().collect();
    files.sort_by_key(|path| natural_keys(&path.to_string_lossy()));
    files
}

fn walk_dir(dir: &Path, matches: &impl Fn(&Path) -> bool, found: &mut BTreeSet<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(dir = %dir.display(), "failed to read directory: {err}");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, matches, found);
        } else if matches(&path) {
            found.insert(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_extensions_match_case_insensitively() {
        assert!(is_html_file(Path::new("a/b/chapter.html")));
        assert!(is_html_file(Path::new("chapter.HTM")));
        assert!(is_html_file(Path::new("chapter.xhtml")));
        assert!(!is_html_file(Path::new("chapter.txt")));
        assert!(!is_html_file(Path::new("html")));
    }

    #[test]
    fn epub_extension_matches() {
        assert!(is_epub_file(Path::new("book.epub")));
        assert!(is_epub_file(Path::new("book.EPUB")));
        assert!(!is_epub_file(Path::new("book.zip")));
    }

    #[test]
    fn collect_orders_files_naturally() {
        let dir = std::env::temp_dir().join(format!("book2txt-walk-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for name in ["b_010.html", "b_002.html", "notes.txt"] {
            fs::write(dir.join(name), "x").unwrap();
        }
        let files = collect_files(&[dir.clone()], is_html_file);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["b_002.html", "b_010.html"]);
        fs::remove_dir_all(&dir).unwrap();
    }
}
