use crate::block;
use crate::chapter::normalize_spacing;
use crate::html_reader::sanitize_title;
use crate::merge;
use crate::nav::{self, NavEntry};
use crate::segment::{self, TocSkip};
use crate::walk;
use crate::writer;
use anyhow::{anyhow, Context, Result};
use epub::doc::{EpubDoc, NavPoint};
use scraper::Html;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Read literature chapters stored in EPUB format and write one text
/// file per book found. A failing book is logged and skipped; it never
/// affects the others.
pub fn extract(inpaths: &[PathBuf], outdir: &Path) -> Result<()> {
    let infiles = walk::collect_files(inpaths, walk::is_epub_file);
    info!("will read {} file(s)", infiles.len());

    fs::create_dir_all(outdir)
        .with_context(|| format!("failed to create output directory {}", outdir.display()))?;

    let mut failures = 0usize;
    for path in &infiles {
        info!(path = %path.display(), "reading");
        match extract_book(path, outdir) {
            Ok(title) => info!(book = %title, "extracted"),
            Err(err) => {
                error!(path = %path.display(), "extraction failed: {err:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("failed to extract {failures} book(s)");
    }
    Ok(())
}

fn extract_book(path: &Path, outdir: &Path) -> Result<String> {
    let mut doc = EpubDoc::new(path)
        .with_context(|| format!("failed to open EPUB at {}", path.display()))?;
    let title = book_title(&doc, path);
    debug!(book = %title, "parsing");

    let entries = nav_entries(&doc.toc);
    let descriptors = nav::resolve_navigation(&entries)?;

    let mut chapters = Vec::new();
    for desc in &descriptors {
        debug!(src = %desc.src, seq = %desc.seq, "parsing document");
        let content = doc
            .get_resource_str_by_path(&desc.src)
            .ok_or_else(|| anyhow!("missing resource {}", desc.src))?;
        let html = Html::parse_document(&content);
        chapters.extend(segment::segment(
            block::html_blocks(&html),
            TocSkip::Blacklisted,
        )?);
    }
    debug!(book = %title, chapters = chapters.len(), "parsed");

    let mut merged = Vec::new();
    merge::merge_into(chapters, &mut merged)?;
    merge::validate(&merged)?;

    let outfile = outdir.join(format!("{}.txt", sanitize_title(&title)));
    info!(book = %title, outfile = %outfile.display(), "writing");
    let file = fs::File::create(&outfile)
        .with_context(|| format!("failed to create {}", outfile.display()))?;
    let mut out = BufWriter::new(file);
    writer::write_chapters(&merged, &mut out)?;
    Ok(title)
}

fn book_title<R: std::io::Read + std::io::Seek>(doc: &EpubDoc<R>, path: &Path) -> String {
    resolve_book_title(doc.mdata("title").map(|t| t.value.clone()), path)
}

fn resolve_book_title(title: Option<String>, path: &Path) -> String {
    match title.map(|t| normalize_spacing(&t)) {
        Some(title) if !title.is_empty() => title,
        // Books without title metadata fall back to the filename
        _ => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string()),
    }
}

/// Flatten the navigation tree into label/source pairs in document
/// order, dropping fragment suffixes so entries pointing into the same
/// document group together.
fn nav_entries(points: &[NavPoint]) -> Vec<NavEntry> {
    let mut entries = Vec::new();
    flatten_nav(points, &mut entries);
    entries
}

fn flatten_nav(points: &[NavPoint], entries: &mut Vec<NavEntry>) {
    for point in points {
        let content = point.content.to_string_lossy();
        let src = content.split('#').next().unwrap_or_default().to_string();
        entries.push(NavEntry {
            label: point.label.clone(),
            src,
        });
        flatten_nav(&point.children, entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav_point(label: &str, content: &str, children: Vec<NavPoint>) -> NavPoint {
        NavPoint {
            label: label.to_string(),
            content: PathBuf::from(content),
            children,
            play_order: Some(0),
        }
    }

    #[test]
    fn nav_entries_flatten_children_and_strip_fragments() {
        let points = vec![
            nav_point(
                "Part One",
                "OEBPS/part1.html",
                vec![nav_point("Chapter 1", "OEBPS/ch01.html#start", vec![])],
            ),
            nav_point("Chapter 2", "OEBPS/ch02.html", vec![]),
        ];
        let entries = nav_entries(&points);
        let srcs: Vec<&str> = entries.iter().map(|e| e.src.as_str()).collect();
        assert_eq!(
            srcs,
            ["OEBPS/part1.html", "OEBPS/ch01.html", "OEBPS/ch02.html"]
        );
        assert_eq!(entries[1].label, "Chapter 1");
    }

    #[test]
    fn book_title_normalizes_metadata_value() {
        let path = Path::new("books/wheel_01.epub");
        assert_eq!(
            resolve_book_title(Some("  The Eye\n of the   World ".to_string()), path),
            "The Eye of the World"
        );
    }

    #[test]
    fn book_title_falls_back_to_file_stem() {
        let path = Path::new("books/wheel_01.epub");
        assert_eq!(resolve_book_title(None, path), "wheel_01");
        assert_eq!(resolve_book_title(Some("   ".to_string()), path), "wheel_01");
    }
}
