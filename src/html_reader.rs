use crate::block;
use crate::chapter::Chapter;
use crate::merge;
use crate::segment::{self, TocSkip};
use crate::walk;
use crate::writer;
use anyhow::{Context, Result};
use scraper::Html;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Books keyed by title; each book maps source files to the chapters
/// segmented from them.
type BookFileData = BTreeMap<String, Vec<(String, Vec<Chapter>)>>;

/// Read literature chapters stored as HTML files and write one text
/// file per book found. Files belonging to the same book (same
/// `<head><title>`) are merged in natural filename order. A failing
/// book is logged and skipped; it never affects the others.
pub fn extract(inpaths: &[PathBuf], outdir: &Path) -> Result<()> {
    let infiles = walk::collect_files(inpaths, walk::is_html_file);
    info!("will read {} file(s)", infiles.len());

    let mut books = BookFileData::new();
    let mut failed_books = BTreeSet::new();
    for path in &infiles {
        info!(path = %path.display(), "reading");
        if let Err(err) = read_file(path, &mut books, &mut failed_books) {
            warn!(path = %path.display(), "skipping file: {err:#}");
        }
    }
    info!("read data for {} book(s)", books.len());

    fs::create_dir_all(outdir)
        .with_context(|| format!("failed to create output directory {}", outdir.display()))?;

    let mut failures = failed_books.len();
    for (title, sources) in books {
        if failed_books.contains(&title) {
            continue;
        }
        if let Err(err) = write_book(&title, sources, outdir) {
            error!(book = %title, "extraction failed: {err:#}");
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("failed to extract {failures} book(s)");
    }
    Ok(())
}

fn read_file(
    path: &Path,
    books: &mut BookFileData,
    failed_books: &mut BTreeSet<String>,
) -> Result<()> {
    let html = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let doc = Html::parse_document(&html);
    let title = block::book_title(&doc).context("document has no usable <head><title>")?;
    debug!(book = %title, "parsing");

    // The legacy unconditional TOC skip matches these sources
    match segment::segment(block::html_blocks(&doc), TocSkip::Always) {
        Ok(chapters) if chapters.is_empty() => {}
        Ok(chapters) => books
            .entry(title)
            .or_default()
            .push((path.to_string_lossy().into_owned(), chapters)),
        Err(err) => {
            error!(book = %title, path = %path.display(), "segmentation failed: {err}");
            failed_books.insert(title);
        }
    }
    Ok(())
}

fn write_book(title: &str, sources: Vec<(String, Vec<Chapter>)>, outdir: &Path) -> Result<()> {
    let chapters = merge::merge_sources(sources)?;
    merge::validate(&chapters)?;
    let outfile = outdir.join(format!("{}.txt", sanitize_title(title)));
    info!(book = %title, outfile = %outfile.display(), "writing");
    let file = fs::File::create(&outfile)
        .with_context(|| format!("failed to create {}", outfile.display()))?;
    let mut out = BufWriter::new(file);
    writer::write_chapters(&chapters, &mut out)?;
    Ok(())
}

/// Output filenames come from book titles; path separators in a title
/// must not escape the output directory.
pub fn sanitize_title(title: &str) -> String {
    title.replace(['/', '\\'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_title_replaces_path_separators() {
        assert_eq!(sanitize_title("A/B\\C"), "A-B-C");
        assert_eq!(sanitize_title("Plain Title"), "Plain Title");
    }
}
