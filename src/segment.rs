use crate::block::{Block, BlockCursor, BlockKind};
use crate::chapter::{normalize_spacing, Chapter, MAX_NON_NUMERIC_SEQ_LEN, NON_NUMERIC_CHAPTER_SEQS};
use crate::error::ExtractError;
use crate::nav::is_blacklisted_title;
use once_cell::sync::Lazy;
use regex::Regex;

static CHAPTER_HEADER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^CHAPTER\s*(\d+)?:?").unwrap());
static SINGLE_BOOK_END_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^The\s+End\s+of\s+the\s+\w+\s+Book\s+of").unwrap());
static BOOK_END_FIRST_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^The\s+End").unwrap());
static BOOK_END_SECOND_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^of\s+the\s+\w+\s+Book\s+of").unwrap());

const TOC_TITLE: &str = "table of contents";

/// How to treat the block following a "Table of Contents" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocSkip {
    /// Discard it unconditionally (legacy HTML sources, where it is
    /// always a TOC artifact such as "Start").
    Always,
    /// Discard it only when its normalized text is a blacklisted
    /// boilerplate title; otherwise leave it for normal processing.
    Blacklisted,
}

/// Segment one document's blocks into chapters. Documents carrying an
/// explicit heading/subheading structure are parsed from that; anything
/// else falls back to the linear heuristic scan.
pub fn segment(blocks: Vec<Block>, toc_skip: TocSkip) -> Result<Vec<Chapter>, ExtractError> {
    let structured = structured_chapters(&blocks);
    if !structured.is_empty() {
        return Ok(structured);
    }
    unstructured_chapters(blocks, toc_skip)
}

/// Structured path: chapter numbers live in heading blocks and chapter
/// titles in the subheading that follows. Returns no chapters when the
/// document has no headings, or when no pairing can be formed.
fn structured_chapters(blocks: &[Block]) -> Vec<Chapter> {
    let heading_idxs: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind == BlockKind::Heading)
        .map(|(idx, _)| idx)
        .collect();
    if heading_idxs.is_empty() {
        return Vec::new();
    }

    // (header, title) index pairs. Preferred: each heading paired with
    // the first subheading after it. Fallbacks for documents where the
    // two are not in 1:1 correspondence are heuristic and known to
    // mis-segment irregular heading counts.
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for &idx in &heading_idxs {
        match blocks[idx + 1..]
            .iter()
            .position(|b| b.kind == BlockKind::Subheading)
        {
            Some(offset) => pairs.push((idx, idx + 1 + offset)),
            None => {
                pairs.clear();
                break;
            }
        }
    }
    if pairs.is_empty() {
        if heading_idxs.len() == 2 {
            pairs.push((heading_idxs[0], heading_idxs[1]));
        } else {
            pairs = heading_idxs.chunks_exact(2).map(|c| (c[0], c[1])).collect();
        }
    }

    let mut chapters = Vec::new();
    for (n, &(header_idx, title_idx)) in pairs.iter().enumerate() {
        let boundary = pairs.get(n + 1).map(|&(h, _)| h).unwrap_or(blocks.len());
        chapters.push(structured_chapter(blocks, header_idx, title_idx, boundary));
    }
    chapters
}

fn structured_chapter(
    blocks: &[Block],
    header_idx: usize,
    title_idx: usize,
    boundary: usize,
) -> Chapter {
    let header_text = normalize_spacing(&blocks[header_idx].text);
    let seq = match CHAPTER_HEADER_PATTERN
        .captures(&header_text)
        .and_then(|caps| caps.get(1))
    {
        Some(numeral) => numeral.as_str().to_string(),
        // e.g. "Prologue" and "Epilogue" headings carry no numeral
        None => header_text.to_lowercase(),
    };
    let mut chapter = Chapter::new(seq, normalize_spacing(&blocks[title_idx].text));

    for idx in title_idx + 1..boundary {
        let block = &blocks[idx];
        if block.kind != BlockKind::Paragraph {
            continue;
        }
        let text = block.trimmed();
        if text.is_empty() {
            continue;
        }
        let next_nonblank = blocks[idx + 1..].iter().find(|b| !b.is_blank());
        if is_book_end(text, next_nonblank.map(|b| b.trimmed())) {
            break;
        }
        let normalized = normalize_spacing(text);
        if !normalized.is_empty() {
            chapter.pars.push(normalized);
        }
    }
    chapter
}

/// Unstructured path: linear scan over all blocks, recognizing chapter
/// headers, prologue/epilogue tokens, TOC markers and the end-of-book
/// marker by their text alone.
fn unstructured_chapters(
    blocks: Vec<Block>,
    toc_skip: TocSkip,
) -> Result<Vec<Chapter>, ExtractError> {
    let mut cursor = BlockCursor::new(blocks);
    let mut chapters = Vec::new();
    let mut current = Chapter::default();

    while let Some(block) = cursor.advance() {
        let text = block.trimmed();
        if text.is_empty() {
            continue;
        }
        if let Some(caps) = CHAPTER_HEADER_PATTERN.captures(text) {
            let sealed = std::mem::take(&mut current);
            let seq = match caps.get(1) {
                Some(numeral) => numeral.as_str().to_string(),
                // The numeral lives in the next block instead
                None => read_seq(&mut cursor, &sealed)?,
            };
            chapters.push(sealed);
            let title = read_title(&mut cursor)?;
            current = Chapter::new(seq, title);
        } else if is_non_numeric_seq(text) {
            chapters.push(std::mem::take(&mut current));
            let seq = text.to_lowercase();
            let title = read_title(&mut cursor)?;
            current = Chapter::new(seq, title);
        } else if is_toc_marker(text) {
            skip_toc_entry(&mut cursor, toc_skip);
        } else if is_book_end(text, cursor.peek_next_nonblank().map(|b| b.trimmed())) {
            // Everything after the end marker is back matter
            break;
        } else {
            let normalized = normalize_spacing(text);
            if !normalized.is_empty() {
                current.pars.push(normalized);
            }
        }
    }

    chapters.push(current);
    Ok(chapters.into_iter().filter(|c| !c.is_empty()).collect())
}

/// The block after a bare "Chapter" header holds the chapter numeral.
/// A blank numeral block means the numeral was omitted and must be
/// computed from the previous chapter's.
fn read_seq(cursor: &mut BlockCursor, previous: &Chapter) -> Result<String, ExtractError> {
    let seq_block = cursor.advance().ok_or_else(|| {
        ExtractError::UnterminatedHeader("stream ended before the chapter numeral".to_string())
    })?;
    let seq = seq_block.trimmed();
    if !seq.is_empty() {
        return Ok(seq.to_string());
    }
    match previous.seq.parse::<u64>() {
        Ok(n) => Ok((n + 1).to_string()),
        Err(_) => Err(ExtractError::AmbiguousContinuation(format!(
            "cannot increment non-numeric previous chapter seq {:?}",
            previous.seq
        ))),
    }
}

/// The block(s) after a recognized header hold the chapter title. A
/// blank block embedding an image is the chapter's decorative header
/// image; the title is read from the block after it.
fn read_title(cursor: &mut BlockCursor) -> Result<String, ExtractError> {
    let mut block = cursor.advance().ok_or_else(|| {
        ExtractError::UnterminatedHeader("stream ended before the chapter title".to_string())
    })?;
    let mut title = normalize_spacing(&block.text);
    while title.is_empty() && block.has_image {
        block = cursor.advance().ok_or_else(|| {
            ExtractError::UnterminatedHeader(
                "stream ended before the title following a header image".to_string(),
            )
        })?;
        title = normalize_spacing(&block.text);
    }
    if title.is_empty() {
        return Err(ExtractError::UnterminatedHeader(
            "chapter title block is empty".to_string(),
        ));
    }
    Ok(title)
}

fn skip_toc_entry(cursor: &mut BlockCursor, toc_skip: TocSkip) {
    match toc_skip {
        TocSkip::Always => {
            // The following block is TOC-related, e.g. "Start"
            cursor.advance();
        }
        TocSkip::Blacklisted => {
            let discard = cursor
                .peek_next_nonblank()
                .is_some_and(|b| is_blacklisted_title(&normalize_spacing(&b.text)));
            if discard {
                cursor.skip_past_next_nonblank();
            }
        }
    }
}

fn is_non_numeric_seq(text: &str) -> bool {
    text.len() <= MAX_NON_NUMERIC_SEQ_LEN
        && NON_NUMERIC_CHAPTER_SEQS
            .iter()
            .any(|seq| text.eq_ignore_ascii_case(seq))
}

fn is_toc_marker(text: &str) -> bool {
    text.len() <= TOC_TITLE.len() && text.eq_ignore_ascii_case(TOC_TITLE)
}

/// End-of-book back matter: a single "The End of the ... Book of"
/// paragraph, or "The End" with "of the ... Book of" in the next
/// non-blank block. A trailing "The End" with nothing after it also
/// counts.
fn is_book_end(text: &str, next_nonblank: Option<&str>) -> bool {
    if SINGLE_BOOK_END_PATTERN.is_match(text) {
        return true;
    }
    if !BOOK_END_FIRST_PATTERN.is_match(text) {
        return false;
    }
    match next_nonblank {
        Some(next) => BOOK_END_SECOND_PATTERN.is_match(next),
        None => true,
    }
}
