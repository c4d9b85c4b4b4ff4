use crate::chapter::normalize_spacing;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

// Chapter titles are occasionally in "blockquote" elements, so those are
// treated as text-bearing blocks alongside ordinary paragraphs.
static BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, blockquote, h2, h3").unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("head > title").unwrap());

/// Structural category of a text-bearing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Chapter-number heading (`h2`).
    Heading,
    /// Chapter-title subheading (`h3`).
    Subheading,
    /// Ordinary paragraph-like content (`p`, `blockquote`).
    Paragraph,
}

/// One text-bearing block element of a source document.
#[derive(Debug, Clone)]
pub struct Block {
    pub text: String,
    pub kind: BlockKind,
    pub has_image: bool,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            has_image: false,
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// Extract the ordered block sequence of a parsed HTML document.
pub fn html_blocks(doc: &Html) -> Vec<Block> {
    doc.select(&BLOCK_SELECTOR).map(block_from).collect()
}

/// The book title from the document head, normalized. `None` when the
/// document has no title or only a blank one.
pub fn book_title(doc: &Html) -> Option<String> {
    doc.select(&TITLE_SELECTOR)
        .next()
        .map(|el| normalize_spacing(&el.text().collect::<String>()))
        .filter(|title| !title.is_empty())
}

fn block_from(el: ElementRef<'_>) -> Block {
    let kind = match el.value().name() {
        "h2" => BlockKind::Heading,
        "h3" => BlockKind::Subheading,
        _ => BlockKind::Paragraph,
    };
    Block {
        text: el.text().collect::<String>(),
        kind,
        has_image: el.select(&IMG_SELECTOR).next().is_some(),
    }
}

/// Single-pass cursor over a document's blocks. Segmentation consumes
/// blocks destructively but may peek ahead without committing, which is
/// what header, title and table-of-contents handling require.
#[derive(Debug)]
pub struct BlockCursor {
    blocks: Vec<Block>,
    pos: usize,
}

impl BlockCursor {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks, pos: 0 }
    }

    pub fn peek(&self) -> Option<&Block> {
        self.blocks.get(self.pos)
    }

    pub fn advance(&mut self) -> Option<Block> {
        let block = self.blocks.get(self.pos).cloned();
        if block.is_some() {
            self.pos += 1;
        }
        block
    }

    /// The next block with non-blank text, without consuming anything.
    pub fn peek_next_nonblank(&self) -> Option<&Block> {
        self.blocks[self.pos..].iter().find(|b| !b.is_blank())
    }

    /// Consume up to and including the next non-blank block.
    pub fn skip_past_next_nonblank(&mut self) {
        while let Some(block) = self.advance() {
            if !block.is_blank() {
                break;
            }
        }
    }
}
