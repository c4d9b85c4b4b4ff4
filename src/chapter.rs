use once_cell::sync::Lazy;
use regex::Regex;

/// Sequence designators that are not chapter numerals.
pub const NON_NUMERIC_CHAPTER_SEQS: [&str; 2] = ["prologue", "epilogue"];

/// Longest non-numeric designator, used to short-circuit comparisons
/// against arbitrary paragraph text.
pub const MAX_NON_NUMERIC_SEQ_LEN: usize = 8;

static DIGITS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// One chapter of a book: a sequence designator (a numeral, "prologue"
/// or "epilogue"), a display title and the chapter's paragraphs.
///
/// During segmentation a `Chapter` acts as a mutable accumulator and
/// all three fields may still be empty; such placeholder chapters are
/// filtered out before merging and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chapter {
    pub seq: String,
    pub title: String,
    pub pars: Vec<String>,
}

impl Chapter {
    pub fn new(seq: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            seq: seq.into(),
            title: title.into(),
            pars: Vec::new(),
        }
    }

    /// A chapter is empty iff it carries no designator, no title and no
    /// paragraphs. The initial accumulator before the first recognized
    /// header is the usual producer of empty chapters.
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty() && self.title.is_empty() && self.pars.is_empty()
    }

    pub fn sort_key(&self) -> SeqKey {
        seq_sort_key(&self.seq)
    }
}

/// Collapse all runs of whitespace to single spaces and trim the ends.
pub fn normalize_spacing(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One run of a natural-ordering key: digit runs compare by magnitude,
/// everything else lexicographically. `Num` sorts before `Text` so a
/// bare numeral precedes any word at the same position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalPart {
    Num(u64),
    Text(String),
}

/// Split `text` into alternating non-digit/digit runs so that embedded
/// numbers sort by magnitude ("2" before "10").
pub fn natural_keys(text: &str) -> Vec<NaturalPart> {
    let mut parts = Vec::new();
    let mut last = 0;
    for m in DIGITS_PATTERN.find_iter(text) {
        if m.start() > last {
            parts.push(NaturalPart::Text(text[last..m.start()].to_string()));
        }
        match m.as_str().parse::<u64>() {
            Ok(n) => parts.push(NaturalPart::Num(n)),
            // A digit run too long for u64 still has to order somehow.
            Err(_) => parts.push(NaturalPart::Text(m.as_str().to_string())),
        }
        last = m.end();
    }
    if last < text.len() {
        parts.push(NaturalPart::Text(text[last..].to_string()));
    }
    parts
}

/// Composite ordering key for chapter designators: prologue sorts
/// before all numerals, epilogue after, numerals among themselves by
/// natural order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeqKey {
    group: i8,
    parts: Vec<NaturalPart>,
}

impl SeqKey {
    /// Theoretical minimum, used to seed monotonicity checks.
    pub fn min() -> Self {
        Self {
            group: i8::MIN,
            parts: Vec::new(),
        }
    }
}

pub fn seq_sort_key(seq: &str) -> SeqKey {
    let group = if seq.eq_ignore_ascii_case("prologue") {
        -1
    } else if seq.eq_ignore_ascii_case("epilogue") {
        1
    } else {
        0
    };
    SeqKey {
        group,
        parts: natural_keys(seq),
    }
}
