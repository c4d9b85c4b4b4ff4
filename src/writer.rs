use crate::chapter::{Chapter, NON_NUMERIC_CHAPTER_SEQS};
use std::io::{self, Write};

/// Line separating chapters in the output file.
pub const CHAPTER_DELIM: &str =
    "================================================================";

/// Render a chapter list to the canonical plain-text layout: a header
/// line, a blank line, one paragraph per line, with a delimiter line
/// between chapters. Paragraph content is assumed already normalized.
pub fn write_chapters(chapters: &[Chapter], out: &mut impl Write) -> io::Result<()> {
    for (n, chapter) in chapters.iter().enumerate() {
        if n > 0 {
            writeln!(out, "\n")?;
            writeln!(out, "{CHAPTER_DELIM}")?;
        }
        write_chapter(chapter, out)?;
    }
    Ok(())
}

fn write_chapter(chapter: &Chapter, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}: {}", seq_desc(&chapter.seq), chapter.title)?;
    writeln!(out)?;
    writeln!(out)?;
    for par in &chapter.pars {
        writeln!(out, "{par}")?;
    }
    Ok(())
}

/// Display form of a sequence designator: "PROLOGUE"/"EPILOGUE" for the
/// non-numeric tokens, "CHAPTER N" otherwise.
fn seq_desc(seq: &str) -> String {
    if NON_NUMERIC_CHAPTER_SEQS
        .iter()
        .any(|token| seq.eq_ignore_ascii_case(token))
    {
        seq.to_uppercase()
    } else {
        format!("CHAPTER {seq}")
    }
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

    fn render(chapters: &[Chapter]) -> String {
        let mut buf = Vec::new();
        write_chapters(chapters, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn single_chapter_layout_is_exact() {
        let out = render(&[chapter("1", "The Start", &["Par one.", "Par two."])]);
        assert_eq!(out, "CHAPTER 1: The Start\n\n\nPar one.\nPar two.\n");
    }

    #[test]
    fn chapters_are_separated_by_delimiter_line() {
        let out = render(&[
            chapter("1", "One", &["a"]),
            chapter("2", "Two", &["b"]),
        ]);
        let expected = format!("CHAPTER 1: One\n\n\na\n\n\n{CHAPTER_DELIM}\nCHAPTER 2: Two\n\n\nb\n");
        assert_eq!(out, expected);
        assert_eq!(CHAPTER_DELIM.len(), 64);
        assert!(CHAPTER_DELIM.chars().all(|c| c == '='));
    }

    #[test]
    fn non_numeric_seqs_render_uppercase_without_chapter_prefix() {
        let out = render(&[chapter("prologue", "Origins", &["a"])]);
        assert!(out.starts_with("PROLOGUE: Origins\n"));
        let out = render(&[chapter("epilogue", "Last", &["a"])]);
        assert!(out.starts_with("EPILOGUE: Last\n"));
    }
}
