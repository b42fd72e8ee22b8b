use crate::error::IngestError;
use crate::models::{Chunk, ChunkingOptions, Record};
use regex::Regex;

const SENTENCE_END_PATTERN: &str = r#"[.!?]["')\]]?\s"#;

/// Splits every record into overlapping character windows of at most
/// `max_chars`, recording each window's true start offset.
///
/// Window ends prefer a paragraph, sentence, or word break found in the tail
/// of the window over a hard character cut. The next window always starts
/// exactly `overlap_chars` before the previous window's actual end, so the
/// trailing overlap of one chunk is byte-for-byte the head of the next and
/// no character of the record is dropped.
pub fn split_records(
    records: &[Record],
    options: ChunkingOptions,
) -> Result<Vec<Chunk>, IngestError> {
    if options.max_chars == 0 {
        return Err(IngestError::InvalidChunkConfig(
            "max_chars must be positive".to_string(),
        ));
    }
    if options.overlap_chars >= options.max_chars {
        return Err(IngestError::InvalidChunkConfig(format!(
            "overlap {} must be smaller than max size {}",
            options.overlap_chars, options.max_chars
        )));
    }

    let sentence_re = Regex::new(SENTENCE_END_PATTERN)?;

    let mut chunks = Vec::new();
    for record in records {
        split_text(record, options, &sentence_re, &mut chunks);
    }

    Ok(chunks)
}

fn split_text(
    record: &Record,
    options: ChunkingOptions,
    sentence_re: &Regex,
    out: &mut Vec<Chunk>,
) {
    let chars: Vec<char> = record.text.chars().collect();
    let total = chars.len();

    let mut start = 0;
    while start < total {
        let hard_end = (start + options.max_chars).min(total);
        let end = if hard_end == total {
            total
        } else {
            snap_end(&chars, start, hard_end, options, sentence_re)
        };

        out.push(Chunk {
            text: chars[start..end].iter().collect(),
            start_index: start,
            metadata: record.metadata.clone(),
        });

        if end == total {
            break;
        }
        start = end - options.overlap_chars;
    }
}

/// Picks the window end: the last natural break inside the window tail, or
/// `hard_end` when none exists. The cut never lands at or before
/// `start + overlap`, which keeps every step strictly forward.
fn snap_end(
    chars: &[char],
    start: usize,
    hard_end: usize,
    options: ChunkingOptions,
    sentence_re: &Regex,
) -> usize {
    let tail_window = (options.max_chars / 5).max(1);
    let floor = (start + options.overlap_chars + 1).max(hard_end.saturating_sub(tail_window));
    if floor >= hard_end {
        return hard_end;
    }

    let tail: String = chars[floor..hard_end].iter().collect();
    match boundary_cut(&tail, sentence_re) {
        Some(cut) if cut > 0 => floor + cut,
        _ => hard_end,
    }
}

/// Char offset just past the last paragraph break, sentence end, or
/// whitespace run in `tail`, in that order of preference.
fn boundary_cut(tail: &str, sentence_re: &Regex) -> Option<usize> {
    if let Some(pos) = tail.rfind("\n\n") {
        return Some(char_offset(tail, pos + 2));
    }
    if let Some(found) = sentence_re.find_iter(tail).last() {
        return Some(char_offset(tail, found.end()));
    }
    if let Some(pos) = tail.rfind(char::is_whitespace) {
        let break_len = tail[pos..].chars().next().map_or(1, char::len_utf8);
        return Some(char_offset(tail, pos + break_len));
    }
    None
}

fn char_offset(text: &str, byte_pos: usize) -> usize {
    text[..byte_pos].chars().count()
}
