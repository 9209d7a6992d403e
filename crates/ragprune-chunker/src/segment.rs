//! Shared segment machinery for the windowed strategies.
//!
//! Strategies reduce a document to an ordered list of [`Segment`]s (pieces of
//! element content with a packing weight), and the packer greedily merges
//! segments into chunk pieces bounded by a weight budget, carrying an overlap
//! tail between windows. Content is rebuilt by slicing the original element
//! text, so chunk spans always lie within their contributing elements' spans.

use ragprune_core::{ChunkPiece, ChunkType, ElementType, Metadata, StructuralElement};

/// A weighted slice of one element's content.
#[derive(Debug, Clone)]
pub(crate) struct Segment {
    /// Index into the document's element sequence
    pub element_idx: usize,
    /// Start byte offset within the element's content
    pub start: usize,
    /// End byte offset within the element's content
    pub end: usize,
    /// Packing weight (characters or tokens, per strategy)
    pub weight: usize,
}

impl Segment {
    pub(crate) fn text<'a>(&self, elements: &'a [StructuralElement]) -> &'a str {
        &elements[self.element_idx].content[self.start..self.end]
    }
}

/// Derive a chunk type from the element types contributing to a window.
pub(crate) fn derive_chunk_type(types: impl IntoIterator<Item = ElementType>) -> ChunkType {
    let (mut header, mut text, mut table, mut list, mut other) = (false, false, false, false, false);
    for t in types {
        match t {
            ElementType::Header => header = true,
            ElementType::Text => text = true,
            ElementType::Table => table = true,
            ElementType::List => list = true,
            ElementType::Figure | ElementType::PageBreak => other = true,
        }
    }

    match (header, text, table, list, other) {
        (false, _, false, false, false) => ChunkType::Text,
        (true, false, false, false, false) => ChunkType::Header,
        (true, true, false, false, false) => ChunkType::HeaderText,
        (false, false, true, false, false) => ChunkType::Table,
        (false, false, false, true, false) => ChunkType::List,
        _ => ChunkType::Mixed,
    }
}

/// Build one chunk piece from a non-empty window of segments.
///
/// Consecutive segments from the same element are merged into a single slice
/// of that element's content (keeping interior separators); slices from
/// different elements are joined with a blank line.
pub(crate) fn build_piece(elements: &[StructuralElement], window: &[Segment]) -> ChunkPiece {
    debug_assert!(!window.is_empty());

    let mut parts: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < window.len() {
        let elem_idx = window[i].element_idx;
        let group_start = window[i].start;
        let mut group_end = window[i].end;
        let mut j = i + 1;
        while j < window.len() && window[j].element_idx == elem_idx {
            group_end = window[j].end;
            j += 1;
        }
        parts.push(&elements[elem_idx].content[group_start..group_end]);
        i = j;
    }

    let first = &window[0];
    let last = window.last().expect("window is non-empty");

    ChunkPiece {
        content: parts.join("\n\n"),
        chunk_type: derive_chunk_type(window.iter().map(|s| elements[s.element_idx].element_type)),
        start_position: elements[first.element_idx].start_position + first.start,
        end_position: elements[last.element_idx].start_position + last.end,
        metadata: Metadata::new(),
    }
}

/// Greedily pack segments into pieces of at most `max_weight`, carrying at
/// most `overlap_weight` of trailing segments into the next window.
pub(crate) fn pack_segments(
    elements: &[StructuralElement],
    segments: &[Segment],
    max_weight: usize,
    overlap_weight: usize,
) -> Vec<ChunkPiece> {
    let mut pieces = Vec::new();
    let mut window: Vec<Segment> = Vec::new();
    let mut window_weight = 0usize;

    for seg in segments {
        if seg.start == seg.end {
            continue;
        }

        if !window.is_empty() && window_weight + seg.weight > max_weight {
            pieces.push(build_piece(elements, &window));

            let tail = overlap_tail(&window, overlap_weight);
            let tail_weight: usize = tail.iter().map(|s| s.weight).sum();
            // Carrying the full window, or an overlap that leaves no room for
            // the incoming segment, would stall the packer.
            if tail.len() < window.len() && tail_weight + seg.weight <= max_weight {
                window = tail;
                window_weight = tail_weight;
            } else {
                window.clear();
                window_weight = 0;
            }
        }

        window_weight += seg.weight;
        window.push(seg.clone());
    }

    if !window.is_empty() {
        pieces.push(build_piece(elements, &window));
    }

    pieces
}

/// The longest window suffix whose cumulative weight fits `overlap_weight`.
fn overlap_tail(window: &[Segment], overlap_weight: usize) -> Vec<Segment> {
    if overlap_weight == 0 {
        return Vec::new();
    }
    let mut acc = 0usize;
    let mut idx = window.len();
    while idx > 0 && acc + window[idx - 1].weight <= overlap_weight {
        acc += window[idx - 1].weight;
        idx -= 1;
    }
    window[idx..].to_vec()
}

// ============================================================================
// Text splitting
// ============================================================================

/// Byte ranges of sentences, cut after terminal punctuation.
pub(crate) fn split_sentences(text: &str) -> Vec<(usize, usize)> {
    split_sentences_with(text, &['.', '!', '?'])
}

/// Byte ranges of sentences, with configurable terminators.
pub(crate) fn split_sentences_with(text: &str, terminators: &[char]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if start.is_none() {
            if c.is_whitespace() {
                continue;
            }
            start = Some(i);
        }
        if terminators.contains(&c) {
            let at_boundary = match iter.peek() {
                Some((_, next)) => next.is_whitespace(),
                None => true,
            };
            if at_boundary {
                if let Some(s) = start.take() {
                    out.push((s, i + c.len_utf8()));
                }
            }
        }
    }

    if let Some(s) = start {
        let end = text.trim_end().len();
        if end > s {
            out.push((s, end));
        }
    }

    out
}

/// Byte ranges of whitespace-delimited words.
pub(crate) fn split_words(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, text.len()));
    }
    out
}

/// Recursively split text on a priority-ordered separator list until every
/// piece is at most `max_len` characters.
pub(crate) fn split_recursive(
    text: &str,
    separators: &[String],
    max_len: usize,
) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    split_recursive_into(text, 0, separators, max_len, &mut out);
    out
}

fn split_recursive_into(
    text: &str,
    base: usize,
    separators: &[String],
    max_len: usize,
    out: &mut Vec<(usize, usize)>,
) {
    if text.trim().is_empty() {
        return;
    }
    if text.chars().count() <= max_len || separators.is_empty() {
        push_trimmed(text, base, out);
        return;
    }

    let sep = &separators[0];
    let rest = &separators[1..];

    if sep.is_empty() {
        // Last resort: hard split every max_len characters.
        let mut count = 0usize;
        let mut seg_start = 0usize;
        for (i, _) in text.char_indices() {
            if count == max_len {
                out.push((base + seg_start, base + i));
                seg_start = i;
                count = 0;
            }
            count += 1;
        }
        if seg_start < text.len() {
            out.push((base + seg_start, base + text.len()));
        }
        return;
    }

    let mut part_start = 0usize;
    while let Some(pos) = text[part_start..].find(sep.as_str()) {
        let abs = part_start + pos;
        split_part(&text[part_start..abs], base + part_start, rest, max_len, out);
        part_start = abs + sep.len();
    }
    split_part(&text[part_start..], base + part_start, rest, max_len, out);
}

fn split_part(
    part: &str,
    base: usize,
    rest: &[String],
    max_len: usize,
    out: &mut Vec<(usize, usize)>,
) {
    if part.trim().is_empty() {
        return;
    }
    if part.chars().count() > max_len {
        split_recursive_into(part, base, rest, max_len, out);
    } else {
        push_trimmed(part, base, out);
    }
}

fn push_trimmed(text: &str, base: usize, out: &mut Vec<(usize, usize)>) {
    let lead = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push((base + lead, base + lead + trimmed.len()));
    }
}
