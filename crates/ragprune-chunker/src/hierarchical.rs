//! Hierarchy-preserving splitting.

use async_trait::async_trait;
use ragprune_core::{
    ChunkError, ChunkPiece, ChunkStrategy, ChunkType, ElementType, MethodType, ParamMap,
    ParsedDocument, StructuralElement,
};
use serde::Deserialize;
use tracing::debug;

use crate::params::{parse_params, validate_window};
use crate::segment::{pack_segments, split_recursive, Segment};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct HierarchicalParams {
    chunk_size: usize,
    chunk_overlap: usize,
    preserve_structure: bool,
    hierarchical_depth: usize,
}

impl Default for HierarchicalParams {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            chunk_overlap: 500,
            preserve_structure: true,
            hierarchical_depth: 3,
        }
    }
}

/// One header chain plus the content elements it governs.
struct Section {
    headers: Vec<usize>,
    content: Vec<usize>,
}

/// Groups elements into header-led sections and packs each section's content
/// separately, prefixing every produced piece with its header chain so chunks
/// stay interpretable out of context.
///
/// With `preserve_structure` disabled this degrades to sequential packing
/// over the whole element stream.
#[derive(Debug, Default)]
pub struct HierarchicalStrategy;

impl HierarchicalStrategy {
    fn sections(document: &ParsedDocument, depth: usize) -> Vec<Section> {
        let mut sections: Vec<Section> = Vec::new();
        let mut current = Section {
            headers: Vec::new(),
            content: Vec::new(),
        };

        for (idx, element) in document.elements.iter().enumerate() {
            if element.element_type == ElementType::Header {
                let starts_new = !current.content.is_empty() || current.headers.len() >= depth;
                if starts_new && (!current.headers.is_empty() || !current.content.is_empty()) {
                    if current.headers.len() >= depth && current.content.is_empty() {
                        // Chain already at depth; fold deeper headers into content.
                        current.content.push(idx);
                        continue;
                    }
                    sections.push(current);
                    current = Section {
                        headers: Vec::new(),
                        content: Vec::new(),
                    };
                }
                current.headers.push(idx);
            } else {
                current.content.push(idx);
            }
        }
        if !current.headers.is_empty() || !current.content.is_empty() {
            sections.push(current);
        }
        sections
    }

    fn content_segments(
        elements: &[StructuralElement],
        indices: &[usize],
        chunk_size: usize,
    ) -> Vec<Segment> {
        let mut segments = Vec::new();
        for &idx in indices {
            let element = &elements[idx];
            let seps: Vec<String> = ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect();
            for (start, end) in split_recursive(&element.content, &seps, chunk_size) {
                let weight = element.content[start..end].chars().count();
                segments.push(Segment {
                    element_idx: idx,
                    start,
                    end,
                    weight,
                });
            }
        }
        segments
    }
}

#[async_trait]
impl ChunkStrategy for HierarchicalStrategy {
    fn name(&self) -> &str {
        "hierarchical"
    }

    fn method_type(&self) -> MethodType {
        MethodType::Hierarchical
    }

    async fn split(
        &self,
        document: &ParsedDocument,
        params: &ParamMap,
    ) -> Result<Vec<ChunkPiece>, ChunkError> {
        let params: HierarchicalParams = parse_params(params)?;
        validate_window(params.chunk_size, params.chunk_overlap)?;

        if !params.preserve_structure {
            let all: Vec<usize> = (0..document.elements.len()).collect();
            let segments = Self::content_segments(&document.elements, &all, params.chunk_size);
            return Ok(pack_segments(
                &document.elements,
                &segments,
                params.chunk_size,
                params.chunk_overlap,
            ));
        }

        let sections = Self::sections(document, params.hierarchical_depth.max(1));
        let mut pieces = Vec::new();

        for section in &sections {
            let title: Option<String> = if section.headers.is_empty() {
                None
            } else {
                Some(
                    section
                        .headers
                        .iter()
                        .map(|&i| document.elements[i].content.as_str())
                        .collect::<Vec<_>>()
                        .join("\n\n"),
                )
            };
            let level = section.headers.len();

            if section.content.is_empty() {
                // A trailing header chain with nothing under it still surfaces,
                // unless the headers themselves carry no text.
                if let Some(&first) = section.headers.first() {
                    let content = title.clone().unwrap_or_default();
                    if content.trim().is_empty() {
                        continue;
                    }
                    let last = *section.headers.last().expect("non-empty headers");
                    let mut piece = ChunkPiece {
                        content,
                        chunk_type: ChunkType::Header,
                        start_position: document.elements[first].start_position,
                        end_position: document.elements[last].end_position,
                        metadata: ragprune_core::Metadata::new(),
                    };
                    annotate_section(&mut piece, &title, level);
                    pieces.push(piece);
                }
                continue;
            }

            let segments =
                Self::content_segments(&document.elements, &section.content, params.chunk_size);
            let packed = pack_segments(
                &document.elements,
                &segments,
                params.chunk_size,
                params.chunk_overlap,
            );

            for mut piece in packed {
                if let Some(title) = &title {
                    piece.content = format!("{title}\n\n{}", piece.content);
                    piece.chunk_type = ChunkType::HeaderText;
                }
                annotate_section(&mut piece, &title, level);
                pieces.push(piece);
            }
        }

        debug!(
            sections = sections.len(),
            pieces = pieces.len(),
            "hierarchical split complete"
        );
        Ok(pieces)
    }
}

fn annotate_section(piece: &mut ChunkPiece, title: &Option<String>, level: usize) {
    if let Some(title) = title {
        let first_line = title.lines().next().unwrap_or_default();
        piece
            .metadata
            .insert("section_title".to_string(), serde_json::json!(first_line));
    }
    piece
        .metadata
        .insert("hierarchical_level".to_string(), serde_json::json!(level));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(content: &str, element_type: ElementType, start: usize) -> StructuralElement {
        StructuralElement::new(content, element_type, start, start + content.len())
    }

    fn report() -> ParsedDocument {
        let elements = vec![
            element("Annual Report", ElementType::Header, 0),
            element("Overview of the fiscal year results.", ElementType::Text, 15),
            element("Revenue", ElementType::Header, 60),
            element("Revenue grew 15% year over year.", ElementType::Text, 70),
            element("Costs", ElementType::Header, 110),
            element("Operating costs were flat.", ElementType::Text, 118),
        ];
        ParsedDocument::new("", elements)
    }

    #[tokio::test]
    async fn test_sections_become_header_text_pieces() {
        let pieces = HierarchicalStrategy
            .split(&report(), &ParamMap::new())
            .await
            .unwrap();
        assert_eq!(pieces.len(), 3);
        for piece in &pieces {
            assert_eq!(piece.chunk_type, ChunkType::HeaderText);
        }
        assert!(pieces[1].content.starts_with("Revenue\n\n"));
        assert_eq!(pieces[1].metadata["section_title"], serde_json::json!("Revenue"));
    }

    #[tokio::test]
    async fn test_header_chain_depth_records_level() {
        let elements = vec![
            element("Part I", ElementType::Header, 0),
            element("Chapter 1", ElementType::Header, 8),
            element("Some body text.", ElementType::Text, 20),
        ];
        let doc = ParsedDocument::new("", elements);
        let pieces = HierarchicalStrategy.split(&doc, &ParamMap::new()).await.unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].metadata["hierarchical_level"], serde_json::json!(2));
        assert!(pieces[0].content.starts_with("Part I\n\nChapter 1\n\n"));
    }

    #[tokio::test]
    async fn test_trailing_header_surfaces() {
        let elements = vec![
            element("Body first.", ElementType::Text, 0),
            element("Appendix", ElementType::Header, 13),
        ];
        let doc = ParsedDocument::new("", elements);
        let pieces = HierarchicalStrategy.split(&doc, &ParamMap::new()).await.unwrap();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[1].chunk_type, ChunkType::Header);
        assert_eq!(pieces[1].content, "Appendix");
    }

    #[tokio::test]
    async fn test_blank_trailing_header_emits_nothing() {
        let elements = vec![
            element("Body first.", ElementType::Text, 0),
            element("", ElementType::Header, 13),
        ];
        let doc = ParsedDocument::new("", elements);
        let pieces = HierarchicalStrategy.split(&doc, &ParamMap::new()).await.unwrap();
        assert_eq!(pieces.len(), 1);
        for piece in &pieces {
            assert!(!piece.content.is_empty());
        }
    }

    #[tokio::test]
    async fn test_flat_mode_ignores_structure() {
        let mut params = ParamMap::new();
        params.insert("preserve_structure".to_string(), serde_json::json!(false));
        let pieces = HierarchicalStrategy.split(&report(), &params).await.unwrap();
        assert_eq!(pieces.len(), 1);
        assert!(pieces[0].metadata.get("section_title").is_none());
    }

    #[tokio::test]
    async fn test_large_section_splits_into_multiple_pieces() {
        let body = "sentence words here. ".repeat(20);
        let elements = vec![
            element("Notes", ElementType::Header, 0),
            element(body.trim(), ElementType::Text, 7),
        ];
        let doc = ParsedDocument::new("", elements);
        let mut params = ParamMap::new();
        params.insert("chunk_size".to_string(), serde_json::json!(100));
        params.insert("chunk_overlap".to_string(), serde_json::json!(0));
        let pieces = HierarchicalStrategy.split(&doc, &params).await.unwrap();
        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(piece.content.starts_with("Notes\n\n"));
            assert_eq!(piece.metadata["section_title"], serde_json::json!("Notes"));
        }
    }
}
