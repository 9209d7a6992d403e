//! Financial-document splitting.

use async_trait::async_trait;
use ragprune_core::{
    ChunkError, ChunkPiece, ChunkStrategy, ChunkType, ElementType, Metadata, MethodType, ParamMap,
    ParsedDocument,
};
use serde::Deserialize;
use tracing::debug;

use crate::params::{parse_params, validate_window};
use crate::segment::{pack_segments, split_recursive, Segment};

/// Lowercase substrings identifying financial statement sections.
const SECTION_PATTERNS: &[(&str, &[&str])] = &[
    ("balance_sheet", &["balance sheet", "statement of financial position"]),
    ("income_statement", &["income statement", "profit and loss", "statement of operations"]),
    ("cash_flow", &["cash flow"]),
    ("notes", &["notes to"]),
    ("audit", &["auditor", "audit report"]),
    ("ratios", &["financial highlights", "key ratios", "financial ratios"]),
];

/// Terms counted as financial entities alongside currency and percent figures.
const FINANCIAL_TERMS: &[&str] = &[
    "revenue", "profit", "loss", "assets", "liabilities", "equity", "ebitda", "margin", "income",
    "expenses", "cash", "dividend",
];

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FinancialParams {
    chunk_size: usize,
    chunk_overlap: usize,
    table_aware: bool,
    preserve_financial_structure: bool,
}

impl Default for FinancialParams {
    fn default() -> Self {
        Self {
            chunk_size: 5000,
            chunk_overlap: 500,
            table_aware: true,
            preserve_financial_structure: true,
        }
    }
}

/// Splits financial reports along statement sections, keeps tables whole, and
/// annotates every piece with the statement section it belongs to plus a
/// count of financial entities (currency amounts, percent figures, statement
/// terms) found in its content.
#[derive(Debug, Default)]
pub struct FinancialStrategy;

/// Classify a header line into a statement section.
fn classify_section(header: &str) -> &'static str {
    let lower = header.to_lowercase();
    for (section, patterns) in SECTION_PATTERNS {
        if patterns.iter().any(|p| lower.contains(p)) {
            return section;
        }
    }
    "general"
}

/// Count currency amounts, percent figures and financial statement terms.
fn count_financial_entities(text: &str) -> usize {
    let mut count = 0;
    let chars: Vec<char> = text.chars().collect();
    for i in 0..chars.len() {
        match chars[i] {
            '$' | '€' | '£' if chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()) => count += 1,
            '%' if i > 0 && chars[i - 1].is_ascii_digit() => count += 1,
            _ => {}
        }
    }
    count += text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .filter(|w| FINANCIAL_TERMS.contains(&w.to_lowercase().as_str()))
        .count();
    count
}

struct SectionState<'a> {
    section_type: &'static str,
    header: Option<&'a str>,
    run: Vec<usize>,
}

impl FinancialStrategy {
    fn flush_run(
        document: &ParsedDocument,
        state: &mut SectionState<'_>,
        params: &FinancialParams,
        pieces: &mut Vec<ChunkPiece>,
    ) {
        if state.run.is_empty() {
            return;
        }

        let mut segments = Vec::new();
        let seps: Vec<String> = ["\n\n", "\n", " ", ""].iter().map(|s| s.to_string()).collect();
        for &idx in &state.run {
            let element = &document.elements[idx];
            for (start, end) in split_recursive(&element.content, &seps, params.chunk_size) {
                let weight = element.content[start..end].chars().count();
                segments.push(Segment {
                    element_idx: idx,
                    start,
                    end,
                    weight,
                });
            }
        }

        for mut piece in pack_segments(
            &document.elements,
            &segments,
            params.chunk_size,
            params.chunk_overlap,
        ) {
            if let Some(header) = state.header {
                piece.content = format!("{header}\n\n{}", piece.content);
                piece.chunk_type = ChunkType::HeaderText;
            }
            annotate(&mut piece.metadata, "financial", state.section_type, &piece.content);
            pieces.push(piece);
        }
        state.run.clear();
    }
}

fn annotate(metadata: &mut Metadata, method: &str, section_type: &str, content: &str) {
    metadata.insert("chunking_method".to_string(), serde_json::json!(method));
    metadata.insert("section_type".to_string(), serde_json::json!(section_type));
    metadata.insert(
        "financial_entity_count".to_string(),
        serde_json::json!(count_financial_entities(content)),
    );
}

#[async_trait]
impl ChunkStrategy for FinancialStrategy {
    fn name(&self) -> &str {
        "financial"
    }

    fn method_type(&self) -> MethodType {
        MethodType::Financial
    }

    async fn split(
        &self,
        document: &ParsedDocument,
        params: &ParamMap,
    ) -> Result<Vec<ChunkPiece>, ChunkError> {
        let params: FinancialParams = parse_params(params)?;
        validate_window(params.chunk_size, params.chunk_overlap)?;

        let mut pieces = Vec::new();
        let mut state = SectionState {
            section_type: "general",
            header: None,
            run: Vec::new(),
        };

        for (idx, element) in document.elements.iter().enumerate() {
            match element.element_type {
                ElementType::Header if params.preserve_financial_structure => {
                    Self::flush_run(document, &mut state, &params, &mut pieces);
                    state.section_type = classify_section(&element.content);
                    state.header = Some(&element.content);
                }
                ElementType::Table if params.table_aware => {
                    Self::flush_run(document, &mut state, &params, &mut pieces);
                    let mut piece = ChunkPiece {
                        content: element.content.clone(),
                        chunk_type: ChunkType::Table,
                        start_position: element.start_position,
                        end_position: element.end_position,
                        metadata: Metadata::new(),
                    };
                    annotate(
                        &mut piece.metadata,
                        "financial_table",
                        state.section_type,
                        &element.content,
                    );
                    pieces.push(piece);
                }
                _ => state.run.push(idx),
            }
        }
        Self::flush_run(document, &mut state, &params, &mut pieces);

        debug!(pieces = pieces.len(), "financial split complete");
        Ok(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragprune_core::StructuralElement;

    fn element(content: &str, element_type: ElementType, start: usize) -> StructuralElement {
        StructuralElement::new(content, element_type, start, start + content.len())
    }

    fn statement() -> ParsedDocument {
        let elements = vec![
            element("Consolidated Balance Sheet", ElementType::Header, 0),
            element("Total assets were $12.4M at year end.", ElementType::Text, 30),
            element("Assets | 12.4 | 10.1\nLiabilities | 3.2 | 2.9", ElementType::Table, 70),
            element("Cash Flow Statement", ElementType::Header, 120),
            element("Operating cash flow improved 8% on lower expenses.", ElementType::Text, 142),
        ];
        ParsedDocument::new("", elements)
    }

    #[tokio::test]
    async fn test_tables_stay_whole() {
        let pieces = FinancialStrategy.split(&statement(), &ParamMap::new()).await.unwrap();
        let table: Vec<_> = pieces.iter().filter(|p| p.chunk_type == ChunkType::Table).collect();
        assert_eq!(table.len(), 1);
        assert!(table[0].content.contains("Liabilities"));
        assert_eq!(
            table[0].metadata["chunking_method"],
            serde_json::json!("financial_table")
        );
    }

    #[tokio::test]
    async fn test_section_classification() {
        let pieces = FinancialStrategy.split(&statement(), &ParamMap::new()).await.unwrap();
        assert_eq!(pieces[0].metadata["section_type"], serde_json::json!("balance_sheet"));
        let last = pieces.last().unwrap();
        assert_eq!(last.metadata["section_type"], serde_json::json!("cash_flow"));
        assert!(last.content.starts_with("Cash Flow Statement\n\n"));
    }

    #[tokio::test]
    async fn test_entity_counts() {
        assert_eq!(count_financial_entities("Revenue of $5.2M, margin 14%"), 4);
        assert_eq!(count_financial_entities("nothing numeric here"), 0);
        let pieces = FinancialStrategy.split(&statement(), &ParamMap::new()).await.unwrap();
        let first_count = pieces[0].metadata["financial_entity_count"]
            .as_u64()
            .unwrap();
        assert!(first_count >= 2);
    }

    #[tokio::test]
    async fn test_table_aware_off_inlines_tables() {
        let mut params = ParamMap::new();
        params.insert("table_aware".to_string(), serde_json::json!(false));
        let pieces = FinancialStrategy.split(&statement(), &params).await.unwrap();
        assert!(pieces.iter().all(|p| p.chunk_type != ChunkType::Table));
    }

    #[tokio::test]
    async fn test_structure_off_ignores_headers() {
        let mut params = ParamMap::new();
        params.insert(
            "preserve_financial_structure".to_string(),
            serde_json::json!(false),
        );
        let pieces = FinancialStrategy.split(&statement(), &params).await.unwrap();
        for piece in &pieces {
            assert_eq!(piece.metadata["section_type"], serde_json::json!("general"));
        }
    }

    #[tokio::test]
    async fn test_classify_section_patterns() {
        assert_eq!(classify_section("Consolidated Balance Sheet"), "balance_sheet");
        assert_eq!(classify_section("Statement of Operations"), "income_statement");
        assert_eq!(classify_section("Notes to the Financial Statements"), "notes");
        assert_eq!(classify_section("Independent Auditor's Report"), "audit");
        assert_eq!(classify_section("Management Discussion"), "general");
    }
}
