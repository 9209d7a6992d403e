//! Built-in chunking method catalog.

use ragprune_core::{ChunkingMethod, MethodType, ParamMap};
use serde_json::json;

/// Bump when the built-in method set or its default parameters change.
pub const CATALOG_VERSION: u32 = 1;

fn params(entries: &[(&str, serde_json::Value)]) -> ParamMap {
    let mut map = ParamMap::new();
    for (key, value) in entries {
        map.insert((*key).to_string(), value.clone());
    }
    map
}

/// The built-in chunking method configurations.
///
/// The catalog is configuration seed data: callers look methods up by name
/// or type, tweak parameters, and hand them to the producer. Deactivating a
/// method hides it from `active()` without losing its parameters.
#[derive(Debug, Clone)]
pub struct MethodCatalog {
    methods: Vec<ChunkingMethod>,
}

impl MethodCatalog {
    /// The catalog of built-in methods, one per method type.
    #[must_use]
    pub fn builtin() -> Self {
        let methods = vec![
            ChunkingMethod {
                name: "unstructured".to_string(),
                method_type: MethodType::Unstructured,
                description: "Element stream from the unstructured.io parser".to_string(),
                parameters: params(&[
                    ("strategy", json!("auto")),
                    ("include_page_breaks", json!(true)),
                    ("chunk_size", json!(5000)),
                    ("chunk_overlap", json!(500)),
                ]),
                is_active: true,
            },
            ChunkingMethod {
                name: "llamaparse".to_string(),
                method_type: MethodType::Llamaparse,
                description: "Element stream from the LlamaParse parser".to_string(),
                parameters: params(&[
                    ("result_type", json!("markdown")),
                    ("language", json!("en")),
                    ("chunk_size", json!(5000)),
                    ("chunk_overlap", json!(500)),
                ]),
                is_active: true,
            },
            ChunkingMethod {
                name: "hierarchical".to_string(),
                method_type: MethodType::Hierarchical,
                description: "Header-led sections with hierarchy preserved".to_string(),
                parameters: params(&[
                    ("chunk_size", json!(5000)),
                    ("chunk_overlap", json!(500)),
                    ("preserve_structure", json!(true)),
                    ("hierarchical_depth", json!(3)),
                ]),
                is_active: true,
            },
            ChunkingMethod {
                name: "semantic".to_string(),
                method_type: MethodType::Semantic,
                description: "Topic-shift boundaries via similarity scoring".to_string(),
                parameters: params(&[
                    ("semantic_threshold", json!(0.7)),
                    ("min_chunk_size", json!(500)),
                    ("max_chunk_size", json!(10000)),
                ]),
                is_active: true,
            },
            ChunkingMethod {
                name: "financial".to_string(),
                method_type: MethodType::Financial,
                description: "Statement sections and whole tables for financial reports"
                    .to_string(),
                parameters: params(&[
                    ("chunk_size", json!(5000)),
                    ("chunk_overlap", json!(500)),
                    ("table_aware", json!(true)),
                    ("preserve_financial_structure", json!(true)),
                ]),
                is_active: true,
            },
            ChunkingMethod {
                name: "recursive".to_string(),
                method_type: MethodType::Recursive,
                description: "Recursive character splitting on separator priority".to_string(),
                parameters: params(&[
                    ("chunk_size", json!(5000)),
                    ("chunk_overlap", json!(500)),
                    ("separators", json!(["\n\n", "\n", " ", ""])),
                ]),
                is_active: true,
            },
            ChunkingMethod {
                name: "sentence".to_string(),
                method_type: MethodType::Sentence,
                description: "Whole-sentence windows".to_string(),
                parameters: params(&[
                    ("chunk_size", json!(5000)),
                    ("chunk_overlap", json!(500)),
                    ("sentence_separators", json!([".", "!", "?"])),
                ]),
                is_active: true,
            },
            ChunkingMethod {
                name: "token".to_string(),
                method_type: MethodType::Token,
                description: "Token-budget windows".to_string(),
                parameters: params(&[
                    ("chunk_size", json!(5000)),
                    ("chunk_overlap", json!(500)),
                    ("tokenizer", json!("cl100k_base")),
                ]),
                is_active: true,
            },
        ];
        Self { methods }
    }

    /// Look a method up by name.
    pub fn get(&self, name: &str) -> Option<&ChunkingMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Look a method up by type.
    pub fn get_by_type(&self, method_type: MethodType) -> Option<&ChunkingMethod> {
        self.methods.iter().find(|m| m.method_type == method_type)
    }

    /// The active methods, in catalog order.
    pub fn active(&self) -> impl Iterator<Item = &ChunkingMethod> {
        self.methods.iter().filter(|m| m.is_active)
    }

    /// All methods, active or not.
    pub fn methods(&self) -> &[ChunkingMethod] {
        &self.methods
    }

    /// Mutable access for activation toggles and parameter overrides.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ChunkingMethod> {
        self.methods.iter_mut().find(|m| m.name == name)
    }
}
