//! Strategy registry.

use std::collections::HashMap;
use std::sync::Arc;

use ragprune_core::{ChunkError, ChunkStrategy, MethodType, RelevanceScorer, Tokenizer};

use crate::{
    ElementStreamStrategy, FinancialStrategy, HierarchicalStrategy, RecursiveStrategy,
    SemanticStrategy, SentenceStrategy, TokenStrategy,
};

/// Maps the closed method-type catalogue onto strategy instances.
///
/// Resolution of an unregistered type is an error, not a fallback; callers
/// that want a default pick one explicitly.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: HashMap<MethodType, Arc<dyn ChunkStrategy>>,
}

impl StrategyRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in strategy, wired to the given
    /// capabilities.
    #[must_use]
    pub fn with_defaults(tokenizer: Arc<dyn Tokenizer>, scorer: Arc<dyn RelevanceScorer>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ElementStreamStrategy::new(MethodType::Unstructured)));
        registry.register(Arc::new(ElementStreamStrategy::new(MethodType::Llamaparse)));
        registry.register(Arc::new(HierarchicalStrategy));
        registry.register(Arc::new(SemanticStrategy::new(scorer)));
        registry.register(Arc::new(FinancialStrategy));
        registry.register(Arc::new(RecursiveStrategy));
        registry.register(Arc::new(SentenceStrategy));
        registry.register(Arc::new(TokenStrategy::new(tokenizer)));
        registry
    }

    /// Register a strategy under its declared method type, replacing any
    /// previous registration.
    pub fn register(&mut self, strategy: Arc<dyn ChunkStrategy>) {
        self.strategies.insert(strategy.method_type(), strategy);
    }

    /// Resolve a method type to its strategy.
    pub fn resolve(&self, method_type: MethodType) -> Result<Arc<dyn ChunkStrategy>, ChunkError> {
        self.strategies
            .get(&method_type)
            .cloned()
            .ok_or_else(|| ChunkError::UnknownMethod(method_type.as_str().to_string()))
    }

    /// The registered method types, in catalogue order.
    pub fn method_types(&self) -> Vec<MethodType> {
        MethodType::ALL
            .iter()
            .copied()
            .filter(|m| self.strategies.contains_key(m))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragprune_capability::{HeuristicTokenizer, KeywordScorer};

    fn full_registry() -> StrategyRegistry {
        StrategyRegistry::with_defaults(Arc::new(HeuristicTokenizer), Arc::new(KeywordScorer))
    }

    #[test]
    fn test_defaults_cover_all_method_types() {
        let registry = full_registry();
        assert_eq!(registry.method_types(), MethodType::ALL.to_vec());
        for method in MethodType::ALL {
            let strategy = registry.resolve(method).unwrap();
            assert_eq!(strategy.method_type(), method);
        }
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let err = StrategyRegistry::new()
            .resolve(MethodType::Recursive)
            .unwrap_err();
        assert!(matches!(err, ChunkError::UnknownMethod(name) if name == "recursive"));
    }

    #[test]
    fn test_partial_registry_lists_only_registered() {
        let mut registry = StrategyRegistry::new();
        registry.register(Arc::new(RecursiveStrategy));
        registry.register(Arc::new(SentenceStrategy));
        assert_eq!(
            registry.method_types(),
            vec![MethodType::Recursive, MethodType::Sentence]
        );
        assert!(registry.resolve(MethodType::Semantic).is_err());
    }
}
