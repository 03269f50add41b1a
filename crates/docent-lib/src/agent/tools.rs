use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::agent::web::WebSearchProvider;
use crate::config::DEFAULT_TOP_K;
use crate::error::ToolDispatchError;
use crate::pipeline::rag::{RagSystem, SearchResult};

pub const SEARCH_DOCUMENTS: &str = "search_documents";
pub const SEARCH_WEB: &str = "search_web";

/// Returned by `search_documents` when the index has nothing to offer.
pub const NO_DOCUMENTS_FOUND: &str = "No relevant information was found in the documents.";

/// A capability the reasoning loop can call by name.
pub enum Tool {
    DocumentSearch,
    WebSearch(Box<dyn WebSearchProvider>),
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DocumentSearch => SEARCH_DOCUMENTS,
            Self::WebSearch(_) => SEARCH_WEB,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::DocumentSearch => {
                "Useful for finding information in the indexed PDF documents. \
                 Use it when you need specific information from the local documents."
            }
            Self::WebSearch(_) => {
                "Useful for finding up-to-date information on the internet. \
                 Use it when you need recent data, news, or information that is not in the local documents."
            }
        }
    }

    /// Run the tool. Errors are real failures; "nothing found" is a normal reply.
    pub fn invoke(&self, input: &str, rag: &mut RagSystem) -> anyhow::Result<String> {
        debug!(tool = self.name(), input = %input, "Invoking tool");
        match self {
            Self::DocumentSearch => {
                let results = rag.search(input, DEFAULT_TOP_K)?;
                Ok(format_documents(&results))
            }
            Self::WebSearch(provider) => provider.run(input),
        }
    }
}

/// Render search results as the `search_documents` observation.
pub fn format_documents(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_DOCUMENTS_FOUND.to_string();
    }
    let context = results
        .iter()
        .map(|r| format!("Source: {}\n{}", r.source, r.text))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Information found in the documents:\n\n{context}")
}

/// Tools available to the reasoning loop, keyed by name.
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Tool>,
}

impl ToolRegistry {
    /// Document search is always present; web search only when a provider is given.
    pub fn new(web_search: Option<Box<dyn WebSearchProvider>>) -> Self {
        let mut tools = BTreeMap::new();
        let mut insert = |tool: Tool| {
            tools.insert(tool.name(), tool);
        };
        insert(Tool::DocumentSearch);
        match web_search {
            Some(provider) => insert(Tool::WebSearch(provider)),
            None => warn!("Web search is unavailable; only document search will be offered"),
        }
        Self { tools }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// `name: description` for every tool, one per line.
    pub fn describe(&self) -> String {
        self.tools
            .values()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Result<&Tool, ToolDispatchError> {
        self.tools
            .get(name)
            .ok_or_else(|| ToolDispatchError::UnknownTool {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{CannedWebSearch, rag_in_memory};

    #[test]
    fn registry_without_web_search_has_only_documents() {
        let registry = ToolRegistry::new(None);
        assert_eq!(registry.names(), vec![SEARCH_DOCUMENTS]);
        assert!(!registry.contains(SEARCH_WEB));
    }

    #[test]
    fn registry_with_web_search_lists_both() {
        let registry = ToolRegistry::new(Some(Box::new(CannedWebSearch::reply("hits"))));
        assert_eq!(registry.names(), vec![SEARCH_DOCUMENTS, SEARCH_WEB]);
        assert!(registry.describe().starts_with("search_documents: "));
    }

    #[test]
    fn unknown_tool_is_typed_error() {
        let registry = ToolRegistry::new(None);
        let err = registry.get("search_web").err().unwrap();
        assert_eq!(
            err,
            ToolDispatchError::UnknownTool {
                name: "search_web".to_string(),
                available: "search_documents".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "search_web is not a valid tool, try one of [search_documents]."
        );
    }

    #[test]
    fn document_search_on_empty_index_returns_sentinel() {
        let mut rag = rag_in_memory("tools_empty_index");
        let out = Tool::DocumentSearch.invoke("anything", &mut rag).unwrap();
        assert_eq!(out, NO_DOCUMENTS_FOUND);
    }

    #[test]
    fn format_documents_labels_sources() {
        let results = vec![
            SearchResult {
                text: "alpha".to_string(),
                source: "a.pdf".to_string(),
                chunk_index: 0,
                similarity_score: 0.9,
            },
            SearchResult {
                text: "beta".to_string(),
                source: "b.pdf".to_string(),
                chunk_index: 3,
                similarity_score: 0.4,
            },
        ];
        assert_eq!(
            format_documents(&results),
            "Information found in the documents:\n\nSource: a.pdf\nalpha\n\nSource: b.pdf\nbeta"
        );
    }

    #[test]
    fn web_search_delegates_to_provider() {
        let mut rag = rag_in_memory("tools_web_delegate");
        let tool = Tool::WebSearch(Box::new(CannedWebSearch::reply("web answer")));
        assert_eq!(tool.invoke("query", &mut rag).unwrap(), "web answer");
    }
}
