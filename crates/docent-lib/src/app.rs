use anyhow::Context;
use tracing::debug;

use crate::agent::executor::{Agent, AgentResponse};
use crate::agent::tools::ToolRegistry;
use crate::db::store::SqliteVectorStore;
use crate::pipeline::rag::{IngestOptions, RagSystem};
use crate::runtime::Runtime;

/// Open the index and build the retrieval pipeline.
pub fn build_rag(runtime: &Runtime, options: IngestOptions) -> anyhow::Result<RagSystem> {
    let conn = runtime.db.open().context("Failed to open the index database")?;
    let embedder = runtime.providers.embedder(&runtime.context)?;
    let rag = RagSystem::new(
        embedder,
        Box::new(SqliteVectorStore::new(conn)),
        runtime.providers.extractor(),
    )?;
    Ok(rag.with_options(options))
}

/// Tool set for this runtime. Missing web search credentials only drop that tool.
pub fn build_registry(runtime: &Runtime) -> ToolRegistry {
    let web_search = match runtime.providers.web_search(&runtime.settings) {
        Ok(provider) => Some(provider),
        Err(e) => {
            debug!(reason = %e, "Web search not configured");
            None
        }
    };
    ToolRegistry::new(web_search)
}

/// The retrieval pipeline plus the reasoning loop that uses it.
pub struct Assistant {
    rag: RagSystem,
    agent: Agent,
}

impl Assistant {
    pub fn new(rag: RagSystem, agent: Agent) -> Self {
        Self { rag, agent }
    }

    /// Build everything from the runtime. Fails without reasoning model credentials.
    pub fn build(runtime: &Runtime) -> anyhow::Result<Self> {
        let rag = build_rag(runtime, IngestOptions::default())?;
        let model = runtime.providers.reasoning_model(&runtime.settings)?;
        let agent = Agent::new(model, build_registry(runtime));
        Ok(Self::new(rag, agent))
    }

    pub fn ask(&mut self, question: &str) -> AgentResponse {
        self.agent.run(question, &mut self.rag)
    }

    pub fn chat(&mut self, message: &str) -> String {
        self.agent.chat(message, &mut self.rag)
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.agent.registry().names()
    }

    pub fn rag_mut(&mut self) -> &mut RagSystem {
        &mut self.rag
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::agent::tools::{SEARCH_DOCUMENTS, SEARCH_WEB};
    use crate::context::DocentContext;
    use crate::db::driver::DatabaseDriver;
    use crate::settings::Settings;
    use crate::test_util::FakeProviders;

    fn runtime(name: &str, providers: FakeProviders) -> Runtime {
        Runtime {
            context: DocentContext::new(PathBuf::from("/tmp/docent-app-test")),
            db: DatabaseDriver::in_memory(name).unwrap(),
            settings: Settings::default(),
            providers: Box::new(providers),
        }
    }

    #[test]
    fn assistant_answers_with_scripted_model() {
        let providers = FakeProviders::default().with_replies(["Final Answer: hi"]);
        let mut assistant = Assistant::build(&runtime("app_answer", providers)).unwrap();
        let response = assistant.ask("hello");
        assert!(response.success);
        assert_eq!(response.output, "hi");
    }

    #[test]
    fn no_web_search_keeps_document_tool() {
        let providers = FakeProviders::default().with_replies(["Final Answer: ok"]);
        let assistant = Assistant::build(&runtime("app_no_web", providers)).unwrap();
        assert_eq!(assistant.tool_names(), vec![SEARCH_DOCUMENTS]);
    }

    #[test]
    fn web_search_is_registered_when_available() {
        let providers = FakeProviders::default()
            .with_replies(["Final Answer: ok"])
            .with_web_reply("web");
        let assistant = Assistant::build(&runtime("app_with_web", providers)).unwrap();
        assert_eq!(assistant.tool_names(), vec![SEARCH_DOCUMENTS, SEARCH_WEB]);
    }

    #[test]
    fn missing_model_fails_build() {
        let providers = FakeProviders::default();
        assert!(Assistant::build(&runtime("app_no_model", providers)).is_err());
    }
}
