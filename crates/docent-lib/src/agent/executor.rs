use serde::Serialize;
use tracing::{debug, info, warn};

use crate::agent::model::ReasoningModel;
use crate::agent::parser::{ParsedOutput, parse_output};
use crate::agent::prompt::{STOP_SEQUENCES, append_step, build_prompt};
use crate::agent::tools::ToolRegistry;
use crate::config::MAX_ITERATIONS;
use crate::pipeline::rag::RagSystem;

/// Trace entry name for replies that could not be parsed.
pub const INVALID_OUTPUT_TOOL: &str = "_invalid_output";

/// Shown by [`Agent::chat`] when a run produced no text at all.
pub const CHAT_FALLBACK: &str = "Sorry, something went wrong.";

/// One tool call made while answering, with what it returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentOutcome {
    /// The model produced a final answer.
    Done,
    /// The iteration cap was reached first.
    Aborted,
    /// A model call or tool call failed.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentResponse {
    pub success: bool,
    pub output: String,
    pub trace: Vec<ToolInvocation>,
    pub outcome: AgentOutcome,
}

enum LoopState {
    Thinking,
    Acting {
        log: String,
        tool: String,
        input: String,
    },
    Observing {
        log: String,
        tool: String,
        input: String,
        observation: String,
    },
    Done(String),
}

/// Bounded think-act-observe loop over a [`ReasoningModel`].
pub struct Agent {
    model: Box<dyn ReasoningModel>,
    registry: ToolRegistry,
    max_iterations: usize,
}

impl Agent {
    pub fn new(model: Box<dyn ReasoningModel>, registry: ToolRegistry) -> Self {
        Self {
            model,
            registry,
            max_iterations: MAX_ITERATIONS,
        }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Answer `query`. Never fails: errors come back as `success: false`.
    pub fn run(&mut self, query: &str, rag: &mut RagSystem) -> AgentResponse {
        let mut trace = Vec::new();
        match self.run_loop(query, rag, &mut trace) {
            Ok(Some(answer)) => {
                info!(steps = trace.len(), "Agent finished");
                AgentResponse {
                    success: true,
                    output: answer,
                    trace,
                    outcome: AgentOutcome::Done,
                }
            }
            Ok(None) => {
                warn!(max_iterations = self.max_iterations, "Agent hit iteration cap");
                AgentResponse {
                    success: false,
                    output: format!(
                        "Agent stopped after {} iterations without a final answer.",
                        self.max_iterations
                    ),
                    trace,
                    outcome: AgentOutcome::Aborted,
                }
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Agent run failed");
                AgentResponse {
                    success: false,
                    output: format!("Error: {e:#}"),
                    trace,
                    outcome: AgentOutcome::Failed,
                }
            }
        }
    }

    /// Plain-text answer for conversational use.
    pub fn chat(&mut self, message: &str, rag: &mut RagSystem) -> String {
        let response = self.run(message, rag);
        if response.output.trim().is_empty() {
            CHAT_FALLBACK.to_string()
        } else {
            response.output
        }
    }

    /// `Ok(None)` means the iteration cap was reached.
    fn run_loop(
        &mut self,
        query: &str,
        rag: &mut RagSystem,
        trace: &mut Vec<ToolInvocation>,
    ) -> anyhow::Result<Option<String>> {
        let mut scratchpad = String::new();
        let mut iterations = 0;
        let mut state = LoopState::Thinking;

        loop {
            state = match state {
                LoopState::Thinking => {
                    if iterations >= self.max_iterations {
                        return Ok(None);
                    }
                    iterations += 1;

                    let prompt = build_prompt(&self.registry, query, &scratchpad);
                    let reply = self.model.complete(&prompt, STOP_SEQUENCES)?;
                    debug!(iteration = iterations, reply = %reply, "Model replied");

                    match parse_output(&reply) {
                        Ok(ParsedOutput::Finish(answer)) => LoopState::Done(answer),
                        Ok(ParsedOutput::Action { tool, input }) => LoopState::Acting {
                            log: reply,
                            tool,
                            input,
                        },
                        Err(e) => LoopState::Observing {
                            input: reply.clone(),
                            log: reply,
                            tool: INVALID_OUTPUT_TOOL.to_string(),
                            observation: e.to_string(),
                        },
                    }
                }
                LoopState::Acting { log, tool, input } => {
                    let observation = match self.registry.get(&tool) {
                        Ok(t) => match t.invoke(&input, rag) {
                            Ok(observation) => observation,
                            Err(e) => {
                                trace.push(ToolInvocation {
                                    tool_name: tool,
                                    input,
                                    output: format!("Error: {e:#}"),
                                });
                                return Err(e);
                            }
                        },
                        Err(e) => e.to_string(),
                    };
                    LoopState::Observing {
                        log,
                        tool,
                        input,
                        observation,
                    }
                }
                LoopState::Observing {
                    log,
                    tool,
                    input,
                    observation,
                } => {
                    debug!(tool = %tool, observation_len = observation.len(), "Observed");
                    append_step(&mut scratchpad, &log, &observation);
                    trace.push(ToolInvocation {
                        tool_name: tool,
                        input,
                        output: observation,
                    });
                    LoopState::Thinking
                }
                LoopState::Done(answer) => return Ok(Some(answer)),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::tools::{NO_DOCUMENTS_FOUND, SEARCH_DOCUMENTS, SEARCH_WEB};
    use crate::test_util::{CannedWebSearch, ScriptedModel, rag_in_memory};

    fn agent(model: ScriptedModel, web: Option<CannedWebSearch>) -> Agent {
        let registry = ToolRegistry::new(
            web.map(|w| Box::new(w) as Box<dyn crate::agent::web::WebSearchProvider>),
        );
        Agent::new(Box::new(model), registry)
    }

    #[test]
    fn direct_final_answer() {
        let model = ScriptedModel::new(["Final Answer: Hello!"]);
        let mut rag = rag_in_memory("agent_direct");
        let response = agent(model, None).run("hi", &mut rag);

        assert_eq!(
            response,
            AgentResponse {
                success: true,
                output: "Hello!".to_string(),
                trace: vec![],
                outcome: AgentOutcome::Done,
            }
        );
    }

    #[test]
    fn document_search_then_answer() {
        let model = ScriptedModel::new([
            " I should check the documents.\nAction: search_documents\nAction Input: ownership",
            " I now know the final answer\nFinal Answer: Nothing indexed.",
        ]);
        let prompts = model.prompts();
        let mut rag = rag_in_memory("agent_doc_search");
        let response = agent(model, None).run("What is ownership?", &mut rag);

        assert!(response.success);
        assert_eq!(response.output, "Nothing indexed.");
        assert_eq!(
            response.trace,
            vec![ToolInvocation {
                tool_name: SEARCH_DOCUMENTS.to_string(),
                input: "ownership".to_string(),
                output: NO_DOCUMENTS_FOUND.to_string(),
            }]
        );
        let prompts = prompts.borrow();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains(&format!("Observation: {NO_DOCUMENTS_FOUND}\nThought: ")));
    }

    #[test]
    fn web_search_is_used_when_available() {
        let model = ScriptedModel::new([
            "Action: search_web\nAction Input: latest rust release",
            "Final Answer: Rust 1.90",
        ]);
        let web = CannedWebSearch::reply("Rust 1.90 released");
        let queries = web.queries();
        let mut rag = rag_in_memory("agent_web");
        let response = agent(model, Some(web)).run("latest rust?", &mut rag);

        assert!(response.success);
        assert_eq!(response.trace[0].tool_name, SEARCH_WEB);
        assert_eq!(response.trace[0].output, "Rust 1.90 released");
        assert_eq!(*queries.borrow(), vec!["latest rust release".to_string()]);
    }

    #[test]
    fn unknown_tool_aborts_after_cap() {
        let model = ScriptedModel::repeating("Action: fly_to_moon\nAction Input: now");
        let prompts = model.prompts();
        let mut rag = rag_in_memory("agent_unknown_tool");
        let response = agent(model, None).run("go", &mut rag);

        assert!(!response.success);
        assert_eq!(response.outcome, AgentOutcome::Aborted);
        assert_eq!(
            response.output,
            "Agent stopped after 5 iterations without a final answer."
        );
        assert_eq!(prompts.borrow().len(), MAX_ITERATIONS);
        assert_eq!(response.trace.len(), MAX_ITERATIONS);
        assert_eq!(
            response.trace[0].output,
            "fly_to_moon is not a valid tool, try one of [search_documents]."
        );
    }

    #[test]
    fn parse_errors_are_fed_back() {
        let model = ScriptedModel::new(["I am not following the format", "Final Answer: ok"]);
        let prompts = model.prompts();
        let mut rag = rag_in_memory("agent_parse_error");
        let response = agent(model, None).run("q", &mut rag);

        assert!(response.success);
        assert_eq!(response.trace[0].tool_name, INVALID_OUTPUT_TOOL);
        assert!(prompts.borrow()[1].contains("Observation: Invalid Format:"));
    }

    #[test]
    fn model_failure_is_reported() {
        let model = ScriptedModel::failing("quota exceeded");
        let mut rag = rag_in_memory("agent_model_failure");
        let response = agent(model, None).run("q", &mut rag);

        assert!(!response.success);
        assert_eq!(response.outcome, AgentOutcome::Failed);
        assert_eq!(response.output, "Error: quota exceeded");
    }

    #[test]
    fn tool_failure_is_reported() {
        let model = ScriptedModel::new(["Action: search_web\nAction Input: x"]);
        let web = CannedWebSearch::failing("rate limited");
        let mut rag = rag_in_memory("agent_tool_failure");
        let response = agent(model, Some(web)).run("q", &mut rag);

        assert_eq!(response.outcome, AgentOutcome::Failed);
        assert_eq!(response.output, "Error: rate limited");
        assert_eq!(response.trace.len(), 1);
        assert_eq!(response.trace[0].tool_name, SEARCH_WEB);
        assert_eq!(response.trace[0].input, "x");
        assert_eq!(response.trace[0].output, "Error: rate limited");
    }

    #[test]
    fn chat_falls_back_on_empty_output() {
        let model = ScriptedModel::new(["Final Answer:   "]);
        let mut rag = rag_in_memory("agent_chat_fallback");
        assert_eq!(agent(model, None).chat("q", &mut rag), CHAT_FALLBACK);
    }

    #[test]
    fn custom_iteration_cap() {
        let model = ScriptedModel::repeating("no format");
        let prompts = model.prompts();
        let mut rag = rag_in_memory("agent_custom_cap");
        let response = agent(model, None).with_max_iterations(2).run("q", &mut rag);

        assert_eq!(response.outcome, AgentOutcome::Aborted);
        assert_eq!(prompts.borrow().len(), 2);
    }
}
