use crate::agent::tools::{SEARCH_DOCUMENTS, SEARCH_WEB, ToolRegistry};

/// Where the model must stop so the loop can run the tool and report back.
pub const STOP_SEQUENCES: &[&str] = &["\nObservation:"];

/// Build the ReAct prompt for one Thinking step.
///
/// `scratchpad` holds every previous step as the model wrote it, each followed
/// by its `Observation:` line.
pub fn build_prompt(registry: &ToolRegistry, question: &str, scratchpad: &str) -> String {
    let tools = registry.describe();
    let tool_names = registry.names().join(", ");
    let guidance = if registry.contains(SEARCH_WEB) {
        format!(
            "When looking for information, try {SEARCH_DOCUMENTS} first. \
             If it does not find enough information, use {SEARCH_WEB}."
        )
    } else {
        format!("When looking for information, use {SEARCH_DOCUMENTS}.")
    };

    format!(
        "You are a helpful AI assistant with access to local documents and web search.

You have access to the following tools:

{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

{guidance}

Question: {question}
Thought:{scratchpad}"
    )
}

/// Append one completed step to the scratchpad.
pub fn append_step(scratchpad: &mut String, model_output: &str, observation: &str) {
    scratchpad.push_str(model_output);
    scratchpad.push_str("\nObservation: ");
    scratchpad.push_str(observation);
    scratchpad.push_str("\nThought: ");
}
