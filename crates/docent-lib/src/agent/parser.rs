use crate::error::ToolDispatchError;

const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const FINAL_ANSWER: &str = "Final Answer:";

/// What the model decided at one Thinking step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedOutput {
    Action { tool: String, input: String },
    Finish(String),
}

/// Parse a ReAct-formatted model reply.
///
/// A reply carrying both an action and a final answer is rejected, since the
/// loop cannot know which one the model meant.
pub fn parse_output(text: &str) -> Result<ParsedOutput, ToolDispatchError> {
    let action = find_action(text)?;
    let final_answer = text.find(FINAL_ANSWER);

    match (action, final_answer) {
        (Some(_), Some(_)) => Err(ToolDispatchError::MalformedOutput(
            "reply contains both a final answer and an action".to_string(),
        )),
        (Some((tool, input)), None) => Ok(ParsedOutput::Action { tool, input }),
        (None, Some(idx)) => Ok(ParsedOutput::Finish(
            text[idx + FINAL_ANSWER.len()..].trim().to_string(),
        )),
        (None, None) => Err(ToolDispatchError::MalformedOutput(
            "Missing 'Action:' after 'Thought:'".to_string(),
        )),
    }
}

fn find_action(text: &str) -> Result<Option<(String, String)>, ToolDispatchError> {
    let Some(action_at) = find_label(text, ACTION) else {
        return Ok(None);
    };
    let after_action = &text[action_at + ACTION.len()..];
    let tool_line = after_action.lines().next().unwrap_or_default();
    let tool_line = tool_line
        .find(ACTION_INPUT)
        .map_or(tool_line, |end| &tool_line[..end]);
    let tool = tool_line.trim().trim_matches('`').trim().to_string();
    if tool.is_empty() {
        return Err(ToolDispatchError::MalformedOutput(
            "'Action:' is not followed by a tool name".to_string(),
        ));
    }

    let Some(input_at) = after_action.find(ACTION_INPUT) else {
        return Err(ToolDispatchError::MalformedOutput(
            "Missing 'Action Input:' after 'Action:'".to_string(),
        ));
    };
    let raw_input = &after_action[input_at + ACTION_INPUT.len()..];
    let raw_input = raw_input
        .find("\nObservation")
        .map_or(raw_input, |end| &raw_input[..end]);
    let input = raw_input.trim().trim_matches('"').to_string();

    Ok(Some((tool, input)))
}

/// Byte index of `label` where it starts a line (ignoring leading spaces).
fn find_label(text: &str, label: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with(label) {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}
