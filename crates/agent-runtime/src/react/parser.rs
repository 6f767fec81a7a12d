//! Parser for the Thought / Action / Action Input protocol
//!
//! Accepted shapes, with keywords at the start of a line (leading whitespace
//! allowed) and bodies free to span several lines:
//!
//! ```text
//! Thought: <text>
//! Action: <tool name>
//! Action Input: <one JSON object>
//! ```
//!
//! ```text
//! Thought: <text>
//! Answer: <text>
//! ```
//!
//! Anything else is rejected. The parser never repairs its input; the error
//! text is written for the LLM, which sees it as an observation.

use super::step::ReasoningStep;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use thiserror::Error;

/// Reasons a completion could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("The output must start with 'Thought:'.")]
    MissingThought,

    #[error("Unexpected text before 'Thought:'. Start the output with 'Thought:'.")]
    UnexpectedPreamble,

    #[error("The '{0}:' section appears more than once.")]
    DuplicateSection(&'static str),

    #[error("The output contains both an Action and an Answer. Provide exactly one.")]
    AmbiguousOutput,

    #[error("The output contains neither 'Action:' nor 'Answer:'.")]
    MissingActionOrAnswer,

    #[error("'Action:' must be followed by 'Action Input:'.")]
    MissingActionInput,

    #[error("'Action Input:' must come after 'Action:'.")]
    MisorderedSections,

    #[error("Do not write 'Observation:' yourself; it is provided after the tool runs.")]
    UnexpectedObservation,

    #[error("Action Input is not valid JSON: {0}")]
    InvalidActionInput(String),

    #[error("Action Input must be a JSON object, e.g. {{\"query\": \"SUI\"}}.")]
    ActionInputNotObject,

    #[error("Unknown tool '{name}'. Available tools: {available}.")]
    UnknownTool { name: String, available: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Thought,
    Action,
    ActionInput,
    Answer,
    Observation,
}

impl Keyword {
    const ALL: [Self; 5] = [
        Self::Thought,
        Self::ActionInput,
        Self::Action,
        Self::Answer,
        Self::Observation,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Thought => "Thought",
            Self::Action => "Action",
            Self::ActionInput => "Action Input",
            Self::Answer => "Answer",
            Self::Observation => "Observation",
        }
    }

    /// Keyword opening this line, and the rest of the line after the colon
    fn split_line(line: &str) -> Option<(Self, &str)> {
        let trimmed = line.trim_start();
        Self::ALL.into_iter().find_map(|keyword| {
            trimmed
                .strip_prefix(keyword.label())
                .and_then(|rest| rest.strip_prefix(':'))
                .map(|rest| (keyword, rest))
        })
    }
}

/// Parses one LLM completion into an action or a final answer
#[derive(Debug, Clone)]
pub struct ReActOutputParser {
    tool_names: BTreeSet<String>,
}

impl ReActOutputParser {
    /// Create a parser that accepts actions on the given tools only
    pub fn new<I, S>(tool_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tool_names: tool_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a completion
    ///
    /// Returns [`ReasoningStep::Action`] or [`ReasoningStep::FinalAnswer`].
    pub fn parse(&self, output: &str) -> Result<ReasoningStep, ParseError> {
        let (preamble, sections) = split_sections(output);

        match sections.first() {
            Some((Keyword::Thought, _)) => {}
            _ => return Err(ParseError::MissingThought),
        }
        if !preamble.trim().is_empty() {
            return Err(ParseError::UnexpectedPreamble);
        }

        let mut seen = Vec::with_capacity(sections.len());
        for (keyword, _) in &sections {
            if *keyword == Keyword::Observation {
                return Err(ParseError::UnexpectedObservation);
            }
            if seen.contains(keyword) {
                return Err(ParseError::DuplicateSection(keyword.label()));
            }
            seen.push(*keyword);
        }

        let body = |wanted: Keyword| {
            sections
                .iter()
                .find(|(keyword, _)| *keyword == wanted)
                .map(|(_, body)| body.trim())
        };
        let position = |wanted: Keyword| seen.iter().position(|k| *k == wanted);

        let thought = body(Keyword::Thought).unwrap_or_default().to_string();
        let action = body(Keyword::Action);
        let action_input = body(Keyword::ActionInput);

        if let Some(answer) = body(Keyword::Answer) {
            if action.is_some() || action_input.is_some() {
                return Err(ParseError::AmbiguousOutput);
            }
            return Ok(ReasoningStep::FinalAnswer {
                thought,
                answer: answer.to_string(),
            });
        }

        let Some(tool_name) = action else {
            return Err(ParseError::MissingActionOrAnswer);
        };
        let Some(raw_input) = action_input else {
            return Err(ParseError::MissingActionInput);
        };
        if position(Keyword::ActionInput) < position(Keyword::Action) {
            return Err(ParseError::MisorderedSections);
        }

        if !self.tool_names.contains(tool_name) {
            return Err(ParseError::UnknownTool {
                name: tool_name.to_string(),
                available: self
                    .tool_names
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let Value::Object(input) = parse_single_json(raw_input)? else {
            return Err(ParseError::ActionInputNotObject);
        };

        Ok(ReasoningStep::Action {
            thought,
            tool_name: tool_name.to_string(),
            input,
        })
    }
}

/// Split text into the part before the first keyword and the keyword sections
fn split_sections(output: &str) -> (String, Vec<(Keyword, String)>) {
    let mut preamble = String::new();
    let mut sections: Vec<(Keyword, String)> = Vec::new();

    for line in output.lines() {
        if let Some((keyword, rest)) = Keyword::split_line(line) {
            sections.push((keyword, rest.to_string()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push('\n');
            body.push_str(line);
        } else {
            preamble.push_str(line);
            preamble.push('\n');
        }
    }

    (preamble, sections)
}

/// Exactly one JSON value, with nothing but whitespace after it
fn parse_single_json(raw: &str) -> Result<Value, ParseError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let value = Value::deserialize(&mut deserializer)
        .map_err(|e| ParseError::InvalidActionInput(e.to_string()))?;
    deserializer
        .end()
        .map_err(|e| ParseError::InvalidActionInput(e.to_string()))?;
    Ok(value)
}
