//! Submission types for the advisor loop.
//!
//! Lines starting with a known slash command control the session; anything
//! else is conversation text for the response engine.

use serde::{Deserialize, Serialize};

/// Parses user input into Submission types.
pub struct SubmissionParser;

impl SubmissionParser {
    /// Parse message content into a Submission.
    pub fn parse(content: &str) -> Submission {
        let trimmed = content.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "/toggle" => Submission::Toggle,
            "/state" => Submission::ShowState,
            "/transcript" => Submission::ShowTranscript,
            "/help" | "/?" => Submission::Help,
            "/quit" | "/exit" => Submission::Quit,
            _ => Submission::UserInput {
                content: content.to_string(),
            },
        }
    }
}

/// Types of input the advisor loop can receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Submission {
    /// Conversation text, routed to the response engine.
    UserInput { content: String },

    /// Open or close the chat panel.
    Toggle,

    /// Print the session's conversation state.
    ShowState,

    /// Print the session's transcript.
    ShowTranscript,

    /// List the available commands.
    Help,

    /// End the session.
    Quit,
}

impl Submission {
    /// Whether this submission reaches the response engine.
    pub fn is_conversation(&self) -> bool {
        matches!(self, Self::UserInput { .. })
    }
}

pub const HELP_TEXT: &str =
    "Commands: /toggle (open/close chat), /state, /transcript, /help, /quit";
