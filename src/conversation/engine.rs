//! Response engine — first-match-wins evaluation of the rule table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::{FALLBACK_REPLY, Rule, RuleKind, Turn, default_rules};
use super::state::ConversationState;

/// The engine's answer to one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Text to show the user. Never empty.
    pub text: String,
    /// Which rule produced it.
    pub rule: RuleKind,
}

/// Deterministic, delay-free reply generator.
///
/// Holds no conversation data of its own; all session memory lives in the
/// [`ConversationState`] passed to each call, so one engine can serve any
/// number of sessions.
pub struct ResponseEngine {
    rules: Vec<Rule>,
}

impl ResponseEngine {
    /// Engine with the advisor's default rule table.
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Engine over a custom table, evaluated in the given order.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Produce the reply for `input`, mutating `state` as the matched rule
    /// dictates.
    ///
    /// Never fails. Input nothing matches gets the fallback reply and leaves
    /// `state` untouched.
    pub fn respond(&self, input: &str, state: &mut ConversationState) -> Reply {
        let turn = Turn::new(input);

        for rule in &self.rules {
            if rule.matches(&turn, state) {
                debug!(rule = %rule.kind, phase = %state.phase(), "Rule matched");
                let text = rule.apply(&turn, state);
                return Reply {
                    text,
                    rule: rule.kind,
                };
            }
        }

        debug!(phase = %state.phase(), "No rule matched, using fallback");
        Reply {
            text: FALLBACK_REPLY.to_string(),
            rule: RuleKind::Fallback,
        }
    }

    /// By-value form of [`respond`](Self::respond): consumes the current
    /// state and hands back the updated one.
    pub fn step(&self, input: &str, mut state: ConversationState) -> (Reply, ConversationState) {
        let reply = self.respond(input, &mut state);
        (reply, state)
    }
}

impl Default for ResponseEngine {
    fn default() -> Self {
        Self::new()
    }
}
