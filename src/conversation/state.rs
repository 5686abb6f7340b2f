//! Conversation state — the two facts a session remembers about the user.

use serde::{Deserialize, Serialize};

/// The phase a conversation is in, derived from what has been captured.
///
/// Progresses monotonically: Fresh → Routing → Captured. A conversation can
/// jump straight from Fresh to Captured when the first thing the user sends
/// is an email address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    /// No name and no email yet. Greeting and name rules are live.
    #[default]
    Fresh,
    /// Name known, email not yet captured. Topic rules do the routing.
    Routing,
    /// Email captured. Greeting and name rules are permanently disabled.
    Captured,
}

impl ConversationPhase {
    /// Whether the greeting and name-capture rules can still fire.
    pub fn accepts_introductions(&self) -> bool {
        !matches!(self, Self::Captured)
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fresh => "fresh",
            Self::Routing => "routing",
            Self::Captured => "captured",
        };
        write!(f, "{s}")
    }
}

/// Session-scoped memory mutated by the response engine.
///
/// Both fields only ever move forward: `email_captured` goes false → true,
/// `user_name` goes empty → non-empty, and neither is reset for the life of
/// the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    email_captured: bool,
    user_name: String,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email_captured(&self) -> bool {
        self.email_captured
    }

    /// Captured name, empty until one is set.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn has_name(&self) -> bool {
        !self.user_name.is_empty()
    }

    /// Mark the email as captured. Idempotent.
    pub fn capture_email(&mut self) {
        self.email_captured = true;
    }

    /// Store `name` if no name is set yet. Returns whether the write happened.
    ///
    /// An empty `name` never counts as a write, so the state stays unnamed.
    pub fn set_name(&mut self, name: &str) -> bool {
        if self.has_name() || name.is_empty() {
            return false;
        }
        self.user_name = name.to_string();
        true
    }

    /// The phase jointly encoded by the two fields.
    pub fn phase(&self) -> ConversationPhase {
        if self.email_captured {
            ConversationPhase::Captured
        } else if self.has_name() {
            ConversationPhase::Routing
        } else {
            ConversationPhase::Fresh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_fresh() {
        let state = ConversationState::default();
        assert!(!state.email_captured());
        assert_eq!(state.user_name(), "");
        assert_eq!(state.phase(), ConversationPhase::Fresh);
        assert_eq!(ConversationPhase::default(), ConversationPhase::Fresh);
    }

    #[test]
    fn set_name_only_writes_once() {
        let mut state = ConversationState::new();
        assert!(state.set_name("Alice"));
        assert!(!state.set_name("Bob"));
        assert_eq!(state.user_name(), "Alice");
        assert_eq!(state.phase(), ConversationPhase::Routing);
    }

    #[test]
    fn empty_name_is_not_a_write() {
        let mut state = ConversationState::new();
        assert!(!state.set_name(""));
        assert!(!state.has_name());
        assert!(state.set_name("Sam"));
    }

    #[test]
    fn capture_email_is_idempotent() {
        let mut state = ConversationState::new();
        state.capture_email();
        state.capture_email();
        assert!(state.email_captured());
        assert_eq!(state.phase(), ConversationPhase::Captured);
    }

    #[test]
    fn captured_wins_over_named() {
        let mut state = ConversationState::new();
        state.capture_email();
        state.set_name("Alice");
        assert_eq!(state.phase(), ConversationPhase::Captured);
        assert!(!state.phase().accepts_introductions());
    }

    #[test]
    fn display_matches_serde() {
        use ConversationPhase::*;
        for phase in [Fresh, Routing, Captured] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(format!("\"{phase}\""), json);
        }
    }

    #[test]
    fn state_serde_roundtrip() {
        let mut state = ConversationState::new();
        state.set_name("Priya");
        let json = serde_json::to_string(&state).unwrap();
        let parsed: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
