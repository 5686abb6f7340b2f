//! Scripted advisor conversation.
//!
//! A session's text goes through the [`ResponseEngine`], which walks an
//! ordered rule table and returns a canned reply, capturing the user's name
//! and email into a per-session [`ConversationState`] along the way. The
//! engine is pure: timing and display belong to the channel.

pub mod engine;
pub mod rules;
pub mod session;
pub mod state;

pub use engine::{Reply, ResponseEngine};
pub use rules::{Rule, RuleKind, WELCOME_REPLY, default_rules};
pub use session::{Session, SessionRegistry, Speaker, TranscriptEntry};
pub use state::{ConversationPhase, ConversationState};
