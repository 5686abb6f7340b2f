//! Integration tests for the advisor conversation.
//!
//! The first group drives the public engine API through scripted
//! conversations; the second runs the full advisor loop against a scripted
//! in-memory channel.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use tokio::time::timeout;

use course_advisor::agent::Advisor;
use course_advisor::channels::{
    Channel, IncomingMessage, MessageStream, OutgoingResponse, StatusUpdate,
};
use course_advisor::config::AdvisorConfig;
use course_advisor::conversation::rules::{
    BACK_REPLY, DATA_ENGINEERING_REPLY, FALLBACK_REPLY, GREETING_REPLY, SAMPLE_LESSON_REPLY,
    SCHEDULE_REPLY, SOFTWARE_REPLY,
};
use course_advisor::conversation::{
    ConversationPhase, ConversationState, ResponseEngine, RuleKind, Speaker, WELCOME_REPLY,
};
use course_advisor::error::ChannelError;

/// Maximum time any loop test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn full_sales_conversation() {
    let engine = ResponseEngine::new();
    let mut state = ConversationState::new();

    let reply = engine.respond("Hello there", &mut state);
    assert_eq!(reply.text, GREETING_REPLY);
    assert_eq!(state.phase(), ConversationPhase::Fresh);

    let reply = engine.respond("my name is Alice", &mut state);
    assert_eq!(reply.text, "Nice to meet you, Alice! What are your career goals?");
    assert_eq!(state.phase(), ConversationPhase::Routing);

    let reply = engine.respond("I want to become a data engineer", &mut state);
    assert_eq!(reply.text, DATA_ENGINEERING_REPLY);

    let reply = engine.respond("Can I get a sample lesson?", &mut state);
    assert_eq!(reply.text, SAMPLE_LESSON_REPLY);

    let reply = engine.respond("back", &mut state);
    assert_eq!(reply.text, BACK_REPLY);

    let reply = engine.respond("I'd like to schedule a session", &mut state);
    assert_eq!(reply.text, SCHEDULE_REPLY);

    let reply = engine.respond("sure: Alice.W@Example.org", &mut state);
    assert_eq!(reply.rule, RuleKind::EmailCapture);
    assert!(reply.text.contains("(Alice.W@Example.org)"));
    assert_eq!(state.phase(), ConversationPhase::Captured);

    // Greeting is off once the email is in; "thanks" matches nothing else.
    let reply = engine.respond("thanks", &mut state);
    assert_eq!(reply.text, FALLBACK_REPLY);
    assert_eq!(state.user_name(), "Alice");
}

#[test]
fn software_route_after_first_word_name() {
    let engine = ResponseEngine::new();
    let (reply, state) = engine.step("Ravi", ConversationState::new());
    assert_eq!(reply.text, "Great to meet you, Ravi! What are your career goals?");

    let (reply, state) = engine.step("I am a software developer", state);
    assert_eq!(reply.text, SOFTWARE_REPLY);
    assert_eq!(state.user_name(), "Ravi");
    assert!(!state.email_captured());
}

#[test]
fn one_engine_serves_independent_states() {
    let engine = ResponseEngine::new();
    let mut a = ConversationState::new();
    let mut b = ConversationState::new();

    engine.respond("my name is Alice", &mut a);
    engine.respond("bob@example.com", &mut b);

    assert_eq!(a.user_name(), "Alice");
    assert!(!a.email_captured());
    assert!(!b.has_name());
    assert!(b.email_captured());
}

/// Channel that replays fixed lines and records everything sent back.
struct ScriptedChannel {
    lines: Vec<String>,
    responses: Arc<Mutex<Vec<String>>>,
    statuses: Arc<Mutex<Vec<StatusUpdate>>>,
}

impl ScriptedChannel {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            responses: Arc::new(Mutex::new(Vec::new())),
            statuses: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Channel for ScriptedChannel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let messages: Vec<IncomingMessage> = self
            .lines
            .iter()
            .map(|l| IncomingMessage::new("scripted", "tester", l))
            .collect();
        Ok(Box::pin(stream::iter(messages)))
    }

    async fn respond(
        &self,
        _msg: Option<&IncomingMessage>,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        self.responses.lock().unwrap().push(response.content);
        Ok(())
    }

    async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError> {
        self.statuses.lock().unwrap().push(status);
        Ok(())
    }
}

fn fast_config() -> AdvisorConfig {
    AdvisorConfig {
        typing_delay: Duration::ZERO,
        ..AdvisorConfig::default()
    }
}

#[tokio::test]
async fn advisor_loop_runs_scripted_session() {
    let channel = ScriptedChannel::new(&["hi", "my name is Alice", "   ", "price?", "/quit", "never read"]);
    let responses = Arc::clone(&channel.responses);
    let statuses = Arc::clone(&channel.statuses);

    let advisor = Advisor::new(fast_config(), ResponseEngine::new(), Box::new(channel));
    let session = timeout(TEST_TIMEOUT, advisor.run())
        .await
        .expect("advisor loop hung")
        .unwrap();

    let responses = responses.lock().unwrap();
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0], WELCOME_REPLY);
    assert_eq!(responses[1], GREETING_REPLY);
    assert!(responses[2].contains("Alice"));
    assert!(responses[3].contains("₹1,00,000"));

    let statuses = statuses.lock().unwrap();
    assert_eq!(statuses[0], StatusUpdate::PanelToggled { visible: true });
    let typing = statuses.iter().filter(|s| **s == StatusUpdate::Typing).count();
    assert_eq!(typing, 3);

    // welcome + three exchanges; the blank line was never recorded
    assert_eq!(session.transcript().len(), 7);
    assert_eq!(session.transcript()[1].speaker, Speaker::User);
    assert_eq!(session.state().user_name(), "Alice");
}

#[tokio::test]
async fn advisor_loop_without_auto_open_posts_no_welcome() {
    let channel = ScriptedChannel::new(&["xyz123"]);
    let responses = Arc::clone(&channel.responses);

    let config = AdvisorConfig {
        auto_open: false,
        ..fast_config()
    };
    let advisor = Advisor::new(config, ResponseEngine::new(), Box::new(channel));
    let session = timeout(TEST_TIMEOUT, advisor.run())
        .await
        .expect("advisor loop hung")
        .unwrap();

    let responses = responses.lock().unwrap();
    assert_eq!(responses.len(), 1);
    assert!(!session.is_visible());
    // Unnamed and no "@": the first word becomes the name.
    assert_eq!(session.state().user_name(), "xyz123");
}

#[tokio::test]
async fn toggle_command_reopens_without_second_welcome() {
    let channel = ScriptedChannel::new(&["/toggle", "/toggle", "/state"]);
    let responses = Arc::clone(&channel.responses);
    let statuses = Arc::clone(&channel.statuses);

    let advisor = Advisor::new(fast_config(), ResponseEngine::new(), Box::new(channel));
    let session = timeout(TEST_TIMEOUT, advisor.run())
        .await
        .expect("advisor loop hung")
        .unwrap();

    assert_eq!(responses.lock().unwrap().as_slice(), [WELCOME_REPLY.to_string()]);
    assert!(session.is_visible());

    let statuses = statuses.lock().unwrap();
    assert_eq!(
        statuses[..3],
        [
            StatusUpdate::PanelToggled { visible: true },
            StatusUpdate::PanelToggled { visible: false },
            StatusUpdate::PanelToggled { visible: true },
        ]
    );
    match &statuses[3] {
        StatusUpdate::Status(json) => assert!(json.contains("\"email_captured\": false")),
        other => panic!("Expected state dump, got {:?}", other),
    }
}
