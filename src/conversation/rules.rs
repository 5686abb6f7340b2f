//! The advisor's rule table.
//!
//! Each rule is a guard on conversation state, a trigger on the user's text
//! and an action that produces the reply (capturing a name or email on the
//! way). Rules are evaluated top to bottom and the first match wins, so the
//! order returned by [`default_rules`] is load-bearing:
//!
//! 1. greeting → 2. "my name is" → 3. first-word name →
//! 4–12. topic keywords → 13. email capture. Anything else gets the fallback.
//!
//! Only rules 1–3 are gated on state. Topic rules and email capture fire in
//! every phase.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::state::{ConversationPhase, ConversationState};

pub const WELCOME_REPLY: &str = "Hello! I'm your course advisor bot. Ask me anything about our programs or let me know your career goals.";

pub const GREETING_REPLY: &str = "Hi there! May I know your name?";

pub const DATA_ENGINEERING_REPLY: &str = "Our flagship Data Engineering program is a 12‑month part‑time course. It covers ETL pipelines, distributed systems and real‑world projects. You can ask for course details or schedule a call.";

pub const SOFTWARE_REPLY: &str = "For software developers, we offer advanced backend and system design specialisations. You can ask for course details or a sample lesson.";

pub const COURSE_DETAILS_REPLY: &str = "Our courses include modules on fundamentals, hands‑on projects, system design, interview prep and capstone projects. Which module interests you the most?";

pub const SAMPLE_LESSON_REPLY: &str = "I will send a free sample lesson to your email once you provide it. You can reply with your email or type “back” to return to the previous menu.";

pub const SCHEDULE_REPLY: &str = "Great! I will share a calendar link to schedule a call. Please provide your email so I can send it to you.";

pub const PRICING_REPLY: &str = "Our premium programs range from ₹1,00,000 to ₹2,50,000 depending on duration and specialisation. Scholarships and EMI plans are available. Let me know if you need a detailed breakdown.";

pub const BACK_REPLY: &str = "No problem. How else can I assist you? You can ask about courses, sample lessons, pricing or scheduling.";

pub const DETAILS_OR_CALL_REPLY: &str = "Please share your email so I can send over a detailed syllabus and a calendar link for a free consultation call.";

pub const ENROLL_REPLY: &str = "To enroll right away, please visit our enrollment page. You can click the “Enroll” link at the top of this page or visit enroll.html.";

pub const FALLBACK_REPLY: &str = "I'm sorry, I'm still learning. Could you tell me a bit more about what you're looking for?";

static NAME_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmy name is\b").expect("name statement pattern"));

static IS_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)is").expect("split token pattern"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern")
});

/// Identifies which rule produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Greeting,
    StatedName,
    FirstWordName,
    DataEngineering,
    Software,
    CourseDetails,
    SampleLesson,
    Schedule,
    Pricing,
    Back,
    DetailsOrCall,
    Enroll,
    EmailCapture,
    /// Not in the table; used when nothing matched.
    Fallback,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Greeting => "greeting",
            Self::StatedName => "stated_name",
            Self::FirstWordName => "first_word_name",
            Self::DataEngineering => "data_engineering",
            Self::Software => "software",
            Self::CourseDetails => "course_details",
            Self::SampleLesson => "sample_lesson",
            Self::Schedule => "schedule",
            Self::Pricing => "pricing",
            Self::Back => "back",
            Self::DetailsOrCall => "details_or_call",
            Self::Enroll => "enroll",
            Self::EmailCapture => "email_capture",
            Self::Fallback => "fallback",
        };
        write!(f, "{s}")
    }
}

/// One user message, prepared for matching.
///
/// Keyword triggers look at the case-folded text; extraction always reads
/// the raw text so captured names and emails keep their casing.
#[derive(Debug, Clone)]
pub struct Turn<'a> {
    raw: &'a str,
    folded: String,
}

impl<'a> Turn<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            folded: raw.to_lowercase(),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.folded.contains(k))
    }
}

/// State precondition for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    /// Email not yet captured.
    AwaitingEmail,
    /// Email not yet captured and no name set.
    AwaitingName,
}

impl Guard {
    fn allows(&self, state: &ConversationState) -> bool {
        match self {
            Self::Always => true,
            Self::AwaitingEmail => state.phase().accepts_introductions(),
            Self::AwaitingName => state.phase() == ConversationPhase::Fresh,
        }
    }
}

/// Text condition for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Folded text contains any of these substrings.
    Keywords(&'static [&'static str]),
    /// Folded text contains the phrase "my name is" on word boundaries.
    NameStatement,
    /// Text contains no "@".
    NoAtSign,
    /// Raw text contains an email-shaped substring.
    EmailAddress,
}

impl Trigger {
    fn fires(&self, turn: &Turn<'_>) -> bool {
        match self {
            Self::Keywords(keywords) => turn.contains_any(keywords),
            Self::NameStatement => NAME_STATEMENT.is_match(turn.folded()),
            Self::NoAtSign => !turn.folded().contains('@'),
            Self::EmailAddress => EMAIL.is_match(turn.raw()),
        }
    }
}

/// What a matched rule does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reply(&'static str),
    CaptureStatedName,
    CaptureFirstWord,
    CaptureEmail,
}

/// A single entry of the rule table.
#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: RuleKind,
    pub guard: Guard,
    pub trigger: Trigger,
    pub action: Action,
}

impl Rule {
    const fn new(kind: RuleKind, guard: Guard, trigger: Trigger, action: Action) -> Self {
        Self {
            kind,
            guard,
            trigger,
            action,
        }
    }

    const fn topic(kind: RuleKind, keywords: &'static [&'static str], reply: &'static str) -> Self {
        Self::new(
            kind,
            Guard::Always,
            Trigger::Keywords(keywords),
            Action::Reply(reply),
        )
    }

    /// Whether this rule applies to `turn` given the current state.
    pub fn matches(&self, turn: &Turn<'_>, state: &ConversationState) -> bool {
        self.guard.allows(state) && self.trigger.fires(turn)
    }

    /// Run the rule's action, mutating `state`, and return the reply text.
    pub fn apply(&self, turn: &Turn<'_>, state: &mut ConversationState) -> String {
        match self.action {
            Action::Reply(text) => text.to_string(),
            Action::CaptureStatedName => {
                let name = stated_name(turn.raw());
                if state.set_name(name) {
                    info!(name = %name, "Captured stated name");
                }
                format!("Nice to meet you, {name}! What are your career goals?")
            }
            Action::CaptureFirstWord => {
                let name = first_word(turn.raw());
                if state.set_name(name) {
                    info!(name = %name, "Captured name from first word");
                }
                format!("Great to meet you, {name}! What are your career goals?")
            }
            Action::CaptureEmail => match find_email(turn.raw()) {
                Some(email) => {
                    state.capture_email();
                    info!("Captured email address");
                    format!(
                        "Thanks, I've captured your email ({email}). Keep an eye out for an email with our course brochure and a link to schedule your free call. Is there anything else you'd like to know?"
                    )
                }
                // Only reachable if the trigger and action disagree.
                None => FALLBACK_REPLY.to_string(),
            },
        }
    }
}

/// The advisor's rules in priority order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            RuleKind::Greeting,
            Guard::AwaitingEmail,
            Trigger::Keywords(&["hello", "hi"]),
            Action::Reply(GREETING_REPLY),
        ),
        Rule::new(
            RuleKind::StatedName,
            Guard::AwaitingName,
            Trigger::NameStatement,
            Action::CaptureStatedName,
        ),
        Rule::new(
            RuleKind::FirstWordName,
            Guard::AwaitingName,
            Trigger::NoAtSign,
            Action::CaptureFirstWord,
        ),
        Rule::topic(
            RuleKind::DataEngineering,
            &["data", "engineer"],
            DATA_ENGINEERING_REPLY,
        ),
        Rule::topic(RuleKind::Software, &["software", "developer"], SOFTWARE_REPLY),
        Rule::topic(
            RuleKind::CourseDetails,
            &["course details", "fundamentals"],
            COURSE_DETAILS_REPLY,
        ),
        Rule::topic(RuleKind::SampleLesson, &["sample lesson"], SAMPLE_LESSON_REPLY),
        Rule::topic(RuleKind::Schedule, &["schedule"], SCHEDULE_REPLY),
        Rule::topic(
            RuleKind::Pricing,
            &["price", "cost", "breakdown", "emi"],
            PRICING_REPLY,
        ),
        Rule::topic(RuleKind::Back, &["back"], BACK_REPLY),
        Rule::topic(
            RuleKind::DetailsOrCall,
            &["details", "call"],
            DETAILS_OR_CALL_REPLY,
        ),
        Rule::topic(RuleKind::Enroll, &["enroll", "join"], ENROLL_REPLY),
        Rule::new(
            RuleKind::EmailCapture,
            Guard::Always,
            Trigger::EmailAddress,
            Action::CaptureEmail,
        ),
    ]
}

/// Everything after the first case-insensitive "is", trimmed.
///
/// The split is purely textual: "is" inside an earlier word ("this", "list")
/// is still the split point. No "is" at all yields an empty name.
pub fn stated_name(raw: &str) -> &str {
    match IS_TOKEN.find(raw) {
        Some(m) => raw[m.end()..].trim(),
        None => "",
    }
}

/// First whitespace-delimited token, or empty.
pub fn first_word(raw: &str) -> &str {
    raw.split_whitespace().next().unwrap_or("")
}

/// Leftmost email-shaped substring of `raw`.
pub fn find_email(raw: &str) -> Option<&str> {
    EMAIL.find(raw).map(|m| m.as_str())
}
