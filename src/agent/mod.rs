//! Advisor runtime: command parsing and the per-session message loop.

pub mod agent_loop;
pub mod submission;

pub use agent_loop::Advisor;
pub use submission::{Submission, SubmissionParser};
