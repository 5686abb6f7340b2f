//! Course Advisor — scripted sales chat agent.

pub mod agent;
pub mod channels;
pub mod config;
pub mod conversation;
pub mod error;
