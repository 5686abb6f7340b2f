//! The seam between the advisor and whatever shows the chat to the user.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChannelError;

/// A line of user text received by a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel that produced the message, e.g. "cli".
    pub channel: String,
    pub user_id: String,
    pub content: String,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(channel: &str, user_id: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            received_at: Utc::now(),
        }
    }
}

/// A bot line to display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingResponse {
    pub content: String,
}

impl OutgoingResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Transient UI state a channel may render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The bot is "typing"; shown until the next response.
    Typing,
    /// Panel visibility changed.
    PanelToggled { visible: bool },
    /// Free-form notice, not part of the conversation.
    Status(String),
}

pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// A chat front end.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Begin receiving messages. Blank lines should never be yielded.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Show a bot line. `msg` is the message being answered, if any.
    async fn respond(
        &self,
        msg: Option<&IncomingMessage>,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
