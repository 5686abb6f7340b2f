//! Advisor loop — wires a channel to a session and the response engine.

use futures::StreamExt;

use crate::channels::{Channel, IncomingMessage, OutgoingResponse, StatusUpdate};
use crate::config::AdvisorConfig;
use crate::conversation::{ResponseEngine, Session};
use crate::error::Error;

use super::submission::{HELP_TEXT, Submission, SubmissionParser};

/// Runs one chat session over one channel.
pub struct Advisor {
    config: AdvisorConfig,
    engine: ResponseEngine,
    channel: Box<dyn Channel>,
}

impl Advisor {
    pub fn new(config: AdvisorConfig, engine: ResponseEngine, channel: Box<dyn Channel>) -> Self {
        Self {
            config,
            engine,
            channel,
        }
    }

    /// Serve the session until the user quits, the channel ends or Ctrl+C.
    /// Returns the finished session.
    pub async fn run(&self) -> Result<Session, Error> {
        let mut session = Session::new();
        tracing::info!(session = %session.id, channel = self.channel.name(), "Session started");

        if self.config.auto_open {
            self.toggle(&mut session).await?;
        }

        let mut message_stream = self.channel.start().await?;

        loop {
            let message = tokio::select! {
                biased;
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received, shutting down...");
                    break;
                }
                msg = message_stream.next() => {
                    match msg {
                        Some(m) => m,
                        None => {
                            tracing::info!("Channel stream ended, shutting down...");
                            break;
                        }
                    }
                }
            };

            if !self.handle_message(&mut session, &message).await? {
                tracing::info!("Quit command received, exiting...");
                break;
            }
        }

        tracing::info!(
            session = %session.id,
            phase = %session.state().phase(),
            messages = session.transcript().len(),
            "Session ended"
        );
        self.channel.shutdown().await?;

        Ok(session)
    }

    /// Handle one message. Returns `false` when the session should end.
    async fn handle_message(
        &self,
        session: &mut Session,
        message: &IncomingMessage,
    ) -> Result<bool, Error> {
        match SubmissionParser::parse(&message.content) {
            Submission::UserInput { content } => {
                let Some(reply) = session.submit(&self.engine, &content) else {
                    return Ok(true);
                };
                tracing::debug!(
                    rule = %reply.rule,
                    phase = %session.state().phase(),
                    "Replying"
                );

                self.channel.send_status(StatusUpdate::Typing).await?;
                if !self.config.typing_delay.is_zero() {
                    tokio::time::sleep(self.config.typing_delay).await;
                }
                self.channel
                    .respond(Some(message), OutgoingResponse::text(reply.text))
                    .await?;
            }
            Submission::Toggle => self.toggle(session).await?,
            Submission::ShowState => {
                let json = to_json(session.state());
                self.channel.send_status(StatusUpdate::Status(json)).await?;
            }
            Submission::ShowTranscript => {
                let json = to_json(session.transcript());
                self.channel.send_status(StatusUpdate::Status(json)).await?;
            }
            Submission::Help => {
                self.channel
                    .send_status(StatusUpdate::Status(HELP_TEXT.to_string()))
                    .await?;
            }
            Submission::Quit => return Ok(false),
        }
        Ok(true)
    }

    async fn toggle(&self, session: &mut Session) -> Result<(), Error> {
        let was_empty = session.transcript().is_empty();
        let visible = session.toggle();
        self.channel
            .send_status(StatusUpdate::PanelToggled { visible })
            .await?;

        if visible && was_empty {
            if let Some(welcome) = session.transcript().first() {
                self.channel
                    .respond(None, OutgoingResponse::text(welcome.text.clone()))
                    .await?;
            }
        }
        Ok(())
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}
