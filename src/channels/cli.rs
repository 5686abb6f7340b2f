//! CLI channel — stdin/stdout REPL standing in for the chat panel.

use std::io::Write;

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse, StatusUpdate};
use crate::error::ChannelError;

/// Reads user lines from stdin and prints bot lines to stdout.
///
/// Prompts and the typing indicator go to stderr so stdout carries only the
/// conversation.
pub struct CliChannel {
    bot_name: String,
}

impl CliChannel {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
        }
    }

    fn prompt() -> Result<(), ChannelError> {
        eprint!("> ");
        std::io::stderr().flush()?;
        Ok(())
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            eprint!("> ");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim().to_string();
                        if line.is_empty() {
                            eprint!("> ");
                            continue;
                        }
                        let msg = IncomingMessage::new("cli", "local-user", &line);
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        _msg: Option<&IncomingMessage>,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        // Clear the prompt or typing indicator line.
        eprint!("\r\x1b[K");
        println!("{}: {}\n", self.bot_name, response.content);
        std::io::stdout().flush()?;
        Self::prompt()
    }

    async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError> {
        match status {
            StatusUpdate::Typing => {
                eprint!("{} is typing...", self.bot_name);
                std::io::stderr().flush()?;
            }
            StatusUpdate::PanelToggled { visible } => {
                if visible {
                    eprintln!("💬 Chat opened");
                } else {
                    eprintln!("💬 Chat closed (type /toggle to reopen)");
                }
                Self::prompt()?;
            }
            StatusUpdate::Status(msg) => {
                eprintln!("ℹ️  {}", msg);
                Self::prompt()?;
            }
        }
        Ok(())
    }
}
