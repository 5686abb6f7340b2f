use course_advisor::agent::Advisor;
use course_advisor::channels::CliChannel;
use course_advisor::config::AdvisorConfig;
use course_advisor::conversation::ResponseEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the conversation.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AdvisorConfig::from_env()?;

    eprintln!("🎓 Course Advisor v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Typing delay: {}ms", config.typing_delay.as_millis());
    eprintln!("   Type a message and press Enter. /help for commands, /quit to exit.\n");

    let channel = Box::new(CliChannel::new(config.bot_name.clone()));
    let advisor = Advisor::new(config, ResponseEngine::new(), channel);
    let session = advisor.run().await?;

    eprintln!(
        "\n   Session {} ended ({} messages)",
        session.id,
        session.transcript().len()
    );

    Ok(())
}
