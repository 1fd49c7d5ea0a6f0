mod prompt;
mod session;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use concierge::platform::{ClientIdentity, InMemoryIdentity};
use concierge::providers::configs::DifyProviderConfig;
use concierge::providers::dify::DifyProvider;
use concierge::session::ChatSession;
use console::style;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::prompt::cliclack::CliclackPrompt;
use crate::session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Chat backend host
    #[arg(long, env = "CONCIERGE_BACKEND_HOST", default_value = "https://api.dify.ai")]
    host: String,

    /// Chat backend API key
    #[arg(long, env = "CONCIERGE_BACKEND_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Seconds to wait for a complete answer
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Visitor identifier sent to the backend; generated when omitted
    #[arg(long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs would interleave with the chat, so only emit them when asked
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let user = match cli.user {
        Some(user) => user,
        None => InMemoryIdentity::new().recognize(Utc::now()).fingerprint,
    };

    let backend = DifyProvider::new(DifyProviderConfig::new(cli.host, cli.api_key))?;
    let chat = ChatSession::new(Box::new(backend), user)
        .with_timeout(Duration::from_secs(cli.timeout));

    println!(
        "Concierge {}",
        style("- type \"exit\" to end the session").dim()
    );

    let mut session = Session::new(chat, Box::new(CliclackPrompt::new()));
    session.start().await
}
