use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use scripture_assistant::cli::Commands;
use scripture_assistant::{
    ChatSession, Container, ContainerConfig, ConversationController, HttpQuestionRelay, Router,
    SYSTEM_PROMPT_ENV,
};

#[derive(Parser)]
#[command(name = "scripture-assistant")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer with canned text instead of calling the model provider
    #[arg(long, global = true)]
    mock_llm: bool,

    /// File holding the system prompt (defaults to SYSTEM_PROMPT_PATH, then the bundled prompt)
    #[arg(long, global = true)]
    system_prompt: Option<PathBuf>,

    /// Base URL of the relay used by `ask` and `chat` (defaults to RELAY_URL)
    #[arg(long, global = true)]
    relay_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// A relay served from this process for `--local` sessions.
struct LocalRelay {
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl LocalRelay {
    async fn start(container: Arc<Container>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();

        let token = shutdown.clone();
        let task = tokio::spawn(async move {
            Router::new(container)
                .serve(listener, async move { token.cancelled().await })
                .await
        });

        Ok(Self {
            addr,
            shutdown,
            task,
        })
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    async fn stop(self) -> Result<()> {
        self.shutdown.cancel();
        self.task.await?
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {e}");
        }
    }

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let system_prompt_path = cli
        .system_prompt
        .clone()
        .or_else(|| std::env::var_os(SYSTEM_PROMPT_ENV).map(PathBuf::from));
    let container_config = ContainerConfig {
        mock_llm: cli.mock_llm,
        system_prompt_path,
    };

    match cli.command {
        Commands::Serve { port, public } => {
            let container = Arc::new(Container::new(container_config)?);
            info!("Answering with model {}", container.model_name());

            let host = if public { "0.0.0.0" } else { "127.0.0.1" };
            if public {
                warn!("Relay is reachable on all network interfaces");
            }
            let listener = TcpListener::bind((host, port)).await?;

            Router::new(container)
                .serve(listener, async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                        std::future::pending::<()>().await;
                    }
                })
                .await?;
        }

        Commands::Ask { question, local } => {
            let local_relay = start_local_relay(local, container_config).await?;
            let session = chat_session(cli.relay_url.as_deref(), local_relay.as_ref());

            session.ask(&question).await?;

            if let Some(relay) = local_relay {
                relay.stop().await?;
            }
        }

        Commands::Chat { local } => {
            let local_relay = start_local_relay(local, container_config).await?;
            let session = chat_session(cli.relay_url.as_deref(), local_relay.as_ref());

            session.run().await?;

            if let Some(relay) = local_relay {
                relay.stop().await?;
            }
        }
    }

    Ok(())
}

async fn start_local_relay(local: bool, config: ContainerConfig) -> Result<Option<LocalRelay>> {
    if !local {
        return Ok(None);
    }

    let container = Arc::new(Container::new(config)?);
    let relay = LocalRelay::start(container).await?;
    debug!("Local relay at {}", relay.url());
    Ok(Some(relay))
}

fn chat_session(relay_url: Option<&str>, local_relay: Option<&LocalRelay>) -> ChatSession {
    let relay = match (local_relay, relay_url) {
        (Some(local), _) => HttpQuestionRelay::new(local.url()),
        (None, Some(url)) => HttpQuestionRelay::new(url),
        (None, None) => HttpQuestionRelay::from_env(),
    };
    debug!("Questions go to {}", relay.url());

    let controller = ConversationController::new(Arc::new(relay));
    ChatSession::new(Arc::new(controller))
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn serve_defaults_to_port_3000_on_loopback() {
        let cli = Cli::try_parse_from(["scripture-assistant", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, public } => {
                assert_eq!(port, 3000);
                assert!(!public);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "scripture-assistant",
            "ask",
            "Who was Moses?",
            "--mock-llm",
            "--relay-url",
            "http://relay:9000",
        ])
        .unwrap();

        assert!(cli.mock_llm);
        assert_eq!(cli.relay_url.as_deref(), Some("http://relay:9000"));
        match cli.command {
            Commands::Ask { question, local } => {
                assert_eq!(question, "Who was Moses?");
                assert!(!local);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn ask_requires_a_question() {
        let res = Cli::try_parse_from(["scripture-assistant", "ask"]);
        assert!(res.is_err(), "ask without a question should not parse");
    }
}
