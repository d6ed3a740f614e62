mod error;
mod http;
mod render;
mod session;
mod socket;


use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use frames::{Contact, DEFAULT_API_HOST};
use panel::{Conversation, MessageApi, Panel, PanelCore, RealtimeChannel};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::http::HttpMessageApi;
use crate::render::Transcript;
use crate::socket::SocketClient;

#[derive(Parser, Debug)]
#[command(name = "chatline", about = "Terminal client for the chat message API")]
struct Cli {
    #[arg(long, env = "CHAT_BASE_URL", default_value = DEFAULT_API_HOST)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
struct ConversationArgs {
    /// Id of the signed-in user.
    #[arg(long, env = "CHAT_USER_ID")]
    user: String,

    /// Id of the other participant.
    #[arg(long)]
    peer: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the contacts visible to a user.
    Contacts {
        #[arg(long, env = "CHAT_USER_ID")]
        user: String,
    },
    /// Print a conversation's history.
    History(ConversationArgs),
    /// Send one message.
    Send {
        #[command(flatten)]
        conversation: ConversationArgs,
        text: String,
    },
    /// Interactive chat: stdin lines are sent, incoming messages printed.
    Chat {
        #[command(flatten)]
        conversation: ConversationArgs,
        /// Name shown for the peer's messages.
        #[arg(long)]
        peer_name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api = HttpMessageApi::new(&cli.base_url)?;

    match cli.command {
        Command::Contacts { user } => run_contacts(&api, &user).await,
        Command::History(conversation) => run_history(&api, conversation).await,
        Command::Send { conversation, text } => run_send(&cli.base_url, api, conversation, &text).await,
        Command::Chat { conversation, peer_name } => run_chat(&cli.base_url, api, conversation, peer_name).await,
    }
}

fn contact_for(args: &ConversationArgs, peer_name: Option<String>) -> Contact {
    Contact {
        id: args.peer.clone(),
        username: peer_name.unwrap_or_else(|| args.peer.clone()),
        avatar_image: String::new(),
    }
}

const SAVE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

fn print_lines(lines: &[String]) -> Result<(), CliError> {
    render::write_lines(&mut std::io::stdout().lock(), lines)?;
    Ok(())
}

async fn run_contacts(api: &HttpMessageApi, user: &str) -> Result<(), CliError> {
    let contacts = api.contacts(user).await?;
    let lines: Vec<String> = contacts
        .iter()
        .map(|c| format!("{}\t{}", c.id, c.username))
        .collect();
    print_lines(&lines)
}

async fn run_history(api: &HttpMessageApi, args: ConversationArgs) -> Result<(), CliError> {
    let contact = contact_for(&args, None);
    let peer = contact.username.clone();

    let mut core = PanelCore::new();
    let ticket = core.select(Conversation { user_id: args.user, contact });
    let messages = api.fetch_history(ticket.request()).await?;
    core.apply_history(ticket, messages);

    let mut transcript = Transcript::new(peer.as_str());
    let mut lines = vec![render::header(&peer, core.messages().len())];
    lines.extend(transcript.pending(core.messages()));
    print_lines(&lines)
}

async fn run_send(base_url: &str, api: HttpMessageApi, args: ConversationArgs, text: &str) -> Result<(), CliError> {
    let mut core = PanelCore::new();
    let _ = core.select(Conversation { user_id: args.user.clone(), contact: contact_for(&args, None) });
    let Some(outgoing) = core.compose(text) else {
        tracing::warn!("nothing to send");
        return Ok(());
    };

    let socket = match SocketClient::connect(base_url, &args.user).await {
        Ok((socket, _incoming)) => Some(socket),
        Err(e) => {
            tracing::warn!(error = %e, "realtime delivery unavailable");
            None
        }
    };
    if let Some(socket) = &socket {
        if let Err(e) = socket.emit(&outgoing.event) {
            tracing::warn!(error = %e, "realtime emit failed");
        }
    }

    let persisted = api.send_message(&outgoing.request).await;
    if let Some(socket) = socket {
        socket.shutdown().await;
    }
    persisted?;
    Ok(())
}

async fn run_chat(
    base_url: &str,
    api: HttpMessageApi,
    args: ConversationArgs,
    peer_name: Option<String>,
) -> Result<(), CliError> {
    let contact = contact_for(&args, peer_name);
    let peer = contact.username.clone();

    let (socket, mut incoming) = SocketClient::connect(base_url, &args.user).await?;
    let mut panel = Panel::new(args.user, api, socket);
    let mut transcript = Transcript::new(peer.as_str());

    panel.open(contact).await;
    let mut banner = vec![render::header(&peer, panel.core().messages().len())];
    banner.extend(transcript.pending(panel.core().messages()));
    print_lines(&banner)?;

    let mut lines = spawn_stdin_reader();
    let outcome = session::run(
        &mut panel,
        &mut lines,
        &mut incoming,
        &mut transcript,
        &mut std::io::stdout(),
        SAVE_FLUSH_TIMEOUT,
    )
    .await;

    let (_, socket) = panel.into_transports();
    socket.shutdown().await;
    outcome
}

/// Forward stdin lines until end of input or the first read error.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match stdin.next_line().await {
                Ok(Some(line)) => Ok(line),
                Ok(None) => break,
                Err(e) => Err(e),
            };
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}
