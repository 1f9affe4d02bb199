mod api;
mod app;
mod commands;
mod drafts;
mod lists;
mod media;
mod schedule;
mod storage;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use app::AppConfig;
use commands::Context;
use commands::config::ConfigCommand;
use commands::drafts::DraftsCommand;
use commands::lists::ListsCommand;
use commands::send::SendArgs;
use commands::store::StoreCommand;

#[derive(Parser)]
#[command(name = "messagehub")]
#[command(about = "Compose, schedule and bulk-send messages through a MessageHub server")]
struct Cli {
    /// Server base URL for this run (overrides config and MESSAGEHUB_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change saved settings
    #[command(subcommand)]
    Config(ConfigCommand),
    #[command(flatten)]
    Client(ClientCommand),
}

/// Everything that runs against the local store and the server.
#[derive(Subcommand)]
enum ClientCommand {
    /// Start a login; the server texts a code to the phone
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        api_id: Option<String>,
        #[arg(long)]
        api_hash: Option<String>,
    },
    /// Finish a login with the received code
    Verify {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        code: String,
        /// Two-step verification password, when the account has one
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    /// Server health and session state
    Status,
    /// List chats the account can message
    Chats {
        #[arg(short, long)]
        filter: Option<String>,
        /// Add the shown chats to this list
        #[arg(long)]
        add_to: Option<String>,
    },
    /// Send now, or schedule with --date and --time (local time)
    Send {
        #[arg(short, long = "list")]
        lists: Vec<String>,
        /// Extra recipient identifiers (@handle or chat id)
        #[arg(long)]
        to: Vec<String>,
        #[arg(short, long, default_value = "")]
        message: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// HH:MM
        #[arg(long)]
        time: Option<String>,
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,
    },
    /// Scheduled messages held by the server
    Scheduled {
        /// Include sent and failed messages
        #[arg(short, long)]
        all: bool,
    },
    /// Send a scheduled message right away
    Execute { id: String },
    /// Delete a scheduled message
    Cancel { id: String },
    /// Scheduler state and counts
    Scheduler,
    /// Preview how a local date and time converts to UTC
    Convert {
        date: String,
        time: String,
        /// IANA zone to use instead of the configured one
        #[arg(long)]
        tz: Option<String>,
    },
    #[command(subcommand)]
    Lists(ListsCommand),
    #[command(subcommand)]
    Drafts(DraftsCommand),
    /// Inspect the local store
    #[command(subcommand)]
    Store(StoreCommand),
}

fn open_context(server: Option<String>) -> Context {
    let mut config = AppConfig::load();
    if let Some(server) = server {
        config.base_url = server;
    }
    Context::open(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        // edits the file as saved, without --server or the env override
        Commands::Config(command) => commands::config::run(AppConfig::load_file(), command),
        Commands::Client(command) => run(command, open_context(cli.server)).await,
    }
}

async fn run(command: ClientCommand, mut ctx: Context) -> Result<()> {
    match command {
        ClientCommand::Login {
            phone,
            api_id,
            api_hash,
        } => commands::auth::login(&mut ctx, &phone, api_id, api_hash).await,
        ClientCommand::Verify {
            phone,
            code,
            password,
        } => commands::auth::verify(&mut ctx, &phone, &code, password.as_deref()).await,
        ClientCommand::Logout => commands::auth::logout(&mut ctx),
        ClientCommand::Status => commands::auth::status(&ctx).await,
        ClientCommand::Chats { filter, add_to } => {
            commands::auth::chats(&mut ctx, filter.as_deref(), add_to.as_deref()).await
        }
        ClientCommand::Send {
            lists,
            to,
            message,
            date,
            time,
            images,
        } => {
            let args = SendArgs {
                lists,
                to,
                message,
                date,
                time,
                images,
            };
            commands::send::run(&ctx, args).await
        }
        ClientCommand::Scheduled { all } => commands::scheduled::list(&mut ctx, all).await,
        ClientCommand::Execute { id } => commands::scheduled::execute(&ctx, &id).await,
        ClientCommand::Cancel { id } => commands::scheduled::cancel(&ctx, &id).await,
        ClientCommand::Scheduler => commands::scheduled::scheduler(&ctx).await,
        ClientCommand::Convert { date, time, tz } => {
            commands::send::preview_conversion(&ctx, &date, &time, tz.as_deref())
        }
        ClientCommand::Lists(command) => commands::lists::run(&mut ctx, command),
        ClientCommand::Drafts(command) => commands::drafts::run(&mut ctx, command).await,
        ClientCommand::Store(command) => commands::store::run(&mut ctx, command),
    }
}
