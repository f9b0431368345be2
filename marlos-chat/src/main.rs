//! `marlos`, the terminal front-end for the Marlos support assistant.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use marlos_chat::{ChatSession, Notice, Turn};
use marlos_core::export::ExportFormat;
use marlos_core::{ApiSettings, ChatMessage, MarlosConfig, Role};

#[derive(Debug, Parser)]
#[command(name = "marlos", version, about = "IT-support chat assistant with a local knowledge base")]
struct Cli {
    /// Path to `marlos.toml`.
    #[arg(long, global = true, env = "MARLOS_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database for history and settings (overrides the config).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive conversation (default).
    Chat,
    /// Ask a single question and print the reply.
    Ask {
        /// The question.
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Print the stored conversation.
    History,
    /// Delete the stored conversation.
    Clear,
    /// Export the stored conversation.
    Export {
        /// txt, json or html.
        #[arg(long, default_value = "txt")]
        format: String,
        /// Write here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show or change the remote API settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Send a test request to the configured API.
    Probe,
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    /// Print the current settings (key masked).
    Show,
    /// Replace the settings.
    Set {
        /// Endpoint URL.
        #[arg(long)]
        url: String,
        /// Value for the X-RapidAPI-Host header.
        #[arg(long)]
        host: String,
        /// Value for the X-RapidAPI-Key header.
        #[arg(long, env = "MARLOS_API_KEY")]
        key: String,
        /// Sampling temperature.
        #[arg(long)]
        temperature: Option<f32>,
        /// Generation token limit.
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// Clear URL, host and key (local mode).
    Reset,
}

fn load_config(cli: &Cli) -> Result<MarlosConfig> {
    let mut config = match &cli.config {
        Some(path) => MarlosConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => MarlosConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.history.db_path.clone_from(db);
    }
    Ok(config)
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_message(message: &ChatMessage) {
    let author = match message.role {
        Role::User => "Tú",
        Role::Bot => "Marlos",
    };
    let time = message.meta.timestamp.with_timezone(&Local).format("%H:%M:%S");
    println!("[{time}] {author}: {}", message.text);
}

fn print_notice(notice: &Notice) {
    eprintln!("{notice}");
}

fn print_turn(turn: &Turn) {
    print_message(&turn.reply);
    if let Some(notice) = &turn.notice {
        print_notice(notice);
    }
}

fn write_export(session: &ChatSession, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let outcome = session.export(format)?;
    let Some(content) = outcome.content else {
        print_notice(&outcome.notice);
        return Ok(());
    };
    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} ({}, {})", outcome.notice, path.display(), outcome.mime_type);
        }
        None => {
            println!("{content}");
            print_notice(&outcome.notice);
        }
    }
    Ok(())
}

async fn run_chat(session: &mut ChatSession) -> Result<()> {
    for message in session.opening()? {
        print_message(&message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "/quit" | "/exit" => break,
            "/clear" => {
                let (greeting, notice) = session.clear()?;
                print_message(&greeting);
                print_notice(&notice);
            }
            _ if line.starts_with("/export") => {
                let name = line.trim_start_matches("/export").trim();
                let name = if name.is_empty() { "txt" } else { name };
                let Ok(format) = name.parse::<ExportFormat>() else {
                    print_notice(&Notice::error(format!("Formato desconocido: {name}")));
                    continue;
                };
                let path = PathBuf::from(format.file_name());
                if let Err(e) = write_export(session, format, Some(path)) {
                    print_notice(&Notice::error(format!("No se pudo exportar: {e:#}")));
                }
            }
            _ => {
                if let Some(turn) = session.send(line).await? {
                    print_turn(&turn);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.general.log_level, cli.log_json);

    let mut session = ChatSession::open(&config).context("failed to open chat session")?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(&mut session).await?,
        Command::Ask { message } => {
            let text = message.join(" ");
            match session.send(&text).await? {
                Some(turn) => print_turn(&turn),
                None => bail!("empty message"),
            }
        }
        Command::History => {
            for message in session.history()? {
                print_message(&message);
            }
        }
        Command::Clear => {
            let (_, notice) = session.clear()?;
            print_notice(&notice);
        }
        Command::Export { format, output } => {
            let format: ExportFormat = format.parse()?;
            write_export(&session, format, output)?;
        }
        Command::Settings { action } => match action {
            SettingsAction::Show => {
                let s = session.settings()?;
                println!("url:         {}", s.api_url);
                println!("host:        {}", s.api_host);
                println!("key:         {}", s.masked_key());
                println!(
                    "temperature: {}",
                    s.temperature.map_or_else(|| "(default)".to_string(), |t| t.to_string())
                );
                println!(
                    "max_tokens:  {}",
                    s.max_tokens.map_or_else(|| "(default)".to_string(), |t| t.to_string())
                );
                println!("mode:        {}", if s.is_complete() { "remote" } else { "local" });
            }
            SettingsAction::Set {
                url,
                host,
                key,
                temperature,
                max_tokens,
            } => {
                let mut settings = ApiSettings::new(&url, &host, &key);
                settings.temperature = temperature;
                settings.max_tokens = max_tokens;
                print_notice(&session.save_settings(&settings)?);
            }
            SettingsAction::Reset => print_notice(&session.reset_settings()?),
        },
        Command::Probe => {
            let settings = session.settings()?;
            let notice = session.test_connection(&settings).await;
            print_notice(&notice);
            if notice.is_error() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
