//! DutyRoster - per-chat duty rotation
//!
//! CLI entry point; stands in for the chat transport and prints the same
//! status strings a bot would send back.

use std::fs;

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Context, Result};
use tracing::info;

use dutyroster::cli::{Cli, Command, generate_after_help, get_log_dir, get_log_path, normalize_username};
use dutyroster::config::Config;
use dutyroster::{ChatService, ChatStatus};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = get_log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to a log file so command output stays clean
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_path())
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // After-help shows the real log location for this platform
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        "dutyroster loaded config: backend={:?}, bucket={}",
        config.storage.backend, config.storage.bucket
    );

    let service = ChatService::from_config(&config).await?;

    if !cli.command.needs_chat() {
        return cmd_list_chats(&service).await;
    }

    let chat = cli
        .chat
        .to_chat()
        .ok_or_else(|| eyre::eyre!("--chat-id is required for this command"))?;

    match cli.command {
        Command::Init => println!("{} {}", "✓".green(), service.init(&chat).await?),
        Command::Reset => println!("{} {}", "✓".green(), service.reset(&chat).await?),
        Command::Clear => println!("{} {}", "✓".green(), service.clear(&chat).await?),
        Command::SetDutyCount { count } => {
            let count = service.set_duty_count(&chat, count).await?;
            println!("{} Duty count: {}", "✓".green(), count.to_string().cyan());
        }
        Command::Reg { username } => println!("{}", service.reg(&chat, normalize_username(&username)).await?),
        Command::Unreg { username } => println!("{}", service.unreg(&chat, normalize_username(&username)).await?),
        Command::Duty => {
            let users = service.duty(&chat).await?;
            if users.is_empty() {
                println!("Nobody is on duty today");
            }
            for user in users {
                println!("@{}", user.yellow());
            }
        }
        Command::List => {
            let users = service.list(&chat).await?;
            if users.is_empty() {
                println!("No participants registered");
            }
            for user in users {
                println!("@{}", user);
            }
        }
        Command::Recount => {
            let count = service.recount(&chat).await?;
            println!("{} People on duty roster: {}", "✓".green(), count);
        }
        Command::Status => print_status(&chat.display_name(), &service.status(&chat).await?),
        Command::TriggerOn => println!("{} {}", "✓".green(), service.trigger_on(&chat).await?),
        Command::TriggerOff => println!("{} {}", "✓".green(), service.trigger_off(&chat).await?),
        Command::ListChats => cmd_list_chats(&service).await?,
    }

    Ok(())
}

async fn cmd_list_chats(service: &ChatService) -> Result<()> {
    let chats = service.list_chats().await?;
    if chats.is_empty() {
        println!("No chats with an enabled trigger");
    }
    for chat in chats {
        println!("{} {}", chat.chat_type.cyan(), chat.id);
    }
    Ok(())
}

fn print_status(name: &str, status: &ChatStatus) {
    println!("Chat: {}", name.cyan());
    println!("  Duty count: {}", status.properties.duty_count);
    println!("  People: {}", status.properties.count_people);
    println!("  Roster: {}", status.roster.join(", "));
    println!("  Last duty: {}", status.properties.last_duty.join(", "));
    match status.trigger {
        Some(trigger) => println!("  Trigger: {} at {:02}:00", "on".green(), trigger.time),
        None => println!("  Trigger: {}", "off".dimmed()),
    }
}
