use std::process::ExitCode;

use team_dashboard::config::Config;
use team_dashboard::dashboard::Dashboard;
use team_dashboard::model::{FixtureId, Notification};
use team_dashboard::seed::Season;
use team_dashboard::webhook::DiscordWebhook;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// One line typed on stdin.
#[derive(Debug, PartialEq, Eq)]
enum Intent<'a> {
    Register(FixtureId),
    Unregister(FixtureId),
    Say(&'a str),
    Fixtures,
    Chat,
    Quit,
    Unknown,
}

fn parse_intent(line: &str) -> Intent<'_> {
    let line = line.trim();
    let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
    let id = || rest.trim().parse::<u32>().ok().map(FixtureId);
    match cmd {
        "register" => id().map_or(Intent::Unknown, Intent::Register),
        "unregister" => id().map_or(Intent::Unknown, Intent::Unregister),
        "say" => Intent::Say(rest),
        "fixtures" => Intent::Fixtures,
        "chat" => Intent::Chat,
        "quit" | "exit" => Intent::Quit,
        _ => Intent::Unknown,
    }
}

fn forward(notification: Notification, webhook: Option<&DiscordWebhook>) {
    info!(
        title = %notification.title,
        description = %notification.description,
        kind = ?notification.kind,
        duration_ms = notification.duration.as_millis() as u64,
        "Notification"
    );
    if let Some(webhook) = webhook.cloned() {
        tokio::task::spawn_blocking(move || {
            if let Err(e) = webhook.post(&notification) {
                error!(error = %e, "Webhook delivery failed");
            }
        });
    }
}

fn print_fixtures(dashboard: &Dashboard) {
    for view in dashboard.fixtures() {
        let f = &view.fixture;
        let roster: Vec<&str> = f.roster().iter().map(|p| p.display_name(dashboard.local_user_name())).collect();
        println!(
            "[{}] {} ({:?}) {} {} @ {} | {}/{} | spots left: {}{}{} | {}",
            f.id,
            f.opponent,
            f.side,
            f.day_label(),
            f.time_label(),
            f.venue,
            f.roster().len(),
            f.max_players,
            view.spots_left,
            if view.near_capacity { " (!)" } else { "" },
            if view.is_registered { " | registered" } else { "" },
            roster.join(", ")
        );
    }
}

fn print_chat(dashboard: &Dashboard) {
    for m in dashboard.chat() {
        println!("{} {}: {}", m.time, m.author.display_name(dashboard.local_user_name()), m.text);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging with tracing
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .try_init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    // Loading may fetch the league page with a blocking client.
    let load_config = config.clone();
    let season = match tokio::task::spawn_blocking(move || Season::load(&load_config)).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => {
            error!(error = %e, "Failed to load season");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!(error = %e, "Season loading task failed");
            return ExitCode::FAILURE;
        }
    };
    let webhook = config.discord_hook_url.clone().map(DiscordWebhook::new);

    let (mut dashboard, mut notifications) = Dashboard::start(&config, season);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(notification) = notifications.recv() => forward(notification, webhook.as_ref()),
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!(error = %e, "Failed to read stdin");
                        break;
                    }
                };
                match parse_intent(&line) {
                    Intent::Register(id) => {
                        let outcome = dashboard.register_for_fixture(id);
                        if !outcome.is_changed() {
                            println!("No change: {:?}", outcome);
                        }
                    }
                    Intent::Unregister(id) => {
                        let outcome = dashboard.unregister_from_fixture(id);
                        if !outcome.is_changed() {
                            println!("No change: {:?}", outcome);
                        }
                    }
                    Intent::Say(text) => {
                        if dashboard.send_chat_message(text).is_none() {
                            println!("Empty message ignored");
                        }
                    }
                    Intent::Fixtures => print_fixtures(&dashboard),
                    Intent::Chat => print_chat(&dashboard),
                    Intent::Quit => break,
                    Intent::Unknown => {
                        println!("Commands: register <id>, unregister <id>, say <text>, fixtures, chat, quit");
                    }
                }
            }
        }
    }

    dashboard.shutdown();
    // Deliver whatever the last intents produced before exiting.
    while let Ok(notification) = notifications.try_recv() {
        forward(notification, webhook.as_ref());
    }
    ExitCode::SUCCESS
}
