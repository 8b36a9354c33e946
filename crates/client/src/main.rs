//! fanclub-client CLI entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fanclub_cache::storage::FileStorage;
use fanclub_cache::{CacheConfig, CacheContext};
use fanclub_client::cli::cache::CacheAction as CacheCommandAction;
use fanclub_client::cli::chat::ChatAction;
use fanclub_client::cli::clubs::ClubsAction;
use fanclub_client::cli::{Cli, Commands, OutputFormat};
use fanclub_client::client::clubs::{CreateClubRequest, UpdateClubRequest};
use fanclub_client::output::{format_output, pretty};
use fanclub_client::FanclubClient;
use fanclub_core::cache::{CacheAction, ResourceKey};
use fanclub_core::domain::{ChatMessage, Club, User};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fanclub_client=info,fanclub_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = FileStorage::open(&cli.cache_file)
        .await
        .with_context(|| format!("failed to open cache file {}", cli.cache_file.display()))?;
    let client = FanclubClient::new(&cli.base_url);
    let context = CacheContext::init(
        CacheConfig::from_env(),
        Arc::new(storage),
        Arc::new(client.clone()),
    );

    run(cli, &client, context).await
}

async fn run(cli: Cli, client: &FanclubClient, context: CacheContext) -> anyhow::Result<()> {
    let format = cli.format;

    match cli.command {
        Commands::User { refresh } => {
            let user: User = if refresh {
                decode(context.coordinator().refresh_user_data().await?)?
            } else {
                read(&context, &ResourceKey::UserProfile).await?
            };
            print(format, &user, pretty::format_user);
        }
        Commands::Clubs(clubs_cmd) => match clubs_cmd.action {
            ClubsAction::List { refresh } => {
                let clubs: Vec<Club> = if refresh {
                    decode(context.coordinator().refresh_clubs_data().await?)?
                } else {
                    read(&context, &ResourceKey::ClubList).await?
                };
                print(format, &clubs, |clubs| pretty::format_clubs(clubs));
            }
            ClubsAction::Get { id } => {
                let clubs: Vec<Club> = read(&context, &ResourceKey::ClubList).await?;
                let club = match clubs.into_iter().find(|club| club.id == id) {
                    Some(club) => club,
                    None => client.get_club(&id).await?,
                };
                print(format, &club, pretty::format_club);
            }
            ClubsAction::Create {
                name,
                sport,
                description,
            } => {
                let club = client
                    .create_club(&CreateClubRequest {
                        name,
                        sport,
                        description,
                    })
                    .await?;
                apply(&context, CacheAction::ClubCreated(club.clone())).await;
                match format {
                    OutputFormat::Json => println!("{}", format_output(&club, format)),
                    OutputFormat::Pretty => println!("Created:\n{}", pretty::format_club(&club)),
                }
            }
            ClubsAction::Update {
                id,
                name,
                sport,
                description,
            } => {
                let club = client
                    .update_club(
                        &id,
                        &UpdateClubRequest {
                            name,
                            sport,
                            description,
                        },
                    )
                    .await?;
                apply(&context, CacheAction::ClubUpdated(club.clone())).await;
                match format {
                    OutputFormat::Json => println!("{}", format_output(&club, format)),
                    OutputFormat::Pretty => println!("Updated:\n{}", pretty::format_club(&club)),
                }
            }
            ClubsAction::Delete { id } => {
                client.delete_club(&id).await?;
                apply(&context, CacheAction::ClubDeleted { club_id: id.clone() }).await;
                if !cli.quiet {
                    println!("Deleted club {}", id);
                }
            }
        },
        Commands::Chat(chat_cmd) => match chat_cmd.action {
            ChatAction::History { room_id } => {
                let messages: Vec<ChatMessage> =
                    read(&context, &ResourceKey::chat_history(room_id.clone())).await?;
                print(format, &messages, |messages| {
                    pretty::format_messages(&room_id, messages)
                });
            }
            ChatAction::Send { room_id, body } => {
                let message = client.send_message(&room_id, &body).await?;
                apply(
                    &context,
                    CacheAction::MessageSent {
                        room_id,
                        message: message.clone(),
                    },
                )
                .await;
                print(format, &message, pretty::format_message);
            }
        },
        Commands::Cache(cache_cmd) => match cache_cmd.action {
            CacheCommandAction::Status => {
                let status = context.coordinator().get_cache_status().await;
                print(format, &status, pretty::format_status);
            }
            CacheCommandAction::Stats { warm, window } => {
                if warm {
                    context.coordinator().warm_cache().await;
                }
                let monitor = context
                    .monitor()
                    .context("cache monitor is disabled (CACHE_MONITOR_ENABLED)")?;
                let window = chrono::Duration::try_seconds(window)
                    .with_context(|| format!("statistics window of {} seconds is out of range", window))?;
                let stats = monitor.get_stats(window);
                print(format, &stats, pretty::format_stats);
            }
            CacheCommandAction::Logs { warm } => {
                if warm {
                    context.coordinator().warm_cache().await;
                }
                let monitor = context
                    .monitor()
                    .context("cache monitor is disabled (CACHE_MONITOR_ENABLED)")?;
                let logs = monitor.get_logs();
                print(format, &logs, |logs| pretty::format_logs(logs));
            }
            CacheCommandAction::Clear => {
                let removed = context.coordinator().clear_all().await?;
                report_count(format, cli.quiet, "removed", removed);
            }
            CacheCommandAction::Warm => {
                let report = context.coordinator().warm_cache().await;
                print(format, &report, pretty::format_warm);
            }
            CacheCommandAction::Sweep => {
                let evicted = context.store().sweep_expired().await?;
                report_count(format, cli.quiet, "evicted", evicted);
            }
        },
        Commands::Logout => {
            context.teardown().await?;
            if !cli.quiet {
                println!("Logged out, cache cleared");
            }
        }
    }

    Ok(())
}

/// Resolves a resource through the query layer and decodes it.
async fn read<T: DeserializeOwned>(
    context: &CacheContext,
    resource: &ResourceKey,
) -> anyhow::Result<T> {
    let value = context
        .cache_aside()
        .query(context.queries(), resource)
        .await?;
    decode(value)
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> anyhow::Result<T> {
    serde_json::from_value(value).context("unexpected response shape")
}

/// Keeps the cache consistent after a successful API mutation. The API
/// call already succeeded, so cache failures only warn.
async fn apply(context: &CacheContext, action: CacheAction) {
    if let Err(err) = context.coordinator().handle(&action).await {
        tracing::warn!(action = action.name(), error = %err, "Cache update failed");
    }
}

fn print<T, F>(format: OutputFormat, value: &T, pretty: F)
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => println!("{}", format_output(&value, format)),
        OutputFormat::Pretty => println!("{}", pretty(value)),
    }
}

fn report_count(format: OutputFormat, quiet: bool, label: &str, count: usize) {
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ label: count })),
        OutputFormat::Pretty if !quiet => println!("{} {} cache entries", capitalize(label), count),
        OutputFormat::Pretty => {}
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
