use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use airin::episodes::{episode_links, providers_map};
use airin::graphql::ANILIST_GRAPHQL_ENDPOINT;
use airin::list::SkipReason;
use airin::{
    AniListClient, AudioTrack, ClientOptions, EpisodeMetadata, Notification, Notifier,
    ProgressUpdate, ProviderEpisodes, ReqwestClient, SaveOutcome, SharedNotifier, StatsOverview,
    authorize_url, combine_episode_meta, ensure_custom_list, fetch_list_entry,
    fetch_notifications, fetch_user_profile, fetch_viewer, fetch_watch_info, load_json_file,
    save_progress,
};

// Emoji with fallback for terminals without Unicode support
static TV: Emoji<'_, '_> = Emoji("📺 ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "[-] ");
static BELL: Emoji<'_, '_> = Emoji("🔔 ", "[*] ");
static CHART: Emoji<'_, '_> = Emoji("📊 ", "[#] ");

/// AniList companion: progress sync, episode metadata and profile stats
#[derive(Parser, Debug)]
#[command(name = "airin")]
#[command(about = "AniList companion: progress sync, episode metadata and profile stats")]
#[command(version)]
struct Args {
    /// AniList access token
    #[arg(long, env = "ANILIST_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// GraphQL endpoint
    #[arg(
        long,
        env = "ANILIST_GRAPHQL_ENDPOINT",
        global = true,
        default_value = ANILIST_GRAPHQL_ENDPOINT
    )]
    endpoint: String,

    /// Quiet mode - suppress decorative output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push watch progress to the viewer's AniList list
    SaveProgress {
        media_id: u64,
        /// Highest episode watched
        progress: u32,
        /// Episode count of the anime, marks the entry completed when reached
        #[arg(long)]
        total: Option<u32>,
    },

    /// Show the viewer's list entry for an anime
    Entry { media_id: u64 },

    /// Merge provider episode lists with an episode metadata feed (JSON to stdout)
    Merge {
        /// JSON file with provider episode lists
        episodes: PathBuf,
        /// JSON file with episode metadata records
        metadata: PathBuf,
    },

    /// Show sub/dub availability and the default provider (JSON to stdout)
    Providers {
        episodes: PathBuf,
        /// Provider already selected
        #[arg(long = "default")]
        default_provider: Option<String>,
    },

    /// List player links for a provider's episodes
    Links {
        episodes: PathBuf,
        media_id: u64,
        /// Provider to list; defaults to the first one
        #[arg(long)]
        provider: Option<String>,
        #[arg(long, default_value = "sub")]
        track: AudioTrack,
        /// Watched episodes are marked up to this number
        #[arg(long)]
        progress: Option<u32>,
        /// Episode currently playing
        #[arg(long)]
        current: Option<u32>,
    },

    /// Show a user's lists and statistics
    Profile { username: String },

    /// Show the viewer's notifications
    Notifications {
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Show player-page details of an anime
    Media { media_id: u64 },

    /// Show the user the token belongs to
    Viewer {
        /// Register the site's custom list if it is missing
        #[arg(long)]
        ensure_list: bool,
    },

    /// Print the OAuth authorization URL for a client id
    AuthorizeUrl { client_id: String },
}

/// Prints notifications the way the site shows toasts
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success { message } => println!("{SUCCESS}{}", message.green()),
            Notification::Error { message } => eprintln!("{FAILURE}{}", message.red()),
        }
    }
}

fn init_tracing() {
    let default_filter = format!("{}=warn,reqwest=warn", env!("CARGO_CRATE_NAME"));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap(),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_message(format!("{SEARCH}{}", message));
    bar
}

fn require_token(token: Option<&str>) -> Result<&str> {
    token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("An AniList token is required (--token or ANILIST_TOKEN)"))
}

fn describe_skip(reason: SkipReason) -> String {
    match reason {
        SkipReason::Finished(status) => format!("entry is {}, progress left as is", status),
        SkipReason::WouldRegress { remote, requested } => format!(
            "AniList is already at episode {}, not going back to {}",
            remote, requested
        ),
        SkipReason::Unchanged => "progress already up to date".to_string(),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let client = AniListClient::new(
        ReqwestClient::new(),
        ClientOptions {
            endpoint: args.endpoint.clone(),
        },
    );
    let token = args.token.as_deref();
    let quiet = args.quiet;

    match args.command {
        Command::SaveProgress {
            media_id,
            progress,
            total,
        } => {
            let notifier: SharedNotifier = Arc::new(ConsoleNotifier);
            let update = ProgressUpdate::new(media_id, progress).with_total_episodes(total);

            let bar = spinner(quiet, "Saving progress to AniList");
            let outcome = save_progress(&client, token, update, &notifier).await;
            bar.finish_and_clear();

            match outcome {
                SaveOutcome::NoToken => {
                    if !quiet {
                        println!("{}", "No AniList token, nothing saved".dimmed());
                    }
                }
                SaveOutcome::Skipped(reason) => {
                    if !quiet {
                        println!("{SKIP}{}", describe_skip(reason).dimmed());
                    }
                }
                SaveOutcome::Saved { .. } => {}
                SaveOutcome::Rejected(_) | SaveOutcome::Failed(_) => std::process::exit(1),
            }
        }

        Command::Entry { media_id } => {
            let token = require_token(token)?;
            let bar = spinner(quiet, "Fetching list entry");
            let entry = fetch_list_entry(&client, Some(token), media_id).await;
            bar.finish_and_clear();

            match entry.context("Failed to fetch list entry")? {
                Some(entry) => println!(
                    "{TV}{} • episode {}",
                    entry
                        .status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "UNKNOWN".into())
                        .bold()
                        .green(),
                    entry.progress.unwrap_or(0).to_string().cyan()
                ),
                None => println!("{TV}{}", "Not on your list".yellow()),
            }
        }

        Command::Merge { episodes, metadata } => {
            let episode_data: Vec<ProviderEpisodes> = load_json_file(&episodes)?;
            let metadata: Vec<EpisodeMetadata> = load_json_file(&metadata)?;
            print_json(&combine_episode_meta(&episode_data, &metadata))?;
        }

        Command::Providers {
            episodes,
            default_provider,
        } => {
            let episode_data: Vec<ProviderEpisodes> = load_json_file(&episodes)?;
            print_json(&providers_map(&episode_data, default_provider.as_deref()))?;
        }

        Command::Links {
            episodes,
            media_id,
            provider,
            track,
            progress,
            current,
        } => {
            let episode_data: Vec<ProviderEpisodes> = load_json_file(&episodes)?;
            let summary = providers_map(&episode_data, provider.as_deref());
            let selected = summary
                .default_provider
                .as_deref()
                .and_then(|id| episode_data.iter().find(|p| p.provider_id == id))
                .context("No matching provider in episode data")?;

            for link in episode_links(media_id, selected, track, progress, current) {
                let number = if link.current {
                    link.number.to_string().bold().cyan()
                } else if link.watched {
                    link.number.to_string().dimmed()
                } else if link.filler {
                    link.number.to_string().yellow()
                } else {
                    link.number.to_string().normal()
                };
                println!("{:>5}  {}", number, link.href);
            }
        }

        Command::Profile { username } => {
            let bar = spinner(quiet, &format!("Fetching profile of {}", username));
            let profile = fetch_user_profile(&client, token, &username).await;
            bar.finish_and_clear();
            let profile = profile.context("Failed to fetch profile")?;

            println!("\n{}", username.bold().magenta());
            for list in &profile.lists {
                println!(
                    "  {} {}",
                    list.name.cyan(),
                    list.entries.len().to_string().dimmed()
                );
            }

            if let Some(stats) = profile.statistics() {
                let overview = StatsOverview::from_statistics(stats);
                println!(
                    "\n{CHART}{} anime • {} episodes • mean score {:.1}",
                    overview.total_anime.to_string().green().bold(),
                    overview.episodes_watched.to_string().green(),
                    overview.mean_score
                );
                println!(
                    "  watched {}d {}h {}m",
                    overview.watch_time.days, overview.watch_time.hours, overview.watch_time.minutes
                );
                for share in &overview.statuses {
                    println!(
                        "  {:<10} {:>4} ({}%)",
                        share.status.as_str(),
                        share.count,
                        share.percent
                    );
                }
                if !overview.top_genres.is_empty() {
                    let genres: Vec<_> =
                        overview.top_genres.iter().map(|g| g.genre.as_str()).collect();
                    println!("  top genres: {}", genres.join(", ").yellow());
                }
            }
        }

        Command::Notifications { page } => {
            let token = require_token(token)?;
            let bar = spinner(quiet, "Fetching notifications");
            let result = fetch_notifications(&client, token, page).await;
            bar.finish_and_clear();
            let notifications = result.context("Failed to fetch notifications")?;

            for notification in &notifications.notifications {
                let when = notification
                    .created_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("{BELL}{} {}", when.dimmed(), notification.message());
            }
            if notifications.page_info.has_next_page && !quiet {
                println!("{}", format!("more on page {}", page + 1).dimmed());
            }
        }

        Command::Media { media_id } => {
            let bar = spinner(quiet, "Fetching anime details");
            let info = fetch_watch_info(&client, token, media_id).await;
            bar.finish_and_clear();
            let info = info.context("Failed to fetch anime details")?;

            println!("{TV}{}", info.title.preferred().bold().green());
            println!(
                "  {} • {} episodes ({} available)",
                info.status.as_deref().unwrap_or("UNKNOWN"),
                info.episodes.map_or("?".into(), |e| e.to_string()),
                info.available_episodes()
                    .map_or("?".into(), |e| e.to_string())
            );
            if let Some(next) = &info.next_airing_episode {
                println!(
                    "  episode {} airs in {}h",
                    next.episode,
                    next.time_until_airing / 3600
                );
            }
            if let Some(entry) = &info.media_list_entry {
                println!(
                    "  your progress: {}",
                    entry.progress.unwrap_or(0).to_string().cyan()
                );
            }
        }

        Command::Viewer { ensure_list } => {
            let token = require_token(token)?;
            let bar = spinner(quiet, "Fetching viewer");
            let viewer = fetch_viewer(&client, token).await;
            bar.finish_and_clear();
            let viewer = viewer.context("Failed to fetch viewer")?;

            println!("{} ({})", viewer.name.bold().magenta(), viewer.id);
            if !viewer.custom_lists().is_empty() {
                println!("  custom lists: {}", viewer.custom_lists().join(", "));
            }

            if ensure_list {
                let created = ensure_custom_list(&client, token, &viewer)
                    .await
                    .context("Failed to update custom lists")?;
                if created {
                    println!("{SUCCESS}{}", "Registered custom list".green());
                }
            }
        }

        Command::AuthorizeUrl { client_id } => {
            let url = authorize_url(&client_id).context("Failed to build authorization URL")?;
            println!("{}", url);
        }
    }

    Ok(())
}
