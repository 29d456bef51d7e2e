//! Daytrace - cached TimeCamp activity viewer
//!
//! Command-line entry point. Every subcommand goes through the same
//! [`AppContext`] the UI bridge uses.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use daytrace_core::format_duration;
use daytrace_domain::constants::DATE_FORMAT;
use daytrace_domain::{extract_duration, is_past_date, Config};
use daytrace_lib::utils::logging::init_tracing;
use daytrace_lib::{commands, dispatch, ActivityResponse, AppContext};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "daytrace", version)]
#[command(about = "Fetch and cache daily TimeCamp activity", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(long, global = true, help = "Path to a JSON or TOML config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log filter, e.g. `debug` (RUST_LOG wins when set)")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Show the activities recorded on a day")]
    Fetch {
        #[command(flatten)]
        token: TokenArg,
        #[arg(long, help = "Day to fetch, YYYY-MM-DD. Defaults to today")]
        date: Option<String>,
        #[arg(long, help = "Ignore the cache and ask the API again")]
        force: bool,
        #[arg(long, help = "Print the full response as JSON")]
        json: bool,
    },
    #[command(about = "Inspect or maintain the local cache")]
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
    #[command(about = "Call a bridge channel such as `cache:getStats` directly")]
    Invoke {
        channel: String,
        #[arg(help = "Positional arguments as a JSON array, e.g. '[\"2024-03-01\", \"token\"]'")]
        args: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    #[command(about = "List cached dates, newest first")]
    Dates {
        #[command(flatten)]
        token: TokenArg,
    },
    #[command(about = "Entry count and date range")]
    Stats {
        #[command(flatten)]
        token: TokenArg,
    },
    #[command(about = "Most recently written entries across all tokens")]
    List,
    #[command(about = "Remove one cached day")]
    Delete {
        #[command(flatten)]
        token: TokenArg,
        #[arg(long)]
        date: String,
    },
    #[command(about = "Remove every cached day for a token")]
    Clear {
        #[command(flatten)]
        token: TokenArg,
    },
    #[command(about = "Evict entries written more than N days ago")]
    Prune {
        #[arg(long, help = "Maximum age in days. Defaults to the configured retention")]
        days: Option<u32>,
    },
}

#[derive(Args, Debug)]
struct TokenArg {
    #[arg(long = "token", env = "DAYTRACE_API_TOKEN", hide_env_values = true)]
    value: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await.inspect_err(|e| {
        error!("daytrace failed: {e:#}");
    })
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config)?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level);

    let ctx = AppContext::new_with_config(config)
        .await
        .context("failed to initialise application context")?;

    match cli.command {
        Command::Fetch { token, date, force, json } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().format(DATE_FORMAT).to_string());
            let response = commands::fetch_activities(&ctx, &token.value, &date, force)
                .await
                .map_err(anyhow::Error::msg)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_day(&date, &response);
            }
        }
        Command::Cache { command } => run_cache_command(&ctx, command).await?,
        Command::Invoke { channel, args } => {
            let args = match args {
                Some(raw) => serde_json::from_str(&raw).context("ARGS_JSON is not valid JSON")?,
                None => serde_json::Value::Array(Vec::new()),
            };
            let value = dispatch(&ctx, &channel, args).await.map_err(anyhow::Error::msg)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => daytrace_infra::config::load_from_file(Some(path))?,
        None => daytrace_infra::config::load()?,
    };
    Ok(config)
}

async fn run_cache_command(ctx: &AppContext, command: CacheCommand) -> Result<()> {
    match command {
        CacheCommand::Dates { token } => {
            for date in commands::cache_get_all_dates(ctx, &token.value).await {
                let marker = if is_past_date(&date) { "" } else { "  (today or later)" };
                println!("{date}{marker}");
            }
        }
        CacheCommand::Stats { token } => {
            let stats = commands::cache_get_stats(ctx, &token.value).await;
            println!("entries: {}", stats.total_entries);
            if let (Some(oldest), Some(newest)) = (stats.oldest_date, stats.newest_date) {
                println!("range:   {oldest} .. {newest}");
            }
        }
        CacheCommand::List => {
            for entry in commands::cache_list_all(ctx).await {
                let cached_at = chrono::DateTime::from_timestamp_millis(entry.cached_at)
                    .map(|ts| ts.to_rfc3339())
                    .unwrap_or_else(|| entry.cached_at.to_string());
                println!(
                    "{}  {:>8} chars  {}  {}",
                    entry.date,
                    entry.data_length,
                    cached_at,
                    mask_token(&entry.api_token)
                );
            }
        }
        CacheCommand::Delete { token, date } => {
            if daytrace_domain::validate_date(&date).is_err() {
                bail!("invalid date: {date}");
            }
            commands::cache_delete(ctx, &date, &token.value).await;
            println!("deleted {date}");
        }
        CacheCommand::Clear { token } => {
            let removed = commands::cache_clear_all(ctx, &token.value).await;
            println!("removed {removed} entries");
        }
        CacheCommand::Prune { days } => {
            let removed = commands::cache_clear_old(ctx, days).await;
            println!("removed {removed} entries");
        }
    }
    Ok(())
}

fn print_day(date: &str, response: &ActivityResponse) {
    println!("{date}  ({} from {})", response.summary.total_time, response.source);

    for activity in &response.activities {
        let name = activity.name().unwrap_or("(unnamed)");
        println!("  {:>10}  {name}", format_duration(extract_duration(activity)));
    }

    println!("{} activities", response.summary.total_activities);
    if let Some(warning) = &response.cache_warning {
        eprintln!("warning: {warning}");
    }
}

/// Show only the last four characters of a token.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let visible = chars.len().min(4);
    let tail: String = chars[chars.len() - visible..].iter().collect();
    format!("…{tail}")
}
