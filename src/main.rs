//! wait-board: live theme park wait times in the terminal.
//!
//! Single-binary Tokio application that:
//! 1. Resolves a park from a short name or raw entity id
//! 2. Fetches its live data through the caching ThemeParks client
//! 3. Prints the busiest attractions, or a single attraction's wait
//! 4. Or summarizes the average wait across the Walt Disney World parks
//! 5. Optionally keeps polling until Ctrl-C

mod config;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use common::config::BoardConfig;
use common::{Error, ParkSnapshot};
use themeparks_client::{
    featured_attractions, known_parks, park_id, Fetch, ThemeParksClient, RESORT_PARKS,
};
use tracing::{error, info, warn};

/// Theme park wait-time board
#[derive(Parser)]
#[command(name = "wait-board", about = "Live theme park wait times")]
struct Cli {
    /// Park short name (e.g. hollywood_studios) or raw entity id.
    #[arg(long)]
    park: Option<String>,

    /// Show only the attraction whose name contains this text.
    #[arg(long)]
    attraction: Option<String>,

    /// Skip attractions that are not operating in the full listing.
    #[arg(long)]
    operating_only: bool,

    /// Keep refreshing on the configured interval until Ctrl-C.
    #[arg(long)]
    watch: bool,

    /// Show the average wait for each Walt Disney World park instead of one board.
    #[arg(long)]
    resort: bool,

    /// Print the raw snapshot as JSON instead of the board.
    #[arg(long)]
    json: bool,

    /// List known park short names and exit.
    #[arg(long)]
    list_parks: bool,
}

fn resolve_park(reference: &str) -> Result<String, Error> {
    if let Some(id) = park_id(reference) {
        return Ok(id.to_string());
    }
    if config::is_park_reference(reference) {
        return Ok(reference.trim().to_string());
    }
    Err(Error::UnknownPark(reference.to_string()))
}

fn queue_markers(attraction: &common::Attraction) -> String {
    let mut markers = String::new();
    if attraction.is_virtual_queue {
        markers.push_str(" [VQ]");
    }
    if attraction.fastpass_available {
        markers.push_str(" [LL]");
    }
    if attraction.single_rider {
        markers.push_str(" [SR]");
    }
    markers
}

fn print_board(park: &ParkSnapshot, board_size: usize, operating_only: bool, featured: &[&str]) {
    println!();
    println!("{}", park.name);
    println!("{}", "=".repeat(50));

    for attraction in park.busiest(board_size) {
        let wait = attraction.wait_time.unwrap_or_default();
        println!("  {}: {} min{}", attraction.name, wait, queue_markers(attraction));
    }

    if !operating_only {
        let mut idle: Vec<&common::Attraction> = park
            .attractions
            .values()
            .filter(|a| !a.status.has_wait_time())
            .collect();
        idle.sort_by(|a, b| a.name.cmp(&b.name));
        for attraction in idle {
            println!("  {}: {}", attraction.name, attraction.status);
        }
    }

    if !featured.is_empty() {
        println!("{}", "-".repeat(50));
        for name in featured {
            match themeparks_client::wait_time_by_name(park, name) {
                Some(wait) => println!("  * {}: {} min", name, wait),
                None => println!("  * {}: --", name),
            }
        }
    }

    match park.average_wait() {
        Some(avg) => println!("Average wait: {} min", avg),
        None => println!("Average wait: --"),
    }
    println!(
        "Updated {} ({})",
        park.last_refreshed.format("%H:%M:%S UTC"),
        park.timezone
    );
}

/// Average wait per resort park. A park that fails to load, or has no
/// positive waits, reports `None`.
async fn resort_stats<F: Fetch>(
    client: &ThemeParksClient<F>,
) -> Vec<(&'static str, Option<u32>)> {
    let mut stats = Vec::with_capacity(RESORT_PARKS.len());
    for (short, display_name) in RESORT_PARKS {
        let average = match park_id(short) {
            Some(id) => match client.get_live_data(id, true).await {
                Ok(park) => park.average_wait(),
                Err(e) => {
                    warn!("Resort overview skipped {}: {}", display_name, e);
                    None
                }
            },
            None => None,
        };
        stats.push((*display_name, average));
    }
    stats
}

fn resort_line(name: &str, average: Option<u32>) -> String {
    match average {
        Some(avg) => format!("  {}: Avg {} min", name, avg),
        None => format!("  {}: Closed", name),
    }
}

async fn show_once(
    client: &ThemeParksClient,
    cli: &Cli,
    cfg: &BoardConfig,
    park_ref: &str,
    entity_id: &str,
) -> Result<(), Error> {
    if cli.resort {
        println!();
        println!("Walt Disney World");
        println!("{}", "=".repeat(50));
        for (name, average) in resort_stats(client).await {
            println!("{}", resort_line(name, average));
        }
        return Ok(());
    }

    if let Some(query) = &cli.attraction {
        match client.get_wait_time(entity_id, query).await? {
            Some(wait) => println!("{}: {} min", query, wait),
            None => println!("{}: no wait time available", query),
        }
        return Ok(());
    }

    let park = client.get_live_data(entity_id, true).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(park.as_ref())?);
    } else {
        print_board(
            &park,
            cfg.board_size,
            cli.operating_only,
            featured_attractions(park_ref),
        );
    }
    Ok(())
}

async fn watch(
    client: &ThemeParksClient,
    cli: &Cli,
    cfg: &BoardConfig,
    park_ref: &str,
    entity_id: &str,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.refresh_interval_secs));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = show_once(client, cli, cfg, park_ref, entity_id).await {
                    // Keep the board alive; the next tick retries.
                    warn!("Refresh failed for {}: {}", park_ref, e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wait_board=info,themeparks_client=info".into()),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    if cli.list_parks {
        for name in known_parks() {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let park_ref = cli.park.clone().unwrap_or_else(|| cfg.default_park.clone());
    let entity_id = match resolve_park(&park_ref) {
        Ok(id) => id,
        Err(e) => {
            error!("{} (try --list-parks)", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Park: {} ({}), cache ttl={}s, api={}",
        park_ref, entity_id, cfg.cache_ttl_secs, cfg.base_url
    );

    let client = ThemeParksClient::from_config(&cfg);

    let code = if cli.watch {
        watch(&client, &cli, &cfg, &park_ref, &entity_id).await;
        ExitCode::SUCCESS
    } else {
        match show_once(&client, &cli, &cfg, &park_ref, &entity_id).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Failed to fetch wait times: {}", e);
                ExitCode::FAILURE
            }
        }
    };

    client.close();
    code
}
