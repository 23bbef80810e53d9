use anyhow::Context;
use clap::Parser;
use tracing::info;

use transit_cascade::api::{ApiConfig, HttpFetcher};
use transit_cascade::cascade::{CascadeConfig, CascadeView, SelectionCascade};
use transit_cascade::domain::{DirectionId, RouteId, StopId};
use transit_cascade::log::MessageLog;

/// Narrow a transit query: route, then stop, then direction, then the next
/// predicted departure.
#[derive(Parser, Debug)]
#[command(name = "transit-cascade", version, about)]
struct Cli {
    /// API base URL.
    #[arg(long, env = "TRANSIT_API_BASE_URL", default_value = "https://api-v3.mbta.com")]
    base_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "TRANSIT_API_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Comma-separated route types to list.
    #[arg(long, default_value = "0,1")]
    route_types: String,

    /// Route id to select (e.g. Red).
    #[arg(long)]
    route: Option<String>,

    /// Stop id to select; requires --route.
    #[arg(long, requires = "route")]
    stop: Option<String>,

    /// Direction id to select; requires --stop.
    #[arg(long, requires = "stop")]
    direction: Option<String>,

    /// Print the final state as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Print the audit messages after the result.
    #[arg(long)]
    messages: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api_config = ApiConfig::new()
        .with_base_url(&cli.base_url)
        .with_timeout(cli.timeout_secs);
    let fetcher = HttpFetcher::new(&api_config).context("failed to create HTTP client")?;
    let log = MessageLog::new();
    let cascade = SelectionCascade::new(
        fetcher,
        log.clone(),
        api_config.base_url.clone(),
        CascadeConfig::new().with_route_types(&cli.route_types),
    );

    info!(base_url = %api_config.base_url, "loading routes");
    cascade.load_routes().await;

    if let Some(route) = cli.route.as_deref() {
        cascade.select_route(RouteId::new(route)).await;
    }
    if let Some(stop) = cli.stop.as_deref() {
        cascade.select_stop(StopId::new(stop))?.await;
    }
    if let Some(direction) = cli.direction.as_deref() {
        cascade.select_direction(DirectionId::new(direction))?.await;
    }

    let view = cascade.snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }

    if cli.messages {
        println!();
        for message in log.messages() {
            println!("  {message}");
        }
    }

    Ok(())
}

/// Print the deepest stage that has been reached.
fn print_view(view: &CascadeView) {
    let selection = &view.selection;

    if selection.route().is_none() {
        println!("Routes:");
        for route in &view.routes {
            println!("  {:<12} {}", route.id, route.attributes.long_name);
        }
        return;
    }

    if selection.stop().is_none() {
        println!("Stops:");
        for stop in &view.stops {
            println!("  {:<16} {}", stop.id, stop.attributes.name);
        }
        return;
    }

    if selection.direction().is_none() {
        println!("Directions:");
        for entry in &view.directions.direction_wrappers {
            let marker = if entry.is_selectable() { "" } else { " (not served)" };
            println!("  {:<3} {}{marker}", entry.key, entry.display_label());
        }
        return;
    }

    match (view.prediction.prediction(), view.prediction.message()) {
        (Some(prediction), _) => println!("Next departure: {}", prediction.display_time()),
        (None, Some(message)) => println!("{message}"),
        (None, None) => println!("Prediction not loaded."),
    }
}
