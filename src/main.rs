//! # Poseidon Application Entry Point
//!
//! This binary crate drives the dashboard: it fetches today's tide predictions
//! and the hourly forecast, renders the dashboard to the terminal, and owns the
//! periodic timer that animates the live tide marker.
//!
//! ## Flags
//! - `--once`: render a single frame and exit
//! - `--knots`: start with wind speed in knots
//! - `--offline`: skip the network and use the fallback tide model
//! - `--json-logs`: structured JSON logs on stderr
//! - `--station <id>`: override the configured NOAA station
//! - `--config <path>`: read configuration from another file

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::Utc;
use poseidon_lib::{
    config::Config, dashboard::Dashboard, fallback, logging, noaa::NoaaClient, renderer,
    units::WindUnit,
};
use std::env;
use std::time::Duration;

/// Fetches slower than this are logged as slow
const SLOW_FETCH: Duration = Duration::from_secs(5);

/// Clear the terminal and move the cursor home before each repaint
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Default, PartialEq)]
struct Options {
    once: bool,
    knots: bool,
    offline: bool,
    json_logs: bool,
    station: Option<String>,
    config: Option<String>,
}

fn parse_args<I>(args: I) -> anyhow::Result<Options>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--once" => options.once = true,
            "--knots" => options.knots = true,
            "--offline" => options.offline = true,
            "--json-logs" => options.json_logs = true,
            "--station" => {
                options.station = Some(args.next().context("--station needs a station id")?);
            }
            "--config" => {
                options.config = Some(args.next().context("--config needs a path")?);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(options)
}

/// Load tides and forecast into a fresh dashboard.
async fn load_dashboard(config: &Config, options: &Options) -> anyhow::Result<Dashboard> {
    let station = config.station.selected();
    let tz = config.station.tz();
    let mut dashboard = Dashboard::new(config);
    if options.knots {
        dashboard.set_unit(WindUnit::Knots);
    }

    if options.offline {
        dashboard.load_series(fallback::approximate(station, Utc::now(), tz));
        return Ok(dashboard);
    }

    let client = NoaaClient::new(&config.forecast)?;

    let series = logging::warn_if_slow("tide predictions", SLOW_FETCH, client.tide_series(&station))
        .await
        .unwrap_or_else(|err| {
            // Network errors are expected; keep the dashboard useful
            tracing::warn!(%err, "tide fetch failed, falling back to offline model");
            fallback::approximate(station.clone(), Utc::now(), tz)
        });
    let online = !series.offline;
    dashboard.load_series(series);

    if online {
        // NOAA's own turn times, logged next to the ones picked from the 6-minute series
        match client.hilo_predictions(&station).await {
            Ok(turns) => {
                for turn in &turns {
                    tracing::debug!(t = %turn.t, v = %turn.v, turn = ?turn.turn, "official tide turn");
                }
            }
            Err(err) => tracing::debug!(%err, "high/low fetch failed"),
        }
    }

    match logging::warn_if_slow("hourly forecast", SLOW_FETCH, client.hourly_forecast()).await {
        Ok(periods) => dashboard.set_forecast(periods),
        Err(err) => tracing::warn!(%err, "forecast fetch failed"),
    }

    Ok(dashboard)
}

async fn run(config: Config, options: Options) -> anyhow::Result<()> {
    let mut dashboard = load_dashboard(&config, &options).await?;

    let frame = dashboard.tick(Utc::now());
    if options.once {
        print!("{}", renderer::render_ascii(&dashboard, frame.as_ref(), &config.display));
        return Ok(());
    }

    // The marker pulse is driven from here; the library never starts timers.
    let mut ticker = tokio::time::interval(Duration::from_millis(config.marker.tick_millis));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let frame = dashboard.tick(Utc::now());
                print!(
                    "{CLEAR_SCREEN}{}",
                    renderer::render_ascii(&dashboard, frame.as_ref(), &config.display)
                );
            }
            result = &mut shutdown => {
                result.context("failed to listen for Ctrl+C")?;
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let options = parse_args(env::args().skip(1))?;
    logging::init_tracing(options.json_logs);

    let mut config = match options.config.as_deref() {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    if let Some(id) = options.station.clone() {
        config.station.id = id;
    }

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config, options))
}
