use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sahayta::api::AppState;
use sahayta::{ActionOutcome, SahaytaConfig, SahaytaError, telemetry, web};

/// Emergency relief planning: place lookup, current weather and route maps
#[derive(Debug, Parser)]
#[command(name = "sahayta", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show current weather for a city
    Weather {
        /// City name, e.g. "New Delhi"
        city: String,
    },
    /// Plan an emergency route between two places
    Route {
        /// Start location, e.g. Mumbai
        start: String,
        /// Destination, e.g. Pune
        destination: String,
        /// Print the full route plan with map layers as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the JSON API
    Serve {
        /// Port to listen on (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let code = e
                .downcast_ref::<SahaytaError>()
                .map(SahaytaError::exit_code)
                .unwrap_or(1);
            match e.downcast_ref::<SahaytaError>() {
                Some(err) => eprintln!("{}", err.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::from(code as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = SahaytaConfig::load_from_path(cli.config)?;
    telemetry::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Weather { city } => {
            let monitor = sahayta::build_weather_monitor(&config)?;
            match monitor.lookup(&city).await {
                ActionOutcome::Success(report) => {
                    println!("{}", report.heading);
                    for line in &report.lines {
                        println!("{line}");
                    }
                    Ok(ExitCode::SUCCESS)
                }
                ActionOutcome::Failed { message } => {
                    eprintln!("{message}");
                    Ok(ExitCode::FAILURE)
                }
                ActionOutcome::Skipped => Ok(ExitCode::SUCCESS),
            }
        }
        Command::Route {
            start,
            destination,
            json,
        } => {
            let planner = sahayta::build_route_planner(&config)?;
            match planner.plan(&start, &destination).await {
                ActionOutcome::Success(plan) => {
                    if json {
                        let rendered = serde_json::to_string_pretty(&plan)
                            .context("Failed to serialize route plan")?;
                        println!("{rendered}");
                    } else {
                        println!("{}", plan.heading);
                        for marker in plan.scene.markers() {
                            println!(
                                "  {:?}: {}",
                                marker.role,
                                marker.position.format_coordinates()
                            );
                        }
                    }
                    Ok(ExitCode::SUCCESS)
                }
                ActionOutcome::Failed { message } => {
                    eprintln!("{message}");
                    Ok(ExitCode::FAILURE)
                }
                ActionOutcome::Skipped => Ok(ExitCode::SUCCESS),
            }
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }

            let weather = match sahayta::build_weather_monitor(&config) {
                Ok(monitor) => Some(Arc::new(monitor)),
                Err(e) => {
                    tracing::warn!("Weather endpoint disabled: {}", e);
                    None
                }
            };
            let state = AppState {
                weather,
                routes: Arc::new(sahayta::build_route_planner(&config)?),
            };

            web::run(&config.server, state).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
