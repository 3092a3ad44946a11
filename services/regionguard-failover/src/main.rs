use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use regionguard_core::{InvocationContext, ParameterResolver};
use regionguard_engine::FailoverHandler;
use serde_json::Value;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "regionguard-failover")]
#[command(about = "Aurora global database failover driven by routing controls", long_about = None)]
#[command(version)]
struct Cli {
    /// Region of the RDS control plane
    #[arg(
        long,
        env = "AWS_REGION",
        default_value = regionguard_aws::DEFAULT_CONTROL_PLANE_REGION,
        global = true
    )]
    control_plane_region: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate once and print the result code
    Evaluate {
        /// Event payload; logged, never interpreted
        #[arg(long, default_value = "{}")]
        event: String,

        /// Name of whatever triggered this evaluation
        #[arg(long, default_value = "cli")]
        trigger: String,
    },

    /// Re-evaluate on a fixed interval until interrupted
    Watch {
        /// Seconds between evaluations
        #[arg(long, env = "REGIONGUARD_INTERVAL_SECS", default_value_t = 60)]
        interval_secs: u64,
    },

    /// Report missing or invalid failover parameters
    CheckConfig,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    match cli.command {
        Commands::Evaluate { event, trigger } => {
            let handler = build_handler(&cli.control_plane_region).await?;
            let event = parse_event(&event);

            match handler.handle(&event, &InvocationContext::new(trigger)).await {
                Ok(outcome) => {
                    println!("{}", outcome);
                    Ok(())
                }
                Err(err) => {
                    error!(error = %err, "Handler error");
                    std::process::exit(1);
                }
            }
        }

        Commands::Watch { interval_secs } => {
            let handler = build_handler(&cli.control_plane_region).await?;
            let mut ticker = watch_interval(interval_secs);
            let shutdown = tokio::signal::ctrl_c();
            tokio::pin!(shutdown);

            info!(interval_secs, "Watching global cluster");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = &mut shutdown => {
                        info!("Interrupted, stopping watch");
                        break;
                    }
                }

                let ctx = InvocationContext::new("schedule");
                tokio::select! {
                    result = handler.handle(&Value::Null, &ctx) => match result {
                        Ok(outcome) => println!("{}", outcome),
                        Err(err) => error!(error = %err, "Handler error"),
                    },
                    _ = &mut shutdown => {
                        info!("Interrupted during evaluation, stopping watch");
                        break;
                    }
                }
            }

            Ok(())
        }

        Commands::CheckConfig => {
            let resolved = ParameterResolver::from_env().resolve();
            let missing = resolved.validate();

            if missing.is_empty() {
                println!("All failover parameters present");
                return Ok(());
            }

            for name in missing {
                println!("missing or invalid: {}", name);
            }
            std::process::exit(1);
        }
    }
}

async fn build_handler(
    control_plane_region: &str,
) -> Result<FailoverHandler, Box<dyn std::error::Error>> {
    let resolved = ParameterResolver::from_env().resolve();
    let region = control_plane_region.to_string();

    let handler = FailoverHandler::from_resolution(resolved, move |params| async move {
        regionguard_aws::build_clients(&params, &region).await
    })
    .await?;

    Ok(handler)
}

/// Ticks every `interval_secs` (at least one). A slow evaluation delays the
/// next tick instead of queueing catch-up evaluations.
fn watch_interval(interval_secs: u64) -> Interval {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// The event is opaque; non-JSON input is kept as a string.
fn parse_event(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_falls_back_to_string() {
        assert_eq!(parse_event(r#"{"source":"aws.events"}"#)["source"], "aws.events");
        assert_eq!(parse_event("manual"), Value::String("manual".to_string()));
    }

    #[tokio::test]
    async fn watch_interval_delays_after_slow_evaluation() {
        let ticker = watch_interval(0);
        assert_eq!(ticker.period(), Duration::from_secs(1));
        assert_eq!(ticker.missed_tick_behavior(), MissedTickBehavior::Delay);
    }

    #[test]
    fn cli_parses_watch_interval() {
        let cli = Cli::parse_from([
            "regionguard-failover",
            "--control-plane-region",
            "us-west-2",
            "watch",
            "--interval-secs",
            "15",
        ]);
        assert_eq!(cli.control_plane_region, "us-west-2");
        assert!(matches!(cli.command, Commands::Watch { interval_secs: 15 }));
    }
}
