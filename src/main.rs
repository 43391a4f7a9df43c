use tracing::info;
use tracing_subscriber::EnvFilter;

use transmission_remote_backend::{ClientError, Config, Monitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliMode {
    Run,
    Once,
    Help,
}

fn parse_cli_mode<I>(args: I) -> Result<CliMode, ClientError>
where
    I: IntoIterator<Item = String>,
{
    let mut mode = CliMode::Run;
    for arg in args.into_iter().skip(1) {
        match arg.as_str() {
            "--once" => mode = CliMode::Once,
            "--help" | "-h" => mode = CliMode::Help,
            other => return Err(ClientError::Config(format!("unknown argument: {other}"))),
        }
    }
    Ok(mode)
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mode = parse_cli_mode(std::env::args())?;
    if mode == CliMode::Help {
        println!("Usage: transmission-remote-backend [--once]");
        println!("  --once   Poll the torrent list once, print it as JSON and exit");
        return Ok(());
    }

    let config = Config::load().await;
    let mut monitor = Monitor::connect(&config).await?;

    if mode == CliMode::Once {
        monitor.poll_once().await?;
        let torrents = monitor
            .coordinator()
            .latest_snapshot()
            .map(|snapshot| snapshot.torrents())
            .unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&torrents)?);
        return Ok(());
    }

    monitor
        .run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    info!("Shutting down");
    Ok(())
}
