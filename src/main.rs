mod clock;
mod command;
mod config;
mod console;
mod protocol;
mod server;
mod session;
mod telemetry;
mod transport;

use config::EmulatorConfig;
use console::Console;
use server::CommandServer;
use std::sync::Arc;
use tokio::sync::watch;
use transport::{TransportError, UdpTransport};

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = match EmulatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let transport = match UdpTransport::bind(config.bind_addr).await {
        Ok(transport) => transport,
        Err(e @ TransportError::AddressInUse { .. }) => {
            error!("Cannot start emulator: {}. Is another emulator running?", e);
            std::process::exit(1);
        }
        Err(e) => {
            error!("Cannot start emulator: {}", e);
            std::process::exit(1);
        }
    };

    info!("Tello emulator starting");
    info!("  Command port: {}", config.bind_addr);
    info!(
        "  Telemetry every {}ms, sessions expire after {}s",
        config.telemetry_interval.as_millis(),
        config.session_timeout.as_secs()
    );

    let shutdown_timeout = config.shutdown_timeout;
    let server = Arc::new(CommandServer::new(config, Arc::new(transport)));

    // Spawn the command worker
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut worker = tokio::spawn({
        let server = server.clone();
        async move { server.run(shutdown_rx).await }
    });

    let console = Console::new(server.clone());
    let lines = console::spawn_stdin_reader();

    tokio::select! {
        _ = console.run(lines) => info!("Console closed"),
        _ = tokio::signal::ctrl_c() => info!("Interrupt received"),
        result = &mut worker => {
            match result {
                Ok(Ok(())) => warn!("Command worker exited"),
                Ok(Err(e)) => error!("Command worker failed: {}", e),
                Err(e) => error!("Command worker panicked: {}", e),
            }
            server.shutdown().await;
            std::process::exit(1);
        }
    }

    info!("Shutting down");
    let _ = shutdown_tx.send(true);
    match tokio::time::timeout(shutdown_timeout, &mut worker).await {
        Ok(_) => {}
        Err(_) => {
            warn!(
                "Command worker did not stop within {}s, abandoning it",
                shutdown_timeout.as_secs()
            );
            worker.abort();
        }
    }
    server.shutdown().await;
    info!("Tello emulator stopped");
}
