use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use hangman_core::WordBank;
use hangman_persistence::{connection::connect_and_migrate, Repositories};
use hangman_server::{config::Config, create_routes, game_manager::GameManager};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Hangman server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let word_bank = match &config.words_file {
        Some(path) => {
            info!("Loading words from file: {}", path);
            match WordBank::from_file(path) {
                Ok(bank) => bank,
                Err(e) => {
                    error!("Failed to load words from '{}': {:#}", path, e);
                    error!("Unset WORDS_FILE to fall back to the built-in word list.");
                    std::process::exit(1);
                }
            }
        }
        None => WordBank::default(),
    };
    info!("Word bank holds {} words", word_bank.len());

    let host = match config.host.parse::<IpAddr>() {
        Ok(host) => host,
        Err(e) => {
            error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let game_manager = Arc::new(GameManager::new(
        Repositories::new(db),
        word_bank,
        config.attempts_allowed,
    ));

    // Keep the cached average fresh even when no games are being created, and
    // drop locks left behind by abandoned games
    let refresh_game_manager = game_manager.clone();
    let refresh_period = Duration::from_secs(config.average_refresh_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_period);
        loop {
            interval.tick().await;
            if let Err(e) = refresh_game_manager.recompute_average_attempts().await {
                warn!("Periodic average refresh failed: {}", e);
            }
            refresh_game_manager.prune_idle_game_locks();
        }
    });

    let routes = create_routes(game_manager);

    info!("Server starting on {}:{}", config.host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((host, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

// Wait for SIGINT (Ctrl+C) or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{signal as unix_signal, SignalKind};

        match (
            unix_signal(SignalKind::interrupt()),
            unix_signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
            }
            _ => {
                warn!("Could not install unix signal handlers, falling back to Ctrl+C");
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down gracefully...");
}
