use actix_web::{middleware::Logger, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::sync::oneshot;

mod channels;
mod config;
mod controllers;
mod directus;
mod error;
mod models;

use channels::CommandDispatcher;
use config::Config;
use directus::{DirectusClient, StaffDirectory};

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received SIGINT, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Loaded configuration: {:?}", config);

    let directus = match DirectusClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("Failed to initialize Directus client: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Checking connection to Directus at {}", config.directus_url);
    if !directus.check_connectivity().await {
        log::error!("Could not connect to the Directus API, exiting");
        std::process::exit(1);
    }
    log::info!("Connected to Directus");

    let dispatcher = Arc::new(CommandDispatcher::new(directus));

    // Optional health endpoint for container orchestration
    let health_server = match config.health_port {
        Some(port) => {
            log::info!("Starting health endpoint on port {}", port);
            let server = HttpServer::new(|| {
                App::new()
                    .wrap(Logger::default())
                    .configure(controllers::health::config_routes)
            })
            .workers(1)
            .disable_signals()
            .bind(("0.0.0.0", port))?
            .run();
            let handle = server.handle();
            tokio::spawn(server);
            Some(handle)
        }
        None => None,
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let bot_token = config.telegram_bot_token.clone();
    let mut listener = tokio::spawn(async move {
        channels::telegram::start_telegram_listener(&bot_token, dispatcher, shutdown_rx).await
    });

    log::info!("Access bot started");

    let finished_early = tokio::select! {
        _ = shutdown_signal() => None,
        result = &mut listener => Some(result),
    };
    let listener_result = match finished_early {
        Some(result) => result,
        None => {
            let _ = shutdown_tx.send(());
            listener.await
        }
    };

    let failed = match listener_result {
        Ok(Ok(())) => false,
        Ok(Err(e)) => {
            log::error!("Telegram listener error: {}", e);
            true
        }
        Err(e) => {
            log::error!("Telegram listener task failed: {}", e);
            true
        }
    };

    if let Some(handle) = health_server {
        handle.stop(true).await;
    }

    if failed {
        std::process::exit(1);
    }

    log::info!("Access bot stopped");
    Ok(())
}
