/*****************************************************************************************
 *
 *  formboard – Form submission relay with a JSON-backed store
 *  ----------------------------------------------------------
 *
 *  Two listeners, no shared memory: an HTTP responder that serves the
 *  pages and relays every POST body as a UDP datagram, and a store
 *  writer that decodes each datagram and merges it into storage/data.json.
 *
 *****************************************************************************************/

mod app;
mod config;
mod errors;
mod ingest;
mod persistence;
mod routes;
mod services;

use tokio::net::TcpListener;
use tokio::task;
use axum::serve;

use tracing_subscriber::FmtSubscriber;
use tracing::level_filters::LevelFilter;

use crate::config::AppConfig;
use crate::ingest::IngestServer;
use crate::persistence::Store;

#[tokio::main]
async fn main() {
    //
    // ────────────────────────────────────────────────────────
    //  Load configuration (config.json or defaults)
    // ────────────────────────────────────────────────────────
    //
    let cfg = AppConfig::load_or_default("config.json");

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging
    // ────────────────────────────────────────────────────────
    //
    let level = match cfg.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info"  => LevelFilter::INFO,
        "warn"  => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    tracing::info!("Starting formboard");
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Bind and start the store writer FIRST
    // ────────────────────────────────────────────────────────
    //
    // Binding before the HTTP listener accepts narrows the startup
    // window in which a POSTed datagram has no receiver. Delivery
    // stays fire-and-forget either way.
    //
    let store = Store::new(&cfg.storage_path);
    if !store.path().exists() {
        tracing::warn!(
            "Store file {} does not exist; submissions will be dropped until it is created with '{{}}'",
            store.path().display()
        );
    }

    let ingest = IngestServer::bind(&cfg, store)
        .await
        .expect("Failed to bind datagram socket");

    task::spawn(ingest.run());

    //
    // ────────────────────────────────────────────────────────
    //  Build Axum app and start listening
    // ────────────────────────────────────────────────────────
    //
    let app = app::build_app(cfg.clone());

    let listener = TcpListener::bind((cfg.http_host.as_str(), cfg.http_port))
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}:{}", cfg.http_host, cfg.http_port);

    serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await
        .expect("Server error");
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
async fn shutdown() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");

    tracing::warn!("CTRL+C received, shutting down");
}
