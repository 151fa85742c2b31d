//! RocketShoes catalog API - the stock and product service the cart talks to.
//!
//! Serves `GET /products`, `GET /products/{id}` and `GET /stock/{id}` from a
//! JSON catalog file on port 3333 by default.
//!
//! # Usage
//!
//! ```bash
//! ROCKETSHOES_CATALOG_PATH=server.json cargo run -p rocketshoes-storefront
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use rocketshoes_storefront::catalog::{self, Catalog};
use rocketshoes_storefront::config::StorefrontConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Catalog API failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    let catalog = Catalog::from_file(&config.server.catalog_path).await?;
    tracing::info!(
        products = catalog.products.len(),
        path = %config.server.catalog_path.display(),
        "Catalog loaded"
    );

    let app = catalog::router(Arc::new(catalog));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("catalog API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
