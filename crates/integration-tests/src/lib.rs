//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Each test starts the catalog API on an ephemeral local port, so no external
//! services are needed.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart operations against the real HTTP stock client
//! - `stock_client` - Stock client behaviour against the catalog API

use std::net::SocketAddr;
use std::sync::Arc;

use rocketshoes_core::{Price, Product, ProductId, Stock};
use rocketshoes_storefront::catalog::{self, Catalog};
use rocketshoes_storefront::config::ApiConfig;
use tokio::task::JoinHandle;

/// A catalog API served on a local ephemeral port for the life of the value.
pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve `catalog` on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(catalog: Catalog) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let app = catalog::router(Arc::new(catalog));

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, handle }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stock client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the generated URL is invalid.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url()).expect("Invalid test server URL")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// The storefront's demo catalog: six sneakers with varying stock.
#[must_use]
pub fn sample_catalog() -> Catalog {
    let entries: [(i32, &str, i64, i64); 6] = [
        (1, "Tênis de Caminhada Leve Confortável", 17990, 3),
        (2, "Tênis VR Caminhada Confortável Detalhes Couro Masculino", 13990, 5),
        (3, "Tênis Adidas Duramo Lite 2.0", 21990, 2),
        (4, "Tênis Nike Revolution 5", 19990, 1),
        (5, "Tênis Adidas Vl Court", 13990, 5),
        (6, "Tênis Olympikus Esporte Valente", 22990, 0),
    ];

    let products = entries
        .iter()
        .map(|&(id, title, cents, _)| Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents),
            image: format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
        })
        .collect();

    let stock = entries
        .iter()
        .map(|&(id, _, _, amount)| Stock {
            id: ProductId::new(id),
            amount,
        })
        .collect();

    Catalog { products, stock }
}
