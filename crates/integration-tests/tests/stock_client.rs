//! Stock client against a live catalog API.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{Json, Router, routing::get};
use rocketshoes_core::{Price, ProductId};
use rocketshoes_integration_tests::{TestServer, sample_catalog};
use rocketshoes_storefront::config::ApiConfig;
use rocketshoes_storefront::stock::{ApiError, HttpStockClient, StockService};
use serde_json::json;

#[tokio::test]
async fn test_fetch_stock() {
    let server = TestServer::start(sample_catalog()).await;
    let client = HttpStockClient::new(&server.api_config()).unwrap();

    let stock = client.stock(ProductId::new(2)).await.unwrap();

    assert_eq!(stock.id, ProductId::new(2));
    assert_eq!(stock.amount, 5);
}

#[tokio::test]
async fn test_fetch_product() {
    let server = TestServer::start(sample_catalog()).await;
    let client = HttpStockClient::new(&server.api_config()).unwrap();

    let product = client.product(ProductId::new(3)).await.unwrap();

    assert_eq!(product.title, "Tênis Adidas Duramo Lite 2.0");
    assert_eq!(product.price, Price::from_cents(21990));
}

#[tokio::test]
async fn test_list_products() {
    let server = TestServer::start(sample_catalog()).await;
    let client = HttpStockClient::new(&server.api_config()).unwrap();

    let products = client.list_products().await.unwrap();

    assert_eq!(products.len(), 6);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let server = TestServer::start(sample_catalog()).await;
    let client = HttpStockClient::new(&server.api_config()).unwrap();

    let err = client.product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref path) if path == "products/99"));

    let err = client.stock(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_products_are_cached_but_stock_is_not() {
    let product_hits = Arc::new(AtomicUsize::new(0));
    let stock_hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route(
            "/products/{id}",
            get({
                let hits = product_hits.clone();
                move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                    async { Json(json!({"id": 1, "title": "Tênis", "price": 10.5, "image": ""})) }
                }
            }),
        )
        .route(
            "/stock/{id}",
            get({
                let hits = stock_hits.clone();
                move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                    async { Json(json!({"id": 1, "amount": 4})) }
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = HttpStockClient::new(&ApiConfig::new(&format!("http://{addr}")).unwrap()).unwrap();

    for _ in 0..3 {
        client.product(ProductId::new(1)).await.unwrap();
        client.stock(ProductId::new(1)).await.unwrap();
    }

    assert_eq!(product_hits.load(Ordering::SeqCst), 1);
    assert_eq!(stock_hits.load(Ordering::SeqCst), 3);

    server.abort();
}

#[tokio::test]
async fn test_unreachable_api_is_http_error() {
    // Bind then release a port so nothing is listening on it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpStockClient::new(&ApiConfig::new(&format!("http://{addr}")).unwrap()).unwrap();

    let err = client.stock(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}
