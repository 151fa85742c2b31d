//! Cart operations end to end: HTTP stock client, file persistence, reload.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use rocketshoes_core::{CartItems, LineItem, Price, ProductId};
use rocketshoes_integration_tests::{TestServer, sample_catalog};
use axum::{Json, Router, routing::get};
use rocketshoes_storefront::config::ApiConfig;
use rocketshoes_storefront::error::OUT_OF_STOCK_MESSAGE;
use rocketshoes_storefront::notify::Notification;
use rocketshoes_storefront::stock::HttpStockClient;
use rocketshoes_storefront::storage::{FileStore, MemoryStore, PersistenceStore};
use rocketshoes_storefront::{CART_STORAGE_KEY, CartError, CartStore, UpdateProductAmount};
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::mpsc;

struct Session {
    cart: CartStore,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

fn open_session(server: &TestServer, dir: &TempDir) -> Session {
    let stock = HttpStockClient::new(&server.api_config()).unwrap();
    let (tx, notifications) = mpsc::unbounded_channel();
    let cart = CartStore::load(
        Arc::new(stock),
        Arc::new(FileStore::new(dir.path())),
        Arc::new(tx),
    );
    Session {
        cart,
        notifications,
    }
}

fn persisted(dir: &TempDir) -> Option<Vec<LineItem>> {
    FileStore::new(dir.path())
        .get_item(CART_STORAGE_KEY)
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

#[tokio::test]
async fn test_shopping_session_survives_restart() {
    let server = TestServer::start(sample_catalog()).await;
    let dir = TempDir::new().unwrap();

    let session = open_session(&server, &dir);
    session.cart.add_product(ProductId::new(1)).await.unwrap();
    session.cart.add_product(ProductId::new(2)).await.unwrap();
    session.cart.add_product(ProductId::new(1)).await.unwrap();
    session
        .cart
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(2),
            amount: 4,
        })
        .await
        .unwrap();

    let snapshot = session.cart.cart();
    assert_eq!(snapshot.size(), 2);
    assert_eq!(snapshot[0].amount, 2);
    assert_eq!(snapshot[1].amount, 4);
    assert_eq!(snapshot.total(), Price::from_cents(2 * 17990 + 4 * 13990));
    assert_eq!(persisted(&dir).unwrap(), snapshot.to_vec());

    // A new session reads the same cart back
    let restarted = open_session(&server, &dir);
    assert_eq!(restarted.cart.cart(), snapshot);

    restarted.cart.remove_product(ProductId::new(1)).unwrap();
    let remaining = persisted(&dir).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].product_id(), ProductId::new(2));
}

#[tokio::test]
async fn test_first_add_persists_single_item() {
    let server = TestServer::start(sample_catalog()).await;
    let dir = TempDir::new().unwrap();
    let session = open_session(&server, &dir);

    session.cart.add_product(ProductId::new(1)).await.unwrap();

    let stored = persisted(&dir).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].product_id(), ProductId::new(1));
    assert_eq!(stored[0].amount, 1);
    assert_eq!(stored[0].product.title, "Tênis de Caminhada Leve Confortável");
}

#[tokio::test]
async fn test_stock_limit_is_enforced() {
    let server = TestServer::start(sample_catalog()).await;
    let dir = TempDir::new().unwrap();
    let mut session = open_session(&server, &dir);

    // Product 4 has a single unit in stock
    session.cart.add_product(ProductId::new(4)).await.unwrap();
    let err = session.cart.add_product(ProductId::new(4)).await.unwrap_err();

    assert!(matches!(err, CartError::OutOfStock { available: 1, .. }));
    assert_eq!(session.cart.cart()[0].amount, 1);
    assert_eq!(persisted(&dir).unwrap()[0].amount, 1);

    let notification = session.notifications.try_recv().unwrap();
    assert_eq!(notification.message, "Requested quantity is out of stock");
}

#[tokio::test]
async fn test_sold_out_product_is_never_added() {
    let server = TestServer::start(sample_catalog()).await;
    let dir = TempDir::new().unwrap();
    let mut session = open_session(&server, &dir);

    let err = session.cart.add_product(ProductId::new(6)).await.unwrap_err();

    assert!(matches!(err, CartError::OutOfStock { available: 0, .. }));
    assert!(session.cart.cart().is_empty());
    assert!(persisted(&dir).is_none());
    assert!(session.notifications.try_recv().is_ok());
}

#[tokio::test]
async fn test_unknown_product_reports_generic_failure() {
    let server = TestServer::start(sample_catalog()).await;
    let dir = TempDir::new().unwrap();
    let mut session = open_session(&server, &dir);

    let err = session.cart.add_product(ProductId::new(42)).await.unwrap_err();

    assert!(matches!(err, CartError::Stock(_)));
    assert!(persisted(&dir).is_none());
    assert_eq!(
        session.notifications.try_recv().unwrap().message,
        "Failed to add product"
    );
}

#[tokio::test]
async fn test_update_beyond_stock_leaves_file_untouched() {
    let server = TestServer::start(sample_catalog()).await;
    let dir = TempDir::new().unwrap();
    let session = open_session(&server, &dir);

    session.cart.add_product(ProductId::new(3)).await.unwrap();
    let before = FileStore::new(dir.path()).get_item(CART_STORAGE_KEY).unwrap();

    // Product 3 has two units in stock
    let err = session
        .cart
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(3),
            amount: 3,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::OutOfStock { .. }));
    assert_eq!(
        FileStore::new(dir.path()).get_item(CART_STORAGE_KEY).unwrap(),
        before
    );
}

#[tokio::test]
async fn test_negative_stock_from_api_is_out_of_stock() {
    let app = Router::new().route(
        "/stock/{id}",
        get(|| async { Json(json!({"id": 1, "amount": -1})) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let stock = HttpStockClient::new(&ApiConfig::new(&format!("http://{addr}")).unwrap()).unwrap();
    let storage = Arc::new(MemoryStore::new());
    let (tx, mut notifications) = mpsc::unbounded_channel();
    let cart = CartStore::load(Arc::new(stock), storage.clone(), Arc::new(tx));

    let err = cart.add_product(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, CartError::OutOfStock { available: -1, .. }));
    assert!(cart.cart().is_empty());
    assert_eq!(storage.get_item(CART_STORAGE_KEY).unwrap(), None);
    assert_eq!(notifications.try_recv().unwrap().message, OUT_OF_STOCK_MESSAGE);

    server.abort();
}
