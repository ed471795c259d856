//! Startup sequence: connect failures, serving on a listener, default bind address.

use std::io::ErrorKind;

use cosmos_exporter::config::ServiceConfig;
use cosmos_exporter::lifecycle::{self, Phase, StartupError};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

mod common;
use common::{config_for, start_mock_lcd};

#[tokio::test]
async fn test_connect_failure_is_fatal() {
    let config = config_for("http://127.0.0.1:1", &[]);

    let err = lifecycle::start(config).await.unwrap_err();
    assert!(matches!(err, StartupError::Connect(_)));
    assert_eq!(err.phase(), Phase::PrefixesSealed);
    assert_ne!(err.exit_code(), 0);
}

#[tokio::test]
async fn test_invalid_lcd_scheme_is_fatal() {
    let config = config_for("ftp://127.0.0.1:1317", &[]);
    let err = lifecycle::start(config).await.unwrap_err();
    assert!(matches!(err, StartupError::Connect(_)));
}

#[tokio::test]
async fn test_serves_until_shutdown() {
    let lcd = start_mock_lcd().await;
    let config = config_for(&lcd, &["--bech-prefix=cosmos"]);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let server = tokio::spawn(lifecycle::run_with_listener(config, listener, async move {
        let _ = rx.await;
    }));

    let response = reqwest::get(format!("http://{addr}/metrics/upgrade"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.text().await.unwrap().contains("cosmos_upgrade_plan"));

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_default_listen_address_binds() {
    let config = ServiceConfig::default();
    assert_eq!(config.bind_address(), "0.0.0.0:9300");

    match TcpListener::bind(config.bind_address()).await {
        Ok(listener) => assert_eq!(listener.local_addr().unwrap().port(), 9300),
        // Another process owns the port; nothing to assert about our config.
        Err(e) if e.kind() == ErrorKind::AddrInUse => {}
        Err(e) => panic!("unexpected bind error: {e}"),
    }
}

#[tokio::test]
async fn test_missing_config_file_is_tolerated() {
    let lcd = start_mock_lcd().await;
    let config = config_for(&lcd, &["--config=/nonexistent/cosmos-exporter.toml"]);
    assert_eq!(config.lcd, lcd);
    assert!(lifecycle::start(config).await.is_ok());
}
