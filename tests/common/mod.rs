//! Shared helpers for integration tests: in-process fake upstream servers
//! and feed fixtures.
#![allow(dead_code)]

use axum::Router;
use base64::{engine::general_purpose, Engine as _};
use tokio::net::TcpListener;

use opensea_sales_bot::metadata::{JSON_METADATA_PREFIX, SVG_IMAGE_PREFIX};
use opensea_sales_bot::models::sale::SaleEvent;

pub const TEST_SVG: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="8" height="8"/></svg>"#;

/// Serve a router on an ephemeral local port; returns the base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read listener addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server crashed");
    });
    format!("http://{addr}")
}

pub fn svg_data_uri(svg: &str) -> String {
    format!("{SVG_IMAGE_PREFIX}{}", general_purpose::STANDARD.encode(svg))
}

/// Token-metadata URI wrapping the given SVG and attribute list, nested the
/// way on-chain collections encode them.
pub fn token_metadata_uri(svg: &str, attributes_json: &str) -> String {
    let json = format!(
        r#"{{"image":"{}","attributes":{attributes_json}}}"#,
        svg_data_uri(svg)
    );
    format!(
        "{JSON_METADATA_PREFIX}{}",
        general_purpose::STANDARD.encode(json)
    )
}

/// One feed record as the events endpoint serves it.
pub fn sale_json(name: &str, token_metadata: &str, created_date: &str) -> serde_json::Value {
    serde_json::json!({
        "asset": {
            "name": name,
            "permalink": format!("https://opensea.io/assets/0xabc/{}", name),
            "token_metadata": token_metadata,
            "collection": {"image_url": "https://img.example/collection.png"}
        },
        "total_price": "1000000000000000000",
        "winner_account": {"address": "0xbuyer"},
        "seller": {"address": "0xseller"},
        "created_date": created_date
    })
}

pub fn sale_event(name: &str, token_metadata: &str, created_date: &str) -> SaleEvent {
    serde_json::from_value(sale_json(name, token_metadata, created_date))
        .expect("Failed to build sale event fixture")
}
