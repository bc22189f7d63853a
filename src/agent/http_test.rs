use super::*;
use crate::agent::config::LayoutTimeouts;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use serde_json::json;

/// Serve `router` on an ephemeral local port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

fn source(url: String) -> HttpLayoutSource {
    HttpLayoutSource::new(LayoutServiceConfig { url, timeouts: LayoutTimeouts { request_secs: 5, connect_secs: 2 } })
        .unwrap()
}

#[tokio::test]
async fn posts_markdown_and_decodes_layout() {
    let router = Router::new().route(
        "/layout",
        post(|axum::Json(body): axum::Json<serde_json::Value>| async move {
            let markdown = body["markdown"].as_str().unwrap_or_default().to_string();
            axum::Json(json!({
                "title": markdown,
                "layout": {
                    "kind": "Layout",
                    "grids": [{ "columns": 1, "gap": 2, "rows": [{ "components": [{ "name": "TextCard" }] }] }]
                }
            }))
        }),
    );
    let base = serve(router).await;

    let out = source(format!("{base}/layout")).generate("Weekly revenue").await.unwrap();
    assert_eq!(out.title.as_deref(), Some("Weekly revenue"));
    assert_eq!(out.document.component_count(), 1);
}

#[tokio::test]
async fn error_status_is_reported_with_body() {
    let router = Router::new().route("/layout", post(|| async { (StatusCode::BAD_GATEWAY, "agent down") }));
    let base = serve(router).await;

    let err = source(format!("{base}/layout")).generate("x").await.unwrap_err();
    assert_eq!(err, LayoutError::ServiceStatus { status: 502, body: "agent down".into() });
}

#[tokio::test]
async fn non_object_response_is_malformed() {
    let router = Router::new().route("/layout", post(|| async { axum::Json(json!([1, 2])) }));
    let base = serve(router).await;

    let err = source(format!("{base}/layout")).generate("key-1").await.unwrap_err();
    assert!(matches!(err, LayoutError::MalformedResponse { ref key, .. } if key == "key-1"));
}

#[tokio::test]
async fn connection_refused_is_fetch_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source(format!("http://{addr}/layout")).generate("x").await.unwrap_err();
    assert!(matches!(err, LayoutError::Fetch(_)));
}
