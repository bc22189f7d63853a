use std::process::ExitCode;
use std::sync::Arc;

use medspa_layout::agent::http::HttpLayoutSource;
use medspa_layout::config::AppConfig;
use medspa_layout::error::ErrorCode;
use medspa_layout::{routes, state};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, code = e.error_code(), "configuration invalid");
            return ExitCode::FAILURE;
        }
    };

    let source = match HttpLayoutSource::new(config.layout) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "layout source init failed");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(url = source.url(), "layout source configured");

    let state = state::AppState::new(Arc::new(source));
    let app = routes::app(state);

    let port = config.port;
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %port, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%port, "medspa-layout listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
