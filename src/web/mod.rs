//! Minimal web entry point: a single root route.

use axum::{extract::State, response::Html, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Settings;
use crate::error::{Result, TeroError};

/// Body served at `/`
pub const INDEX_HTML: &str = "<h1>A minimal tero response!</h1>";

/// Shared application state
pub struct AppState {
    pub settings: Settings,
}

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_page(State(_state): State<Arc<AppState>>) -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Serve the router on `addr` until the process is stopped
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(TeroError::Server)?;

    info!(
        "Starting web server at http://{} (debug: {})",
        addr, state.settings.debug
    );

    axum::serve(listener, create_router(state))
        .await
        .map_err(TeroError::Server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FtpdSettings, SettingsFile, TelegramBotSettings};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let file = SettingsFile {
            ftpd: FtpdSettings {
                host: "localhost".to_string(),
                port: 2121,
            },
            telegram_bot: TelegramBotSettings {
                token: "token".to_string(),
            },
            aws: Default::default(),
        };
        Arc::new(AppState {
            settings: Settings::from_file(file, PathBuf::from(".")),
        })
    }

    #[tokio::test]
    async fn index_returns_html_fragment() {
        let response = create_router(test_state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], INDEX_HTML.as_bytes());
    }

    #[tokio::test]
    async fn other_paths_are_not_found() {
        let response = create_router(test_state())
            .oneshot(Request::builder().uri("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
