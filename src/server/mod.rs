//! Development server
//!
//! Serves the built site from the public directory. `/rss.xml` is built on
//! every request from the current content, so the feed never goes stale while
//! posts are being edited.

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::feed::{self, FEED_CONTENT_TYPE, FEED_PATH};
use crate::{commands, Folio};

/// Build the router for a site
pub fn router(folio: &Folio) -> Router {
    let state = Arc::new(folio.clone());
    let static_files = ServeDir::new(&folio.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route(&format!("/{}", FEED_PATH), get(feed_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server; with `watch`, rebuild on every change
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    if watch {
        let watched = folio.clone();
        tokio::task::spawn_blocking(move || {
            let result = commands::build::watch(&watched, false, |report| {
                tracing::info!("Rebuilt {} pages", report.pages);
            });
            if let Err(e) = result {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let app = router(folio);

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn feed_handler(State(folio): State<Arc<Folio>>) -> Response {
    let result = tokio::task::spawn_blocking(move || {
        feed::build_feed(&folio.config, &folio.store())
    })
    .await;

    match result {
        Ok(Ok(xml)) => ([(header::CONTENT_TYPE, FEED_CONTENT_TYPE)], xml).into_response(),
        Ok(Err(feed::FeedError::MissingSite)) => {
            (StatusCode::NOT_FOUND, "No site url configured").into_response()
        }
        Ok(Err(e)) => {
            tracing::error!("Failed to build feed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build feed").into_response()
        }
        Err(e) => {
            tracing::error!("Feed task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
