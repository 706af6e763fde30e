//! Preview server: serves the generated site and renders drafts on demand

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::ContentRepository;
use crate::generator::Generator;
use crate::Blog;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    generator: Generator,
    repo: Arc<dyn ContentRepository>,
}

#[derive(Debug, Deserialize)]
struct PreviewParams {
    #[serde(rename = "ref")]
    reference: Option<String>,
}

/// Start the preview server
pub async fn start(
    blog: &Blog,
    repo: Arc<dyn ContentRepository>,
    ip: &str,
    port: u16,
) -> Result<()> {
    let app = router(blog, repo)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Drafts render at /preview/<uid>?ref=<preview ref>");
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
fn router(blog: &Blog, repo: Arc<dyn ContentRepository>) -> Result<Router> {
    let state = Arc::new(ServerState {
        public_dir: blog.public_dir.clone(),
        generator: Generator::new(blog)?,
        repo,
    });

    Ok(Router::new()
        .route("/preview/:uid", get(preview_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Render one post from the draft revision named by `ref`
async fn preview_handler(
    State(state): State<Arc<ServerState>>,
    Path(uid): Path<String>,
    Query(params): Query<PreviewParams>,
) -> Response {
    let Some(reference) = params.reference.filter(|r| !r.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing preview ref").into_response();
    };

    match state
        .generator
        .render_post(state.repo.as_ref(), &uid, Some(&reference))
        .await
    {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => not_found(&state),
        Err(e) => {
            tracing::error!("Preview of {} failed: {:#}", uid, e);
            (StatusCode::BAD_GATEWAY, "Content service unavailable").into_response()
        }
    }
}

/// Serve generated files, answering misses with the fallback page
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(&state),
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn not_found(state: &ServerState) -> Response {
    match state.generator.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render 404 page: {:#}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}
