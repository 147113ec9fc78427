use axum::Router;
use gatewatch_api::{create_api_routes, AppState};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn start_web_server(
    bind_addr: SocketAddr,
    state: AppState,
    static_dir: &str,
) -> anyhow::Result<()> {
    info!(
        bind_address = %bind_addr,
        dashboard_url = format!("http://{}", bind_addr),
        api_url = format!("http://{}/api", bind_addr),
        "Starting web server"
    );

    let app = create_app(state, static_dir);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Web server started successfully");

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState, static_dir: &str) -> Router {
    let index = ServeFile::new(format!("{static_dir}/index.html"));
    Router::new()
        .nest("/api", create_api_routes(state))
        .fallback_service(ServeDir::new(static_dir).fallback(index))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
