use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod app;
mod error;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workbench_agent=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path > WORKBENCH_CONFIG env > ~/.workbench/workbench.toml
    let config_path = std::env::var("WORKBENCH_CONFIG").ok();
    let config = workbench_core::WorkbenchConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        workbench_core::WorkbenchConfig::default()
    });

    // the state directory holds per-command log files
    tokio::fs::create_dir_all(&config.paths.state).await?;
    info!(state_dir = %config.paths.state, project_dir = %config.paths.project, "agent paths");

    let bind = config.agent.bind.clone();
    let port = config.agent.port;

    let state = Arc::new(app::AppState::new(config));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Workbench agent listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
