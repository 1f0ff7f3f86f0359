use quire::{build_router, AppState, Config, Logger, WikiError};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("logger already installed: {e}");
    }

    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = config.socket_addr();
    log::info!("Wiki listening on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(WikiError::from)
}
