use tracing_subscriber::EnvFilter;

use parlor_server::build_app;
use parlor_server::config::ServerConfig;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::load();
    config.validate();

    let addr = config.listen_addr.clone();
    let (app, _state) = build_app(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "parlor server listening");
    axum::serve(listener, app).await
}
