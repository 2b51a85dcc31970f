pub mod config;
pub mod match_loop;
pub mod session;
pub mod state;
pub mod ws;

use axum::Router;
use tower_http::services::ServeDir;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
///
/// The match loop is spawned here: the match state exists from process
/// start and simply does not tick until both seats fill.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let web_root = config.web_root.clone();
    let state = AppState::new(config);

    let app = Router::new()
        .route("/ws", axum::routing::get(ws::ws_handler))
        .fallback_service(ServeDir::new(&web_root))
        .with_state(state.clone());

    (app, state)
}
