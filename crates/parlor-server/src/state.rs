use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::session::SessionManager;

pub type SharedSession = Arc<RwLock<SessionManager>>;

#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let session = SessionManager::new(config.pong.clone());
        Self {
            session: Arc::new(RwLock::new(session)),
            config: Arc::new(config),
        }
    }
}
