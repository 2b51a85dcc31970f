use serde::Deserialize;

use parlor_pong::PongConfig;

/// Top-level server configuration, loaded from `parlor.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Relative directory the static client assets are served from.
    pub web_root: String,
    pub limits: LimitsConfig,
    pub pong: PongConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            web_root: "public".to_string(),
            limits: LimitsConfig::default(),
            pong: PongConfig::default(),
        }
    }
}

/// Fallback listener port when neither config nor `PORT` say otherwise.
const DEFAULT_PORT: u16 = 3000;

/// Infrastructure limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Outbound frame buffer per client; a client this far behind starts
    /// dropping frames instead of growing memory.
    pub client_message_buffer: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            client_message_buffer: 256,
        }
    }
}

impl ServerConfig {
    /// Validate configuration, logging and exiting on fatal problems.
    pub fn validate(&self) {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            tracing::error!(
                addr = %self.listen_addr,
                "listen_addr is not a valid socket address"
            );
            std::process::exit(1);
        }
        if self.limits.client_message_buffer == 0 {
            tracing::error!("limits.client_message_buffer must be > 0");
            std::process::exit(1);
        }
        if self.pong.max_score == 0 {
            tracing::error!("pong.max_score must be > 0");
            std::process::exit(1);
        }
    }

    /// Load config from `parlor.toml` if it exists, then apply env var
    /// overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("parlor.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from parlor.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse parlor.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No parlor.toml found, using defaults");
                ServerConfig::default()
            },
        };

        // Environment variable overrides. PORT swaps only the port part so
        // a configured bind host survives.
        if let Ok(port) = std::env::var("PORT")
            && let Ok(port) = port.parse::<u16>()
            && let Some((host, _)) = config.listen_addr.rsplit_once(':')
        {
            config.listen_addr = format!("{host}:{port}");
        }
        if let Ok(addr) = std::env::var("PARLOR_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(root) = std::env::var("PARLOR_WEB_ROOT")
            && !root.is_empty()
        {
            config.web_root = root;
        }

        config
    }
}
