use serde::{Deserialize, Serialize};

/// Data-driven tunables for the Pong match.
///
/// Velocities are expressed per tick at the fixed 60 Hz simulation rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PongConfig {
    /// Arena width in pixels.
    pub arena_width: f32,
    /// Arena height in pixels.
    pub arena_height: f32,
    /// Paddle height in pixels.
    pub paddle_height: f32,
    /// Paddle width in pixels.
    pub paddle_width: f32,
    /// Ball edge length in pixels.
    pub ball_size: f32,
    /// Horizontal ball speed on a serve.
    pub serve_speed: f32,
    /// Half-width of the random vertical serve velocity range.
    pub serve_spread: f32,
    /// Vertical deflection factor applied on paddle contact.
    pub deflect_factor: f32,
    /// Score threshold that ends the match.
    pub max_score: u32,
}

impl Default for PongConfig {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            paddle_height: 100.0,
            paddle_width: 10.0,
            ball_size: 10.0,
            serve_speed: 5.0,
            serve_spread: 3.0,
            deflect_factor: 10.0,
            max_score: 10,
        }
    }
}

impl PongConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("PARLOR_PONG_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        if let Ok(contents) = std::fs::read_to_string("config/pong.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = PongConfig::default();
        assert_eq!(cfg.arena_width, 800.0);
        assert_eq!(cfg.arena_height, 600.0);
        assert_eq!(cfg.paddle_height, 100.0);
        assert_eq!(cfg.max_score, 10);
    }

    #[test]
    fn parse_partial_toml_keeps_defaults() {
        let cfg: PongConfig = toml::from_str("max_score = 3\nserve_speed = 8.0\n").unwrap();
        assert_eq!(cfg.max_score, 3);
        assert_eq!(cfg.serve_speed, 8.0);
        assert_eq!(cfg.arena_width, 800.0);
    }
}
