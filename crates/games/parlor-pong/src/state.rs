use serde::{Deserialize, Serialize};

use parlor_core::seat::SeatId;

use crate::config::PongConfig;

/// Vertical velocity of the very first serve after process start.
const INITIAL_VY: f32 = 3.0;

/// Ball position and per-tick velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

/// Vertical offset of a paddle's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

/// Full authoritative match state, broadcast verbatim to every client.
///
/// Arena dimensions ride along so a rendering surface needs no separate
/// configuration exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PongState {
    pub ball: Ball,
    pub paddle1: Paddle,
    pub paddle2: Paddle,
    pub score: Score,
    pub game_width: f32,
    pub game_height: f32,
    pub paddle_height: f32,
    pub paddle_width: f32,
    pub ball_size: f32,
    pub game_ended: bool,
    pub winner: Option<SeatId>,
    pub max_score: u32,
}

impl PongState {
    /// Fresh match state: ball centered on its deterministic opening serve,
    /// paddles centered, scores zeroed.
    pub fn new(config: &PongConfig) -> Self {
        let paddle_center = (config.arena_height - config.paddle_height) / 2.0;
        Self {
            ball: Ball {
                x: config.arena_width / 2.0,
                y: config.arena_height / 2.0,
                dx: config.serve_speed,
                dy: INITIAL_VY,
            },
            paddle1: Paddle { y: paddle_center },
            paddle2: Paddle { y: paddle_center },
            score: Score::default(),
            game_width: config.arena_width,
            game_height: config.arena_height,
            paddle_height: config.paddle_height,
            paddle_width: config.paddle_width,
            ball_size: config.ball_size,
            game_ended: false,
            winner: None,
            max_score: config.max_score,
        }
    }

    /// Vertical travel range available to a paddle's top edge.
    pub fn paddle_range(&self) -> f32 {
        self.game_height - self.paddle_height
    }

    /// Apply a seat's paddle target, clamped into `[0, paddle_range]`.
    /// Ignored while the match is terminal, and for non-finite targets
    /// (which a JSON frame cannot carry anyway).
    pub fn apply_paddle_target(&mut self, seat: SeatId, y: f32) {
        if self.game_ended || !y.is_finite() {
            return;
        }
        let y = y.clamp(0.0, self.paddle_range());
        match seat {
            1 => self.paddle1.y = y,
            2 => self.paddle2.y = y,
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_centered() {
        let state = PongState::new(&PongConfig::default());
        assert_eq!(state.ball.x, 400.0);
        assert_eq!(state.ball.y, 300.0);
        assert_eq!(state.paddle1.y, 250.0);
        assert_eq!(state.paddle2.y, 250.0);
        assert_eq!(state.score, Score::default());
        assert!(!state.game_ended);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn paddle_target_clamped_low_and_high() {
        let mut state = PongState::new(&PongConfig::default());
        state.apply_paddle_target(1, -500.0);
        assert_eq!(state.paddle1.y, 0.0);
        state.apply_paddle_target(1, 10_000.0);
        assert_eq!(state.paddle1.y, state.paddle_range());
        state.apply_paddle_target(2, 123.0);
        assert_eq!(state.paddle2.y, 123.0);
    }

    #[test]
    fn paddle_target_ignored_while_terminal() {
        let mut state = PongState::new(&PongConfig::default());
        state.game_ended = true;
        state.apply_paddle_target(1, 0.0);
        assert_eq!(state.paddle1.y, 250.0);
    }

    #[test]
    fn unknown_seat_is_no_op() {
        let mut state = PongState::new(&PongConfig::default());
        state.apply_paddle_target(3, 0.0);
        assert_eq!(state.paddle1.y, 250.0);
        assert_eq!(state.paddle2.y, 250.0);
    }

    #[test]
    fn state_serializes_with_wire_field_names() {
        let state = PongState::new(&PongConfig::default());
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["ball"]["dx"], 5.0);
        assert_eq!(value["paddle1"]["y"], 250.0);
        assert_eq!(value["score"]["player1"], 0);
        assert_eq!(value["gameWidth"], 800.0);
        assert_eq!(value["paddleHeight"], 100.0);
        assert_eq!(value["gameEnded"], false);
        assert_eq!(value["winner"], serde_json::Value::Null);
        assert_eq!(value["maxScore"], 10);
    }
}
