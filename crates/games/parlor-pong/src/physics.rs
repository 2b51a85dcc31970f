use rand::Rng;

use parlor_core::seat::SeatId;

use crate::config::PongConfig;
use crate::state::{PongState, Score};

/// A point was scored during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointScored {
    pub scorer: SeatId,
    /// Set when this point ended the match.
    pub winner: Option<SeatId>,
}

/// Advance the match by one fixed tick.
///
/// Pure function of the current state plus the injected rng; paddle
/// targets are applied out of band by the session layer. A no-op once the
/// match is terminal.
pub fn advance(
    state: &mut PongState,
    config: &PongConfig,
    rng: &mut impl Rng,
) -> Option<PointScored> {
    if state.game_ended {
        return None;
    }

    state.ball.x += state.ball.dx;
    state.ball.y += state.ball.dy;

    // Mirror off the top and bottom walls. Forcing the sign away from the
    // crossed bound (rather than negating) means the velocity can never
    // flip twice for one crossing.
    if state.ball.y <= 0.0 {
        state.ball.dy = state.ball.dy.abs();
    } else if state.ball.y >= state.game_height - state.ball_size {
        state.ball.dy = -state.ball.dy.abs();
    }

    // Left paddle, seat 1: force the ball back toward the right and
    // deflect vertically in proportion to where on the paddle it hit.
    if state.ball.x <= state.paddle_width
        && state.ball.y >= state.paddle1.y
        && state.ball.y <= state.paddle1.y + state.paddle_height
    {
        state.ball.dx = state.ball.dx.abs();
        let hit = (state.ball.y - state.paddle1.y) / state.paddle_height;
        state.ball.dy = (hit - 0.5) * config.deflect_factor;
    }

    // Right paddle, seat 2.
    if state.ball.x >= state.game_width - state.paddle_width - state.ball_size
        && state.ball.y >= state.paddle2.y
        && state.ball.y <= state.paddle2.y + state.paddle_height
    {
        state.ball.dx = -state.ball.dx.abs();
        let hit = (state.ball.y - state.paddle2.y) / state.paddle_height;
        state.ball.dy = (hit - 0.5) * config.deflect_factor;
    }

    // Horizontal overshoot awards the point to the opposite side.
    if state.ball.x < 0.0 {
        return Some(award_point(state, config, 2, rng));
    }
    if state.ball.x > state.game_width {
        return Some(award_point(state, config, 1, rng));
    }
    None
}

fn award_point(
    state: &mut PongState,
    config: &PongConfig,
    scorer: SeatId,
    rng: &mut impl Rng,
) -> PointScored {
    let total = match scorer {
        1 => {
            state.score.player1 += 1;
            state.score.player1
        },
        _ => {
            state.score.player2 += 1;
            state.score.player2
        },
    };

    if total >= state.max_score {
        state.game_ended = true;
        state.winner = Some(scorer);
        return PointScored {
            scorer,
            winner: Some(scorer),
        };
    }

    serve(state, config, rng);
    PointScored {
        scorer,
        winner: None,
    }
}

/// Re-center the ball and serve: horizontal direction is a coin flip,
/// vertical velocity uniform in the symmetric serve range.
pub fn serve(state: &mut PongState, config: &PongConfig, rng: &mut impl Rng) {
    state.ball.x = state.game_width / 2.0;
    state.ball.y = state.game_height / 2.0;
    state.ball.dx = if rng.random_bool(0.5) {
        config.serve_speed
    } else {
        -config.serve_speed
    };
    state.ball.dy = rng.random_range(-config.serve_spread..config.serve_spread);
}

/// Full reset after a terminal match: scores zeroed, flags cleared,
/// paddles re-centered, fresh serve.
pub fn restart(state: &mut PongState, config: &PongConfig, rng: &mut impl Rng) {
    state.score = Score::default();
    state.game_ended = false;
    state.winner = None;
    let paddle_center = state.paddle_range() / 2.0;
    state.paddle1.y = paddle_center;
    state.paddle2.y = paddle_center;
    serve(state, config, rng);
}
