use std::time::Duration;

use axum::extract::ws::Utf8Bytes;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use parlor_core::net::messages::ServerMessage;
use parlor_core::net::protocol::{ProtocolError, TICK_RATE_HZ, encode_server_message};
use parlor_core::seat::SeatId;
use parlor_pong::{PongConfig, PongState, advance, restart};

/// Commands sent from the session manager to the match loop.
#[derive(Debug)]
pub enum MatchCommand {
    /// Absolute paddle target for a seat; clamped on apply, never queued.
    PaddleTarget { seat: SeatId, y: f32 },
    /// Full reset. Honored only while the match is terminal.
    Restart,
    /// Both seats are filled: start (or resume) ticking.
    Resume,
    /// Active seats dropped below two: cancel the tick timer.
    Pause,
    /// Reply with the current state as an encoded `gameState` frame.
    Snapshot { reply: oneshot::Sender<Utf8Bytes> },
    /// Shut the loop down.
    Stop,
}

/// Frames emitted by the match loop for fan-out.
#[derive(Debug, Clone)]
pub enum MatchBroadcast {
    /// Encoded `gameState` frame. `Utf8Bytes` clones are cheap across
    /// client channels.
    Frame(Utf8Bytes),
    /// The loop has exited.
    Closed,
}

/// Scheduler phase of the match loop. Transitions are explicit commands
/// from the session manager, never inferred from connection counts inside
/// the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for the first full pair of seats.
    Idle,
    Running,
    /// A seat emptied mid-match; state is kept, the timer is not.
    Paused,
}

/// Spawn the authoritative match loop as a tokio task.
/// Returns the command sender and the broadcast receiver.
pub fn spawn_match_loop(
    config: PongConfig,
) -> (
    mpsc::UnboundedSender<MatchCommand>,
    mpsc::UnboundedReceiver<MatchBroadcast>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        run_match_loop(config, cmd_rx, broadcast_tx).await;
    });

    (cmd_tx, broadcast_rx, handle)
}

/// The single mutator of the match state. One tick = one integration step
/// plus one broadcast; commands are applied between ticks, so no tearing
/// is possible.
async fn run_match_loop(
    config: PongConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<MatchCommand>,
    broadcast_tx: mpsc::UnboundedSender<MatchBroadcast>,
) {
    let mut state = PongState::new(&config);
    let mut rng = StdRng::from_os_rng();
    let mut phase = Phase::Idle;

    let tick_interval = Duration::from_secs_f64(1.0 / f64::from(TICK_RATE_HZ));
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick(), if phase == Phase::Running => {
                if let Some(point) = advance(&mut state, &config, &mut rng) {
                    match point.winner {
                        Some(winner) => tracing::info!(winner, "match over"),
                        None => tracing::info!(
                            scorer = point.scorer,
                            player1 = state.score.player1,
                            player2 = state.score.player2,
                            "point scored"
                        ),
                    }
                }

                // A terminal match keeps broadcasting; only integration
                // stops (advance() is a no-op by then).
                match encode_state_frame(&state) {
                    Ok(frame) => {
                        let _ = broadcast_tx.send(MatchBroadcast::Frame(frame));
                    },
                    Err(e) => tracing::error!(error = %e, "failed to encode state frame"),
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(MatchCommand::PaddleTarget { seat, y }) => {
                        state.apply_paddle_target(seat, y);
                    },
                    Some(MatchCommand::Restart) => {
                        if state.game_ended {
                            restart(&mut state, &config, &mut rng);
                            tracing::info!("match restarted");
                        }
                    },
                    Some(MatchCommand::Resume) => {
                        if phase != Phase::Running {
                            // Fresh interval so the first tick fires one
                            // full period from now, not in a burst after a
                            // long pause.
                            interval = tokio::time::interval(tick_interval);
                            interval.set_missed_tick_behavior(
                                tokio::time::MissedTickBehavior::Skip,
                            );
                            tracing::info!(from = ?phase, "match loop running");
                            phase = Phase::Running;
                        }
                    },
                    Some(MatchCommand::Pause) => {
                        if phase == Phase::Running {
                            phase = Phase::Paused;
                            tracing::info!("match loop paused");
                        }
                    },
                    Some(MatchCommand::Snapshot { reply }) => {
                        match encode_state_frame(&state) {
                            Ok(frame) => {
                                let _ = reply.send(frame);
                            },
                            Err(e) => tracing::error!(error = %e, "failed to encode snapshot"),
                        }
                    },
                    Some(MatchCommand::Stop) | None => break,
                }
            }
        }
    }

    let _ = broadcast_tx.send(MatchBroadcast::Closed);
}

fn encode_state_frame(state: &PongState) -> Result<Utf8Bytes, ProtocolError> {
    let msg = ServerMessage::GameState { state };
    encode_server_message(&msg).map(Utf8Bytes::from)
}
