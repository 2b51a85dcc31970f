#[allow(dead_code)]
mod common;

use common::{TestServer, wait_for_state, ws_admit, ws_send, ws_try_read};
use parlor_core::net::messages::{ClientMessage, ServerMessage};
use parlor_pong::PongConfig;
use parlor_server::config::ServerConfig;

#[tokio::test]
async fn paddle_targets_are_applied_and_clamped() {
    let server = TestServer::new().await;

    let (mut s1, _, _) = ws_admit(&server.ws_url()).await;
    let (mut s2, _, _) = ws_admit(&server.ws_url()).await;

    // Out-of-range targets clamp instead of being rejected.
    ws_send(&mut s1, &ClientMessage::PaddleMove { y: -9999.0 }).await;
    ws_send(&mut s2, &ClientMessage::PaddleMove { y: 9999.0 }).await;

    let state = wait_for_state(&mut s1, 60, |s| {
        s.paddle1.y == 0.0 && s.paddle2.y == 500.0
    })
    .await;
    assert!(state.is_some(), "clamped paddle targets should be visible");

    // In-range target lands exactly.
    ws_send(&mut s1, &ClientMessage::PaddleMove { y: 123.0 }).await;
    let state = wait_for_state(&mut s1, 60, |s| s.paddle1.y == 123.0).await;
    assert!(state.is_some(), "in-range paddle target should land exactly");
}

#[tokio::test]
async fn restart_request_is_a_no_op_while_live() {
    let server = TestServer::new().await;

    let (mut s1, _, _) = ws_admit(&server.ws_url()).await;
    let (_s2, _, _) = ws_admit(&server.ws_url()).await;

    // Move a paddle off-center, then ask for a restart mid-match.
    ws_send(&mut s1, &ClientMessage::PaddleMove { y: 0.0 }).await;
    let state = wait_for_state(&mut s1, 60, |s| s.paddle1.y == 0.0).await;
    assert!(state.is_some());

    ws_send(&mut s1, &ClientMessage::RestartGame).await;

    // A restart would re-center the paddle; it must not.
    let recentered = wait_for_state(&mut s1, 20, |s| s.paddle1.y == 250.0).await;
    assert!(recentered.is_none(), "restart must be ignored while live");
}

#[tokio::test]
async fn seat_disconnect_pauses_and_refill_resumes_with_state() {
    let server = TestServer::new().await;

    let (mut s1, _, _) = ws_admit(&server.ws_url()).await;
    let (s2, _, _) = ws_admit(&server.ws_url()).await;

    // Mark the match with a distinctive paddle position.
    ws_send(&mut s1, &ClientMessage::PaddleMove { y: 42.0 }).await;
    let state = wait_for_state(&mut s1, 60, |s| s.paddle1.y == 42.0).await;
    assert!(state.is_some());

    // Seat 2 disconnects: simulation halts.
    drop(s2);
    // Drain in-flight frames, then expect silence.
    while ws_try_read(&mut s1, 150).await.is_some() {}
    let quiet = ws_try_read(&mut s1, 200).await;
    assert!(quiet.is_none(), "loop must pause when a seat empties");

    // A new connection takes the vacated seat and the loop resumes with
    // the existing state, not a reset.
    let (_s3, role3, snapshot) = ws_admit(&server.ws_url()).await;
    assert!(
        matches!(role3, ServerMessage::PlayerAssigned { player_id: 2 }),
        "vacated seat should be re-assigned, got: {role3:?}"
    );
    assert_eq!(snapshot.paddle1.y, 42.0, "state survives the pause");

    let state = wait_for_state(&mut s1, 10, |_| true).await;
    assert!(state.is_some(), "broadcasts resume once the seat refills");
}

#[tokio::test]
async fn match_ends_at_threshold_and_restart_resets() {
    // One-point match so the test reaches terminal quickly.
    let config = ServerConfig {
        pong: PongConfig {
            max_score: 1,
            ..PongConfig::default()
        },
        ..ServerConfig::default()
    };
    let server = TestServer::from_config(config).await;

    let (mut s1, _, _) = ws_admit(&server.ws_url()).await;
    let (_s2, _, _) = ws_admit(&server.ws_url()).await;

    // Park both paddles at the top so the descending ball gets past.
    ws_send(&mut s1, &ClientMessage::PaddleMove { y: 0.0 }).await;

    let terminal = wait_for_state(&mut s1, 1200, |s| s.game_ended).await;
    let terminal = terminal.expect("match should reach the score threshold");
    assert!(terminal.winner.is_some());
    assert_eq!(
        terminal.score.player1.max(terminal.score.player2),
        1,
        "terminal flag must rise exactly at the threshold"
    );

    // Terminal state keeps broadcasting.
    let still = wait_for_state(&mut s1, 10, |s| s.game_ended).await;
    assert!(still.is_some(), "terminal state still broadcasts");

    // Restart is honored now: scores zeroed, flags cleared, paddles
    // re-centered.
    ws_send(&mut s1, &ClientMessage::RestartGame).await;
    let reset = wait_for_state(&mut s1, 60, |s| !s.game_ended).await;
    let reset = reset.expect("restart from terminal should reset the match");
    assert_eq!(reset.score.player1, 0);
    assert_eq!(reset.score.player2, 0);
    assert_eq!(reset.winner, None);
    assert_eq!(reset.paddle1.y, 250.0);
    assert_eq!(reset.paddle2.y, 250.0);
}
