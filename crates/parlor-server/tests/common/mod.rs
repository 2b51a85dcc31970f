use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use parlor_core::net::messages::{ClientMessage, ServerMessage};
use parlor_core::net::protocol::{decode_server_message, encode_client_message};
use parlor_pong::PongState;

use parlor_server::build_app;
use parlor_server::config::ServerConfig;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with default config on an ephemeral port.
    pub async fn new() -> Self {
        Self::from_config(ServerConfig::default()).await
    }

    pub async fn from_config(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

/// Connect a WebSocket client to the given URL.
pub async fn ws_connect(url: &str) -> WsStream {
    let (stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    stream
}

/// Read the next server message from a stream (5s timeout), skipping
/// non-text frames.
pub async fn ws_read_server_msg(stream: &mut WsStream) -> ServerMessage<PongState> {
    let deadline = Duration::from_secs(5);
    tokio::time::timeout(deadline, async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return decode_server_message::<PongState>(text.as_str())
                        .expect("server frame should decode");
                },
                Some(Ok(Message::Close(_))) => panic!("WebSocket closed unexpectedly"),
                Some(Err(e)) => panic!("WebSocket error: {e}"),
                None => panic!("WebSocket stream ended"),
                _ => continue,
            }
        }
    })
    .await
    .expect("Timed out waiting for WebSocket message")
}

/// Try to read a server message, returning None on timeout.
pub async fn ws_try_read(stream: &mut WsStream, timeout_ms: u64) -> Option<ServerMessage<PongState>> {
    let deadline = Duration::from_millis(timeout_ms);
    tokio::time::timeout(deadline, async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return decode_server_message::<PongState>(text.as_str())
                        .expect("server frame should decode");
                },
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                    panic!("WebSocket error or closed")
                },
                _ => continue,
            }
        }
    })
    .await
    .ok()
}

/// Send a ClientMessage as a JSON text frame.
pub async fn ws_send(stream: &mut WsStream, msg: &ClientMessage) {
    let encoded = encode_client_message(msg).unwrap();
    stream.send(Message::Text(encoded.into())).await.unwrap();
}

/// Send an arbitrary text frame (for malformed-input tests).
pub async fn ws_send_raw_text(stream: &mut WsStream, text: &str) {
    stream
        .send(Message::Text(text.to_string().into()))
        .await
        .unwrap();
}

/// Connect and consume the admission pair. Returns the stream, the role
/// message, and the full-state snapshot that follows it.
pub async fn ws_admit(url: &str) -> (WsStream, ServerMessage<PongState>, PongState) {
    let mut stream = ws_connect(url).await;
    let role = ws_read_server_msg(&mut stream).await;
    let snapshot = match ws_read_server_msg(&mut stream).await {
        ServerMessage::GameState { state } => state,
        other => panic!("Expected gameState snapshot after role, got: {other:?}"),
    };
    (stream, role, snapshot)
}

/// Read broadcast frames until one satisfies the predicate, bounded by
/// `max_frames`. Returns the matching state.
pub async fn wait_for_state(
    stream: &mut WsStream,
    max_frames: usize,
    pred: impl Fn(&PongState) -> bool,
) -> Option<PongState> {
    for _ in 0..max_frames {
        if let ServerMessage::GameState { state } = ws_read_server_msg(stream).await
            && pred(&state)
        {
            return Some(state);
        }
    }
    None
}
