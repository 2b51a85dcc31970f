use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::ws::Utf8Bytes;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use parlor_core::seat::{Role, SEAT_COUNT, SeatId};
use parlor_pong::PongConfig;

use crate::match_loop::{MatchBroadcast, MatchCommand, spawn_match_loop};

/// Per-client sender for outbound text frames. Bounded so a slow client
/// can only fall behind, never grow server memory; full channels are
/// skipped frame by frame.
pub type ClientSender = mpsc::Sender<Utf8Bytes>;

/// Stable connection identifier, distinct from seat numbers.
pub type ClientId = u64;

struct ConnectedClient {
    sender: ClientSender,
    role: Role,
}

/// Owns the connection set, the two authoritative seats, and the match
/// loop handles. Admission, input routing, and loop phase transitions all
/// go through here.
pub struct SessionManager {
    clients: HashMap<ClientId, ConnectedClient>,
    /// `seats[i]` holds the client occupying seat `i + 1`.
    seats: [Option<ClientId>; SEAT_COUNT],
    next_client_id: ClientId,
    cmd_tx: mpsc::UnboundedSender<MatchCommand>,
    /// Shared sender map the broadcast forwarder snapshots each frame.
    broadcast_senders: Arc<Mutex<HashMap<ClientId, ClientSender>>>,
    _match_task: JoinHandle<()>,
    _forward_task: JoinHandle<()>,
}

impl SessionManager {
    /// Spawn the match loop and its broadcast forwarder. The match exists
    /// from process start; it just does not tick until both seats fill.
    pub fn new(config: PongConfig) -> Self {
        let (cmd_tx, broadcast_rx, match_task) = spawn_match_loop(config);
        let broadcast_senders = Arc::new(Mutex::new(HashMap::new()));
        let forward_task = tokio::spawn(forward_broadcasts(
            broadcast_rx,
            Arc::clone(&broadcast_senders),
        ));
        Self {
            clients: HashMap::new(),
            seats: [None; SEAT_COUNT],
            next_client_id: 1,
            cmd_tx,
            broadcast_senders,
            _match_task: match_task,
            _forward_task: forward_task,
        }
    }

    /// Admit a new connection: the lowest free seat if one is open,
    /// otherwise a read-only observer role. Filling the second seat
    /// resumes the loop with existing (never reset) state.
    pub fn admit(&mut self, sender: ClientSender) -> (ClientId, Role) {
        let id = self.next_client_id;
        self.next_client_id += 1;

        let role = match self.seats.iter().position(|slot| slot.is_none()) {
            Some(idx) => {
                self.seats[idx] = Some(id);
                Role::Seat((idx + 1) as SeatId)
            },
            None => Role::Observer,
        };

        self.clients.insert(
            id,
            ConnectedClient {
                sender: sender.clone(),
                role,
            },
        );
        self.broadcast_senders.lock().unwrap().insert(id, sender);

        if self.active_seats() == SEAT_COUNT {
            self.send_command(MatchCommand::Resume);
        }

        tracing::info!(client_id = id, ?role, "client admitted");
        (id, role)
    }

    /// Remove a connection. Vacating a seat pauses the loop until the
    /// seat is re-filled; observers leave without side effects.
    pub fn remove(&mut self, id: ClientId) {
        self.clients.remove(&id);
        self.broadcast_senders.lock().unwrap().remove(&id);

        if let Some(slot) = self.seats.iter_mut().find(|slot| **slot == Some(id)) {
            *slot = None;
            self.send_command(MatchCommand::Pause);
            tracing::info!(client_id = id, "seat vacated, match paused");
        }
    }

    pub fn role_of(&self, id: ClientId) -> Option<Role> {
        self.clients.get(&id).map(|c| c.role)
    }

    pub fn active_seats(&self) -> usize {
        self.seats.iter().filter(|slot| slot.is_some()).count()
    }

    /// Route a client's paddle target to the loop. Observers have no seat
    /// and are silently ignored.
    pub fn paddle_target(&self, id: ClientId, y: f32) {
        if let Some(seat) = self.role_of(id).and_then(Role::seat) {
            self.send_command(MatchCommand::PaddleTarget { seat, y });
        }
    }

    /// Route a seated client's restart request. The loop enforces the
    /// terminal-state gate.
    pub fn request_restart(&self, id: ClientId) {
        if self.role_of(id).is_some_and(Role::is_seated) {
            self.send_command(MatchCommand::Restart);
        }
    }

    /// Ask the loop for an encoded snapshot of the current full state.
    pub async fn snapshot(&self) -> Option<Utf8Bytes> {
        let (tx, rx) = oneshot::channel();
        self.send_command(MatchCommand::Snapshot { reply: tx });
        rx.await.ok()
    }

    fn send_command(&self, cmd: MatchCommand) {
        if let Err(e) = self.cmd_tx.send(cmd) {
            tracing::debug!(error = %e, "match loop gone");
        }
    }
}

/// Fan every frame out to every connected transport, seated and observer
/// alike. A slow or closed receiver is skipped for that frame; nothing is
/// queued or retried.
async fn forward_broadcasts(
    mut broadcast_rx: mpsc::UnboundedReceiver<MatchBroadcast>,
    senders: Arc<Mutex<HashMap<ClientId, ClientSender>>>,
) {
    while let Some(broadcast) = broadcast_rx.recv().await {
        match broadcast {
            MatchBroadcast::Frame(frame) => {
                let snapshot = senders.lock().unwrap().clone();
                for (&client_id, sender) in &snapshot {
                    if let Err(e) = sender.try_send(frame.clone()) {
                        tracing::debug!(
                            client_id, error = %e,
                            "skipping frame for slow or closed client"
                        );
                    }
                }
            },
            MatchBroadcast::Closed => {
                tracing::info!("match loop closed, forwarder exiting");
                break;
            },
        }
    }
}
