use tracing::warn;

use crate::message::{Message, NetError, UpdateLocation};

/// Side length of one presence chunk in world units.
pub const CHUNK_SIZE: f32 = 20.0;

/// Minimum spacing between `updateChunk` requests.
const CHUNK_UPDATE_INTERVAL_MS: f64 = 1000.0;

/// Composes outbound location updates and throttles the chunk flag.
#[derive(Debug)]
pub struct LocationPublisher {
    auth_token: String,
    area: String,
    next_chunk_update: f64,
}

impl LocationPublisher {
    pub fn new(auth_token: String, area: String) -> Self {
        Self {
            auth_token,
            area,
            // the first publish always carries the chunk flag
            next_chunk_update: f64::MIN,
        }
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    /// Build the update for one publish. Sets `update_chunk` at most once
    /// per interval, rearming the timer when it fires.
    pub fn compose(
        &mut self,
        now: f64,
        user_id: &str,
        player_type: &str,
        position: [f32; 2],
        emotion: &str,
    ) -> UpdateLocation {
        let update_chunk = self.next_chunk_update < now;
        if update_chunk {
            self.next_chunk_update = now + CHUNK_UPDATE_INTERVAL_MS;
        }

        UpdateLocation {
            auth_token: self.auth_token.clone(),
            user_id: user_id.to_owned(),
            player_type: player_type.to_owned(),
            area: self.area.clone(),
            chunk: [
                (position[0] / CHUNK_SIZE).floor() as i32,
                (position[1] / CHUNK_SIZE).floor() as i32,
            ],
            position,
            emotion: emotion.to_owned(),
            update_chunk,
        }
    }
}

/// The socket seam between the simulation and the platform.
///
/// The platform feeds raw inbound frames through `enqueue_raw` and
/// installs an outbound sender; the simulation publishes through the
/// publisher and drains the inbound queue once per frame.
pub struct NetLink {
    publisher: LocationPublisher,
    outbound: Option<Box<dyn FnMut(&str)>>,
    inbound: Vec<UpdateLocation>,
}

impl NetLink {
    pub fn new(auth_token: String, area: String) -> Self {
        Self {
            publisher: LocationPublisher::new(auth_token, area),
            outbound: None,
            inbound: Vec::new(),
        }
    }

    /// Install the outbound sender. Until this is called, publishes are
    /// dropped silently.
    pub fn connect(&mut self, send: Box<dyn FnMut(&str)>) {
        self.outbound = Some(send);
    }

    pub fn is_connected(&self) -> bool {
        self.outbound.is_some()
    }

    /// Parse one raw inbound frame. Malformed frames are logged and
    /// dropped; they never reach the simulation.
    pub fn enqueue_raw(&mut self, raw: &str) {
        match Message::decode(raw) {
            Ok(Message::UpdateLocation(msg)) => self.inbound.push(msg),
            Err(err) => warn!(%err, "dropping invalid message"),
        }
    }

    /// Enqueue an already-decoded update, for tests and local loopback.
    pub fn enqueue(&mut self, msg: UpdateLocation) {
        self.inbound.push(msg);
    }

    /// Take the whole inbound queue. Every queued message is consumed,
    /// later ones win on conflict at the consumer.
    pub fn drain(&mut self) -> Vec<UpdateLocation> {
        std::mem::take(&mut self.inbound)
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Compose and send one location update.
    pub fn publish(
        &mut self,
        now: f64,
        user_id: &str,
        player_type: &str,
        position: [f32; 2],
        emotion: &str,
    ) -> Result<(), NetError> {
        let body = Message::UpdateLocation(self.publisher.compose(
            now,
            user_id,
            player_type,
            position,
            emotion,
        ));
        if let Some(send) = self.outbound.as_mut() {
            send(&body.encode()?);
        }
        Ok(())
    }
}

impl std::fmt::Debug for NetLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetLink")
            .field("publisher", &self.publisher)
            .field("connected", &self.outbound.is_some())
            .field("pending", &self.inbound.len())
            .finish()
    }
}
