//! Spectators and their region subscriptions.

use std::collections::{BTreeSet, HashMap};

use olamai_proto::v1::CellUpdate;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tonic::Status;

use crate::{vec2::Vec2, world::CellChange};

/// Room for live updates on top of one full region snapshot.
pub const SPECTATOR_BUFFER: usize = 100;
const MAX_SPECTATOR_BUFFER: usize = 1 << 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StadiumError {
    #[error("spectator {0} not found")]
    UnknownSpectator(String),
    #[error("spectator {id} has room for {available} cell updates, region snapshot needs {needed}")]
    SnapshotTooLarge {
        id: String,
        needed: usize,
        available: usize,
    },
}

/// Channel size for a spectator: one region snapshot plus [`SPECTATOR_BUFFER`].
pub fn spectator_buffer(region_size: i32) -> usize {
    let cells = usize::try_from(region_size).unwrap_or(1).saturating_pow(2);
    cells
        .saturating_add(SPECTATOR_BUFFER)
        .min(MAX_SPECTATOR_BUFFER)
}

pub type SpectatorSender = mpsc::Sender<Result<CellUpdate, Status>>;
pub type SpectatorReceiver = mpsc::Receiver<Result<CellUpdate, Status>>;

struct Spectator {
    sender: SpectatorSender,
    // distinguishes a spectator from a later one reusing its id
    token: u64,
}

pub struct Stadium {
    region_size: i32,
    next_token: u64,
    spectators: HashMap<String, Spectator>,
    // region -> subscribed spectator ids
    subscriptions: HashMap<Vec2, BTreeSet<String>>,
}

impl Stadium {
    pub fn new(region_size: i32) -> Self {
        Self {
            region_size,
            next_token: 0,
            spectators: HashMap::new(),
            subscriptions: HashMap::new(),
        }
    }

    pub fn region_size(&self) -> i32 {
        self.region_size
    }

    /// Register a spectator and return the receiving end of its channel along
    /// with a token for [`Stadium::release`]. An existing spectator with the
    /// same id is replaced; its stream ends.
    pub fn add_spectator(&mut self, id: &str) -> (SpectatorReceiver, u64) {
        let (sender, receiver) = mpsc::channel(spectator_buffer(self.region_size));
        self.next_token += 1;
        let token = self.next_token;
        if self
            .spectators
            .insert(id.to_string(), Spectator { sender, token })
            .is_some()
        {
            tracing::info!(spectator = id, "replaced existing spectator");
        }
        (receiver, token)
    }

    pub fn has_spectator(&self, id: &str) -> bool {
        self.spectators.contains_key(id)
    }

    pub fn spectator_count(&self) -> usize {
        self.spectators.len()
    }

    pub fn is_subscribed(&self, id: &str, region: Vec2) -> bool {
        self.subscriptions
            .get(&region)
            .is_some_and(|subs| subs.contains(id))
    }

    /// Subscribe the spectator to `region` and queue `snapshot` for it.
    /// Returns `Ok(false)` if it was already subscribed. Nothing is
    /// subscribed or sent unless the whole snapshot fits in the channel.
    pub fn subscribe(
        &mut self,
        id: &str,
        region: Vec2,
        snapshot: Vec<CellChange>,
    ) -> Result<bool, StadiumError> {
        let spectator = self
            .spectators
            .get(id)
            .ok_or_else(|| StadiumError::UnknownSpectator(id.to_string()))?;
        if self.is_subscribed(id, region) {
            return Ok(false);
        }
        let available = spectator.sender.capacity();
        if snapshot.len() > available {
            return Err(StadiumError::SnapshotTooLarge {
                id: id.to_string(),
                needed: snapshot.len(),
                available,
            });
        }
        for change in snapshot {
            self.send_cell_update(id, change);
        }
        self.subscriptions
            .entry(region)
            .or_default()
            .insert(id.to_string());
        Ok(true)
    }

    /// Returns false if the spectator was not subscribed.
    pub fn unsubscribe(&mut self, id: &str, region: Vec2) -> bool {
        let Some(subs) = self.subscriptions.get_mut(&region) else {
            return false;
        };
        let removed = subs.remove(id);
        if subs.is_empty() {
            self.subscriptions.remove(&region);
        }
        removed
    }

    /// Drop the spectator's channel and all of its subscriptions.
    pub fn remove_spectator(&mut self, id: &str) -> bool {
        self.subscriptions.retain(|_, subs| {
            subs.remove(id);
            !subs.is_empty()
        });
        self.spectators.remove(id).is_some()
    }

    /// Remove the spectator only if it is still the one identified by `token`.
    pub fn release(&mut self, id: &str, token: u64) {
        if self.spectators.get(id).is_some_and(|s| s.token == token) {
            self.remove_spectator(id);
            tracing::info!(spectator = id, "spectator disconnected");
        }
    }

    /// Send to every spectator subscribed to the region of `change.pos`.
    /// Never blocks: a full channel drops the update.
    pub fn broadcast_cell_update(&self, change: &CellChange) {
        let region = change.pos.region(self.region_size);
        let Some(subs) = self.subscriptions.get(&region) else {
            return;
        };
        for id in subs {
            self.send_cell_update(id, change.clone());
        }
    }

    /// Send to a single spectator. Returns false if it does not exist or the
    /// update could not be queued.
    pub fn send_cell_update(&self, id: &str, change: CellChange) -> bool {
        let Some(spectator) = self.spectators.get(id) else {
            return false;
        };
        match spectator.sender.try_send(Ok(change.into())) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(spectator = id, "spectator channel full, dropping cell update");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(spectator = id, "spectator channel closed");
                false
            }
        }
    }

    /// Drop every spectator, ending all open streams.
    pub fn close_all(&mut self) {
        self.subscriptions.clear();
        self.spectators.clear();
    }
}
