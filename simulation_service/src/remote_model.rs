//! Remote models drive every agent created with their name. Each world step
//! pushes those agents' observations down the model's stream.

use std::collections::HashMap;

use olamai_proto::v1::Observation;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tonic::Status;

pub const MODEL_BUFFER: usize = 100;

pub type ObservationReceiver = mpsc::Receiver<Result<Observation, Status>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteModelError {
    #[error("remote model {0} is already connected")]
    AlreadyConnected(String),
    #[error("remote model name is empty")]
    EmptyName,
}

struct RemoteModel {
    sender: mpsc::Sender<Result<Observation, Status>>,
    token: u64,
}

#[derive(Default)]
pub struct RemoteModels {
    next_token: u64,
    models: HashMap<String, RemoteModel>,
}

impl RemoteModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` and return its observation channel with a token for
    /// [`RemoteModels::release`]. A name is held by one connection at a time.
    pub fn connect(&mut self, name: &str) -> Result<(ObservationReceiver, u64), RemoteModelError> {
        if name.is_empty() {
            return Err(RemoteModelError::EmptyName);
        }
        if self.models.contains_key(name) {
            return Err(RemoteModelError::AlreadyConnected(name.to_string()));
        }
        let (sender, receiver) = mpsc::channel(MODEL_BUFFER);
        self.next_token += 1;
        let token = self.next_token;
        self.models
            .insert(name.to_string(), RemoteModel { sender, token });
        Ok((receiver, token))
    }

    pub fn is_connected(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn release(&mut self, name: &str, token: u64) {
        if self.models.get(name).is_some_and(|m| m.token == token) {
            self.models.remove(name);
            tracing::info!(model = name, "remote model disconnected");
        }
    }

    /// Queue an observation for `name`. Never blocks: a model that falls
    /// behind misses observations.
    pub fn send_observation(&self, name: &str, observation: Observation) -> bool {
        let Some(model) = self.models.get(name) else {
            return false;
        };
        match model.sender.try_send(Ok(observation)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(model = name, "remote model channel full, dropping observation");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub fn close_all(&mut self) {
        self.models.clear();
    }
}
