//! # dispatch
//!
//! [`Router`] assigns every chat id to one of N serial lanes. Tasks of one chat run in
//! submission order and never overlap; lanes run concurrently.
//!
//! Each lane is a spawned task draining an unbounded queue. A lane awaits every task to
//! completion before taking the next one; a panicking task is logged and the lane moves on.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, RwLock};

use formbot_core::ChatId;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Unit of work queued on a lane.
pub type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

type LaneSender = mpsc::UnboundedSender<Task>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Router is shut down")]
    RouterClosed,

    #[error("Router needs at least one lane")]
    NoLanes,
}

/// Lane index for `chat_id`: `|chat_id| mod lanes`.
pub fn assign_lane(chat_id: ChatId, lanes: usize) -> usize {
    (chat_id.unsigned_abs() % lanes as u64) as usize
}

/// Fixed pool of serial lanes keyed by chat id.
pub struct Router {
    size: usize,
    lanes: RwLock<Option<Vec<LaneSender>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Router {
    /// Spawns `size` lanes on the current tokio runtime.
    pub fn new(size: usize) -> Result<Self, DispatchError> {
        if size == 0 {
            return Err(DispatchError::NoLanes);
        }
        let mut senders = Vec::with_capacity(size);
        let mut workers = Vec::with_capacity(size);
        for lane in 0..size {
            let (tx, rx) = mpsc::unbounded_channel::<Task>();
            senders.push(tx);
            workers.push(tokio::spawn(run_lane(lane, rx)));
        }
        info!(lanes = size, "Router started");
        Ok(Self {
            size,
            lanes: RwLock::new(Some(senders)),
            workers: Mutex::new(workers),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Enqueues `task` on the lane of `chat_id`. Fails with [`DispatchError::RouterClosed`]
    /// after [`shutdown`](Self::shutdown); the task is then dropped unrun.
    pub fn submit<F>(&self, chat_id: ChatId, task: F) -> Result<(), DispatchError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let lanes = self.lanes.read().unwrap_or_else(|e| e.into_inner());
        let Some(senders) = lanes.as_ref() else {
            warn!(chat_id = chat_id, "Submit after shutdown");
            return Err(DispatchError::RouterClosed);
        };
        let lane = assign_lane(chat_id, self.size);
        senders[lane]
            .send(Box::pin(task))
            .map_err(|_| DispatchError::RouterClosed)?;
        debug!(chat_id = chat_id, lane = lane, "Task queued");
        Ok(())
    }

    /// Stops accepting tasks. Already queued tasks still run.
    pub fn shutdown(&self) {
        let mut lanes = self.lanes.write().unwrap_or_else(|e| e.into_inner());
        if lanes.take().is_some() {
            info!(lanes = self.size, "Router shutting down, draining lanes");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lanes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    /// Waits until every lane has drained and exited. Only returns after [`shutdown`](Self::shutdown).
    pub async fn join(&self) {
        let workers = std::mem::take(&mut *self.workers.lock().unwrap_or_else(|e| e.into_inner()));
        for (lane, worker) in workers.into_iter().enumerate() {
            if let Err(e) = worker.await {
                error!(lane = lane, error = %e, "Lane worker failed");
            }
        }
        info!("Router stopped");
    }
}

async fn run_lane(lane: usize, mut rx: mpsc::UnboundedReceiver<Task>) {
    while let Some(task) = rx.recv().await {
        if let Err(e) = tokio::spawn(task).await {
            if e.is_panic() {
                error!(lane = lane, "Task panicked, lane continues");
            } else {
                warn!(lane = lane, error = %e, "Task cancelled");
            }
        }
    }
    debug!(lane = lane, "Lane drained");
}
