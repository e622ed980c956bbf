// THEORY:
// The session pool hosts many independent scanning sessions at once, e.g. one
// per connected camera. Each session is an actor: a tokio task that exclusively
// owns its `ScanPipeline` and processes commands from an mpsc channel one at a
// time. That gives two guarantees without any locks:
//
// 1.  **Isolation**: sessions never share state; one session's frames can't
//     leak into another's consensus.
// 2.  **Serialized delivery**: frames sent to one session are applied in the
//     order they were sent, because a single task drains the channel.
//
// Frames cross the channel as owned buffers since the caller's borrow cannot
// outlive the send. Replies come back on a oneshot per command.

use crate::config::ScanConfig;
use crate::core_modules::state_assembler::SerializedState;
use crate::core_modules::validator::ValidationResult;
use crate::error::{Result, ScanError};
use crate::pipeline::{FrameOutcome, ScanPipeline, ScanSnapshot};
use futures::future::join_all;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

const SESSION_CHANNEL_CAPACITY: usize = 16;

/// An owned RGBA frame for delivery to a session task.
#[derive(Debug, Clone)]
pub struct OwnedFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Message type for session actors.
enum SessionMessage {
    Frame(OwnedFrame, oneshot::Sender<Result<FrameOutcome>>),
    Snapshot(oneshot::Sender<ScanSnapshot>),
    State(oneshot::Sender<(Option<SerializedState>, ValidationResult)>),
    Reset(oneshot::Sender<()>),
    Shutdown,
}

/// Identifier of a session within its pool.
pub type SessionId = u64;

/// Manages a set of session actors.
pub struct SessionPool {
    config: ScanConfig,
    sessions: HashMap<SessionId, mpsc::Sender<SessionMessage>>,
    next_id: SessionId,
}

impl SessionPool {
    /// A pool whose sessions all start from `config`.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sessions: HashMap::new(),
            next_id: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Spawns a new session task on the current tokio runtime.
    pub fn open_session(&mut self) -> Result<SessionId> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ScanError::NoRuntime)?;
        let mut pipeline = ScanPipeline::new(self.config.clone())?;
        let id = self.next_id;
        self.next_id += 1;

        let (tx, mut rx) = mpsc::channel::<SessionMessage>(SESSION_CHANNEL_CAPACITY);
        runtime.spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    SessionMessage::Frame(frame, reply) => {
                        let outcome = pipeline.process_rgba(frame.width, frame.height, &frame.data);
                        let _ = reply.send(outcome);
                    }
                    SessionMessage::Snapshot(reply) => {
                        let _ = reply.send(pipeline.snapshot());
                    }
                    SessionMessage::State(reply) => {
                        let _ = reply.send((pipeline.state_string(), pipeline.validate()));
                    }
                    SessionMessage::Reset(reply) => {
                        pipeline.reset();
                        let _ = reply.send(());
                    }
                    SessionMessage::Shutdown => break,
                }
            }
            tracing::debug!(session = id, "session task stopped");
        });

        tracing::debug!(session = id, "session opened");
        self.sessions.insert(id, tx);
        Ok(id)
    }

    fn sender(&self, id: SessionId) -> Result<mpsc::Sender<SessionMessage>> {
        self.sessions
            .get(&id)
            .cloned()
            .ok_or(ScanError::SessionClosed(id))
    }

    async fn request<T>(
        &self,
        id: SessionId,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
    ) -> Result<T> {
        let sender = self.sender(id)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        sender
            .send(build(reply_tx))
            .await
            .map_err(|_| ScanError::SessionClosed(id))?;
        reply_rx.await.map_err(|_| ScanError::SessionClosed(id))
    }

    /// Delivers one frame to a session and waits for its outcome.
    pub async fn submit_frame(&self, id: SessionId, frame: OwnedFrame) -> Result<FrameOutcome> {
        self.request(id, |reply| SessionMessage::Frame(frame, reply))
            .await?
    }

    /// Delivers one frame to each listed session concurrently.
    ///
    /// Results come back in the order of `batch`.
    pub async fn process_batch(
        &self,
        batch: Vec<(SessionId, OwnedFrame)>,
    ) -> Vec<Result<FrameOutcome>> {
        join_all(
            batch
                .into_iter()
                .map(|(id, frame)| self.submit_frame(id, frame)),
        )
        .await
    }

    pub async fn snapshot(&self, id: SessionId) -> Result<ScanSnapshot> {
        self.request(id, SessionMessage::Snapshot).await
    }

    /// The assembled state (if complete) and its validation.
    pub async fn state(&self, id: SessionId) -> Result<(Option<SerializedState>, ValidationResult)> {
        self.request(id, SessionMessage::State).await
    }

    pub async fn reset(&self, id: SessionId) -> Result<()> {
        self.request(id, SessionMessage::Reset).await
    }

    /// Stops a session's task and forgets it.
    pub async fn close(&mut self, id: SessionId) -> Result<()> {
        let sender = self
            .sessions
            .remove(&id)
            .ok_or(ScanError::SessionClosed(id))?;
        let _ = sender.send(SessionMessage::Shutdown).await;
        tracing::debug!(session = id, "session closed");
        Ok(())
    }

    /// Shutdown all session tasks cleanly.
    pub async fn shutdown(&mut self) {
        for (_, sender) in self.sessions.drain() {
            let _ = sender.send(SessionMessage::Shutdown).await;
        }
    }
}

impl Drop for SessionPool {
    fn drop(&mut self) {
        // Best effort shutdown on drop
        for sender in self.sessions.values() {
            let _ = sender.try_send(SessionMessage::Shutdown);
        }
    }
}
