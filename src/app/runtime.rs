// SPDX-License-Identifier: GPL-3.0-only

//! Message loop driving the capture controller
//!
//! The [`Runtime`] owns the [`AppModel`] and is its single thread of control:
//! messages are taken off one queue and handled to completion one at a time.
//! Futures returned by handlers are spawned on tokio and their results are
//! queued as new messages. After every message a [`Snapshot`] is published for
//! views through a `watch` channel.

use crate::app::state::{AppModel, Message, Snapshot};
use crate::app::task::Task;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Owns the controller and processes its message queue
pub struct Runtime {
    model: AppModel,
    sender: mpsc::WeakUnboundedSender<Message>,
    receiver: mpsc::UnboundedReceiver<Message>,
    snapshots: watch::Sender<Snapshot>,
}

/// Cloneable handle for sending messages to a running [`Runtime`]
///
/// The runtime stops once every handle has been dropped.
#[derive(Clone)]
pub struct RuntimeHandle {
    sender: mpsc::UnboundedSender<Message>,
    snapshots: watch::Receiver<Snapshot>,
}

impl Runtime {
    /// Wrap a model; permission requests are queued as the first message
    pub fn new(model: AppModel) -> (Self, RuntimeHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(model.snapshot());
        // Receiver is alive, so this cannot fail
        let _ = sender.send(Message::RequestPermissions);

        let runtime = Self {
            model,
            sender: sender.downgrade(),
            receiver,
            snapshots,
        };
        let handle = RuntimeHandle {
            sender,
            snapshots: snapshot_rx,
        };
        (runtime, handle)
    }

    /// Process messages until `Shutdown` or until every handle is dropped
    ///
    /// Returns the model so callers can inspect the final state.
    pub async fn run(mut self) -> AppModel {
        while let Some(message) = self.receiver.recv().await {
            let shutdown = matches!(message, Message::Shutdown);
            debug!(?message, "Processing message");

            let task = self.model.update(message);
            self.spawn(task);
            self.publish();

            if shutdown {
                info!("Runtime stopped");
                break;
            }
        }
        self.model
    }

    fn spawn(&self, task: Task<Message>) {
        for future in task.into_futures() {
            let sender = self.sender.clone();
            tokio::spawn(async move {
                let message = future.await;
                if let Some(sender) = sender.upgrade() {
                    let _ = sender.send(message);
                }
            });
        }
    }

    fn publish(&self) {
        let snapshot = self.model.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

impl RuntimeHandle {
    /// Queue a message; returns `false` if the runtime has stopped
    pub fn dispatch(&self, message: Message) -> bool {
        self.sender.send(message).is_ok()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    ///
    /// Returns `None` if the runtime stops first.
    pub async fn wait_for(&self, predicate: impl FnMut(&Snapshot) -> bool) -> Option<Snapshot> {
        let mut receiver = self.snapshots.clone();
        receiver
            .wait_for(predicate)
            .await
            .ok()
            .map(|snapshot| snapshot.clone())
    }

    /// Ask the runtime to close the session and stop
    pub fn shutdown(&self) -> bool {
        self.dispatch(Message::Shutdown)
    }
}
