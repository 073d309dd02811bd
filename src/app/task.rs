// SPDX-License-Identifier: GPL-3.0-only

//! Deferred work returned by message handlers
//!
//! A [`Task`] is a batch of futures, each resolving to one follow-up message.
//! Handlers never await anything themselves: they update state synchronously
//! and return the asynchronous part as a task for the runtime to drive.

use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;

/// A set of futures producing messages
#[must_use = "tasks do nothing unless handed to the runtime"]
pub struct Task<M> {
    futures: Vec<BoxFuture<'static, M>>,
}

impl<M: Send + 'static> Task<M> {
    /// A task that does nothing
    pub fn none() -> Self {
        Self {
            futures: Vec::new(),
        }
    }

    /// A task that immediately yields `message`
    pub fn done(message: M) -> Self {
        Self {
            futures: vec![future::ready(message).boxed()],
        }
    }

    /// Run `future` and map its output to a message
    pub fn perform<T, F>(future: F, map: impl FnOnce(T) -> M + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            futures: vec![future.map(map).boxed()],
        }
    }

    /// Hand the futures over to an executor
    pub fn into_futures(self) -> Vec<BoxFuture<'static, M>> {
        self.futures
    }
}

impl<M: Send + 'static> Default for Task<M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<M> std::fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({} futures)", self.futures.len())
    }
}
