// SPDX-License-Identifier: MPL-2.0

//! Shared fixtures for controller integration tests
//!
//! `MockCamera` and `MockStore` are scripted collaborators. `Harness` drives
//! an `AppModel` directly: it queues the futures returned by each update and
//! resolves them one at a time in order, recording a snapshot after every
//! message. Run under `#[tokio::test(start_paused = true)]` so timer delays
//! complete instantly.

#![allow(dead_code)]

use futures::future::{self, BoxFuture, FutureExt};
use shutter::app::{AppModel, Message, NotificationKind, Snapshot};
use shutter::backends::camera::{
    BackendError, BackendResult, CameraDevice, CameraSettings, MediaReference,
};
use shutter::config::Config;
use shutter::errors::StorageError;
use shutter::storage::MediaStore;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted camera device
pub struct MockCamera {
    grant: bool,
    permission: AtomicBool,
    latency: Duration,
    fail_capture: AtomicBool,
    fail_record_start: AtomicBool,
    recording: AtomicBool,
    captures: AtomicUsize,
    recordings: AtomicUsize,
    stops: AtomicUsize,
    configured: Mutex<Vec<CameraSettings>>,
}

impl MockCamera {
    pub fn new() -> Self {
        Self {
            grant: true,
            permission: AtomicBool::new(false),
            latency: Duration::from_millis(200),
            fail_capture: AtomicBool::new(false),
            fail_record_start: AtomicBool::new(false),
            recording: AtomicBool::new(false),
            captures: AtomicUsize::new(0),
            recordings: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            configured: Mutex::new(Vec::new()),
        }
    }

    /// Camera whose permission request is refused
    pub fn denied() -> Self {
        Self {
            grant: false,
            ..Self::new()
        }
    }

    pub fn failing_capture(self) -> Self {
        self.fail_capture.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_record_start(self) -> Self {
        self.fail_record_start.store(true, Ordering::SeqCst);
        self
    }

    /// Photo captures issued so far
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    /// `stop_recording` calls issued so far
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    /// Every settings value pushed by the controller, oldest first
    pub fn configured(&self) -> Vec<CameraSettings> {
        self.configured.lock().unwrap().clone()
    }

    pub fn revoke_permission(&self) {
        self.permission.store(false, Ordering::SeqCst);
    }
}

impl CameraDevice for MockCamera {
    fn request_permission(&self) -> BoxFuture<'static, bool> {
        self.permission.store(self.grant, Ordering::SeqCst);
        future::ready(self.grant).boxed()
    }

    fn permission_granted(&self) -> bool {
        self.permission.load(Ordering::SeqCst)
    }

    fn configure(&self, settings: CameraSettings) -> BackendResult<()> {
        self.configured.lock().unwrap().push(settings);
        Ok(())
    }

    fn capture_photo(&self) -> BoxFuture<'static, BackendResult<MediaReference>> {
        let n = self.captures.fetch_add(1, Ordering::SeqCst) + 1;
        let fail = self.fail_capture.load(Ordering::SeqCst);
        let latency = self.latency;
        async move {
            tokio::time::sleep(latency).await;
            if fail {
                Err(BackendError::Disconnected)
            } else {
                Ok(MediaReference::photo(format!("/captures/photo_{}.jpg", n)))
            }
        }
        .boxed()
    }

    fn start_recording(&self) -> BoxFuture<'static, BackendResult<()>> {
        let result = if self.fail_record_start.load(Ordering::SeqCst) {
            Err(BackendError::NotAvailable("no encoder".into()))
        } else if self.recording.swap(true, Ordering::SeqCst) {
            Err(BackendError::RecordingInProgress)
        } else {
            Ok(())
        };
        future::ready(result).boxed()
    }

    fn stop_recording(&self) -> BoxFuture<'static, BackendResult<MediaReference>> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if !self.recording.swap(false, Ordering::SeqCst) {
            return future::ready(Err(BackendError::NoRecordingInProgress)).boxed();
        }
        let n = self.recordings.fetch_add(1, Ordering::SeqCst) + 1;
        let latency = self.latency;
        async move {
            tokio::time::sleep(latency).await;
            Ok(MediaReference::video(format!("/captures/video_{}.gif", n)))
        }
        .boxed()
    }
}

/// Scripted media store
pub struct MockStore {
    grant: bool,
    permission: AtomicBool,
    failures_left: AtomicUsize,
    persisted: Mutex<Vec<MediaReference>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            grant: true,
            permission: AtomicBool::new(false),
            failures_left: AtomicUsize::new(0),
            persisted: Mutex::new(Vec::new()),
        }
    }

    /// Store whose permission request is refused
    pub fn denied() -> Self {
        Self {
            grant: false,
            ..Self::new()
        }
    }

    /// Fail the next `count` persist calls
    pub fn failing(self, count: usize) -> Self {
        self.failures_left.store(count, Ordering::SeqCst);
        self
    }

    pub fn persisted(&self) -> Vec<MediaReference> {
        self.persisted.lock().unwrap().clone()
    }
}

impl MediaStore for MockStore {
    fn request_permission(&self) -> BoxFuture<'static, bool> {
        self.permission.store(self.grant, Ordering::SeqCst);
        future::ready(self.grant).boxed()
    }

    fn permission_granted(&self) -> bool {
        self.permission.load(Ordering::SeqCst)
    }

    fn persist_asset(
        &self,
        media: &MediaReference,
    ) -> BoxFuture<'static, Result<PathBuf, StorageError>> {
        if !self.permission_granted() {
            return future::ready(Err(StorageError::PermissionDenied)).boxed();
        }
        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return future::ready(Err(StorageError::Io("disk full".into()))).boxed();
        }

        self.persisted.lock().unwrap().push(media.clone());
        let name = media.path().file_name().map(PathBuf::from).unwrap_or_default();
        future::ready(Ok(PathBuf::from("/library").join(name))).boxed()
    }
}

/// Drives an `AppModel` one message at a time
pub struct Harness {
    pub model: AppModel,
    pub camera: Arc<MockCamera>,
    pub store: Arc<MockStore>,
    pending: VecDeque<BoxFuture<'static, Message>>,
    /// Snapshot after every handled message
    pub history: Vec<Snapshot>,
}

impl Harness {
    pub fn new(camera: MockCamera, store: MockStore) -> Self {
        Self::with_config(Config::default(), camera, store)
    }

    pub fn with_config(config: Config, camera: MockCamera, store: MockStore) -> Self {
        let camera = Arc::new(camera);
        let store = Arc::new(store);
        let model = AppModel::new(config, camera.clone(), store.clone());
        Self {
            model,
            camera,
            store,
            pending: VecDeque::new(),
            history: Vec::new(),
        }
    }

    /// Harness with both permissions requested and resolved
    pub async fn ready(camera: MockCamera, store: MockStore) -> Self {
        let mut harness = Self::new(camera, store);
        harness.send(Message::RequestPermissions);
        harness.settle().await;
        harness.history.clear();
        harness
    }

    /// Handle a message and queue the resulting futures
    pub fn send(&mut self, message: Message) {
        let task = self.model.update(message);
        self.pending.extend(task.into_futures());
        self.history.push(self.model.snapshot());
    }

    /// Resolve the oldest queued future and handle its message
    ///
    /// Returns `false` when nothing is queued.
    pub async fn step(&mut self) -> bool {
        let Some(future) = self.pending.pop_front() else {
            return false;
        };
        let message = future.await;
        self.send(message);
        true
    }

    /// Run until no futures are queued
    pub async fn settle(&mut self) {
        for _ in 0..10_000 {
            if !self.step().await {
                return;
            }
        }
        panic!("controller never settled");
    }

    /// Step until a snapshot satisfies `predicate`
    pub async fn run_until(&mut self, predicate: impl Fn(&Snapshot) -> bool) -> Snapshot {
        loop {
            let snapshot = self.snapshot();
            if predicate(&snapshot) {
                return snapshot;
            }
            assert!(self.step().await, "ran out of work before condition held");
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.model.snapshot()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Every distinct notification message shown, in order
    pub fn notifications(&self, kind: NotificationKind) -> Vec<String> {
        let mut seen: Vec<(u64, String)> = Vec::new();
        for snapshot in &self.history {
            if let Some(n) = &snapshot.notification
                && n.kind == kind
                && !seen.iter().any(|(id, _)| *id == n.id)
            {
                seen.push((n.id, n.message.clone()));
            }
        }
        seen.into_iter().map(|(_, message)| message).collect()
    }
}
