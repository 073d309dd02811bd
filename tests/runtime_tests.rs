// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the message loop

mod common;

use common::{MockCamera, MockStore};
use shutter::app::{AccessState, AppModel, CaptureView, Message, NotificationKind, Runtime};
use shutter::backends::camera::{MediaKind, SyntheticCamera};
use shutter::config::Config;
use shutter::constants::TimerSetting;
use shutter::storage::MediaLibrary;
use std::path::PathBuf;
use std::sync::Arc;

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "shutter-runtime-{}-{}",
        name,
        uuid::Uuid::new_v4().simple()
    ))
}

#[tokio::test(start_paused = true)]
async fn test_timed_capture_through_runtime() {
    let camera = Arc::new(MockCamera::new());
    let model = AppModel::new(
        Config::default(),
        camera.clone(),
        Arc::new(MockStore::new()),
    );
    let (runtime, handle) = Runtime::new(model);
    let join = tokio::spawn(runtime.run());

    let ready = handle
        .wait_for(|s| s.camera_access == AccessState::Granted)
        .await
        .expect("permissions resolved");
    assert_eq!(ready.media_access, AccessState::Granted);

    handle.dispatch(Message::SelectTimer(TimerSetting::Three));
    handle.dispatch(Message::RequestCapture);

    let counting = handle
        .wait_for(|s| s.is_counting_down)
        .await
        .expect("countdown started");
    assert_eq!(counting.view(), CaptureView::CountingDown { remaining: 3 });

    let previewing = handle
        .wait_for(|s| s.captured_media.is_some())
        .await
        .expect("photo captured");
    assert!(!previewing.is_counting_down);
    assert_eq!(camera.capture_count(), 1);

    assert!(handle.shutdown());
    let model = join.await.expect("runtime task");
    assert_eq!(model.snapshot().captured_media, None);
    assert!(handle.wait_for(|s| s.is_recording_video).await.is_none());
    assert!(!handle.dispatch(Message::RequestCapture));
}

#[tokio::test(start_paused = true)]
async fn test_runtime_stops_when_handles_dropped() {
    let model = AppModel::new(
        Config::default(),
        Arc::new(MockCamera::new()),
        Arc::new(MockStore::new()),
    );
    let (runtime, handle) = Runtime::new(model);
    let join = tokio::spawn(runtime.run());

    handle.dispatch(Message::ToggleFlash);
    drop(handle);

    let model = join.await.expect("runtime task");
    assert!(model.snapshot().flash_mode.is_on());
}

#[tokio::test(start_paused = true)]
async fn test_denied_camera_shows_no_access() {
    let model = AppModel::new(
        Config::default(),
        Arc::new(MockCamera::denied()),
        Arc::new(MockStore::new()),
    );
    let (runtime, handle) = Runtime::new(model);
    let join = tokio::spawn(runtime.run());

    let snapshot = handle
        .wait_for(|s| s.camera_access == AccessState::Denied)
        .await
        .expect("permissions resolved");
    assert_eq!(snapshot.view(), CaptureView::NoAccess);

    handle.shutdown();
    join.await.expect("runtime task");
}

#[tokio::test]
async fn test_synthetic_photo_saved_to_library() {
    let cache = scratch_dir("cache");
    let photos = scratch_dir("photos");
    let videos = scratch_dir("videos");
    let config = Config {
        capture_cache_dir: Some(cache.clone()),
        ..Config::default()
    };

    let camera = Arc::new(SyntheticCamera::from_config(&config));
    let library = Arc::new(MediaLibrary::new(&photos, &videos));
    let model = AppModel::new(config, camera, library);
    let (runtime, handle) = Runtime::new(model);
    let join = tokio::spawn(runtime.run());

    handle
        .wait_for(|s| s.camera_access == AccessState::Granted)
        .await
        .expect("permissions resolved");
    handle.dispatch(Message::RequestCapture);

    let preview = handle
        .wait_for(|s| s.captured_media.is_some() || s.notification.is_some())
        .await
        .expect("capture finished");
    let media = preview.captured_media.expect("photo captured");
    assert_eq!(media.kind(), MediaKind::Photo);
    assert!(media.path().starts_with(&cache));
    assert!(media.path().exists());

    handle.dispatch(Message::SavePreview);
    let saved = handle
        .wait_for(|s| s.notification.is_some())
        .await
        .expect("save finished");
    let notification = saved.notification.expect("notification");
    assert_eq!(notification.kind, NotificationKind::Info);
    assert_eq!(saved.captured_media, None);
    let saved_path = saved.last_saved.expect("library path");
    assert!(saved_path.starts_with(&photos));
    assert!(saved_path.exists());

    let entries: Vec<_> = std::fs::read_dir(&photos)
        .expect("photo library created")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("IMG_"));
    assert!(entries[0].ends_with(".jpg"));

    handle.shutdown();
    join.await.expect("runtime task");

    for dir in [cache, photos, videos] {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[tokio::test]
async fn test_synthetic_camera_refused() {
    let cache = scratch_dir("cache");
    let photos = scratch_dir("photos");
    let videos = scratch_dir("videos");
    let config = Config {
        capture_cache_dir: Some(cache.clone()),
        ..Config::default()
    };
    let camera = Arc::new(SyntheticCamera::from_config(&config).with_permission(false));
    let library = Arc::new(MediaLibrary::new(&photos, &videos));
    let model = AppModel::new(config, camera, library);
    let (runtime, handle) = Runtime::new(model);
    let join = tokio::spawn(runtime.run());

    let snapshot = handle
        .wait_for(|s| s.camera_access != AccessState::Pending)
        .await
        .expect("permissions resolved");
    assert_eq!(snapshot.view(), CaptureView::NoAccess);
    assert_eq!(snapshot.media_access, AccessState::Granted);

    handle.dispatch(Message::RequestCapture);
    handle.shutdown();
    let model = join.await.expect("runtime task");
    assert_eq!(model.snapshot().captured_media, None);

    for dir in [cache, photos, videos] {
        let _ = std::fs::remove_dir_all(dir);
    }
}
