// SPDX-License-Identifier: MPL-2.0

//! Integration tests for camera controls and the timer picker

mod common;

use common::{Harness, MockCamera, MockStore};
use shutter::app::Message;
use shutter::backends::camera::{CameraFacing, FlashMode};
use shutter::constants::{TimerSetting, zoom};

fn harness() -> Harness {
    Harness::new(MockCamera::new(), MockStore::new())
}

#[test]
fn test_toggle_facing_parity() {
    let mut harness = harness();
    for n in 1..=7 {
        harness.send(Message::ToggleFacing);
        let expected = if n % 2 == 1 {
            CameraFacing::Front
        } else {
            CameraFacing::Back
        };
        assert_eq!(harness.snapshot().camera_facing, expected);
    }
}

#[test]
fn test_toggle_flash_parity() {
    let mut harness = harness();
    for n in 1..=6 {
        harness.send(Message::ToggleFlash);
        let expected = if n % 2 == 1 {
            FlashMode::On
        } else {
            FlashMode::Off
        };
        assert_eq!(harness.snapshot().flash_mode, expected);
    }
}

#[test]
fn test_settings_pushed_to_camera() {
    let mut harness = harness();
    harness.send(Message::ToggleFacing);
    harness.send(Message::ToggleFlash);
    harness.send(Message::SetZoom(0.5));

    let last = *harness.camera.configured().last().expect("settings pushed");
    assert_eq!(last.facing, CameraFacing::Front);
    assert_eq!(last.flash, FlashMode::On);
    assert_eq!(last.zoom, 0.5);
}

#[test]
fn test_pinch_steps() {
    let mut harness = harness();
    harness.send(Message::PinchZoom { scale: 1.3 });
    harness.send(Message::PinchZoom { scale: 1.01 });
    assert!((harness.snapshot().zoom_level - 2.0 * zoom::PINCH_STEP).abs() < 1e-6);

    harness.send(Message::PinchZoom { scale: 0.7 });
    assert!((harness.snapshot().zoom_level - zoom::PINCH_STEP).abs() < 1e-6);

    // No change at scale 1.0 or NaN
    harness.send(Message::PinchZoom { scale: 1.0 });
    harness.send(Message::PinchZoom { scale: f32::NAN });
    assert!((harness.snapshot().zoom_level - zoom::PINCH_STEP).abs() < 1e-6);
}

#[test]
fn test_pinch_at_bounds_is_ignored() {
    let mut harness = harness();
    harness.send(Message::PinchZoom { scale: 0.5 });
    assert_eq!(harness.snapshot().zoom_level, zoom::MIN);

    harness.send(Message::SetZoom(zoom::MAX));
    let pushed = harness.camera.configured().len();
    harness.send(Message::PinchZoom { scale: 2.0 });
    assert_eq!(harness.snapshot().zoom_level, zoom::MAX);
    // Nothing changed, so nothing was pushed
    assert_eq!(harness.camera.configured().len(), pushed);
}

#[test]
fn test_pinch_near_bound_is_ignored() {
    let mut harness = harness();
    harness.send(Message::SetZoom(0.998));
    let pushed = harness.camera.configured().len();
    harness.send(Message::PinchZoom { scale: 2.0 });
    assert!((harness.snapshot().zoom_level - 0.998).abs() < 1e-6);
    assert_eq!(harness.camera.configured().len(), pushed);

    harness.send(Message::SetZoom(0.002));
    harness.send(Message::PinchZoom { scale: 0.5 });
    assert!((harness.snapshot().zoom_level - 0.002).abs() < 1e-6);
}

#[test]
fn test_pinch_reaches_upper_bound() {
    let mut harness = harness();
    for _ in 0..250 {
        harness.send(Message::PinchZoom { scale: 1.5 });
    }
    let level = harness.snapshot().zoom_level;
    assert!(level <= zoom::MAX);
    assert!(zoom::MAX - level < 1e-3, "pinch stopped at {}", level);
}

#[test]
fn test_zoom_buttons_clamp() {
    let mut harness = harness();
    for _ in 0..15 {
        harness.send(Message::ZoomIn);
    }
    assert_eq!(harness.snapshot().zoom_level, zoom::MAX);

    harness.send(Message::ZoomOut);
    assert!((harness.snapshot().zoom_level - (zoom::MAX - zoom::BUTTON_STEP)).abs() < 1e-6);

    harness.send(Message::ResetZoom);
    assert_eq!(harness.snapshot().zoom_level, zoom::MIN);

    harness.send(Message::ZoomOut);
    assert_eq!(harness.snapshot().zoom_level, zoom::MIN);
}

#[test]
fn test_absolute_zoom_clamps() {
    let mut harness = harness();
    harness.send(Message::SetZoom(3.0));
    assert_eq!(harness.snapshot().zoom_level, zoom::MAX);
    harness.send(Message::SetZoom(-1.0));
    assert_eq!(harness.snapshot().zoom_level, zoom::MIN);
    harness.send(Message::SetZoom(f32::NAN));
    assert_eq!(harness.snapshot().zoom_level, zoom::MIN);
}

#[test]
fn test_zoom_stays_in_range_for_any_sequence() {
    let mut harness = harness();
    // Deterministic pseudo-random mix of every zoom adjustment
    let mut seed: u32 = 0x2545_f491;
    for _ in 0..2_000 {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let message = match seed >> 29 {
            0 => Message::ZoomIn,
            1 => Message::ZoomOut,
            2 => Message::ResetZoom,
            3 => Message::SetZoom((seed % 400) as f32 / 100.0 - 2.0),
            4 | 5 => Message::PinchZoom { scale: 1.2 },
            _ => Message::PinchZoom { scale: 0.8 },
        };
        harness.send(message);
        let level = harness.snapshot().zoom_level;
        assert!(
            (zoom::MIN..=zoom::MAX).contains(&level),
            "zoom {} out of range",
            level
        );
    }
}

#[test]
fn test_timer_picker_toggle() {
    let mut harness = harness();
    assert!(!harness.snapshot().timer_picker_visible);
    harness.send(Message::ToggleTimerPicker);
    assert!(harness.snapshot().timer_picker_visible);
    harness.send(Message::ToggleTimerPicker);
    assert!(!harness.snapshot().timer_picker_visible);

    harness.send(Message::ToggleTimerPicker);
    harness.send(Message::CloseTimerPicker);
    assert!(!harness.snapshot().timer_picker_visible);
}

#[test]
fn test_select_timer_closes_picker() {
    let mut harness = harness();
    harness.send(Message::ToggleTimerPicker);
    harness.send(Message::SelectTimer(TimerSetting::Ten));

    let snapshot = harness.snapshot();
    assert_eq!(snapshot.timer_setting, TimerSetting::Ten);
    assert!(!snapshot.timer_picker_visible);
}

#[test]
fn test_cycle_timer() {
    let mut harness = harness();
    let mut seen = Vec::new();
    for _ in 0..4 {
        harness.send(Message::CycleTimer);
        seen.push(harness.snapshot().timer_setting);
    }
    assert_eq!(
        seen,
        vec![
            TimerSetting::Three,
            TimerSetting::Five,
            TimerSetting::Ten,
            TimerSetting::Off
        ]
    );
}
