// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use shutter::constants::{TimerSetting, zoom};

#[test]
fn test_timer_presets() {
    // Off, 3s, 5s, 10s in picker order
    let seconds: Vec<u32> = TimerSetting::ALL.iter().map(|t| t.seconds()).collect();
    assert_eq!(seconds, vec![0, 3, 5, 10]);
}

#[test]
fn test_timer_rejects_other_durations() {
    for seconds in [1, 2, 4, 7, 15, 60] {
        assert_eq!(TimerSetting::from_seconds(seconds), None);
    }
}

#[test]
fn test_timer_labels() {
    assert_eq!(TimerSetting::Off.label(), "0s");
    assert_eq!(TimerSetting::Ten.to_string(), "10s");
}

#[test]
fn test_zoom_presets_within_range() {
    for preset in zoom::PRESETS {
        assert!((zoom::MIN..=zoom::MAX).contains(&preset));
    }
    assert!(zoom::PINCH_STEP < zoom::BUTTON_STEP);
}
