// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    let before = clock.epoch_ms();
    clock.advance_ms(5_000);
    assert_eq!(clock.epoch_ms(), before + 5_000);
}

#[test]
fn fake_clock_now_tracks_epoch_ms() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_700_000_000_000);
    let now = clock.now();
    assert_eq!(now.timestamp_millis(), 1_700_000_000_000);
    clock.advance_ms(60_000);
    let later = clock.now();
    assert_eq!((later - now).num_milliseconds(), 60_000);
}

#[test]
fn system_clock_is_monotonic_nondecreasing() {
    let clock = SystemClock;
    let a = clock.epoch_ms();
    let b = clock.epoch_ms();
    assert!(b >= a);
}
