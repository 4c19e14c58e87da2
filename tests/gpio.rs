mod common;

use embassy_poll_button::{
    gpio::{ActiveLevel, GpioPins},
    ButtonPins, ButtonRecord, ButtonTracker, EmbassyClock, Level, SetupFlags, TrackerConfig,
};
use embassy_time::{with_timeout, Duration};

#[test]
fn active_low_pin_reads_pressed_when_grounded() {
    let (mut pins, [line]) = common::pins([7]);

    assert_eq!(pins.read(0, 7), Level::Released);
    line.press();
    assert_eq!(pins.read(0, 7), Level::Pressed);
    // 未知标识一律视为松开
    assert_eq!(pins.read(0, 8), Level::Released);
}

#[test]
fn active_high_pin_reads_pressed_when_driven() {
    let (mut pins, [line]) = common::pins_with_level([7], ActiveLevel::High);

    assert_eq!(pins.read(0, 7), Level::Pressed);
    line.press();
    assert_eq!(pins.read(0, 7), Level::Released);
}

#[test]
fn pull_up_hook_is_optional() {
    let (pin, line) = common::mock_pin();
    let mut pins = GpioPins::new([(7, pin)], ActiveLevel::default());
    pins.configure_pull_up(0, 7);
    assert_eq!(line.pull_ups(), 0);

    let (mut pins, [line]) = common::pins([7]);
    pins.configure_pull_up(0, 7);
    pins.configure_pull_up(1, 8);
    assert_eq!(line.pull_ups(), 1);
}

#[test]
fn slot_mismatch_falls_back_to_id_lookup() {
    let (mut pins, [first, second]) = common::pins([7, 8]);
    second.press();

    assert_eq!(pins.read(1, 8), Level::Pressed);
    assert_eq!(pins.read(0, 8), Level::Pressed);
    assert_eq!(pins.read(5, 8), Level::Pressed);
    assert_eq!(pins.read(1, 7), Level::Released);

    pins.configure_pull_up(1, 7);
    assert_eq!((first.pull_ups(), second.pull_ups()), (1, 0));
}

#[test]
fn tracker_reads_pins_declared_out_of_order() {
    let clock = common::ManualClock::starting_at(1000);
    let (pins, [cancel_line, ok_line]) = common::pins([4, 2]);
    let mut buttons = [ButtonRecord::new(2), ButtonRecord::new(4)];
    let mut tracker = ButtonTracker::new(pins, &clock, TrackerConfig::default());
    tracker.setup(&mut buttons, None, SetupFlags::SILENT).unwrap();
    assert_eq!((ok_line.pull_ups(), cancel_line.pull_ups()), (1, 1));

    ok_line.press();
    common::tick_until(&mut tracker, &clock, 1100, 10);
    ok_line.release();
    common::tick_until(&mut tracker, &clock, 1600, 10);

    assert!(tracker.is_pressed(2, true));
    assert!(!tracker.is_pressed(4, true));
}

// 使用 embassy-time 的 std 驱动运行真实的轮询循环
#[tokio::test]
async fn test_run_loop_with_tokio_and_embassy_time() {
    let (pins, [line]) = common::pins([7]);
    let mut buttons = [ButtonRecord::new(7)];
    let mut tracker = ButtonTracker::new(pins, EmbassyClock, TrackerConfig::default());
    tracker.setup(&mut buttons, None, SetupFlags::SILENT).unwrap();

    line.press();
    let _ = with_timeout(Duration::from_millis(300), tracker.run(Duration::from_millis(5))).await;
    assert_eq!(tracker.state(7).unwrap().level(), Level::Pressed);

    line.release();
    let _ = with_timeout(Duration::from_millis(600), tracker.run(Duration::from_millis(5))).await;

    let duration = tracker.state(7).unwrap().duration_ms();
    assert!((250..=350).contains(&duration), "duration was {duration}");
    assert!(tracker.is_short_pressed(7, true));
    assert!(!tracker.is_pressed(7, false));
}
