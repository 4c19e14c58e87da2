#![allow(dead_code)]

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embassy_poll_button::{
    gpio::{ActiveLevel, GpioPins},
    ButtonPins, ButtonTracker, Clock,
};

// --- Mock Hardware (模拟硬件) ---

/// 上拉输入引脚，空闲为高电平。
pub struct MockPin {
    high: Rc<Cell<bool>>,
    pub pull_ups: Rc<Cell<u32>>,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}

/// 测试中用来驱动 `MockPin` 的句柄。
#[derive(Clone)]
pub struct Line {
    high: Rc<Cell<bool>>,
    pull_ups: Rc<Cell<u32>>,
}

impl Line {
    pub fn press(&self) {
        self.high.set(false);
    }

    pub fn release(&self) {
        self.high.set(true);
    }

    pub fn toggle(&self) {
        self.high.set(!self.high.get());
    }

    pub fn pull_ups(&self) -> u32 {
        self.pull_ups.get()
    }
}

pub fn mock_pin() -> (MockPin, Line) {
    let line = Line {
        high: Rc::new(Cell::new(true)),
        pull_ups: Rc::new(Cell::new(0)),
    };
    let pin = MockPin {
        high: line.high.clone(),
        pull_ups: line.pull_ups.clone(),
    };
    (pin, line)
}

fn count_pull_up(pin: &mut MockPin) {
    pin.pull_ups.set(pin.pull_ups.get() + 1);
}

pub fn pins_with_level<const N: usize>(
    ids: [u8; N],
    active_level: ActiveLevel,
) -> (GpioPins<MockPin, N>, [Line; N]) {
    let mut lines: [Option<Line>; N] = core::array::from_fn(|_| None);
    let pins = core::array::from_fn(|i| {
        let (pin, line) = mock_pin();
        lines[i] = Some(line);
        (ids[i], pin)
    });
    let lines = lines.map(|line| line.unwrap());
    (
        GpioPins::new(pins, active_level).with_pull_up(count_pull_up),
        lines,
    )
}

pub fn pins<const N: usize>(ids: [u8; N]) -> (GpioPins<MockPin, N>, [Line; N]) {
    pins_with_level(ids, ActiveLevel::Low)
}

/// 手动推进的毫秒时钟。
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn starting_at(now: u32) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn now(&self) -> u32 {
        self.now.get()
    }

    pub fn set(&self, now: u32) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

/// 以 `step` 为步长把时钟推进到 `end`，每一步之后调用一次 `update()`。
pub fn tick_until<P: ButtonPins>(
    tracker: &mut ButtonTracker<'_, P, &ManualClock>,
    clock: &ManualClock,
    end: u32,
    step: u32,
) {
    let steps = end.wrapping_sub(clock.now()) / step;
    for _ in 0..steps {
        clock.set(clock.now().wrapping_add(step));
        tracker.update();
    }
}
