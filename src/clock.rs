use embassy_time::Instant;

use crate::Clock;

/// 基于 `embassy_time::Instant` 的毫秒时钟。
///
/// 计数被截断为 32 位，溢出后回绕，与常见 MCU 的毫秒计数器一致。
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
