use crate::{ButtonPins, Level};
use embedded_hal::digital::InputPin;

/// 定义GPIO按钮的有效电平。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// 低电平有效（例如，使用上拉电阻，按下时引脚接地）。
    #[default]
    Low,
    /// 高电平有效（例如，使用下拉电阻，按下时引脚接VCC）。
    High,
}

/// 一组直接由GPIO输入引脚驱动的按钮。
///
/// 每个引脚都与一个按钮标识绑定。引脚顺序与按钮记录顺序一致时每次读取都是 O(1)，
/// 否则退化为按标识查找。
/// `embedded-hal` 没有统一的上拉配置接口，因此上拉由可选的钩子完成；
/// 大多数 HAL 在构造输入引脚时就已经确定了上下拉。
pub struct GpioPins<P: InputPin, const N: usize> {
    pins: [(u8, P); N],
    active_level: ActiveLevel,
    pull_up: Option<fn(&mut P)>,
}

impl<P: InputPin, const N: usize> GpioPins<P, N> {
    /// 创建一组GPIO按钮。
    ///
    /// # 参数
    /// * `pins`: `(标识, 引脚)` 对。标识应与配置中 `ButtonRecord` 的标识一致。
    /// * `active_level`: 按钮按下时的有效电平。
    pub fn new(pins: [(u8, P); N], active_level: ActiveLevel) -> Self {
        Self {
            pins,
            active_level,
            pull_up: None,
        }
    }

    /// 设置在 `setup` 时对每个引脚调用的上拉配置钩子。
    pub fn with_pull_up(mut self, pull_up: fn(&mut P)) -> Self {
        self.pull_up = Some(pull_up);
        self
    }

    fn pin_mut(&mut self, slot: usize, id: u8) -> Option<&mut P> {
        let index = match self.pins.get(slot) {
            Some((pin_id, _)) if *pin_id == id => Some(slot),
            _ => self.pins.iter().position(|(pin_id, _)| *pin_id == id),
        }?;
        Some(&mut self.pins[index].1)
    }
}

impl<P: InputPin, const N: usize> ButtonPins for GpioPins<P, N> {
    fn configure_pull_up(&mut self, slot: usize, id: u8) {
        if let Some(pull_up) = self.pull_up {
            if let Some(pin) = self.pin_mut(slot, id) {
                pull_up(pin);
            }
        }
    }

    fn read(&mut self, slot: usize, id: u8) -> Level {
        let active_level = self.active_level;
        let Some(pin) = self.pin_mut(slot, id) else {
            return Level::Released;
        };
        let pressed = match active_level {
            ActiveLevel::Low => pin.is_low().unwrap_or(false),
            ActiveLevel::High => pin.is_high().unwrap_or(false),
        };
        if pressed {
            Level::Pressed
        } else {
            Level::Released
        }
    }
}
