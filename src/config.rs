use embassy_time::Duration;

/// 定义按钮消抖与按压分类的时间参数。
///
/// 所有时间在内部都会被换算为 32 位毫秒计数，并按回绕减法比较；
/// 超出范围的时长饱和为 `u32::MAX`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackerConfig {
    /// 消抖持续时间。
    ///
    /// 原始电平每变化一次都会重新开始计时，只有稳定超过此时长的读数才会被采信。
    pub debounce: Duration,

    /// 双击时间窗口。
    ///
    /// 两次按下的起始时间之差小于此窗口时，第二次按下被标记为双击。
    /// 同时，一次完成的按压要等到此窗口完全过去后才会被分类。
    pub double_click_window: Duration,

    /// 长按阈值。
    ///
    /// 持续时间严格大于此值的按压被视为长按；按住不放时，回调也按此周期重复触发。
    pub long_press: Duration,
}

impl TrackerConfig {
    pub(crate) fn debounce_ms(&self) -> u32 {
        saturating_ms(self.debounce)
    }

    pub(crate) fn double_click_ms(&self) -> u32 {
        saturating_ms(self.double_click_window)
    }

    pub(crate) fn long_press_ms(&self) -> u32 {
        saturating_ms(self.long_press)
    }
}

/// 超过 32 位毫秒计数范围（约 49.7 天）的时长按 `u32::MAX` 处理。
fn saturating_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

impl Default for TrackerConfig {
    /// 提供一套合理的默认配置。
    ///
    /// - 消抖: 50ms
    /// - 双击窗口: 400ms
    /// - 长按阈值: 1000ms
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(50),
            double_click_window: Duration::from_millis(400),
            long_press: Duration::from_millis(1000),
        }
    }
}

/// `setup` 的标志位集合。
///
/// 目前只有 `SILENT` 会改变行为，其余标志保留给调用方标记用途。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupFlags(u8);

impl SetupFlags {
    pub const NONE: Self = Self(0x00);
    pub const SHORT: Self = Self(0x01);
    pub const LONG: Self = Self(0x02);
    pub const DOUBLE: Self = Self(0x04);
    /// 不输出初始化诊断信息。
    pub const SILENT: Self = Self(0x80);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for SetupFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
