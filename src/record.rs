use crate::Level;

/// 未配置的按钮标识，带有此标识的记录在每个周期中都会被跳过。
pub const UNCONFIGURED: u8 = 255;

/// 一个物理按钮的全部状态。
///
/// 记录由调用方以数组形式静态声明，`ButtonTracker` 只借用它们。
/// 动态字段只能由跟踪器修改，外部通过只读访问器观察。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonRecord {
    pub(crate) id: u8,
    pub(crate) level: Level,
    pub(crate) double_press: bool,
    /// 最近一次完成的按压时长（毫秒），按住期间为 0。
    pub(crate) duration: u32,
    /// 最近一次滤波后进入按下状态的时间。
    pub(crate) last_press: Option<u32>,
    pub(crate) last_reading: Level,
    /// 最近一次原始电平变化的时间，即消抖计时起点。
    pub(crate) last_change: u32,
    pub(crate) last_callback: Option<u32>,
    pub(crate) mapped_to: Option<u8>,
    /// 在 `setup` 时解析出的映射目标下标。
    pub(crate) mapped_index: Option<usize>,
}

impl ButtonRecord {
    /// 创建一个没有映射的按钮记录。
    pub const fn new(id: u8) -> Self {
        Self {
            id,
            level: Level::Released,
            double_press: false,
            duration: 0,
            last_press: None,
            last_reading: Level::Released,
            last_change: 0,
            last_callback: None,
            mapped_to: None,
            mapped_index: None,
        }
    }

    /// 创建一个按下时把状态转发给 `target` 的按钮记录。
    pub const fn mapped(id: u8, target: u8) -> Self {
        let mut record = Self::new(id);
        if target != UNCONFIGURED {
            record.mapped_to = Some(target);
        }
        record
    }

    /// 默认的三按钮配置：确认、确认键（映射到确认）、取消。
    ///
    /// 传入 `UNCONFIGURED` 的按钮会被跳过；确认键未配置时映射也随之取消。
    pub const fn defaults(ok: u8, confirm: u8, cancel: u8) -> [ButtonRecord; 3] {
        [Self::new(ok), Self::mapped(confirm, ok), Self::new(cancel)]
    }

    /// 占位记录，不对应任何引脚。
    pub const fn unconfigured() -> Self {
        Self::new(UNCONFIGURED)
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn is_configured(&self) -> bool {
        self.id != UNCONFIGURED
    }

    /// 消抖后的逻辑电平。
    pub fn level(&self) -> Level {
        self.level
    }

    /// 最近一次完成的按压时长，单位毫秒。
    pub fn duration_ms(&self) -> u32 {
        self.duration
    }

    pub fn is_double(&self) -> bool {
        self.double_press
    }

    pub fn mapped_to(&self) -> Option<u8> {
        self.mapped_to
    }

    /// 清空一次按压的全部状态，保留标识与已解析的映射。
    pub(crate) fn clear(&mut self, now: u32) {
        *self = Self {
            id: self.id,
            last_change: now,
            mapped_to: self.mapped_to,
            mapped_index: self.mapped_index,
            ..Self::new(self.id)
        };
    }
}
