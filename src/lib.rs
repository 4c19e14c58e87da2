#![no_std]

pub mod channel;
pub mod clock;
pub mod config;
pub mod gpio;
pub mod record;

pub use clock::EmbassyClock;
pub use config::*;
pub use record::{ButtonRecord, UNCONFIGURED};

use embassy_time::{Duration, Ticker};

/// 按钮的电平状态，与硬件的有效电平无关。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Pressed,
    Released,
}

/// 按标识读取按钮电平的硬件抽象。
///
/// `slot` 是按钮记录在当前配置中的下标，实现可以用它做 O(1) 查找；
/// `id` 是记录的标识，用于校验或回退查找。
pub trait ButtonPins {
    /// 将引脚配置为上拉输入。重复调用必须是无害的。
    fn configure_pull_up(&mut self, slot: usize, id: u8);

    /// 读取原始电平。读取失败时应返回 `Level::Released`。
    fn read(&mut self, slot: usize, id: u8) -> Level;
}

/// 单调递增、允许回绕的毫秒时钟。
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// 长按回调。按住期间每经过一个长按阈值就会被调用一次。
pub trait LongPressHandler {
    fn on_long_press(&mut self, id: u8);
}

impl<F: FnMut(u8)> LongPressHandler for F {
    fn on_long_press(&mut self, id: u8) {
        self(id)
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    /// 沿映射目标前进会回到 `id` 本身。
    MappingCycle { id: u8 },
}

impl core::fmt::Display for SetupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SetupError::MappingCycle { id } => {
                write!(f, "button mapping starting at pin {} forms a cycle", id)
            }
        }
    }
}

/// 非阻塞的轮询式按钮跟踪器。
///
/// 跟踪器借用调用方提供的按钮记录，每次 `update()` 对所有记录做一次消抖与分类，
/// 耗时只与按钮数量线性相关。它不做任何内部同步：`update()`、`reset()` 以及
/// 带重置的查询必须在同一个控制线程（或同一个任务）中调用。
pub struct ButtonTracker<'a, P: ButtonPins, C: Clock> {
    pins: P,
    clock: C,
    config: TrackerConfig,
    buttons: &'a mut [ButtonRecord],
    callback: Option<&'a mut dyn LongPressHandler>,
}

impl<'a, P: ButtonPins, C: Clock> ButtonTracker<'a, P, C> {
    /// 创建一个尚未绑定任何按钮的跟踪器。在 `setup` 之前 `update` 什么也不做。
    pub fn new(pins: P, clock: C, config: TrackerConfig) -> Self {
        Self {
            pins,
            clock,
            config,
            buttons: &mut [],
            callback: None,
        }
    }

    /// 绑定一组按钮记录以及可选的长按回调。
    ///
    /// 可以多次调用以切换配置。每个已配置的引脚都会被设置为上拉输入，
    /// 映射目标在新绑定的这一组记录中按标识解析。
    ///
    /// 映射成环的配置会被拒绝，此时之前的配置保持不变。
    ///
    /// 初始化诊断信息通过 `defmt` 输出，只有启用 `defmt` feature 时才存在；
    /// 未启用时 `SetupFlags::SILENT` 不产生任何效果。
    pub fn setup(
        &mut self,
        buttons: &'a mut [ButtonRecord],
        callback: Option<&'a mut dyn LongPressHandler>,
        flags: SetupFlags,
    ) -> Result<(), SetupError> {
        if let Some(id) = find_cycle(buttons) {
            #[cfg(feature = "defmt")]
            defmt::error!("[button] Mapping cycle at pin: {}", id);
            return Err(SetupError::MappingCycle { id });
        }

        self.buttons = buttons;
        self.callback = callback;

        #[cfg(feature = "defmt")]
        let verbose = !flags.contains(SetupFlags::SILENT);
        #[cfg(not(feature = "defmt"))]
        let _ = flags;

        #[cfg(feature = "defmt")]
        {
            if verbose {
                defmt::info!(
                    "[button] Setup long: {} double: {} debounce: {}ms",
                    self.config.long_press_ms(),
                    self.config.double_click_ms(),
                    self.config.debounce_ms()
                );
            }
        }

        for i in 0..self.buttons.len() {
            let id = self.buttons[i].id;
            if id == UNCONFIGURED {
                continue;
            }
            self.pins.configure_pull_up(i, id);

            let mapped_index = self.buttons[i]
                .mapped_to
                .and_then(|target| index_of(self.buttons, target));
            #[cfg(feature = "defmt")]
            {
                if let (Some(target), None) = (self.buttons[i].mapped_to, mapped_index) {
                    defmt::warn!("[button] Pin {} maps to unknown pin {}", id, target);
                }
            }
            self.buttons[i].mapped_index = mapped_index;

            #[cfg(feature = "defmt")]
            {
                if verbose {
                    defmt::info!("[button] Init button on pin: {}", id);
                }
            }
        }
        Ok(())
    }

    /// 推进一个采样周期。应以固定的短周期调用。
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        let debounce = self.config.debounce_ms();
        let double_click = self.config.double_click_ms();
        let long_press = self.config.long_press_ms();

        for (slot, button) in self.buttons.iter_mut().enumerate() {
            if !button.is_configured() {
                continue;
            }
            let reading = self.pins.read(slot, button.id);
            if reading != button.last_reading {
                button.last_change = now;
            }

            if now.wrapping_sub(button.last_change) > debounce && reading != button.level {
                match reading {
                    Level::Pressed => {
                        button.double_press = button
                            .last_press
                            .is_some_and(|start| now.wrapping_sub(start) < double_click);
                        button.duration = 0;
                        button.last_press = Some(now);
                    }
                    Level::Released => {
                        if let Some(start) = button.last_press {
                            button.duration = now.wrapping_sub(start);
                        }
                    }
                }
                button.level = reading;
                #[cfg(feature = "defmt")]
                defmt::trace!("[button] Pin {} -> {}", button.id, reading);
            }
            button.last_reading = reading;

            if reading == Level::Pressed && button.level == Level::Pressed {
                if let Some(callback) = self.callback.as_deref_mut() {
                    let held_long = button
                        .last_press
                        .is_some_and(|start| now.wrapping_sub(start) >= long_press);
                    let interval_elapsed = button
                        .last_callback
                        .map_or(true, |fired| now.wrapping_sub(fired) >= long_press);
                    if held_long && interval_elapsed {
                        #[cfg(feature = "defmt")]
                        defmt::trace!("[button] Long press on pin {}", button.id);
                        callback.on_long_press(button.id);
                        button.last_callback = Some(now);
                    }
                }
            }
            if reading == Level::Released {
                button.last_callback = None;
            }
        }

        for i in 0..self.buttons.len() {
            let source = self.buttons[i];
            if source.level != Level::Pressed {
                continue;
            }
            if let Some(target) = source.mapped_index {
                let target = &mut self.buttons[target];
                target.level = source.level;
                target.duration = source.duration;
                target.double_press = source.double_press;
                target.last_press = source.last_press;
            }
        }
    }

    /// 以 `period` 为周期持续调用 `update()`，供 embassy 任务使用。
    pub async fn run(&mut self, period: Duration) -> ! {
        let mut ticker = Ticker::every(period);
        loop {
            self.update();
            ticker.next().await;
        }
    }

    /// 是否完成了一次任意时长的按压。
    ///
    /// 注意：双击同样满足此查询。若同时检查单击与双击，应先查询双击版本。
    pub fn is_pressed(&mut self, id: u8, reset: bool) -> bool {
        self.check_press(id, 0, None, false, reset)
    }

    pub fn is_pressed_double(&mut self, id: u8, reset: bool) -> bool {
        self.check_press(id, 0, None, true, reset)
    }

    /// 是否完成了一次不超过长按阈值的按压。双击同样满足此查询。
    pub fn is_short_pressed(&mut self, id: u8, reset: bool) -> bool {
        let long_press = self.config.long_press_ms();
        self.check_press(id, 0, Some(long_press), false, reset)
    }

    pub fn is_short_pressed_double(&mut self, id: u8, reset: bool) -> bool {
        let long_press = self.config.long_press_ms();
        self.check_press(id, 0, Some(long_press), true, reset)
    }

    /// 是否完成了一次严格超过长按阈值的按压。双击同样满足此查询。
    pub fn is_long_pressed(&mut self, id: u8, reset: bool) -> bool {
        let long_press = self.config.long_press_ms();
        self.check_press(id, long_press, None, false, reset)
    }

    pub fn is_long_pressed_double(&mut self, id: u8, reset: bool) -> bool {
        let long_press = self.config.long_press_ms();
        self.check_press(id, long_press, None, true, reset)
    }

    /// 清除按钮 `id` 的按压状态，并级联清除所有映射到它的按钮。
    ///
    /// 标识与已解析的映射会被保留。未知标识不做任何事。
    pub fn reset(&mut self, id: u8) {
        let Some(index) = index_of(self.buttons, id) else {
            return;
        };
        let now = self.clock.now_ms();
        self.buttons[index].clear(now);
        for (i, button) in self.buttons.iter_mut().enumerate() {
            if i != index && button.mapped_to == Some(id) {
                button.clear(now);
            }
        }
    }

    /// 按标识查找按钮记录。未配置或未知的标识返回 `None`。
    pub fn state(&self, id: u8) -> Option<&ButtonRecord> {
        let buttons: &[ButtonRecord] = &*self.buttons;
        index_of(buttons, id).map(|index| &buttons[index])
    }

    pub fn buttons(&self) -> &[ButtonRecord] {
        &*self.buttons
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn check_press(
        &mut self,
        id: u8,
        min_duration: u32,
        max_duration: Option<u32>,
        require_double: bool,
        reset: bool,
    ) -> bool {
        let Some(button) = self.state(id) else {
            return false;
        };
        let now = self.clock.now_ms();
        let double_click = self.config.double_click_ms();

        // 在双击窗口过去之前不分类，以便第二次按下还能被识别为双击。
        let settled = button.level == Level::Released
            && button.duration > 0
            && button
                .last_press
                .is_some_and(|start| now.wrapping_sub(start) > double_click);
        let duration_ok = button.duration > min_duration
            && max_duration.map_or(true, |max| button.duration <= max);
        let double_ok = !require_double || button.double_press;

        if settled && duration_ok && double_ok {
            if reset {
                self.reset(id);
            }
            return true;
        }
        false
    }
}

fn index_of(buttons: &[ButtonRecord], id: u8) -> Option<usize> {
    if id == UNCONFIGURED {
        return None;
    }
    buttons.iter().position(|button| button.id == id)
}

/// 从每个记录出发沿映射前进，若回到起点则返回起点的标识。
fn find_cycle(buttons: &[ButtonRecord]) -> Option<u8> {
    for (start, button) in buttons.iter().enumerate() {
        if !button.is_configured() {
            continue;
        }
        let mut current = start;
        for _ in 0..buttons.len() {
            let next = buttons[current]
                .mapped_to
                .and_then(|target| index_of(buttons, target));
            match next {
                Some(next) if next == start => return Some(button.id),
                Some(next) => current = next,
                None => break,
            }
        }
    }
    None
}
