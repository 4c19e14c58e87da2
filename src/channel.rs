use embassy_sync::{
    blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex},
    pubsub::{PubSubChannel, Publisher, Subscriber},
};

use crate::LongPressHandler;

/// 长按通知通道，消息内容为被按住的按钮标识。
pub type LongPressChannel<const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> =
    PubSubChannel<CriticalSectionRawMutex, u8, MSG_CAP, SUBS, PUBS>;
pub type LongPressPublisher<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> =
    Publisher<'a, CriticalSectionRawMutex, u8, MSG_CAP, SUBS, PUBS>;
pub type LongPressSubscriber<'a, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> =
    Subscriber<'a, CriticalSectionRawMutex, u8, MSG_CAP, SUBS, PUBS>;

/// 让长按回调把事件投递到异步任务。
///
/// `update()` 不能等待，因此使用 `publish_immediate`：队列已满时丢弃最旧的消息。
impl<M: RawMutex, const MSG_CAP: usize, const SUBS: usize, const PUBS: usize> LongPressHandler
    for Publisher<'_, M, u8, MSG_CAP, SUBS, PUBS>
{
    fn on_long_press(&mut self, id: u8) {
        self.publish_immediate(id);
    }
}
