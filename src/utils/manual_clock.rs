//! テスト用の手動クロック
//!
//! `advance` を呼ぶまで時間が進まない `TimerDriver`。

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{PopoverError, Result};
use crate::utils::hover::TimerDriver;

struct ScheduledTimer {
    id: u32,
    due_ms: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ClockInner {
    now_ms: u64,
    next_id: u32,
    timers: Vec<ScheduledTimer>,
    fail_next: bool,
}

#[derive(Clone, Default)]
pub struct ManualClock {
    inner: Rc<RefCell<ClockInner>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    pub fn scheduled_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// 次の set_timeout をエラーにする
    pub fn fail_next_schedule(&self) {
        self.inner.borrow_mut().fail_next = true;
    }

    /// 時間を進め、期限の来たタイマーを期限順に発火する
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due_ms <= target)
                    .min_by_key(|(_, t)| (t.due_ms, t.id))
                    .map(|(i, _)| i);
                due.map(|i| {
                    let timer = inner.timers.remove(i);
                    inner.now_ms = timer.due_ms;
                    timer
                })
            };
            // 借用を解放してからコールバックを呼ぶ
            match next {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.inner.borrow_mut().now_ms = target;
    }
}

impl TimerDriver for ManualClock {
    type Handle = u32;

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<u32> {
        let mut inner = self.inner.borrow_mut();
        if std::mem::take(&mut inner.fail_next) {
            return Err(PopoverError::Timer("rejected by test clock".to_string()));
        }
        inner.next_id += 1;
        let id = inner.next_id;
        let due_ms = inner.now_ms + delay_ms as u64;
        inner.timers.push(ScheduledTimer { id, due_ms, callback });
        Ok(id)
    }

    fn clear_timeout(&self, handle: u32) {
        self.inner.borrow_mut().timers.retain(|t| t.id != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fires_in_due_order() {
        let clock = ManualClock::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for (name, delay) in [("late", 300), ("early", 100)] {
            let order = order.clone();
            clock
                .set_timeout(delay, Box::new(move || order.borrow_mut().push(name)))
                .unwrap();
        }

        clock.advance(400);
        assert_eq!(*order.borrow(), vec!["early", "late"]);
        assert_eq!(clock.now(), 400);
    }

    #[test]
    fn clearing_unknown_handle_is_noop() {
        let clock = ManualClock::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let id = clock.set_timeout(10, Box::new(move || flag.set(true))).unwrap();

        clock.clear_timeout(id + 99);
        clock.advance(10);
        assert!(fired.get());

        // 発火済みハンドルの解除も問題なし
        clock.clear_timeout(id);
        assert_eq!(clock.scheduled_count(), 0);
    }
}
