//! ホバー遅延表示コントローラー
//!
//! mouseenter から一定時間（既定200ms）経過後にポップオーバーを表示し、
//! mouseleave で即座に非表示にする。保留中のタイマーはインスタンスが
//! 所有し、leave / teardown / Drop で必ずキャンセルされる。

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::error::{PopoverError, Result};
use crate::utils::log_trace::{log_debug, log_info};

/// ホバーから表示までの待ち時間
pub const HOVER_DELAY_MS: u32 = 200;

/// ワンショットタイマーの登録・解除
///
/// 解除済み・発火済みのハンドルに対する `clear_timeout` は何もしないこと。
pub trait TimerDriver {
    type Handle: Copy + 'static;

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<Self::Handle>;

    fn clear_timeout(&self, handle: Self::Handle);
}

/// ブラウザの setTimeout / clearTimeout
#[derive(Clone, Copy, Default)]
pub struct BrowserTimer;

impl TimerDriver for BrowserTimer {
    type Handle = i32;

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Result<i32> {
        let window = web_sys::window().ok_or(PopoverError::NoWindow)?;
        let closure = Closure::once_into_js(callback);
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            )
            .map_err(|e| PopoverError::Timer(format!("{:?}", e)))
    }

    fn clear_timeout(&self, handle: i32) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(handle);
        }
    }
}

/// 外から見た表示状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverPhase {
    #[default]
    Hidden,
    PendingReveal,
    Visible,
}

impl HoverPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoverPhase::Hidden => "hidden",
            HoverPhase::PendingReveal => "pending",
            HoverPhase::Visible => "visible",
        }
    }

    pub fn is_visible(&self) -> bool {
        *self == HoverPhase::Visible
    }
}

#[derive(Clone, Copy)]
struct PendingReveal<H> {
    token: u64,
    handle: H,
}

struct HoverState<H> {
    visible: bool,
    pending: Option<PendingReveal<H>>,
    next_token: u64,
    torn_down: bool,
    notified: HoverPhase,
}

impl<H> HoverState<H> {
    fn phase(&self) -> HoverPhase {
        if self.visible {
            HoverPhase::Visible
        } else if self.pending.is_some() {
            HoverPhase::PendingReveal
        } else {
            HoverPhase::Hidden
        }
    }

    /// 前回通知から状態が変わっていれば新しい状態を返す
    fn take_change(&mut self) -> Option<HoverPhase> {
        let phase = self.phase();
        if phase == self.notified {
            return None;
        }
        self.notified = phase;
        Some(phase)
    }
}

type ChangeListener = Rc<dyn Fn(HoverPhase)>;

/// ポップオーバー1個分の表示状態と保留タイマー
pub struct HoverController<T: TimerDriver> {
    driver: T,
    delay_ms: u32,
    state: Rc<RefCell<HoverState<T::Handle>>>,
    on_change: Option<ChangeListener>,
}

impl<T: TimerDriver> HoverController<T> {
    pub fn new(driver: T, delay_ms: u32) -> Self {
        HoverController {
            driver,
            delay_ms,
            state: Rc::new(RefCell::new(HoverState {
                visible: false,
                pending: None,
                next_token: 0,
                torn_down: false,
                notified: HoverPhase::Hidden,
            })),
            on_change: None,
        }
    }

    /// 表示状態が変わった時の通知先（シグナル更新など）
    ///
    /// teardown では通知しない。
    pub fn on_change(mut self, f: impl Fn(HoverPhase) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    pub fn phase(&self) -> HoverPhase {
        self.state.borrow().phase()
    }

    /// mouseenter: 既存タイマーをキャンセルしてから表示タイマーを登録
    pub fn on_pointer_enter(&self) -> Result<()> {
        let token = {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                return Ok(());
            }
            state.next_token += 1;
            state.next_token
        };
        self.cancel_pending();

        let weak = Rc::downgrade(&self.state);
        let on_change = self.on_change.clone();
        let scheduled = self.driver.set_timeout(
            self.delay_ms,
            Box::new(move || reveal(weak, token, on_change)),
        );

        if let Ok(handle) = &scheduled {
            self.state.borrow_mut().pending = Some(PendingReveal { token, handle: *handle });
        }
        self.emit_change();
        scheduled.map(|_| ())
    }

    /// mouseleave: タイマーキャンセル＆非表示（何度呼んでもよい）
    pub fn on_pointer_leave(&self) {
        self.cancel_pending();
        self.state.borrow_mut().visible = false;
        self.emit_change();
    }

    /// 破棄時: 保留中タイマーをキャンセル。表示状態は触らない
    pub fn teardown(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
        }
        if self.cancel_pending() {
            log_info("hover", "破棄時に保留中の表示タイマーをキャンセル");
        }
    }

    fn cancel_pending(&self) -> bool {
        let pending = self.state.borrow_mut().pending.take();
        match pending {
            Some(p) => {
                self.driver.clear_timeout(p.handle);
                true
            }
            None => false,
        }
    }

    fn emit_change(&self) {
        let change = self.state.borrow_mut().take_change();
        if let (Some(phase), Some(f)) = (change, &self.on_change) {
            f(phase);
        }
    }
}

#[cfg(test)]
impl<T: TimerDriver> HoverController<T> {
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn has_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }
}

impl<T: TimerDriver> Drop for HoverController<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// タイマー発火時の処理。世代が一致する場合のみ表示する
fn reveal<H>(state: Weak<RefCell<HoverState<H>>>, token: u64, on_change: Option<ChangeListener>) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let change = {
        let mut state = state.borrow_mut();
        let current = state.pending.as_ref().map(|p| p.token);
        if state.torn_down || current != Some(token) {
            return;
        }
        state.pending = None;
        state.visible = true;
        state.take_change()
    };
    if let Some(phase) = change {
        log_debug("hover", "ポップオーバー表示");
        if let Some(f) = on_change {
            f(phase);
        }
    }
}
