//! 商品ピル＋ポップオーバーコンポーネント
//!
//! ピルにホバーすると少し遅れて商品詳細のポップオーバーを表示する

use std::rc::Rc;

use leptos::*;

use crate::models::{format_price, format_quantity, PopoverPosition, PopoverViewModel};
use crate::utils::hover::{BrowserTimer, HoverController, HoverPhase, TimerDriver, HOVER_DELAY_MS};
use crate::utils::log_trace::log_error;

/// 商品ピル（200msホバーで詳細表示）
#[component]
pub fn ProductPillPopover(
    #[prop(optional_no_strip)] product_name: Option<String>,
    #[prop(optional)] quantity: f64,
    #[prop(optional)] unit_price: f64,
    #[prop(optional)] total_price: f64,
    #[prop(optional, into)] description: String,
    #[prop(optional)] popover_position: PopoverPosition,
    #[prop(default = HOVER_DELAY_MS)] reveal_delay_ms: u32,
) -> impl IntoView {
    let model = PopoverViewModel {
        product_name,
        quantity,
        unit_price,
        total_price,
        description,
        popover_position,
    };

    let (phase, set_phase) = create_signal(HoverPhase::Hidden);
    let controller = bind_controller(BrowserTimer, reveal_delay_ms, set_phase);

    // mouseenter: 遅延表示タイマー登録
    let on_mouse_enter = {
        let controller = controller.clone();
        move |_: web_sys::MouseEvent| {
            if let Err(e) = controller.on_pointer_enter() {
                log_error("hover", &format!("{} (phase: {})", e, controller.phase().as_str()));
            }
        }
    };

    // mouseleave: タイマーキャンセル＆非表示
    let on_mouse_leave = {
        let controller = controller.clone();
        move |_: web_sys::MouseEvent| controller.on_pointer_leave()
    };

    // アンマウント時に保留中タイマーを破棄
    on_cleanup(move || controller.teardown());

    let display_name = model.display_name();
    let container_class = model.container_class();
    let pill_label = display_name.clone();
    let position = model.popover_position.as_str();

    view! {
        <div class="product-pill-popover" data-position=position data-phase=move || phase.get().as_str()>
            <span
                class="product-pill"
                on:mouseenter=on_mouse_enter
                on:mouseleave=on_mouse_leave
            >
                {pill_label}
            </span>

            {move || phase.get().is_visible().then(|| view! {
                <div class=container_class.clone()>
                    <div class="popover-header">{display_name.clone()}</div>
                    <dl class="popover-body">
                        <dt>"数量"</dt>
                        <dd class="quantity">{format_quantity(model.quantity)}</dd>
                        <dt>"単価"</dt>
                        <dd class="unit-price">{format_price(model.unit_price)}</dd>
                        <dt>"合計"</dt>
                        <dd class="total-price">{format_price(model.total_price)}</dd>
                    </dl>
                    {(!model.description.is_empty()).then(|| view! {
                        <div class="popover-description">{model.description.clone()}</div>
                    })}
                </div>
            })}
        </div>
    }
}

/// 表示状態シグナルと連動するコントローラーを作る
fn bind_controller<T: TimerDriver + 'static>(
    driver: T,
    delay_ms: u32,
    set_phase: WriteSignal<HoverPhase>,
) -> Rc<HoverController<T>> {
    Rc::new(HoverController::new(driver, delay_ms).on_change(move |p| set_phase.set(p)))
}
