use leptos::*;

mod components;
mod error;
mod models;
mod utils;

use components::ProductPillPopover;
use models::PopoverViewModel;
use utils::fixture::{clear_fixture_url, fetch_products, fixture_url, save_fixture_url};
use utils::log_trace::{clear_logs, download_logs, log_error, log_info_with_data, log_warn};

// ============================================
// 商品一覧（ピル表示）
// ============================================

#[component]
fn ProductShelf() -> impl IntoView {
    let (products, set_products) = create_signal(Vec::<PopoverViewModel>::new());
    let (loading, set_loading) = create_signal(false);
    let (error_msg, set_error_msg) = create_signal(None::<String>);
    let (url_input, set_url_input) = create_signal(fixture_url());

    let load = move || {
        let url = fixture_url();
        spawn_local(async move {
            set_loading.set(true);
            match fetch_products(&url).await {
                Ok(list) => {
                    if list.is_empty() {
                        log_warn("fixture", "商品データが空です");
                    }
                    log_info_with_data(
                        "fixture",
                        "商品データ読込",
                        serde_json::json!({ "url": url, "count": list.len() }),
                    );
                    set_products.set(list.into_iter().map(PopoverViewModel::from).collect());
                    set_error_msg.set(None);
                }
                Err(e) => {
                    log_error("fixture", &e.to_string());
                    set_error_msg.set(Some(e.to_string()));
                }
            }
            set_loading.set(false);
        });
    };

    // 初回読込
    load();

    let on_apply_url = move |_| {
        let url = url_input.get();
        if url.trim().is_empty() {
            clear_fixture_url();
        } else {
            save_fixture_url(url.trim());
        }
        load();
    };

    let on_reset_url = move |_| {
        clear_fixture_url();
        set_url_input.set(fixture_url());
        load();
    };

    view! {
        <div class="product-shelf">
            <div class="fixture-section">
                <input type="text" class="fixture-url"
                    prop:value=move || url_input.get()
                    on:input=move |ev| set_url_input.set(event_target_value(&ev)) />
                <button on:click=on_apply_url disabled=move || loading.get()>
                    {move || if loading.get() { "読込中..." } else { "読み込む" }}
                </button>
                <button on:click=on_reset_url>"既定に戻す"</button>
            </div>

            {move || error_msg.get().map(|e| view! {
                <p class="status error">{e}</p>
            })}

            <div class="pill-list">
                {move || products.get().into_iter().map(|p| view! {
                    <ProductPillPopover
                        product_name=p.product_name
                        quantity=p.quantity
                        unit_price=p.unit_price
                        total_price=p.total_price
                        description=p.description
                        popover_position=p.popover_position
                    />
                }).collect_view()}
            </div>
        </div>
    }
}

// ============================================
// メインアプリ
// ============================================

#[component]
fn App() -> impl IntoView {
    view! {
        <div class="app">
            <header class="app-header">
                <h1>"商品ピル"</h1>
            </header>

            <main class="container">
                <ProductShelf />
            </main>

            <footer class="app-footer">
                <button on:click=move |_| download_logs()>"ログ保存"</button>
                <button on:click=move |_| clear_logs()>"ログ消去"</button>
            </footer>
        </div>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
