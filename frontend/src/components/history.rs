use crate::api::describe_error;
use crate::auth::use_auth;
use crate::components::icons::{RefreshCw, Trash2};
use crate::components::layout::ErrorAlert;
use crate::format::{health_badge, percent, timestamp};
use cropvision_shared::PredictionRecord;
use cropvision_shared::diseases::chinese_name;
use leptos::prelude::*;
use leptos::task::spawn_local;

const PAGE_SIZE: u32 = 10;

/// 历史记录页面：分页列表、详情、单条删除与批量删除
#[component]
pub fn HistoryPage() -> impl IntoView {
    let auth = use_auth();

    let (records, set_records) = signal(Vec::<PredictionRecord>::new());
    let (page, set_page) = signal(0u32);
    let (selected, set_selected) = signal(Vec::<i64>::new());
    let (detail, set_detail) = signal(Option::<PredictionRecord>::None);
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<String>::None);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let load = move || {
        let api = auth.api();
        let skip = page.get_untracked() * PAGE_SIZE;
        set_loading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            match api.history().list(Some(skip), Some(PAGE_SIZE)).await {
                Ok(data) => {
                    set_records.set(data);
                    set_selected.set(Vec::new());
                }
                Err(e) => set_error_msg.set(Some(describe_error("加载历史记录", &e))),
            }
            set_loading.set(false);
        });
    };

    // 页码变化时重新加载
    Effect::new(move |_| {
        page.track();
        load();
    });

    let show_detail = move |id: i64| {
        let api = auth.api();
        spawn_local(async move {
            match api.history().detail(id).await {
                Ok(record) => set_detail.set(Some(record)),
                Err(e) => set_error_msg.set(Some(describe_error("加载详情", &e))),
            }
        });
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if detail.get().is_some() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let handle_delete = move |id: i64| {
        let api = auth.api();
        spawn_local(async move {
            match api.history().delete(id).await {
                Ok(resp) => {
                    set_notification.set(Some(resp.message));
                    set_records.update(|list| list.retain(|r| r.id != id));
                    set_selected.update(|ids| ids.retain(|i| *i != id));
                }
                Err(e) => set_error_msg.set(Some(describe_error("删除记录", &e))),
            }
        });
    };

    let handle_batch_delete = move |_| {
        let ids = selected.get();
        if ids.is_empty() {
            return;
        }
        let api = auth.api();
        spawn_local(async move {
            match api.history().batch_delete(ids).await {
                Ok(resp) => {
                    set_notification.set(Some(format!("已删除 {} 条记录", resp.deleted_count)));
                    load();
                }
                Err(e) => set_error_msg.set(Some(describe_error("批量删除", &e))),
            }
        });
    };

    let toggle = move |id: i64, checked: bool| {
        set_selected.update(|ids| {
            ids.retain(|i| *i != id);
            if checked {
                ids.push(id);
            }
        });
    };

    let all_selected = move || {
        let count = records.with(|r| r.len());
        count > 0 && selected.with(|s| s.len()) == count
    };

    let toggle_all = move |checked: bool| {
        if checked {
            set_selected.set(records.with(|r| r.iter().map(|rec| rec.id).collect()));
        } else {
            set_selected.set(Vec::new());
        }
    };

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let has_next = move || records.with(|r| r.len() as u32 == PAGE_SIZE);

    view! {
        <Show when=move || notification.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class="alert alert-success shadow-lg">
                    <span>{move || notification.get().unwrap_or_default()}</span>
                </div>
            </div>
        </Show>

        <ErrorAlert message=error_msg />

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">"识别历史"</h3>
                        <p class="text-base-content/70 text-sm">"按时间倒序排列"</p>
                    </div>
                    <div class="flex gap-2">
                        <button
                            class="btn btn-error btn-outline btn-sm gap-2"
                            disabled=move || selected.with(|s| s.is_empty())
                            on:click=handle_batch_delete
                        >
                            <Trash2 attr:class="h-4 w-4" />
                            {move || format!("删除所选 ({})", selected.with(|s| s.len()))}
                        </button>
                        <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                            <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                    </div>
                </div>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>
                                    <input
                                        type="checkbox"
                                        class="checkbox checkbox-sm"
                                        prop:checked=all_selected
                                        on:change=move |ev| toggle_all(event_target_checked(&ev))
                                    />
                                </th>
                                <th>"结果"</th>
                                <th>"置信度"</th>
                                <th class="hidden md:table-cell">"时间"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || records.with(|r| r.is_empty()) && !loading.get()>
                                <tr>
                                    <td colspan="5" class="text-center py-8 text-base-content/50">
                                        "暂无记录"
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || records.get()
                                key=|r| r.id
                                children=move |record| {
                                    let id = record.id;
                                    view! {
                                        <tr>
                                            <td>
                                                <input
                                                    type="checkbox"
                                                    class="checkbox checkbox-sm"
                                                    prop:checked=move || selected.with(|s| s.contains(&id))
                                                    on:change=move |ev| toggle(id, event_target_checked(&ev))
                                                />
                                            </td>
                                            <td>
                                                <a class="link link-hover" on:click=move |_| show_detail(id)>
                                                    <span class=health_badge(&record.predicted_class)>
                                                        {chinese_name(&record.predicted_class)}
                                                    </span>
                                                </a>
                                            </td>
                                            <td>{percent(record.confidence)}</td>
                                            <td class="hidden md:table-cell font-mono text-xs opacity-70">
                                                {timestamp(&record.created_at)}
                                            </td>
                                            <td>
                                                <button class="btn btn-ghost btn-sm btn-square text-error" on:click=move |_| handle_delete(id)>
                                                    <Trash2 attr:class="h-4 w-4" />
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>

                <div class="flex justify-center p-4">
                    <div class="join">
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || page.get() == 0 || loading.get()
                            on:click=move |_| set_page.update(|p| *p = p.saturating_sub(1))
                        >
                            "«"
                        </button>
                        <button class="join-item btn btn-sm">{move || format!("第 {} 页", page.get() + 1)}</button>
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || !has_next() || loading.get()
                            on:click=move |_| set_page.update(|p| *p += 1)
                        >
                            "»"
                        </button>
                    </div>
                </div>
            </div>
        </div>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_detail.set(None)>
            <div class="modal-box">
                {move || detail.get().map(|record| view! {
                    <h3 class="font-bold text-lg">{chinese_name(&record.predicted_class)}</h3>
                    <img class="rounded-box my-4 max-h-72 mx-auto object-contain" src=record.image_url() alt=record.predicted_class.clone() />
                    <dl class="grid grid-cols-3 gap-2 text-sm">
                        <dt class="opacity-70">"原始标签"</dt>
                        <dd class="col-span-2 font-mono">{record.predicted_class.clone()}</dd>
                        <dt class="opacity-70">"置信度"</dt>
                        <dd class="col-span-2">{percent(record.confidence)}</dd>
                        <dt class="opacity-70">"识别时间"</dt>
                        <dd class="col-span-2">{timestamp(&record.created_at)}</dd>
                    </dl>
                })}
                <div class="modal-action">
                    <button class="btn" on:click=move |_| set_detail.set(None)>"关闭"</button>
                </div>
            </div>
        </dialog>
    }
}
