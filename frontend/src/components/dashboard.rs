use crate::api::describe_error;
use crate::auth::use_auth;
use crate::components::icons::RefreshCw;
use crate::components::layout::ErrorAlert;
use crate::format::{health_badge, percent, timestamp};
use crate::web::router::Link;
use cropvision_shared::diseases::chinese_name;
use cropvision_shared::{PredictionRecord, StatsOverview};
use leptos::prelude::*;
use leptos::task::spawn_local;

const RECENT_LIMIT: u32 = 5;

/// 首页概览：统计卡片 + 最近识别记录
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();

    let (overview, set_overview) = signal(StatsOverview::default());
    let (recent, set_recent) = signal(Vec::<PredictionRecord>::new());
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load = move || {
        let api = auth.api();
        set_loading.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            match api.stats().overview().await {
                Ok(data) => set_overview.set(data),
                Err(e) => set_error_msg.set(Some(describe_error("加载统计", &e))),
            }
            match api.history().list(Some(0), Some(RECENT_LIMIT)).await {
                Ok(data) => set_recent.set(data),
                Err(e) => set_error_msg.set(Some(describe_error("加载最近记录", &e))),
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    load();

    view! {
        <ErrorAlert message=error_msg />

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"识别总数"</div>
                <div class="stat-value text-primary">{move || overview.get().total}</div>
                <div class="stat-desc">"今日 " {move || overview.get().today_count}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"健康"</div>
                <div class="stat-value text-success">{move || overview.get().healthy_count}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"病害"</div>
                <div class="stat-value text-error">{move || overview.get().diseased_count}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"健康率"</div>
                <div class="stat-value text-secondary">{move || percent(overview.get().healthy_rate)}</div>
            </div>
        </div>

        <div class="grid gap-4 md:grid-cols-2">
            <Link to="/predict" class="card bg-primary text-primary-content shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"开始识别"</h3>
                    <p>"上传叶片图片，识别作物病害"</p>
                </div>
            </Link>
            <Link to="/diseases" class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"病害知识库"</h3>
                    <p class="text-base-content/70">"常见病害症状、成因与防治"</p>
                </div>
            </Link>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <h3 class="card-title">"最近识别"</h3>
                    <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                        <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                </div>
                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"结果"</th>
                                <th>"置信度"</th>
                                <th class="hidden md:table-cell">"时间"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || recent.with(|r| r.is_empty()) && !loading.get()>
                                <tr>
                                    <td colspan="3" class="text-center py-8 text-base-content/50">
                                        "暂无识别记录"
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || recent.get()
                                key=|r| r.id
                                children=move |record| {
                                    view! {
                                        <tr>
                                            <td>
                                                <span class=health_badge(&record.predicted_class)>
                                                    {chinese_name(&record.predicted_class)}
                                                </span>
                                            </td>
                                            <td>{percent(record.confidence)}</td>
                                            <td class="hidden md:table-cell font-mono text-xs opacity-70">
                                                {timestamp(&record.created_at)}
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}
