use crate::api::describe_error;
use crate::auth::use_auth;
use crate::components::layout::ErrorAlert;
use crate::format::percent;
use chrono::NaiveDate;
use cropvision_shared::diseases::chinese_name;
use cropvision_shared::protocol::StatsTrendRequest;
use cropvision_shared::{Granularity, StatsOverview, TrendPoint};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// 条形宽度（相对最大值的百分比）
fn bar_width(value: u64, max: u64) -> String {
    if max == 0 {
        return "width: 0%".to_string();
    }
    format!("width: {:.1}%", value as f64 / max as f64 * 100.0)
}

/// 统计分析页面：作物 / 类别分布与时间趋势
#[component]
pub fn AnalyticsPage() -> impl IntoView {
    let auth = use_auth();

    let (overview, set_overview) = signal(StatsOverview::default());
    let (trend, set_trend) = signal(Vec::<TrendPoint>::new());
    let (granularity, set_granularity) = signal(Granularity::Day);
    let (start_date, set_start_date) = signal(String::new());
    let (end_date, set_end_date) = signal(String::new());
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    {
        let api = auth.api();
        spawn_local(async move {
            match api.stats().overview().await {
                Ok(data) => set_overview.set(data),
                Err(e) => set_error_msg.set(Some(describe_error("加载统计", &e))),
            }
        });
    }

    let load_trend = move || {
        let query = StatsTrendRequest {
            start_date: parse_date(&start_date.get_untracked()),
            end_date: parse_date(&end_date.get_untracked()),
            granularity: Some(granularity.get_untracked()),
        };
        let api = auth.api();
        set_loading.set(true);
        spawn_local(async move {
            match api.stats().trend(query).await {
                Ok(resp) => set_trend.set(resp.data),
                Err(e) => set_error_msg.set(Some(describe_error("加载趋势", &e))),
            }
            set_loading.set(false);
        });
    };

    // 粒度变化时重新查询
    Effect::new(move |_| {
        granularity.track();
        load_trend();
    });

    let trend_max = move || trend.with(|t| t.iter().map(|p| p.total).max().unwrap_or(0));
    let crop_max = move || overview.with(|o| o.by_crop.iter().map(|c| c.count).max().unwrap_or(0));

    view! {
        <ErrorAlert message=error_msg />

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex flex-wrap items-end justify-between gap-4">
                    <h3 class="card-title">"识别趋势"</h3>
                    <div class="flex flex-wrap items-end gap-2">
                        <input type="date" class="input input-bordered input-sm"
                            prop:value=start_date
                            on:change=move |ev| set_start_date.set(event_target_value(&ev))
                        />
                        <span class="opacity-50">"~"</span>
                        <input type="date" class="input input-bordered input-sm"
                            prop:value=end_date
                            on:change=move |ev| set_end_date.set(event_target_value(&ev))
                        />
                        <select class="select select-bordered select-sm"
                            on:change=move |ev| {
                                if let Some(g) = Granularity::parse(&event_target_value(&ev)) {
                                    set_granularity.set(g);
                                }
                            }
                        >
                            <option value="day" selected=move || granularity.get() == Granularity::Day>"按天"</option>
                            <option value="week" selected=move || granularity.get() == Granularity::Week>"按周"</option>
                            <option value="month" selected=move || granularity.get() == Granularity::Month>"按月"</option>
                        </select>
                        <button class="btn btn-primary btn-sm" disabled=move || loading.get() on:click=move |_| load_trend()>
                            "查询"
                        </button>
                    </div>
                </div>

                <Show
                    when=move || trend.with(|t| !t.is_empty())
                    fallback=|| view! { <p class="text-center py-8 text-base-content/50">"所选区间内没有数据"</p> }
                >
                    <div class="space-y-1">
                        <For
                            each=move || trend.get()
                            key=|p| p.date
                            children=move |point| {
                                let max = trend_max();
                                view! {
                                    <div class="flex items-center gap-2 text-sm">
                                        <span class="w-24 font-mono text-xs opacity-70">{point.date.format("%Y-%m-%d").to_string()}</span>
                                        <div class="flex-1 bg-base-200 rounded h-4 flex overflow-hidden">
                                            <div class="bg-success h-4" style=bar_width(point.healthy, max)></div>
                                            <div class="bg-error h-4" style=bar_width(point.diseased, max)></div>
                                        </div>
                                        <span class="w-10 text-right">{point.total}</span>
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
            </div>
        </div>

        <div class="grid gap-8 md:grid-cols-2">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"作物分布"</h3>
                    <For
                        each=move || overview.get().by_crop
                        key=|c| c.crop.clone()
                        children=move |crop| {
                            let max = crop_max();
                            view! {
                                <div class="text-sm">
                                    <div class="flex justify-between">
                                        <span>{crop.crop.clone()}</span>
                                        <span class="opacity-70">
                                            {format!("{} （健康 {} / 病害 {}）", crop.count, crop.healthy, crop.diseased)}
                                        </span>
                                    </div>
                                    <div class="bg-base-200 rounded h-2">
                                        <div class="bg-primary rounded h-2" style=bar_width(crop.count, max)></div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <h3 class="card-title p-6 pb-2">"类别统计"</h3>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"类别"</th>
                                    <th>"数量"</th>
                                    <th>"占比"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || overview.get().by_class
                                    key=|c| c.class_name.clone()
                                    children=move |class| {
                                        let total = overview.with_untracked(|o| o.total);
                                        let ratio = if total == 0 { 0.0 } else { class.count as f64 / total as f64 };
                                        view! {
                                            <tr>
                                                <td>{chinese_name(&class.class_name)}</td>
                                                <td>{class.count}</td>
                                                <td>{percent(ratio)}</td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}
