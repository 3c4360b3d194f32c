use crate::components::icons::Search;
use crate::web::router::Link;
use cropvision_shared::diseases::{Disease, SeverityLevel, categories, find_disease, search};
use leptos::prelude::*;

fn severity_badge(level: SeverityLevel) -> &'static str {
    match level {
        SeverityLevel::High => "badge badge-error",
        SeverityLevel::Medium => "badge badge-warning",
        SeverityLevel::Low => "badge badge-info",
    }
}

/// 病害知识库：分类筛选 + 关键字搜索
#[component]
pub fn DiseasesPage() -> impl IntoView {
    let (category, set_category) = signal(Option::<&'static str>::None);
    let (keyword, set_keyword) = signal(String::new());

    let filtered = move || keyword.with(|k| search(category.get(), k));

    let category_tabs = std::iter::once(None)
        .chain(categories().into_iter().map(Some))
        .map(|c| {
            view! {
                <a
                    role="tab"
                    class=move || if category.get() == c { "tab tab-active" } else { "tab" }
                    on:click=move |_| set_category.set(c)
                >
                    {c.unwrap_or("全部")}
                </a>
            }
        })
        .collect_view();

    view! {
        <div class="flex flex-wrap items-center justify-between gap-4">
            <div role="tablist" class="tabs tabs-boxed">{category_tabs}</div>
            <label class="input input-bordered flex items-center gap-2">
                <Search attr:class="h-4 w-4 opacity-50" />
                <input
                    type="text"
                    class="grow"
                    placeholder="搜索病害名称或症状"
                    prop:value=keyword
                    on:input=move |ev| set_keyword.set(event_target_value(&ev))
                />
            </label>
        </div>

        <Show
            when=move || !filtered().is_empty()
            fallback=|| view! { <p class="text-center py-8 text-base-content/50">"没有匹配的病害"</p> }
        >
            <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                <For
                    each=filtered
                    key=|d| d.id
                    children=|disease: &'static Disease| {
                        view! {
                            <Link to=format!("/diseases/{}", disease.id) class="card bg-base-100 shadow-xl hover:shadow-2xl transition-shadow">
                                <div class="card-body">
                                    <div class="flex items-center justify-between">
                                        <h3 class="card-title">
                                            <span class="text-2xl">{disease.icon}</span>
                                            {disease.name}
                                        </h3>
                                        <span class=severity_badge(disease.severity_level)>{disease.severity}</span>
                                    </div>
                                    <div class="badge badge-outline">{disease.category}</div>
                                    <p class="text-sm text-base-content/70 line-clamp-3">{disease.description}</p>
                                </div>
                            </Link>
                        }
                    }
                />
            </div>
        </Show>
    }
}

fn section(title: &'static str, items: &'static [&'static str]) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">{title}</h3>
                <ul class="list-disc pl-5 space-y-1">
                    {items.iter().map(|item| view! { <li>{*item}</li> }).collect_view()}
                </ul>
            </div>
        </div>
    }
}

/// 病害详情
#[component]
pub fn DiseaseDetailPage(id: String) -> impl IntoView {
    let Some(disease) = find_disease(&id) else {
        return view! {
            <div class="text-center py-16 space-y-4">
                <p class="text-xl">"未找到该病害"</p>
                <Link to="/diseases" class="btn btn-primary">"返回知识库"</Link>
            </div>
        }
        .into_any();
    };

    view! {
        <div class="text-sm breadcrumbs">
            <ul>
                <li><Link to="/diseases">"病害知识库"</Link></li>
                <li>{disease.name}</li>
            </ul>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex flex-wrap items-center gap-4">
                    <span class="text-5xl">{disease.icon}</span>
                    <div>
                        <h1 class="text-3xl font-bold">{disease.name}</h1>
                        <div class="flex gap-2 mt-2">
                            <span class="badge badge-outline">{disease.category}</span>
                            <span class=severity_badge(disease.severity_level)>{disease.severity}</span>
                        </div>
                    </div>
                </div>
                <p class="mt-4 text-base-content/80">{disease.description}</p>
                <div class="flex flex-wrap gap-4 mt-4">
                    {disease.images.iter().map(|src| view! {
                        <img class="rounded-box h-40 object-cover" src=*src alt=disease.name />
                    }).collect_view()}
                </div>
            </div>
        </div>

        <div class="grid gap-6 md:grid-cols-2">
            {section("典型症状", disease.symptoms)}
            {section("发病原因", disease.causes)}
            {section("预防措施", disease.prevention)}
            {section("治疗方法", disease.treatment)}
        </div>
    }
    .into_any()
}
