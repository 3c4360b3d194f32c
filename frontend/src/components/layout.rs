use crate::auth::{logout, use_auth};
use crate::components::icons::{Leaf, LogOut};
use crate::web::router::{Link, use_router};
use cropvision_shared::route::AppRoute;
use leptos::prelude::*;

/// 已登录页面的通用框架：导航栏 + 内容区
#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let username = auth.username();

    let on_logout = move |_| {
        let redirect = logout(&auth);
        router.navigate_to(&redirect);
    };

    let nav_links = AppRoute::navigation()
        .into_iter()
        .map(|route| {
            let active = {
                let route = route.clone();
                move || {
                    let current = router.current_route().get();
                    current == route
                        || (route == AppRoute::Diseases
                            && matches!(current, AppRoute::DiseaseDetail(_)))
                }
            };
            let path = route.to_path();
            let href = path.clone();
            view! {
                <li>
                    <a
                        href=href
                        class=move || if active() { "active" } else { "" }
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.prevent_default();
                            router.navigate(&path);
                        }
                    >
                        {route.title()}
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <Link to="/" class="btn btn-ghost text-xl gap-2">
                        <Leaf attr:class="h-6 w-6 text-success" />
                        "CropVision AI"
                    </Link>
                    <ul class="menu menu-horizontal px-1 hidden lg:flex">{nav_links}</ul>
                </div>
                <div class="flex-none gap-2">
                    <span class="badge badge-neutral hidden md:inline-flex">
                        {move || username.get().unwrap_or_default()}
                    </span>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "退出登录"
                    </button>
                </div>
            </div>
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">{children()}</main>
        </div>
    }
}

/// 页面内的错误提示条
#[component]
pub fn ErrorAlert(message: ReadSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}
