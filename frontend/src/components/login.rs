use crate::auth::{login, use_auth};
use crate::components::icons::Leaf;
use crate::web::router::{Link, use_router};
use cropvision_shared::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("请填写用户名和密码".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let success = login(auth, username.get_untracked(), password.get_untracked()).await;
            if success {
                router.navigate_to(&AppRoute::auth_success_redirect());
            } else {
                set_error_msg.set(Some("登录失败，请检查用户名和密码".to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-success/10 rounded-2xl text-success">
                            <Leaf attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"CropVision AI"</h1>
                        <p class="text-base-content/70">"植物病害智能识别系统"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"用户名"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "登录中..." }.into_any()
                                } else {
                                    "登录".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center text-base-content/70">
                            "还没有账号？"
                            <Link to="/register" class="link link-primary">"立即注册"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
