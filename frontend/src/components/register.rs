use crate::api::{api_client, describe_error};
use crate::auth::{login, use_auth};
use crate::components::icons::Leaf;
use crate::web::router::{Link, use_router};
use cropvision_shared::RegisterRequest;
use cropvision_shared::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 注册页面：注册成功后以同一凭据自动登录
#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if password.get() != confirm.get() {
            set_error_msg.set(Some("两次输入的密码不一致".to_string()));
            return;
        }

        let email_value = email.get().trim().to_string();
        let req = RegisterRequest {
            username: username.get().trim().to_string(),
            email: (!email_value.is_empty()).then_some(email_value),
            password: password.get(),
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let (name, secret) = (req.username.clone(), req.password.clone());
            match api_client(None).auth().register(req).await {
                Ok(_) => {
                    if login(auth, name, secret).await {
                        router.navigate_to(&AppRoute::auth_success_redirect());
                    } else {
                        router.navigate_to(&AppRoute::Login);
                    }
                }
                Err(e) => set_error_msg.set(Some(describe_error("注册", &e))),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="flex flex-col items-center gap-2 mb-4">
                    <div class="p-3 bg-success/10 rounded-2xl text-success">
                        <Leaf attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold">"创建账号"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="reg_username">
                                <span class="label-text">"用户名"</span>
                            </label>
                            <input id="reg_username" type="text" required class="input input-bordered"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg_email">
                                <span class="label-text">"邮箱（可选）"</span>
                            </label>
                            <input id="reg_email" type="email" class="input input-bordered"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg_password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input id="reg_password" type="password" required class="input input-bordered"
                                autocomplete="new-password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="reg_confirm">
                                <span class="label-text">"确认密码"</span>
                            </label>
                            <input id="reg_confirm" type="password" required class="input input-bordered"
                                autocomplete="new-password"
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                prop:value=confirm
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "提交中..." }.into_any()
                                } else {
                                    "注册".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center text-base-content/70">
                            "已有账号？"
                            <Link to="/login" class="link link-primary">"返回登录"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
