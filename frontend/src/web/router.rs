//! 路由服务模块
//!
//! 所有对 window.history 的读写集中在此模块；
//! 是否放行由核心库的 `guard` 决定，本模块只负责执行导航结果。

use cropvision::router::{Navigation, guard};
use cropvision_shared::route::AppRoute;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 地址栏当前路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History：`push` 为 false 时替换当前条目（用于重定向）
fn write_history(path: &str, push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if let Err(e) = result {
        web_sys::console::warn_1(&format!("[Router] History 写入失败: {:?}", e).into());
    }
}

/// 更新文档标题
fn set_document_title(route: &AppRoute) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(&format!("{} - CropVision AI", route.title()));
    }
}

/// History 写入方式
#[derive(Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    /// 浏览器已完成跳转（popstate），仅在重定向时改写
    Keep,
}

/// 路由器服务
///
/// 当前路由保存在信号中驱动 `RouterOutlet` 重新渲染；
/// 认证状态以信号形式注入，守卫在每次导航时读取其最新值。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    /// 初始路由同样经过守卫，被拒绝时以 replaceState 改写地址栏。
    fn new(is_authenticated: Signal<bool>) -> Self {
        let (current_route, set_route) = signal(AppRoute::NotFound);
        let router = Self {
            current_route,
            set_route,
            is_authenticated,
        };
        router.apply(&current_path(), HistoryMode::Keep);
        router
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到路径：经过守卫后写入 History 并切换视图
    pub fn navigate(&self, path: &str) {
        self.apply(path, HistoryMode::Push);
    }

    pub fn navigate_to(&self, route: &AppRoute) {
        self.navigate(&route.to_path());
    }

    fn apply(&self, path: &str, mode: HistoryMode) {
        let is_authenticated = self.is_authenticated;
        let session = move || is_authenticated.get_untracked();

        let route = match guard(&AppRoute::from_path(path), &session) {
            Navigation::Proceed(route) => {
                if mode == HistoryMode::Push {
                    write_history(path, true);
                }
                route
            }
            Navigation::Redirect(redirect) => {
                write_history(&redirect.to_path(), mode == HistoryMode::Push);
                redirect
            }
        };

        set_document_title(&route);
        self.set_route.set(route);
    }

    /// 浏览器后退/前进同样经过守卫
    fn listen_popstate(&self) {
        let router = *self;
        let on_popstate = Closure::<dyn Fn()>::new(move || {
            router.apply(&current_path(), HistoryMode::Keep);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref());
        }

        // 监听器随页面存活
        on_popstate.forget();
    }
}

fn provide_router(is_authenticated: Signal<bool>) {
    let router = RouterService::new(is_authenticated);
    router.listen_popstate();
    provide_context(router);
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，在 App 根部提供 `RouterService`
#[component]
pub fn Router(is_authenticated: Signal<bool>, children: Children) -> impl IntoView {
    provide_router(is_authenticated);
    children()
}

/// 路由出口：当前路由变化时以 `matcher` 重新渲染
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();
    move || matcher(router.current_route().get())
}

/// 站内链接：拦截点击，经由路由服务导航
#[component]
pub fn Link(
    #[prop(into)] to: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
