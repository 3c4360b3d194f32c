//! CropVision 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::router`: 路由服务（核心引擎，守卫逻辑来自核心库）
//! - `auth` / `settings`: 包装核心库存储的响应式上下文
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod analytics;
    pub mod dashboard;
    pub mod diseases;
    pub mod history;
    mod icons;
    pub mod layout;
    pub mod login;
    pub mod predict;
    pub mod register;
    pub mod settings;
}
mod format;
mod settings;

use crate::auth::AuthContext;
use crate::components::analytics::AnalyticsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::diseases::{DiseaseDetailPage, DiseasesPage};
use crate::components::history::HistoryPage;
use crate::components::layout::AppLayout;
use crate::components::login::LoginPage;
use crate::components::predict::PredictPage;
use crate::components::register::RegisterPage;
use crate::components::settings::SettingsPage;
use crate::settings::{SettingsContext, init_settings};

use cropvision_shared::route::AppRoute;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积；同时为核心库的抽象接口提供浏览器实现。
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;
    mod theme;
    mod timer;

    pub use http::FetchHttpClient;
    pub use storage::LocalStorage;
    pub use theme::{DocumentTheme, on_system_theme_change};
}

use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <AppLayout><DashboardPage /></AppLayout> }.into_any(),
        AppRoute::Predict => view! { <AppLayout><PredictPage /></AppLayout> }.into_any(),
        AppRoute::History => view! { <AppLayout><HistoryPage /></AppLayout> }.into_any(),
        AppRoute::Analytics => view! { <AppLayout><AnalyticsPage /></AppLayout> }.into_any(),
        AppRoute::Diseases => view! { <AppLayout><DiseasesPage /></AppLayout> }.into_any(),
        AppRoute::DiseaseDetail(id) => {
            view! { <AppLayout><DiseaseDetailPage id=id /></AppLayout> }.into_any()
        }
        AppRoute::Settings => view! { <AppLayout><SettingsPage /></AppLayout> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"页面未找到"</p>
                    <Link to="/" class="btn btn-primary">"返回首页"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 设置上下文：加载偏好并立即应用主题
    let settings_ctx = SettingsContext::new();
    init_settings(&settings_ctx);
    provide_context(settings_ctx);

    // 2. 认证上下文：从 LocalStorage 恢复会话
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 4. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
