//! 认证模块
//!
//! 在 Leptos 信号中持有核心库的 `AuthStore`，与路由系统解耦：
//! 路由服务通过注入的认证信号来检查认证状态。

use cropvision::auth::AuthStore;
use cropvision_shared::route::AppRoute;
use leptos::prelude::*;

use crate::api::{CropVisionApi, api_client};
use crate::web::LocalStorage;

pub type BrowserAuthStore = AuthStore<LocalStorage>;

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<BrowserAuthStore>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<BrowserAuthStore>,
}

impl AuthContext {
    /// 创建认证上下文并从 LocalStorage 恢复会话
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthStore::load(LocalStorage));
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_authenticated()))
    }

    pub fn username(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user().map(|u| u.username.clone())))
    }

    /// 以当前令牌构造 API 客户端
    pub fn api(&self) -> CropVisionApi {
        let token = self
            .state
            .with_untracked(|s| s.token().map(str::to_string));
        api_client(token)
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录并持久化会话
///
/// # Returns
/// 登录是否成功
pub async fn login(ctx: AuthContext, username: String, password: String) -> bool {
    let api = api_client(None);
    let mut store = ctx.state.get_untracked();
    let success = store.login(&api, &username, &password).await;
    if success {
        ctx.set_state.set(store);
    }
    success
}

/// 注销并清除状态
///
/// # Returns
/// 注销后应导航到的路由
pub fn logout(ctx: &AuthContext) -> AppRoute {
    let mut redirect = AppRoute::auth_failure_redirect();
    ctx.set_state.update(|store| redirect = store.logout());
    redirect
}
