//! 路由守卫
//!
//! 只负责"目标路由 + 认证状态 -> 导航结果"的纯决策，
//! History API、信号等副作用由前端路由服务处理。

use cropvision_shared::route::AppRoute;

/// 认证状态读取器（由路由服务注入）
pub trait SessionAccessor {
    fn is_authenticated(&self) -> bool;
}

impl<F> SessionAccessor for F
where
    F: Fn() -> bool,
{
    fn is_authenticated(&self) -> bool {
        self()
    }
}

/// 守卫结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// 放行到目标路由
    Proceed(AppRoute),
    /// 拒绝目标并改为前往该路由
    Redirect(AppRoute),
}

impl Navigation {
    /// 最终落地的路由
    pub fn route(&self) -> &AppRoute {
        match self {
            Navigation::Proceed(route) | Navigation::Redirect(route) => route,
        }
    }

    pub fn into_route(self) -> AppRoute {
        match self {
            Navigation::Proceed(route) | Navigation::Redirect(route) => route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirect(_))
    }
}

/// 导航守卫
///
/// - 受保护路由且未认证 -> 登录页
/// - 仅访客路由（登录/注册）且已认证 -> 仪表盘
/// - 其余放行
pub fn guard(target: &AppRoute, session: &impl SessionAccessor) -> Navigation {
    let is_auth = session.is_authenticated();

    if target.requires_auth() && !is_auth {
        log_info!("[Router] Access to {} denied. Redirecting to Login.", target);
        return Navigation::Redirect(AppRoute::auth_failure_redirect());
    }

    if target.is_guest_only() && is_auth {
        log_info!("[Router] Already authenticated. Redirecting to Dashboard.");
        return Navigation::Redirect(AppRoute::auth_success_redirect());
    }

    Navigation::Proceed(target.clone())
}

/// 解析路径并执行守卫
pub fn resolve(path: &str, session: &impl SessionAccessor) -> Navigation {
    guard(&AppRoute::from_path(path), session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_in() -> bool {
        true
    }

    fn signed_out() -> bool {
        false
    }

    const SIGNED_IN: fn() -> bool = signed_in;
    const SIGNED_OUT: fn() -> bool = signed_out;

    #[test]
    fn test_protected_routes_redirect_anonymous_to_login() {
        for path in ["/", "/predict", "/history", "/analytics", "/diseases", "/settings"] {
            let nav = resolve(path, &SIGNED_OUT);
            assert_eq!(nav, Navigation::Redirect(AppRoute::Login), "path {}", path);
        }
        assert_eq!(
            resolve("/diseases/tomato_late_blight", &SIGNED_OUT),
            Navigation::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_authenticated_user_reaches_protected_routes() {
        let nav = resolve("/history", &SIGNED_IN);
        assert_eq!(nav, Navigation::Proceed(AppRoute::History));
        assert!(!nav.is_redirect());

        let nav = resolve("/diseases/apple_scab", &SIGNED_IN);
        assert_eq!(
            nav.into_route(),
            AppRoute::DiseaseDetail("apple_scab".to_string())
        );
    }

    #[test]
    fn test_guest_only_routes_redirect_authenticated_to_dashboard() {
        assert_eq!(
            resolve("/login", &SIGNED_IN),
            Navigation::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(
            resolve("/register", &SIGNED_IN),
            Navigation::Redirect(AppRoute::Dashboard)
        );
    }

    #[test]
    fn test_guest_only_routes_open_to_anonymous() {
        assert_eq!(resolve("/login", &SIGNED_OUT), Navigation::Proceed(AppRoute::Login));
        assert_eq!(
            resolve("/register", &SIGNED_OUT),
            Navigation::Proceed(AppRoute::Register)
        );
    }

    #[test]
    fn test_unknown_paths_are_public_not_found() {
        for session in [SIGNED_IN, SIGNED_OUT] {
            let nav = resolve("/no/such/page", &session);
            assert_eq!(nav.route(), &AppRoute::NotFound);
            assert!(!nav.is_redirect());
        }
    }

    #[test]
    fn test_guard_reads_session_at_navigation_time() {
        use std::cell::Cell;

        let signed_in = Cell::new(false);
        let session = || signed_in.get();

        assert!(guard(&AppRoute::Settings, &session).is_redirect());
        signed_in.set(true);
        assert_eq!(
            guard(&AppRoute::Settings, &session),
            Navigation::Proceed(AppRoute::Settings)
        );
    }
}
