//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面（仅限访客）
    Login,
    /// 注册页面（仅限访客）
    Register,
    /// 首页概览 (需要认证)
    #[default]
    Dashboard,
    Predict,
    History,
    Analytics,
    /// 病害知识库
    Diseases,
    /// 病害详情，携带病害 id
    DiseaseDetail(String),
    Settings,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 忽略查询串、片段与末尾斜杠。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Dashboard,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/predict" => Self::Predict,
            "/history" => Self::History,
            "/analytics" => Self::Analytics,
            "/diseases" => Self::Diseases,
            "/settings" => Self::Settings,
            other => match other.strip_prefix("/diseases/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Self::DiseaseDetail(id.to_string())
                }
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Predict => "/predict".to_string(),
            Self::History => "/history".to_string(),
            Self::Analytics => "/analytics".to_string(),
            Self::Diseases => "/diseases".to_string(),
            Self::DiseaseDetail(id) => format!("/diseases/{}", id),
            Self::Settings => "/settings".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 页面标题（导航栏与浏览器标题使用）
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "登录",
            Self::Register => "注册",
            Self::Dashboard => "概览",
            Self::Predict => "病害识别",
            Self::History => "识别历史",
            Self::Analytics => "数据分析",
            Self::Diseases => "病害知识库",
            Self::DiseaseDetail(_) => "病害详情",
            Self::Settings => "系统设置",
            Self::NotFound => "页面未找到",
        }
    }

    /// **核心守卫属性：该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register | Self::NotFound)
    }

    /// 已认证用户是否应该离开此路由（仅限访客的页面）
    pub fn is_guest_only(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取已认证用户访问访客页面时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 主导航栏中展示的路由
    pub fn navigation() -> [AppRoute; 6] {
        [
            Self::Dashboard,
            Self::Predict,
            Self::History,
            Self::Analytics,
            Self::Diseases,
            Self::Settings,
        ]
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
