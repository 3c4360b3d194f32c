use cropvision_shared::{LoginForm, RegisterRequest, RegisteredUser, TokenResponse};

use super::ApiClient;
use crate::error::ClientResult;
use crate::request::HttpClient;

pub struct AuthApi<'a, C: HttpClient> {
    pub(super) api: &'a ApiClient<C>,
}

impl<C: HttpClient> AuthApi<'_, C> {
    /// 用户名密码换取访问令牌（OAuth2 password 表单）
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<TokenResponse> {
        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };
        let http = self.api.request_for(&form).with_form(vec![
            ("username".to_string(), form.username.clone()),
            ("password".to_string(), form.password.clone()),
        ]);
        self.api.execute::<LoginForm>(http, "auth.login").await
    }

    pub async fn register(&self, req: RegisterRequest) -> ClientResult<RegisteredUser> {
        let http = self.api.request_for(&req).with_json(&req)?;
        self.api.execute::<RegisterRequest>(http, "auth.register").await
    }
}
