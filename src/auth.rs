//! 认证状态管理
//!
//! 两态状态机：Anonymous / Authenticated。
//! 身份信息与令牌分别持久化在 `user` 与 `token` 两个键下，二者缺一即视为未认证。

use cropvision_shared::route::AppRoute;
use cropvision_shared::{STORAGE_KEY_TOKEN, STORAGE_KEY_USER, User};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::router::SessionAccessor;
use crate::storage::KeyValueStore;

/// 已认证会话：身份 + Bearer 令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(Session),
}

/// 认证存储
///
/// 是 `user` / `token` 两个持久化键的唯一写入者。
#[derive(Clone)]
pub struct AuthStore<S: KeyValueStore> {
    storage: S,
    state: AuthState,
}

impl<S: KeyValueStore> AuthStore<S> {
    /// 从持久化存储恢复会话
    ///
    /// 只有身份与令牌都可读时才进入 Authenticated；
    /// 残缺的一半会被清除，保证两个键始终一致。
    pub fn load(storage: S) -> Self {
        let user = match storage.get_json::<User>(STORAGE_KEY_USER) {
            Ok(user) => user,
            Err(e) => {
                log_warn!("[Auth] Discarding unreadable stored user: {}", e);
                None
            }
        };
        let token = storage
            .get(STORAGE_KEY_TOKEN)
            .filter(|t| !t.is_empty());

        let state = match (user, token) {
            (Some(user), Some(token)) => AuthState::Authenticated(Session { user, token }),
            (None, None) => AuthState::Anonymous,
            _ => {
                log_warn!("[Auth] Stored session is incomplete, clearing it.");
                let _ = storage.remove(STORAGE_KEY_USER);
                let _ = storage.remove(STORAGE_KEY_TOKEN);
                AuthState::Anonymous
            }
        };

        Self { storage, state }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }

    /// 建立会话并持久化
    ///
    /// 任一键写入失败时回滚已写入的部分，状态保持不变。
    pub fn establish(&mut self, session: Session) -> ClientResult<()> {
        self.storage
            .set_json(STORAGE_KEY_USER, &session.user)
            .map_err(|e| e.in_op("auth.establish"))?;
        if let Err(e) = self.storage.set(STORAGE_KEY_TOKEN, &session.token) {
            let _ = self.storage.remove(STORAGE_KEY_USER);
            return Err(e.in_op("auth.establish"));
        }
        self.state = AuthState::Authenticated(session);
        Ok(())
    }

    /// 登录：以凭据换取令牌
    ///
    /// 成功返回 true 并进入 Authenticated；失败记录日志、返回 false，状态不变。
    pub async fn login<C: HttpClient>(
        &mut self,
        api: &ApiClient<C>,
        username: &str,
        password: &str,
    ) -> bool {
        let result = match exchange_credentials(api, username, password).await {
            Ok(session) => self.establish(session),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                log_info!("[Auth] Logged in as {}", username);
                true
            }
            Err(e) => {
                log_error!("[Auth] Login failed for {}: {}", username, e);
                false
            }
        }
    }

    /// 注销：清除两个持久化键并返回应跳转的路由（登录页）
    pub fn logout(&mut self) -> AppRoute {
        if let Err(e) = self.storage.remove(STORAGE_KEY_USER) {
            log_error!("[Auth] Failed to remove stored user: {}", e);
        }
        if let Err(e) = self.storage.remove(STORAGE_KEY_TOKEN) {
            log_error!("[Auth] Failed to remove stored token: {}", e);
        }
        self.state = AuthState::Anonymous;
        log_info!("[Auth] Logged out.");
        AppRoute::auth_failure_redirect()
    }
}

impl<S: KeyValueStore> SessionAccessor for AuthStore<S> {
    fn is_authenticated(&self) -> bool {
        AuthStore::is_authenticated(self)
    }
}

/// 以用户名密码换取会话（不触碰任何存储）
///
/// 令牌接口不返回角色，身份中记录默认角色。
pub async fn exchange_credentials<C: HttpClient>(
    api: &ApiClient<C>,
    username: &str,
    password: &str,
) -> ClientResult<Session> {
    let token = api.auth().login(username, password).await?;
    Ok(Session {
        user: User::new(username),
        token: token.access_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::error::{ClientError, ClientErrorStatus};
    use crate::request::{HttpMethod, MockHttpClient};
    use crate::storage::MemoryStore;
    use serde_json::json;

    const TOKEN_URL: &str = "/api/auth/token";

    fn create_api() -> ApiClient<MockHttpClient> {
        ApiClient::new(MockHttpClient::new(), ApiConfig::default())
    }

    fn seeded_store(user: Option<&str>, token: Option<&str>) -> MemoryStore {
        let storage = MemoryStore::new();
        if let Some(user) = user {
            storage.set(STORAGE_KEY_USER, user).unwrap();
        }
        if let Some(token) = token {
            storage.set(STORAGE_KEY_TOKEN, token).unwrap();
        }
        storage
    }

    /// 写入 token 键时失败的存储
    struct TokenWriteFails(MemoryStore);

    impl KeyValueStore for TokenWriteFails {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> ClientResult<()> {
            if key == STORAGE_KEY_TOKEN {
                return Err(ClientError::storage("quota exceeded"));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> ClientResult<()> {
            self.0.remove(key)
        }
    }

    // =========================================================
    // load
    // =========================================================

    #[test]
    fn test_load_with_both_entries_is_authenticated() {
        let storage = seeded_store(Some(r#"{"username":"alice","role":"admin"}"#), Some("tok"));
        let store = AuthStore::load(storage);

        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().role, "admin");
        assert_eq!(store.token(), Some("tok"));
    }

    #[test]
    fn test_load_empty_is_anonymous() {
        let store = AuthStore::load(MemoryStore::new());
        assert_eq!(store.state(), &AuthState::Anonymous);
        assert!(store.token().is_none());
    }

    #[test]
    fn test_load_with_missing_token_is_anonymous_and_cleans_up() {
        let storage = seeded_store(Some(r#"{"username":"alice","role":"user"}"#), None);
        let store = AuthStore::load(storage.clone());

        assert!(!store.is_authenticated());
        assert!(!storage.contains(STORAGE_KEY_USER));
    }

    #[test]
    fn test_load_with_missing_user_is_anonymous_and_cleans_up() {
        let storage = seeded_store(None, Some("tok"));
        let store = AuthStore::load(storage.clone());

        assert!(!store.is_authenticated());
        assert!(!storage.contains(STORAGE_KEY_TOKEN));
    }

    #[test]
    fn test_load_with_corrupt_user_is_anonymous() {
        let storage = seeded_store(Some("{not json"), Some("tok"));
        let store = AuthStore::load(storage.clone());

        assert!(!store.is_authenticated());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_load_with_empty_token_is_anonymous() {
        let storage = seeded_store(Some(r#"{"username":"a","role":"user"}"#), Some(""));
        assert!(!AuthStore::load(storage).is_authenticated());
    }

    // =========================================================
    // login
    // =========================================================

    #[tokio::test]
    async fn test_login_success_persists_both_entries() {
        let api = create_api();
        api_mock_token(&api, 200, json!({"access_token": "jwt-1", "token_type": "bearer"}));
        let storage = MemoryStore::new();
        let mut store = AuthStore::load(storage.clone());

        assert!(store.login(&api, "alice", "pw").await);

        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("jwt-1"));
        assert_eq!(storage.get(STORAGE_KEY_TOKEN).as_deref(), Some("jwt-1"));
        assert_eq!(
            storage.get(STORAGE_KEY_USER).as_deref(),
            Some(r#"{"username":"alice","role":"user"}"#)
        );

        // 重新加载得到同一会话
        let reloaded = AuthStore::load(storage);
        assert_eq!(reloaded.session(), store.session());
    }

    #[tokio::test]
    async fn test_login_rejected_returns_false_and_stays_anonymous() {
        let api = create_api();
        api_mock_token(&api, 400, json!({"detail": "Incorrect username or password"}));
        let storage = MemoryStore::new();
        let mut store = AuthStore::load(storage.clone());

        assert!(!store.login(&api, "alice", "wrong").await);

        assert_eq!(store.state(), &AuthState::Anonymous);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_login_network_failure_returns_false() {
        let api = create_api();
        api.http_client().fail_with(ClientErrorStatus::Network);
        let mut store = AuthStore::load(MemoryStore::new());

        assert!(!store.login(&api, "alice", "pw").await);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rolls_back_when_persistence_fails() {
        let api = create_api();
        api_mock_token(&api, 200, json!({"access_token": "jwt", "token_type": "bearer"}));
        let inner = MemoryStore::new();
        let mut store = AuthStore::load(TokenWriteFails(inner.clone()));

        assert!(!store.login(&api, "alice", "pw").await);

        assert!(!store.is_authenticated());
        assert!(inner.is_empty());
    }

    // =========================================================
    // logout
    // =========================================================

    #[test]
    fn test_logout_clears_both_and_redirects_to_login() {
        let storage = seeded_store(Some(r#"{"username":"alice","role":"user"}"#), Some("tok"));
        let mut store = AuthStore::load(storage.clone());

        let redirect = store.logout();

        assert_eq!(redirect, AppRoute::Login);
        assert_eq!(redirect.to_path(), "/login");
        assert!(!store.is_authenticated());
        assert!(!storage.contains(STORAGE_KEY_USER));
        assert!(!storage.contains(STORAGE_KEY_TOKEN));
    }

    fn api_mock_token(api: &ApiClient<MockHttpClient>, status: u16, body: serde_json::Value) {
        api.http_client()
            .mock_response(HttpMethod::Post, TOKEN_URL, status, body);
    }
}
