//! # REST data source
//!
//! [`HttpDataSource`] implements [`AuthApi`], [`ResourceApi`] and
//! [`DashboardApi`] against the SkillSmart REST backend with `reqwest`.
//!
//! ## Request pipeline
//!
//! 1. The URL is `<base_url>/<path>`; tenant-scoped lists add `?companyId=<id>`.
//! 2. If the [`SessionVault`] holds a token it is sent as
//!    `Authorization: Bearer <token>`.
//! 3. A non-success status becomes [`ApiError::Status`], carrying the `message`
//!    field of the JSON error body when there is one.
//! 4. HTTP 401 additionally clears the vault and fires the
//!    [`UnauthorizedHook`], so the session store can drop to anonymous.
//! 5. An empty success body reads as `null`; anything else must be JSON.
//!
//! No retries. The only timeout is the optional `request_timeout_secs` from
//! configuration (native targets only).

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use store::{KeyValueStore, SessionVault, SkillSmartConfig};

use crate::error::ApiError;
use crate::models::{
    AuthResponse, Credentials, NewAssignment, ProficiencyUpdate, RecordId, RegisterRequest,
};
use crate::source::{AuthApi, DashboardApi, ResourceApi, UnauthorizedHook};

/// Query parameter carrying the tenant scope.
pub const SCOPE_PARAM: &str = "companyId";

/// REST implementation of the remote data source.
#[derive(Clone)]
pub struct HttpDataSource<S> {
    client: Client,
    base_url: String,
    vault: SessionVault<S>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHook>>,
}

impl<S: KeyValueStore> HttpDataSource<S> {
    /// Build a data source from configuration, persisting credentials in `store`.
    pub fn new(config: &SkillSmartConfig, store: S) -> Result<Self, ApiError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = if config.api.request_timeout_secs > 0 {
            builder.timeout(std::time::Duration::from_secs(config.api.request_timeout_secs))
        } else {
            builder
        };
        let client = builder.build()?;

        Ok(Self::with_client(
            client,
            config.api.base_url.clone(),
            SessionVault::with_keys(store, &config.storage),
        ))
    }

    /// Build a data source around an existing `reqwest` client.
    pub fn with_client(client: Client, base_url: impl Into<String>, vault: SessionVault<S>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            vault,
            on_unauthorized: None,
        }
    }

    /// Install the callback fired when the server answers 401.
    pub fn with_unauthorized_hook(mut self, hook: Arc<dyn UnauthorizedHook>) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    pub fn vault(&self) -> &SessionVault<S> {
        &self.vault
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let request = match self.vault.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            ApiError::from(e)
        })?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text).ok().and_then(|body| {
                body.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            if status == StatusCode::UNAUTHORIZED {
                tracing::warn!("Server rejected the session token, clearing stored credentials");
                self.vault.clear().await;
                if let Some(hook) = &self.on_unauthorized {
                    hook.on_unauthorized();
                }
            } else {
                tracing::debug!("Request returned {}: {:?}", status, message);
            }
            return Err(ApiError::status(status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(self.client.get(self.url(path))).await
    }

    async fn get_scoped(&self, path: &str, scope: Option<&RecordId>) -> Result<Value, ApiError> {
        let mut request = self.client.get(self.url(path));
        if let Some(scope) = scope {
            request = request.query(&[(SCOPE_PARAM, scope.to_string())]);
        }
        self.execute(request).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.execute(self.client.post(self.url(path)).json(body)).await
    }

    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.execute(self.client.put(self.url(path)).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(self.client.delete(self.url(path))).await
    }
}

impl<S: KeyValueStore> AuthApi for HttpDataSource<S> {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let body = self.post("auth/login", credentials).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let body = self.post("auth/register", request).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn logout(&self) {
        self.vault.clear().await;
    }
}

impl<S: KeyValueStore> ResourceApi for HttpDataSource<S> {
    async fn employees(&self, scope: Option<&RecordId>) -> Result<Value, ApiError> {
        self.get_scoped("employees", scope).await
    }

    async fn employee(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.get(&format!("employees/{id}")).await
    }

    async fn me(&self) -> Result<Value, ApiError> {
        self.get("employees/me").await
    }

    async fn create_employee(&self, body: &Value) -> Result<Value, ApiError> {
        self.post("employees", body).await
    }

    async fn update_employee(&self, id: &RecordId, body: &Value) -> Result<Value, ApiError> {
        self.put(&format!("employees/{id}"), body).await
    }

    async fn delete_employee(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.delete(&format!("employees/{id}")).await
    }

    async fn employee_skills(&self, employee: &RecordId) -> Result<Value, ApiError> {
        self.get(&format!("employees/{employee}/skills")).await
    }

    async fn add_employee_skill(
        &self,
        employee: &RecordId,
        assignment: &NewAssignment,
    ) -> Result<Value, ApiError> {
        self.post(&format!("employees/{employee}/skills"), assignment)
            .await
    }

    async fn update_employee_skill(
        &self,
        employee: &RecordId,
        skill: &RecordId,
        update: &ProficiencyUpdate,
    ) -> Result<Value, ApiError> {
        self.put(&format!("employees/{employee}/skills/{skill}"), update)
            .await
    }

    async fn delete_employee_skill(
        &self,
        employee: &RecordId,
        skill: &RecordId,
    ) -> Result<Value, ApiError> {
        self.delete(&format!("employees/{employee}/skills/{skill}"))
            .await
    }

    async fn certificates(&self, employee: &RecordId) -> Result<Value, ApiError> {
        self.get(&format!("employees/{employee}/certificates")).await
    }

    async fn add_certificate(&self, employee: &RecordId, body: &Value) -> Result<Value, ApiError> {
        self.post(&format!("employees/{employee}/certificates"), body)
            .await
    }

    async fn delete_certificate(
        &self,
        employee: &RecordId,
        certificate: &RecordId,
    ) -> Result<Value, ApiError> {
        self.delete(&format!("employees/{employee}/certificates/{certificate}"))
            .await
    }

    async fn skills(&self, scope: Option<&RecordId>) -> Result<Value, ApiError> {
        self.get_scoped("skills", scope).await
    }

    async fn create_skill(&self, body: &Value) -> Result<Value, ApiError> {
        self.post("skills", body).await
    }

    async fn update_skill(&self, id: &RecordId, body: &Value) -> Result<Value, ApiError> {
        self.put(&format!("skills/{id}"), body).await
    }

    async fn delete_skill(&self, id: &RecordId) -> Result<Value, ApiError> {
        self.delete(&format!("skills/{id}")).await
    }

    async fn users_by_skill(&self, skill: &RecordId) -> Result<Value, ApiError> {
        self.get(&format!("skills/{skill}/users")).await
    }

    async fn companies(&self) -> Result<Value, ApiError> {
        self.get("companies").await
    }
}

impl<S: KeyValueStore> DashboardApi for HttpDataSource<S> {
    async fn skill_distribution(&self) -> Result<Value, ApiError> {
        self.get("dashboard/skill-distribution").await
    }

    async fn skills_by_department(&self) -> Result<Value, ApiError> {
        self.get("dashboard/skills-by-department").await
    }

    async fn recent_activities(&self) -> Result<Value, ApiError> {
        self.get("dashboard/recent-activities").await
    }

    async fn top_skills(&self) -> Result<Value, ApiError> {
        self.get("dashboard/top-skills").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use store::MemoryStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response and hand back the raw request text.
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let expected = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + expected {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{addr}/api"), handle)
    }

    fn source(base_url: String, store: MemoryStore) -> HttpDataSource<MemoryStore> {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpDataSource::with_client(client, base_url, SessionVault::new(store))
    }

    struct CountingHook(AtomicUsize);

    impl UnauthorizedHook for CountingHook {
        fn on_unauthorized(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let (base, server) = serve_once(
            200,
            r#"{"token":"t-1","user":{"id":1,"email":"ada@example.com","firstName":"Ada","lastName":"Lovelace","role":"admin","companyId":3}}"#,
        )
        .await;
        let api = source(base, MemoryStore::new());

        let response = api
            .login(&Credentials::new("ada@example.com", "Secret123"))
            .await
            .unwrap();
        assert_eq!(response.token, "t-1");
        assert_eq!(response.user.role, Role::Admin);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/auth/login "));
        assert!(request.contains(r#""email":"ada@example.com""#));
    }

    #[tokio::test]
    async fn test_scoped_list_sends_bearer_token() {
        let (base, server) = serve_once(200, r#"[{"id":1,"name":"Rust"}]"#).await;
        let store = MemoryStore::new();
        store.set("authToken", "abc".to_string()).await.unwrap();
        let api = source(base, store);

        let skills = api.skills(Some(&RecordId::Number(3))).await.unwrap();
        assert_eq!(skills[0]["name"], "Rust");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /api/skills?companyid=3 "));
        assert!(request.contains("authorization: bearer abc"));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_vault_and_fires_hook() {
        let (base, server) = serve_once(401, r#"{"message":"Token expired"}"#).await;
        let store = MemoryStore::new();
        let hook = Arc::new(CountingHook(AtomicUsize::new(0)));
        let api = source(base, store.clone()).with_unauthorized_hook(hook.clone());
        api.vault()
            .save("stale", &serde_json::json!({ "id": 1 }))
            .await
            .unwrap();

        let err = api.employees(None).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("Token expired"));
        assert_eq!(hook.0.load(Ordering::SeqCst), 1);
        assert!(store.is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_without_body() {
        let (base, server) = serve_once(500, "").await;
        let api = source(base, MemoryStore::new());

        let err = api.top_skills().await.unwrap_err();
        assert_eq!(err, ApiError::Status { status: 500, message: None });
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let (base, server) = serve_once(200, "").await;
        let api = source(base, MemoryStore::new());

        let body = api
            .delete_employee_skill(&RecordId::Number(1), &RecordId::Number(2))
            .await
            .unwrap();
        assert_eq!(body, Value::Null);

        let request = server.await.unwrap();
        assert!(request.starts_with("DELETE /api/employees/1/skills/2 "));
    }

    #[tokio::test]
    async fn test_logout_clears_vault() {
        let store = MemoryStore::new();
        let api = source("http://127.0.0.1:9/api".to_string(), store.clone());
        api.vault()
            .save("tok", &serde_json::json!({ "id": 1 }))
            .await
            .unwrap();

        api.logout().await;
        assert!(store.is_empty());
    }

    #[test]
    fn test_url_joining() {
        let api = source("http://localhost:5000/api/".to_string(), MemoryStore::new());
        assert_eq!(api.url("/skills"), "http://localhost:5000/api/skills");
        assert_eq!(api.url("dashboard/top-skills"), "http://localhost:5000/api/dashboard/top-skills");
    }
}
