//! HTTP transport: bearer auth, the `{ data }` envelope and the
//! `{ message }` error body.

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use spbu_core::models::user::{LoginRequest, LoginResponse, User, UserProfile};
use tracing::{debug, warn};

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{AuthContext, Session};

#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
    auth: AuthContext,
    /// Cached reads of the current session; emptied whenever it changes.
    cache: QueryCache,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, auth: AuthContext) -> ClientResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {}: {e}", config.base_url)))?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self {
            base,
            http,
            auth,
            cache: QueryCache::new(),
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn end_session(&self) -> bool {
        self.cache.clear();
        self.auth.sign_out()
    }

    /// Exchange credentials for a session and store it in the context.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<User> {
        let body = LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        let req = self.http.post(self.url("/api/auth/login")?).json(&body);
        let res: LoginResponse = self.execute(req, false).await?;
        self.cache.clear();
        self.auth.sign_in(Session {
            token: res.token,
            user: res.user.clone(),
        });
        Ok(res.user)
    }

    /// Revoke the token server-side and clear the session. The session is
    /// cleared even if the server call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self
            .send::<Option<()>>(Method::POST, "/api/auth/logout", None::<&()>)
            .await;
        self.end_session();
        match result {
            Ok(_) | Err(ClientError::SessionExpired) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn me(&self) -> ClientResult<UserProfile> {
        self.get("/api/auth/me").await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None::<&()>).await
    }

    pub async fn get_with_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let token = self.auth.token().ok_or(ClientError::NotSignedIn)?;
        let req = self
            .http
            .get(self.url(path)?)
            .bearer_auth(token)
            .query(query);
        self.execute(req, true).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::PUT, path, None::<&()>).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ClientResult<T> {
        let token = self.auth.token().ok_or(ClientError::NotSignedIn)?;
        let mut req = self.http.request(method, self.url(path)?).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.execute(req, true).await
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ClientError::Config(format!("invalid path {path}: {e}")))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        authenticated: bool,
    ) -> ClientResult<T> {
        let res = req.send().await.map_err(ClientError::Network)?;
        let status = res.status();
        debug!(status = status.as_u16(), url = %res.url(), "API response");

        if status == StatusCode::UNAUTHORIZED && authenticated {
            if self.end_session() {
                warn!("Session rejected by server; signed out");
            }
            return Err(ClientError::SessionExpired);
        }
        if !status.is_success() {
            let message = match res.json::<ErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => format!("Request failed with status {}", status.as_u16()),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = res
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}
