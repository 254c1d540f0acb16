use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::api::dev_backend::DevBackend;
use crate::api::{ApiError, RecordInput};
use crate::format::Zone;
use crate::types::{Filter, Record, RecordList, RecordQuery, TokenResponse, User, UserList};

const FORWARDED_USER_HEADER: &str = "X-Forwarded-User";
const UNAUTH_RELOGIN: &str = "Session expired or missing. Run `tmtrkr-tui login <user>` to authenticate.";
const UNAUTH_USER_REJECTED: &str = "The server refused to issue a token for this user.";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    dev_backend: Option<DevBackend>,
}

impl ApiClient {
    /// `base_url` is the server root; API paths are resolved below it, so a
    /// reverse-proxy prefix such as `https://host/tmtrkr` works.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .with_context(|| format!("Invalid API URL: {}", base_url))?;
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token,
            dev_backend: None,
        })
    }

    /// A client backed by an in-memory store instead of a server.
    pub fn dev() -> Result<Self> {
        Self::with_dev_backend(DevBackend::new())
    }

    pub(crate) fn with_dev_backend(backend: DevBackend) -> Result<Self> {
        let mut client = Self::new("http://localhost", Some("dev-token-dev".to_string()))?;
        client.dev_backend = Some(backend);
        Ok(client)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Attach the bearer token once one has been issued.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        call_name: &str,
        unauthorized_message: &str,
    ) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                call: call_name.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(call = call_name, %status, "api response");

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!(call = call_name, %status, "request not authorized");
            return Err(ApiError::Unauthorized(unauthorized_message.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(call = call_name, %status, body = %body, "request failed");
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
        unauthorized_message: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, call_name, unauthorized_message).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode {
                call: call_name.to_string(),
                source,
            })
    }

    async fn send_without_body(
        &self,
        request: RequestBuilder,
        call_name: &str,
        unauthorized_message: &str,
    ) -> Result<(), ApiError> {
        let response = self.send(request, call_name, unauthorized_message).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    /// GET /api/records/: records whose start falls inside the filter's days.
    #[instrument(skip(self, filter))]
    pub async fn list_records(&self, filter: &Filter, zone: Zone) -> Result<RecordList, ApiError> {
        let query = filter.query(zone);
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.list_records(query));
        }

        self.get_json(
            self.authorized(self.client.get(self.endpoint("api/records/")?))
                .query(&query_pairs(query)),
            "GET /api/records/",
            UNAUTH_RELOGIN,
        )
        .await
    }

    /// POST /api/records/
    pub async fn create_record(&self, input: &RecordInput) -> Result<Record, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.create_record(input);
        }

        self.get_json(
            self.authorized(self.client.post(self.endpoint("api/records/")?))
                .json(input),
            "POST /api/records/",
            UNAUTH_RELOGIN,
        )
        .await
    }

    /// PATCH /api/records/{id}
    pub async fn update_record(&self, id: i64, input: &RecordInput) -> Result<Record, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.update_record(id, input);
        }

        self.get_json(
            self.authorized(
                self.client
                    .patch(self.endpoint(&format!("api/records/{}", id))?),
            )
            .json(input),
            "PATCH /api/records/:id",
            UNAUTH_RELOGIN,
        )
        .await
    }

    /// Create when `id` is `None`, otherwise update that record.
    pub async fn save_record(&self, id: Option<i64>, input: &RecordInput) -> Result<Record, ApiError> {
        match id {
            Some(id) => self.update_record(id, input).await,
            None => self.create_record(input).await,
        }
    }

    /// DELETE /api/records/{id}
    pub async fn delete_record(&self, id: i64) -> Result<Record, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.delete_record(id);
        }

        self.get_json(
            self.authorized(
                self.client
                    .delete(self.endpoint(&format!("api/records/{}", id))?),
            ),
            "DELETE /api/records/:id",
            UNAUTH_RELOGIN,
        )
        .await
    }

    /// GET /api/users/
    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return Ok(dev.users());
        }

        let list: UserList = self
            .get_json(
                self.authorized(self.client.get(self.endpoint("api/users/")?)),
                "GET /api/users/",
                UNAUTH_RELOGIN,
            )
            .await?;
        Ok(list.users)
    }

    /// GET /api/users/token. The proxy-authenticated user name goes in
    /// `X-Forwarded-User`; the response carries the bearer token.
    pub async fn issue_token(&self, username: &str) -> Result<String, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.issue_token(username);
        }

        let response: TokenResponse = self
            .get_json(
                self.client
                    .get(self.endpoint("api/users/token")?)
                    .header(FORWARDED_USER_HEADER, username),
                "GET /api/users/token",
                UNAUTH_USER_REJECTED,
            )
            .await?;
        Ok(response.token)
    }

    /// GET /api/users/logout
    pub async fn logout(&self) -> Result<(), ApiError> {
        if self.dev_backend.is_some() {
            return Ok(());
        }

        self.send_without_body(
            self.authorized(self.client.get(self.endpoint("api/users/logout")?)),
            "GET /api/users/logout",
            UNAUTH_RELOGIN,
        )
        .await
    }
}

fn query_pairs(query: RecordQuery) -> Vec<(&'static str, i64)> {
    let mut pairs = Vec::new();
    if let Some(start_min) = query.start_min {
        pairs.push(("start_min", start_min));
    }
    if let Some(start_max) = query.start_max {
        pairs.push(("start_max", start_max));
    }
    pairs
}
