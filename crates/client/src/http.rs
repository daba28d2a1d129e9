use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use mentor_common::error::AppError;
use mentor_common::types::{
    ApproveResponse, EntityType, MentorshipRequest, RequestStatus, SendRequest,
};

use crate::directory::RequestDirectory;

/// Detail string the backend returns when the sender already has an active
/// request to the same receiver.
pub const EXISTING_REQUEST_DETAIL: &str = "У вас уже есть активная заявка к этому получателю";

/// `reqwest`-backed client for the `/requests/*` endpoints.
#[derive(Debug, Clone)]
pub struct HttpRequestDirectory {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRequestDirectory {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Send a mentorship request to a user or mentor.
    ///
    /// A duplicate active request is reported as [`AppError::ExistingRequest`].
    pub async fn send_request(
        &self,
        receiver_id: i64,
        message: &str,
        receiver_type: EntityType,
    ) -> Result<MentorshipRequest, AppError> {
        let payload = SendRequest {
            receiver_id,
            message: message.to_string(),
            receiver_type,
        };

        let builder = self.authorized(self.client.post(self.url("/requests/send")))?;
        match self.execute::<MentorshipRequest>(builder.json(&payload)).await {
            Err(AppError::Api { detail, .. }) if detail == EXISTING_REQUEST_DETAIL => {
                Err(AppError::ExistingRequest(detail))
            }
            other => {
                let request: MentorshipRequest = other?;
                tracing::info!(
                    request_id = request.id,
                    receiver_id,
                    receiver_type = %receiver_type,
                    "Mentorship request sent"
                );
                Ok(request)
            }
        }
    }

    /// Approve an incoming request and receive the sender's contact details.
    pub async fn approve(&self, request_id: i64) -> Result<ApproveResponse, AppError> {
        let path = format!("/requests/approve/{request_id}");
        let builder = self.authorized(self.client.post(self.url(&path)))?;
        let response = self.execute(builder).await?;
        tracing::info!(request_id, "Mentorship request approved");
        Ok(response)
    }

    /// Reject an incoming request.
    pub async fn reject(&self, request_id: i64) -> Result<(), AppError> {
        let path = format!("/requests/reject/{request_id}");
        let builder = self.authorized(self.client.post(self.url(&path)))?;
        let _: serde_json::Value = self.execute(builder).await?;
        tracing::info!(request_id, "Mentorship request rejected");
        Ok(())
    }

    /// Withdraw an outgoing request. The API has no dedicated endpoint, so the
    /// sender rejects its own request.
    pub async fn cancel(&self, request_id: i64) -> Result<(), AppError> {
        self.reject(request_id).await
    }

    /// Incoming requests that were accepted, i.e. active mentorships.
    pub async fn accepted(&self) -> Result<Vec<MentorshipRequest>, AppError> {
        let mut requests = self.incoming().await?;
        requests.retain(|r| r.status == RequestStatus::Accepted);
        Ok(requests)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, AppError> {
        let token = self.token.as_deref().ok_or(AppError::NotAuthenticated)?;
        Ok(builder.bearer_auth(token))
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AppError> {
        let response = builder.send().await?;
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_list(&self, path: &str) -> Result<Vec<MentorshipRequest>, AppError> {
        let builder = self.authorized(self.client.get(self.url(path)))?;
        let requests: Vec<MentorshipRequest> = self.execute(builder).await?;
        tracing::debug!(path, count = requests.len(), "Fetched mentorship requests");
        Ok(requests)
    }

    /// Turn a non-2xx response into [`AppError::Api`], preferring the
    /// backend's `detail` field over the raw body.
    async fn check_status(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    body
                }
            });

        Err(AppError::Api {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl RequestDirectory for HttpRequestDirectory {
    async fn incoming(&self) -> Result<Vec<MentorshipRequest>, AppError> {
        self.get_list("/requests/got").await
    }

    async fn outgoing(&self) -> Result<Vec<MentorshipRequest>, AppError> {
        self.get_list("/requests/sent").await
    }
}
