use reqwest::StatusCode;
use reqwest::header::COOKIE;
use serde::Deserialize;

use crate::common::Result;

/// Signed-in backend user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct ProtectedResponse {
    #[serde(default)]
    user: Option<SessionUser>,
}

/// Client for the REST backend's session endpoint.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The user behind `cookie`, or `None` when the backend rejects the session.
    pub async fn current_user(&self, cookie: Option<&str>) -> Result<Option<SessionUser>> {
        let mut request = self.http.get(format!("{}/protected", self.base_url));
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            log::info!("Backend session rejected ({})", response.status());
            return Ok(None);
        }

        let body: ProtectedResponse = response.error_for_status()?.json().await?;
        Ok(body.user)
    }
}
