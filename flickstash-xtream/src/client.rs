use tokio::time::Duration;

use crate::credentials::Credentials;
use crate::error::FetchError;
use crate::types::{XtreamCategory, XtreamMovie, XtreamSeries};

/// HTTP client for one Xtream provider account.
pub struct XtreamClient {
    http: reqwest::Client,
    creds: Credentials,
}

impl XtreamClient {
    pub fn new(creds: Credentials) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, creds })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.creds
    }

    /// Movie categories from `get_vod_categories`.
    pub async fn vod_categories(&self) -> Result<Vec<XtreamCategory>, FetchError> {
        self.player_api("get_vod_categories").await
    }

    /// The full movie listing from `get_vod_streams`. One response carries the
    /// whole catalog, often six figures of entries.
    pub async fn vod_streams(&self) -> Result<Vec<XtreamMovie>, FetchError> {
        self.player_api("get_vod_streams").await
    }

    /// Series categories from `get_series_categories`.
    pub async fn series_categories(&self) -> Result<Vec<XtreamCategory>, FetchError> {
        self.player_api("get_series_categories").await
    }

    /// The full series listing from `get_series`.
    pub async fn series(&self) -> Result<Vec<XtreamSeries>, FetchError> {
        self.player_api("get_series").await
    }

    async fn player_api<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
    ) -> Result<Vec<T>, FetchError> {
        let url = format!(
            "{}/player_api.php",
            self.creds.base_url.trim_end_matches('/')
        );

        log::debug!("GET {url} action={action}");
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("username", self.creds.username.as_str()),
                ("password", self.creds.password.as_str()),
                ("action", action),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::InvalidCredentials(
                "Provider rejected the username/password".to_string(),
            ));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimit);
        }
        if !status.is_success() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                message: format!("{action} failed"),
            });
        }

        let text = resp.text().await?;
        // Some panels answer 200 with an auth-error object instead of a list.
        if text.trim_start().starts_with('{') && text.contains("user_info") {
            return Err(FetchError::InvalidCredentials(
                "Provider returned account info instead of a listing".to_string(),
            ));
        }

        serde_json::from_str(&text).map_err(|e| {
            FetchError::Api(format!(
                "Failed to parse {action}: {e}. Response: {}",
                clip_body(&text, 200)
            ))
        })
    }
}

/// Clip a response body for an error message. Panels serve non-ASCII error
/// pages, so the cut must land on a char boundary, not a byte index.
fn clip_body(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
