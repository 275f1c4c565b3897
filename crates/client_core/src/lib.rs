use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, COOKIE},
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use shared::{
    error::{ApiError, ErrorBody},
    protocol::{
        BreedDetail, BreedListResponse, CompareResult, HistoryEntry, HistoryResponse,
        PredictionResult, SessionStatus, StatsSnapshot,
    },
};
use tracing::{debug, info};
use url::Url;

pub mod compare;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod explore;
pub mod intake;
pub mod loader;
pub mod page;
pub mod render;
pub mod report;
pub mod session;
pub mod workflow;

pub use config::ClientSettings;
pub use error::{ClientError, ClientResult, ErrorCategory};
pub use intake::{ImageFile, IntakeSource};
pub use page::PredictionPage;
pub use workflow::{WorkflowController, WorkflowEffect, WorkflowState};

/// Outcome of one classification request that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    Ready(Box<PredictionResult>),
    /// The server answered with an `error` field (bad image, missing upload, ...).
    Rejected(String),
    /// 401: the user must log in first.
    Unauthorized,
}

/// Every server boundary the page controllers consume.
#[async_trait]
pub trait GovanshApi: Send + Sync {
    async fn session_status(&self) -> ClientResult<SessionStatus>;
    async fn history(&self) -> ClientResult<Vec<HistoryEntry>>;
    async fn stats(&self) -> ClientResult<StatsSnapshot>;
    async fn predict(&self, image: ImageFile) -> ClientResult<PredictOutcome>;
    async fn compare(&self, breed1: &str, breed2: &str) -> ClientResult<CompareResult>;
    async fn breeds(&self) -> ClientResult<BreedListResponse>;
    async fn breed(&self, name: &str) -> ClientResult<BreedDetail>;
}

pub struct GovanshClient {
    http: Client,
    base_url: Url,
}

impl GovanshClient {
    pub fn new(settings: &ClientSettings) -> ClientResult<Self> {
        let base_url = Url::parse(&settings.server_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = &settings.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|_| ClientError::Selection("session cookie is not a valid header".into()))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Joins `segments` onto the base url, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let url = self.endpoint(segments);
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }
}

/// Maps a response onto the server's conventions: 401 means logged out, an
/// `{"error": ..}` body means a domain failure, anything else must decode as `T`.
async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    let bytes = response.bytes().await?;
    let error_body = serde_json::from_slice::<ErrorBody>(&bytes).ok();

    if !status.is_success() {
        return Err(match error_body {
            Some(body) => ApiError::from_body(status.as_u16(), body).into(),
            None => ClientError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            },
        });
    }
    if let Some(body) = error_body {
        return Err(ClientError::Domain(body.error));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl GovanshApi for GovanshClient {
    async fn session_status(&self) -> ClientResult<SessionStatus> {
        self.get_json(&["api", "me"]).await
    }

    async fn history(&self) -> ClientResult<Vec<HistoryEntry>> {
        let body: HistoryResponse = self.get_json(&["api", "history"]).await?;
        Ok(body.history)
    }

    async fn stats(&self) -> ClientResult<StatsSnapshot> {
        self.get_json(&["api", "stats"]).await
    }

    async fn predict(&self, image: ImageFile) -> ClientResult<PredictOutcome> {
        let size_bytes = image.len();
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.name.clone())
            .mime_str(&image.mime_type)?;
        let form = Form::new().part("image", part);

        let url = self.endpoint(&["predict"]);
        info!(file = %image.name, size_bytes, "submitting image for classification");
        let response = self.http.post(url).multipart(form).send().await?;

        match read_json::<PredictionResult>(response).await {
            Ok(result) => {
                info!(
                    prediction_id = %result.prediction_id,
                    breed = %result.breed,
                    confidence = result.confidence,
                    "classification received"
                );
                Ok(PredictOutcome::Ready(Box::new(result)))
            }
            Err(ClientError::Unauthorized) => Ok(PredictOutcome::Unauthorized),
            Err(ClientError::Domain(message)) => Ok(PredictOutcome::Rejected(message)),
            Err(err) => Err(err),
        }
    }

    async fn compare(&self, breed1: &str, breed2: &str) -> ClientResult<CompareResult> {
        self.get_json(&["api", "compare", breed1, breed2]).await
    }

    async fn breeds(&self) -> ClientResult<BreedListResponse> {
        self.get_json(&["api", "breeds"]).await
    }

    async fn breed(&self, name: &str) -> ClientResult<BreedDetail> {
        self.get_json(&["api", "breed", name]).await
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
