use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{NewProperty, Property, PropertyId},
    error::{ErrorBody, RecordError},
    protocol::{CreatePropertyResponse, PropertyList, PROPERTIES_PATH},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::RecordService;

/// Talks to the listings backend over `GET`/`POST /properties`.
pub struct HttpRecordService {
    http: Client,
    base_url: Url,
}

impl HttpRecordService {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid server url '{base_url}'"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "unsupported server url scheme '{}': expected http or https",
                base_url.scheme()
            );
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn properties_url(&self) -> String {
        format!(
            "{}{PROPERTIES_PATH}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn list_properties(&self) -> Result<Vec<Property>, RecordError> {
        let url = self.properties_url();
        debug!(%url, "requesting property list");
        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let list: PropertyList = response
            .json()
            .await
            .map_err(|err| RecordError::service(format!("malformed property list: {err}")))?;
        let properties = list.into_vec();
        debug!(count = properties.len(), "property list received");
        Ok(properties)
    }

    async fn create_property(&self, property: &NewProperty) -> Result<PropertyId, RecordError> {
        let url = self.properties_url();
        let response = self
            .http
            .post(&url)
            .json(property)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: CreatePropertyResponse = response
            .json()
            .await
            .map_err(|err| RecordError::service(format!("malformed create response: {err}")))?;
        info!(property_id = body.id.0, %url, "property created");
        Ok(body.id)
    }
}

fn transport_error(err: reqwest::Error) -> RecordError {
    warn!(error = %err, "listings backend unreachable");
    RecordError::service(err.to_string())
}

async fn error_from_response(response: Response) -> RecordError {
    let status = response.status();
    let raw = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&raw)
        .ok()
        .map(|body| body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            if raw.trim().is_empty() {
                status.to_string()
            } else {
                raw.trim().to_string()
            }
        });

    warn!(%status, %message, "listings backend returned an error");
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => RecordError::Rejected(message),
        // The reference backend reports its own field checks as 500s.
        StatusCode::INTERNAL_SERVER_ERROR if is_field_rejection(&message) => {
            RecordError::Rejected(message)
        }
        _ => RecordError::Service(format!("{status}: {message}")),
    }
}

const FIELD_REJECTION_MARKERS: [&str; 2] = ["cannot be empty", "is required"];

fn is_field_rejection(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    FIELD_REJECTION_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

#[cfg(test)]
#[path = "../tests/http_tests.rs"]
mod tests;
