use serde::Deserialize;
use std::time::Duration;

use crate::api::error;
use crate::modules::media::model::AssetRef;
use crate::modules::media::store::{MediaKind, MediaStore};

/// Client for the remote object-storage provider. Uploads go to
/// `POST {base}/{kind}/upload`, removals to `DELETE {base}/{kind}/{id}`.
/// Constructed once at startup and shared by reference; every call carries
/// the configured timeout.
#[derive(Clone)]
pub struct HttpMediaStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct UploadTicket {
    asset_id: String,
    url: String,
}

impl HttpMediaStore {
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, error::SystemError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| error::SystemError::upload_failure(e.to_string()))?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), api_key })
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        format!("{}/{}/upload", self.base_url, kind.as_segment())
    }

    fn asset_url(&self, kind: MediaKind, asset_id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.as_segment(), asset_id)
    }
}

#[async_trait::async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        kind: MediaKind,
    ) -> Result<AssetRef, error::SystemError> {
        let response = self
            .client
            .post(self.upload_url(kind))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| error::SystemError::upload_failure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error::SystemError::upload_failure(format!(
                "media store returned {}",
                response.status()
            )));
        }

        let ticket: UploadTicket = response
            .json()
            .await
            .map_err(|e| error::SystemError::upload_failure(e.to_string()))?;

        Ok(AssetRef { asset_id: ticket.asset_id, url: ticket.url })
    }

    async fn remove(&self, asset_id: &str, kind: MediaKind) -> Result<(), error::SystemError> {
        let response = self
            .client
            .delete(self.asset_url(kind, asset_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| error::SystemError::cleanup_failure(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error::SystemError::cleanup_failure(format!(
                "media store returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
