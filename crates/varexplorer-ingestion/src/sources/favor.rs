//! FAVOR (Functional Annotation of Variants Online Resource) client.
//!
//! Endpoint: https://api.genohub.org/v1/rsids/{rsid}
//! Returns a one-element list of annotation mappings per rsID.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;
use varexplorer_common::sandbox::SandboxClient as Client;

use super::FunctionalAnnotationSource;

pub const FAVOR_API_URL: &str = "https://api.genohub.org/v1";

pub struct FavorClient {
    client: Client,
    base_url: String,
}

impl FavorClient {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_parts(Client::new()?, FAVOR_API_URL))
    }

    /// Client against a custom base URL; its host is added to the allowlist.
    pub fn with_base_url(base_url: &str, mut client: Client) -> anyhow::Result<Self> {
        client.allow_url_host(base_url)?;
        Ok(Self::from_parts(client, base_url))
    }

    pub fn from_parts(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base}/rsids/{rsid}`, with the identifier percent-encoded as one path segment.
    pub fn annotation_url(&self, rsid: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("FAVOR base URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["rsids", rsid]);
        Ok(url)
    }
}

#[async_trait]
impl FunctionalAnnotationSource for FavorClient {
    #[instrument(skip(self))]
    async fn fetch_annotation(&self, rsid: &str) -> anyhow::Result<Option<Value>> {
        let url = self.annotation_url(rsid)?;
        debug!(%url, "Requesting FAVOR annotation");

        let resp = self.client.get(url.as_str())?.send().await?;
        let status = resp.status();
        debug!(status = status.as_u16(), "FAVOR responded");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("FAVOR API returned status {}", status);
        }

        let payload = resp.json::<Value>().await?;
        Ok(Some(payload))
    }
}
