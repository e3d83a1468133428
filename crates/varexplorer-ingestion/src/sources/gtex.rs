//! GTEx (Genotype-Tissue Expression) REST API v2 client.
//! Used for fetching single-tissue eQTL associations for a variant.
//!
//! Two calls per rsID:
//!   1. /dataset/variant resolves the rsID to a GTEx variantId
//!   2. /association/singleTissueEqtl pages the associations for that variantId

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};
use varexplorer_common::sandbox::SandboxClient as Client;

use super::ExpressionSource;

pub const GTEX_API_URL: &str = "https://gtexportal.org/api/v2";

/// Request parameters for the GTEx client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GtexSettings {
    pub base_url: String,
    pub dataset_id: String,
    pub items_per_page: u32,
}

impl Default for GtexSettings {
    fn default() -> Self {
        Self {
            base_url: GTEX_API_URL.to_string(),
            dataset_id: "gtex_v8".to_string(),
            items_per_page: 250,
        }
    }
}

pub struct GtexClient {
    client: Client,
    settings: GtexSettings,
}

impl GtexClient {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self { client: Client::new()?, settings: GtexSettings::default() })
    }

    /// Client with custom settings; the base URL host is added to the allowlist.
    pub fn with_settings(mut settings: GtexSettings, mut client: Client) -> anyhow::Result<Self> {
        client.allow_url_host(&settings.base_url)?;
        settings.base_url = settings.base_url.trim_end_matches('/').to_string();
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &GtexSettings {
        &self.settings
    }

    /// Resolve an rsID to a GTEx variantId, e.g. `chr19_44908684_T_C_b38`.
    /// Returns None if the rsID is not in the dataset.
    #[instrument(skip(self))]
    pub async fn lookup_variant_id(&self, rsid: &str) -> anyhow::Result<Option<String>> {
        let url = format!("{}/dataset/variant", self.settings.base_url);

        let resp = self.client
            .get(&url)?
            .query(&[
                ("snpId", rsid),
                ("datasetId", self.settings.dataset_id.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("GTEx lookup failed with {}", resp.status());
        }

        let body = resp.json::<Value>().await?;
        let variant_id = extract_variant_id(&body);
        debug!(?variant_id, "GTEx variant lookup");
        Ok(variant_id)
    }

    /// Fetch the first page of single-tissue eQTL associations for a variantId.
    #[instrument(skip(self))]
    pub async fn get_single_tissue_eqtls(&self, variant_id: &str) -> anyhow::Result<Value> {
        let url = format!("{}/association/singleTissueEqtl", self.settings.base_url);
        let page_size = self.settings.items_per_page.to_string();

        let resp = self.client
            .get(&url)?
            .query(&[
                ("variantId", variant_id),
                ("datasetId", self.settings.dataset_id.as_str()),
                ("page", "0"),
                ("itemsPerPage", page_size.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("GTEx eQTL fetch failed with {}", resp.status());
        }

        Ok(resp.json::<Value>().await?)
    }
}

#[async_trait]
impl ExpressionSource for GtexClient {
    async fn fetch_associations(&self, rsid: &str) -> anyhow::Result<Option<Value>> {
        let Some(variant_id) = self.lookup_variant_id(rsid).await? else {
            debug!(rsid, dataset = %self.settings.dataset_id, "rsID not found in GTEx");
            return Ok(None);
        };

        let body = self.get_single_tissue_eqtls(&variant_id).await?;
        let payload = assemble_payload(rsid, &variant_id, &body);

        debug!(
            count = payload["eqtl_results"].as_array().map_or(0, |a| a.len()),
            "GTEx eQTL associations fetched"
        );
        Ok(Some(payload))
    }
}

fn extract_variant_id(body: &Value) -> Option<String> {
    body["data"]
        .as_array()?
        .first()?["variantId"]
        .as_str()
        .map(String::from)
}

/// Shape the association response into the payload the adapter expects.
fn assemble_payload(rsid: &str, variant_id: &str, body: &Value) -> Value {
    let results = body.get("data").cloned().unwrap_or_else(|| json!([]));
    let paging = body.get("paging_info").cloned().unwrap_or_else(|| json!({}));
    json!({
        "rsid": rsid,
        "variantId": variant_id,
        "eqtl_results": results,
        "paging": paging,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_variant_id() {
        let body = json!({ "data": [{ "variantId": "chr19_44908684_T_C_b38", "snpId": "rs429358" }] });
        assert_eq!(extract_variant_id(&body).as_deref(), Some("chr19_44908684_T_C_b38"));
    }

    #[test]
    fn test_extract_variant_id_not_found() {
        assert!(extract_variant_id(&json!({ "data": [] })).is_none());
        assert!(extract_variant_id(&json!({})).is_none());
    }

    #[test]
    fn test_assemble_payload() {
        let body = json!({
            "data": [{ "geneSymbol": "TOMM40", "pValue": 4.75e-5 }],
            "paging_info": { "numberOfPages": 1 }
        });
        let payload = assemble_payload("rs429358", "chr19_44908684_T_C_b38", &body);
        assert_eq!(payload["rsid"], "rs429358");
        assert_eq!(payload["eqtl_results"].as_array().unwrap().len(), 1);
        assert_eq!(payload["paging"]["numberOfPages"], 1);
    }

    #[test]
    fn test_assemble_payload_without_data_is_empty_list() {
        let payload = assemble_payload("rs1", "chr1_1_A_G_b38", &json!({}));
        assert_eq!(payload["eqtl_results"], json!([]));
    }

    #[test]
    fn test_default_settings() {
        let client = GtexClient::new().unwrap();
        assert_eq!(client.settings().dataset_id, "gtex_v8");
        assert_eq!(client.settings().items_per_page, 250);
    }

    #[tokio::test]
    async fn test_disallowed_host_fails_before_network() {
        let settings = GtexSettings { base_url: "https://example.com/api/v2".to_string(), ..Default::default() };
        let client = GtexClient { client: Client::new().unwrap(), settings };
        assert!(client.fetch_associations("rs429358").await.is_err());
    }
}
