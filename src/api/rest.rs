use super::{BatchStore, Product, ReferenceData};
use crate::libs::batch::{BatchPage, BatchPatch, BatchRecord, NewBatch};
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const BATCH_DETAILS_URL: &str = "api/batch-details";
const PRODUCTS_URL: &str = "api/products";
const EMPLOYEE_PACE_URL: &str = "api/employee-pace";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize, Debug)]
struct CreatedResponse {
    id: i64,
}

#[derive(Deserialize, Debug)]
struct PaceResponse {
    pace_adjustment_factor: f64,
}

/// Client for the batch-details HTTP API.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(msg_error_anyhow!(Message::ApiUrlMissing));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Turns a non-2xx response into an error carrying the server's message.
    async fn check(res: Response, action: &str) -> Result<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(msg_error_anyhow!(Message::StoreRequestFailed {
            action: action.to_string(),
            status: status.as_u16(),
            body: body.trim().to_string(),
        }))
    }
}

impl BatchStore for RestStore {
    async fn list(&self, page: u32, page_size: u32) -> Result<BatchPage> {
        let url = self.url(BATCH_DETAILS_URL);
        tracing::debug!(%url, page, page_size, "fetching batch page");
        let res = self
            .client
            .get(&url)
            .query(&[("page", page), ("rowsPerPage", page_size)])
            .send()
            .await
            .with_context(|| format!("cannot reach {}", url))?;
        let res = Self::check(res, "fetch table data").await?;
        Ok(res.json::<BatchPage>().await?)
    }

    async fn get(&self, id: i64) -> Result<Option<BatchRecord>> {
        let url = format!("{}/{}", self.url(BATCH_DETAILS_URL), id);
        let res = self.client.get(&url).send().await.with_context(|| format!("cannot reach {}", url))?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let res = Self::check(res, "fetch batch").await?;
        Ok(Some(res.json::<BatchRecord>().await?))
    }

    async fn create(&self, batch: &NewBatch) -> Result<i64> {
        let url = self.url(BATCH_DETAILS_URL);
        let res = self
            .client
            .post(&url)
            .json(batch)
            .send()
            .await
            .with_context(|| format!("cannot reach {}", url))?;
        let res = Self::check(res, "submit batch details").await?;
        Ok(res.json::<CreatedResponse>().await?.id)
    }

    async fn update(&self, id: i64, patch: &BatchPatch) -> Result<()> {
        let url = format!("{}/{}", self.url(BATCH_DETAILS_URL), id);
        let res = self
            .client
            .put(&url)
            .json(patch)
            .send()
            .await
            .with_context(|| format!("cannot reach {}", url))?;
        Self::check(res, "update batch details").await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = format!("{}/{}", self.url(BATCH_DETAILS_URL), id);
        let res = self.client.delete(&url).send().await.with_context(|| format!("cannot reach {}", url))?;
        Self::check(res, "delete batch").await?;
        Ok(())
    }
}

impl ReferenceData for RestStore {
    async fn products(&self) -> Result<Vec<Product>> {
        let url = self.url(PRODUCTS_URL);
        let res = self.client.get(&url).send().await.with_context(|| format!("cannot reach {}", url))?;
        let res = Self::check(res, "fetch products").await?;
        Ok(res.json::<Vec<Product>>().await?)
    }

    async fn pace_factor(&self, employee_count: u32) -> Result<Option<f64>> {
        let url = format!("{}/{}", self.url(EMPLOYEE_PACE_URL), employee_count);
        let res = self.client.get(&url).send().await.with_context(|| format!("cannot reach {}", url))?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let res = Self::check(res, "fetch employee pace").await?;
        Ok(Some(res.json::<PaceResponse>().await?.pace_adjustment_factor))
    }
}
