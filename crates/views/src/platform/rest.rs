#![forbid(unsafe_code)]

//! REST client for the platform's `graphs/views` and inventory tables.

use super::ViewsPlatform;
use crate::domain::{IdentityEntry, ViewDocument};
use crate::error::Error;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, trace};

const TOKEN_HEADER: &str = "x-api-token";
const VIEWS: &str = "graphs/views";
const DISCOVERY_HISTORY: &str = "tables/inventory/discovery-history";
const DEVICES: &str = "tables/inventory/devices";

pub struct RestPlatform {
    client: reqwest::Client,
    api_url: String,
    snapshot_id: String,
    create_status: Option<u16>,
    delete_status: Option<u16>,
}

/// Body of every table endpoint.
#[derive(Debug, Deserialize)]
struct Table<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct DeviceRecord {
    sn: Option<String>,
    hostname: Option<String>,
}

impl DeviceRecord {
    fn into_entry(self) -> Option<IdentityEntry> {
        match (self.sn, self.hostname) {
            (Some(serial), Some(hostname)) if !serial.is_empty() && !hostname.is_empty() => {
                Some(IdentityEntry { serial, hostname })
            }
            record => {
                debug!(?record, "skipping device record without serial or hostname");
                None
            }
        }
    }
}

impl RestPlatform {
    pub fn new(config: &config::Platform) -> Result<Self, Error> {
        let mut token = HeaderValue::from_str(&config.token)?;
        token.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url(&config.url, &config.api_version),
            snapshot_id: config.snapshot_id.clone(),
            create_status: config.create_status,
            delete_status: config.delete_status,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_url)
    }

    async fn table(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Vec<IdentityEntry>, Error> {
        let response = self.client.post(self.endpoint(path)).json(&body).send().await?;
        let table: Table<DeviceRecord> = parse_response("table query", response).await?;
        trace!(path, rows = table.data.len(), "table fetched");
        Ok(table
            .data
            .into_iter()
            .filter_map(DeviceRecord::into_entry)
            .collect())
    }
}

#[async_trait]
impl ViewsPlatform for RestPlatform {
    async fn list_views(&self) -> Result<Vec<ViewDocument>, Error> {
        let response = self.client.get(self.endpoint(VIEWS)).send().await?;
        parse_response("list views", response).await
    }

    async fn create_view(&self, view: &ViewDocument) -> Result<(), Error> {
        let response = self.client.post(self.endpoint(VIEWS)).json(view).send().await?;
        ensure_status("create view", self.create_status, response).await?;
        Ok(())
    }

    async fn delete_view(&self, id: &str) -> Result<(), Error> {
        let response = self
            .client
            .delete(self.endpoint(&format!("{VIEWS}/{id}")))
            .send()
            .await?;
        ensure_status("delete view", self.delete_status, response).await?;
        Ok(())
    }

    async fn discovery_history(&self) -> Result<Vec<IdentityEntry>, Error> {
        self.table(DISCOVERY_HISTORY, json!({ "columns": ["sn", "hostname"] }))
            .await
    }

    async fn inventory(&self) -> Result<Vec<IdentityEntry>, Error> {
        let body = json!({
            "columns": ["hostname", "sn"],
            "snapshot": self.snapshot_id,
        });
        self.table(DEVICES, body).await
    }
}

fn api_url(url: &str, api_version: &str) -> String {
    format!(
        "{}/api/{}",
        url.trim_end_matches('/'),
        api_version.trim_matches('/')
    )
}

/// Check the status against `expected`, or any 2xx when unset.
async fn ensure_status(
    action: &'static str,
    expected: Option<u16>,
    response: reqwest::Response,
) -> Result<reqwest::Response, Error> {
    let status = response.status();
    let accepted = match expected {
        Some(code) => status.as_u16() == code,
        None => status.is_success(),
    };
    if !accepted {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(Error::UnexpectedStatus {
            action,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

async fn parse_response<T: DeserializeOwned>(
    action: &'static str,
    response: reqwest::Response,
) -> Result<T, Error> {
    let response = ensure_status(action, None, response).await?;
    Ok(response.json::<T>().await?)
}
