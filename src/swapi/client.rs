//! HTTP client for SWAPI.

use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Duration;
use tracing::{debug, info};

use super::types::{Category, SearchResponse};
use super::ResourceSource;
use crate::{Entity, Error, Result, TARGET_WEB_REQUEST};

#[derive(Debug, Clone)]
pub struct SwapiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SwapiClient {
    /// Creates a client for `endpoint`, e.g. `https://swapi.dev/api`. Every
    /// request fails after `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        if !is_valid_url(endpoint) {
            return Err(Error::InvalidEndpoint(endpoint.to_string()));
        }

        let client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Network {
                url: endpoint.to_string(),
                source,
            })?;

        debug!(target: TARGET_WEB_REQUEST, "Created SWAPI client for {}", endpoint);

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn category_url(&self, category: Category) -> String {
        format!("{}/{}/", self.endpoint, category)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!(target: TARGET_WEB_REQUEST, "GET {} {:?}", url, query);

        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| Error::Network {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| Error::Parse {
            context: format!("response from {}", url),
            source,
        })
    }
}

impl ResourceSource for SwapiClient {
    async fn get_resource(&self, locator: &str) -> Result<Entity> {
        match self.get_json::<Value>(locator, &[]).await? {
            Value::Object(entity) => Ok(entity),
            _ => Err(Error::Shape(format!("{} (expected an object)", locator))),
        }
    }

    async fn search(&self, category: Category, query: &str) -> Result<Entity> {
        let url = self.category_url(category);
        let response: SearchResponse = self.get_json(&url, &[("search", query)]).await?;

        info!(
            target: TARGET_WEB_REQUEST,
            "Search {} '{}' matched {} record(s)",
            category,
            query,
            response.count.unwrap_or(response.results.len() as u64)
        );

        match response.results.into_iter().next() {
            Some(Value::Object(entity)) => Ok(entity),
            Some(_) => Err(Error::Shape(format!("{}?search={} results/0", url, query))),
            None => Err(Error::NotFound {
                category: category.to_string(),
                query: query.to_string(),
            }),
        }
    }

    fn resource_locator(&self, category: Category, id: u32) -> String {
        format!("{}{}/", self.category_url(category), id)
    }
}

/// Helper function to validate a URL
pub fn is_valid_url(url: &str) -> bool {
    if let Ok(parsed) = url::Url::parse(url) {
        parsed.scheme() == "http" || parsed.scheme() == "https"
    } else {
        false
    }
}
