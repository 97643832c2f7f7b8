//! HTTP implementation of [`RemoteSync`].

use std::time::Duration;

use tracing::debug;

use super::{Ack, RemoteFailure, RemoteSync};
use crate::models::{wire, Item, Price, Quantity};

/// Client for the list service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Creates a client with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: normalize_base_url(&base_url.into()),
            client,
        })
    }

    /// Returns the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for an endpoint with percent-encoded query parameters.
    pub fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/{}", self.base_url, endpoint);
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Sends a GET and returns the body of a 2xx response.
    async fn get(&self, url: &str) -> Result<String, RemoteFailure> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RemoteFailure::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The status alone decides; a truncated body only loses the reason
            let reason = response.text().await.unwrap_or_default();
            return Err(RemoteFailure::Rejected {
                status: Some(status.as_u16()),
                reason,
            });
        }

        response
            .text()
            .await
            .map_err(|e| RemoteFailure::Unreachable(e.to_string()))
    }
}

impl RemoteSync for HttpRemote {
    async fn fetch_all(&self) -> Result<Vec<Item>, RemoteFailure> {
        let body = self.get(&self.build_url("getItems", &[])).await?;
        wire::decode_items(&body).map_err(|e| RemoteFailure::Rejected {
            status: None,
            reason: e.to_string(),
        })
    }

    async fn create(
        &self,
        name: &str,
        quantity: Quantity,
        price: Price,
    ) -> Result<Ack, RemoteFailure> {
        let quantity = quantity.to_string();
        let price = price.get().to_string();
        let url = self.build_url(
            "addItem",
            &[
                ("itemNameAdd", name),
                ("itemQuantity", quantity.as_str()),
                ("itemPrice", price.as_str()),
            ],
        );
        self.get(&url).await.map(Ack::new)
    }

    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        quantity: Quantity,
        price: Price,
    ) -> Result<Ack, RemoteFailure> {
        let quantity = quantity.to_string();
        let price = price.get().to_string();
        let url = self.build_url(
            "updateItem",
            &[
                ("itemName", old_name),
                ("itemNameUpdate", new_name),
                ("itemQuantity", quantity.as_str()),
                ("itemPrice", price.as_str()),
            ],
        );
        self.get(&url).await.map(Ack::new)
    }

    async fn delete(&self, name: &str) -> Result<Ack, RemoteFailure> {
        let url = self.build_url("deleteItem", &[("itemNameDelete", name)]);
        self.get(&url).await.map(Ack::new)
    }
}

/// Strips trailing slashes and assumes `http://` for bare hosts.
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
