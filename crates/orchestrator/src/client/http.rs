//! HTTP client for the dependency services.

use async_trait::async_trait;
use domain::{
    Address, Card, Customer, Dependency, Item, OrderError, PaymentRequest, PaymentResponse,
    Shipment, Snapshot, extract_id,
};
use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::ResourceClient;

const HAL_OR_JSON: &str = "application/hal+json, application/json";

/// Resource client backed by a shared `reqwest` connection pool.
///
/// Understands both plain JSON and HAL responses. Calls are not retried.
#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    http: reqwest::Client,
}

impl HttpResourceClient {
    /// Creates a client that connects to services directly.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_proxy(None)
    }

    /// Creates a client that routes every request through an HTTP proxy.
    ///
    /// `proxy` is a URL such as `http://proxy:3128`.
    pub fn with_proxy(proxy: Option<&str>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(url) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(url)?);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        dependency: Dependency,
        url: &str,
    ) -> Result<T, OrderError> {
        tracing::debug!(%dependency, %url, "requesting resource");
        let response = self
            .http
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(HAL_OR_JSON))
            .send()
            .await
            .map_err(|e| OrderError::dependency(dependency, url, e))?;

        decode(dependency, url, response).await
    }

    async fn get_snapshot<T>(&self, dependency: Dependency, url: &str) -> Result<T, OrderError>
    where
        T: DeserializeOwned + Snapshot,
    {
        let resource: HalResource<T> = self.get_json(dependency, url).await?;
        Ok(resource.into_snapshot())
    }

    async fn post_json<B, T>(
        &self,
        dependency: Dependency,
        url: &str,
        body: &B,
    ) -> Result<T, OrderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(%dependency, %url, "posting resource");
        let response = self
            .http
            .post(url)
            .header(ACCEPT, HeaderValue::from_static(HAL_OR_JSON))
            .json(body)
            .send()
            .await
            .map_err(|e| OrderError::dependency(dependency, url, e))?;

        decode(dependency, url, response).await
    }
}

async fn decode<T: DeserializeOwned>(
    dependency: Dependency,
    url: &str,
    response: reqwest::Response,
) -> Result<T, OrderError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| OrderError::dependency(dependency, url, e))?;

    if !status.is_success() {
        let text = String::from_utf8_lossy(&body);
        tracing::error!(%dependency, %url, %status, body = %text, "dependency returned an error");
        return Err(OrderError::dependency(
            dependency,
            url,
            format!("{status} - {text}"),
        ));
    }

    serde_json::from_slice(&body).map_err(|e| {
        OrderError::dependency(dependency, url, format!("malformed response body: {e}"))
    })
}

/// A single resource, optionally wrapped with HAL links.
#[derive(Debug, Deserialize)]
struct HalResource<T> {
    #[serde(flatten)]
    content: T,
    #[serde(rename = "_links", default)]
    links: Option<HalLinks>,
}

#[derive(Debug, Deserialize)]
struct HalLinks {
    #[serde(rename = "self", default)]
    self_link: Option<HalLink>,
}

#[derive(Debug, Deserialize)]
struct HalLink {
    href: String,
}

impl<T: Snapshot> HalResource<T> {
    /// Unwraps the resource, taking its ID from the `self` link when the body has none.
    fn into_snapshot(self) -> T {
        let mut content = self.content;
        if content.id().is_empty()
            && let Some(id) = self
                .links
                .and_then(|links| links.self_link)
                .and_then(|link| extract_id(&link.href).ok())
        {
            content.set_id(id);
        }
        content
    }
}

/// An items collection, either a bare array or a HAL `_embedded` collection.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemsPayload {
    Plain(Vec<Item>),
    Hal {
        #[serde(rename = "_embedded")]
        embedded: EmbeddedItems,
    },
}

#[derive(Debug, Deserialize)]
struct EmbeddedItems {
    #[serde(default)]
    items: Vec<Item>,
}

impl From<ItemsPayload> for Vec<Item> {
    fn from(payload: ItemsPayload) -> Self {
        match payload {
            ItemsPayload::Plain(items) => items,
            ItemsPayload::Hal { embedded } => embedded.items,
        }
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn fetch_address(&self, reference: &str) -> Result<Address, OrderError> {
        self.get_snapshot(Dependency::Address, reference).await
    }

    async fn fetch_customer(&self, reference: &str) -> Result<Customer, OrderError> {
        self.get_snapshot(Dependency::Customer, reference).await
    }

    async fn fetch_card(&self, reference: &str) -> Result<Card, OrderError> {
        self.get_snapshot(Dependency::Card, reference).await
    }

    async fn fetch_items(&self, reference: &str) -> Result<Vec<Item>, OrderError> {
        let payload: ItemsPayload = self.get_json(Dependency::Items, reference).await?;
        Ok(payload.into())
    }

    async fn post_payment(
        &self,
        endpoint: &str,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, OrderError> {
        self.post_json(Dependency::Payment, endpoint, request).await
    }

    async fn post_shipment(
        &self,
        endpoint: &str,
        shipment: &Shipment,
    ) -> Result<Shipment, OrderError> {
        self.post_json(Dependency::Shipping, endpoint, shipment).await
    }
}
