use std::{marker::PhantomData, time::Duration};

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Entity, NodeGroup, SubscribeSummary},
    protocol::{BatchDeleteRequest, DeleteRequest, Envelope, Filters, PageResult, Pagination},
};
use tracing::debug;
use url::Url;

pub mod error;
pub mod resources;

pub use error::ClientError;
pub use resources::{Coupons, Documents, Nodes, Resource, SubscribeGroups, Users};

/// Page size used when a lookup list should come back in one response.
pub const LOOKUP_PAGE_SIZE: u32 = 9999;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub token: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct AdminClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_options(base_url, ClientOptions::default())
    }

    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> ClientResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| ClientError::Request {
            url: base_url.clone(),
            source,
        })?;

        Ok(Self {
            http,
            base_url,
            token: options.token.filter(|token| !token.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient {
            client: self.clone(),
            _resource: PhantomData,
        }
    }

    /// Subscription plans, used as coupon filter options.
    pub async fn list_subscribes(
        &self,
        pagination: Pagination,
    ) -> ClientResult<PageResult<SubscribeSummary>> {
        let url = self.endpoint("subscribe/list");
        let builder = self.request(Method::GET, &url).query(&pagination);
        Ok(self.execute(url, builder).await?.unwrap_or_default())
    }

    pub async fn list_node_groups(&self) -> ClientResult<Vec<NodeGroup>> {
        let url = self.endpoint("server/group/list");
        let builder = self.request(Method::GET, &url);
        let page: PageResult<NodeGroup> = self.execute(url, builder).await?.unwrap_or_default();
        Ok(page.list)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/admin/{path}", self.base_url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, url, "admin api request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        url: String,
        builder: RequestBuilder,
    ) -> ClientResult<Option<T>> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(source) => return Err(ClientError::Request { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { url, status });
        }

        let envelope: Envelope<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(source) => return Err(ClientError::Request { url, source }),
        };
        envelope
            .into_result()
            .map_err(|err| ClientError::Api(err.into()))
    }
}

type RowId<R> = <<R as Resource>::Row as Entity>::Id;

/// Typed list/create/update/delete calls for one admin resource.
pub struct ResourceClient<R> {
    client: AdminClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn path(&self) -> &'static str {
        R::PATH
    }

    pub async fn list(
        &self,
        pagination: Pagination,
        filters: &Filters,
    ) -> ClientResult<PageResult<R::Row>> {
        let url = self.client.endpoint(&format!("{}/list", R::PATH));
        let builder = self
            .client
            .request(Method::GET, &url)
            .query(&pagination)
            .query(filters);
        Ok(self.client.execute(url, builder).await?.unwrap_or_default())
    }

    /// Lists without paging parameters, for resources the server returns in one piece.
    pub async fn list_all(&self) -> ClientResult<PageResult<R::Row>> {
        let url = self.client.endpoint(&format!("{}/list", R::PATH));
        let builder = self.client.request(Method::GET, &url);
        Ok(self.client.execute(url, builder).await?.unwrap_or_default())
    }

    pub async fn create(&self, payload: &R::Create) -> ClientResult<()> {
        let url = self.client.endpoint(&format!("{}/", R::PATH));
        let builder = self.client.request(Method::POST, &url).json(payload);
        self.client
            .execute::<serde_json::Value>(url, builder)
            .await
            .map(drop)
    }

    pub async fn update(&self, payload: &R::Update) -> ClientResult<()> {
        let url = self.client.endpoint(&format!("{}/", R::PATH));
        let builder = self.client.request(Method::PUT, &url).json(payload);
        self.client
            .execute::<serde_json::Value>(url, builder)
            .await
            .map(drop)
    }

    pub async fn delete(&self, id: RowId<R>) -> ClientResult<()> {
        let url = self.client.endpoint(&format!("{}/", R::PATH));
        let builder = self
            .client
            .request(Method::DELETE, &url)
            .json(&DeleteRequest { id });
        self.client
            .execute::<serde_json::Value>(url, builder)
            .await
            .map(drop)
    }

    pub async fn batch_delete(&self, ids: &[RowId<R>]) -> ClientResult<()> {
        let url = self.client.endpoint(&format!("{}/batch", R::PATH));
        let builder = self
            .client
            .request(Method::DELETE, &url)
            .json(&BatchDeleteRequest { ids: ids.to_vec() });
        self.client
            .execute::<serde_json::Value>(url, builder)
            .await
            .map(drop)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
