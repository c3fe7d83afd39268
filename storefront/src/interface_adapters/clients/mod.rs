mod addresses;
mod analytics;
mod cart;
mod offers;
mod orders;
mod products;
mod sms;
mod wishlist;

pub use addresses::AddressesClient;
pub use analytics::{AnalyticsClient, SampleAnalytics};
pub use cart::CartClient;
pub use offers::OffersClient;
pub use orders::OrdersClient;
pub use products::ProductsClient;
pub use sms::SmsClient;
pub use wishlist::WishlistClient;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use url::Url;

use crate::domain::ClientError;
use crate::interface_adapters::protocol::Outcome;

// Shared reqwest wrapper for every REST resource the storefront talks to.
// Clones share one token slot, so a login is seen by every resource client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn clear_token(&self) {
        self.set_token(None);
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.base_url, path);
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        parsed.map_err(|err| ClientError::Transport(format!("invalid url {raw}: {err}")))
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // Sends a request whose body must carry a token.
    pub(crate) fn authed(&self, method: Method, url: Url) -> Result<RequestBuilder, ClientError> {
        if !self.has_token() {
            return Err(ClientError::MissingToken);
        }
        Ok(self.request(method, url))
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = self.url(path, query)?;
        send_json(self.request(Method::GET, url)).await
    }

    pub(crate) async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        send_json(request).await
    }
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|err| ClientError::Transport(err.to_string()))?;
    decode(response).await
}

// Keeps the upstream status and message so callers can show the reason.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<Outcome>()
            .await
            .ok()
            .and_then(|outcome| outcome.reason())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
        return Err(ClientError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| ClientError::Decode(err.to_string()))
}
