use async_trait::async_trait;
use reqwest::Method;

use crate::domain::{ClientError, ProductId, WishlistBackend, WishlistItem};
use crate::interface_adapters::clients::ApiClient;
use crate::interface_adapters::protocol::{
    PhoneRequest, WishlistEnvelope, WishlistItemRequest, products_from_rows,
};

// Wishlist resource, keyed by the shopper's phone number.
#[derive(Clone)]
pub struct WishlistClient {
    api: ApiClient,
}

impl WishlistClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn send_checked<B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<WishlistEnvelope, ClientError> {
        let envelope: WishlistEnvelope = self.api.send(method, path, Some(body)).await?;
        envelope.outcome.check()?;
        Ok(envelope)
    }
}

#[async_trait]
impl WishlistBackend for WishlistClient {
    async fn fetch(&self, phone: &str) -> Result<Vec<WishlistItem>, ClientError> {
        let envelope: WishlistEnvelope = self.api.get("/wishlist", &[("phone", phone)]).await?;
        envelope.outcome.check()?;
        products_from_rows(envelope.wishlist)
    }

    async fn add(&self, phone: &str, product_id: ProductId) -> Result<bool, ClientError> {
        let envelope = self
            .send_checked(
                Method::POST,
                "/wishlist/add",
                &WishlistItemRequest { phone, product_id },
            )
            .await?;
        Ok(envelope.already_exists)
    }

    async fn remove(&self, phone: &str, product_id: ProductId) -> Result<(), ClientError> {
        self.send_checked(
            Method::DELETE,
            "/wishlist/remove",
            &WishlistItemRequest { phone, product_id },
        )
        .await?;
        Ok(())
    }

    async fn clear(&self, phone: &str) -> Result<(), ClientError> {
        self.send_checked(Method::DELETE, "/wishlist/clear", &PhoneRequest { phone })
            .await?;
        Ok(())
    }

    async fn contains(&self, phone: &str, product_id: ProductId) -> Result<bool, ClientError> {
        let envelope: WishlistEnvelope = self
            .api
            .get(&format!("/wishlist/check/{product_id}"), &[("phone", phone)])
            .await?;
        envelope.outcome.check()?;
        Ok(envelope.in_wishlist)
    }
}
