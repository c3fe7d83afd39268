use async_trait::async_trait;
use reqwest::Method;

use crate::domain::{CartBackend, CartItem, ClientError, ProductId};
use crate::interface_adapters::clients::{ApiClient, send_json};
use crate::interface_adapters::protocol::{CartEnvelope, CartItemRequest, ProductRow};

// Cart resource; every call needs the shopper's token.
#[derive(Clone)]
pub struct CartClient {
    api: ApiClient,
}

impl CartClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<CartItemRequest>,
    ) -> Result<CartEnvelope, ClientError> {
        let url = self.api.url(path, &[])?;
        let mut request = self.api.authed(method, url)?;
        if let Some(body) = &body {
            request = request.json(body);
        }

        let envelope: CartEnvelope = send_json(request).await?;
        envelope.outcome.check()?;
        Ok(envelope)
    }
}

#[async_trait]
impl CartBackend for CartClient {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ClientError> {
        let envelope = self.call(Method::GET, "/cart", None).await?;
        envelope
            .cart
            .into_iter()
            .map(ProductRow::into_cart_item)
            .collect()
    }

    async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<(), ClientError> {
        self.call(
            Method::POST,
            "/cart/add",
            Some(CartItemRequest {
                product_id,
                quantity,
            }),
        )
        .await?;
        Ok(())
    }

    async fn remove_item(&self, product_id: ProductId) -> Result<(), ClientError> {
        self.call(Method::DELETE, &format!("/cart/remove/{product_id}"), None)
            .await?;
        Ok(())
    }

    async fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        self.call(
            Method::PUT,
            "/cart/update",
            Some(CartItemRequest {
                product_id,
                quantity,
            }),
        )
        .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        self.call(Method::DELETE, "/cart/clear", None).await?;
        Ok(())
    }
}
