use async_trait::async_trait;
use reqwest::Method;

use crate::domain::{ClientError, NewOrder, Order, OrderBackend};
use crate::interface_adapters::clients::{ApiClient, send_json};
use crate::interface_adapters::protocol::{OrderEnvelope, OrderRow};

// Orders resource; every call needs the shopper's token.
#[derive(Clone)]
pub struct OrdersClient {
    api: ApiClient,
}

impl OrdersClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&NewOrder>,
    ) -> Result<OrderEnvelope, ClientError> {
        let url = self.api.url(path, query)?;
        let mut request = self.api.authed(method, url)?;
        if let Some(body) = body {
            request = request.json(body);
        }

        let envelope: OrderEnvelope = send_json(request).await?;
        envelope.outcome.check()?;
        Ok(envelope)
    }
}

fn single(envelope: OrderEnvelope) -> Result<Order, ClientError> {
    envelope
        .order
        .ok_or_else(|| ClientError::Decode("response has no order".to_string()))?
        .into_order()
}

#[async_trait]
impl OrderBackend for OrdersClient {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ClientError> {
        let envelope = self
            .call(Method::POST, "/orders/create", &[], Some(order))
            .await?;
        single(envelope)
    }

    async fn orders_for(&self, phone: &str) -> Result<Vec<Order>, ClientError> {
        let envelope = self
            .call(Method::GET, "/orders", &[("phone", phone)], None)
            .await?;
        envelope
            .orders
            .into_iter()
            .map(OrderRow::into_order)
            .collect()
    }

    async fn order(&self, id: &str) -> Result<Option<Order>, ClientError> {
        match self
            .call(Method::GET, &format!("/orders/{id}"), &[], None)
            .await
        {
            Ok(envelope) => single(envelope).map(Some),
            Err(ClientError::Upstream { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn cancel_order(&self, id: &str) -> Result<Order, ClientError> {
        let envelope = self
            .call(Method::PUT, &format!("/orders/{id}/cancel"), &[], None)
            .await?;
        single(envelope)
    }
}
