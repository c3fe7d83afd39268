use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use rust_decimal::Decimal;

use crate::domain::{ClientError, DiscountType, Offer, OfferDraft, OfferValidation, OfferValidator};
use crate::interface_adapters::clients::{ApiClient, decode};
use crate::interface_adapters::protocol::{OfferCreated, OrderValueRequest, Outcome, UsageCount};

// Offers resource. Reads are public; admin writes send the token when set.
#[derive(Clone)]
pub struct OffersClient {
    api: ApiClient,
}

impl OffersClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Offer>, ClientError> {
        self.api.get("/offers", &[]).await
    }

    // Storefront banner offers; an unreachable backend shows none.
    pub async fn active(&self) -> Vec<Offer> {
        match self.api.get("/offers/active", &[]).await {
            Ok(offers) => offers,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load active offers");
                Vec::new()
            }
        }
    }

    pub async fn get(&self, id: u64) -> Result<Offer, ClientError> {
        self.api.get(&format!("/offers/{id}"), &[]).await
    }

    pub async fn create(&self, draft: &OfferDraft) -> Result<u64, ClientError> {
        let created: OfferCreated = self.api.send(Method::POST, "/offers", Some(draft)).await?;
        Ok(created.id)
    }

    pub async fn update(&self, id: u64, draft: &OfferDraft) -> Result<(), ClientError> {
        let _: Outcome = self
            .api
            .send(Method::PUT, &format!("/offers/{id}"), Some(draft))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> Result<(), ClientError> {
        let _: Outcome = self
            .api
            .send::<(), _>(Method::DELETE, &format!("/offers/{id}"), None)
            .await?;
        Ok(())
    }

    // Records one redemption; returns the new usage count.
    pub async fn increment_usage(&self, id: u64) -> Result<u32, ClientError> {
        let usage: UsageCount = self
            .api
            .send::<(), _>(Method::POST, &format!("/offers/{id}/increment"), None)
            .await?;
        Ok(usage.used_count)
    }

    // The validate route only echoes the offer's identity; pull the full
    // definition so discounts can be computed locally.
    async fn complete(&self, offer: Offer) -> Offer {
        let needs_definition =
            offer.discount_type != DiscountType::FreeDelivery && offer.discount_value.is_zero();
        let Some(id) = offer.id.filter(|_| needs_definition) else {
            return offer;
        };

        match self.get(id).await {
            Ok(full) => full,
            Err(err) => {
                tracing::warn!(offer_id = id, error = %err, "failed to load offer definition");
                offer
            }
        }
    }
}

#[async_trait]
impl OfferValidator for OffersClient {
    async fn validate(
        &self,
        code: &str,
        order_value: Decimal,
    ) -> Result<OfferValidation, ClientError> {
        let url = self.api.url(&format!("/offers/validate/{code}"), &[])?;
        let response = self
            .api
            .request(Method::POST, url)
            .json(&OrderValueRequest { order_value })
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        // Rejected codes come back as 400 with a regular verdict body.
        let mut validation: OfferValidation = if response.status() == StatusCode::BAD_REQUEST {
            response
                .json()
                .await
                .map_err(|err| ClientError::Decode(err.to_string()))?
        } else {
            decode(response).await?
        };

        if validation.valid {
            if let Some(offer) = validation.offer.take() {
                validation.offer = Some(self.complete(offer).await);
            }
        }
        Ok(validation)
    }
}
