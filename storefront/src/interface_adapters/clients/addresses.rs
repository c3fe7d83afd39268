use async_trait::async_trait;
use reqwest::Method;

use crate::domain::{Address, AddressBackend, AddressDraft, AddressId, ClientError};
use crate::interface_adapters::clients::ApiClient;
use crate::interface_adapters::protocol::{
    AddressEnvelope, AddressRow, DefaultAddressRequest, NewAddressRequest, Outcome,
};

// Saved addresses under `/users/addresses`, keyed by phone.
#[derive(Clone)]
pub struct AddressesClient {
    api: ApiClient,
}

impl AddressesClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn single(envelope: AddressEnvelope) -> Result<Address, ClientError> {
    envelope.outcome.check()?;
    envelope
        .address
        .ok_or_else(|| ClientError::Decode("response has no address".to_string()))?
        .into_address()
}

#[async_trait]
impl AddressBackend for AddressesClient {
    // An unknown phone answers `success: false` with an empty list.
    async fn addresses(&self, phone: &str) -> Result<Vec<Address>, ClientError> {
        let envelope: AddressEnvelope = self
            .api
            .get("/users/addresses", &[("phone", phone)])
            .await?;
        envelope
            .addresses
            .into_iter()
            .map(AddressRow::into_address)
            .collect()
    }

    async fn add_address(
        &self,
        phone: &str,
        draft: &AddressDraft,
    ) -> Result<Address, ClientError> {
        let envelope: AddressEnvelope = self
            .api
            .send(
                Method::POST,
                "/users/addresses",
                Some(&NewAddressRequest {
                    phone,
                    address: draft,
                }),
            )
            .await?;
        single(envelope)
    }

    async fn update_address(
        &self,
        id: AddressId,
        draft: &AddressDraft,
    ) -> Result<Address, ClientError> {
        let envelope: AddressEnvelope = self
            .api
            .send(Method::PUT, &format!("/users/addresses/{id}"), Some(draft))
            .await?;
        single(envelope)
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), ClientError> {
        let outcome: Outcome = self
            .api
            .send::<(), _>(Method::DELETE, &format!("/users/addresses/{id}"), None)
            .await?;
        outcome.check()
    }

    async fn set_default_address(&self, id: AddressId) -> Result<(), ClientError> {
        let envelope: AddressEnvelope = self
            .api
            .send(
                Method::PUT,
                &format!("/users/addresses/{id}"),
                Some(&DefaultAddressRequest { is_default: true }),
            )
            .await?;
        single(envelope).map(|_| ())
    }
}
