use thiserror::Error;

use crate::domain::{Address, AddressBackend, AddressDraft, AddressId, ClientError, LocalStorage};
use crate::use_cases::cart::Applied;
use crate::use_cases::local_copy;

pub const ADDRESSES_STORAGE_KEY: &str = "addresses";

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("Please fill in the {0} of the address")]
    Incomplete(&'static str),

    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),
}

// Delivery addresses for the signed-in shopper. Listing and adding fall back
// to the on-device copy; edits need the backend.
pub struct AddressBook<B, S> {
    backend: B,
    storage: S,
    addresses: Vec<Address>,
}

impl<B, S> AddressBook<B, S>
where
    B: AddressBackend,
    S: LocalStorage,
{
    pub fn new(backend: B, storage: S) -> Self {
        Self {
            backend,
            storage,
            addresses: Vec::new(),
        }
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    // The flagged default, else the first address.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|address| address.is_default)
            .or_else(|| self.addresses.first())
    }

    pub async fn load(&mut self, phone: &str) -> Applied {
        match self.backend.addresses(phone).await {
            Ok(addresses) => {
                self.addresses = addresses;
                Applied::Server
            }
            Err(err) => {
                tracing::warn!(error = %err, "address fetch failed, using on-device copy");
                self.addresses = local_copy::read_list(&self.storage, ADDRESSES_STORAGE_KEY);
                Applied::Fallback
            }
        }
    }

    // The new address is last in `addresses()` afterwards.
    pub async fn add(&mut self, phone: &str, draft: &AddressDraft) -> Result<Applied, AddressError> {
        if let Some(field) = draft.missing_field() {
            return Err(AddressError::Incomplete(field));
        }

        match self.backend.add_address(phone, draft).await {
            Ok(address) => {
                self.addresses.push(address);
                Ok(Applied::Server)
            }
            Err(err) => {
                tracing::warn!(error = %err, "address add failed, keeping it on device");
                let mut saved: Vec<Address> =
                    local_copy::read_list(&self.storage, ADDRESSES_STORAGE_KEY);
                let next_id = saved
                    .iter()
                    .chain(&self.addresses)
                    .map(|address| address.id)
                    .max()
                    .unwrap_or(0)
                    + 1;
                let address = Address {
                    id: next_id,
                    details: draft.clone(),
                    is_default: self.addresses.is_empty(),
                };
                saved.push(address.clone());
                local_copy::write_list(&self.storage, ADDRESSES_STORAGE_KEY, &saved);
                self.addresses.push(address);
                Ok(Applied::Fallback)
            }
        }
    }

    pub async fn update(&mut self, id: AddressId, draft: &AddressDraft) -> Result<(), AddressError> {
        if let Some(field) = draft.missing_field() {
            return Err(AddressError::Incomplete(field));
        }

        let updated = self.backend.update_address(id, draft).await?;
        if let Some(slot) = self.addresses.iter_mut().find(|address| address.id == id) {
            *slot = updated;
        }
        Ok(())
    }

    pub async fn remove(&mut self, id: AddressId) -> Result<(), AddressError> {
        self.backend.delete_address(id).await?;
        self.addresses.retain(|address| address.id != id);
        Ok(())
    }

    pub async fn set_default(&mut self, id: AddressId) -> Result<(), AddressError> {
        self.backend.set_default_address(id).await?;
        for address in &mut self.addresses {
            address.is_default = address.id == id;
        }
        Ok(())
    }

    pub fn forget(&mut self) {
        self.addresses.clear();
    }
}
