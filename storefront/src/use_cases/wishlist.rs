use crate::domain::{
    ClientError, LocalStorage, Product, ProductId, Session, WishlistBackend, WishlistItem,
};
use crate::use_cases::cart::Applied;
use crate::use_cases::local_copy;

pub const WISHLIST_STORAGE_KEY: &str = "wishlist";

// Saved products keyed by id, persisted like the cart.
pub struct Wishlist<B, S> {
    backend: B,
    storage: S,
    session: Session,
    items: Vec<WishlistItem>,
    // Guest entries the account has not received yet.
    unmerged: Vec<WishlistItem>,
    diverged: bool,
}

impl<B, S> Wishlist<B, S>
where
    B: WishlistBackend,
    S: LocalStorage,
{
    pub fn new(backend: B, storage: S) -> Self {
        Self {
            backend,
            storage,
            session: Session::Guest,
            items: Vec::new(),
            unmerged: Vec::new(),
            diverged: false,
        }
    }

    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    // Asks the server for signed-in shoppers; guests only have local state.
    pub async fn contains_remote(&self, product_id: ProductId) -> Result<bool, ClientError> {
        match self.session.phone() {
            Some(phone) => self.backend.contains(phone, product_id).await,
            None => Ok(self.contains(product_id)),
        }
    }

    pub async fn load(&mut self) -> Applied {
        let Some(phone) = self.session.phone() else {
            self.items = local_copy::read_list(&self.storage, WISHLIST_STORAGE_KEY);
            return Applied::Local;
        };

        match self.backend.fetch(phone).await {
            Ok(items) => {
                self.items = items;
                self.diverged = false;
                Applied::Server
            }
            Err(err) => {
                tracing::warn!(error = %err, "wishlist fetch failed, using on-device copy");
                self.items = local_copy::read_list(&self.storage, WISHLIST_STORAGE_KEY);
                self.diverged = true;
                Applied::Fallback
            }
        }
    }

    pub async fn add(&mut self, product: &Product) -> Applied {
        let Some(phone) = self.session.phone().map(str::to_string) else {
            if !insert_unique(&mut self.items, product) {
                return Applied::Ignored;
            }
            self.persist_guest();
            return Applied::Local;
        };

        let sent = match self.backend.add(&phone, product.id).await {
            Ok(true) if self.contains(product.id) => return Applied::Ignored,
            Ok(_) => Ok(()),
            Err(err) => Err(err),
        };
        self.sync_after(&phone, "add", sent, |items| {
            insert_unique(items, product);
        })
        .await
    }

    pub async fn remove(&mut self, product_id: ProductId) -> Applied {
        let Some(phone) = self.session.phone().map(str::to_string) else {
            self.items.retain(|item| item.id != product_id);
            self.persist_guest();
            return Applied::Local;
        };

        let sent = self.backend.remove(&phone, product_id).await;
        self.sync_after(&phone, "remove", sent, |items| {
            items.retain(|item| item.id != product_id)
        })
        .await
    }

    // Returns true when the product is on the list afterwards.
    pub async fn toggle(&mut self, product: &Product) -> bool {
        if self.contains(product.id) {
            self.remove(product.id).await;
        } else {
            self.add(product).await;
        }
        self.contains(product.id)
    }

    pub async fn clear(&mut self) -> Applied {
        let Some(phone) = self.session.phone().map(str::to_string) else {
            self.items.clear();
            self.persist_guest();
            return Applied::Local;
        };

        let sent = self.backend.clear(&phone).await;
        self.sync_after(&phone, "clear", sent, Vec::clear).await
    }

    // Pushes a guest list to the shopper's account, then reloads it. A
    // signed-in list is never pushed to another account.
    pub async fn sign_in(&mut self, phone: impl Into<String>) -> Applied {
        let phone = phone.into();
        if self.session.phone() != Some(phone.as_str()) {
            if self.session.is_guest() {
                self.unmerged = self.items.clone();
            } else {
                self.unmerged.clear();
                self.items.clear();
                local_copy::forget(&self.storage, WISHLIST_STORAGE_KEY);
            }
            self.session = Session::Authenticated {
                phone: phone.clone(),
            };
        }

        if let Err(err) = self.merge_pending(&phone).await {
            tracing::warn!(
                pending = self.unmerged.len(),
                error = %err,
                "guest wishlist merge failed"
            );
            self.diverged = true;
            return Applied::Fallback;
        }

        match self.backend.fetch(&phone).await {
            Ok(items) => {
                self.items = items;
                self.diverged = false;
                Applied::Server
            }
            Err(err) => {
                tracing::warn!(error = %err, "wishlist refresh after sign-in failed");
                self.diverged = true;
                Applied::Fallback
            }
        }
    }

    pub fn sign_out(&mut self) {
        self.session = Session::Guest;
        self.diverged = false;
        self.unmerged.clear();
        self.items = local_copy::read_list(&self.storage, WISHLIST_STORAGE_KEY);
    }

    pub async fn resync(&mut self) -> Result<(), ClientError> {
        let Some(phone) = self.session.phone().map(str::to_string) else {
            return Ok(());
        };

        self.merge_pending(&phone).await?;
        self.items = self.backend.fetch(&phone).await?;
        self.diverged = false;
        Ok(())
    }

    async fn merge_pending(&mut self, phone: &str) -> Result<(), ClientError> {
        while let Some(entry) = self.unmerged.first() {
            let product_id = entry.id;
            self.backend.add(phone, product_id).await?;
            self.unmerged.remove(0);
            local_copy::write_list(&self.storage, WISHLIST_STORAGE_KEY, &self.unmerged);
        }
        local_copy::forget(&self.storage, WISHLIST_STORAGE_KEY);
        Ok(())
    }

    async fn sync_after(
        &mut self,
        phone: &str,
        operation: &'static str,
        sent: Result<(), ClientError>,
        fallback: impl FnOnce(&mut Vec<WishlistItem>),
    ) -> Applied {
        let refreshed = match sent {
            Ok(()) => self.backend.fetch(phone).await,
            Err(err) => Err(err),
        };

        match refreshed {
            Ok(items) => {
                self.items = items;
                Applied::Server
            }
            Err(err) => {
                tracing::warn!(operation, error = %err, "wishlist backend failed, applying locally");
                fallback(&mut self.items);
                self.diverged = true;
                Applied::Fallback
            }
        }
    }

    fn persist_guest(&self) {
        local_copy::write_list(&self.storage, WISHLIST_STORAGE_KEY, &self.items);
    }
}

// Returns false when the product was already listed.
fn insert_unique(items: &mut Vec<WishlistItem>, product: &Product) -> bool {
    if items.iter().any(|item| item.id == product.id) {
        return false;
    }
    items.push(product.clone());
    true
}
