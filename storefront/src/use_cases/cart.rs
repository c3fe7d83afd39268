use rust_decimal::Decimal;

use crate::domain::{CartBackend, CartItem, ClientError, LocalStorage, Product, ProductId, Session};
use crate::use_cases::local_copy;

pub const CART_STORAGE_KEY: &str = "cart";

// Where the outcome of a container operation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    // Guest state, mirrored to on-device storage.
    Local,
    // Replaced wholesale by the server copy.
    Server,
    // The backend failed; local state was changed instead.
    Fallback,
    // Nothing to do.
    Ignored,
}

// Shopping cart with dual persistence: the server for signed-in shoppers,
// on-device storage for guests.
pub struct Cart<B, S> {
    backend: B,
    storage: S,
    session: Session,
    items: Vec<CartItem>,
    // Guest lines the account has not received yet.
    unmerged: Vec<CartItem>,
    diverged: bool,
}

impl<B, S> Cart<B, S>
where
    B: CartBackend,
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

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // True once a fallback applied a change the server never saw.
    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.id == product_id)
            .map_or(0, |item| item.quantity)
    }

    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub async fn load(&mut self) -> Applied {
        if self.session.is_guest() {
            self.items = local_copy::read_list(&self.storage, CART_STORAGE_KEY);
            return Applied::Local;
        }

        match self.backend.fetch_cart().await {
            Ok(items) => {
                self.items = items;
                self.diverged = false;
                Applied::Server
            }
            Err(err) => {
                tracing::warn!(error = %err, "cart fetch failed, using on-device copy");
                self.items = local_copy::read_list(&self.storage, CART_STORAGE_KEY);
                self.diverged = true;
                Applied::Fallback
            }
        }
    }

    // Adding a product already in the cart raises its quantity.
    pub async fn add(&mut self, product: &Product, quantity: i64) -> Applied {
        let Some(quantity) = positive(quantity) else {
            return Applied::Ignored;
        };

        if self.session.is_guest() {
            add_line(&mut self.items, product, quantity);
            self.persist_guest();
            return Applied::Local;
        }

        let sent = self.backend.add_item(product.id, quantity).await;
        self.sync_after("add", sent, |items| add_line(items, product, quantity))
            .await
    }

    pub async fn remove(&mut self, product_id: ProductId) -> Applied {
        if self.session.is_guest() {
            remove_line(&mut self.items, product_id);
            self.persist_guest();
            return Applied::Local;
        }

        let sent = self.backend.remove_item(product_id).await;
        self.sync_after("remove", sent, |items| remove_line(items, product_id))
            .await
    }

    // A non-positive quantity removes the line.
    pub async fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Applied {
        let Some(quantity) = positive(quantity) else {
            return self.remove(product_id).await;
        };

        if self.session.is_guest() {
            set_quantity(&mut self.items, product_id, quantity);
            self.persist_guest();
            return Applied::Local;
        }

        let sent = self.backend.update_quantity(product_id, quantity).await;
        self.sync_after("update", sent, |items| {
            set_quantity(items, product_id, quantity)
        })
        .await
    }

    pub async fn clear(&mut self) -> Applied {
        if self.session.is_guest() {
            self.items.clear();
            self.persist_guest();
            return Applied::Local;
        }

        let sent = self.backend.clear().await;
        self.sync_after("clear", sent, Vec::clear).await
    }

    // Switches to the shopper's account. Only a guest cart is merged into it;
    // items already on the server take the guest quantity on top. Signing in
    // again as the same shopper just reloads, and switching accounts drops
    // the previous shopper's lines.
    pub async fn sign_in(&mut self, phone: impl Into<String>) -> Applied {
        let phone = phone.into();
        if self.session.phone() != Some(phone.as_str()) {
            if self.session.is_guest() {
                self.unmerged = self.items.clone();
            } else {
                self.unmerged.clear();
                self.items.clear();
                local_copy::forget(&self.storage, CART_STORAGE_KEY);
            }
            self.session = Session::Authenticated { phone };
        }

        if let Err(err) = self.merge_pending().await {
            tracing::warn!(
                pending = self.unmerged.len(),
                error = %err,
                "guest cart merge failed"
            );
            self.diverged = true;
            return Applied::Fallback;
        }

        match self.backend.fetch_cart().await {
            Ok(items) => {
                self.items = items;
                self.diverged = false;
                Applied::Server
            }
            Err(err) => {
                tracing::warn!(error = %err, "cart refresh after sign-in failed");
                self.diverged = true;
                Applied::Fallback
            }
        }
    }

    // Lines still waiting for the account, in push order.
    pub fn pending_merge(&self) -> &[CartItem] {
        &self.unmerged
    }

    // Drops the account view and restores whatever the guest copy holds.
    pub fn sign_out(&mut self) {
        self.session = Session::Guest;
        self.diverged = false;
        self.unmerged.clear();
        self.items = local_copy::read_list(&self.storage, CART_STORAGE_KEY);
    }

    // Finishes any pending merge, then replaces local state with the server copy.
    pub async fn resync(&mut self) -> Result<(), ClientError> {
        if self.session.is_guest() {
            return Ok(());
        }

        self.merge_pending().await?;
        self.items = self.backend.fetch_cart().await?;
        self.diverged = false;
        Ok(())
    }

    // Each pushed line leaves the pending list at once, so a retry resumes
    // after the last line the server accepted.
    async fn merge_pending(&mut self) -> Result<(), ClientError> {
        while let Some(line) = self.unmerged.first() {
            let (product_id, quantity) = (line.id, line.quantity);
            self.backend.add_item(product_id, quantity).await?;
            self.unmerged.remove(0);
            local_copy::write_list(&self.storage, CART_STORAGE_KEY, &self.unmerged);
        }
        local_copy::forget(&self.storage, CART_STORAGE_KEY);
        Ok(())
    }

    async fn sync_after(
        &mut self,
        operation: &'static str,
        sent: Result<(), ClientError>,
        fallback: impl FnOnce(&mut Vec<CartItem>),
    ) -> Applied {
        let refreshed = match sent {
            Ok(()) => self.backend.fetch_cart().await,
            Err(err) => Err(err),
        };

        match refreshed {
            Ok(items) => {
                self.items = items;
                Applied::Server
            }
            Err(err) => {
                tracing::warn!(operation, error = %err, "cart backend failed, applying locally");
                fallback(&mut self.items);
                self.diverged = true;
                Applied::Fallback
            }
        }
    }

    fn persist_guest(&self) {
        local_copy::write_list(&self.storage, CART_STORAGE_KEY, &self.items);
    }
}

fn positive(quantity: i64) -> Option<u32> {
    if quantity <= 0 {
        return None;
    }
    Some(u32::try_from(quantity).unwrap_or(u32::MAX))
}

fn add_line(items: &mut Vec<CartItem>, product: &Product, quantity: u32) {
    match items.iter_mut().find(|item| item.id == product.id) {
        Some(item) => item.quantity = item.quantity.saturating_add(quantity),
        None => items.push(CartItem::from_product(product, quantity)),
    }
}

fn remove_line(items: &mut Vec<CartItem>, product_id: ProductId) {
    items.retain(|item| item.id != product_id);
}

fn set_quantity(items: &mut [CartItem], product_id: ProductId, quantity: u32) {
    if let Some(item) = items.iter_mut().find(|item| item.id == product_id) {
        item.quantity = quantity;
    }
}
