use tokio::sync::broadcast;

use crate::domain::{Product, ProductId};

pub const DEFAULT_FEED_CAPACITY: usize = 64;

/// Change notification for product listings held by views.
#[derive(Clone, Debug, PartialEq)]
pub enum ProductEvent {
    /// The full listing was reloaded.
    Replaced(Vec<Product>),
    /// One product was created or edited.
    Upserted(Product),
    /// One product was deleted.
    Removed(ProductId),
    /// Category names or counts changed.
    CategoriesChanged,
    /// The subscriber fell behind and missed events; reload everything.
    Resync,
}

/// Fan-out channel for product changes.
#[derive(Clone, Debug)]
pub struct ProductFeed {
    tx: broadcast::Sender<ProductEvent>,
}

impl Default for ProductFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl ProductFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> ProductSubscription {
        ProductSubscription {
            rx: self.tx.subscribe(),
        }
    }

    // Returns how many subscribers will see the event.
    pub fn publish(&self, event: ProductEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

pub struct ProductSubscription {
    rx: broadcast::Receiver<ProductEvent>,
}

impl ProductSubscription {
    /// Waits for the next event. `None` once every feed handle is dropped.
    pub async fn next(&mut self) -> Option<ProductEvent> {
        match self.rx.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "product feed lagged; asking for a reload");
                Some(ProductEvent::Resync)
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

/// Folds an event into a local listing. Returns false when the caller must
/// reload the listing from the catalog instead.
pub fn apply(products: &mut Vec<Product>, event: &ProductEvent) -> bool {
    match event {
        ProductEvent::Replaced(listing) => {
            *products = listing.clone();
            true
        }
        ProductEvent::Upserted(product) => {
            match products.iter_mut().find(|existing| existing.id == product.id) {
                Some(existing) => *existing = product.clone(),
                None => products.push(product.clone()),
            }
            true
        }
        ProductEvent::Removed(id) => {
            products.retain(|product| product.id != *id);
            true
        }
        ProductEvent::CategoriesChanged => true,
        ProductEvent::Resync => false,
    }
}
