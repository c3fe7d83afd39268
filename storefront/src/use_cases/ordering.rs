use thiserror::Error;

use crate::domain::{
    AddressDraft, CartItem, ClientError, LocalStorage, NewOrder, Order, OrderBackend, OrderLine,
    PaymentMethod,
};
use crate::use_cases::cart::Applied;
use crate::use_cases::checkout::OrderSummary;
use crate::use_cases::local_copy;

// Orders placed from this device, newest first.
pub const ORDERS_STORAGE_KEY: &str = "user_orders";

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Please sign in to place an order")]
    NotSignedIn,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please fill in the {0} of the delivery address")]
    IncompleteAddress(&'static str),

    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),
}

// Builds the order body from the cart lines and the bill the shopper saw.
pub fn build_order(
    phone: &str,
    items: &[CartItem],
    summary: &OrderSummary,
    address: &AddressDraft,
    payment: PaymentMethod,
) -> Result<NewOrder, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if let Some(field) = address.missing_field() {
        return Err(CheckoutError::IncompleteAddress(field));
    }

    Ok(NewOrder {
        phone: phone.to_string(),
        items: items
            .iter()
            .map(|item| OrderLine {
                product_id: item.id,
                quantity: item.quantity,
            })
            .collect(),
        delivery_address: address.one_line(),
        payment_method: payment.wire_name().to_string(),
        payment_status: payment.payment_status().to_string(),
        delivery_fee: summary.delivery_fee,
        handling_fee: summary.handling_fee,
        total: summary.total,
        coupon_code: summary.coupon_code.clone(),
    })
}

// The shopper's orders, with a device-local copy of everything placed here.
pub struct OrderHistory<B, S> {
    backend: B,
    storage: S,
    orders: Vec<Order>,
}

impl<B, S> OrderHistory<B, S>
where
    B: OrderBackend,
    S: LocalStorage,
{
    pub fn new(backend: B, storage: S) -> Self {
        Self {
            backend,
            storage,
            orders: Vec::new(),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub async fn place(&mut self, order: &NewOrder) -> Result<Order, ClientError> {
        let created = self.backend.create_order(order).await?;
        tracing::info!(order_id = %created.id, total = %created.total, "order placed");

        self.orders.retain(|existing| existing.id != created.id);
        self.orders.insert(0, created.clone());
        self.remember(&created);
        Ok(created)
    }

    pub async fn load(&mut self, phone: &str) -> Applied {
        match self.backend.orders_for(phone).await {
            Ok(orders) => {
                self.orders = orders;
                Applied::Server
            }
            Err(err) => {
                tracing::warn!(error = %err, "order history fetch failed, using on-device copy");
                let saved: Vec<Order> = local_copy::read_list(&self.storage, ORDERS_STORAGE_KEY);
                self.orders = saved
                    .into_iter()
                    .filter(|order| order.phone.as_deref().is_none_or(|owner| owner == phone))
                    .collect();
                Applied::Fallback
            }
        }
    }

    pub async fn find(&self, id: &str) -> Result<Option<Order>, ClientError> {
        self.backend.order(id).await
    }

    // Orders already past preparation are refused without a backend call.
    pub async fn cancel(&mut self, id: &str) -> Result<Order, ClientError> {
        if let Some(known) = self.orders.iter().find(|order| order.id == id) {
            if !known.is_cancellable() {
                return Err(ClientError::Rejected(format!(
                    "Order cannot be cancelled once it is {}",
                    known.status
                )));
            }
        }

        let cancelled = self.backend.cancel_order(id).await?;
        match self.orders.iter_mut().find(|order| order.id == cancelled.id) {
            Some(slot) => *slot = cancelled.clone(),
            None => self.orders.insert(0, cancelled.clone()),
        }
        self.remember(&cancelled);
        Ok(cancelled)
    }

    // Drops the in-memory list; the device copy stays for the next sign-in.
    pub fn forget(&mut self) {
        self.orders.clear();
    }

    fn remember(&self, order: &Order) {
        let mut saved: Vec<Order> = local_copy::read_list(&self.storage, ORDERS_STORAGE_KEY);
        saved.retain(|existing| existing.id != order.id);
        saved.insert(0, order.clone());
        local_copy::write_list(&self.storage, ORDERS_STORAGE_KEY, &saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiscountType, Offer};
    use crate::interface_adapters::storage::MemoryStorage;
    use crate::use_cases::checkout::summarize;
    use crate::use_cases::test_support::{FakeOrderBackend, product};
    use rust_decimal::Decimal;

    const PHONE: &str = "9876543210";

    fn lines() -> Vec<CartItem> {
        vec![
            CartItem::from_product(&product(1, "Fresh Apples", 120), 2),
            CartItem::from_product(&product(2, "Amul Milk", 30), 1),
        ]
    }

    fn address() -> AddressDraft {
        let mut draft = AddressDraft::new("12 MG Road", "Bengaluru", "Karnataka", "560001");
        draft.address_line_2 = "Indiranagar".to_string();
        draft
    }

    fn save20() -> Offer {
        Offer {
            id: Some(3),
            code: "SAVE20".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(20),
            max_discount_amount: None,
            min_order_value: None,
            description: None,
        }
    }

    fn history(backend: FakeOrderBackend) -> OrderHistory<FakeOrderBackend, MemoryStorage> {
        OrderHistory::new(backend, MemoryStorage::default())
    }

    #[test]
    fn when_order_is_built_then_it_carries_the_bill_and_coupon() {
        let summary = summarize(Decimal::from(270), Some(&save20()));

        let order = build_order(PHONE, &lines(), &summary, &address(), PaymentMethod::Upi)
            .expect("expected order");

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0], OrderLine { product_id: 1, quantity: 2 });
        assert_eq!(
            order.delivery_address,
            "12 MG Road, Indiranagar, Bengaluru - 560001"
        );
        assert_eq!(order.payment_method, "upi payment");
        assert_eq!(order.payment_status, "completed");
        assert_eq!(order.total, Decimal::from(221));
        assert_eq!(order.coupon_code.as_deref(), Some("SAVE20"));
    }

    #[test]
    fn when_cart_is_empty_then_order_is_refused() {
        let summary = summarize(Decimal::ZERO, None);

        let result = build_order(PHONE, &[], &summary, &address(), PaymentMethod::default());

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn when_address_is_incomplete_then_order_is_refused() {
        let summary = summarize(Decimal::from(270), None);
        let mut draft = address();
        draft.city.clear();

        let result = build_order(PHONE, &lines(), &summary, &draft, PaymentMethod::default());

        assert!(matches!(result, Err(CheckoutError::IncompleteAddress("city"))));
    }

    #[tokio::test]
    async fn when_order_is_placed_then_it_heads_the_history_and_the_device_copy() {
        let backend = FakeOrderBackend::default();
        let storage = MemoryStorage::default();
        let mut orders = OrderHistory::new(backend.clone(), storage.clone());
        let summary = summarize(Decimal::from(270), None);
        let body = build_order(PHONE, &lines(), &summary, &address(), PaymentMethod::default())
            .expect("expected order");

        let placed = orders.place(&body).await.expect("expected placement");

        assert_eq!(orders.orders()[0].id, placed.id);
        assert_eq!(backend.created().len(), 1);
        let saved: Vec<Order> = local_copy::read_list(&storage, ORDERS_STORAGE_KEY);
        assert_eq!(saved[0].id, placed.id);
    }

    #[tokio::test]
    async fn when_history_backend_is_down_then_device_copy_is_shown() {
        let backend = FakeOrderBackend::default();
        let storage = MemoryStorage::default();
        let mut orders = OrderHistory::new(backend.clone(), storage.clone());
        let summary = summarize(Decimal::from(270), None);
        let body = build_order(PHONE, &lines(), &summary, &address(), PaymentMethod::default())
            .expect("expected order");
        orders.place(&body).await.expect("expected placement");
        backend.outage.set(true);

        let mut reopened = OrderHistory::new(backend, storage);
        assert_eq!(reopened.load(PHONE).await, Applied::Fallback);
        assert_eq!(reopened.orders().len(), 1);
        assert_eq!(reopened.load("9123456780").await, Applied::Fallback);
        assert!(reopened.orders().is_empty());
    }

    #[tokio::test]
    async fn when_pending_order_is_cancelled_then_history_shows_the_new_status() {
        let backend = FakeOrderBackend::default();
        let mut orders = history(backend.clone());
        let summary = summarize(Decimal::from(270), None);
        let body = build_order(PHONE, &lines(), &summary, &address(), PaymentMethod::default())
            .expect("expected order");
        let placed = orders.place(&body).await.expect("expected placement");

        let cancelled = orders.cancel(&placed.id).await.expect("expected cancel");

        assert_eq!(cancelled.status, "cancelled");
        assert_eq!(orders.orders()[0].status, "cancelled");
    }

    #[tokio::test]
    async fn when_order_is_delivered_then_cancel_is_refused_locally() {
        let backend = FakeOrderBackend::default();
        let mut orders = history(backend.clone());
        let summary = summarize(Decimal::from(270), None);
        let body = build_order(PHONE, &lines(), &summary, &address(), PaymentMethod::default())
            .expect("expected order");
        let placed = orders.place(&body).await.expect("expected placement");
        backend.set_status(&placed.id, "delivered");
        orders.load(PHONE).await;

        let result = orders.cancel(&placed.id).await;

        assert!(matches!(result, Err(ClientError::Rejected(_))));
        assert_eq!(backend.cancel_calls(), 0);
    }

    #[tokio::test]
    async fn when_order_id_is_unknown_then_find_returns_none() {
        let orders = history(FakeOrderBackend::default());

        assert!(orders.find("QC404").await.expect("expected lookup").is_none());
    }
}
