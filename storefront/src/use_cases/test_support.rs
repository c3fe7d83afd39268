use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    Address, AddressBackend, AddressDraft, AddressId, CartBackend, CartItem, Category,
    CategoryDraft, ClientError, Clock, NewOrder, Offer, OfferValidation, OfferValidator, Order,
    OrderBackend, OtpApi, OtpReply, Product, ProductCatalog, ProductDraft, ProductId,
    WishlistBackend, WishlistItem,
};

pub(crate) fn product(id: ProductId, name: &str, price: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        price: Decimal::from(price),
        original_price: None,
        size: Some("1 unit".to_string()),
        image_url: None,
        stock: Some(50),
        category_name: Some("Fruits & Vegetables".to_string()),
        description: None,
    }
}

// Toggleable network failure shared between a fake and its test.
#[derive(Clone, Default)]
pub(crate) struct Outage(Arc<AtomicBool>);

impl Outage {
    pub(crate) fn set(&self, down: bool) {
        self.0.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ClientError> {
        if self.0.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

// Clock whose time only moves when a test says so.
#[derive(Clone, Default)]
pub(crate) struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub(crate) fn at(millis: u64) -> Self {
        Self(Arc::new(AtomicU64::new(millis)))
    }

    pub(crate) fn advance(&self, millis: u64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_epoch_millis(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

// Server-side cart backed by a fixed product table.
#[derive(Clone, Default)]
pub(crate) struct FakeCartBackend {
    pub(crate) products: Arc<Mutex<HashMap<ProductId, Product>>>,
    pub(crate) items: Arc<Mutex<Vec<CartItem>>>,
    pub(crate) outage: Outage,
    // Fails only the listing call so a mutation can land without a refresh.
    pub(crate) fetch_outage: Outage,
}

impl FakeCartBackend {
    pub(crate) fn with_products(products: &[Product]) -> Self {
        let backend = Self::default();
        {
            let mut table = backend.products.lock().expect("products mutex poisoned");
            for product in products {
                table.insert(product.id, product.clone());
            }
        }
        backend
    }

    pub(crate) fn server_items(&self) -> Vec<CartItem> {
        self.items.lock().expect("items mutex poisoned").clone()
    }
}

#[async_trait]
impl CartBackend for FakeCartBackend {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ClientError> {
        self.outage.check()?;
        self.fetch_outage.check()?;
        Ok(self.server_items())
    }

    async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<(), ClientError> {
        self.outage.check()?;
        let product = self
            .products
            .lock()
            .expect("products mutex poisoned")
            .get(&product_id)
            .cloned()
            .ok_or_else(|| ClientError::Upstream {
                status: 404,
                message: "Product not found".to_string(),
            })?;

        let mut items = self.items.lock().expect("items mutex poisoned");
        match items.iter_mut().find(|item| item.id == product_id) {
            Some(item) => item.quantity += quantity,
            None => items.push(CartItem::from_product(&product, quantity)),
        }
        Ok(())
    }

    async fn remove_item(&self, product_id: ProductId) -> Result<(), ClientError> {
        self.outage.check()?;
        self.items
            .lock()
            .expect("items mutex poisoned")
            .retain(|item| item.id != product_id);
        Ok(())
    }

    async fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        self.outage.check()?;
        let mut items = self.items.lock().expect("items mutex poisoned");
        if let Some(item) = items.iter_mut().find(|item| item.id == product_id) {
            item.quantity = quantity;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        self.outage.check()?;
        self.items.lock().expect("items mutex poisoned").clear();
        Ok(())
    }
}

// Server-side wishlists keyed by phone.
#[derive(Clone, Default)]
pub(crate) struct FakeWishlistBackend {
    pub(crate) products: Arc<Mutex<HashMap<ProductId, Product>>>,
    pub(crate) lists: Arc<Mutex<HashMap<String, Vec<WishlistItem>>>>,
    pub(crate) outage: Outage,
}

impl FakeWishlistBackend {
    pub(crate) fn with_products(products: &[Product]) -> Self {
        let backend = Self::default();
        {
            let mut table = backend.products.lock().expect("products mutex poisoned");
            for product in products {
                table.insert(product.id, product.clone());
            }
        }
        backend
    }

    pub(crate) fn server_ids(&self, phone: &str) -> Vec<ProductId> {
        self.lists
            .lock()
            .expect("lists mutex poisoned")
            .get(phone)
            .map(|items| items.iter().map(|item| item.id).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl WishlistBackend for FakeWishlistBackend {
    async fn fetch(&self, phone: &str) -> Result<Vec<WishlistItem>, ClientError> {
        self.outage.check()?;
        Ok(self
            .lists
            .lock()
            .expect("lists mutex poisoned")
            .get(phone)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, phone: &str, product_id: ProductId) -> Result<bool, ClientError> {
        self.outage.check()?;
        let product = self
            .products
            .lock()
            .expect("products mutex poisoned")
            .get(&product_id)
            .cloned()
            .ok_or_else(|| ClientError::Rejected("Product not found".to_string()))?;

        let mut lists = self.lists.lock().expect("lists mutex poisoned");
        let list = lists.entry(phone.to_string()).or_default();
        if list.iter().any(|item| item.id == product_id) {
            return Ok(true);
        }
        list.push(product);
        Ok(false)
    }

    async fn remove(&self, phone: &str, product_id: ProductId) -> Result<(), ClientError> {
        self.outage.check()?;
        if let Some(list) = self.lists.lock().expect("lists mutex poisoned").get_mut(phone) {
            list.retain(|item| item.id != product_id);
        }
        Ok(())
    }

    async fn clear(&self, phone: &str) -> Result<(), ClientError> {
        self.outage.check()?;
        self.lists.lock().expect("lists mutex poisoned").remove(phone);
        Ok(())
    }

    async fn contains(&self, phone: &str, product_id: ProductId) -> Result<bool, ClientError> {
        self.outage.check()?;
        Ok(self.server_ids(phone).contains(&product_id))
    }
}

// Offers backend answering from a fixed table of codes.
#[derive(Clone, Default)]
pub(crate) struct FakeOfferValidator {
    pub(crate) offers: Arc<Mutex<HashMap<String, Offer>>>,
    pub(crate) calls: Arc<AtomicUsize>,
    pub(crate) outage: Outage,
}

impl FakeOfferValidator {
    pub(crate) fn with_offer(offer: Offer) -> Self {
        let validator = Self::default();
        validator
            .offers
            .lock()
            .expect("offers mutex poisoned")
            .insert(offer.code.clone(), offer);
        validator
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OfferValidator for FakeOfferValidator {
    async fn validate(
        &self,
        code: &str,
        order_value: Decimal,
    ) -> Result<OfferValidation, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outage.check()?;

        let offer = self
            .offers
            .lock()
            .expect("offers mutex poisoned")
            .get(code)
            .cloned();
        let Some(offer) = offer else {
            return Ok(OfferValidation {
                valid: false,
                offer: None,
                message: "Invalid coupon code".to_string(),
                discount_amount: None,
            });
        };

        if let Some(minimum) = offer.min_order_value.filter(|minimum| order_value < *minimum) {
            return Ok(OfferValidation {
                valid: false,
                offer: None,
                message: format!("Minimum order value of {minimum} required"),
                discount_amount: None,
            });
        }

        let discount = offer.adjustment_for(order_value).discount;
        Ok(OfferValidation {
            valid: true,
            offer: Some(offer),
            message: "Coupon applied successfully".to_string(),
            discount_amount: Some(discount),
        })
    }
}

// OTP backend fake with a fixed code and switchable health.
#[derive(Clone)]
pub(crate) struct FakeOtpApi {
    pub(crate) code: &'static str,
    pub(crate) healthy: Arc<AtomicBool>,
    pub(crate) sent: Arc<Mutex<Vec<String>>>,
    pub(crate) outage: Outage,
}

impl FakeOtpApi {
    pub(crate) fn new(code: &'static str) -> Self {
        Self {
            code,
            healthy: Arc::new(AtomicBool::new(true)),
            sent: Arc::new(Mutex::new(Vec::new())),
            outage: Outage::default(),
        }
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("sent mutex poisoned").clone()
    }
}

#[async_trait]
impl OtpApi for FakeOtpApi {
    async fn send_otp(&self, phone: &str) -> Result<OtpReply, ClientError> {
        self.outage.check()?;
        self.sent
            .lock()
            .expect("sent mutex poisoned")
            .push(phone.to_string());
        Ok(OtpReply {
            success: true,
            message: "OTP sent successfully".to_string(),
            request_id: Some("req-1".to_string()),
            ..OtpReply::default()
        })
    }

    async fn verify_otp(&self, _phone: &str, otp: &str) -> Result<OtpReply, ClientError> {
        self.outage.check()?;
        let success = otp == self.code;
        Ok(OtpReply {
            success,
            message: if success {
                "OTP verified successfully".to_string()
            } else {
                "Invalid OTP".to_string()
            },
            ..OtpReply::default()
        })
    }

    async fn health(&self) -> Result<bool, ClientError> {
        self.outage.check()?;
        Ok(self.healthy.load(Ordering::SeqCst))
    }
}

// Catalog fake that counts how often each listing is requested.
#[derive(Clone, Default)]
pub(crate) struct FakeCatalog {
    pub(crate) products: Arc<Mutex<Vec<Product>>>,
    pub(crate) categories: Arc<Mutex<Vec<Category>>>,
    pub(crate) list_calls: Arc<AtomicUsize>,
    pub(crate) category_calls: Arc<AtomicUsize>,
    pub(crate) next_id: Arc<AtomicU64>,
    pub(crate) outage: Outage,
}

impl FakeCatalog {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        let next = products.iter().map(|product| product.id).max().unwrap_or(0) + 1;
        let catalog = Self::default();
        *catalog.products.lock().expect("products mutex poisoned") = products;
        catalog.next_id.store(next, Ordering::SeqCst);
        catalog
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn from_draft(id: ProductId, draft: &ProductDraft) -> Product {
        Product {
            id,
            name: draft.name.clone(),
            price: draft.price,
            original_price: draft.original_price,
            size: draft.size.clone(),
            image_url: draft.image_url.clone(),
            stock: Some(draft.stock),
            category_name: None,
            description: draft.description.clone(),
        }
    }
}

#[async_trait]
impl ProductCatalog for FakeCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.outage.check()?;
        Ok(self.products.lock().expect("products mutex poisoned").clone())
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, ClientError> {
        self.outage.check()?;
        Ok(self
            .products
            .lock()
            .expect("products mutex poisoned")
            .iter()
            .find(|product| product.id == id)
            .cloned())
    }

    async fn products_by_category(
        &self,
        _category_id: ProductId,
    ) -> Result<Vec<Product>, ClientError> {
        self.list_products().await
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, ClientError> {
        self.outage.check()?;
        let query = query.to_lowercase();
        Ok(self
            .products
            .lock()
            .expect("products mutex poisoned")
            .iter()
            .filter(|product| product.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn featured(&self, limit: u32) -> Result<Vec<Product>, ClientError> {
        let mut products = self.list_products().await?;
        products.truncate(limit as usize);
        Ok(products)
    }

    async fn related(&self, id: ProductId, limit: u32) -> Result<Vec<Product>, ClientError> {
        let mut products = self.list_products().await?;
        products.retain(|product| product.id != id);
        products.truncate(limit as usize);
        Ok(products)
    }

    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.category_calls.fetch_add(1, Ordering::SeqCst);
        self.outage.check()?;
        Ok(self
            .categories
            .lock()
            .expect("categories mutex poisoned")
            .clone())
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ClientError> {
        self.outage.check()?;
        let product = Self::from_draft(self.next_id.fetch_add(1, Ordering::SeqCst), draft);
        self.products
            .lock()
            .expect("products mutex poisoned")
            .push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ClientError> {
        self.outage.check()?;
        let product = Self::from_draft(id, draft);
        let mut products = self.products.lock().expect("products mutex poisoned");
        let slot = products
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| ClientError::Upstream {
                status: 404,
                message: "Product not found".to_string(),
            })?;
        *slot = product.clone();
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        self.outage.check()?;
        self.products
            .lock()
            .expect("products mutex poisoned")
            .retain(|product| product.id != id);
        Ok(())
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ClientError> {
        self.outage.check()?;
        let category = Category {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: draft.name.clone(),
            image_url: draft.image_url.clone(),
            status: Some(draft.status.clone()),
            product_count: Some(0),
        };
        self.categories
            .lock()
            .expect("categories mutex poisoned")
            .push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: ProductId,
        draft: &CategoryDraft,
    ) -> Result<Category, ClientError> {
        self.outage.check()?;
        let mut categories = self.categories.lock().expect("categories mutex poisoned");
        let slot = categories
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| ClientError::Upstream {
                status: 404,
                message: "Category not found".to_string(),
            })?;
        slot.name = draft.name.clone();
        slot.image_url = draft.image_url.clone();
        slot.status = Some(draft.status.clone());
        Ok(slot.clone())
    }

    async fn delete_category(&self, id: ProductId) -> Result<(), ClientError> {
        self.outage.check()?;
        self.categories
            .lock()
            .expect("categories mutex poisoned")
            .retain(|category| category.id != id);
        Ok(())
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::Upstream {
        status: 404,
        message: format!("{what} not found"),
    }
}

// Orders backend that numbers orders in creation order.
#[derive(Clone, Default)]
pub(crate) struct FakeOrderBackend {
    pub(crate) orders: Arc<Mutex<Vec<Order>>>,
    pub(crate) submitted: Arc<Mutex<Vec<NewOrder>>>,
    pub(crate) cancels: Arc<AtomicUsize>,
    pub(crate) outage: Outage,
}

impl FakeOrderBackend {
    pub(crate) fn created(&self) -> Vec<NewOrder> {
        self.submitted.lock().expect("submitted mutex poisoned").clone()
    }

    pub(crate) fn set_status(&self, id: &str, status: &str) {
        if let Some(order) = self
            .orders
            .lock()
            .expect("orders mutex poisoned")
            .iter_mut()
            .find(|order| order.id == id)
        {
            order.status = status.to_string();
        }
    }

    pub(crate) fn cancel_calls(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderBackend for FakeOrderBackend {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ClientError> {
        self.outage.check()?;
        let mut submitted = self.submitted.lock().expect("submitted mutex poisoned");
        submitted.push(order.clone());
        let created = Order {
            id: format!("QC{}", submitted.len()),
            phone: Some(order.phone.clone()),
            status: "pending".to_string(),
            payment_status: Some(order.payment_status.clone()),
            payment_method: Some(order.payment_method.clone()),
            delivery_address: Some(order.delivery_address.clone()),
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            delivery_fee: order.delivery_fee,
            total: order.total,
            created_at: None,
        };
        self.orders
            .lock()
            .expect("orders mutex poisoned")
            .push(created.clone());
        Ok(created)
    }

    async fn orders_for(&self, phone: &str) -> Result<Vec<Order>, ClientError> {
        self.outage.check()?;
        Ok(self
            .orders
            .lock()
            .expect("orders mutex poisoned")
            .iter()
            .filter(|order| order.phone.as_deref() == Some(phone))
            .cloned()
            .collect())
    }

    async fn order(&self, id: &str) -> Result<Option<Order>, ClientError> {
        self.outage.check()?;
        Ok(self
            .orders
            .lock()
            .expect("orders mutex poisoned")
            .iter()
            .find(|order| order.id == id)
            .cloned())
    }

    async fn cancel_order(&self, id: &str) -> Result<Order, ClientError> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.outage.check()?;
        let mut orders = self.orders.lock().expect("orders mutex poisoned");
        let order = orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or_else(|| not_found("Order"))?;
        order.status = "cancelled".to_string();
        Ok(order.clone())
    }
}

// Address book keyed by phone; the first address of a phone is the default.
#[derive(Clone, Default)]
pub(crate) struct FakeAddressBackend {
    pub(crate) rows: Arc<Mutex<Vec<(String, Address)>>>,
    pub(crate) next_id: Arc<AtomicU64>,
    pub(crate) outage: Outage,
}

impl FakeAddressBackend {
    pub(crate) fn server_ids(&self, phone: &str) -> Vec<AddressId> {
        self.rows
            .lock()
            .expect("rows mutex poisoned")
            .iter()
            .filter(|(owner, _)| owner == phone)
            .map(|(_, address)| address.id)
            .collect()
    }
}

#[async_trait]
impl AddressBackend for FakeAddressBackend {
    async fn addresses(&self, phone: &str) -> Result<Vec<Address>, ClientError> {
        self.outage.check()?;
        Ok(self
            .rows
            .lock()
            .expect("rows mutex poisoned")
            .iter()
            .filter(|(owner, _)| owner == phone)
            .map(|(_, address)| address.clone())
            .collect())
    }

    async fn add_address(
        &self,
        phone: &str,
        draft: &AddressDraft,
    ) -> Result<Address, ClientError> {
        self.outage.check()?;
        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        let address = Address {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            details: draft.clone(),
            is_default: !rows.iter().any(|(owner, _)| owner == phone),
        };
        rows.push((phone.to_string(), address.clone()));
        Ok(address)
    }

    async fn update_address(
        &self,
        id: AddressId,
        draft: &AddressDraft,
    ) -> Result<Address, ClientError> {
        self.outage.check()?;
        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        let (_, address) = rows
            .iter_mut()
            .find(|(_, address)| address.id == id)
            .ok_or_else(|| not_found("Address"))?;
        address.details = draft.clone();
        Ok(address.clone())
    }

    async fn delete_address(&self, id: AddressId) -> Result<(), ClientError> {
        self.outage.check()?;
        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        let before = rows.len();
        rows.retain(|(_, address)| address.id != id);
        if rows.len() == before {
            return Err(not_found("Address"));
        }
        Ok(())
    }

    async fn set_default_address(&self, id: AddressId) -> Result<(), ClientError> {
        self.outage.check()?;
        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        let owner = rows
            .iter()
            .find(|(_, address)| address.id == id)
            .map(|(owner, _)| owner.clone())
            .ok_or_else(|| not_found("Address"))?;
        for (_, address) in rows.iter_mut().filter(|(phone, _)| *phone == owner) {
            address.is_default = address.id == id;
        }
        Ok(())
    }
}
