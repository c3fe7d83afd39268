use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::analytics::{RevenuePeriod, RevenuePoint};
use crate::domain::errors::{ClientError, StorageError};
use crate::domain::offer::OfferValidation;
use crate::domain::order::{Address, AddressDraft, AddressId, NewOrder, Order};
use crate::domain::product::{
    CartItem, Category, CategoryDraft, Product, ProductDraft, ProductId, WishlistItem,
};

// Port for the token-authenticated cart resource.
#[async_trait]
pub trait CartBackend: Send + Sync {
    async fn fetch_cart(&self) -> Result<Vec<CartItem>, ClientError>;
    async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<(), ClientError>;
    async fn remove_item(&self, product_id: ProductId) -> Result<(), ClientError>;
    async fn update_quantity(&self, product_id: ProductId, quantity: u32)
    -> Result<(), ClientError>;
    async fn clear(&self) -> Result<(), ClientError>;
}

// Port for the phone-keyed wishlist resource.
#[async_trait]
pub trait WishlistBackend: Send + Sync {
    async fn fetch(&self, phone: &str) -> Result<Vec<WishlistItem>, ClientError>;
    // Returns true when the product was already on the list.
    async fn add(&self, phone: &str, product_id: ProductId) -> Result<bool, ClientError>;
    async fn remove(&self, phone: &str, product_id: ProductId) -> Result<(), ClientError>;
    async fn clear(&self, phone: &str) -> Result<(), ClientError>;
    async fn contains(&self, phone: &str, product_id: ProductId) -> Result<bool, ClientError>;
}

// Port for the token-authenticated orders resource.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, ClientError>;
    async fn orders_for(&self, phone: &str) -> Result<Vec<Order>, ClientError>;
    // None when the backend does not know the id.
    async fn order(&self, id: &str) -> Result<Option<Order>, ClientError>;
    async fn cancel_order(&self, id: &str) -> Result<Order, ClientError>;
}

// Port for the phone-keyed address book.
#[async_trait]
pub trait AddressBackend: Send + Sync {
    async fn addresses(&self, phone: &str) -> Result<Vec<Address>, ClientError>;
    async fn add_address(&self, phone: &str, draft: &AddressDraft)
    -> Result<Address, ClientError>;
    async fn update_address(
        &self,
        id: AddressId,
        draft: &AddressDraft,
    ) -> Result<Address, ClientError>;
    async fn delete_address(&self, id: AddressId) -> Result<(), ClientError>;
    async fn set_default_address(&self, id: AddressId) -> Result<(), ClientError>;
}

// Port for server-side coupon checks.
#[async_trait]
pub trait OfferValidator: Send + Sync {
    async fn validate(
        &self,
        code: &str,
        order_value: Decimal,
    ) -> Result<OfferValidation, ClientError>;
}

// Port for the product and category resources, including admin writes.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;
    async fn product(&self, id: ProductId) -> Result<Option<Product>, ClientError>;
    async fn products_by_category(
        &self,
        category_id: ProductId,
    ) -> Result<Vec<Product>, ClientError>;
    async fn search(&self, query: &str) -> Result<Vec<Product>, ClientError>;
    async fn featured(&self, limit: u32) -> Result<Vec<Product>, ClientError>;
    async fn related(&self, id: ProductId, limit: u32) -> Result<Vec<Product>, ClientError>;
    async fn categories(&self) -> Result<Vec<Category>, ClientError>;

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ClientError>;
    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ClientError>;
    async fn delete_product(&self, id: ProductId) -> Result<(), ClientError>;
    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ClientError>;
    async fn update_category(
        &self,
        id: ProductId,
        draft: &CategoryDraft,
    ) -> Result<Category, ClientError>;
    async fn delete_category(&self, id: ProductId) -> Result<(), ClientError>;
}

// Port for the admin dashboard numbers. Payloads other than the revenue
// series are passed through untouched.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn dashboard_stats(&self) -> Result<Value, ClientError>;
    async fn revenue_chart(&self, period: RevenuePeriod)
    -> Result<Vec<RevenuePoint>, ClientError>;
    async fn product_performance(&self) -> Result<Value, ClientError>;
    async fn category_performance(&self) -> Result<Value, ClientError>;
    async fn performance_metrics(&self) -> Result<Value, ClientError>;
}

// Body returned by the OTP backend for both send and verify.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct OtpReply {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "requestId", alias = "request_id")]
    pub request_id: Option<String>,
    #[serde(default)]
    pub development_mode: bool,
    #[serde(default)]
    pub otp: Option<String>,
    // Account token issued by backends that sign the shopper in on verify.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "isNewUser")]
    pub is_new_user: bool,
}

// Port for the OTP backend as seen from the storefront.
#[async_trait]
pub trait OtpApi: Send + Sync {
    async fn send_otp(&self, phone: &str) -> Result<OtpReply, ClientError>;
    async fn verify_otp(&self, phone: &str, otp: &str) -> Result<OtpReply, ClientError>;
    // True when the backend reports itself as running.
    async fn health(&self) -> Result<bool, ClientError>;
}

// Port for on-device key/value storage holding JSON documents.
pub trait LocalStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_millis(&self) -> u64;
}
