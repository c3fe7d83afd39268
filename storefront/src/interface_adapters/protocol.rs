use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    Address, AddressDraft, CartItem, Category, ClientError, Order, Product, ProductId,
};

// Ids arrive as numbers from the database and as strings from older seeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(ProductId),
    Text(String),
}

impl WireId {
    pub fn value(&self) -> Option<ProductId> {
        match self {
            WireId::Number(id) => Some(*id),
            WireId::Text(text) => text.trim().parse().ok(),
        }
    }
}

// Product as any backend route returns it. Cart and wishlist joins key the
// product under `product_id`; catalog routes use `id`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRow {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub product_id: Option<WireId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default, rename = "originalPrice")]
    pub original_price_camel: Option<Decimal>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub category_name: Option<String>,
    // Either a category name or a numeric category id.
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl ProductRow {
    fn product_key(&self) -> Option<ProductId> {
        self.product_id
            .as_ref()
            .and_then(WireId::value)
            .or_else(|| self.id.as_ref().and_then(WireId::value))
    }

    pub fn into_product(self) -> Result<Product, ClientError> {
        let id = self
            .product_key()
            .ok_or_else(|| ClientError::Decode(format!("product '{}' has no id", self.name)))?;
        let category_name = self.category_name.or_else(|| match self.category {
            Some(Value::String(name)) => Some(name),
            _ => None,
        });

        Ok(Product {
            id,
            name: self.name,
            price: self.price,
            original_price: self.original_price.or(self.original_price_camel),
            size: self.size,
            image_url: self.image_url.or(self.image),
            stock: self.stock,
            category_name,
            description: self.description,
        })
    }

    pub fn into_cart_item(self) -> Result<CartItem, ClientError> {
        let quantity = self.quantity.unwrap_or(1).max(1);
        let product = self.into_product()?;
        Ok(CartItem::from_product(&product, quantity))
    }
}

pub fn products_from_rows(rows: Vec<ProductRow>) -> Result<Vec<Product>, ClientError> {
    rows.into_iter().map(ProductRow::into_product).collect()
}

#[derive(Debug, Deserialize)]
pub struct CategoryRow {
    pub id: WireId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub product_count: Option<u32>,
    #[serde(default, rename = "productsCount")]
    pub products_count: Option<u32>,
}

impl CategoryRow {
    pub fn into_category(self) -> Result<Category, ClientError> {
        let id = self
            .id
            .value()
            .ok_or_else(|| ClientError::Decode(format!("category '{}' has no id", self.name)))?;
        Ok(Category {
            id,
            name: self.name,
            image_url: self.image_url.or(self.image),
            status: self.status,
            product_count: self.product_count.or(self.products_count),
        })
    }
}

// Order row from the orders routes. Money columns may arrive as numbers or
// as decimal strings.
#[derive(Debug, Deserialize)]
pub struct OrderRow {
    pub id: Value,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub delivery_fee: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl OrderRow {
    pub fn into_order(self) -> Result<Order, ClientError> {
        let id = match self.id {
            Value::String(id) if !id.trim().is_empty() => id,
            Value::Number(id) => id.to_string(),
            other => return Err(ClientError::Decode(format!("order has no id: {other}"))),
        };

        Ok(Order {
            id,
            phone: self.phone,
            status: self.status.unwrap_or_else(|| "pending".to_string()),
            payment_status: self.payment_status,
            payment_method: self.payment_method,
            delivery_address: self.delivery_address,
            subtotal: self.subtotal.unwrap_or_default(),
            discount: self.discount.unwrap_or_default(),
            delivery_fee: self.delivery_fee.unwrap_or_default(),
            total: self.total.unwrap_or_default(),
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddressRow {
    pub id: WireId,
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub address_type: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
}

impl AddressRow {
    pub fn into_address(self) -> Result<Address, ClientError> {
        let id = self.id.value().ok_or_else(|| {
            ClientError::Decode(format!("address '{}' has no id", self.address_line_1))
        })?;
        let mut details = AddressDraft::new(
            self.address_line_1,
            self.city,
            self.state,
            self.postal_code,
        );
        details.address_line_2 = self.address_line_2.unwrap_or_default();
        if let Some(country) = self.country {
            details.country = country;
        }
        if let Some(address_type) = self.address_type {
            details.address_type = address_type;
        }

        Ok(Address {
            id,
            details,
            is_default: self.is_default.unwrap_or(false),
        })
    }
}

// `success: false` bodies carry the reason in `message` or `error`.
#[derive(Debug, Default, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Outcome {
    pub fn reason(&self) -> Option<String> {
        self.message.clone().or_else(|| self.error.clone())
    }

    // Turns an explicit `success: false` into an error.
    pub fn check(&self) -> Result<(), ClientError> {
        if self.success == Some(false) {
            return Err(ClientError::Rejected(
                self.reason().unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CartEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub cart: Vec<ProductRow>,
}

#[derive(Debug, Deserialize)]
pub struct WishlistEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub wishlist: Vec<ProductRow>,
    #[serde(default)]
    pub already_exists: bool,
    #[serde(default)]
    pub in_wishlist: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProductsEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub products: Vec<ProductRow>,
}

#[derive(Debug, Deserialize)]
pub struct ProductEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub product: Option<ProductRow>,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub categories: Vec<CategoryRow>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub category: Option<CategoryRow>,
}

#[derive(Debug, Deserialize)]
pub struct OrderEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub order: Option<OrderRow>,
    #[serde(default)]
    pub orders: Vec<OrderRow>,
}

#[derive(Debug, Deserialize)]
pub struct AddressEnvelope {
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(default)]
    pub address: Option<AddressRow>,
    #[serde(default)]
    pub addresses: Vec<AddressRow>,
}

// Analytics routes wrap their payload in `data`.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct OfferCreated {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct UsageCount {
    pub used_count: u32,
}

#[derive(Debug, Serialize)]
pub struct CartItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct WishlistItemRequest<'a> {
    pub phone: &'a str,
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
pub struct PhoneRequest<'a> {
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
pub struct NewAddressRequest<'a> {
    pub phone: &'a str,
    #[serde(flatten)]
    pub address: &'a AddressDraft,
}

#[derive(Debug, Serialize)]
pub struct DefaultAddressRequest {
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderValueRequest {
    #[serde(rename = "orderValue")]
    pub order_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SendOtpRequest<'a> {
    #[serde(rename = "phoneNumber")]
    pub phone_number: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest<'a> {
    #[serde(rename = "phoneNumber")]
    pub phone_number: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct HealthReply {
    #[serde(default)]
    pub success: bool,
}
