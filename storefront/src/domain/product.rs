use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

pub type ProductId = u64;

// Canonical product shape used everywhere past the API boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    // Whole-percent markdown from the original price, 0 when not discounted.
    pub fn discount_percent(&self) -> u32 {
        let Some(original) = self.original_price else {
            return 0;
        };
        if original <= self.price || original.is_zero() {
            return 0;
        }

        ((original - self.price) / original * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
            .unwrap_or(0)
    }
}

// Wishlist entries carry the product projection without a quantity.
pub type WishlistItem = Product;

// One cart line. Quantity is always at least 1 while the line exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            original_price: product.original_price,
            size: product.size.clone(),
            image_url: product.image_url.clone(),
            stock: product.stock,
            category_name: product.category_name.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub product_count: Option<u32>,
}

// Admin payload for creating or replacing a product.
#[derive(Clone, Debug, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// Admin payload for creating or replacing a category.
#[derive(Clone, Debug, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub status: String,
}
