use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

pub type AddressId = u64;

const DEFAULT_COUNTRY: &str = "India";
const DEFAULT_ADDRESS_TYPE: &str = "home";

// Address fields as the shopper enters them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddressDraft {
    pub address_line_1: String,
    #[serde(default)]
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_address_type")]
    pub address_type: String,
}

impl AddressDraft {
    pub fn new(
        address_line_1: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            address_line_1: address_line_1.into(),
            address_line_2: String::new(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            country: default_country(),
            address_type: default_address_type(),
        }
    }

    // First required field left blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("address_line_1", &self.address_line_1),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    // Single line stored on the order: "house, area, city - pincode".
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address_line_1.trim()];
        if !self.address_line_2.trim().is_empty() {
            parts.push(self.address_line_2.trim());
        }
        parts.push(self.city.trim());
        format!("{} - {}", parts.join(", "), self.postal_code.trim())
    }
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_address_type() -> String {
    DEFAULT_ADDRESS_TYPE.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    #[serde(flatten)]
    pub details: AddressDraft,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaymentMethod {
    #[default]
    CashOnDelivery,
    Upi,
    Card,
}

impl PaymentMethod {
    // The orders route stores the lower-cased display name.
    pub fn wire_name(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cash on delivery",
            PaymentMethod::Upi => "upi payment",
            PaymentMethod::Card => "credit/debit card",
        }
    }

    // Cash is collected at the door; other methods settle up front.
    pub fn payment_status(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "pending",
            PaymentMethod::Upi | PaymentMethod::Card => "completed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

// Body of an order submission. The backend recomputes the total from its own
// prices and refuses the order when `total` disagrees.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewOrder {
    pub phone: String,
    pub items: Vec<OrderLine>,
    pub delivery_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub delivery_fee: Decimal,
    pub handling_fee: Decimal,
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

// Order as the backend reports it. Ids look like `QC<timestamp><hex>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub delivery_fee: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Order {
    // Shoppers may cancel until the order is being prepared.
    pub fn is_cancellable(&self) -> bool {
        matches!(self.status.as_str(), "pending" | "confirmed")
    }
}
