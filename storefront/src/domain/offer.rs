use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
    FreeDelivery,
}

// Coupon as returned by the offers backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    #[serde(default)]
    pub id: Option<u64>,
    pub code: String,
    pub discount_type: DiscountType,
    #[serde(default)]
    pub discount_value: Decimal,
    #[serde(default)]
    pub max_discount_amount: Option<Decimal>,
    #[serde(default)]
    pub min_order_value: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

// Effect of a coupon on one order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Adjustment {
    pub discount: Decimal,
    pub free_delivery: bool,
}

impl Offer {
    // The discount never exceeds the subtotal, so totals never go negative.
    pub fn adjustment_for(&self, subtotal: Decimal) -> Adjustment {
        let subtotal = subtotal.max(Decimal::ZERO);
        let value = self.discount_value.max(Decimal::ZERO);

        match self.discount_type {
            DiscountType::Percentage => {
                let mut discount = subtotal * value / Decimal::ONE_HUNDRED;
                // A zero cap means "uncapped", matching how the backend stores it.
                if let Some(cap) = self.max_discount_amount.filter(|cap| !cap.is_zero()) {
                    discount = discount.min(cap);
                }
                Adjustment {
                    discount: discount.min(subtotal),
                    free_delivery: false,
                }
            }
            DiscountType::Fixed => Adjustment {
                discount: value.min(subtotal),
                free_delivery: false,
            },
            DiscountType::FreeDelivery => Adjustment {
                discount: Decimal::ZERO,
                free_delivery: true,
            },
        }
    }
}

// Verdict from the offers backend for a code and order value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferValidation {
    pub valid: bool,
    #[serde(default)]
    pub offer: Option<Offer>,
    #[serde(default)]
    pub message: String,
    // Discount the backend computed, when it reports one.
    #[serde(default, rename = "discountAmount", skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<Decimal>,
}

// Admin payload for creating or editing a coupon.
#[derive(Clone, Debug, Serialize)]
pub struct OfferDraft {
    pub title: String,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<Decimal>,
    pub min_order_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub usage_limit: u32,
}
