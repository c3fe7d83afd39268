use rust_decimal::Decimal;

use crate::domain::{Adjustment, Offer, OfferValidation, OfferValidator};

// Holds the single coupon applied to the current checkout.
pub struct CouponState<V> {
    validator: V,
    active: Option<Offer>,
}

impl<V: OfferValidator> CouponState<V> {
    pub fn new(validator: V) -> Self {
        Self {
            validator,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&Offer> {
        self.active.as_ref()
    }

    // Validates the code against the offers backend. A failed apply clears
    // whatever coupon was active before.
    pub async fn apply(&mut self, code: &str, order_subtotal: Decimal) -> OfferValidation {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return rejected("Please enter a coupon code".to_string());
        }

        let validation = match self.validator.validate(&code, order_subtotal).await {
            Ok(validation) => validation,
            Err(err) => {
                tracing::warn!(code = %code, error = %err, "coupon validation failed");
                rejected(err.user_message())
            }
        };

        self.active = match &validation.offer {
            Some(offer) if validation.valid => Some(offer.clone()),
            _ => None,
        };
        validation
    }

    pub fn remove(&mut self) {
        self.active = None;
    }

    // Effect of the active coupon on the given subtotal.
    pub fn adjustment(&self, subtotal: Decimal) -> Adjustment {
        self.active
            .as_ref()
            .map(|offer| offer.adjustment_for(subtotal))
            .unwrap_or_default()
    }
}

fn rejected(message: String) -> OfferValidation {
    OfferValidation {
        valid: false,
        offer: None,
        message,
        discount_amount: None,
    }
}
