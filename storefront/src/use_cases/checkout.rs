use rust_decimal::Decimal;

use crate::domain::Offer;

// Orders below this subtotal pay the delivery fee.
pub const FREE_DELIVERY_THRESHOLD: Decimal = Decimal::from_parts(99, 0, 0, false, 0);
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(29, 0, 0, false, 0);
pub const HANDLING_FEE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

// Every line shown on the checkout bill.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub delivery_fee: Decimal,
    pub handling_fee: Decimal,
    pub total: Decimal,
    // How much more the shopper must add to skip the delivery fee.
    pub free_delivery_gap: Decimal,
    pub coupon_code: Option<String>,
}

pub fn summarize(subtotal: Decimal, coupon: Option<&Offer>) -> OrderSummary {
    let subtotal = subtotal.max(Decimal::ZERO);
    let adjustment = coupon
        .map(|offer| offer.adjustment_for(subtotal))
        .unwrap_or_default();

    let delivery_fee = if adjustment.free_delivery || subtotal >= FREE_DELIVERY_THRESHOLD {
        Decimal::ZERO
    } else {
        DELIVERY_FEE
    };
    let free_delivery_gap = (FREE_DELIVERY_THRESHOLD - subtotal).max(Decimal::ZERO);

    OrderSummary {
        subtotal,
        discount: adjustment.discount,
        delivery_fee,
        handling_fee: HANDLING_FEE,
        total: subtotal - adjustment.discount + delivery_fee + HANDLING_FEE,
        free_delivery_gap,
        coupon_code: coupon.map(|offer| offer.code.clone()),
    }
}
