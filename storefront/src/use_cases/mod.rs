pub mod address_book;
pub mod cache;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod coupon;
pub mod ordering;
pub mod phone_verification;
pub mod product_feed;
pub mod wishlist;

mod local_copy;

#[cfg(test)]
pub(crate) mod test_support;
