mod analytics;
mod errors;
mod offer;
mod order;
mod ports;
mod product;
mod session;

// Re-export the domain boundary types and ports.
pub use analytics::{RevenuePeriod, RevenuePoint, RevenueSummary};
pub use errors::{ClientError, StorageError};
pub use offer::{Adjustment, DiscountType, Offer, OfferDraft, OfferValidation};
pub use order::{
    Address, AddressDraft, AddressId, NewOrder, Order, OrderLine, PaymentMethod,
};
pub use ports::{
    AddressBackend, AnalyticsSource, CartBackend, Clock, LocalStorage, OfferValidator,
    OrderBackend, OtpApi, OtpReply, ProductCatalog, WishlistBackend,
};
pub use product::{
    CartItem, Category, CategoryDraft, Product, ProductDraft, ProductId, WishlistItem,
};
pub use session::Session;
