// Composition root wiring the storefront state containers to their backends.

use crate::domain::{
    AddressDraft, AnalyticsSource, ClientError, LocalStorage, OfferValidation, Order,
    PaymentMethod,
};
use crate::frameworks::config::StorefrontConfig;
use crate::interface_adapters::clients::{
    AddressesClient, AnalyticsClient, ApiClient, CartClient, OffersClient, OrdersClient,
    ProductsClient, SampleAnalytics, SmsClient, WishlistClient,
};
use crate::interface_adapters::state::SystemClock;
use crate::interface_adapters::storage::FileStorage;
use crate::use_cases::address_book::AddressBook;
use crate::use_cases::cart::{Applied, Cart};
use crate::use_cases::catalog::Catalog;
use crate::use_cases::checkout::{OrderSummary, summarize};
use crate::use_cases::coupon::CouponState;
use crate::use_cases::ordering::{CheckoutError, OrderHistory, build_order};
use crate::use_cases::phone_verification::{PhoneVerifier, VerificationError, clean_phone};
use crate::use_cases::product_feed::ProductFeed;
use crate::use_cases::wishlist::Wishlist;

pub struct Storefront<S = FileStorage> {
    pub cart: Cart<CartClient, S>,
    pub wishlist: Wishlist<WishlistClient, S>,
    pub orders: OrderHistory<OrdersClient, S>,
    pub addresses: AddressBook<AddressesClient, S>,
    pub coupons: CouponState<OffersClient>,
    pub catalog: Catalog<ProductsClient, SystemClock>,
    pub verifier: PhoneVerifier<SmsClient, SystemClock>,
    pub offers: OffersClient,
    analytics: Box<dyn AnalyticsSource>,
    // Holds the account token every resource client sends.
    api: ApiClient,
}

impl Storefront<FileStorage> {
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ClientError> {
        Self::with_storage(config, FileStorage::new(config.storage_dir.clone()))
    }
}

impl<S> Storefront<S>
where
    S: LocalStorage + Clone,
{
    pub fn with_storage(config: &StorefrontConfig, storage: S) -> Result<Self, ClientError> {
        let mut api = ApiClient::new(config.api_base_url.clone(), config.api_timeout)?;
        if let Some(token) = &config.auth_token {
            api = api.with_token(token.clone());
        }
        let otp_api = ApiClient::new(config.otp_base_url.clone(), config.api_timeout)?;

        let analytics: Box<dyn AnalyticsSource> = if config.use_mock_data {
            tracing::warn!("analytics is serving sample data");
            Box::new(SampleAnalytics)
        } else {
            Box::new(AnalyticsClient::new(api.clone()))
        };
        let offers = OffersClient::new(api.clone());

        tracing::info!(
            api = %config.api_base_url,
            otp_api = %config.otp_base_url,
            authenticated = api.has_token(),
            "storefront configured"
        );

        Ok(Self {
            cart: Cart::new(CartClient::new(api.clone()), storage.clone()),
            wishlist: Wishlist::new(WishlistClient::new(api.clone()), storage.clone()),
            orders: OrderHistory::new(OrdersClient::new(api.clone()), storage.clone()),
            addresses: AddressBook::new(AddressesClient::new(api.clone()), storage),
            coupons: CouponState::new(offers.clone()),
            catalog: Catalog::new(
                ProductsClient::new(api.clone()),
                SystemClock,
                ProductFeed::default(),
            ),
            verifier: PhoneVerifier::new(SmsClient::new(otp_api), SystemClock),
            offers,
            analytics,
            api,
        })
    }

    pub fn analytics(&self) -> &dyn AnalyticsSource {
        self.analytics.as_ref()
    }

    // Restores both containers for the current session.
    pub async fn load(&mut self) {
        self.cart.load().await;
        self.wishlist.load().await;
    }

    // Checks the code with the OTP backend and, on success, signs the
    // shopper in. A token in the verify reply authorizes the account calls.
    pub async fn login(&mut self, phone: &str, code: &str) -> Result<Applied, VerificationError> {
        let reply = self.verifier.verify(phone, code).await?;
        match reply.token {
            Some(token) => self.api.set_token(Some(token)),
            None if !self.api.has_token() => {
                tracing::warn!(
                    new_user = reply.is_new_user,
                    "verified without an account token, account state stays local"
                );
            }
            None => {}
        }
        Ok(self.sign_in(&clean_phone(phone)).await)
    }

    pub fn is_authorized(&self) -> bool {
        self.api.has_token()
    }

    // Merges guest state into the account; reports the cart outcome.
    pub async fn sign_in(&mut self, phone: &str) -> Applied {
        let cart = self.cart.sign_in(phone).await;
        let wishlist = self.wishlist.sign_in(phone).await;
        if cart == Applied::Fallback || wishlist == Applied::Fallback {
            tracing::warn!("signed in with local state; backends will be resynced later");
        }
        cart
    }

    pub fn sign_out(&mut self) {
        self.api.clear_token();
        self.cart.sign_out();
        self.wishlist.sign_out();
        self.orders.forget();
        self.addresses.forget();
        self.coupons.remove();
    }

    pub async fn apply_coupon(&mut self, code: &str) -> OfferValidation {
        let subtotal = self.cart.total();
        self.coupons.apply(code, subtotal).await
    }

    pub fn checkout_summary(&self) -> OrderSummary {
        summarize(self.cart.total(), self.coupons.active())
    }

    // Submits the cart with the current bill. The order carries the coupon
    // code, and the orders route records the redemption when it grants the
    // discount. On success the cart is emptied and the coupon dropped.
    pub async fn place_order(
        &mut self,
        address: &AddressDraft,
        payment: PaymentMethod,
    ) -> Result<Order, CheckoutError> {
        let Some(phone) = self.cart.session().phone().map(str::to_string) else {
            return Err(CheckoutError::NotSignedIn);
        };

        let summary = self.checkout_summary();
        let order = build_order(&phone, self.cart.items(), &summary, address, payment)?;
        let placed = self.orders.place(&order).await?;

        if self.cart.clear().await == Applied::Fallback {
            tracing::warn!(order_id = %placed.id, "cart cleared locally after order");
        }
        self.coupons.remove();
        Ok(placed)
    }
}
