use crate::domain::{
    Category, CategoryDraft, ClientError, Clock, Product, ProductCatalog, ProductDraft, ProductId,
};
use crate::use_cases::cache::TtlCache;
use crate::use_cases::product_feed::{ProductEvent, ProductFeed};

const ALL_PRODUCTS_KEY: &str = "products:all";
const CATEGORIES_KEY: &str = "categories";

// Cached read access to the catalog plus admin writes that keep the cache
// and the product feed in step.
pub struct Catalog<P, C> {
    source: P,
    products: TtlCache<Vec<Product>, C>,
    categories: TtlCache<Vec<Category>, C>,
    feed: ProductFeed,
}

impl<P, C> Catalog<P, C>
where
    P: ProductCatalog,
    C: Clock + Clone,
{
    pub fn new(source: P, clock: C, feed: ProductFeed) -> Self {
        Self {
            source,
            products: TtlCache::new(clock.clone()),
            categories: TtlCache::new(clock),
            feed,
        }
    }

    pub fn feed(&self) -> &ProductFeed {
        &self.feed
    }

    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.products
            .get_or_fetch(ALL_PRODUCTS_KEY, || self.source.list_products())
            .await
    }

    pub async fn featured(&self, limit: u32) -> Result<Vec<Product>, ClientError> {
        let key = format!("products:featured:{limit}");
        self.products
            .get_or_fetch(&key, || self.source.featured(limit))
            .await
    }

    pub async fn by_category(&self, category_id: ProductId) -> Result<Vec<Product>, ClientError> {
        let key = format!("products:category:{category_id}");
        self.products
            .get_or_fetch(&key, || self.source.products_by_category(category_id))
            .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.categories
            .get_or_fetch(CATEGORIES_KEY, || self.source.categories())
            .await
    }

    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, ClientError> {
        self.source.product(id).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Product>, ClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.source.search(query).await
    }

    pub async fn related(&self, id: ProductId, limit: u32) -> Result<Vec<Product>, ClientError> {
        self.source.related(id, limit).await
    }

    // Drops cached listings, reloads them and tells subscribers.
    pub async fn refresh(&self) -> Result<Vec<Product>, ClientError> {
        self.products.invalidate_matching("products");
        let products = self.products().await?;
        self.feed.publish(ProductEvent::Replaced(products.clone()));
        Ok(products)
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ClientError> {
        let product = self.source.create_product(draft).await?;
        self.products.invalidate_matching("products");
        self.feed.publish(ProductEvent::Upserted(product.clone()));
        tracing::info!(product_id = product.id, "product created");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ClientError> {
        let product = self.source.update_product(id, draft).await?;
        self.products.invalidate_matching("products");
        self.feed.publish(ProductEvent::Upserted(product.clone()));
        tracing::info!(product_id = id, "product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        self.source.delete_product(id).await?;
        self.products.invalidate_matching("products");
        self.feed.publish(ProductEvent::Removed(id));
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }

    pub async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ClientError> {
        let category = self.source.create_category(draft).await?;
        self.categories_changed();
        Ok(category)
    }

    // Renames show up on products too, so both caches are dropped.
    pub async fn update_category(
        &self,
        id: ProductId,
        draft: &CategoryDraft,
    ) -> Result<Category, ClientError> {
        let category = self.source.update_category(id, draft).await?;
        self.categories_changed();
        Ok(category)
    }

    pub async fn delete_category(&self, id: ProductId) -> Result<(), ClientError> {
        self.source.delete_category(id).await?;
        self.categories_changed();
        Ok(())
    }

    fn categories_changed(&self) {
        self.categories.clear();
        self.products.invalidate_matching("products");
        self.feed.publish(ProductEvent::CategoriesChanged);
    }
}
