use async_trait::async_trait;
use reqwest::Method;

use crate::domain::{
    Category, CategoryDraft, ClientError, Product, ProductCatalog, ProductDraft, ProductId,
};
use crate::interface_adapters::clients::ApiClient;
use crate::interface_adapters::protocol::{
    CategoriesEnvelope, CategoryEnvelope, Outcome, ProductEnvelope, ProductsEnvelope,
    products_from_rows,
};

// Product and category resources. Admin writes need the admin token.
#[derive(Clone)]
pub struct ProductsClient {
    api: ApiClient,
}

impl ProductsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn listing(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Product>, ClientError> {
        let envelope: ProductsEnvelope = self.api.get(path, query).await?;
        envelope.outcome.check()?;
        products_from_rows(envelope.products)
    }

    async fn write_product(
        &self,
        method: Method,
        path: &str,
        draft: &ProductDraft,
    ) -> Result<Product, ClientError> {
        let url = self.api.url(path, &[])?;
        let request = self.api.authed(method, url)?.json(draft);
        let envelope: ProductEnvelope = super::send_json(request).await?;
        envelope.outcome.check()?;
        envelope
            .product
            .ok_or_else(|| ClientError::Decode("response carried no product".to_string()))?
            .into_product()
    }

    async fn write_category(
        &self,
        method: Method,
        path: &str,
        draft: &CategoryDraft,
    ) -> Result<Category, ClientError> {
        let url = self.api.url(path, &[])?;
        let request = self.api.authed(method, url)?.json(draft);
        let envelope: CategoryEnvelope = super::send_json(request).await?;
        envelope.outcome.check()?;
        envelope
            .category
            .ok_or_else(|| ClientError::Decode("response carried no category".to_string()))?
            .into_category()
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.api.url(path, &[])?;
        let request = self.api.authed(Method::DELETE, url)?;
        let outcome: Outcome = super::send_json(request).await?;
        outcome.check()
    }
}

#[async_trait]
impl ProductCatalog for ProductsClient {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.listing("/products", &[]).await
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, ClientError> {
        let result: Result<ProductEnvelope, ClientError> =
            self.api.get(&format!("/products/{id}"), &[]).await;
        let envelope = match result {
            Err(ClientError::Upstream { status: 404, .. }) => return Ok(None),
            other => other?,
        };
        envelope.outcome.check()?;
        envelope.product.map(|row| row.into_product()).transpose()
    }

    async fn products_by_category(
        &self,
        category_id: ProductId,
    ) -> Result<Vec<Product>, ClientError> {
        let category = category_id.to_string();
        self.listing("/products", &[("category", category.as_str())])
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>, ClientError> {
        self.listing("/products/search", &[("q", query)]).await
    }

    async fn featured(&self, limit: u32) -> Result<Vec<Product>, ClientError> {
        let limit = limit.to_string();
        self.listing(
            "/products",
            &[("limit", limit.as_str()), ("featured", "true")],
        )
        .await
    }

    async fn related(&self, id: ProductId, limit: u32) -> Result<Vec<Product>, ClientError> {
        let limit = limit.to_string();
        self.listing(
            &format!("/products/{id}/related"),
            &[("limit", limit.as_str())],
        )
        .await
    }

    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let envelope: CategoriesEnvelope = self.api.get("/categories", &[]).await?;
        envelope.outcome.check()?;
        envelope
            .categories
            .into_iter()
            .map(|row| row.into_category())
            .collect()
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ClientError> {
        self.write_product(Method::POST, "/products", draft).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ClientError> {
        self.write_product(Method::PUT, &format!("/products/{id}"), draft)
            .await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        self.delete(&format!("/products/{id}")).await
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ClientError> {
        self.write_category(Method::POST, "/categories", draft)
            .await
    }

    async fn update_category(
        &self,
        id: ProductId,
        draft: &CategoryDraft,
    ) -> Result<Category, ClientError> {
        self.write_category(Method::PUT, &format!("/categories/{id}"), draft)
            .await
    }

    async fn delete_category(&self, id: ProductId) -> Result<(), ClientError> {
        self.delete(&format!("/categories/{id}")).await
    }
}
