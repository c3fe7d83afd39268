use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::domain::{AnalyticsSource, ClientError, RevenuePeriod, RevenuePoint};
use crate::interface_adapters::clients::ApiClient;
use crate::interface_adapters::protocol::DataEnvelope;

// Admin dashboard endpoints under `/analytics`.
#[derive(Clone)]
pub struct AnalyticsClient {
    api: ApiClient,
}

impl AnalyticsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let envelope: DataEnvelope<T> = self.api.get(path, query).await?;
        envelope.outcome.check()?;
        envelope
            .data
            .ok_or_else(|| ClientError::Decode(format!("{path} returned no data")))
    }
}

#[async_trait]
impl AnalyticsSource for AnalyticsClient {
    async fn dashboard_stats(&self) -> Result<Value, ClientError> {
        self.data("/analytics/dashboard-stats", &[]).await
    }

    async fn revenue_chart(
        &self,
        period: RevenuePeriod,
    ) -> Result<Vec<RevenuePoint>, ClientError> {
        self.data("/analytics/revenue-chart", &[("period", period.as_query())])
            .await
    }

    async fn product_performance(&self) -> Result<Value, ClientError> {
        self.data("/analytics/product-performance", &[]).await
    }

    async fn category_performance(&self) -> Result<Value, ClientError> {
        self.data("/analytics/category-performance", &[]).await
    }

    async fn performance_metrics(&self) -> Result<Value, ClientError> {
        self.data("/analytics/performance-metrics", &[]).await
    }
}

const SAMPLE_REVENUE: [(&str, i64, u32); 6] = [
    ("Jan", 15_000, 45),
    ("Feb", 18_000, 52),
    ("Mar", 22_000, 68),
    ("Apr", 19_000, 58),
    ("May", 25_000, 75),
    ("Jun", 28_000, 82),
];

// Canned dashboard data for demos without a backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct SampleAnalytics;

#[async_trait]
impl AnalyticsSource for SampleAnalytics {
    async fn dashboard_stats(&self) -> Result<Value, ClientError> {
        let revenue: i64 = SAMPLE_REVENUE.iter().map(|(_, revenue, _)| revenue).sum();
        let orders: u32 = SAMPLE_REVENUE.iter().map(|(_, _, orders)| orders).sum();
        Ok(json!({
            "totalRevenue": revenue,
            "totalOrders": orders,
            "totalProducts": 48,
            "totalCustomers": 126
        }))
    }

    // The sample series is the same for every period.
    async fn revenue_chart(
        &self,
        _period: RevenuePeriod,
    ) -> Result<Vec<RevenuePoint>, ClientError> {
        Ok(SAMPLE_REVENUE
            .iter()
            .map(|(label, revenue, orders)| RevenuePoint {
                label: (*label).to_string(),
                revenue: Decimal::from(*revenue),
                orders: *orders,
            })
            .collect())
    }

    async fn product_performance(&self) -> Result<Value, ClientError> {
        Ok(json!([
            { "name": "Fresh Apples", "sales": 124, "revenue": 14_880 },
            { "name": "Amul Milk", "sales": 310, "revenue": 9_300 },
            { "name": "Brown Bread", "sales": 98, "revenue": 4_410 }
        ]))
    }

    async fn category_performance(&self) -> Result<Value, ClientError> {
        Ok(json!([
            { "name": "Fruits & Vegetables", "value": 35 },
            { "name": "Dairy & Breakfast", "value": 28 },
            { "name": "Bakery & Biscuits", "value": 17 },
            { "name": "Snacks", "value": 20 }
        ]))
    }

    async fn performance_metrics(&self) -> Result<Value, ClientError> {
        Ok(json!({
            "averageOrderValue": 330,
            "conversionRate": 3.2,
            "repeatCustomerRate": 41
        }))
    }
}
