use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Window accepted by the revenue chart endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevenuePeriod {
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl RevenuePeriod {
    pub fn as_query(self) -> &'static str {
        match self {
            RevenuePeriod::Week => "7d",
            RevenuePeriod::Month => "30d",
            RevenuePeriod::Quarter => "90d",
            RevenuePeriod::Year => "1y",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    #[serde(alias = "month", alias = "date")]
    pub label: String,
    pub revenue: Decimal,
    #[serde(default)]
    pub orders: u32,
}

// Headline numbers shown above the revenue chart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevenueSummary {
    pub total: Decimal,
    pub average: Decimal,
    pub peak: Decimal,
    pub orders: u32,
}

impl RevenueSummary {
    pub fn from_points(points: &[RevenuePoint]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let total: Decimal = points.iter().map(|point| point.revenue).sum();
        let peak = points
            .iter()
            .map(|point| point.revenue)
            .max()
            .unwrap_or_default();
        let orders = points.iter().map(|point| point.orders).sum();

        Self {
            total,
            average: total / Decimal::from(points.len()),
            peak,
            orders,
        }
    }
}
