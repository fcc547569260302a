use chrono::NaiveDate;
use model::{ForecastOptions, ForecastRecord, GroupStatus, SalesGroup};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Message shown instead of an empty card grid.
pub const EMPTY_CATALOG_MESSAGE: &str = "No sales groups found matching your filters";

// ===================== Catalog =====================

/// A sales group as rendered on a selection card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupCard {
    pub id: String,
    pub name: String,
    pub time_span: String,
    pub last_upload: String,
    pub status: GroupStatus,
    pub status_label: String,
    pub tags: Vec<String>,
}

impl From<&SalesGroup> for GroupCard {
    fn from(group: &SalesGroup) -> Self {
        Self {
            id: group.id().to_string(),
            name: group.name().to_string(),
            time_span: group.time_span().to_string(),
            last_upload: group.last_upload().to_string(),
            status: group.status(),
            status_label: group.status().label(),
            tags: group.tags().to_vec(),
        }
    }
}

/// One button of the category bar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryChip {
    pub name: String,
    pub active: bool,
}

/// Everything the selection step of a panel renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogView {
    pub search_term: String,
    pub categories: Vec<CategoryChip>,
    /// The "Clear" affordance is only offered while a category is selected.
    pub show_clear: bool,
    pub groups: Vec<GroupCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

// ===================== Forecast =====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyActual {
    pub month: String,
    pub sales: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForecastPoint {
    pub month: String,
    pub baseline: u32,
    pub corrected: u32,
    pub upper: u32,
    pub lower: u32,
}

/// Result of a (simulated) forecast run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastSummary {
    pub group_id: String,
    pub group_name: String,
    pub options: ForecastOptions,
    pub model_version: String,
    /// Expected growth vs the previous period, in percent.
    pub expected_growth: f64,
    /// Width of the 95% confidence interval, in percent.
    pub uncertainty: f64,
    /// Forecast accuracy on the backtest window, in percent.
    pub accuracy: f64,
    pub peak_month: String,
    pub peak_units: u32,
    pub historical: Vec<MonthlyActual>,
    pub forecast: Vec<ForecastPoint>,
}

// ===================== Dashboard =====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub change: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesTrendPoint {
    pub month: String,
    pub sales: u32,
    pub target: u32,
    pub growth: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductShare {
    pub name: String,
    pub value: u32,
    pub percentage: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelPerformance {
    pub channel: String,
    pub revenue: Decimal,
    pub orders: u32,
    pub avg_order: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyAccuracy {
    pub week: String,
    pub accuracy: f64,
}

/// The analytics step of the dashboard panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSnapshot {
    pub group_id: String,
    pub group_name: String,
    pub kpis: Vec<KpiCard>,
    pub sales_trend: Vec<SalesTrendPoint>,
    pub product_mix: Vec<ProductShare>,
    pub channels: Vec<ChannelPerformance>,
    pub accuracy: Vec<WeeklyAccuracy>,
}

// ===================== History =====================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyComparison {
    pub month: String,
    pub sales: u32,
    pub forecast: u32,
}

/// Summary cards above the history table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistorySummary {
    pub total: usize,
    pub average_accuracy: Option<f64>,
    pub best_accuracy: Option<f64>,
    pub best_accuracy_on: Option<NaiveDate>,
    pub average_growth: Option<f64>,
    pub latest_run: Option<NaiveDate>,
}

impl HistorySummary {
    /// Aggregates the summary cards from a set of history rows.
    pub fn from_records(records: &[ForecastRecord]) -> Self {
        if records.is_empty() {
            return Self {
                total: 0,
                average_accuracy: None,
                best_accuracy: None,
                best_accuracy_on: None,
                average_growth: None,
                latest_run: None,
            };
        }

        let count = records.len() as f64;
        let average_accuracy = records.iter().map(|r| r.accuracy).sum::<f64>() / count;
        let average_growth = records.iter().map(|r| r.growth).sum::<f64>() / count;
        let best = records
            .iter()
            .max_by(|a, b| a.accuracy.total_cmp(&b.accuracy));

        Self {
            total: records.len(),
            average_accuracy: Some(average_accuracy),
            best_accuracy: best.map(|r| r.accuracy),
            best_accuracy_on: best.map(|r| r.generated_on),
            average_growth: Some(average_growth),
            latest_run: records.iter().map(|r| r.generated_on).max(),
        }
    }
}

/// Detail dialog for one history row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryDetail {
    pub record: ForecastRecord,
    pub performance: Vec<MonthlyComparison>,
}

// ===================== Overview =====================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub ready: usize,
    pub needs_data: usize,
    pub forecasted: usize,
}

impl StatusCounts {
    pub fn tally<'a>(groups: impl IntoIterator<Item = &'a SalesGroup>) -> Self {
        let mut counts = Self::default();
        for group in groups {
            match group.status() {
                GroupStatus::Ready => counts.ready += 1,
                GroupStatus::NeedsData => counts.needs_data += 1,
                GroupStatus::Forecasted => counts.forecasted += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityItem {
    pub kind: String,
    pub title: String,
    pub date: String,
    pub status: String,
}

/// Executive summary shown on the overview panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverviewSnapshot {
    pub total_groups: usize,
    pub status_counts: StatusCounts,
    /// Groups that currently hold a forecast.
    pub active_forecasts: usize,
    pub average_accuracy: f64,
    pub last_data_update: String,
    pub sales: Vec<MonthlyComparison>,
    pub recent_activity: Vec<ActivityItem>,
    pub notifications: Vec<String>,
}
