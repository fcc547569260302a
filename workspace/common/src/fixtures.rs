//! Built-in mock data.
//!
//! Every panel reads the same copy of these fixtures. Values are display
//! data only and carry no computed meaning.

use chrono::NaiveDate;
use model::{ForecastRecord, GroupStatus, Horizon, SalesGroup};
use rust_decimal::Decimal;

use crate::views::{
    ActivityItem, ChannelPerformance, ForecastPoint, KpiCard, MonthlyActual, MonthlyComparison,
    ProductShare, SalesTrendPoint, WeeklyAccuracy,
};

/// Model version reported by simulated forecast runs.
pub const MODEL_VERSION: &str = "SARIMAX + ML v2.1";

/// Headline metrics of a simulated forecast run.
pub const FORECAST_GROWTH: f64 = 12.8;
pub const FORECAST_UNCERTAINTY: f64 = 8.2;
pub const FORECAST_ACCURACY: f64 = 94.2;
pub const FORECAST_PEAK_MONTH: &str = "December";
pub const FORECAST_PEAK_UNITS: u32 = 33_700;

fn group(
    id: &str,
    name: &str,
    time_span: &str,
    last_upload: &str,
    status: GroupStatus,
    tags: &[&str],
) -> SalesGroup {
    SalesGroup::new(
        id,
        name,
        status,
        tags.iter().map(|t| t.to_string()).collect(),
    )
    .expect("fixture tags never use the reserved sentinel")
    .with_time_span(time_span)
    .with_last_upload(last_upload)
}

/// The default sales group catalog.
pub fn mock_sales_groups() -> Vec<SalesGroup> {
    vec![
        group(
            "1",
            "APM 1L",
            "Jan 2023 - Dec 2024",
            "2 hours ago",
            GroupStatus::Forecasted,
            &["Milk"],
        ),
        group("2", "APM 1.5L", "Mar 2023 - Dec 2024", "1 day ago", GroupStatus::Ready, &["Milk"]),
        group(
            "3",
            "BPM 1L",
            "Jun 2023 - Nov 2024",
            "3 days ago",
            GroupStatus::NeedsData,
            &["Milk"],
        ),
        group(
            "4",
            "AMJ MS 1L",
            "Jan 2023 - Dec 2024",
            "1 week ago",
            GroupStatus::Forecasted,
            &["Juice"],
        ),
        group("5", "BJ MS 1L", "Feb 2023 - Dec 2024", "5 days ago", GroupStatus::Ready, &["Juice"]),
        group(
            "6",
            "Al Marai Butter 500gm",
            "Jan 2023 - Dec 2024",
            "3 hours ago",
            GroupStatus::NeedsData,
            &["Butter", "importation"],
        ),
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("fixture dates are valid")
}

fn record(
    id: &str,
    generated_on: NaiveDate,
    horizon: Horizon,
    model_version: &str,
    accuracy: f64,
    growth: f64,
) -> ForecastRecord {
    ForecastRecord {
        id: id.to_string(),
        generated_on,
        horizon,
        model_version: model_version.to_string(),
        accuracy,
        growth,
    }
}

/// Past forecast runs, newest first. Every group shows the same rows.
pub fn mock_history() -> Vec<ForecastRecord> {
    vec![
        record("1", date(2024, 12, 26), Horizon::ThreeMonths, "SARIMAX + ML v2.1", 94.2, 12.8),
        record("2", date(2024, 12, 15), Horizon::OneYear, "SARIMAX + ML v2.1", 93.8, 14.2),
        record("3", date(2024, 11, 28), Horizon::ThreeMonths, "SARIMAX + ML v2.0", 91.5, 11.3),
        record("4", date(2024, 11, 10), Horizon::Aop, "SARIMAX + ML v2.0", 92.1, 13.5),
        record("5", date(2024, 10, 22), Horizon::OneMonth, "SARIMAX + ML v1.9", 95.3, 8.7),
    ]
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Twelve months of historical sales preceding a forecast.
pub fn historical_sales() -> Vec<MonthlyActual> {
    const SALES: [u32; 12] = [
        12500, 13200, 14100, 13800, 15200, 16400, 17100, 16800, 18200, 19500, 21000, 23400,
    ];
    MONTHS
        .iter()
        .zip(SALES)
        .map(|(month, sales)| MonthlyActual {
            month: month.to_string(),
            sales,
        })
        .collect()
}

/// Baseline, ML-corrected forecast and confidence band per month.
pub fn forecast_series() -> Vec<ForecastPoint> {
    const ROWS: [(u32, u32, u32, u32); 12] = [
        (23200, 23800, 25500, 22100),
        (24100, 24600, 26400, 22800),
        (25300, 25900, 27800, 24000),
        (26200, 26700, 28700, 24700),
        (25800, 26300, 28300, 24300),
        (27100, 27600, 29700, 25500),
        (28400, 28900, 31100, 26700),
        (30200, 30800, 33200, 28400),
        (33100, 33700, 36300, 31100),
        (34000, 34700, 37200, 32200),
        (35800, 36500, 39100, 33900),
        (37500, 38300, 41000, 35700),
    ];
    MONTHS
        .iter()
        .zip(ROWS)
        .map(|(month, (baseline, corrected, upper, lower))| ForecastPoint {
            month: month.to_string(),
            baseline,
            corrected,
            upper,
            lower,
        })
        .collect()
}

/// Actual vs forecast for the last six months, shown in history details.
pub fn historical_forecast_comparison() -> Vec<MonthlyComparison> {
    comparison(&[
        ("Jul", 17100, 17200),
        ("Aug", 16800, 17000),
        ("Sep", 18200, 18000),
        ("Oct", 19500, 19300),
        ("Nov", 21000, 20500),
        ("Dec", 23400, 23100),
    ])
}

/// Year of actuals vs forecast on the overview panel.
pub fn overview_sales() -> Vec<MonthlyComparison> {
    comparison(&[
        ("Jan", 12500, 12800),
        ("Feb", 13200, 13400),
        ("Mar", 14100, 14000),
        ("Apr", 13800, 13900),
        ("May", 15200, 15100),
        ("Jun", 16400, 16200),
        ("Jul", 17100, 17000),
        ("Aug", 16800, 16900),
        ("Sep", 18200, 18100),
        ("Oct", 19500, 19300),
        ("Nov", 21000, 20800),
        ("Dec", 23400, 23200),
    ])
}

fn comparison(rows: &[(&str, u32, u32)]) -> Vec<MonthlyComparison> {
    rows.iter()
        .map(|(month, sales, forecast)| MonthlyComparison {
            month: month.to_string(),
            sales: *sales,
            forecast: *forecast,
        })
        .collect()
}

pub fn dashboard_kpis() -> Vec<KpiCard> {
    [
        ("Total Revenue", "$128.1K", "+15.3% from last period"),
        ("Units Sold", "2,860", "+8.7% from last period"),
        ("Growth Rate", "+11.4%", "Best in 6 months"),
        ("Forecast Accuracy", "94.2%", "+2.1% improvement"),
    ]
    .into_iter()
    .map(|(title, value, change)| KpiCard {
        title: title.to_string(),
        value: value.to_string(),
        change: change.to_string(),
    })
    .collect()
}

pub fn sales_trend() -> Vec<SalesTrendPoint> {
    [
        ("Jul", 17100, 16500, 3.6),
        ("Aug", 16800, 17000, -1.8),
        ("Sep", 18200, 17500, 8.3),
        ("Oct", 19500, 18000, 7.1),
        ("Nov", 21000, 19500, 7.7),
        ("Dec", 23400, 21000, 11.4),
    ]
    .into_iter()
    .map(|(month, sales, target, growth)| SalesTrendPoint {
        month: month.to_string(),
        sales,
        target,
        growth,
    })
    .collect()
}

pub fn product_mix() -> Vec<ProductShare> {
    [
        ("Product A", 4200, 35),
        ("Product B", 3200, 27),
        ("Product C", 2400, 20),
        ("Product D", 1400, 12),
        ("Others", 800, 6),
    ]
    .into_iter()
    .map(|(name, value, percentage)| ProductShare {
        name: name.to_string(),
        value,
        percentage,
    })
    .collect()
}

pub fn channel_performance() -> Vec<ChannelPerformance> {
    [
        ("Online", 45200, 1240, 3645),
        ("Retail", 38900, 890, 4371),
        ("Wholesale", 28400, 420, 6762),
        ("Partners", 15600, 310, 5032),
    ]
    .into_iter()
    .map(|(channel, revenue, orders, avg_cents)| ChannelPerformance {
        channel: channel.to_string(),
        revenue: Decimal::new(revenue, 0),
        orders,
        avg_order: Decimal::new(avg_cents, 2),
    })
    .collect()
}

pub fn weekly_accuracy() -> Vec<WeeklyAccuracy> {
    [92.5, 94.2, 91.8, 95.1, 93.7, 94.8]
        .into_iter()
        .enumerate()
        .map(|(i, accuracy)| WeeklyAccuracy {
            week: format!("Week {}", i + 1),
            accuracy,
        })
        .collect()
}

pub fn recent_activity() -> Vec<ActivityItem> {
    [
        ("upload", "APM 1L", "2 hours ago"),
        ("forecast", "AMJ MS 1L", "1 week ago"),
        ("upload", "Al Marai Butter 500gm", "3 hours ago"),
        ("forecast", "BJ MS 1L", "2 days ago"),
    ]
    .into_iter()
    .map(|(kind, title, date)| ActivityItem {
        kind: kind.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        status: "completed".to_string(),
    })
    .collect()
}

pub fn notifications() -> Vec<String> {
    vec![
        "APM 1L forecast is ready.".to_string(),
        "Forecasting engine's regular retraining is due 2 days.".to_string(),
    ]
}

/// Average accuracy across all forecasts, as shown on the overview.
pub const OVERVIEW_ACCURACY: f64 = 88.2;

/// Relative time of the newest upload, as shown on the overview.
pub const LAST_DATA_UPDATE: &str = "2h";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let groups = mock_sales_groups();
        let mut ids: Vec<&str> = groups.iter().map(|g| g.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), groups.len());
    }

    #[test]
    fn test_series_lengths() {
        assert_eq!(historical_sales().len(), 12);
        assert_eq!(forecast_series().len(), 12);
        assert_eq!(historical_forecast_comparison().len(), 6);
        assert_eq!(weekly_accuracy()[5].week, "Week 6");
        assert_eq!(channel_performance()[0].avg_order.to_string(), "36.45");
    }

    #[test]
    fn test_forecast_band_contains_corrected_value() {
        for point in forecast_series() {
            assert!(point.lower <= point.corrected && point.corrected <= point.upper);
        }
    }
}
