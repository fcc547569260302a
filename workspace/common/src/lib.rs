//! Shapes and fixture data shared by every dashboard panel.
//!
//! The fixtures stand in for the upstream data layer: one copy of the mock
//! catalog, history and chart series that all panels read from. The view
//! structs are what the presentation layer renders or serializes.

pub mod fixtures;
mod views;

pub use views::{
    ActivityItem, AnalyticsSnapshot, CatalogView, CategoryChip, ChannelPerformance,
    ForecastPoint, ForecastSummary, GroupCard, HistoryDetail, HistorySummary, KpiCard,
    MonthlyActual, MonthlyComparison, OverviewSnapshot, ProductShare, SalesTrendPoint,
    StatusCounts, WeeklyAccuracy, EMPTY_CATALOG_MESSAGE,
};
