//! Shared helpers for the compute tests.

use model::{GroupStatus, SalesGroup};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::catalog::{Catalog, HistoryStore};
use crate::simulation::SimulationDelays;

/// Two groups in two categories: `APM 1L {Milk}` and `BJ MS 1L {Juice}`.
pub fn milk_and_juice() -> Vec<SalesGroup> {
    vec![
        SalesGroup::new("1", "APM 1L", GroupStatus::Forecasted, vec!["Milk".to_string()])
            .unwrap()
            .with_time_span("Jan 2023 - Dec 2024")
            .with_last_upload("2 hours ago"),
        SalesGroup::new("5", "BJ MS 1L", GroupStatus::Ready, vec!["Juice".to_string()])
            .unwrap()
            .with_time_span("Feb 2023 - Dec 2024")
            .with_last_upload("5 days ago"),
    ]
}

/// Names of filtered groups, for compact assertions.
pub fn names<'a>(groups: &[&'a SalesGroup]) -> Vec<&'a str> {
    groups.iter().map(|g| g.name()).collect()
}

/// Fixture catalog with an empty session history.
pub fn fixture_services() -> (Catalog, HistoryStore) {
    let catalog = Catalog::new(common::fixtures::mock_sales_groups()).unwrap();
    (catalog, HistoryStore::with_fixture_rows())
}

/// Delays short enough that tests without a paused clock stay fast.
pub fn fast_delays() -> SimulationDelays {
    SimulationDelays::uniform(std::time::Duration::from_millis(5))
}

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is read from RUST_LOG and defaults to WARN.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}
