pub mod assistant;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod panels;
pub mod session;
pub mod simulation;
pub mod tags;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testing;

use catalog::{Catalog, CatalogSource, HistoryStore};
use session::Dashboard;
use simulation::SimulationDelays;

/// Returns a dashboard session wired the way it is used most of the time.
///
/// The catalog is loaded from `source` and every group starts with the
/// fixture forecast history.
pub async fn default_dashboard(
    source: &dyn CatalogSource,
    delays: SimulationDelays,
) -> error::Result<Dashboard> {
    let catalog = Catalog::load(source).await?;
    Ok(Dashboard::new(
        catalog,
        HistoryStore::with_fixture_rows(),
        delays,
    ))
}
