use common::{OverviewSnapshot, StatusCounts, fixtures};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};

use crate::assistant::Assistant;
use crate::catalog::{Catalog, HistoryStore};
use crate::error::ComputeError;
use crate::panels::{CatalogPanel, DashboardPanel, ForecastPanel, HistoryPanel, UploadPanel};
use crate::simulation::SimulationDelays;

/// Sidebar entries of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Overview,
    Upload,
    Forecast,
    Dashboard,
    Proask,
    History,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Overview,
        Section::Upload,
        Section::Forecast,
        Section::Dashboard,
        Section::Proask,
        Section::History,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Upload => "upload",
            Section::Forecast => "forecast",
            Section::Dashboard => "dashboard",
            Section::Proask => "proask",
            Section::History => "history",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Upload => "Upload Data",
            Section::Forecast => "Forecast",
            Section::Dashboard => "Dashboard",
            Section::Proask => "ProAsk",
            Section::History => "History",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ComputeError::Navigation(format!("Unknown section '{}'", s)))
    }
}

/// One user's dashboard: the shared services, every panel and the active
/// section.
#[derive(Debug)]
pub struct Dashboard {
    catalog: Catalog,
    history: HistoryStore,
    section: Section,
    favorites: Vec<Section>,
    upload: UploadPanel,
    forecast: ForecastPanel,
    analytics: DashboardPanel,
    history_panel: HistoryPanel,
    assistant: Assistant,
}

impl Dashboard {
    pub fn new(catalog: Catalog, history: HistoryStore, delays: SimulationDelays) -> Self {
        Self {
            upload: UploadPanel::new(catalog.clone(), delays.upload),
            forecast: ForecastPanel::new(catalog.clone(), history.clone(), delays.forecast),
            analytics: DashboardPanel::new(catalog.clone()),
            history_panel: HistoryPanel::new(catalog.clone(), history.clone()),
            assistant: Assistant::new(delays.reply),
            section: Section::default(),
            favorites: Vec::new(),
            catalog,
            history,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Switches the active section, abandoning work pending in the one left.
    #[instrument(skip(self), fields(from = %self.section))]
    pub fn navigate(&mut self, section: Section) {
        if section == self.section {
            return;
        }
        match self.section {
            Section::Upload => self.upload.cancel_pending(),
            Section::Forecast => self.forecast.cancel_pending(),
            Section::Proask => self.assistant.cancel_pending(),
            Section::Overview | Section::Dashboard | Section::History => {}
        }
        info!(to = %section, "Navigating");
        self.section = section;
    }

    /// Stars or unstars a sidebar section. Returns whether it is now starred.
    pub fn toggle_favorite(&mut self, section: Section) -> bool {
        if let Some(pos) = self.favorites.iter().position(|s| *s == section) {
            self.favorites.remove(pos);
            debug!(%section, "Removed from favorites");
            false
        } else {
            self.favorites.push(section);
            debug!(%section, "Added to favorites");
            true
        }
    }

    pub fn is_favorite(&self, section: Section) -> bool {
        self.favorites.contains(&section)
    }

    /// Starred sections in the order they were starred.
    pub fn favorites(&self) -> &[Section] {
        &self.favorites
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn upload(&mut self) -> &mut UploadPanel {
        &mut self.upload
    }

    pub fn forecast(&mut self) -> &mut ForecastPanel {
        &mut self.forecast
    }

    pub fn analytics(&mut self) -> &mut DashboardPanel {
        &mut self.analytics
    }

    pub fn history_panel(&mut self) -> &mut HistoryPanel {
        &mut self.history_panel
    }

    pub fn assistant(&mut self) -> &mut Assistant {
        &mut self.assistant
    }

    /// Executive summary of the whole catalog.
    pub fn overview(&self) -> OverviewSnapshot {
        let groups = self.catalog.list();
        let status_counts = StatusCounts::tally(&groups);

        OverviewSnapshot {
            total_groups: groups.len(),
            active_forecasts: status_counts.forecasted,
            status_counts,
            average_accuracy: fixtures::OVERVIEW_ACCURACY,
            last_data_update: fixtures::LAST_DATA_UPDATE.to_string(),
            sales: fixtures::overview_sales(),
            recent_activity: fixtures::recent_activity(),
            notifications: fixtures::notifications(),
        }
    }
}
