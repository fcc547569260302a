use common::{HistoryDetail, HistorySummary, fixtures};
use model::ForecastRecord;
use tracing::debug;

use crate::catalog::{Catalog, HistoryStore};
use crate::error::{ComputeError, Result};
use crate::filter::SearchFields;
use crate::panels::{CatalogPanel, PanelWizard};
use crate::wizard::{HistoryStep, Wizard};

/// The forecast history panel: select -> history, with a detail dialog.
#[derive(Debug)]
pub struct HistoryPanel {
    catalog: Catalog,
    history: HistoryStore,
    wizard: Wizard<HistoryStep>,
    detail: Option<HistoryDetail>,
}

impl HistoryPanel {
    pub fn new(catalog: Catalog, history: HistoryStore) -> Self {
        Self {
            catalog,
            history,
            wizard: Wizard::new(SearchFields::NAME),
            detail: None,
        }
    }

    fn group_id(&self) -> Result<&str> {
        if self.wizard.step() != HistoryStep::History {
            return Err(ComputeError::Navigation(
                "Select a sales group to view its history".to_string(),
            ));
        }
        Ok(self.wizard.require_selected()?.id())
    }

    /// The selected group's runs, newest first.
    pub fn records(&self) -> Result<Vec<ForecastRecord>> {
        Ok(self.history.records(self.group_id()?))
    }

    pub fn summary(&self) -> Result<HistorySummary> {
        Ok(HistorySummary::from_records(&self.records()?))
    }

    /// Opens the detail dialog for one run.
    pub fn view(&mut self, record_id: &str) -> Result<&HistoryDetail> {
        let record = self.history.find(self.group_id()?, record_id)?;
        debug!(record_id, "Opening forecast details");
        Ok(self.detail.insert(HistoryDetail {
            record,
            performance: fixtures::historical_forecast_comparison(),
        }))
    }

    pub fn detail(&self) -> Option<&HistoryDetail> {
        self.detail.as_ref()
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }
}

impl PanelWizard for HistoryPanel {
    type Step = HistoryStep;

    fn wizard(&self) -> &Wizard<HistoryStep> {
        &self.wizard
    }

    fn wizard_mut(&mut self) -> &mut Wizard<HistoryStep> {
        &mut self.wizard
    }
}

impl CatalogPanel for HistoryPanel {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn on_back(&mut self, _step: HistoryStep) {
        self.detail = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_services;

    #[test]
    fn test_records_and_summary() {
        let (catalog, history) = fixture_services();
        let mut panel = HistoryPanel::new(catalog, history);
        assert!(panel.records().is_err());

        panel.select("1").unwrap();
        let records = panel.records().unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].display_date(), "Dec 26, 2024");

        let summary = panel.summary().unwrap();
        assert_eq!(summary.total, 5);
        assert_eq!(summary.best_accuracy, Some(95.3));
    }

    #[test]
    fn test_view_and_close_detail() {
        let (catalog, history) = fixture_services();
        let mut panel = HistoryPanel::new(catalog, history);
        panel.select("2").unwrap();

        let detail = panel.view("3").unwrap();
        assert_eq!(detail.record.model_version, "SARIMAX + ML v2.0");
        assert_eq!(detail.performance.len(), 6);
        assert!(panel.detail().is_some());

        panel.close_detail();
        assert!(panel.detail().is_none());

        assert!(matches!(
            panel.view("42"),
            Err(ComputeError::UnknownRecord(_))
        ));
    }

    #[test]
    fn test_back_closes_detail() {
        let (catalog, history) = fixture_services();
        let mut panel = HistoryPanel::new(catalog, history);
        panel.select("2").unwrap();
        panel.view("1").unwrap();

        panel.back().unwrap();
        assert!(panel.detail().is_none());
        assert!(panel.selected().is_none());
    }
}
