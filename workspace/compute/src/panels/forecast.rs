use chrono::Local;
use common::{ForecastSummary, fixtures};
use model::{ForecastOptions, ForecastRecord, Horizon, PipelineEvent, SalesGroup};
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::catalog::{Catalog, HistoryStore};
use crate::error::{ComputeError, Result};
use crate::filter::SearchFields;
use crate::panels::{CatalogPanel, PanelWizard};
use crate::simulation::PendingTask;
use crate::wizard::{ForecastStep, Wizard};

/// Builds the result of a simulated forecast run for `group`.
pub fn simulated_forecast(group: &SalesGroup, options: ForecastOptions) -> ForecastSummary {
    ForecastSummary {
        group_id: group.id().to_string(),
        group_name: group.name().to_string(),
        options,
        model_version: fixtures::MODEL_VERSION.to_string(),
        expected_growth: fixtures::FORECAST_GROWTH,
        uncertainty: fixtures::FORECAST_UNCERTAINTY,
        accuracy: fixtures::FORECAST_ACCURACY,
        peak_month: fixtures::FORECAST_PEAK_MONTH.to_string(),
        peak_units: fixtures::FORECAST_PEAK_UNITS,
        historical: fixtures::historical_sales(),
        forecast: fixtures::forecast_series(),
    }
}

/// The forecast panel: select -> configure -> results.
#[derive(Debug)]
pub struct ForecastPanel {
    catalog: Catalog,
    history: HistoryStore,
    wizard: Wizard<ForecastStep>,
    options: ForecastOptions,
    delay: Duration,
    pending: Option<PendingTask<ForecastSummary>>,
    result: Option<ForecastSummary>,
    saved: bool,
}

impl ForecastPanel {
    pub fn new(catalog: Catalog, history: HistoryStore, delay: Duration) -> Self {
        Self {
            catalog,
            history,
            wizard: Wizard::new(SearchFields::NAME),
            options: ForecastOptions::default(),
            delay,
            pending: None,
            result: None,
            saved: false,
        }
    }

    pub fn options(&self) -> ForecastOptions {
        self.options
    }

    fn require_step(&self, expected: ForecastStep, action: &str) -> Result<()> {
        if self.wizard.step() != expected {
            return Err(ComputeError::Navigation(format!(
                "Cannot {} on the '{}' step",
                action,
                self.wizard.step()
            )));
        }
        Ok(())
    }

    /// Replaces the run options. Only allowed while configuring.
    pub fn configure(&mut self, options: ForecastOptions) -> Result<()> {
        self.require_step(ForecastStep::Configure, "change forecast options")?;
        self.options = options;
        Ok(())
    }

    pub fn set_horizon(&mut self, horizon: Horizon) -> Result<()> {
        self.configure(ForecastOptions {
            horizon,
            ..self.options
        })
    }

    /// Starts a simulated forecast run for the selected group.
    ///
    /// A run already in flight is replaced. Groups that still need data are
    /// rejected up front.
    #[instrument(skip(self), fields(horizon = %self.options.horizon))]
    pub fn generate(&mut self) -> Result<()> {
        self.require_step(ForecastStep::Configure, "generate a forecast")?;
        let selected = self.wizard.require_selected()?;
        let group = self.catalog.get(selected.id())?;

        group
            .status()
            .apply(PipelineEvent::ForecastSucceeded)
            .map_err(|e| ComputeError::from_status(group.id(), e))?;

        if let Some(previous) = self.pending.take() {
            warn!("Replacing a forecast run that was still pending");
            previous.cancel();
        }

        info!(group = group.id(), "Generating forecast");
        let options = self.options;
        self.pending = Some(PendingTask::schedule(
            format!("Forecast for {}", group.name()),
            self.delay,
            move || simulated_forecast(&group, options),
        ));
        Ok(())
    }

    pub fn is_generating(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Waits for the pending run, marks the group as forecasted and shows
    /// the results.
    pub async fn finish_generation(&mut self) -> Result<&ForecastSummary> {
        let task = self.pending.take().ok_or_else(|| {
            ComputeError::Validation("No forecast is being generated".to_string())
        })?;
        let summary = task.wait().await?;

        self.catalog
            .apply_event(&summary.group_id, PipelineEvent::ForecastSucceeded)?;
        let refreshed = self.catalog.get(&summary.group_id)?;
        self.wizard.replace_selected(refreshed);
        self.wizard.advance()?;

        info!(group = %summary.group_id, "Forecast generated");
        self.saved = false;
        Ok(self.result.insert(summary))
    }

    pub fn results(&self) -> Option<&ForecastSummary> {
        self.result.as_ref()
    }

    /// Appends the shown results to the group's forecast history.
    #[instrument(skip(self))]
    pub fn save_to_history(&mut self) -> Result<ForecastRecord> {
        self.require_step(ForecastStep::Results, "save a forecast")?;
        let summary = self
            .result
            .as_ref()
            .ok_or_else(|| ComputeError::Validation("No forecast results to save".to_string()))?;
        if self.saved {
            return Err(ComputeError::Validation(
                "These results are already saved to history".to_string(),
            ));
        }

        let record = ForecastRecord {
            id: self.history.next_record_id(&summary.group_id),
            generated_on: Local::now().date_naive(),
            horizon: summary.options.horizon,
            model_version: summary.model_version.clone(),
            accuracy: summary.accuracy,
            growth: summary.expected_growth,
        };
        self.history.save(&summary.group_id, record.clone())?;
        self.saved = true;
        Ok(record)
    }
}

impl PanelWizard for ForecastPanel {
    type Step = ForecastStep;

    fn wizard(&self) -> &Wizard<ForecastStep> {
        &self.wizard
    }

    fn wizard_mut(&mut self) -> &mut Wizard<ForecastStep> {
        &mut self.wizard
    }
}

impl CatalogPanel for ForecastPanel {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }

    fn on_back(&mut self, _step: ForecastStep) {
        self.result = None;
        self.saved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixture_services, init_test_tracing};
    use model::GroupStatus;

    fn panel() -> (ForecastPanel, Catalog, HistoryStore) {
        let (catalog, history) = fixture_services();
        let panel = ForecastPanel::new(
            catalog.clone(),
            history.clone(),
            Duration::from_millis(3000),
        );
        (panel, catalog, history)
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_moves_to_results_and_updates_status() {
        let _guard = init_test_tracing();
        let (mut panel, catalog, _) = panel();

        assert_eq!(panel.select("2").unwrap(), ForecastStep::Configure);
        panel.set_horizon(Horizon::OneYear).unwrap();
        panel.generate().unwrap();
        assert!(panel.is_generating());

        let summary = panel.finish_generation().await.unwrap().clone();
        assert_eq!(summary.group_name, "APM 1.5L");
        assert_eq!(summary.options.horizon, Horizon::OneYear);
        assert_eq!(summary.expected_growth, 12.8);
        assert_eq!(summary.peak_month, "December");
        assert_eq!(summary.forecast.len(), 12);

        assert_eq!(panel.step(), ForecastStep::Results);
        assert_eq!(catalog.get("2").unwrap().status(), GroupStatus::Forecasted);
        assert_eq!(panel.selected().unwrap().status(), GroupStatus::Forecasted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_needs_data_group_cannot_be_forecast() {
        let (mut panel, _, _) = panel();
        panel.select("3").unwrap();

        let err = panel.generate().unwrap_err();
        assert!(matches!(err, ComputeError::InvalidTransition { .. }));
        assert!(!panel.is_generating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_cancels_pending_run() {
        let (mut panel, catalog, _) = panel();
        panel.select("5").unwrap();
        panel.generate().unwrap();

        assert_eq!(panel.back().unwrap(), ForecastStep::Select);
        assert!(panel.selected().is_none());
        assert!(matches!(
            panel.finish_generation().await,
            Err(ComputeError::Validation(_))
        ));

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(catalog.get("5").unwrap().status(), GroupStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_options_only_while_configuring() {
        let (mut panel, _, _) = panel();
        assert!(panel.set_horizon(Horizon::Aop).is_err());
        assert!(panel.generate().is_err());

        panel.select("1").unwrap();
        panel
            .configure(ForecastOptions {
                horizon: Horizon::OneMonth,
                include_calendar: false,
                include_price: true,
            })
            .unwrap();
        assert!(!panel.options().include_calendar);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_to_history_once() {
        let (mut panel, _, history) = panel();
        panel.select("1").unwrap();
        assert!(panel.save_to_history().is_err());

        panel.generate().unwrap();
        panel.finish_generation().await.unwrap();

        let record = panel.save_to_history().unwrap();
        assert_eq!(record.id, "6");
        assert_eq!(record.accuracy, 94.2);
        assert_eq!(history.records("1")[0], record);
        assert!(panel.save_to_history().is_err());

        // going back clears the results
        panel.back().unwrap();
        assert!(panel.results().is_none());
    }
}
