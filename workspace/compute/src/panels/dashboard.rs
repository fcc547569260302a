use common::{AnalyticsSnapshot, fixtures};

use crate::catalog::Catalog;
use crate::error::{ComputeError, Result};
use crate::filter::SearchFields;
use crate::panels::{CatalogPanel, PanelWizard};
use crate::wizard::{AnalyticsStep, Wizard};

/// The analytics dashboard panel: select -> analytics.
#[derive(Debug)]
pub struct DashboardPanel {
    catalog: Catalog,
    wizard: Wizard<AnalyticsStep>,
}

impl DashboardPanel {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            wizard: Wizard::new(SearchFields::NAME),
        }
    }

    /// KPIs and charts for the selected group.
    pub fn analytics(&self) -> Result<AnalyticsSnapshot> {
        if self.wizard.step() != AnalyticsStep::Analytics {
            return Err(ComputeError::Navigation(
                "Select a sales group to view its analytics".to_string(),
            ));
        }
        let group = self.wizard.require_selected()?;

        Ok(AnalyticsSnapshot {
            group_id: group.id().to_string(),
            group_name: group.name().to_string(),
            kpis: fixtures::dashboard_kpis(),
            sales_trend: fixtures::sales_trend(),
            product_mix: fixtures::product_mix(),
            channels: fixtures::channel_performance(),
            accuracy: fixtures::weekly_accuracy(),
        })
    }
}

impl PanelWizard for DashboardPanel {
    type Step = AnalyticsStep;

    fn wizard(&self) -> &Wizard<AnalyticsStep> {
        &self.wizard
    }

    fn wizard_mut(&mut self) -> &mut Wizard<AnalyticsStep> {
        &mut self.wizard
    }
}

impl CatalogPanel for DashboardPanel {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_services;
    use rust_decimal::Decimal;

    #[test]
    fn test_analytics_for_selected_group() {
        let (catalog, _) = fixture_services();
        let mut panel = DashboardPanel::new(catalog);
        assert!(panel.analytics().is_err());

        panel.toggle_category("Juice");
        assert_eq!(panel.catalog_view().groups.len(), 2);
        panel.select("4").unwrap();

        let snapshot = panel.analytics().unwrap();
        assert_eq!(snapshot.group_name, "AMJ MS 1L");
        assert_eq!(snapshot.kpis.len(), 4);
        assert_eq!(snapshot.sales_trend.len(), 6);
        assert_eq!(snapshot.channels[0].revenue, Decimal::new(45200, 0));
        assert_eq!(snapshot.accuracy.len(), 6);
    }

    #[test]
    fn test_back_keeps_filter() {
        let (catalog, _) = fixture_services();
        let mut panel = DashboardPanel::new(catalog);
        panel.set_search_term("MS");
        panel.select("5").unwrap();

        assert_eq!(panel.back().unwrap(), AnalyticsStep::Select);
        let view = panel.catalog_view();
        assert_eq!(view.search_term, "MS");
        assert_eq!(view.groups.len(), 2);
        assert!(panel.analytics().is_err());
    }
}
